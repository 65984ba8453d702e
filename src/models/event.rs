use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed muscle-group vocabulary offered by the logging form.
pub const MUSCLE_GROUPS: [&str; 8] = [
  "chest",
  "abdominals",
  "biceps",
  "triceps",
  "calves",
  "quadriceps",
  "glutes",
  "traps",
];

/// One logged workout session. The date is the unique key within the log;
/// logging again on the same date overwrites the stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutEvent {
  pub date: NaiveDate,
  pub duration_minutes: i64,
  pub muscle_groups: Vec<String>,
}

/// Wire format of a stored record: the date key as an ISO-8601 string,
/// session length in minutes, and the targeted areas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
  pub key: String,
  pub length: i64,
  #[serde(default)]
  pub areas_worked_out: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
  #[error("record is missing the `key` field")]
  MissingKey,

  #[error("record is missing the `length` field")]
  MissingLength,

  #[error("`key` is not an ISO date: {0}")]
  BadDate(String),

  #[error("`length` is negative: {0}")]
  NegativeLength(i64),
}

impl WorkoutEvent {
  /// Parse one fetched record. Field-level failures come back as a
  /// `RecordError` so the caller can skip the record instead of aborting
  /// the whole aggregation pass.
  pub fn from_record(record: &serde_json::Value) -> Result<Self, RecordError> {
    let key = record
      .get("key")
      .and_then(|v| v.as_str())
      .ok_or(RecordError::MissingKey)?;

    let date = key
      .parse::<NaiveDate>()
      .map_err(|_| RecordError::BadDate(key.to_string()))?;

    let length = record
      .get("length")
      .and_then(|v| v.as_i64())
      .ok_or(RecordError::MissingLength)?;

    if length < 0 {
      return Err(RecordError::NegativeLength(length));
    }

    let muscle_groups = record
      .get("areas_worked_out")
      .and_then(|v| v.as_array())
      .map(|areas| {
        areas
          .iter()
          .filter_map(|v| v.as_str().map(String::from))
          .collect()
      })
      .unwrap_or_default();

    Ok(Self {
      date,
      duration_minutes: length,
      muscle_groups,
    })
  }

  pub fn to_record(&self) -> StoredRecord {
    StoredRecord {
      key: self.date.format("%Y-%m-%d").to_string(),
      length: self.duration_minutes,
      areas_worked_out: self.muscle_groups.clone(),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
