//! Hosted document store adapter for the workout event log
//!
//! The store is an external key-value base reached over HTTP: `put` upserts
//! a record under its date key, `fetch` returns every stored record
//! unordered, and `get` reads a single record (cached for 24 hours, off the
//! aggregation hot path).

use crate::cache::TtlCache;
use crate::models::{StoredRecord, WorkoutEvent};
use chrono::{Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Mutex;

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

const DEFAULT_STORE_URL: &str = "https://database.deta.sh/v1/workout_data";
const GET_CACHE_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct StoreConfig {
  pub project_key: String,
  pub base_url: String,
}

impl StoreConfig {
  pub fn from_env() -> Result<Self, StoreError> {
    Ok(Self {
      project_key: env::var("WORKOUT_DB_KEY")
        .map_err(|_| StoreError::MissingConfig("WORKOUT_DB_KEY".into()))?,
      base_url: env::var("WORKOUT_DB_URL").unwrap_or_else(|_| DEFAULT_STORE_URL.to_string()),
    })
  }
}

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("Missing configuration: {0}")]
  MissingConfig(String),

  #[error("HTTP request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("Store error {status}: {body}")]
  Api { status: u16, body: String },
}

/// ---------------------------------------------------------------------------
/// Wire Format
/// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FetchResponse {
  #[serde(default)]
  items: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct PutRequest<'a> {
  items: [&'a StoredRecord; 1],
}

/// Everything a `fetch_events` pass recovered from the store: parsed events
/// plus a count of records skipped as malformed.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
  pub events: Vec<WorkoutEvent>,
  pub skipped: usize,
}

/// ---------------------------------------------------------------------------
/// Store Client
/// ---------------------------------------------------------------------------

pub struct StoreClient {
  client: Client,
  config: StoreConfig,
  get_cache: Mutex<TtlCache<StoredRecord>>,
}

impl StoreClient {
  pub fn new(config: StoreConfig) -> Self {
    Self {
      client: Client::new(),
      config,
      get_cache: Mutex::new(TtlCache::new(Duration::hours(GET_CACHE_TTL_HOURS))),
    }
  }

  /// Upsert one record keyed by its date: a new log on an existing date
  /// overwrites the stored record.
  pub async fn put_event(&self, event: &WorkoutEvent) -> Result<(), StoreError> {
    let record = event.to_record();

    let response = self
      .client
      .put(format!("{}/items", self.config.base_url))
      .header("X-API-Key", &self.config.project_key)
      .json(&PutRequest { items: [&record] })
      .send()
      .await?;

    if !response.status().is_success() {
      let status = response.status().as_u16();
      let body = response.text().await.unwrap_or_default();
      return Err(StoreError::Api { status, body });
    }

    Ok(())
  }

  /// Fetch the full event log. Records arrive unordered; malformed ones are
  /// skipped and counted rather than aborting the pass.
  pub async fn fetch_events(&self) -> Result<EventLog, StoreError> {
    let response = self
      .client
      .get(format!("{}/items", self.config.base_url))
      .header("X-API-Key", &self.config.project_key)
      .send()
      .await?;

    if !response.status().is_success() {
      let status = response.status().as_u16();
      let body = response.text().await.unwrap_or_default();
      return Err(StoreError::Api { status, body });
    }

    let fetched: FetchResponse = response.json().await?;

    let mut log = EventLog::default();
    for item in &fetched.items {
      match WorkoutEvent::from_record(item) {
        Ok(event) => log.events.push(event),
        Err(e) => {
          tracing::warn!("skipping malformed record: {}", e);
          log.skipped += 1;
        }
      }
    }

    Ok(log)
  }

  /// Read one record by its date key, served from a 24-hour cache when
  /// fresh. `None` when no record exists for the key.
  pub async fn get(&self, key: &str) -> Result<Option<StoredRecord>, StoreError> {
    let now = Utc::now();

    // A poisoned lock just degrades to a cache miss.
    if let Ok(cache) = self.get_cache.lock() {
      if let Some(record) = cache.get(key, now) {
        return Ok(Some(record));
      }
    }

    let response = self
      .client
      .get(format!("{}/items/{}", self.config.base_url, key))
      .header("X-API-Key", &self.config.project_key)
      .send()
      .await?;

    if response.status() == reqwest::StatusCode::NOT_FOUND {
      return Ok(None);
    }

    if !response.status().is_success() {
      let status = response.status().as_u16();
      let body = response.text().await.unwrap_or_default();
      return Err(StoreError::Api { status, body });
    }

    let record: StoredRecord = response.json().await?;

    if let Ok(mut cache) = self.get_cache.lock() {
      cache.insert(key, record.clone(), now);
    }

    Ok(Some(record))
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
