//! Dashboard assembly: the single synchronous recomputation pass
//!
//! Every user interaction triggers one pass: fetch all events, rebuild the
//! weekly/monthly series and the trailing category tally, and (when the
//! window names a least-worked muscle) ask the exercise API for one
//! suggestion. External failures degrade to warnings on the payload instead
//! of aborting the pass.

use crate::calendar::{
  build_daily_series, cumulative, month_range, previous_month_range, previous_week_range,
  week_range, weekly_average, DailySeries, DateRange, WeeklyAverage,
};
use crate::category::{
  least_worked_category, least_worked_tag, tally_window, Category, CategoryTally,
};
use crate::exercises::{ExercisesClient, Suggestion};
use crate::models::WorkoutEvent;
use crate::store::{EventLog, StoreClient, StoreError};
use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Days of history feeding the category tally and the recommendation query.
pub const TALLY_WINDOW_DAYS: i64 = 14;

/// Split minutes into whole hours and leftover minutes for H/M display.
pub fn format_time(minutes: i64) -> (i64, i64) {
  (minutes / 60, minutes % 60)
}

/// ---------------------------------------------------------------------------
/// Payload Types
/// ---------------------------------------------------------------------------

/// Cumulative minutes over one week, for the area charts and the week metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekReport {
  pub range: DateRange,
  pub cumulative: DailySeries,
  pub total_minutes: i64,
}

/// Per-day minutes plus the weekly-average overlay for one month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthReport {
  pub range: DateRange,
  pub daily: DailySeries,
  pub weekly_average: Vec<WeeklyAverage>,
  pub total_minutes: i64,
}

/// The suggested exercise plus its body-region bucket for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionView {
  pub exercise: Suggestion,
  pub category: Category,
}

/// Everything the presentation layer consumes from one pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
  pub reference_date: NaiveDate,
  pub this_week: WeekReport,
  pub last_week: WeekReport,
  pub this_month: MonthReport,
  pub last_month: MonthReport,
  /// This week's total minus last week's, for the metric delta.
  pub week_delta_minutes: i64,
  /// This month's total minus last month's.
  pub month_delta_minutes: i64,
  pub tally: CategoryTally,
  pub least_worked: Category,
  pub suggestion: Option<SuggestionView>,
  /// Degradations surfaced during the pass: store unreachable, skipped
  /// records, failed lookup.
  pub warnings: Vec<String>,
}

fn week_report(events: &[WorkoutEvent], range: DateRange) -> WeekReport {
  let daily = build_daily_series(events, &range);
  WeekReport {
    range,
    total_minutes: daily.total_minutes(),
    cumulative: cumulative(&daily),
  }
}

fn month_report(events: &[WorkoutEvent], range: DateRange) -> MonthReport {
  let daily = build_daily_series(events, &range);
  MonthReport {
    range,
    total_minutes: daily.total_minutes(),
    weekly_average: weekly_average(&daily),
    daily,
  }
}

/// ---------------------------------------------------------------------------
/// The Pass
/// ---------------------------------------------------------------------------

/// Run one full pass against the store and the exercise API. A store outage
/// renders an empty log with a visible warning; a lookup failure renders
/// `suggestion: null` with a warning. Neither crashes the pass.
pub async fn build_dashboard<R: Rng>(
  store: &StoreClient,
  exercises: &ExercisesClient,
  reference: NaiveDate,
  rng: &mut R,
) -> Dashboard {
  let mut warnings = Vec::new();

  let log = match store.fetch_events().await {
    Ok(log) => log,
    Err(e) => {
      tracing::warn!("store fetch failed, rendering empty log: {}", e);
      warnings.push(format!("Event log unavailable: {}", e));
      EventLog::default()
    }
  };
  if log.skipped > 0 {
    warnings.push(format!("Skipped {} malformed record(s)", log.skipped));
  }
  let events = log.events;
  tracing::debug!("aggregating {} events", events.len());

  let this_week = week_report(&events, week_range(reference));
  let last_week = week_report(&events, previous_week_range(reference));
  let this_month = month_report(&events, month_range(reference));
  let last_month = month_report(&events, previous_month_range(reference));

  let tally = tally_window(&events, reference, TALLY_WINDOW_DAYS);
  let least_worked = least_worked_category(&tally);

  let suggestion = match least_worked_tag(&events, reference, TALLY_WINDOW_DAYS) {
    Some(muscle) => match exercises.suggest(&muscle, rng).await {
      Ok(exercise) => Some(SuggestionView {
        category: exercise.category(),
        exercise,
      }),
      Err(e) => {
        tracing::warn!("no recommendation available: {}", e);
        warnings.push(format!("No recommendation available: {}", e));
        None
      }
    },
    None => {
      warnings.push("No muscle groups logged recently; nothing to recommend".to_string());
      None
    }
  };

  Dashboard {
    reference_date: reference,
    week_delta_minutes: this_week.total_minutes - last_week.total_minutes,
    month_delta_minutes: this_month.total_minutes - last_month.total_minutes,
    this_week,
    last_week,
    this_month,
    last_month,
    tally,
    least_worked,
    suggestion,
    warnings,
  }
}

/// Log a session: upsert by date key, overwriting any prior session logged
/// on the same day.
pub async fn log_workout(
  store: &StoreClient,
  date: NaiveDate,
  length: i64,
  areas: Vec<String>,
) -> Result<(), StoreError> {
  store
    .put_event(&WorkoutEvent {
      date,
      duration_minutes: length,
      muscle_groups: areas,
    })
    .await
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
