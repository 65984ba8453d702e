//! Test utilities and helpers
//!
//! Small factories and date helpers shared by the unit tests.

use crate::models::WorkoutEvent;
use chrono::NaiveDate;

/// Parse an ISO date literal; panics on a bad literal, which is fine in tests.
pub fn date(iso: &str) -> NaiveDate {
  iso.parse().expect("valid test date")
}

/// Build an event from an ISO date literal, minutes, and area tags.
pub fn event(iso: &str, minutes: i64, areas: &[&str]) -> WorkoutEvent {
  WorkoutEvent {
    date: date(iso),
    duration_minutes: minutes,
    muscle_groups: areas.iter().map(|s| s.to_string()).collect(),
  }
}

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_event_factory_builds_tagged_events() {
    let e = event("2024-06-03", 30, &["chest", "triceps"]);
    assert_eq!(e.date, date("2024-06-03"));
    assert_eq!(e.duration_minutes, 30);
    assert_eq!(e.muscle_groups.len(), 2);
  }
}
