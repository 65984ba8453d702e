//! Calendar aggregation for the workout log
//!
//! Turns the sparse event log into fixed-length weekly/monthly series with
//! zero-filled rest days. Every function takes an explicit reference date
//! instead of reading the clock, so aggregation stays deterministic.

use crate::models::WorkoutEvent;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// ---------------------------------------------------------------------------
/// Date Ranges
/// ---------------------------------------------------------------------------

/// A contiguous run of calendar dates, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
  pub start: NaiveDate,
  pub end: NaiveDate,
}

impl DateRange {
  pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
    let end = self.end;
    self.start.iter_days().take_while(move |d| *d <= end)
  }

  pub fn len(&self) -> usize {
    if self.is_empty() {
      0
    } else {
      (self.end - self.start).num_days() as usize + 1
    }
  }

  pub fn is_empty(&self) -> bool {
    self.end < self.start
  }

  pub fn contains(&self, date: NaiveDate) -> bool {
    date >= self.start && date <= self.end
  }
}

/// The 7 days of the ISO week containing `reference`, Monday through Sunday.
pub fn week_range(reference: NaiveDate) -> DateRange {
  let monday =
    reference - Duration::days(i64::from(reference.weekday().num_days_from_monday()));
  DateRange {
    start: monday,
    end: monday + Duration::days(6),
  }
}

/// The full week immediately before the one containing `reference`.
pub fn previous_week_range(reference: NaiveDate) -> DateRange {
  let this_week = week_range(reference);
  DateRange {
    start: this_week.start - Duration::days(7),
    end: this_week.end - Duration::days(7),
  }
}

/// Day 1 through the last day of `reference`'s month.
pub fn month_range(reference: NaiveDate) -> DateRange {
  let start = NaiveDate::from_ymd_opt(reference.year(), reference.month(), 1)
    .unwrap_or(reference);
  // Day 1 plus 31 days always lands in the following month; step back to
  // its day zero.
  let probe = start + Duration::days(31);
  let next_month_start =
    NaiveDate::from_ymd_opt(probe.year(), probe.month(), 1).unwrap_or(probe);
  DateRange {
    start,
    end: next_month_start - Duration::days(1),
  }
}

/// The full span of the month immediately before `reference`'s.
pub fn previous_month_range(reference: NaiveDate) -> DateRange {
  let this_month = month_range(reference);
  month_range(this_month.start - Duration::days(1))
}

/// ---------------------------------------------------------------------------
/// Daily Series
/// ---------------------------------------------------------------------------

/// One (date, minutes) sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPoint {
  pub date: NaiveDate,
  pub minutes: i64,
}

/// An ordered series covering a `DateRange` exactly, with minutes = 0 on
/// days without an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DailySeries {
  pub points: Vec<DailyPoint>,
}

impl DailySeries {
  pub fn total_minutes(&self) -> i64 {
    self.points.iter().map(|p| p.minutes).sum()
  }

  pub fn len(&self) -> usize {
    self.points.len()
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }
}

/// One entry per date in `range`; minutes is the sum of events logged on
/// that exact date. The store keys records by date, so the sum is normally
/// 0 or a single event's duration, but duplicate-date records are summed.
pub fn build_daily_series(events: &[WorkoutEvent], range: &DateRange) -> DailySeries {
  let mut minutes_by_date: HashMap<NaiveDate, i64> = HashMap::new();
  for event in events {
    if range.contains(event.date) {
      *minutes_by_date.entry(event.date).or_insert(0) += event.duration_minutes;
    }
  }

  DailySeries {
    points: range
      .days()
      .map(|date| DailyPoint {
        date,
        minutes: minutes_by_date.get(&date).copied().unwrap_or(0),
      })
      .collect(),
  }
}

/// Running total of minutes up to and including each day.
pub fn cumulative(series: &DailySeries) -> DailySeries {
  let mut running = 0;
  DailySeries {
    points: series
      .points
      .iter()
      .map(|point| {
        running += point.minutes;
        DailyPoint {
          date: point.date,
          minutes: running,
        }
      })
      .collect(),
  }
}

/// ---------------------------------------------------------------------------
/// Weekly Resampling
/// ---------------------------------------------------------------------------

/// Mean daily minutes over one Sunday-ending calendar week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAverage {
  pub week_ending: NaiveDate,
  pub mean_minutes: f64,
}

/// Resample a daily series into non-overlapping Sunday-ending weeks. Each
/// bucket's value is the arithmetic mean of that week's daily minutes, with
/// zero-minute days counted toward the mean. Partial weeks at the series
/// edges average over only the days present.
pub fn weekly_average(series: &DailySeries) -> Vec<WeeklyAverage> {
  // (week_ending, minutes sum, day count); series points are in date order,
  // so each bucket is contiguous.
  let mut buckets: Vec<(NaiveDate, i64, u32)> = Vec::new();

  for point in &series.points {
    let days_to_sunday = 6 - i64::from(point.date.weekday().num_days_from_monday());
    let week_ending = point.date + Duration::days(days_to_sunday);

    match buckets.last_mut() {
      Some((ending, sum, count)) if *ending == week_ending => {
        *sum += point.minutes;
        *count += 1;
      }
      _ => buckets.push((week_ending, point.minutes, 1)),
    }
  }

  buckets
    .into_iter()
    .map(|(week_ending, sum, count)| WeeklyAverage {
      week_ending,
      mean_minutes: sum as f64 / f64::from(count),
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
