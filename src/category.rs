//! Muscle-group categorization and trailing-window tallies
//!
//! Maps raw muscle-group tags onto fixed body-region categories and counts
//! how often each region was worked over a trailing window, feeding both the
//! breakdown display and the recommendation query.

use crate::models::WorkoutEvent;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// ---------------------------------------------------------------------------
/// Categories
/// ---------------------------------------------------------------------------

/// Body-region category for a muscle-group tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
  #[serde(rename = "core")]
  Core,
  #[serde(rename = "upper body")]
  UpperBody,
  #[serde(rename = "lower body")]
  LowerBody,
  #[serde(rename = "other")]
  Other,
}

impl Category {
  pub const ALL: [Category; 4] = [
    Category::Core,
    Category::UpperBody,
    Category::LowerBody,
    Category::Other,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Category::Core => "core",
      Category::UpperBody => "upper body",
      Category::LowerBody => "lower body",
      Category::Other => "other",
    }
  }
}

/// Total over the fixed tag vocabulary; any unknown tag lands in `Other`.
pub fn categorize(tag: &str) -> Category {
  match tag {
    "abdominals" => Category::Core,
    "chest" | "biceps" | "triceps" | "traps" => Category::UpperBody,
    "calves" | "glutes" | "quadriceps" => Category::LowerBody,
    _ => Category::Other,
  }
}

/// ---------------------------------------------------------------------------
/// Trailing-Window Tallies
/// ---------------------------------------------------------------------------

/// Per-category counts of (event, tag) pairs in a trailing window. All four
/// categories are always present, zero counts included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CategoryTally {
  pub core: u32,
  pub upper_body: u32,
  pub lower_body: u32,
  pub other: u32,
}

impl CategoryTally {
  pub fn count(&self, category: Category) -> u32 {
    match category {
      Category::Core => self.core,
      Category::UpperBody => self.upper_body,
      Category::LowerBody => self.lower_body,
      Category::Other => self.other,
    }
  }

  fn bump(&mut self, category: Category) {
    match category {
      Category::Core => self.core += 1,
      Category::UpperBody => self.upper_body += 1,
      Category::LowerBody => self.lower_body += 1,
      Category::Other => self.other += 1,
    }
  }

  pub fn total(&self) -> u32 {
    self.core + self.upper_body + self.lower_body + self.other
  }
}

/// Tally categorized (event, tag) pairs over the trailing `window_days` up
/// to and including `reference`. An event touching three muscle groups
/// contributes three tallies; an event with no tags contributes none.
pub fn tally_window(
  events: &[WorkoutEvent],
  reference: NaiveDate,
  window_days: i64,
) -> CategoryTally {
  let cutoff = reference - Duration::days(window_days);
  let mut tally = CategoryTally::default();

  for event in events {
    if event.date < cutoff {
      continue;
    }
    for tag in &event.muscle_groups {
      tally.bump(categorize(tag));
    }
  }

  tally
}

/// Category with the minimum tally. Ties break alphabetically by category
/// name, a fixed rule rather than whatever map iteration happens to yield.
pub fn least_worked_category(tally: &CategoryTally) -> Category {
  let alphabetical = [
    Category::Core,
    Category::LowerBody,
    Category::Other,
    Category::UpperBody,
  ];

  let mut least = alphabetical[0];
  for category in alphabetical.into_iter().skip(1) {
    if tally.count(category) < tally.count(least) {
      least = category;
    }
  }
  least
}

/// The raw muscle tag seen least often in the window. This, not the category
/// name, is what gets sent to the exercise API as the query parameter. Ties
/// break alphabetically; `None` when no tags were logged in the window.
pub fn least_worked_tag(
  events: &[WorkoutEvent],
  reference: NaiveDate,
  window_days: i64,
) -> Option<String> {
  let cutoff = reference - Duration::days(window_days);
  let mut counts: BTreeMap<&str, u32> = BTreeMap::new();

  for event in events {
    if event.date < cutoff {
      continue;
    }
    for tag in &event.muscle_groups {
      *counts.entry(tag.as_str()).or_insert(0) += 1;
    }
  }

  // BTreeMap iterates alphabetically and min_by_key keeps the first minimum.
  counts
    .into_iter()
    .min_by_key(|(_, count)| *count)
    .map(|(tag, _)| tag.to_string())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::MUSCLE_GROUPS;
  use crate::test_utils::{date, event};

  #[test]
  fn test_categorize_fixed_vocabulary() {
    assert_eq!(categorize("abdominals"), Category::Core);
    assert_eq!(categorize("chest"), Category::UpperBody);
    assert_eq!(categorize("biceps"), Category::UpperBody);
    assert_eq!(categorize("triceps"), Category::UpperBody);
    assert_eq!(categorize("traps"), Category::UpperBody);
    assert_eq!(categorize("calves"), Category::LowerBody);
    assert_eq!(categorize("glutes"), Category::LowerBody);
    assert_eq!(categorize("quadriceps"), Category::LowerBody);
  }

  #[test]
  fn test_categorize_unknown_tag_is_other() {
    assert_eq!(categorize("unknown_tag"), Category::Other);
    assert_eq!(categorize(""), Category::Other);
    assert_eq!(categorize("CHEST"), Category::Other); // tags are exact strings
  }

  #[test]
  fn test_categorize_covers_whole_form_vocabulary() {
    for tag in MUSCLE_GROUPS {
      assert_ne!(categorize(tag), Category::Other, "{} should be mapped", tag);
    }
  }

  #[test]
  fn test_tally_window_explodes_tags_per_event() {
    let events = vec![
      event("2024-06-10", 30, &["chest", "biceps", "abdominals"]),
      event("2024-06-11", 45, &["calves"]),
      event("2024-06-12", 20, &[]), // no tags, no rows
    ];

    let tally = tally_window(&events, date("2024-06-12"), 14);
    assert_eq!(tally.upper_body, 2);
    assert_eq!(tally.core, 1);
    assert_eq!(tally.lower_body, 1);
    assert_eq!(tally.other, 0);
  }

  #[test]
  fn test_tally_window_count_invariant() {
    let events = vec![
      event("2024-06-01", 30, &["chest", "traps"]),
      event("2024-06-05", 45, &["calves", "glutes", "quadriceps"]),
      event("2024-06-09", 60, &["mystery"]),
    ];

    let tally = tally_window(&events, date("2024-06-10"), 14);
    let pairs: usize = events.iter().map(|e| e.muscle_groups.len()).sum();
    assert_eq!(tally.total() as usize, pairs);
  }

  #[test]
  fn test_tally_window_excludes_events_before_cutoff() {
    let events = vec![
      event("2024-05-28", 30, &["chest"]),  // 15 days before reference
      event("2024-05-29", 30, &["calves"]), // exactly at the cutoff
      event("2024-06-12", 30, &["biceps"]),
    ];

    let tally = tally_window(&events, date("2024-06-12"), 14);
    assert_eq!(tally.upper_body, 1);
    assert_eq!(tally.lower_body, 1);
  }

  #[test]
  fn test_least_worked_category_picks_minimum() {
    let tally = CategoryTally {
      core: 3,
      upper_body: 5,
      lower_body: 1,
      other: 2,
    };
    assert_eq!(least_worked_category(&tally), Category::LowerBody);
  }

  #[test]
  fn test_least_worked_category_tie_breaks_alphabetically() {
    // lower body and upper body tie at 1; "lower body" sorts first.
    let tally = CategoryTally {
      core: 2,
      upper_body: 1,
      lower_body: 1,
      other: 5,
    };
    assert_eq!(least_worked_category(&tally), Category::LowerBody);

    // All zero: "core" is alphabetically first.
    assert_eq!(least_worked_category(&CategoryTally::default()), Category::Core);
  }

  #[test]
  fn test_least_worked_tag_picks_rarest_tag() {
    let events = vec![
      event("2024-06-10", 30, &["chest", "chest"]),
      event("2024-06-11", 45, &["chest", "glutes", "glutes"]),
      event("2024-06-12", 20, &["calves"]),
    ];

    assert_eq!(
      least_worked_tag(&events, date("2024-06-12"), 14),
      Some("calves".to_string())
    );
  }

  #[test]
  fn test_least_worked_tag_tie_breaks_alphabetically() {
    let events = vec![event("2024-06-10", 30, &["glutes", "biceps", "chest", "chest"])];

    assert_eq!(
      least_worked_tag(&events, date("2024-06-12"), 14),
      Some("biceps".to_string())
    );
  }

  #[test]
  fn test_least_worked_tag_empty_window() {
    let events = vec![event("2024-05-01", 30, &["chest"])];
    assert_eq!(least_worked_tag(&events, date("2024-06-12"), 14), None);
    assert_eq!(least_worked_tag(&[], date("2024-06-12"), 14), None);
  }
}
