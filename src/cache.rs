//! TTL cache for external API responses
//!
//! Key is the query string, value is (timestamp, payload). Expiry is checked
//! on read and invalidation is explicit, so the cache has no ties to any
//! render cycle. Callers pass `now` so expiry is testable.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Entry<V> {
  stored_at: DateTime<Utc>,
  value: V,
}

#[derive(Debug)]
pub struct TtlCache<V> {
  ttl: Duration,
  entries: HashMap<String, Entry<V>>,
}

impl<V: Clone> TtlCache<V> {
  pub fn new(ttl: Duration) -> Self {
    Self {
      ttl,
      entries: HashMap::new(),
    }
  }

  /// The cached value for `key`, if one was stored less than a TTL ago.
  pub fn get(&self, key: &str, now: DateTime<Utc>) -> Option<V> {
    self
      .entries
      .get(key)
      .filter(|entry| now - entry.stored_at < self.ttl)
      .map(|entry| entry.value.clone())
  }

  /// Store `value` under `key`, replacing any previous entry and restarting
  /// its TTL.
  pub fn insert(&mut self, key: impl Into<String>, value: V, now: DateTime<Utc>) {
    self.entries.insert(key.into(), Entry { stored_at: now, value });
  }

  /// Drop one key, forcing the next lookup to miss.
  pub fn invalidate(&mut self, key: &str) {
    self.entries.remove(key);
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_fresh_entry_hits() {
    let now = Utc::now();
    let mut cache = TtlCache::new(Duration::days(7));
    cache.insert("calves", 42, now);

    assert_eq!(cache.get("calves", now), Some(42));
    assert_eq!(cache.get("calves", now + Duration::days(6)), Some(42));
  }

  #[test]
  fn test_entry_expires_after_ttl() {
    let now = Utc::now();
    let mut cache = TtlCache::new(Duration::days(7));
    cache.insert("calves", 42, now);

    assert_eq!(cache.get("calves", now + Duration::days(7)), None);
    assert_eq!(cache.get("calves", now + Duration::days(30)), None);
  }

  #[test]
  fn test_missing_key_misses() {
    let cache: TtlCache<i32> = TtlCache::new(Duration::hours(24));
    assert_eq!(cache.get("anything", Utc::now()), None);
  }

  #[test]
  fn test_invalidate_forces_next_miss() {
    let now = Utc::now();
    let mut cache = TtlCache::new(Duration::days(7));
    cache.insert("calves", 42, now);

    cache.invalidate("calves");
    assert_eq!(cache.get("calves", now), None);
  }

  #[test]
  fn test_reinsert_restarts_ttl() {
    let now = Utc::now();
    let mut cache = TtlCache::new(Duration::hours(24));
    cache.insert("calves", 1, now);
    cache.insert("calves", 2, now + Duration::hours(20));

    // 26h after the first insert, but only 6h after the second.
    assert_eq!(cache.get("calves", now + Duration::hours(26)), Some(2));
  }
}
