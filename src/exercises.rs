//! Exercise recommendation client
//!
//! Looks up one suggested exercise for a muscle tag from the external
//! exercise API. The pick is cached per query string for 7 days; a re-roll
//! drops the cached pick so the next call re-queries and draws again.

use crate::cache::TtlCache;
use crate::category::{categorize, Category};
use chrono::{Duration, Utc};
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Mutex;
use url::Url;

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

const DEFAULT_API_URL: &str = "https://api.api-ninjas.com/v1";
const SUGGESTION_CACHE_TTL_DAYS: i64 = 7;
/// The API returns at most ten options per query.
const MAX_OPTIONS: usize = 10;

#[derive(Debug, Clone)]
pub struct ExercisesConfig {
  pub api_key: String,
  pub base_url: String,
}

impl ExercisesConfig {
  pub fn from_env() -> Result<Self, ExerciseError> {
    Ok(Self {
      api_key: env::var("EXERCISES_API_KEY")
        .map_err(|_| ExerciseError::MissingConfig("EXERCISES_API_KEY".into()))?,
      base_url: env::var("EXERCISES_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
    })
  }
}

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ExerciseError {
  #[error("Missing configuration: {0}")]
  MissingConfig(String),

  #[error("HTTP request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("Exercise API error {status}: {body}")]
  Api { status: u16, body: String },

  #[error("No exercises returned for muscle '{0}'")]
  NoResults(String),

  #[error("Invalid API URL: {0}")]
  BadUrl(String),
}

/// ---------------------------------------------------------------------------
/// Suggestions
/// ---------------------------------------------------------------------------

/// One exercise record from the lookup API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
  pub name: String,
  pub muscle: String,
  #[serde(default)]
  pub equipment: String,
  #[serde(default)]
  pub difficulty: String,
  #[serde(default)]
  pub instructions: String,
}

impl Suggestion {
  /// Body-region bucket of the suggested exercise's target muscle.
  pub fn category(&self) -> Category {
    categorize(&self.muscle)
  }
}

/// ---------------------------------------------------------------------------
/// Exercises Client
/// ---------------------------------------------------------------------------

pub struct ExercisesClient {
  client: Client,
  config: ExercisesConfig,
  cache: Mutex<TtlCache<Suggestion>>,
}

impl ExercisesClient {
  pub fn new(config: ExercisesConfig) -> Self {
    Self {
      client: Client::new(),
      config,
      cache: Mutex::new(TtlCache::new(Duration::days(SUGGESTION_CACHE_TTL_DAYS))),
    }
  }

  /// One suggestion for `muscle`, picked uniformly at random among the
  /// returned options. The pick is cached per query, so repeated dashboard
  /// passes keep showing the same exercise until `reroll` or expiry forces
  /// a fresh request and a fresh draw.
  pub async fn suggest<R: Rng>(
    &self,
    muscle: &str,
    rng: &mut R,
  ) -> Result<Suggestion, ExerciseError> {
    let now = Utc::now();

    if let Ok(cache) = self.cache.lock() {
      if let Some(cached) = cache.get(muscle, now) {
        return Ok(cached);
      }
    }

    let options = self.fetch_options(muscle).await?;
    if options.is_empty() {
      return Err(ExerciseError::NoResults(muscle.to_string()));
    }

    let index = rng.gen_range(0..options.len().min(MAX_OPTIONS));
    let pick = options[index].clone();

    if let Ok(mut cache) = self.cache.lock() {
      cache.insert(muscle, pick.clone(), now);
    }

    Ok(pick)
  }

  /// Drop the cached pick for `muscle` so the next `suggest` re-queries and
  /// draws a new random index. Leaves the event log untouched.
  pub fn reroll(&self, muscle: &str) {
    if let Ok(mut cache) = self.cache.lock() {
      cache.invalidate(muscle);
    }
  }

  async fn fetch_options(&self, muscle: &str) -> Result<Vec<Suggestion>, ExerciseError> {
    let mut url = Url::parse(&format!("{}/exercises", self.config.base_url))
      .map_err(|e| ExerciseError::BadUrl(e.to_string()))?;
    url.query_pairs_mut().append_pair("muscle", muscle);

    let response = self
      .client
      .get(url)
      .header("X-Api-Key", &self.config.api_key)
      .send()
      .await?;

    if !response.status().is_success() {
      let status = response.status().as_u16();
      let body = response.text().await.unwrap_or_default();
      tracing::warn!("exercise lookup for '{}' failed ({}): {}", muscle, status, body);
      return Err(ExerciseError::Api { status, body });
    }

    Ok(response.json().await?)
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
