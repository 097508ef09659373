use std::num::NonZeroUsize;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokenize::TokenizeError;

/// Candidates must score strictly above this to be returned.
pub const CONFIDENCE_THRESHOLD: f64 = 0.55;

/// Lifetime of a cached result list.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Longest accepted cache lifetime (ten years).
pub const MAX_CACHE_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// One ranked answer for a query. Immutable once built; a list of these is
/// what gets cached and returned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnswerResult {
    /// Query text exactly as submitted.
    pub query: String,
    /// Corpus question that matched.
    pub matched_question: String,
    pub answer: String,
    /// Dice score in `[0, 1]`, rounded to two decimals after thresholding.
    pub confidence: f64,
    /// When the score was computed.
    pub timestamp: DateTime<Utc>,
}

/// Engine-wide tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchConfig {
    /// Longest result list returned. Values below 1 are treated as 1.
    #[serde(default = "MatchConfig::default_max_answers")]
    pub max_answers: usize,
    /// Expiry of cached result lists, in seconds.
    #[serde(default = "MatchConfig::default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Scoring worker threads. `None` uses the available parallelism.
    #[serde(default)]
    pub max_concurrency: Option<usize>,
}

impl MatchConfig {
    pub(crate) fn default_max_answers() -> usize {
        1
    }

    pub(crate) fn default_cache_ttl_secs() -> u64 {
        DEFAULT_CACHE_TTL.as_secs()
    }

    pub fn with_max_answers(max_answers: usize) -> Self {
        Self {
            max_answers,
            ..Self::default()
        }
    }

    /// `max_answers` coerced to at least 1.
    pub fn effective_max_answers(&self) -> usize {
        self.max_answers.max(1)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Worker count for the scoring pool.
    pub fn worker_threads(&self) -> usize {
        self.max_concurrency.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        })
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if self.cache_ttl_secs == 0 {
            return Err(MatchError::InvalidConfig(
                "cache_ttl_secs must be greater than zero".into(),
            ));
        }
        if self.cache_ttl_secs > MAX_CACHE_TTL.as_secs() {
            return Err(MatchError::InvalidConfig(format!(
                "cache_ttl_secs must be at most {}",
                MAX_CACHE_TTL.as_secs()
            )));
        }
        if self.max_concurrency == Some(0) {
            return Err(MatchError::InvalidConfig(
                "max_concurrency must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_answers: Self::default_max_answers(),
            cache_ttl_secs: Self::default_cache_ttl_secs(),
            max_concurrency: None,
        }
    }
}

/// Errors produced by the matching layer.
#[derive(Debug, Error)]
pub enum MatchError {
    /// No candidate cleared the confidence threshold.
    #[error("no matching answers found for `{query}`")]
    NotFound { query: String },
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
    #[error("failed to build scoring pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    #[error("tokenizer error: {0}")]
    Tokenize(#[from] TokenizeError),
}

impl MatchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, MatchError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = MatchConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.cache_ttl(), DEFAULT_CACHE_TTL);
        assert!(cfg.worker_threads() >= 1);
    }

    #[test]
    fn oversized_ttl_rejected() {
        let cfg = MatchConfig {
            cache_ttl_secs: u64::MAX,
            ..MatchConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(MatchError::InvalidConfig(_))));

        let cfg = MatchConfig {
            cache_ttl_secs: MAX_CACHE_TTL.as_secs(),
            ..MatchConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn max_answers_is_coerced_to_one() {
        assert_eq!(MatchConfig::with_max_answers(0).effective_max_answers(), 1);
        assert_eq!(MatchConfig::with_max_answers(5).effective_max_answers(), 5);
    }

    #[test]
    fn zero_concurrency_rejected() {
        let cfg = MatchConfig {
            max_concurrency: Some(0),
            ..MatchConfig::default()
        };
        let err = cfg.validate().expect_err("config should be invalid");
        match err {
            MatchError::InvalidConfig(msg) => assert!(msg.contains("max_concurrency")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_ttl_rejected() {
        let cfg = MatchConfig {
            cache_ttl_secs: 0,
            ..MatchConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(MatchError::InvalidConfig(_))));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let cfg: MatchConfig = serde_json::from_str(r#"{"max_answers": 3}"#).unwrap();
        assert_eq!(cfg.max_answers, 3);
        assert_eq!(cfg.cache_ttl_secs, 86_400);
        assert_eq!(cfg.max_concurrency, None);
    }
}
