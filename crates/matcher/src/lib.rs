//! # FAQ Matcher (`matcher`)
//!
//! Turns a free-text query into a ranked list of answers from a loaded
//! [`Corpus`](corpus::Corpus).
//!
//! ## Pipeline
//!
//! 1. Look the query up verbatim in the [`ResultCache`]; a hit is returned as is.
//! 2. Score every corpus question against the query with the Dice coefficient,
//!    in parallel on a bounded rayon pool.
//! 3. Keep unrounded scores strictly above [`CONFIDENCE_THRESHOLD`]; rounding
//!    to two decimals happens when the result is built.
//! 4. Sort by confidence (best first) and truncate to `max_answers`.
//! 5. Empty → [`MatchError::NotFound`]; otherwise cache and return.
//!
//! ## Example
//!
//! ```
//! use corpus::Corpus;
//! use matcher::{MatchConfig, MatchEngine};
//!
//! let corpus = Corpus::from_pairs([
//!     ("What is your name?", "Assistant"),
//!     ("What time is it?", "Unknown"),
//! ]);
//! let engine = MatchEngine::new(corpus, MatchConfig::default()).unwrap();
//!
//! let results = engine.find_best_answer("what is your name").unwrap();
//! assert_eq!(results[0].answer, "Assistant");
//! assert_eq!(results[0].confidence, 0.75);
//! ```

mod cache;
mod engine;
mod types;

pub use crate::cache::{CacheError, ResultCache};
pub use crate::engine::MatchEngine;
pub use crate::types::{
    AnswerResult, MatchConfig, MatchError, CONFIDENCE_THRESHOLD, DEFAULT_CACHE_TTL, MAX_CACHE_TTL,
};
