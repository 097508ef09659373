//! Script-aware tokenization for FAQ matching.
//!
//! Text is lower-cased and split into tokens. Most scripts are split on
//! Unicode whitespace; text whose first few characters include Thai goes
//! through dictionary segmentation instead, because Thai does not put spaces
//! between words.
//!
//! There is no stemming, no stop-word removal and no punctuation stripping:
//! `"name?"` and `"name"` are different tokens.
//!
//! ```
//! use tokenize::Tokenizer;
//!
//! let tokenizer = Tokenizer::new().unwrap();
//! assert_eq!(tokenizer.words("What is  your NAME?"), vec!["what", "is", "your", "name?"]);
//! assert_eq!(tokenizer.words("คุณชื่ออะไร"), vec!["คุณ", "ชื่อ", "อะไร"]);
//! ```

mod error;
mod script;
mod thai;
mod token;

use std::path::Path;
use std::sync::Arc;

pub use crate::error::TokenizeError;
pub use crate::script::{detect_script, is_thai, Script, SCRIPT_PROBE_CHARS};
pub use crate::thai::ThaiSegmenter;
pub use crate::token::{split_whitespace_tokens, Token};

/// Tokenizer shared by queries and corpus questions.
///
/// Cloning is cheap; the Thai dictionary is reference counted.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    thai: Arc<ThaiSegmenter>,
}

impl Tokenizer {
    /// Tokenizer using the bundled Thai dictionary.
    pub fn new() -> Result<Self, TokenizeError> {
        Ok(Self {
            thai: ThaiSegmenter::shared_default()?,
        })
    }

    /// Tokenizer using a Thai dictionary file (one word per line).
    pub fn from_dictionary_file<P: AsRef<Path>>(path: P) -> Result<Self, TokenizeError> {
        Ok(Self::with_segmenter(Arc::new(
            ThaiSegmenter::from_dictionary_file(path)?,
        )))
    }

    pub fn with_segmenter(thai: Arc<ThaiSegmenter>) -> Self {
        Self { thai }
    }

    /// Split `text` into lower-cased tokens.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        if text.is_empty() {
            return Vec::new();
        }

        let normalized = text.to_lowercase();
        match detect_script(&normalized) {
            Script::Thai => self.thai.segment(&normalized),
            Script::Whitespace => split_whitespace_tokens(&normalized),
        }
    }

    /// Token texts only.
    pub fn words(&self, text: &str) -> Vec<String> {
        self.tokenize(text).into_iter().map(|t| t.text).collect()
    }
}
