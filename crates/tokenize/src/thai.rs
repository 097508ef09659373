//! Dictionary-driven Thai word segmentation.
//!
//! Thai writes words without spaces, so the segmenter walks each
//! whitespace-delimited chunk and takes the longest dictionary word starting
//! at the current position. Characters with no dictionary word starting at
//! them are grouped into a single unknown token that runs until the next
//! position where a known word begins. Non-Thai runs (digits, Latin, symbols)
//! inside a chunk become their own tokens.
//!
//! The dictionary is an [`fst::Set`], built once and shared read-only between
//! threads.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use fst::Set;
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::error::TokenizeError;
use crate::script::is_thai;
use crate::token::{split_whitespace_tokens, Token};

static DEFAULT_WORDS: &str = include_str!("../dict/thai_words.txt");
static DEFAULT_SEGMENTER: OnceCell<Arc<ThaiSegmenter>> = OnceCell::new();

/// Longest-match Thai segmenter backed by an FST word set.
pub struct ThaiSegmenter {
    words: Set<Vec<u8>>,
}

impl ThaiSegmenter {
    /// Build a segmenter from a word list.
    ///
    /// Blank entries and lines starting with `#` are ignored; duplicates are
    /// collapsed.
    pub fn from_words<I, S>(words: I) -> Result<Self, TokenizeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sorted: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty() && !w.starts_with('#'))
            .collect();
        sorted.sort_unstable();
        sorted.dedup();

        if sorted.is_empty() {
            return Err(TokenizeError::EmptyDictionary);
        }

        let words = Set::from_iter(sorted)?;
        Ok(Self { words })
    }

    /// Load a dictionary with one word per line.
    pub fn from_dictionary_file<P: AsRef<Path>>(path: P) -> Result<Self, TokenizeError> {
        let content = fs::read_to_string(path.as_ref())?;
        let segmenter = Self::from_words(content.lines())?;
        debug!(
            path = %path.as_ref().display(),
            words = segmenter.len(),
            "thai_dictionary_loaded"
        );
        Ok(segmenter)
    }

    /// Segmenter over the bundled default dictionary, built on first use.
    pub fn shared_default() -> Result<Arc<Self>, TokenizeError> {
        DEFAULT_SEGMENTER
            .get_or_try_init(|| {
                let segmenter = Self::from_words(DEFAULT_WORDS.lines())?;
                debug!(words = segmenter.len(), "thai_default_dictionary_loaded");
                Ok(Arc::new(segmenter))
            })
            .cloned()
    }

    /// Number of distinct dictionary words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Segment normalized text into tokens with byte offsets into `text`.
    pub fn segment(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        for chunk in split_whitespace_tokens(text) {
            self.segment_chunk(text, chunk.start, chunk.end, &mut tokens);
        }
        tokens
    }

    fn segment_chunk(&self, text: &str, start: usize, end: usize, out: &mut Vec<Token>) {
        let mut pos = start;
        while pos < end {
            let rest = &text[pos..end];
            let Some(first) = rest.chars().next() else {
                break;
            };

            let len = if !is_thai(first) {
                rest.find(is_thai).unwrap_or(rest.len())
            } else if let Some(word_len) = self.longest_word_at(rest) {
                word_len
            } else {
                self.unknown_run_len(rest)
            };

            out.push(Token::slice(text, pos, pos + len));
            pos += len;
        }
    }

    /// Byte length of the longest dictionary word that prefixes `text`.
    fn longest_word_at(&self, text: &str) -> Option<usize> {
        let fst = self.words.as_fst();
        let mut node = fst.root();
        let mut longest = None;

        for (idx, byte) in text.bytes().enumerate() {
            let Some(input) = node.find_input(byte) else {
                break;
            };
            node = fst.node(node.transition(input).addr);
            if node.is_final() && text.is_char_boundary(idx + 1) {
                longest = Some(idx + 1);
            }
        }

        longest
    }

    /// Length of an unknown Thai run: at least one character, stopping where a
    /// dictionary word or a non-Thai character begins.
    fn unknown_run_len(&self, text: &str) -> usize {
        for (idx, ch) in text.char_indices().skip(1) {
            if !is_thai(ch) || self.longest_word_at(&text[idx..]).is_some() {
                return idx;
            }
        }
        text.len()
    }
}

impl fmt::Debug for ThaiSegmenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThaiSegmenter")
            .field("words", &self.words.len())
            .finish()
    }
}
