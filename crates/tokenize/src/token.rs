use serde::{Deserialize, Serialize};

/// A token with its UTF-8 byte offsets in the normalized (lower-cased) text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// The token text content.
    pub text: String,
    /// Byte offset (inclusive) in the normalized text.
    pub start: usize,
    /// Byte offset (exclusive) in the normalized text.
    pub end: usize,
}

impl Token {
    pub(crate) fn slice(text: &str, start: usize, end: usize) -> Self {
        Self {
            text: text[start..end].to_string(),
            start,
            end,
        }
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        self.text.as_str()
    }
}

/// Splits already-normalized text on Unicode whitespace and records byte offsets.
///
/// Punctuation is kept attached to the surrounding word.
pub fn split_whitespace_tokens(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(token_start) = start.take() {
                tokens.push(Token::slice(text, token_start, idx));
            }
        } else if start.is_none() {
            start = Some(idx);
        }
    }

    if let Some(token_start) = start {
        tokens.push(Token::slice(text, token_start, text.len()));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_follow_byte_positions() {
        let tokens = split_whitespace_tokens("  what\tis\u{3000}it? ");
        let got: Vec<(&str, usize, usize)> = tokens
            .iter()
            .map(|t| (t.text.as_str(), t.start, t.end))
            .collect();
        assert_eq!(got, vec![("what", 2, 6), ("is", 7, 9), ("it?", 12, 15)]);
    }

    #[test]
    fn blank_text_has_no_tokens() {
        assert!(split_whitespace_tokens("").is_empty());
        assert!(split_whitespace_tokens(" \n\t ").is_empty());
    }
}
