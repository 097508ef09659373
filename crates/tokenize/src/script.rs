/// Number of leading characters inspected when choosing a segmentation strategy.
pub const SCRIPT_PROBE_CHARS: usize = 16;

/// Writing systems with dedicated segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    /// Scripts that delimit words with whitespace.
    Whitespace,
    /// Thai, which has no spaces between words.
    Thai,
}

/// True for code points in the Thai block (U+0E00..=U+0E7F).
#[inline]
pub fn is_thai(ch: char) -> bool {
    ('\u{0E00}'..='\u{0E7F}').contains(&ch)
}

/// Picks a script from the first [`SCRIPT_PROBE_CHARS`] characters of `text`.
pub fn detect_script(text: &str) -> Script {
    if text.chars().take(SCRIPT_PROBE_CHARS).any(is_thai) {
        Script::Thai
    } else {
        Script::Whitespace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin_text_is_whitespace_script() {
        assert_eq!(detect_script("What is your name?"), Script::Whitespace);
        assert_eq!(detect_script(""), Script::Whitespace);
    }

    #[test]
    fn thai_in_probe_window_is_detected() {
        assert_eq!(detect_script("คุณชื่ออะไร"), Script::Thai);
        assert_eq!(detect_script("hi คุณ"), Script::Thai);
    }

    #[test]
    fn thai_beyond_probe_window_is_ignored() {
        let text = format!("{}คุณ", "a".repeat(SCRIPT_PROBE_CHARS));
        assert_eq!(detect_script(&text), Script::Whitespace);
    }
}
