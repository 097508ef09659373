use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::SourceError;

/// Anything that can supply question/answer pairs.
///
/// Implementations differ only in where the bytes come from. After a
/// successful [`load_questions`](Source::load_questions) the mapping returned
/// by [`all_questions`](Source::all_questions) holds every question (original
/// casing preserved) and its answer.
#[async_trait]
pub trait Source: Send + Sync {
    /// Label used in logs and load reports.
    fn name(&self) -> &str;

    /// (Re)load the pairs. Reloading replaces the previous mapping, so loading
    /// unchanged content twice yields the same mapping. On error the previous
    /// mapping is left untouched.
    async fn load_questions(&mut self) -> Result<(), SourceError>;

    fn all_questions(&self) -> &HashMap<String, String>;

    /// Raw lookup: answer of a question containing `query`, ignoring case.
    ///
    /// When several questions match, the lexicographically smallest question
    /// wins so the result does not depend on map iteration order.
    fn find_answer(&self, query: &str) -> Option<&str> {
        let needle = query.to_lowercase();
        self.all_questions()
            .iter()
            .filter(|(question, _)| question.to_lowercase().contains(&needle))
            .min_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, answer)| answer.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemorySource;

    #[test]
    fn find_answer_is_case_insensitive_substring() {
        let source = InMemorySource::new(
            "faq",
            [
                ("What is your name?", "Assistant"),
                ("Opening HOURS", "9 to 5"),
            ],
        );
        assert_eq!(source.find_answer("your NAME"), Some("Assistant"));
        assert_eq!(source.find_answer("hours"), Some("9 to 5"));
        assert_eq!(source.find_answer("refund"), None);
    }

    #[test]
    fn find_answer_prefers_smallest_question_on_ties() {
        let source = InMemorySource::new(
            "faq",
            [("b: price list", "second"), ("a: price list", "first")],
        );
        assert_eq!(source.find_answer("price"), Some("first"));
    }
}
