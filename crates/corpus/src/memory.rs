use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::SourceError;
use crate::source::Source;

/// Source over pairs held in memory. Loading never fails.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    name: String,
    pairs: Vec<(String, String)>,
    questions: HashMap<String, String>,
}

impl InMemorySource {
    /// Create a source from `(question, answer)` pairs. The pairs become
    /// visible through [`Source::all_questions`] right away; a later
    /// duplicate question overwrites an earlier one.
    pub fn new<I, Q, A>(name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (Q, A)>,
        Q: Into<String>,
        A: Into<String>,
    {
        let pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(q, a)| (q.into(), a.into()))
            .collect();
        let questions = pairs.iter().cloned().collect();
        Self {
            name: name.into(),
            pairs,
            questions,
        }
    }
}

#[async_trait]
impl Source for InMemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load_questions(&mut self) -> Result<(), SourceError> {
        self.questions = self.pairs.iter().cloned().collect();
        Ok(())
    }

    fn all_questions(&self) -> &HashMap<String, String> {
        &self.questions
    }
}
