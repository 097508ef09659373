use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

use tracing::{info, warn};

use crate::memory::InMemorySource;
use crate::source::Source;

/// A source that failed during [`Corpus::load_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub source: String,
    pub error: String,
}

/// Outcome of one [`Corpus::load_all`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Names of the sources that loaded, in load order.
    pub loaded: Vec<String>,
    pub failed: Vec<SourceFailure>,
    /// Distinct questions in the merged mapping.
    pub questions: usize,
}

impl LoadReport {
    /// True when every source loaded.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Ordered set of sources plus the union of their question/answer pairs.
///
/// Built once at startup and read-only afterwards. When two sources carry the
/// same question text the source added later wins.
#[derive(Default)]
pub struct Corpus {
    sources: Vec<Box<dyn Source>>,
    entries: HashMap<String, String>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Corpus over a single in-memory source, already loaded.
    pub fn from_pairs<I, Q, A>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Q, A)>,
        Q: Into<String>,
        A: Into<String>,
    {
        let source = InMemorySource::new("inline", pairs);
        let entries = source.all_questions().clone();
        Self {
            sources: vec![Box::new(source)],
            entries,
        }
    }

    pub fn add_source<S: Source + 'static>(&mut self, source: S) -> &mut Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn with_source<S: Source + 'static>(mut self, source: S) -> Self {
        self.add_source(source);
        self
    }

    pub fn add_boxed_source(&mut self, source: Box<dyn Source>) -> &mut Self {
        self.sources.push(source);
        self
    }

    /// Load every source in order and rebuild the merged mapping.
    ///
    /// A failing source is logged, recorded in the report and skipped; the
    /// sources that did load stay usable.
    pub async fn load_all(&mut self) -> LoadReport {
        let mut report = LoadReport::default();
        let mut entries = HashMap::new();

        for source in self.sources.iter_mut() {
            let start = Instant::now();
            let outcome = source.load_questions().await;
            let elapsed_micros = start.elapsed().as_micros() as u64;

            match outcome {
                Ok(()) => {
                    let pairs = source.all_questions();
                    entries.extend(pairs.iter().map(|(q, a)| (q.clone(), a.clone())));
                    info!(
                        source = %source.name(),
                        questions = pairs.len(),
                        elapsed_micros,
                        "source_load_success"
                    );
                    report.loaded.push(source.name().to_string());
                }
                Err(err) => {
                    warn!(
                        source = %source.name(),
                        error = %err,
                        elapsed_micros,
                        "source_load_failure"
                    );
                    report.failed.push(SourceFailure {
                        source: source.name().to_string(),
                        error: err.to_string(),
                    });
                }
            }
        }

        self.entries = entries;
        report.questions = self.entries.len();
        report
    }

    /// Merged question → answer mapping.
    pub fn entries(&self) -> &HashMap<String, String> {
        &self.entries
    }

    pub fn answer_for(&self, question: &str) -> Option<&str> {
        self.entries.get(question).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Raw substring lookup, asking each source in order.
    pub fn find_answer(&self, query: &str) -> Option<&str> {
        self.sources.iter().find_map(|s| s.find_answer(query))
    }
}

impl fmt::Debug for Corpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        f.debug_struct("Corpus")
            .field("sources", &names)
            .field("entries", &self.entries.len())
            .finish()
    }
}
