use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use faqmatch::{
    ConfigLoadError, Corpus, FaqConfig, FaqError, InMemorySource, KeyValueStore, MatchConfig,
    MatchEngine, MatchError, Source, SourceError, StoreError, load_engine,
};

/// Source whose load always fails with a status error.
struct UnreachableSource {
    questions: HashMap<String, String>,
}

#[async_trait]
impl Source for UnreachableSource {
    fn name(&self) -> &str {
        "unreachable"
    }

    async fn load_questions(&mut self) -> Result<(), SourceError> {
        Err(SourceError::Status {
            url: "http://faq.invalid/list.csv".into(),
            status: 503,
        })
    }

    fn all_questions(&self) -> &HashMap<String, String> {
        &self.questions
    }
}

struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(None)
    }

    fn set_with_expiry(&self, _key: &str, _value: &[u8], _ttl: Duration) -> Result<(), StoreError> {
        Err(StoreError::backend("read-only"))
    }
}

#[test]
fn missing_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = FaqConfig::from_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ConfigLoadError::FileRead(_)));
}

#[test]
fn malformed_yaml_is_reported() {
    let err = FaqConfig::from_yaml("files: [type: csv").unwrap_err();
    assert!(matches!(err, ConfigLoadError::YamlParse(_)));
}

#[test]
fn unknown_cache_backend_rejected() {
    let err = FaqConfig::from_yaml("cache:\n  backend: redis\n").unwrap_err();
    assert!(err.to_string().contains("cache.backend"));
}

#[tokio::test]
async fn failing_source_is_recorded_and_skipped() {
    let mut corpus = Corpus::new()
        .with_source(UnreachableSource {
            questions: HashMap::new(),
        })
        .with_source(InMemorySource::new(
            "fallback",
            [("What is your name?", "Assistant")],
        ));

    let report = corpus.load_all().await;
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].source, "unreachable");
    assert!(report.failed[0].error.contains("503"));

    let engine = MatchEngine::new(corpus, MatchConfig::default()).unwrap();
    let results = engine.find_best_answer("what is your name").unwrap();
    assert_eq!(results[0].answer, "Assistant");
}

#[tokio::test]
async fn all_sources_failing_degrades_to_not_found() {
    let mut corpus = Corpus::new().with_source(UnreachableSource {
        questions: HashMap::new(),
    });
    corpus.load_all().await;
    assert!(corpus.is_empty());

    let engine = MatchEngine::new(corpus, MatchConfig::default()).unwrap();
    let err = engine.find_best_answer("anything").unwrap_err();
    assert!(matches!(err, MatchError::NotFound { .. }));
}

#[test]
fn cache_write_failure_still_returns_answer() {
    let corpus = Corpus::from_pairs([("What is your name?", "Assistant")]);
    let engine =
        MatchEngine::with_store(corpus, Arc::new(ReadOnlyStore), MatchConfig::default()).unwrap();

    for _ in 0..2 {
        let results = engine.find_best_answer("what is your name").unwrap();
        assert_eq!(results[0].answer, "Assistant");
    }
}

#[test]
fn corrupt_cache_entry_is_treated_as_miss() {
    let corpus = Corpus::from_pairs([("What is your name?", "Assistant")]);
    let engine = MatchEngine::new(corpus, MatchConfig::default()).unwrap();
    engine
        .cache()
        .store()
        .set_with_expiry("what is your name", b"{not json", Duration::from_secs(60))
        .unwrap();

    let results = engine.find_best_answer("what is your name").unwrap();
    assert_eq!(results[0].answer, "Assistant");
    // The fresh list overwrote the corrupt entry.
    assert!(engine.cache().get("what is your name").unwrap().is_some());
}

#[tokio::test]
async fn missing_dictionary_file_fails_engine_build() {
    let dir = tempfile::tempdir().unwrap();
    let yaml = format!(
        "tokenizer:\n  dictionary_path: {}\n",
        dir.path().join("missing.txt").display()
    );
    let config = FaqConfig::from_yaml(&yaml).unwrap();
    let err = load_engine(&config).await.unwrap_err();
    assert!(matches!(err, FaqError::Tokenize(_)));
}
