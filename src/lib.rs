//! Workspace umbrella crate for the FAQ matcher.
//!
//! Re-exports the component crates and wires a [`FaqConfig`] into a ready
//! [`MatchEngine`]: sources are built from `files`, loaded into a
//! [`Corpus`], and handed to the engine together with the configured cache
//! store and tokenizer.
//!
//! ```
//! use faqmatch::{Corpus, MatchConfig, MatchEngine};
//!
//! let corpus = Corpus::from_pairs([("What is your name?", "Assistant")]);
//! let engine = MatchEngine::new(corpus, MatchConfig::default()).unwrap();
//! let answers = engine.find_best_answer("what is your name").unwrap();
//! assert_eq!(answers[0].answer, "Assistant");
//! ```

pub mod config;

pub use crate::config::{
    CacheYamlConfig, ConfigLoadError, FaqConfig, FileConfig, FileLocation, MatcherYamlConfig,
    TokenizerYamlConfig,
};
pub use corpus::{
    Corpus, CsvFileSource, ExcelFileSource, InMemorySource, LoadReport, RemoteCsvSource,
    RemoteExcelSource, Source, SourceError, SourceFailure,
};
pub use matcher::{
    AnswerResult, CONFIDENCE_THRESHOLD, CacheError, DEFAULT_CACHE_TTL, MAX_CACHE_TTL, MatchConfig,
    MatchEngine, MatchError, ResultCache,
};
pub use similarity::{SimilarityIndex, TokenCatalog, TokenId, TokenSet, dice};
pub use store::{InMemoryStore, KeyValueStore, StoreConfig, StoreError};
pub use tokenize::{Token, TokenizeError, Tokenizer};

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

/// Errors raised while assembling an engine from configuration.
#[derive(Debug, Error)]
pub enum FaqError {
    #[error(transparent)]
    Config(#[from] ConfigLoadError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    #[error(transparent)]
    Match(#[from] MatchError),
}

/// Build the source for one `files` entry.
///
/// Returns `None` (after logging) for unknown types, entries without a
/// location, and remote sources whose HTTP client cannot be built.
pub fn source_for(file: &FileConfig) -> Option<Box<dyn Source>> {
    let Some(location) = file.location() else {
        warn!(kind = %file.kind, "source_missing_location");
        return None;
    };

    match (file.kind.to_ascii_lowercase().as_str(), location) {
        ("csv", FileLocation::Local(path)) => Some(Box::new(CsvFileSource::new(path))),
        ("csv", FileLocation::Remote(url)) => remote(url, RemoteCsvSource::new(url)),
        ("excel", FileLocation::Local(path)) => Some(Box::new(ExcelFileSource::new(path))),
        ("excel", FileLocation::Remote(url)) => remote(url, RemoteExcelSource::new(url)),
        (kind, location) => {
            warn!(kind, ?location, "source_unknown_type");
            None
        }
    }
}

fn remote<S: Source + 'static>(
    url: &str,
    built: Result<S, SourceError>,
) -> Option<Box<dyn Source>> {
    match built {
        Ok(source) => Some(Box::new(source)),
        Err(err) => {
            warn!(url, error = %err, "source_build_failure");
            None
        }
    }
}

/// Corpus holding every buildable source from `cfg.files`, not yet loaded.
pub fn build_corpus(cfg: &FaqConfig) -> Corpus {
    let mut corpus = Corpus::new();
    for source in cfg.files.iter().filter_map(source_for) {
        corpus.add_boxed_source(source);
    }
    corpus
}

/// Tokenizer with the configured Thai dictionary, or the bundled one.
pub fn build_tokenizer(cfg: &FaqConfig) -> Result<Tokenizer, TokenizeError> {
    match cfg.tokenizer.dictionary_path.as_deref() {
        Some(path) => Tokenizer::from_dictionary_file(path),
        None => Tokenizer::new(),
    }
}

/// Load every configured source and build the engine.
///
/// Source failures are reported in the returned [`LoadReport`], never as an
/// error. When `matcher.warm_cache` is set the cache is seeded before
/// returning.
pub async fn load_engine(cfg: &FaqConfig) -> Result<(MatchEngine, LoadReport), FaqError> {
    cfg.validate()?;

    let mut corpus = build_corpus(cfg);
    let report = corpus.load_all().await;
    info!(
        sources = corpus.source_count(),
        loaded = report.loaded.len(),
        failed = report.failed.len(),
        questions = report.questions,
        "corpus_loaded"
    );

    let store: Arc<dyn KeyValueStore> = Arc::from(cfg.cache.store_config().build()?);
    let index = SimilarityIndex::new(Arc::new(TokenCatalog::new()), build_tokenizer(cfg)?);
    let engine = MatchEngine::with_parts(
        Arc::new(corpus),
        index,
        ResultCache::new(store),
        cfg.match_config(),
    )?;

    if cfg.matcher.warm_cache {
        engine.warm_cache();
    }

    Ok((engine, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_types_are_skipped() {
        let file = FileConfig {
            kind: "parquet".into(),
            path: Some("faq.parquet".into()),
            url: None,
        };
        assert!(source_for(&file).is_none());
    }

    #[test]
    fn excel_entries_become_sources() {
        let local = source_for(&FileConfig::excel_path("faq.xlsx")).unwrap();
        assert_eq!(local.name(), "faq.xlsx");
        let remote = source_for(&FileConfig::excel_url("http://localhost/faq.xlsx")).unwrap();
        assert_eq!(remote.name(), "http://localhost/faq.xlsx");

        let upper = FileConfig {
            kind: "Excel".into(),
            path: Some("faq.xlsx".into()),
            url: None,
        };
        assert!(source_for(&upper).is_some());
    }

    #[test]
    fn csv_entries_become_sources() {
        let local = source_for(&FileConfig::csv_path("faq.csv")).unwrap();
        assert_eq!(local.name(), "faq.csv");
        let remote = source_for(&FileConfig::csv_url("http://localhost/faq.csv")).unwrap();
        assert_eq!(remote.name(), "http://localhost/faq.csv");
    }

    #[test]
    fn corpus_built_from_config_skips_unsupported() {
        let cfg = FaqConfig {
            files: vec![
                FileConfig::csv_path("a.csv"),
                FileConfig {
                    kind: "parquet".into(),
                    path: Some("b.parquet".into()),
                    url: None,
                },
                FileConfig::excel_path("c.xlsx"),
            ],
            ..FaqConfig::default()
        };
        assert_eq!(build_corpus(&cfg).source_count(), 2);
    }
}
