use thiserror::Error;

/// Errors that can occur while building a tokenizer.
#[derive(Debug, Error)]
pub enum TokenizeError {
    #[error("failed to read dictionary: {0}")]
    DictionaryRead(#[from] std::io::Error),
    #[error("failed to build dictionary: {0}")]
    DictionaryBuild(#[from] fst::Error),
    #[error("dictionary contains no words")]
    EmptyDictionary,
}
