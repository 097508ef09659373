//! YAML configuration for the FAQ matcher.
//!
//! ## Example
//!
//! ```yaml
//! version: "1.0"
//! max_answers: 3
//!
//! files:
//!   - type: csv
//!     path: data/faq.csv
//!   - type: csv
//!     url: https://example.com/faq.csv
//!
//! cache:
//!   backend: redb
//!   path: data/cache.redb
//!   ttl_secs: 86400
//!
//! matcher:
//!   max_concurrency: 8
//!   warm_cache: true
//!
//! tokenizer:
//!   dictionary_path: dict/thai_words.txt
//! ```
//!
//! Every section is optional. A file entry with a `url` is fetched remotely,
//! otherwise `path` is read from disk.

use std::fs;
use std::path::Path;

use matcher::{MatchConfig, DEFAULT_CACHE_TTL, MAX_CACHE_TTL};
use serde::{Deserialize, Serialize};
use store::StoreConfig;
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqConfig {
    #[serde(default = "default_config_version")]
    pub version: String,

    /// Longest answer list per query. Values below 1, negatives included,
    /// are treated as 1.
    #[serde(default)]
    pub max_answers: i64,

    #[serde(default)]
    pub files: Vec<FileConfig>,

    #[serde(default)]
    pub cache: CacheYamlConfig,

    #[serde(default)]
    pub matcher: MatcherYamlConfig,

    #[serde(default)]
    pub tokenizer: TokenizerYamlConfig,
}

impl FaqConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: FaqConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        for (idx, file) in self.files.iter().enumerate() {
            file.validate(idx)?;
        }
        self.cache.validate()?;
        self.matcher.validate()?;
        Ok(())
    }

    /// `max_answers` coerced to at least 1.
    pub fn effective_max_answers(&self) -> usize {
        usize::try_from(self.max_answers.max(1)).unwrap_or(usize::MAX)
    }

    /// Engine settings derived from this file.
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            max_answers: self.effective_max_answers(),
            cache_ttl_secs: self.cache.ttl_secs,
            max_concurrency: self.matcher.max_concurrency,
        }
    }
}

impl Default for FaqConfig {
    fn default() -> Self {
        Self {
            version: default_config_version(),
            max_answers: 1,
            files: Vec::new(),
            cache: CacheYamlConfig::default(),
            matcher: MatcherYamlConfig::default(),
            tokenizer: TokenizerYamlConfig::default(),
        }
    }
}

/// One entry under `files`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    /// `csv` or `excel`. Other values are skipped with a warning.
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Where a file entry's bytes come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileLocation<'a> {
    Local(&'a str),
    Remote(&'a str),
}

impl FileConfig {
    pub fn csv_path(path: impl Into<String>) -> Self {
        Self {
            kind: "csv".to_string(),
            path: Some(path.into()),
            url: None,
        }
    }

    pub fn csv_url(url: impl Into<String>) -> Self {
        Self {
            kind: "csv".to_string(),
            path: None,
            url: Some(url.into()),
        }
    }

    pub fn excel_path(path: impl Into<String>) -> Self {
        Self {
            kind: "excel".to_string(),
            path: Some(path.into()),
            url: None,
        }
    }

    pub fn excel_url(url: impl Into<String>) -> Self {
        Self {
            kind: "excel".to_string(),
            path: None,
            url: Some(url.into()),
        }
    }

    /// A non-empty `url` wins over `path`.
    pub fn location(&self) -> Option<FileLocation<'_>> {
        match (self.url.as_deref(), self.path.as_deref()) {
            (Some(url), _) if !url.trim().is_empty() => Some(FileLocation::Remote(url)),
            (_, Some(path)) if !path.trim().is_empty() => Some(FileLocation::Local(path)),
            _ => None,
        }
    }

    fn validate(&self, idx: usize) -> Result<(), ConfigLoadError> {
        if self.location().is_none() {
            return Err(ConfigLoadError::Validation(format!(
                "files[{idx}] needs a path or a url"
            )));
        }
        Ok(())
    }
}

/// `cache` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheYamlConfig {
    /// `in_memory` or `redb`.
    #[serde(default = "default_cache_backend")]
    pub backend: String,

    #[serde(default)]
    pub path: Option<String>,

    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl CacheYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        let valid_backends = ["in_memory", "redb"];
        if !valid_backends.contains(&self.backend.as_str()) {
            return Err(ConfigLoadError::Validation(format!(
                "cache.backend must be one of: {valid_backends:?}"
            )));
        }
        if self.backend == "redb" && self.path.is_none() {
            return Err(ConfigLoadError::Validation(
                "cache.path is required when backend is 'redb'".to_string(),
            ));
        }
        if self.ttl_secs == 0 {
            return Err(ConfigLoadError::Validation(
                "cache.ttl_secs must be >= 1".to_string(),
            ));
        }
        if self.ttl_secs > MAX_CACHE_TTL.as_secs() {
            return Err(ConfigLoadError::Validation(format!(
                "cache.ttl_secs must be <= {}",
                MAX_CACHE_TTL.as_secs()
            )));
        }
        Ok(())
    }

    pub fn store_config(&self) -> StoreConfig {
        match (self.backend.as_str(), &self.path) {
            ("redb", Some(path)) => StoreConfig::redb(path.clone()),
            _ => StoreConfig::in_memory(),
        }
    }
}

impl Default for CacheYamlConfig {
    fn default() -> Self {
        Self {
            backend: default_cache_backend(),
            path: None,
            ttl_secs: default_ttl_secs(),
        }
    }
}

/// `matcher` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatcherYamlConfig {
    /// Scoring threads; defaults to the available parallelism.
    #[serde(default)]
    pub max_concurrency: Option<usize>,

    /// Seed the result cache with every corpus question after loading.
    #[serde(default)]
    pub warm_cache: bool,
}

impl MatcherYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.max_concurrency == Some(0) {
            return Err(ConfigLoadError::Validation(
                "matcher.max_concurrency must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// `tokenizer` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenizerYamlConfig {
    /// Thai word list, one word per line. The bundled list is used when unset.
    #[serde(default)]
    pub dictionary_path: Option<String>,
}

fn default_config_version() -> String {
    "1.0".to_string()
}
fn default_cache_backend() -> String {
    "in_memory".to_string()
}
fn default_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL.as_secs()
}
