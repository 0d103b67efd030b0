/// Corpus configuration — defaults, validation and RON loading.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("gram length must be at least 2, got {0}")]
    InvalidGramLength(usize),
    #[error("citation placeholder must contain at least one token")]
    EmptyCitation,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Tunables for a [`Corpus`](crate::core::corpus::Corpus).
///
/// Every field is optional in RON; missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Longest n-gram recorded, and so the widest generation context plus one.
    pub gram_length: usize,
    /// Sentences with fewer tokens than this may be inferred as facts.
    pub fact_length_limit: usize,
    /// Lower-case words that mark a short sentence as a fact.
    pub fact_words: FxHashSet<String>,
    /// Tokens a citation placeholder expands to in generated text.
    pub citation_placeholder: Vec<String>,
    /// Generation gives up, interrupted, after this many tokens.
    pub max_sentence_tokens: Option<usize>,
    /// Tokens removed by `Corpus::strip_stray_tokens`.
    pub stray_tokens: Vec<String>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            gram_length: 5,
            fact_length_limit: 15,
            fact_words: [
                "hence",
                "therefore",
                "is",
                "can",
                "proven",
                "cannot",
                "must",
                "should",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            citation_placeholder: ["(", "Anonymous", "2034", ")"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            max_sentence_tokens: Some(256),
            stray_tokens: ["\\", "\\\\", "\\1"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

impl CorpusConfig {
    /// Default configuration with a different gram length.
    pub fn with_gram_length(gram_length: usize) -> Self {
        Self {
            gram_length,
            ..Self::default()
        }
    }

    /// Load a configuration from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<CorpusConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse and validate a configuration from a RON string.
    pub fn parse_ron(input: &str) -> Result<CorpusConfig, ConfigError> {
        let config: CorpusConfig = ron::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gram_length < 2 {
            return Err(ConfigError::InvalidGramLength(self.gram_length));
        }
        if self.citation_placeholder.is_empty() {
            return Err(ConfigError::EmptyCitation);
        }
        Ok(())
    }
}
