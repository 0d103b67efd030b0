//! Phrase Engine — category-conditioned sentence generation.
//!
//! Builds a weighted n-gram trie from a corpus of text, keeping separate
//! statistics for questions, declarations and facts, and samples new
//! sentences from it with context backoff and length annealing.

pub mod core;
pub mod schema;

pub use crate::core::config::{ConfigError, CorpusConfig};
pub use crate::core::corpus::Corpus;
pub use crate::core::gram::GramNode;
pub use crate::schema::sentence::GeneratedSentence;
pub use crate::schema::token::{Category, Token};
