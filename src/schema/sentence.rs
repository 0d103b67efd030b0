use serde::{Deserialize, Serialize};

use super::token::Category;

/// A sentence produced by `Corpus::generate_sentence`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSentence {
    /// Detokenized display text.
    pub text: String,
    /// The category the sentence was generated for.
    pub category: Category,
    /// True when generation stopped without reaching a natural sentence end.
    pub interrupted: bool,
    /// Number of real, non-punctuation words in `text`.
    pub word_count: usize,
}
