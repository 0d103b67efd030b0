/// Casing normalizer — folds capitalized variants into their lower-case
/// form, leaving words that only ever appear capitalized (likely names).

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::core::corpus::Corpus;
use crate::core::gram::GramNode;
use crate::schema::token::Token;

/// Lower-cased forms of words that never appear as a lower-case word
/// themselves, e.g. "socrates" when only "Socrates" was seen.
pub fn proper_nouns(words: &FxHashSet<Token>) -> FxHashSet<Token> {
    words
        .iter()
        .map(Token::to_lowercase)
        .filter(|lower| !(lower.is_lowercase() && words.contains(lower)))
        .collect()
}

/// Merge every child whose key is not lower case into its lower-case
/// sibling, unless that lower-case form is exempt. Children are rewritten
/// before their parent. Returns how many children were merged.
fn fold_case(node: &mut GramNode, exempt: &FxHashSet<Token>) -> usize {
    let mut merged = 0;
    for child in node.children_mut() {
        merged += fold_case(child, exempt);
    }

    for key in node.child_keys() {
        let lower = key.to_lowercase();
        if lower == key || exempt.contains(&lower) {
            continue;
        }
        if let Some(child) = node.remove_child(&key) {
            child.merge_into(node.child_or_create(lower), 1.0);
            merged += 1;
        }
    }
    merged
}

impl Corpus {
    /// Normalize casing across the whole trie.
    ///
    /// Words seen only capitalized keep their case. Every other variant
    /// ("Name", "NAME") is merged into the lower-case node ("name") and
    /// removed. Returns the number of merges performed.
    pub fn fix_casing(&mut self) -> usize {
        let exempt = proper_nouns(&self.word_set());
        let merged = fold_case(self.counts_mut(), &exempt);
        debug!(exempt = exempt.len(), merged, "casing normalized");
        merged
    }
}
