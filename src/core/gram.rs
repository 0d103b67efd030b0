/// Weighted n-gram trie — per-category counts, backoff lookup and sampling.

use rand::seq::IteratorRandom;
use rand::Rng;
use rustc_hash::FxHashMap;
use std::fmt;

use crate::schema::token::{Category, Token};

/// One node of the n-gram trie.
///
/// The path from the root to a node spells a token sequence, and
/// `occurrences` counts how many times that exact sequence was recorded
/// per category. Children are only ever created by [`GramNode::get_or_create`]
/// and [`GramNode::merge_into`]; every read-only query goes through
/// [`GramNode::lookup`] and leaves the structure untouched.
#[derive(Debug, Clone, Default)]
pub struct GramNode {
    occurrences: [f64; 3],
    children: FxHashMap<Token, GramNode>,
}

impl GramNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_occurrence(&mut self, category: Category) {
        self.occurrences[category.index()] += 1.0;
    }

    pub fn occurrences(&self, category: Category) -> f64 {
        self.occurrences[category.index()]
    }

    pub fn children(&self) -> impl Iterator<Item = (&Token, &GramNode)> {
        self.children.iter()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, this one included.
    pub fn node_count(&self) -> usize {
        1 + self.children.values().map(GramNode::node_count).sum::<usize>()
    }

    /// Sampling weight of this subtree for a category.
    ///
    /// Each node contributes `ln(count + 1)` so very frequent n-grams do
    /// not swamp rare ones, and nodes never seen under `category`
    /// contribute nothing of their own.
    pub fn likelihood(&self, category: Category) -> f64 {
        self.children
            .values()
            .map(|child| child.likelihood(category))
            .sum::<f64>()
            + self.own_weight(category)
    }

    fn own_weight(&self, category: Category) -> f64 {
        (self.occurrences(category) + 1.0).ln()
    }

    /// Descend along `keys`, creating any missing nodes on the way.
    pub fn get_or_create(&mut self, keys: &[Token]) -> &mut GramNode {
        let mut node = self;
        for key in keys {
            node = node.children.entry(key.clone()).or_default();
        }
        node
    }

    /// Descend along `keys` without modifying the trie.
    /// The empty path is this node.
    pub fn lookup(&self, keys: &[Token]) -> Option<&GramNode> {
        match keys.split_first() {
            None => Some(self),
            Some((first, rest)) => self.children.get(first)?.lookup(rest),
        }
    }

    pub fn has(&self, keys: &[Token]) -> bool {
        self.lookup(keys).is_some()
    }

    /// Remove every edge labelled `key`, at any depth below this node.
    pub fn delete(&mut self, key: &Token) {
        self.children.remove(key);
        for child in self.children.values_mut() {
            child.delete(key);
        }
    }

    /// Weighted random choice of a child, biased by [`GramNode::likelihood`].
    ///
    /// Falls back to a uniform choice among the children when the draw
    /// runs past the last child, and to `Token::EarlyEnd` with no node when
    /// there are no children at all.
    pub fn pick<R: Rng + ?Sized>(
        &self,
        category: Category,
        rng: &mut R,
    ) -> (Token, Option<&GramNode>) {
        let children_mass = self.likelihood(category) - self.own_weight(category);
        let mut skip = rng.gen::<f64>() * children_mass;

        for (token, child) in &self.children {
            skip -= child.likelihood(category);
            if skip <= 0.0 {
                return (token.clone(), Some(child));
            }
        }

        match self.children.iter().choose(rng) {
            Some((token, child)) => (token.clone(), Some(child)),
            None => (Token::EarlyEnd, None),
        }
    }

    /// The longest suffix of `keys` that exists as a path below this node.
    /// Drops the oldest token until a match is found; the empty suffix
    /// always matches.
    pub fn backoff<'k>(&self, keys: &'k [Token]) -> &'k [Token] {
        let mut keys = keys;
        while !keys.is_empty() && !self.has(keys) {
            keys = &keys[1..];
        }
        keys
    }

    /// Pick the next token after the context `keys`, backing off to
    /// shorter contexts until one exists in the trie.
    pub fn pick_best<R: Rng + ?Sized>(
        &self,
        keys: &[Token],
        category: Category,
        rng: &mut R,
    ) -> (Token, Option<&GramNode>) {
        let mut keys = keys;
        loop {
            if let Some(node) = self.lookup(keys) {
                return node.pick(category, rng);
            }
            keys = &keys[1..];
        }
    }

    /// Fold this subtree's counts, scaled by `weight`, into `other`,
    /// creating matching children in `other` where they are missing.
    pub fn merge_into(&self, other: &mut GramNode, weight: f64) {
        for (theirs, ours) in other.occurrences.iter_mut().zip(self.occurrences) {
            *theirs += ours * weight;
        }
        for (key, child) in &self.children {
            child.merge_into(other.children.entry(key.clone()).or_default(), weight);
        }
    }

    /// Take ownership of the child under `key`, if any.
    pub(crate) fn remove_child(&mut self, key: &Token) -> Option<GramNode> {
        self.children.remove(key)
    }

    pub(crate) fn child_or_create(&mut self, key: Token) -> &mut GramNode {
        self.children.entry(key).or_default()
    }

    pub(crate) fn children_mut(&mut self) -> impl Iterator<Item = &mut GramNode> {
        self.children.values_mut()
    }

    pub(crate) fn child_keys(&self) -> Vec<Token> {
        self.children.keys().cloned().collect()
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        for (token, child) in &self.children {
            writeln!(f, "{}-> {}", "-".repeat(depth), token)?;
            child.write_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for GramNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn words(ws: &[&str]) -> Vec<Token> {
        ws.iter().map(|w| Token::word(*w)).collect()
    }

    #[test]
    fn add_occurrence_counts_per_category() {
        let mut node = GramNode::new();
        node.add_occurrence(Category::Fact);
        node.add_occurrence(Category::Fact);
        node.add_occurrence(Category::Question);
        assert_eq!(node.occurrences(Category::Fact), 2.0);
        assert_eq!(node.occurrences(Category::Question), 1.0);
        assert_eq!(node.occurrences(Category::Declaration), 0.0);
    }

    #[test]
    fn likelihood_is_log_dampened_sum() {
        let mut root = GramNode::new();
        root.get_or_create(&words(&["a"])).add_occurrence(Category::Fact);
        for _ in 0..3 {
            root.get_or_create(&words(&["b"])).add_occurrence(Category::Fact);
        }
        let expected = 2f64.ln() + 4f64.ln();
        assert!((root.likelihood(Category::Fact) - expected).abs() < 1e-12);
        assert_eq!(root.likelihood(Category::Question), 0.0);
    }

    #[test]
    fn lookup_does_not_create_nodes() {
        let mut root = GramNode::new();
        root.get_or_create(&words(&["a", "b"]));
        assert_eq!(root.node_count(), 3);

        assert!(root.lookup(&words(&["a", "c"])).is_none());
        assert!(!root.has(&words(&["x", "y", "z"])));
        assert_eq!(root.node_count(), 3);
    }

    #[test]
    fn get_or_create_vivifies_path() {
        let mut root = GramNode::new();
        root.get_or_create(&words(&["a", "b", "c"]));
        assert!(root.has(&words(&["a"])));
        assert!(root.has(&words(&["a", "b"])));
        assert!(root.has(&words(&["a", "b", "c"])));
        assert!(root.has(&[]));
    }

    #[test]
    fn delete_removes_token_at_every_depth() {
        let mut root = GramNode::new();
        root.get_or_create(&words(&["x", "it", "y"]));
        root.get_or_create(&words(&["it", "z"]));
        root.get_or_create(&words(&["a", "b", "it"]));

        root.delete(&Token::word("it"));

        assert!(!root.has(&words(&["it"])));
        assert!(!root.has(&words(&["x", "it"])));
        assert!(!root.has(&words(&["a", "b", "it"])));
        assert!(root.has(&words(&["x"])));
        assert!(root.has(&words(&["a", "b"])));
    }

    #[test]
    fn pick_on_leaf_is_early_end() {
        let node = GramNode::new();
        let mut rng = StdRng::seed_from_u64(7);
        let (token, next) = node.pick(Category::Declaration, &mut rng);
        assert_eq!(token, Token::EarlyEnd);
        assert!(next.is_none());
    }

    #[test]
    fn pick_single_child_always_returns_it() {
        let mut root = GramNode::new();
        root.get_or_create(&words(&["only"])).add_occurrence(Category::Fact);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let (token, next) = root.pick(Category::Fact, &mut rng);
            assert_eq!(token, Token::word("only"));
            assert!(next.is_some());
        }
    }

    #[test]
    fn pick_without_mass_for_category_still_returns_a_child() {
        let mut root = GramNode::new();
        root.get_or_create(&words(&["a"])).add_occurrence(Category::Fact);
        root.get_or_create(&words(&["b"])).add_occurrence(Category::Fact);
        let mut rng = StdRng::seed_from_u64(3);
        let (token, _) = root.pick(Category::Question, &mut rng);
        assert!(token == Token::word("a") || token == Token::word("b"));
    }

    #[test]
    fn pick_follows_weights() {
        let mut root = GramNode::new();
        root.get_or_create(&words(&["rare"])).add_occurrence(Category::Fact);
        for _ in 0..1000 {
            root.get_or_create(&words(&["common"])).add_occurrence(Category::Fact);
        }
        let mut rng = StdRng::seed_from_u64(99);
        let common = (0..2000)
            .filter(|_| root.pick(Category::Fact, &mut rng).0 == Token::word("common"))
            .count();
        // ln(1001) / (ln(1001) + ln(2)) is about 0.91
        assert!(common > 1700 && common < 1950, "common picked {} times", common);
    }

    #[test]
    fn backoff_drops_oldest_tokens() {
        let mut root = GramNode::new();
        root.get_or_create(&words(&["b", "c"]));
        let keys = words(&["z", "a", "b", "c"]);
        assert_eq!(root.backoff(&keys), &keys[2..]);

        let unknown = words(&["q", "r"]);
        assert!(root.backoff(&unknown).is_empty());
    }

    #[test]
    fn pick_best_uses_longest_known_context() {
        let mut root = GramNode::new();
        root.get_or_create(&words(&["the", "cat", "sat"])).add_occurrence(Category::Fact);
        root.get_or_create(&words(&["cat", "ran"])).add_occurrence(Category::Fact);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            let (token, _) = root.pick_best(&words(&["on", "the", "cat"]), Category::Fact, &mut rng);
            assert_eq!(token, Token::word("sat"));
        }
    }

    #[test]
    fn merge_into_scales_and_creates_children() {
        let mut source = GramNode::new();
        source.add_occurrence(Category::Fact);
        source.get_or_create(&words(&["x"])).add_occurrence(Category::Question);

        let mut target = GramNode::new();
        target.add_occurrence(Category::Fact);

        source.merge_into(&mut target, 0.5);
        assert_eq!(target.occurrences(Category::Fact), 1.5);
        let x = target.lookup(&words(&["x"])).unwrap();
        assert_eq!(x.occurrences(Category::Question), 0.5);
    }

    #[test]
    fn display_indents_by_depth() {
        let mut root = GramNode::new();
        root.get_or_create(&words(&["a", "b"]));
        assert_eq!(root.to_string(), "-> a\n--> b\n");
    }
}
