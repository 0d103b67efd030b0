/// Property tests for n-gram counting and context backoff.

use phrase_engine::core::corpus::Corpus;
use phrase_engine::core::gram::GramNode;
use phrase_engine::schema::token::{Category, Token};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn sentence(ws: &[String]) -> Vec<Token> {
    let mut tokens = vec![Token::Start];
    tokens.extend(ws.iter().map(|w| Token::word(w.as_str())));
    tokens.push(Token::End);
    tokens
}

proptest! {
    #[test]
    fn every_window_counts_each_ingestion(
        ws in prop::collection::hash_set("[a-z]{1,6}", 1..8),
        times in 1usize..4,
        gram_length in 2usize..7,
    ) {
        let ws: Vec<String> = ws.into_iter().collect();
        let tokens = sentence(&ws);
        let mut corpus = Corpus::with_gram_length(gram_length).unwrap();
        for _ in 0..times {
            corpus.add_sentence(&tokens, Some(Category::Question));
        }

        for start in 0..tokens.len() {
            let end = (start + gram_length).min(tokens.len());
            let node = corpus.counts().lookup(&tokens[start..end]);
            prop_assert!(node.is_some());
            prop_assert_eq!(node.unwrap().occurrences(Category::Question), times as f64);
        }
    }

    #[test]
    fn backoff_finds_longest_existing_suffix(
        sentences in prop::collection::vec(prop::collection::vec("[a-d]", 1..6), 0..6),
        keys in prop::collection::vec("[a-f]", 0..8),
        seed in any::<u64>(),
    ) {
        let mut root = GramNode::new();
        for s in &sentences {
            let tokens = sentence(s);
            for start in 0..tokens.len() {
                let end = (start + 4).min(tokens.len());
                root.get_or_create(&tokens[start..end]).add_occurrence(Category::Fact);
            }
        }
        let nodes = root.node_count();
        let keys: Vec<Token> = keys.iter().map(|k| Token::word(k.as_str())).collect();

        let found = root.backoff(&keys);
        prop_assert!(keys.ends_with(found));
        prop_assert!(root.has(found));
        for dropped in 0..keys.len() - found.len() {
            prop_assert!(!root.has(&keys[dropped..]));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let (token, next) = root.pick_best(&keys, Category::Fact, &mut rng);
        prop_assert_eq!(token == Token::EarlyEnd, next.is_none());

        // read-only queries never grow the trie
        prop_assert_eq!(root.node_count(), nodes);
    }
}
