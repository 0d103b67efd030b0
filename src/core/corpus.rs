/// Corpus — sentence ingestion into the n-gram trie and category-conditioned
/// sentence generation with context backoff and length annealing.

use rand::Rng;
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::core::cleaners::{remove_citations, SentenceStream};
use crate::core::config::{ConfigError, CorpusConfig};
use crate::core::gram::GramNode;
use crate::core::text::{detokenize, split_sentences, tokenize, word_count};
use crate::schema::sentence::GeneratedSentence;
use crate::schema::token::{Category, Token};

/// A trained model: one n-gram trie plus the settings used to fill and sample it.
#[derive(Debug, Clone)]
pub struct Corpus {
    counts: GramNode,
    config: CorpusConfig,
}

impl Default for Corpus {
    fn default() -> Self {
        Self::new()
    }
}

impl Corpus {
    /// An empty corpus with the default configuration (5-grams).
    pub fn new() -> Self {
        Self {
            counts: GramNode::new(),
            config: CorpusConfig::default(),
        }
    }

    pub fn with_config(config: CorpusConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            counts: GramNode::new(),
            config,
        })
    }

    pub fn with_gram_length(gram_length: usize) -> Result<Self, ConfigError> {
        Self::with_config(CorpusConfig::with_gram_length(gram_length))
    }

    pub fn gram_length(&self) -> usize {
        self.config.gram_length
    }

    pub fn config(&self) -> &CorpusConfig {
        &self.config
    }

    /// Root of the n-gram trie.
    pub fn counts(&self) -> &GramNode {
        &self.counts
    }

    pub fn counts_mut(&mut self) -> &mut GramNode {
        &mut self.counts
    }

    /// Guess the category of a tokenized sentence.
    ///
    /// A `?` in either of the last two positions makes a question (the
    /// last one may be `Token::End`). Otherwise a short sentence holding
    /// any of the configured fact words is a fact, and anything else a
    /// declaration.
    pub fn deduce_category(&self, tokens: &[Token]) -> Category {
        let question = Token::word("?");
        if tokens.iter().rev().take(2).any(|t| *t == question) {
            return Category::Question;
        }

        let has_fact_word = tokens.iter().filter_map(Token::as_word).any(|w| {
            self.config.fact_words.contains(&w.to_lowercase())
        });
        if tokens.len() < self.config.fact_length_limit && has_fact_word {
            return Category::Fact;
        }

        Category::Declaration
    }

    /// Record a tokenized sentence.
    ///
    /// Every position starts one n-gram of up to `gram_length` tokens,
    /// shorter near the end of the sentence, and the trie node for each
    /// gets one occurrence under `category` (deduced when `None`).
    pub fn add_sentence(&mut self, tokens: &[Token], category: Option<Category>) {
        if tokens.is_empty() {
            return;
        }
        let category = category.unwrap_or_else(|| self.deduce_category(tokens));

        for start in 0..tokens.len() {
            let end = (start + self.config.gram_length).min(tokens.len());
            self.counts
                .get_or_create(&tokens[start..end])
                .add_occurrence(category);
        }
        trace!(tokens = tokens.len(), %category, "sentence recorded");
    }

    /// Tokenize and record a single sentence.
    pub fn add_text(&mut self, text: &str, category: Option<Category>) {
        self.add_sentence(&tokenize(text), category);
    }

    pub fn add_sentences<I, S>(&mut self, texts: I, category: Option<Category>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for text in texts {
            self.add_text(text.as_ref(), category);
        }
    }

    /// Record sentence openings: fragments that have a start but no end.
    pub fn add_prefixes<I, S>(&mut self, prefixes: I, category: Category)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for prefix in prefixes {
            let mut tokens = tokenize(prefix.as_ref());
            tokens.pop();
            self.add_sentence(&tokens, Some(category));
        }
    }

    /// Record sentence endings: fragments that have an end but no start.
    pub fn add_suffixes<I, S>(&mut self, suffixes: I, category: Category)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for suffix in suffixes {
            let tokens = tokenize(suffix.as_ref());
            self.add_sentence(&tokens[1..], Some(category));
        }
    }

    /// Split a document into sentences, repair bad splits, replace
    /// citations and record every sentence under its deduced category.
    pub fn add_document(&mut self, doc: &str) {
        let sentences = split_sentences(doc)
            .into_iter()
            .split_tabs()
            .stitch_abbreviations()
            .stitch_parentheses();

        let mut ingested = 0usize;
        for sentence in sentences {
            let tokens = remove_citations(tokenize(&sentence));
            self.add_sentence(&tokens, None);
            ingested += 1;
        }
        debug!(sentences = ingested, "document ingested");
    }

    /// Remove every configured stray token from the trie.
    pub fn strip_stray_tokens(&mut self) {
        for stray in &self.config.stray_tokens {
            self.counts.delete(&Token::word(stray.as_str()));
        }
    }

    /// Fold all of this corpus's counts, scaled by `weight`, into `other`.
    pub fn merge_into(&self, other: &mut Corpus, weight: f64) {
        self.counts.merge_into(&mut other.counts, weight);
    }

    /// Generate a sentence of the given category.
    ///
    /// Each step looks back over a context whose length is annealed: with
    /// few tokens produced the context tends to be short, and it widens
    /// towards `gram_length - 1` as the sentence grows. Generation stops
    /// at `Token::End`, or interrupted at `Token::EarlyEnd` or the
    /// configured token cap.
    pub fn generate_sentence<R: Rng + ?Sized>(
        &self,
        category: Category,
        rng: &mut R,
    ) -> GeneratedSentence {
        let span = (self.config.gram_length - 1) as f64;
        let mut words = vec![Token::Start, Token::Start];

        loop {
            let exponent = (words.len() as f64).ln();
            let context = span - (rng.gen::<f64>().powf(exponent) * span).floor();
            let context = (context as usize).min(words.len());

            let (token, _) = self
                .counts
                .pick_best(&words[words.len() - context..], category, rng);
            trace!(context, %token, "picked token");

            let finished = matches!(token, Token::End | Token::EarlyEnd);
            words.push(token);
            if finished {
                break;
            }
            if let Some(limit) = self.config.max_sentence_tokens {
                if words.len() - 2 >= limit {
                    debug!(limit, "sentence hit token cap");
                    words.push(Token::EarlyEnd);
                    break;
                }
            }
        }

        let interrupted = words.last() != Some(&Token::End);
        let words = self.expand_citations(words);
        let body = &words[2..words.len() - 1];

        GeneratedSentence {
            text: detokenize(body),
            category,
            interrupted,
            word_count: word_count(body),
        }
    }

    fn expand_citations(&self, words: Vec<Token>) -> Vec<Token> {
        let mut expanded = Vec::with_capacity(words.len());
        for word in words {
            if word == Token::Citation {
                expanded.extend(
                    self.config
                        .citation_placeholder
                        .iter()
                        .map(|t| Token::word(t.as_str())),
                );
            } else {
                expanded.push(word);
            }
        }
        expanded
    }

    /// Every distinct real token anywhere in the trie.
    pub fn word_set(&self) -> FxHashSet<Token> {
        let mut words = FxHashSet::default();
        collect_words(&self.counts, &mut words);
        words
    }
}

fn collect_words(node: &GramNode, words: &mut FxHashSet<Token>) {
    for (token, child) in node.children() {
        if !token.is_sentinel() {
            words.insert(token.clone());
        }
        collect_words(child, words);
    }
}
