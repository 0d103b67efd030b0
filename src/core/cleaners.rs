/// Cleaners — repairs for badly split sentences and citation removal.
///
/// The stream cleaners work on sentences in string form and are lazy
/// iterator adapters, applied in the order tab split, abbreviation stitch,
/// parenthesis stitch. The citation cleaners work on token sequences.

use regex::Regex;
use std::collections::VecDeque;
use std::sync::OnceLock;

use crate::schema::token::Token;

/// Longest `(` .. `)` distance, in tokens, still treated as a citation.
const MAX_CITATION_SPAN: usize = 10;

fn abbreviation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\b(?:et al ?\.|pp\.|e\.?g\.|cf\.)\s*$").expect("abbreviation pattern is valid")
    })
}

/// Iterator adapters for streams of sentences.
pub trait SentenceStream: Iterator<Item = String> + Sized {
    /// Split every sentence on tab characters.
    fn split_tabs(self) -> SplitTabs<Self> {
        SplitTabs {
            inner: self,
            pending: VecDeque::new(),
        }
    }

    /// Re-join sentences wrongly cut after "et al.", "pp.", "e.g." or "cf.".
    fn stitch_abbreviations(self) -> StitchAbbreviations<Self> {
        StitchAbbreviations {
            inner: self,
            broken: Vec::new(),
        }
    }

    /// Re-join sentences wrongly cut between a `(` and its `)`.
    fn stitch_parentheses(self) -> StitchParentheses<Self> {
        StitchParentheses {
            inner: self,
            broken: Vec::new(),
            balance: 0,
        }
    }
}

impl<I: Iterator<Item = String>> SentenceStream for I {}

pub struct SplitTabs<I> {
    inner: I,
    pending: VecDeque<String>,
}

impl<I: Iterator<Item = String>> Iterator for SplitTabs<I> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(piece) = self.pending.pop_front() {
                return Some(piece);
            }
            let sentence = self.inner.next()?;
            self.pending.extend(
                sentence
                    .split('\t')
                    .map(str::trim)
                    .filter(|piece| !piece.is_empty())
                    .map(str::to_string),
            );
        }
    }
}

pub struct StitchAbbreviations<I> {
    inner: I,
    broken: Vec<String>,
}

impl<I: Iterator<Item = String>> Iterator for StitchAbbreviations<I> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let Some(sentence) = self.inner.next() else {
                return flush(&mut self.broken);
            };

            if abbreviation_pattern().is_match(&sentence) {
                self.broken.push(sentence);
                continue;
            }
            if self.broken.is_empty() {
                return Some(sentence);
            }
            self.broken.push(sentence);
            return flush(&mut self.broken);
        }
    }
}

pub struct StitchParentheses<I> {
    inner: I,
    broken: Vec<String>,
    balance: i64,
}

impl<I: Iterator<Item = String>> Iterator for StitchParentheses<I> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let Some(sentence) = self.inner.next() else {
                self.balance = 0;
                return flush(&mut self.broken);
            };

            self.balance += paren_balance(&sentence);
            if self.balance > 0 {
                self.broken.push(sentence);
                continue;
            }

            self.balance = 0;
            if self.broken.is_empty() {
                return Some(sentence);
            }
            self.broken.push(sentence);
            return flush(&mut self.broken);
        }
    }
}

fn flush(broken: &mut Vec<String>) -> Option<String> {
    if broken.is_empty() {
        None
    } else {
        Some(std::mem::take(broken).join(" "))
    }
}

/// Count of unclosed `(` in `text`. Stops at the first `)` that has no
/// opening partner and returns the negative balance.
pub fn paren_balance(text: &str) -> i64 {
    let mut open = 0;
    for c in text.chars() {
        match c {
            '(' => open += 1,
            ')' => open -= 1,
            _ => {}
        }
        if open < 0 {
            return open;
        }
    }
    open
}

fn find_word(tokens: &[Token], from: usize, word: &str) -> Option<usize> {
    tokens
        .get(from..)?
        .iter()
        .position(|t| t.as_word() == Some(word))
        .map(|offset| from + offset)
}

/// Token spans `(start, end)` of citations such as "(Ralph 2015)", where
/// `start` is the `(` and `end` the `)`. Returned last first, so spans can
/// be replaced in order without shifting the ones still to come.
pub fn detect_citations(tokens: &[Token]) -> Vec<(usize, usize)> {
    let mut found = Vec::new();
    let mut from = 0;

    while let Some(open) = find_word(tokens, from, "(") {
        let Some(close) = find_word(tokens, open, ")") else {
            break;
        };

        let ends_in_number = tokens[close - 1]
            .as_word()
            .is_some_and(|w| w.parse::<i64>().is_ok());
        if close - open <= MAX_CITATION_SPAN && ends_in_number {
            found.push((open, close));
        }
        from = close;
    }

    found.reverse();
    found
}

/// Replace every citation span with a single `Token::Citation`.
pub fn remove_citations(mut tokens: Vec<Token>) -> Vec<Token> {
    for (open, close) in detect_citations(&tokens) {
        tokens.splice(open..=close, [Token::Citation]);
    }
    tokens
}
