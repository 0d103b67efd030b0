/// Sentence splitting, tokenization and detokenization.

use regex::Regex;
use std::sync::OnceLock;

use crate::schema::token::Token;

/// Punctuation that ends a sentence.
const SENTENCE_ENDERS: &[char] = &['.', '!', '?'];
/// Characters that may trail a sentence ender and still belong to the sentence.
const CLOSERS: &[char] = &['"', '\'', ')', ']', '}'];
/// Clitics split off the end of a word, apostrophe included.
const CLITICS: &[&str] = &["s", "m", "d", "re", "ve", "ll"];

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\w+(?:['\-.]\w+)*|\S").expect("word pattern is valid")
    })
}

fn space_before_punct() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\s+([.,:;)}\]'?!]+|n't\b)").expect("punctuation pattern is valid")
    })
}

fn space_after_punct() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([(\[{])\s+").expect("punctuation pattern is valid"))
}

/// Split a document into sentences.
///
/// A sentence ends after `.`, `!` or `?` (and any closing quotes or
/// brackets right after it) when whitespace or the end of the document
/// follows. Abbreviations such as "et al." are split too; see
/// `cleaners::StitchAbbreviations` for the repair.
pub fn split_sentences(doc: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = doc.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !SENTENCE_ENDERS.contains(&c) {
            continue;
        }

        let mut end = i + c.len_utf8();
        while let Some(&(j, next)) = chars.peek() {
            if SENTENCE_ENDERS.contains(&next) || CLOSERS.contains(&next) {
                end = j + next.len_utf8();
                chars.next();
            } else {
                break;
            }
        }

        if chars.peek().map_or(true, |&(_, next)| next.is_whitespace()) {
            push_trimmed(&mut sentences, &doc[start..end]);
            start = end;
        }
    }

    push_trimmed(&mut sentences, &doc[start..]);
    sentences
}

fn push_trimmed(sentences: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        sentences.push(piece.to_string());
    }
}

/// Split a single sentence into word tokens, bracketed by `Start` and `End`.
pub fn tokenize(sentence: &str) -> Vec<Token> {
    let mut tokens = vec![Token::Start];
    for m in word_pattern().find_iter(sentence) {
        let word = m.as_str();
        match split_clitic(word) {
            Some((stem, clitic)) => {
                tokens.push(Token::word(stem));
                tokens.push(Token::word(clitic));
            }
            None => tokens.push(Token::word(word)),
        }
    }
    tokens.push(Token::End);
    tokens
}

/// "don't" → ("do", "n't"), "I'm" → ("I", "'m").
fn split_clitic(word: &str) -> Option<(&str, &str)> {
    if word.len() > 3 {
        let at = word.len() - 3;
        if word.get(at..).is_some_and(|tail| tail.eq_ignore_ascii_case("n't")) {
            return Some((&word[..at], &word[at..]));
        }
    }

    let at = word.rfind('\'')?;
    let suffix = &word[at + 1..];
    if at > 0 && CLITICS.iter().any(|c| suffix.eq_ignore_ascii_case(c)) {
        return Some((&word[..at], &word[at..]));
    }
    None
}

/// Join tokens back into display text.
///
/// Sentinels are skipped, the first letter is capitalized, and spacing
/// around punctuation is tightened.
pub fn detokenize(tokens: &[Token]) -> String {
    let joined = tokens
        .iter()
        .filter_map(Token::as_word)
        .collect::<Vec<_>>()
        .join(" ");

    let mut chars = joined.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => return String::new(),
    };

    let tightened = space_before_punct().replace_all(&capitalized, "${1}");
    space_after_punct().replace_all(&tightened, "${1}").into_owned()
}

/// True for real tokens made only of punctuation.
pub fn is_punctuation(token: &Token) -> bool {
    token
        .as_word()
        .is_some_and(|w| !w.chars().any(char::is_alphanumeric))
}

/// Number of real tokens that are not punctuation.
pub fn word_count(tokens: &[Token]) -> usize {
    tokens
        .iter()
        .filter(|t| !t.is_sentinel() && !is_punctuation(t))
        .count()
}
