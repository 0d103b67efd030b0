use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A unit of text in a sentence: either a real word/punctuation string or
/// one of the reserved sentinels.
///
/// Sentinels are separate variants, so no corpus word can ever collide
/// with them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Token {
    /// Start of a sentence.
    Start,
    /// Natural end of a sentence.
    End,
    /// Generation stopped at a node with nowhere left to go.
    EarlyEnd,
    /// Stands in for a removed bracketed citation.
    Citation,
    /// A real word or punctuation mark.
    Word(String),
}

impl Token {
    pub fn word(text: impl Into<String>) -> Self {
        Self::Word(text.into())
    }

    pub fn is_sentinel(&self) -> bool {
        !matches!(self, Self::Word(_))
    }

    /// The text of a real token, `None` for sentinels.
    pub fn as_word(&self) -> Option<&str> {
        match self {
            Self::Word(w) => Some(w),
            _ => None,
        }
    }

    /// Lower-cased copy. Sentinels are returned unchanged.
    pub fn to_lowercase(&self) -> Token {
        match self {
            Self::Word(w) => Self::Word(w.to_lowercase()),
            other => other.clone(),
        }
    }

    /// True when the token has at least one cased character and none of
    /// them are upper case. Punctuation and numbers are not lower case.
    /// Sentinels count as lower case so they are never treated as names.
    pub fn is_lowercase(&self) -> bool {
        match self {
            Self::Word(w) => {
                let mut cased = false;
                for c in w.chars() {
                    if c.is_uppercase() {
                        return false;
                    }
                    if c.is_lowercase() {
                        cased = true;
                    }
                }
                cased
            }
            _ => true,
        }
    }
}

impl From<&str> for Token {
    fn from(text: &str) -> Self {
        Self::Word(text.to_string())
    }
}

impl From<String> for Token {
    fn from(text: String) -> Self {
        Self::Word(text)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("<s>"),
            Self::End => f.write_str("</s>"),
            Self::EarlyEnd => f.write_str("<early-end>"),
            Self::Citation => f.write_str("<cite>"),
            Self::Word(w) => f.write_str(w),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown category '{0}': expected question, declaration or fact")]
pub struct ParseCategoryError(pub String);

/// The coarse kind of a sentence. Statistics are kept separately per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Question,
    Declaration,
    Fact,
}

impl Category {
    pub const ALL: [Category; 3] = [Self::Question, Self::Declaration, Self::Fact];

    /// Position of this category in per-node count arrays.
    pub fn index(self) -> usize {
        match self {
            Self::Question => 0,
            Self::Declaration => 1,
            Self::Fact => 2,
        }
    }

    /// Cycles through the categories: 0 → Question, 1 → Declaration, 2 → Fact, 3 → Question...
    pub fn cycle(i: usize) -> Category {
        Self::ALL[i % Self::ALL.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::Declaration => "declaration",
            Self::Fact => "fact",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "question" | "q" => Ok(Self::Question),
            "declaration" | "d" => Ok(Self::Declaration),
            "fact" | "f" => Ok(Self::Fact),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_never_equal_words() {
        assert_ne!(Token::Start, Token::word("<s>"));
        assert_ne!(Token::End, Token::word("</s>"));
        assert!(Token::Citation.is_sentinel());
        assert!(!Token::word("hello").is_sentinel());
    }

    #[test]
    fn lowercase_detection() {
        assert!(Token::word("name").is_lowercase());
        assert!(!Token::word("Name").is_lowercase());
        assert!(!Token::word("!").is_lowercase());
        assert!(!Token::word("2034").is_lowercase());
        assert!(Token::word("e.g").is_lowercase());
        assert!(Token::End.is_lowercase());
    }

    #[test]
    fn to_lowercase_keeps_sentinels() {
        assert_eq!(Token::word("Ringo").to_lowercase(), Token::word("ringo"));
        assert_eq!(Token::Citation.to_lowercase(), Token::Citation);
    }

    #[test]
    fn category_parse() {
        assert_eq!("Question".parse::<Category>().unwrap(), Category::Question);
        assert_eq!("fact".parse::<Category>().unwrap(), Category::Fact);
        assert!("rant".parse::<Category>().is_err());
    }

    #[test]
    fn category_cycle() {
        assert_eq!(Category::cycle(0), Category::Question);
        assert_eq!(Category::cycle(4), Category::Declaration);
        assert_eq!(Category::cycle(5), Category::Fact);
    }
}
