//! Word tokens for fidelity evaluation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Highest miss count a token records; matches the top of the visual ramp.
pub const MAX_MISSING: u32 = 4;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("Invalid word regex"));

/// How close a reference token is to a paragraph gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Border {
    /// Not near a gap
    #[default]
    Interior,
    /// Directly before or after a blank-line gap
    Hard,
    /// Near a hard border
    Soft,
}

impl Border {
    /// Numeric code: 0 interior, 1 hard, 2 soft.
    pub fn code(self) -> u8 {
        match self {
            Border::Interior => 0,
            Border::Hard => 1,
            Border::Soft => 2,
        }
    }

    /// Check if the token is near a gap at all.
    pub fn is_border(self) -> bool {
        self != Border::Interior
    }
}

/// One case-folded word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Lower-cased word text
    pub text: String,
    /// Zero-based line in the source text, `None` for unpositioned tokens
    pub line: Option<usize>,
    /// Position within the line, `None` for unpositioned tokens
    pub index: Option<usize>,
    /// Gap proximity (reference side only)
    pub border: Border,
    /// Number of missing n-grams this token takes part in
    pub missing_count: u32,
}

impl Token {
    /// Create an unpositioned token.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            line: None,
            index: None,
            border: Border::Interior,
            missing_count: 0,
        }
    }

    /// Create a token at a line position.
    pub fn positioned(text: impl Into<String>, line: usize, index: usize) -> Self {
        Self {
            line: Some(line),
            index: Some(index),
            ..Self::new(text)
        }
    }

    /// Count one more missing n-gram, saturating at [`MAX_MISSING`].
    pub fn add_miss(&mut self) {
        self.missing_count = (self.missing_count + 1).min(MAX_MISSING);
    }
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    WORD.find_iter(text).map(|m| m.as_str().to_lowercase())
}

/// Tokenize keeping line structure: split on line breaks, then into words.
pub fn tokenize_positioned(text: &str) -> Vec<Token> {
    text.split('\n')
        .enumerate()
        .flat_map(|(line, s)| {
            words(s)
                .enumerate()
                .map(move |(index, w)| Token::positioned(w, line, index))
        })
        .collect()
}

/// Tokenize ignoring line structure.
pub fn tokenize_flat(text: &str) -> Vec<Token> {
    words(text).map(Token::new).collect()
}
