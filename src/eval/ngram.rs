//! Sliding-window n-gram index over a token sequence.

use std::collections::BTreeMap;
use std::ops::Range;

use crate::error::{Error, Result};

use super::Token;

/// Every contiguous `n`-token window of a sequence, keyed by its
/// space-joined text and mapped to the token spans that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NgramIndex {
    n: usize,
    spans: BTreeMap<String, Vec<Range<usize>>>,
}

impl NgramIndex {
    /// Build the index over `tokens`.
    ///
    /// A sequence shorter than `n` yields an empty index.
    pub fn build(tokens: &[Token], n: usize) -> Result<Self> {
        if n == 0 {
            return Err(Error::InvalidWindow(n));
        }

        let mut spans: BTreeMap<String, Vec<Range<usize>>> = BTreeMap::new();
        for (start, window) in tokens.windows(n).enumerate() {
            let key = window
                .iter()
                .map(|t| t.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            spans.entry(key).or_default().push(start..start + n);
        }

        Ok(Self { n, spans })
    }

    /// Window size.
    pub fn window(&self) -> usize {
        self.n
    }

    /// Check if an n-gram occurs.
    pub fn contains(&self, ngram: &str) -> bool {
        self.spans.contains_key(ngram)
    }

    /// Token spans that produced an n-gram, in sequence order.
    pub fn spans(&self, ngram: &str) -> &[Range<usize>] {
        self.spans.get(ngram).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Distinct n-grams in sorted order.
    pub fn ngrams(&self) -> impl Iterator<Item = &str> {
        self.spans.keys().map(String::as_str)
    }

    /// N-grams of `self` that `other` lacks, sorted.
    pub fn missing_from<'a>(&'a self, other: &NgramIndex) -> Vec<&'a str> {
        self.ngrams().filter(|g| !other.contains(g)).collect()
    }

    /// Number of distinct n-grams.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Check if the index holds no n-grams.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::tokenize_flat;

    #[test]
    fn test_build_windows() {
        let tokens = tokenize_flat("a b c d");
        let index = NgramIndex::build(&tokens, 2).unwrap();
        assert_eq!(index.ngrams().collect::<Vec<_>>(), vec!["a b", "b c", "c d"]);
        assert_eq!(index.spans("b c"), &[1..3]);
        assert!(index.spans("x y").is_empty());
    }

    #[test]
    fn test_duplicate_windows_keep_every_span() {
        let tokens = tokenize_flat("a b a b");
        let index = NgramIndex::build(&tokens, 2).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.spans("a b"), &[0..2, 2..4]);
    }

    #[test]
    fn test_short_sequence_is_empty() {
        let tokens = tokenize_flat("a b");
        assert!(NgramIndex::build(&tokens, 3).unwrap().is_empty());
        assert!(NgramIndex::build(&[], 4).unwrap().is_empty());
    }

    #[test]
    fn test_zero_window_rejected() {
        assert!(matches!(
            NgramIndex::build(&tokenize_flat("a"), 0),
            Err(Error::InvalidWindow(0))
        ));
    }

    #[test]
    fn test_missing_from() {
        let generated = NgramIndex::build(&tokenize_flat("a b x d"), 2).unwrap();
        let reference = NgramIndex::build(&tokenize_flat("a b c d"), 2).unwrap();
        assert_eq!(generated.missing_from(&reference), vec!["b x", "x d"]);
    }
}
