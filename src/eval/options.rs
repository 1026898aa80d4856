//! Evaluation options.

use crate::render::PageSelection;

/// Which side's n-grams are checked against the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissDirection {
    /// Generated n-grams absent from the reference; marks generated tokens
    #[default]
    GeneratedAgainstReference,
    /// Reference n-grams absent from the generated text; marks reference tokens
    ReferenceAgainstGenerated,
    /// Both of the above
    Both,
}

impl MissDirection {
    /// Check if generated tokens are scored.
    pub fn scores_generated(self) -> bool {
        matches!(
            self,
            MissDirection::GeneratedAgainstReference | MissDirection::Both
        )
    }

    /// Check if reference tokens are scored.
    pub fn scores_reference(self) -> bool {
        matches!(
            self,
            MissDirection::ReferenceAgainstGenerated | MissDirection::Both
        )
    }
}

/// Options for evaluating generated text against a reference.
#[derive(Debug, Clone)]
pub struct EvalOptions {
    /// N-gram window size
    pub n: usize,

    /// Which side is scored
    pub direction: MissDirection,

    /// Pages to evaluate
    pub pages: PageSelection,
}

impl EvalOptions {
    /// Create new evaluation options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the window size.
    pub fn with_window(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    /// Set the miss direction.
    pub fn with_direction(mut self, direction: MissDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Set the pages to evaluate.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            n: 4,
            direction: MissDirection::default(),
            pages: PageSelection::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = EvalOptions::default();
        assert_eq!(options.n, 4);
        assert_eq!(options.direction, MissDirection::GeneratedAgainstReference);
    }

    #[test]
    fn test_direction_sides() {
        assert!(MissDirection::Both.scores_generated());
        assert!(MissDirection::Both.scores_reference());
        assert!(!MissDirection::GeneratedAgainstReference.scores_reference());
        assert!(!MissDirection::ReferenceAgainstGenerated.scores_generated());
    }
}
