//! Assembly options and configuration.

use super::OrderPolicy;

/// Options for ordering pages of a document.
#[derive(Debug, Clone, Default)]
pub struct AssembleOptions {
    /// Ordering policy applied to every page
    pub policy: OrderPolicy,

    /// Whether pages are ordered on the rayon pool
    pub parallel: bool,
}

impl AssembleOptions {
    /// Create new assemble options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ordering policy.
    pub fn with_policy(mut self, policy: OrderPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enable or disable parallel page ordering.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Order the evaluation way: headers dropped, top to bottom.
    pub fn header_aware(self) -> Self {
        self.with_policy(OrderPolicy::TopToBottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = AssembleOptions::default();
        assert_eq!(options.policy, OrderPolicy::ReadingOrder);
        assert!(!options.parallel);
    }

    #[test]
    fn test_assemble_options_builder() {
        let options = AssembleOptions::new().header_aware().with_parallel(true);
        assert_eq!(options.policy, OrderPolicy::TopToBottom);
        assert!(options.parallel);
    }
}
