//! Broker configuration.

/// Settings that change how declarations are built and how values resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerConfig {
    /// Fall back to the global constant when an unqualified reference inside a namespace is not found
    pub global_fallback: bool,
    /// Maximum number of nested lazy evaluations before giving up
    pub max_resolution_depth: usize,
    /// Record docblock text on declarations
    pub keep_doc_comments: bool,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            global_fallback: true,
            max_resolution_depth: 256,
            keep_doc_comments: true,
        }
    }
}

impl BrokerConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the global constant fallback
    pub fn with_global_fallback(mut self, enabled: bool) -> Self {
        self.global_fallback = enabled;
        self
    }

    /// Set the maximum resolution depth
    pub fn with_max_resolution_depth(mut self, depth: usize) -> Self {
        self.max_resolution_depth = depth;
        self
    }

    /// Keep or drop docblock text
    pub fn with_doc_comments(mut self, keep: bool) -> Self {
        self.keep_doc_comments = keep;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BrokerConfig::default();
        assert!(config.global_fallback);
        assert_eq!(config.max_resolution_depth, 256);
        assert!(config.keep_doc_comments);
    }

    #[test]
    fn test_new_equals_default() {
        assert_eq!(BrokerConfig::new(), BrokerConfig::default());
    }

    #[test]
    fn test_with_global_fallback() {
        let config = BrokerConfig::new().with_global_fallback(false);
        assert!(!config.global_fallback);
        // Other fields unchanged
        assert_eq!(config.max_resolution_depth, 256);
    }

    #[test]
    fn test_builder_chain_all() {
        let config = BrokerConfig::new()
            .with_global_fallback(false)
            .with_max_resolution_depth(8)
            .with_doc_comments(false);
        assert!(!config.global_fallback);
        assert_eq!(config.max_resolution_depth, 8);
        assert!(!config.keep_doc_comments);
    }
}
