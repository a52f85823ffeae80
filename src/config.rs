//! Rewrite configuration
//!
//! This module provides the options that control how much checking is done on a debug-info
//! tree before it is handed to a symbol sink, and which optional records are emitted.

/// Configuration for a rewrite
///
/// The emitter always enforces:
/// - Registration of every document a line group references
/// - Strict nesting of method and scope calls on the sink
/// - The maximum scope nesting depth
///
/// The remaining checks look at scope and iterator ranges of each function before it is opened
/// on the sink, so that a bad tree fails without leaving a half-written method behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteOptions {
    /// Check scope containment and offset range arithmetic before a function is opened
    pub validate_scopes: bool,

    /// Maximum nesting depth of lexical scopes, the root scope counting as 1 (default: 256)
    pub max_scope_depth: usize,

    /// Forward the user entry point of the tree to the sink
    pub emit_entry_point: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            validate_scopes: true,
            max_scope_depth: 256,
            emit_entry_point: true,
        }
    }
}

impl RewriteOptions {
    /// Creates a configuration with all checks enabled
    #[must_use]
    pub fn strict() -> Self {
        Self::default()
    }

    /// Creates a configuration for trees produced by a decoder that is known to be correct
    ///
    /// Skips range validation. Scope depth is still bounded, since emission recurses per scope.
    /// **Warning**: a tree with an overflowing or misnested range is then only caught by the
    /// sink, possibly after part of the method was written.
    #[must_use]
    pub fn trusted() -> Self {
        Self {
            validate_scopes: false,
            ..Self::default()
        }
    }

    /// Replace the scope depth limit.
    #[must_use]
    pub fn with_max_scope_depth(mut self, depth: usize) -> Self {
        self.max_scope_depth = depth;
        self
    }

    /// Enable or disable forwarding of the user entry point.
    #[must_use]
    pub fn with_entry_point(mut self, emit: bool) -> Self {
        self.emit_entry_point = emit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let default = RewriteOptions::default();
        assert!(default.validate_scopes);
        assert!(default.emit_entry_point);
        assert_eq!(default.max_scope_depth, 256);
        assert_eq!(RewriteOptions::strict(), default);

        let trusted = RewriteOptions::trusted();
        assert!(!trusted.validate_scopes);
        assert_eq!(trusted.max_scope_depth, default.max_scope_depth);
    }

    #[test]
    fn test_builders() {
        let options = RewriteOptions::trusted()
            .with_max_scope_depth(4)
            .with_entry_point(false);
        assert_eq!(options.max_scope_depth, 4);
        assert!(!options.emit_entry_point);
        assert!(!options.validate_scopes);
    }
}
