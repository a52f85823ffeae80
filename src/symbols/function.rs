//! Per-method debug information.

use crate::{
    symbols::{DocumentLines, SymConstant, SymScope},
    token::Token,
    utils::range_end,
    Result,
};

/// A code range `[offset, offset + length)` of a method that logically belongs to the body
/// of a compiler-generated iterator.
///
/// Debuggers use these ranges to step across `yield`-style suspension points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IteratorScope {
    /// First IL offset of the range
    pub offset: u32,
    /// Length of the range in bytes
    pub length: u32,
}

impl IteratorScope {
    /// Create a new iterator scope.
    #[must_use]
    pub fn new(offset: u32, length: u32) -> Self {
        IteratorScope { offset, length }
    }

    /// Exclusive end offset.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidTree`] if `offset + length` overflows.
    pub fn end(&self) -> Result<u32> {
        range_end(self.offset, self.length)
    }
}

/// Debug information of one method.
///
/// The root scope is a plain field, so every function carries exactly one.
#[derive(Debug, Clone, PartialEq)]
pub struct SymFunction {
    /// `MethodDef` token of the method
    pub token: Token,
    /// Line tables, grouped by document
    pub lines: Vec<DocumentLines>,
    /// Root lexical scope
    pub scope: SymScope,
    /// Method-level constants
    pub constants: Vec<SymConstant>,
    /// Token of the local variable signature
    pub slot_token: Token,
    /// Name of the generated iterator class; empty if the method is not an iterator
    pub iterator_class: String,
    /// Ranges of the method inside the iterator body
    pub iterator_scopes: Vec<IteratorScope>,
}

impl SymFunction {
    /// Create a function with an empty root scope over `[0, length)`.
    #[must_use]
    pub fn new(token: Token, length: u32) -> Self {
        SymFunction {
            token,
            lines: Vec::new(),
            scope: SymScope::new(0, length),
            constants: Vec::new(),
            slot_token: Token::default(),
            iterator_class: String::new(),
            iterator_scopes: Vec::new(),
        }
    }

    /// True if the method is backed by a generated iterator class.
    #[must_use]
    pub fn is_iterator(&self) -> bool {
        !self.iterator_class.is_empty()
    }

    /// Total number of sequence points across all documents.
    #[must_use]
    pub fn sequence_point_count(&self) -> usize {
        self.lines.iter().map(|group| group.lines.len()).sum()
    }
}
