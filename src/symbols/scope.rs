//! Lexical scopes and the local variables they hold.

use bitflags::bitflags;

use crate::{symbols::SymConstant, utils::range_end, Result};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    /// Local variable attributes
    pub struct VariableAttributes: u32 {
        /// Variable was introduced by the compiler and is hidden from the user
        const COMPILER_GENERATED = 0x0001;
    }
}

/// A local variable slot, `(name, slotIndex, flags)`.
///
/// The slot index is positional within the function's local signature; two scopes may name
/// the same slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymVariable {
    /// Variable name
    pub name: String,
    /// Index into the local variable signature
    pub slot: u32,
    /// Variable attributes
    pub attributes: VariableAttributes,
}

impl SymVariable {
    /// Create a user-visible variable.
    #[must_use]
    pub fn new(name: impl Into<String>, slot: u32) -> Self {
        SymVariable {
            name: name.into(),
            slot,
            attributes: VariableAttributes::empty(),
        }
    }

    /// Create a compiler-generated variable.
    #[must_use]
    pub fn compiler_generated(name: impl Into<String>, slot: u32) -> Self {
        SymVariable {
            name: name.into(),
            slot,
            attributes: VariableAttributes::COMPILER_GENERATED,
        }
    }
}

/// A lexical scope covering the half-open IL range `[offset, offset + length)`.
///
/// Child scopes are expected to lie within their parent's range.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SymScope {
    /// First IL offset covered by the scope
    pub offset: u32,
    /// Length of the covered range in bytes
    pub length: u32,
    /// Variables visible in this scope
    pub variables: Vec<SymVariable>,
    /// Constants visible in this scope
    pub constants: Vec<SymConstant>,
    /// Nested scopes
    pub scopes: Vec<SymScope>,
}

impl SymScope {
    /// Create an empty scope over `[offset, offset + length)`.
    #[must_use]
    pub fn new(offset: u32, length: u32) -> Self {
        SymScope {
            offset,
            length,
            ..SymScope::default()
        }
    }

    /// Exclusive end offset of the scope.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidTree`] if `offset + length` overflows.
    pub fn end(&self) -> Result<u32> {
        range_end(self.offset, self.length)
    }

    /// Returns true if `child`'s range lies within this scope's range.
    ///
    /// Ranges that overflow are never contained.
    #[must_use]
    pub fn contains(&self, child: &SymScope) -> bool {
        match (self.end(), child.end()) {
            (Ok(end), Ok(child_end)) => child.offset >= self.offset && child_end <= end,
            _ => false,
        }
    }

    /// Number of scopes in this subtree, including this one.
    #[must_use]
    pub fn scope_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(scope) = pending.pop() {
            count += 1;
            pending.extend(&scope.scopes);
        }
        count
    }

    /// Returns true if this subtree nests more than `limit` levels; a scope without
    /// children is one level.
    ///
    /// Never descends past `limit + 1` levels, and does not recurse.
    #[must_use]
    pub fn exceeds_depth(&self, limit: usize) -> bool {
        let mut pending = vec![(self, 1usize)];
        while let Some((scope, depth)) = pending.pop() {
            if depth > limit {
                return true;
            }
            pending.extend(scope.scopes.iter().map(|child| (child, depth + 1)));
        }
        false
    }
}
