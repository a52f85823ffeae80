//! In-memory model of a method-level debug symbol store.
//!
//! This module defines the tree that a decoder produces from an existing symbol store, that
//! [`crate::remap`] rewrites, and that [`crate::emit`] serializes to a new store.
//!
//! # Architecture
//!
//! ```text
//! DebugInfo
//! ├── documents: [SourceDocument]            (arena, addressed by DocumentId)
//! ├── entry_point: Option<Token>
//! └── functions: [SymFunction]
//!     ├── token, slot_token
//!     ├── lines: [DocumentLines]             (document id + ordered SequencePoints)
//!     ├── scope: SymScope                    (exactly one root)
//!     │   ├── variables: [SymVariable]
//!     │   ├── constants: [SymConstant]
//!     │   └── scopes: [SymScope]             (strictly nested)
//!     ├── constants: [SymConstant]           (method level)
//!     ├── iterator_class: String
//!     └── iterator_scopes: [IteratorScope]
//! ```
//!
//! Documents live in an arena owned by [`DebugInfo`] so that any number of line groups, in
//! any number of functions, can refer to the same document and observe a single rename.
//!
//! # Lifecycle
//!
//! A tree is built once by a [`DebugInfoSource`], remapped once, emitted once and dropped.
//! Nothing in it is shared across rewrites.

mod constant;
mod document;
mod function;
mod info;
mod lines;
mod scope;

pub use constant::{ConstantValue, SymConstant};
pub use document::{
    DocumentId, SourceDocument, DOCUMENT_TYPE_TEXT, LANGUAGE_BASIC, LANGUAGE_CSHARP,
    VENDOR_MICROSOFT,
};
pub use function::{IteratorScope, SymFunction};
pub use info::{DebugInfo, DebugInfoSource};
pub use lines::{DocumentLines, SequencePoint, HIDDEN_LINE};
pub use scope::{SymScope, SymVariable, VariableAttributes};
