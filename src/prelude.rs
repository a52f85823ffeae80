//! # symremap Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the symremap library. Import this module to get quick access to everything needed
//! to build a debug-info tree and rewrite it into a new symbol store.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all symremap operations
pub use crate::Error;

/// The result type used throughout symremap
pub use crate::Result;

/// Configuration for a rewrite
pub use crate::RewriteOptions;

/// Metadata token type correlating symbol records with the owning program
pub use crate::token::Token;

// ================================================================================================
// Debug-Info Tree
// ================================================================================================

/// Tree root, documents and the decoder collaborator
pub use crate::symbols::{DebugInfo, DebugInfoSource, DocumentId, SourceDocument};

/// Line tables
pub use crate::symbols::{DocumentLines, SequencePoint};

/// Per-method records
pub use crate::symbols::{
    ConstantValue, IteratorScope, SymConstant, SymFunction, SymScope, SymVariable,
    VariableAttributes,
};

// ================================================================================================
// Rewriting
// ================================================================================================

/// Path mapping and the remapper
pub use crate::remap::{remap_documents, PathMap};

/// Orchestration
pub use crate::rewriter::{RewriteSummary, SymbolRewriter};

// ================================================================================================
// Emission
// ================================================================================================

/// Sink protocol and bundled sinks
pub use crate::emit::{
    DocumentHandle, RecordingSink, SinkSession, SymbolEmitter, SymbolSink, TokenResolver, XmlSink,
};

/// Iterator custom metadata
pub use crate::customdebuginfo::{parse_custom_metadata, CustomMetadata};
