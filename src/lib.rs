// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # symremap
//!
//! Rewrites the source-document paths recorded in a managed debug-symbol store, keeping
//! every other debug record intact.
//!
//! A build machine bakes its own file paths into the symbols it produces. `symremap` takes
//! the decoded debug information of a program (documents, sequence points, lexical scopes,
//! locals, constants and iterator metadata), renames the documents through a path mapping,
//! and re-emits everything into a fresh symbol store through an abstract backend.
//!
//! ## Features
//!
//! - **Path remapping** - Exact-match, total and idempotent renaming of source documents
//! - **Protocol-correct emission** - Methods and scopes are written in strict stack order,
//!   sequence points are batched per document, each document is registered once
//! - **Byte-exact iterator blobs** - Encoder and validating decoder for the custom metadata
//!   records that describe compiler-generated iterators
//! - **Pluggable backends** - Any [`SymbolSink`] implementation; an in-memory
//!   [`RecordingSink`] and an [`XmlSink`] ship with the crate
//!
//! ## Quick Start
//!
//! ```rust
//! use symremap::prelude::*;
//!
//! let mut info = DebugInfo::new();
//! let doc = info.add_document(SourceDocument::csharp("/home/ci/work/src/Program.cs"));
//! let mut main = SymFunction::new(Token(0x06000001), 0x12);
//! main.lines.push(DocumentLines::new(doc, vec![SequencePoint::new(0, 5, 9, 5, 10)]));
//! main.scope.variables.push(SymVariable::new("a", 0));
//! info.functions.push(main);
//!
//! let map: PathMap = [("/home/ci/work/src/Program.cs", "src/Program.cs")]
//!     .into_iter()
//!     .collect();
//!
//! let mut sink = RecordingSink::new();
//! let summary = SymbolRewriter::default().rewrite(info, &map, &mut sink)?;
//! assert_eq!(summary.documents_remapped, 1);
//! assert_eq!(sink.documents()[0].path, "src/Program.cs");
//! # Ok::<(), symremap::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`symbols`] - The in-memory debug-info tree
//! - [`remap`] - The path remapper
//! - [`customdebuginfo`] - Iterator custom metadata blobs
//! - [`emit`] - The sink protocol, the emitter and the bundled sinks
//! - [`rewriter`] - Remap-then-emit orchestration with guaranteed sink release
//!
//! A rewrite is single-threaded and synchronous. Every error is fatal for the rewrite that
//! produced it; the sink is aborted and its partial output must be discarded.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use symremap::prelude::*;
///
/// let map = PathMap::new();
/// let summary = SymbolRewriter::default().rewrite(DebugInfo::new(), &map, RecordingSink::new())?;
/// assert_eq!(summary.functions, 0);
/// # Ok::<(), symremap::Error>(())
/// ```
pub mod prelude;

/// Rewrite configuration
pub mod config;

/// Custom metadata blobs describing compiler-generated iterators
pub mod customdebuginfo;

/// Symbol emission protocol, emitter and sinks
pub mod emit;

/// Source path remapping
pub mod remap;

/// Remap-then-emit orchestration
pub mod rewriter;

/// The debug-info tree model
pub mod symbols;

/// Metadata tokens
pub mod token;

/// Low-level helpers for blob encoding and decoding
pub mod utils;

/// `symremap` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always
/// [`Error`]. This is used consistently throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type of all operations in this crate
pub use error::Error;

pub use config::RewriteOptions;
pub use emit::{RecordingSink, SymbolEmitter, SymbolSink, XmlSink};
pub use remap::PathMap;
pub use rewriter::{RewriteSummary, SymbolRewriter};
