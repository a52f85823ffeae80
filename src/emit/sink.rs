//! The emission protocol a symbol backend implements.
//!
//! # Protocol
//!
//! ```text
//! SetUserEntryPoint?                          before the first method
//! per function:
//!   DefineDocument*                           each document on first use, returns a handle
//!   OpenMethod(token)
//!     DefineSequencePoints(handle, batch)*    one batch per document
//!     OpenScope(offset)                       exactly one root scope
//!       DefineLocalVariable* DefineConstant*
//!       OpenScope ... CloseScope              children, strictly nested
//!     CloseScope(offset + length)
//!     SetSymbolAttribute("MD2", blob){0,2}
//!   CloseMethod
//! Close | Abort
//! ```
//!
//! Calls that do not nest correctly leave a native backend in an undefined state. The
//! [`crate::emit::SymbolEmitter`] only ever issues well-nested calls; the
//! [`crate::emit::RecordingSink`] rejects anything else.

use std::fmt;

use strum::{Display, FromRepr};

use crate::{
    symbols::{ConstantValue, SequencePoint, SourceDocument, VariableAttributes},
    token::Token,
    Result,
};

/// Opaque handle a sink returns for a registered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentHandle(pub u32);

impl fmt::Display for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc{}", self.0)
    }
}

/// How the address fields of a local variable are to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, FromRepr)]
#[repr(u32)]
pub enum AddressKind {
    /// The first address field is an index into the local signature
    IlOffset = 1,
}

/// All sequence points of one function in one document, as five parallel arrays.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SequencePointBatch {
    /// IL offsets
    pub offsets: Vec<u32>,
    /// Start lines
    pub start_lines: Vec<u32>,
    /// Start columns
    pub start_columns: Vec<u16>,
    /// End lines
    pub end_lines: Vec<u32>,
    /// End columns
    pub end_columns: Vec<u16>,
}

impl SequencePointBatch {
    /// Create an empty batch.
    #[must_use]
    pub fn new() -> Self {
        SequencePointBatch::default()
    }

    /// Append one point to all five arrays.
    pub fn push(&mut self, point: &SequencePoint) {
        self.offsets.push(point.il_offset);
        self.start_lines.push(point.start_line);
        self.start_columns.push(point.start_col);
        self.end_lines.push(point.end_line);
        self.end_columns.push(point.end_col);
    }

    /// Append points, keeping their order.
    pub fn extend<'a>(&mut self, points: impl IntoIterator<Item = &'a SequencePoint>) {
        for point in points {
            self.push(point);
        }
    }

    /// Number of points in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Returns true if the batch holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Returns true if all five arrays have the same length.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let len = self.offsets.len();
        self.start_lines.len() == len
            && self.start_columns.len() == len
            && self.end_lines.len() == len
            && self.end_columns.len() == len
    }

    /// Iterate the batch as sequence points.
    ///
    /// Stops at the shortest array if the batch is not [consistent](Self::is_consistent).
    pub fn points(&self) -> impl Iterator<Item = SequencePoint> + '_ {
        self.offsets
            .iter()
            .zip(&self.start_lines)
            .zip(&self.start_columns)
            .zip(&self.end_lines)
            .zip(&self.end_columns)
            .map(|((((&offset, &start_line), &start_col), &end_line), &end_col)| {
                SequencePoint::new(offset, start_line, start_col, end_line, end_col)
            })
    }
}

impl<'a> FromIterator<&'a SequencePoint> for SequencePointBatch {
    fn from_iter<I: IntoIterator<Item = &'a SequencePoint>>(iter: I) -> Self {
        let mut batch = SequencePointBatch::new();
        batch.extend(iter);
        batch
    }
}

/// Arguments of a `DefineLocalVariable` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalVariableDef<'a> {
    /// Variable name
    pub name: &'a str,
    /// Variable attributes
    pub attributes: VariableAttributes,
    /// Token of the function's local signature
    pub signature: Token,
    /// Interpretation of `slot`
    pub address_kind: AddressKind,
    /// Slot index in the local signature
    pub slot: u32,
    /// First IL offset the variable is visible at
    pub start_offset: u32,
    /// Exclusive end of the visibility range
    pub end_offset: u32,
}

/// A symbol store backend.
///
/// Implementations receive the calls of one rewrite in protocol order and persist them. A
/// failing call aborts the rewrite: it is never retried, and the caller follows up with
/// [`SymbolSink::abort`].
pub trait SymbolSink {
    /// Register a source document and return the handle later batches refer to.
    ///
    /// # Errors
    /// Backend specific, reported as [`crate::Error::SinkFailure`].
    fn define_document(&mut self, document: &SourceDocument) -> Result<DocumentHandle>;

    /// Record the user entry point method.
    ///
    /// # Errors
    /// Backend specific, reported as [`crate::Error::SinkFailure`].
    fn set_user_entry_point(&mut self, method: Token) -> Result<()>;

    /// Enter the in-method state for `method`.
    ///
    /// # Errors
    /// Backend specific, reported as [`crate::Error::SinkFailure`].
    fn open_method(&mut self, method: Token) -> Result<()>;

    /// Leave the in-method state.
    ///
    /// # Errors
    /// Backend specific, reported as [`crate::Error::SinkFailure`].
    fn close_method(&mut self) -> Result<()>;

    /// Open a lexical scope starting at `start_offset`.
    ///
    /// # Errors
    /// Backend specific, reported as [`crate::Error::SinkFailure`].
    fn open_scope(&mut self, start_offset: u32) -> Result<()>;

    /// Close the innermost open scope at the exclusive `end_offset`.
    ///
    /// # Errors
    /// Backend specific, reported as [`crate::Error::SinkFailure`].
    fn close_scope(&mut self, end_offset: u32) -> Result<()>;

    /// Define all sequence points of the open method that belong to `document`.
    ///
    /// # Errors
    /// Backend specific, reported as [`crate::Error::SinkFailure`].
    fn define_sequence_points(
        &mut self,
        document: DocumentHandle,
        points: &SequencePointBatch,
    ) -> Result<()>;

    /// Define a local variable in the innermost open scope.
    ///
    /// # Errors
    /// Backend specific, reported as [`crate::Error::SinkFailure`].
    fn define_local_variable(&mut self, variable: &LocalVariableDef<'_>) -> Result<()>;

    /// Define a constant in the innermost open scope.
    ///
    /// # Errors
    /// Backend specific, reported as [`crate::Error::SinkFailure`].
    fn define_constant(&mut self, name: &str, value: &ConstantValue, signature: Token)
        -> Result<()>;

    /// Attach a named binary attribute to `parent`.
    ///
    /// # Errors
    /// Backend specific, reported as [`crate::Error::SinkFailure`].
    fn set_symbol_attribute(&mut self, parent: Token, name: &str, data: &[u8]) -> Result<()>;

    /// Finish the store. No further calls are valid.
    ///
    /// # Errors
    /// Backend specific, reported as [`crate::Error::SinkFailure`].
    fn close(&mut self) -> Result<()>;

    /// Release the backend after a failed rewrite. The partial store is invalid.
    fn abort(&mut self) {}
}

impl<S: SymbolSink + ?Sized> SymbolSink for &mut S {
    fn define_document(&mut self, document: &SourceDocument) -> Result<DocumentHandle> {
        (**self).define_document(document)
    }

    fn set_user_entry_point(&mut self, method: Token) -> Result<()> {
        (**self).set_user_entry_point(method)
    }

    fn open_method(&mut self, method: Token) -> Result<()> {
        (**self).open_method(method)
    }

    fn close_method(&mut self) -> Result<()> {
        (**self).close_method()
    }

    fn open_scope(&mut self, start_offset: u32) -> Result<()> {
        (**self).open_scope(start_offset)
    }

    fn close_scope(&mut self, end_offset: u32) -> Result<()> {
        (**self).close_scope(end_offset)
    }

    fn define_sequence_points(
        &mut self,
        document: DocumentHandle,
        points: &SequencePointBatch,
    ) -> Result<()> {
        (**self).define_sequence_points(document, points)
    }

    fn define_local_variable(&mut self, variable: &LocalVariableDef<'_>) -> Result<()> {
        (**self).define_local_variable(variable)
    }

    fn define_constant(
        &mut self,
        name: &str,
        value: &ConstantValue,
        signature: Token,
    ) -> Result<()> {
        (**self).define_constant(name, value, signature)
    }

    fn set_symbol_attribute(&mut self, parent: Token, name: &str, data: &[u8]) -> Result<()> {
        (**self).set_symbol_attribute(parent, name, data)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn abort(&mut self) {
        (**self).abort();
    }
}
