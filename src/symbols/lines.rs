//! Sequence points grouped by source document.
//!
//! A sequence point maps an IL offset of a method to a line/column range of a source file.
//! Line tables are kept per document: a [`DocumentLines`] group holds the points that belong
//! to one document, in the order the compiler produced them (monotonic by offset). Nothing in
//! this crate reorders, merges within, or filters a group's points.
//!
//! # Hidden Sequence Points
//!
//! A sequence point is considered hidden if its start line is `0xFEEFEE`. This is used to mark
//! compiler-generated or non-user code, and such points are emitted like any other.

use crate::symbols::DocumentId;

/// Start line marking a hidden sequence point.
pub const HIDDEN_LINE: u32 = 0x00FE_EFEE;

/// Represents a single sequence point mapping IL offset to source code location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencePoint {
    /// Offset in the method's IL stream.
    pub il_offset: u32,
    /// Starting line in the source file.
    pub start_line: u32,
    /// Starting column in the source file.
    pub start_col: u16,
    /// Ending line in the source file.
    pub end_line: u32,
    /// Ending column in the source file.
    pub end_col: u16,
}

impl SequencePoint {
    /// Create a new sequence point.
    #[must_use]
    pub fn new(il_offset: u32, start_line: u32, start_col: u16, end_line: u32, end_col: u16) -> Self {
        SequencePoint {
            il_offset,
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Create a hidden sequence point at `il_offset`.
    #[must_use]
    pub fn hidden(il_offset: u32) -> Self {
        SequencePoint::new(il_offset, HIDDEN_LINE, 0, HIDDEN_LINE, 0)
    }

    /// True if this is a hidden sequence point (start_line == 0xFEEFEE).
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.start_line == HIDDEN_LINE
    }
}

/// The sequence points of one function that belong to one source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLines {
    /// The document these points refer to
    pub document: DocumentId,
    /// Sequence points, in original order
    pub lines: Vec<SequencePoint>,
}

impl DocumentLines {
    /// Create a line group for `document`.
    #[must_use]
    pub fn new(document: DocumentId, lines: Vec<SequencePoint>) -> Self {
        DocumentLines { document, lines }
    }

    /// Returns the sequence point for a given IL offset, if any.
    #[must_use]
    pub fn find_by_il_offset(&self, il_offset: u32) -> Option<&SequencePoint> {
        self.lines.iter().find(|sp| sp.il_offset == il_offset)
    }

    /// Returns true if the group holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
