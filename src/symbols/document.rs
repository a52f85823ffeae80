//! Source documents referenced by line tables.

use std::fmt;

use uguid::{guid, Guid};

/// Language GUID emitted by the C# compiler.
pub const LANGUAGE_CSHARP: Guid = guid!("3f5162f8-07c6-11d3-9053-00c04fa302a1");

/// Language GUID emitted by the Visual Basic compiler.
pub const LANGUAGE_BASIC: Guid = guid!("3a12d0b8-c26c-11d0-b442-00a0244a1dd2");

/// Vendor GUID used by Microsoft compilers.
pub const VENDOR_MICROSOFT: Guid = guid!("994b45c4-e6e9-11d2-903f-00c04fa302a1");

/// Document type GUID for plain text source files.
pub const DOCUMENT_TYPE_TEXT: Guid = guid!("5a869d0b-6611-11d3-bd2a-0000f80849bd");

/// Index of a [`SourceDocument`] inside the document arena of a
/// [`crate::symbols::DebugInfo`].
///
/// Several line groups, possibly in different functions, share one document by holding
/// the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(pub usize);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A source file referenced by sequence points.
///
/// The path is the only field a rewrite ever changes; the three GUIDs are opaque and
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// File path (or URL) of the document
    pub path: String,
    /// Source language
    pub language: Guid,
    /// Language vendor
    pub vendor: Guid,
    /// Document type
    pub document_type: Guid,
}

impl SourceDocument {
    /// Create a C# text document, the combination emitted for the vast majority of inputs.
    #[must_use]
    pub fn csharp(path: impl Into<String>) -> Self {
        SourceDocument {
            path: path.into(),
            language: LANGUAGE_CSHARP,
            vendor: VENDOR_MICROSOFT,
            document_type: DOCUMENT_TYPE_TEXT,
        }
    }

    /// Returns true if this document has the same GUID triple as `other`.
    #[must_use]
    pub fn same_kind(&self, other: &SourceDocument) -> bool {
        self.language == other.language
            && self.vendor == other.vendor
            && self.document_type == other.document_type
    }
}
