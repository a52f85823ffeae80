//! Custom metadata record types.

use strum::{Display, FromRepr};

use crate::symbols::IteratorScope;

/// Symbol attribute name under which custom metadata blobs are attached to a method.
pub const CUSTOM_METADATA_ATTRIBUTE: &str = "MD2";

/// Format version written in both the blob header and every record header.
pub const CUSTOM_METADATA_VERSION: u8 = 4;

/// Number of records following the blob header; every blob written here holds one.
pub const CUSTOM_METADATA_RECORD_COUNT: u8 = 1;

/// Size of the blob header: version, record count, two bytes of padding.
pub const BLOB_HEADER_SIZE: usize = 4;

/// Size of a record header: version, kind, two bytes of padding, 4-byte record length.
pub const RECORD_HEADER_SIZE: usize = 8;

/// Record kinds of the custom metadata channel.
///
/// Only [`CustomMetadataKind::IteratorScopes`] and [`CustomMetadataKind::ForwardIterator`]
/// are produced by this crate; the other kinds are recognized when decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, FromRepr)]
#[repr(u8)]
pub enum CustomMetadataKind {
    /// Namespace usage counts
    UsingInfo = 0,
    /// Forward to another method's namespace information
    ForwardInfo = 1,
    /// Forward to the module-level namespace information
    ForwardToModuleInfo = 2,
    /// Ranges of the method inside the generated iterator body
    IteratorScopes = 3,
    /// Name of the generated iterator class
    ForwardIterator = 4,
}

/// A decoded custom metadata record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomMetadata {
    /// Name of the compiler-generated iterator class of a method
    IteratorClass {
        /// The generated type name
        name: String,
    },

    /// Ranges of a method that lie inside its iterator body
    IteratorScopes {
        /// The decoded ranges, in blob order
        scopes: Vec<IteratorScope>,
    },

    /// A record of any other kind
    Unknown {
        /// Raw record kind byte
        kind: u8,
        /// Record payload following the record header
        data: Vec<u8>,
    },
}

impl CustomMetadata {
    /// Raw kind byte of the record.
    #[must_use]
    pub fn kind(&self) -> u8 {
        match self {
            CustomMetadata::IteratorClass { .. } => CustomMetadataKind::ForwardIterator as u8,
            CustomMetadata::IteratorScopes { .. } => CustomMetadataKind::IteratorScopes as u8,
            CustomMetadata::Unknown { kind, .. } => *kind,
        }
    }

    /// Check if this is a record kind with a dedicated decoding.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, CustomMetadata::Unknown { .. })
    }
}
