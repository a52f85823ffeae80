//! Custom metadata blobs for compiler-generated iterators.
//!
//! Methods implemented through a compiler-generated iterator (state machine) type carry two
//! extra records that debuggers need to step across `yield`-style constructs:
//!
//! - the name of the generated iterator class ([`encode_iterator_class`]), and
//! - the ranges of the method that lie inside the iterator body ([`encode_iterator_scopes`]).
//!
//! Both are attached to the method as raw blobs under the symbol attribute
//! [`CUSTOM_METADATA_ATTRIBUTE`]. A malformed count or misaligned field is not reported by a
//! debugger; it simply misbehaves. The encoders are therefore exact, and every blob can be
//! checked with [`parse_custom_metadata`].
//!
//! # Key Components
//!
//! - [`CustomMetadata`] - Decoded record variants
//! - [`CustomMetadataKind`] - Record kind byte
//! - [`encode_iterator_class`] / [`encode_iterator_scopes`] - Byte-exact encoders
//! - [`parse_custom_metadata`] - Validating decoder
//!
//! # Examples
//!
//! ```rust
//! use symremap::customdebuginfo::{encode_iterator_scopes, parse_custom_metadata, CustomMetadata};
//! use symremap::symbols::IteratorScope;
//!
//! let blob = encode_iterator_scopes(&[IteratorScope::new(5, 20)])?;
//! if let [CustomMetadata::IteratorScopes { scopes }] = &parse_custom_metadata(&blob)?[..] {
//!     assert_eq!(scopes[0].offset, 5);
//!     assert_eq!(scopes[0].length, 20);
//! }
//! # Ok::<(), symremap::Error>(())
//! ```

mod encoder;
mod parser;
mod types;

pub use encoder::{encode_iterator_class, encode_iterator_scopes};
pub use parser::{parse_custom_metadata, CustomMetadataParser};
pub use types::{
    CustomMetadata, CustomMetadataKind, BLOB_HEADER_SIZE, CUSTOM_METADATA_ATTRIBUTE,
    CUSTOM_METADATA_RECORD_COUNT, CUSTOM_METADATA_VERSION, RECORD_HEADER_SIZE,
};
