//! Encoder for the iterator custom metadata blobs.
//!
//! # Blob Layout
//!
//! ```text
//! IteratorClassBlob  ::= 04 01 00 00                 blob header (version, record count)
//!                        04 04 00 00                 record header (version, kind 4)
//!                        u32 size                    align4(10 + 2 * len(name))
//!                        u16 name[len] u16 0         UTF-16LE, NUL terminated
//!                        00 ..                       zero padding to 4 bytes
//!
//! IteratorScopesBlob ::= 04 01 00 00                 blob header
//!                        04 03 00 00                 record header (version, kind 3)
//!                        u32 size                    count * 8 + 12
//!                        u32 count
//!                        (u32 start, u32 end)[count] end = offset + length
//! ```
//!
//! All integers are little-endian. Both encoders size the buffer up front and fill it
//! field by field; padding bytes are the buffer's initial zeros.

use widestring::U16CString;

use crate::{
    customdebuginfo::types::{
        CustomMetadataKind, BLOB_HEADER_SIZE, CUSTOM_METADATA_RECORD_COUNT,
        CUSTOM_METADATA_VERSION, RECORD_HEADER_SIZE,
    },
    symbols::IteratorScope,
    utils::{align_up, io::write_le_at, to_u32},
    Result,
};

/// Record header plus the UTF-16 NUL terminator.
const ITERATOR_CLASS_FIXED_SIZE: usize = RECORD_HEADER_SIZE + 2;

/// Record header plus the scope count.
const ITERATOR_SCOPES_FIXED_SIZE: usize = RECORD_HEADER_SIZE + 4;

/// Bytes per encoded iterator scope.
const ITERATOR_SCOPE_SIZE: usize = 8;

/// Writes the blob header and a record header of `kind`, leaving `offset` at the size field.
fn write_headers(data: &mut [u8], offset: &mut usize, kind: CustomMetadataKind) -> Result<()> {
    write_le_at(data, offset, CUSTOM_METADATA_VERSION)?;
    write_le_at(data, offset, CUSTOM_METADATA_RECORD_COUNT)?;
    *offset = align_up(*offset, 4);

    write_le_at(data, offset, CUSTOM_METADATA_VERSION)?;
    write_le_at(data, offset, kind as u8)?;
    *offset = align_up(*offset, 4);

    Ok(())
}

/// Encode the custom metadata blob naming the generated iterator class of a method.
///
/// # Errors
/// Returns [`crate::Error::InvalidTree`] if `name` contains a NUL character or is too long
/// to be described by a 32-bit record size.
///
/// # Examples
///
/// ```rust
/// use symremap::customdebuginfo::encode_iterator_class;
///
/// let blob = encode_iterator_class("X")?;
/// assert_eq!(
///     blob,
///     [4, 1, 0, 0, 4, 4, 0, 0, 12, 0, 0, 0, b'X', 0, 0, 0]
/// );
/// # Ok::<(), symremap::Error>(())
/// ```
pub fn encode_iterator_class(name: &str) -> Result<Vec<u8>> {
    let wide = U16CString::from_str(name).map_err(|_| {
        invalid_tree_error!("Iterator class name {:?} contains a NUL character", name)
    })?;
    let name_units = wide.len();

    let record_size = align_up(ITERATOR_CLASS_FIXED_SIZE + 2 * name_units, 4);
    let record_size_field = to_u32(record_size)?;

    let mut data = vec![0u8; BLOB_HEADER_SIZE + record_size];
    let mut offset = 0;

    write_headers(&mut data, &mut offset, CustomMetadataKind::ForwardIterator)?;
    write_le_at(&mut data, &mut offset, record_size_field)?;
    for &unit in wide.as_slice_with_nul() {
        write_le_at(&mut data, &mut offset, unit)?;
    }

    Ok(data)
}

/// Encode the custom metadata blob listing the iterator scopes of a method.
///
/// Each scope is written as its `[offset, offset + length)` pair, in the given order.
///
/// # Errors
/// Returns [`crate::Error::InvalidTree`] if a scope's end overflows 32 bits or there are
/// too many scopes for a 32-bit record size.
///
/// # Examples
///
/// ```rust
/// use symremap::customdebuginfo::encode_iterator_scopes;
/// use symremap::symbols::IteratorScope;
///
/// let blob = encode_iterator_scopes(&[IteratorScope::new(5, 20)])?;
/// assert_eq!(
///     blob,
///     [4, 1, 0, 0, 4, 3, 0, 0, 20, 0, 0, 0, 1, 0, 0, 0, 5, 0, 0, 0, 25, 0, 0, 0]
/// );
/// # Ok::<(), symremap::Error>(())
/// ```
pub fn encode_iterator_scopes(scopes: &[IteratorScope]) -> Result<Vec<u8>> {
    let payload = scopes
        .len()
        .checked_mul(ITERATOR_SCOPE_SIZE)
        .ok_or_else(|| invalid_tree_error!("Too many iterator scopes - {}", scopes.len()))?;
    let record_size = ITERATOR_SCOPES_FIXED_SIZE + payload;
    let record_size_field = to_u32(record_size)?;
    let count = to_u32(scopes.len())?;

    let mut data = vec![0u8; BLOB_HEADER_SIZE + record_size];
    let mut offset = 0;

    write_headers(&mut data, &mut offset, CustomMetadataKind::IteratorScopes)?;
    write_le_at(&mut data, &mut offset, record_size_field)?;
    write_le_at(&mut data, &mut offset, count)?;
    for scope in scopes {
        write_le_at(&mut data, &mut offset, scope.offset)?;
        write_le_at(&mut data, &mut offset, scope.end()?)?;
    }

    Ok(data)
}
