//! Mathematical utility functions.

use crate::Result;

/// Converts a `usize` to `u32` for blob serialization, returning an error if the value
/// exceeds `u32::MAX`.
///
/// # Errors
///
/// Returns an error if `value` exceeds `u32::MAX`.
pub fn to_u32(value: usize) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| invalid_tree_error!("Serialization value {} exceeds u32::MAX", value))
}

/// Rounds `value` up to the next multiple of `alignment`.
///
/// `alignment` must be non-zero.
#[must_use]
pub fn align_up(value: usize, alignment: usize) -> usize {
    value.div_ceil(alignment) * alignment
}

/// Number of padding bytes required after `len` bytes to reach `alignment`.
#[must_use]
pub fn padding_for(len: usize, alignment: usize) -> usize {
    (alignment - (len % alignment)) % alignment
}

/// Computes the exclusive end of the half-open range `[offset, offset + length)`.
///
/// # Errors
///
/// Returns an invalid-tree error if the end does not fit into 32 bits.
pub fn range_end(offset: u32, length: u32) -> Result<u32> {
    offset
        .checked_add(length)
        .ok_or_else(|| invalid_tree_error!("Range 0x{:x}+0x{:x} overflows", offset, length))
}
