//! Little-endian reading and writing utilities for symbol record blobs.
//!
//! Custom metadata blobs are laid out as fixed-width little-endian fields. This module
//! provides bounds-checked reads and writes over byte buffers through the [`SymIO`] trait,
//! so encoders can fill a pre-sized buffer field by field and decoders can walk it back.
//!
//! # Key Components
//!
//! - [`SymIO`] - Trait describing the little-endian byte representation of a primitive
//! - [`read_le_at`] - Read a value at an offset and advance the offset
//! - [`write_le_at`] - Write a value at an offset and advance the offset
//!
//! # Examples
//!
//! ```rust,ignore
//! use symremap::utils::io::{read_le_at, write_le_at};
//!
//! let mut data = [0u8; 6];
//! let mut offset = 0;
//! write_le_at(&mut data, &mut offset, 0x0304u16)?;
//! write_le_at(&mut data, &mut offset, 20u32)?;
//! assert_eq!(data, [0x04, 0x03, 20, 0, 0, 0]);
//!
//! let mut offset = 2;
//! let length: u32 = read_le_at(&data, &mut offset)?;
//! assert_eq!(length, 20);
//! # Ok::<(), symremap::Error>(())
//! ```

use crate::{Error::OutOfBounds, Result};

/// Trait for primitives that can be moved in and out of little-endian byte buffers.
///
/// Implemented for the integer widths that appear in symbol blobs.
pub trait SymIO: Sized + Copy {
    /// Byte array representation of this type.
    type Bytes: AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in little-endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;

    /// Write T to a byte buffer in little-endian
    fn to_le_bytes(self) -> Self::Bytes;
}

macro_rules! impl_sym_io {
    ($($ty:ty => $n:expr),* $(,)?) => {
        $(
            impl SymIO for $ty {
                type Bytes = [u8; $n];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }

                fn to_le_bytes(self) -> Self::Bytes {
                    <$ty>::to_le_bytes(self)
                }
            }
        )*
    };
}

impl_sym_io!(u8 => 1, u16 => 2, u32 => 4, i32 => 4, u64 => 8);

/// Safely reads a value of type `T` in little-endian byte order at a specific offset.
///
/// The offset is advanced by the size of `T` on success and left untouched on failure.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn read_le_at<T: SymIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let end = offset.checked_add(type_len).ok_or(OutOfBounds)?;
    if end > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(OutOfBounds);
    };

    *offset = end;

    Ok(T::from_le_bytes(read))
}

/// Safely writes a value of type `T` in little-endian byte order at a specific offset.
///
/// The offset is advanced by the number of bytes written.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the buffer is too small.
pub fn write_le_at<T: SymIO>(data: &mut [u8], offset: &mut usize, value: T) -> Result<()> {
    let type_len = std::mem::size_of::<T>();
    let end = offset.checked_add(type_len).ok_or(OutOfBounds)?;
    if end > data.len() {
        return Err(OutOfBounds);
    }

    data[*offset..end].copy_from_slice(value.to_le_bytes().as_ref());
    *offset = end;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_BUFFER: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    #[test]
    fn read_le_u8() {
        let mut offset = 0;
        let result: u8 = read_le_at(&TEST_BUFFER, &mut offset).unwrap();
        assert_eq!(result, 0x01);
        assert_eq!(offset, 1);
    }

    #[test]
    fn read_le_u16() {
        let mut offset = 0;
        let result: u16 = read_le_at(&TEST_BUFFER, &mut offset).unwrap();
        assert_eq!(result, 0x0201);
        assert_eq!(offset, 2);
    }

    #[test]
    fn read_le_u32() {
        let mut offset = 4;
        let result: u32 = read_le_at(&TEST_BUFFER, &mut offset).unwrap();
        assert_eq!(result, 0x0807_0605);
        assert_eq!(offset, 8);
    }

    #[test]
    fn read_le_u64() {
        let mut offset = 0;
        let result: u64 = read_le_at(&TEST_BUFFER, &mut offset).unwrap();
        assert_eq!(result, 0x0807_0605_0403_0201);
    }

    #[test]
    fn read_out_of_bounds_keeps_offset() {
        let mut offset = 6;
        let result = read_le_at::<u32>(&TEST_BUFFER, &mut offset);
        assert!(matches!(result, Err(OutOfBounds)));
        assert_eq!(offset, 6);

        let mut offset = usize::MAX;
        assert!(read_le_at::<u8>(&TEST_BUFFER, &mut offset).is_err());
    }

    #[test]
    fn write_le_sequence() {
        let mut data = [0u8; 7];
        let mut offset = 0;
        write_le_at(&mut data, &mut offset, 0x04u8).unwrap();
        write_le_at(&mut data, &mut offset, 0x0201u16).unwrap();
        write_le_at(&mut data, &mut offset, -2i32).unwrap();
        assert_eq!(offset, 7);
        assert_eq!(data, [0x04, 0x01, 0x02, 0xFE, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn write_out_of_bounds() {
        let mut data = [0u8; 3];
        let mut offset = 0;
        assert!(matches!(
            write_le_at(&mut data, &mut offset, 1u32),
            Err(OutOfBounds)
        ));
        assert_eq!(offset, 0);
        assert_eq!(data, [0, 0, 0]);
    }
}
