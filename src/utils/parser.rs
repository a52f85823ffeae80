//! Cursor over a byte slice used to decode symbol blobs.
//!
//! A trimmed down relative of a general binary parser: position tracking, alignment,
//! little-endian reads and raw slices, all bounds checked.

use crate::{
    utils::io::{read_le_at, SymIO},
    Error::OutOfBounds,
    Result,
};

/// A bounds-checked reading cursor over a byte slice.
pub struct Parser<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Total length of the underlying data.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the underlying data is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true if unread bytes remain.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Current position.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Move the position forward to the next multiple of `alignment`, returning the
    /// skipped bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the padding runs past the data.
    pub fn align(&mut self, alignment: usize) -> Result<&'a [u8]> {
        let padding = (alignment - (self.position % alignment)) % alignment;
        self.read_bytes(padding)
    }

    /// Read a type `T` in little-endian format and advance the position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if reading would exceed the data length.
    pub fn read_le<T: SymIO>(&mut self) -> Result<T> {
        read_le_at::<T>(self.data, &mut self.position)
    }

    /// Read `length` raw bytes and advance the position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if reading would exceed the data length.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        let end = self.position.checked_add(length).ok_or(OutOfBounds)?;
        if end > self.data.len() {
            return Err(OutOfBounds);
        }

        let slice = &self.data[self.position..end];
        self.position = end;
        Ok(slice)
    }

    /// All bytes from the current position to the end.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.position.min(self.data.len())..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_reads() {
        let data = [0x04, 0x03, 0x00, 0x00, 0x14, 0x00, 0x00, 0x00];
        let mut parser = Parser::new(&data);
        assert_eq!(parser.read_le::<u8>().unwrap(), 4);
        assert_eq!(parser.read_le::<u8>().unwrap(), 3);
        assert_eq!(parser.align(4).unwrap(), &[0, 0]);
        assert_eq!(parser.read_le::<u32>().unwrap(), 20);
        assert!(!parser.has_more_data());
        assert_eq!(parser.remaining(), 0);
    }

    #[test]
    fn test_align_noop_when_aligned() {
        let data = [0u8; 4];
        let mut parser = Parser::new(&data);
        assert!(parser.align(4).unwrap().is_empty());
        assert_eq!(parser.pos(), 0);
    }

    #[test]
    fn test_out_of_bounds() {
        let data = [0x01, 0x02];
        let mut parser = Parser::new(&data);
        assert!(parser.read_le::<u32>().is_err());
        assert_eq!(parser.pos(), 0);
        parser.read_le::<u8>().unwrap();
        assert!(parser.align(4).is_err());
        assert_eq!(parser.rest(), &[0x02]);
    }
}
