//! Decoder for custom metadata blobs.
//!
//! Walks a blob written under the [`crate::customdebuginfo::CUSTOM_METADATA_ATTRIBUTE`]
//! attribute back into [`CustomMetadata`] records, checking every structural field: versions,
//! record sizes, counts, NUL terminators and zero padding. It is the inverse of the encoders
//! in [`crate::customdebuginfo`] and is used to verify emitted blobs.

use widestring::U16CStr;

use crate::{
    customdebuginfo::types::{
        CustomMetadata, CustomMetadataKind, CUSTOM_METADATA_VERSION, RECORD_HEADER_SIZE,
    },
    symbols::IteratorScope,
    utils::Parser,
    Result,
};

/// Parser for custom metadata blobs.
pub struct CustomMetadataParser<'a> {
    /// Binary data parser for reading blob data
    parser: Parser<'a>,
}

impl<'a> CustomMetadataParser<'a> {
    /// Creates a new parser for the given blob.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        CustomMetadataParser {
            parser: Parser::new(data),
        }
    }

    /// Parse the blob header and all records.
    ///
    /// # Errors
    /// - [`crate::Error::OutOfBounds`] if the blob is truncated
    /// - [`crate::Error::Malformed`] if a header, size, count or padding is inconsistent
    pub fn parse(&mut self) -> Result<Vec<CustomMetadata>> {
        let version = self.parser.read_le::<u8>()?;
        if version != CUSTOM_METADATA_VERSION {
            return Err(malformed_error!(
                "Unsupported custom metadata version - {}",
                version
            ));
        }

        let count = self.parser.read_le::<u8>()?;
        self.expect_zero_padding()?;

        let mut records = Vec::with_capacity(count as usize);
        for _ in 0..count {
            records.push(self.parse_record()?);
        }

        if self.parser.has_more_data() {
            return Err(malformed_error!(
                "{} trailing bytes after {} custom metadata records",
                self.parser.remaining(),
                count
            ));
        }

        Ok(records)
    }

    fn parse_record(&mut self) -> Result<CustomMetadata> {
        let start = self.parser.pos();

        let version = self.parser.read_le::<u8>()?;
        if version != CUSTOM_METADATA_VERSION {
            return Err(malformed_error!(
                "Unsupported custom metadata record version - {}",
                version
            ));
        }

        let kind = self.parser.read_le::<u8>()?;
        self.expect_zero_padding()?;

        let size = self.parser.read_le::<u32>()? as usize;
        if size < RECORD_HEADER_SIZE || size % 4 != 0 {
            return Err(malformed_error!(
                "Invalid custom metadata record size {} at offset {}",
                size,
                start
            ));
        }

        let payload = self.parser.read_bytes(size - RECORD_HEADER_SIZE)?;
        match CustomMetadataKind::from_repr(kind) {
            Some(CustomMetadataKind::ForwardIterator) => Self::parse_iterator_class(payload),
            Some(CustomMetadataKind::IteratorScopes) => Self::parse_iterator_scopes(payload),
            _ => Ok(CustomMetadata::Unknown {
                kind,
                data: payload.to_vec(),
            }),
        }
    }

    fn parse_iterator_class(payload: &[u8]) -> Result<CustomMetadata> {
        if payload.len() % 2 != 0 {
            return Err(malformed_error!("Iterator class payload has odd length"));
        }

        let units: Vec<u16> = payload
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        let name = U16CStr::from_slice_truncate(&units)
            .map_err(|_| malformed_error!("Iterator class name is not NUL terminated"))?;

        let consumed = (name.len() + 1) * 2;
        if payload[consumed..].iter().any(|&b| b != 0) {
            return Err(malformed_error!("Non-zero padding after iterator class name"));
        }
        if payload.len() - consumed >= 4 {
            return Err(malformed_error!(
                "Iterator class record has {} bytes of padding",
                payload.len() - consumed
            ));
        }

        let name = name
            .to_string()
            .map_err(|_| malformed_error!("Iterator class name is not valid UTF-16"))?;

        Ok(CustomMetadata::IteratorClass { name })
    }

    fn parse_iterator_scopes(payload: &[u8]) -> Result<CustomMetadata> {
        let mut parser = Parser::new(payload);
        let count = parser.read_le::<u32>()? as usize;

        let expected = count.checked_mul(8).and_then(|n| n.checked_add(4));
        if expected != Some(payload.len()) {
            return Err(malformed_error!(
                "Iterator scope count {} does not match payload of {} bytes",
                count,
                payload.len()
            ));
        }

        let mut scopes = Vec::with_capacity(count);
        for _ in 0..count {
            let start = parser.read_le::<u32>()?;
            let end = parser.read_le::<u32>()?;
            if end < start {
                return Err(malformed_error!(
                    "Iterator scope ends before it starts - [{}, {})",
                    start,
                    end
                ));
            }
            scopes.push(IteratorScope::new(start, end - start));
        }

        Ok(CustomMetadata::IteratorScopes { scopes })
    }

    fn expect_zero_padding(&mut self) -> Result<()> {
        let padding = self.parser.align(4)?;
        if padding.iter().any(|&b| b != 0) {
            return Err(malformed_error!(
                "Non-zero header padding at offset {}",
                self.parser.pos()
            ));
        }
        Ok(())
    }
}

/// Parse a custom metadata blob into its records.
///
/// # Errors
/// See [`CustomMetadataParser::parse`].
///
/// # Examples
///
/// ```rust
/// use symremap::customdebuginfo::{encode_iterator_class, parse_custom_metadata, CustomMetadata};
///
/// let blob = encode_iterator_class("X")?;
/// let records = parse_custom_metadata(&blob)?;
/// assert_eq!(records, vec![CustomMetadata::IteratorClass { name: "X".to_string() }]);
/// # Ok::<(), symremap::Error>(())
/// ```
pub fn parse_custom_metadata(data: &[u8]) -> Result<Vec<CustomMetadata>> {
    CustomMetadataParser::new(data).parse()
}
