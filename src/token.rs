use std::fmt;
use std::hash::{Hash, Hasher};

/// A metadata token correlating debug records with entries of the owning binary.
///
/// Tokens consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the table type
/// - The low 24 bits (bits 0-23) indicate the row index within that table
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Token(pub u32);

impl Token {
    /// Table id of `MethodDef` tokens
    pub const TABLE_METHOD_DEF: u8 = 0x06;
    /// Table id of `TypeDef` tokens
    pub const TABLE_TYPE_DEF: u8 = 0x02;
    /// Table id of `StandAloneSig` tokens, used for local signatures
    pub const TABLE_STANDALONE_SIG: u8 = 0x11;

    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table type from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_parts() {
        let token = Token::new(0x06000001);
        assert_eq!(token.value(), 0x06000001);
        assert_eq!(token.table(), Token::TABLE_METHOD_DEF);
        assert_eq!(token.row(), 1);

        let sig = Token(0x1100_0003);
        assert_eq!(sig.table(), Token::TABLE_STANDALONE_SIG);
        assert_eq!(sig.row(), 3);

        let max_row = Token(0x06FFFFFF);
        assert_eq!(max_row.row(), 0x00FFFFFF);
    }

    #[test]
    fn test_token_is_null() {
        assert!(Token(0).is_null());
        assert!(Token::default().is_null());
        assert!(!Token(0x06000001).is_null());
    }

    #[test]
    fn test_token_conversions() {
        let token: Token = 0x02000005u32.into();
        assert_eq!(token.table(), Token::TABLE_TYPE_DEF);
        let raw: u32 = token.into();
        assert_eq!(raw, 0x02000005);
    }

    #[test]
    fn test_token_formatting() {
        let token = Token(0x06000010);
        assert_eq!(format!("{token}"), "0x06000010");
        assert_eq!(
            format!("{token:?}"),
            "Token(0x06000010, table: 0x06, row: 16)"
        );
    }
}
