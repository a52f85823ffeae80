//! Named constants visible in a scope.

use std::fmt;

use strum::IntoStaticStr;

use crate::token::Token;

/// The value of a symbolic constant.
///
/// The set of representable types is closed: booleans, the standard integer widths,
/// floating point, strings and null.
#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
pub enum ConstantValue {
    /// The null reference
    Null,
    /// `bool`
    Boolean(bool),
    /// `sbyte`
    I1(i8),
    /// `byte`
    U1(u8),
    /// `short`
    I2(i16),
    /// `ushort`
    U2(u16),
    /// `int`
    I4(i32),
    /// `uint`
    U4(u32),
    /// `long`
    I8(i64),
    /// `ulong`
    U8(u64),
    /// `float`
    R4(f32),
    /// `double`
    R8(f64),
    /// `string`
    String(String),
}

impl ConstantValue {
    /// Short name of the value's type, e.g. `"I4"`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Null => write!(f, "null"),
            ConstantValue::Boolean(v) => write!(f, "{v}"),
            ConstantValue::I1(v) => write!(f, "{v}"),
            ConstantValue::U1(v) => write!(f, "{v}"),
            ConstantValue::I2(v) => write!(f, "{v}"),
            ConstantValue::U2(v) => write!(f, "{v}"),
            ConstantValue::I4(v) => write!(f, "{v}"),
            ConstantValue::U4(v) => write!(f, "{v}"),
            ConstantValue::I8(v) => write!(f, "{v}"),
            ConstantValue::U8(v) => write!(f, "{v}"),
            ConstantValue::R4(v) => write!(f, "{v}"),
            ConstantValue::R8(v) => write!(f, "{v}"),
            ConstantValue::String(v) => write!(f, "{v}"),
        }
    }
}

/// A named constant, `(name, value, token)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SymConstant {
    /// Constant name
    pub name: String,
    /// Constant value
    pub value: ConstantValue,
    /// Token of the constant's declared type signature
    pub token: Token,
}

impl SymConstant {
    /// Create a new constant.
    #[must_use]
    pub fn new(name: impl Into<String>, value: ConstantValue, token: Token) -> Self {
        SymConstant {
            name: name.into(),
            value,
            token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(ConstantValue::I4(2).kind(), "I4");
        assert_eq!(ConstantValue::Null.kind(), "Null");
        assert_eq!(ConstantValue::String("x".into()).kind(), "String");
        assert_eq!(ConstantValue::R8(1.5).kind(), "R8");
    }

    #[test]
    fn test_display() {
        assert_eq!(ConstantValue::I4(-2).to_string(), "-2");
        assert_eq!(ConstantValue::Boolean(true).to_string(), "true");
        assert_eq!(ConstantValue::Null.to_string(), "null");
        assert_eq!(ConstantValue::String("pi".into()).to_string(), "pi");
        assert_eq!(ConstantValue::U8(u64::MAX).to_string(), "18446744073709551615");
    }
}
