//! Metadata token lookup for the owning program.
//!
//! Symbol records only carry tokens. Sinks and log output that want readable names ask a
//! [`TokenResolver`]; resolution never influences what is emitted.

use std::collections::HashMap;

use crate::token::Token;

/// What a resolver knows about a method or type token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemberDescriptor {
    /// Simple name
    pub name: String,
    /// Full name of the declaring type, if the member has one
    pub declaring_type: Option<String>,
    /// Raw attribute flags of the member
    pub attributes: u32,
    /// Full name of the base type, for type tokens
    pub base_type: Option<String>,
}

impl MemberDescriptor {
    /// Create a descriptor for a member of `declaring_type`.
    #[must_use]
    pub fn member(declaring_type: impl Into<String>, name: impl Into<String>) -> Self {
        MemberDescriptor {
            name: name.into(),
            declaring_type: Some(declaring_type.into()),
            ..MemberDescriptor::default()
        }
    }

    /// `Type::name`, or just the name for members without a declaring type.
    #[must_use]
    pub fn full_name(&self) -> String {
        match &self.declaring_type {
            Some(declaring_type) => format!("{declaring_type}::{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// Lookup service mapping tokens to member information.
pub trait TokenResolver {
    /// Resolve `token`, returning `None` if it is unknown.
    fn resolve(&self, token: Token) -> Option<MemberDescriptor>;

    /// A display label for `token`: the resolved full name, or the token itself.
    fn label(&self, token: Token) -> String {
        self.resolve(token)
            .map_or_else(|| token.to_string(), |member| member.full_name())
    }
}

impl TokenResolver for HashMap<Token, MemberDescriptor> {
    fn resolve(&self, token: Token) -> Option<MemberDescriptor> {
        self.get(&token).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_resolver() {
        let mut names = HashMap::new();
        names.insert(
            Token(0x06000001),
            MemberDescriptor::member("Program", "Main"),
        );
        names.insert(
            Token(0x02000002),
            MemberDescriptor {
                name: "Program".to_string(),
                base_type: Some("System.Object".to_string()),
                ..MemberDescriptor::default()
            },
        );

        assert_eq!(names.label(Token(0x06000001)), "Program::Main");
        assert_eq!(names.label(Token(0x02000002)), "Program");
        assert_eq!(names.label(Token(0x06000009)), "0x06000009");
        assert_eq!(
            names.resolve(Token(0x02000002)).unwrap().base_type.as_deref(),
            Some("System.Object")
        );
    }
}
