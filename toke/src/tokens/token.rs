//! Token and token type definitions

use crate::text::TextSpan;
use crate::utils::Position;
use serde::{Serialize, Serializer};
use std::fmt;

/// Label printed for untyped tokens in token dumps
pub const UNTYPED_LABEL: &str = "NULLTOK";

/// The type of a token: a registered name, or no match at all
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TokenType {
    /// Name of the reserved token or format validator that matched
    Typed(TextSpan<'static>),
    /// Nothing matched (yet)
    #[default]
    Untyped,
}

impl TokenType {
    pub fn typed(name: impl Into<TextSpan<'static>>) -> Self {
        TokenType::Typed(name.into())
    }

    pub fn is_untyped(&self) -> bool {
        matches!(self, TokenType::Untyped)
    }

    pub fn name(&self) -> Option<&TextSpan<'static>> {
        match self {
            TokenType::Typed(name) => Some(name),
            TokenType::Untyped => None,
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Typed(name) => fmt::Display::fmt(name, f),
            TokenType::Untyped => f.write_str(UNTYPED_LABEL),
        }
    }
}

impl Serialize for TokenType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TokenType::Typed(name) => name.serialize(serializer),
            TokenType::Untyped => serializer.serialize_none(),
        }
    }
}

/// A scanned token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub text: TextSpan<'static>,
    /// Position of the token's first byte
    #[serde(flatten)]
    pub position: Position,
}

impl Token {
    pub fn new(token_type: TokenType, text: TextSpan<'static>, position: Position) -> Self {
        Self {
            token_type,
            text,
            position,
        }
    }

    pub fn line(&self) -> u32 {
        self.position.line
    }

    /// 1-based column of the first byte
    pub fn column(&self) -> u32 {
        self.position.column
    }

    pub fn is_untyped(&self) -> bool {
        self.token_type.is_untyped()
    }
}

/// Renders `[Type]:<type>\t[Line]:<line>\t[At]:<column>\t[Text]:<text>`
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Type]:{}\t[Line]:{}\t[At]:{}\t[Text]:{}",
            self.token_type,
            self.line(),
            self.column(),
            self.text
        )
    }
}
