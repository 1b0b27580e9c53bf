//! Ordered, growable token sequence

use super::token::{Token, TokenType};
use crate::config::compile_time::text::{GROWTH_FACTOR, INITIAL_CAPACITY};
use crate::logging::{codes, Code};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    #[error("Out of memory growing token sequence to {requested} tokens")]
    OutOfMemory { requested: usize },
}

impl SequenceError {
    pub fn error_code(&self) -> Code {
        match self {
            SequenceError::OutOfMemory { .. } => codes::system::MEMORY_ALLOCATION_FAILURE,
        }
    }
}

/// Tokens in emission order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TokenSequence {
    tokens: Vec<Token>,
}

impl TokenSequence {
    pub const fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    /// Append a token, doubling capacity when full
    pub fn push(&mut self, token: Token) -> Result<(), SequenceError> {
        if self.tokens.len() == self.tokens.capacity() {
            let current = self.tokens.capacity();
            let target = if current == 0 {
                INITIAL_CAPACITY
            } else {
                current
                    .checked_mul(GROWTH_FACTOR)
                    .ok_or(SequenceError::OutOfMemory { requested: usize::MAX })?
            };
            self.tokens
                .try_reserve_exact(target - self.tokens.len())
                .map_err(|_| SequenceError::OutOfMemory { requested: target })?;
        }
        self.tokens.push(token);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.tokens.capacity()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// Mutable access for in-place retyping; the slice cannot change length
    pub(crate) fn as_mut_slice(&mut self) -> &mut [Token] {
        &mut self.tokens
    }

    /// Shrink capacity to the number of tokens
    pub fn fit(&mut self) {
        self.tokens.shrink_to_fit();
    }

    pub fn typed_count(&self) -> usize {
        self.tokens.iter().filter(|t| !t.is_untyped()).count()
    }

    pub fn untyped_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.is_untyped()).count()
    }

    /// Whether any token's text equals `text`
    pub fn has_token_text(&self, text: &[u8]) -> bool {
        self.tokens.iter().any(|t| t.text == *text)
    }

    /// Whether any token has both this type and this text
    pub fn has_token(&self, token_type: &TokenType, text: &[u8]) -> bool {
        self.tokens
            .iter()
            .any(|t| t.token_type == *token_type && t.text == *text)
    }

    /// All token texts joined with nothing between them
    pub fn concatenated_text(&self) -> Vec<u8> {
        self.tokens
            .iter()
            .flat_map(|t| t.text.as_bytes().iter().copied())
            .collect()
    }

    /// Human-readable dump: each token on its own line, followed by a blank line
    pub fn dump(&self) -> String {
        let mut output = String::new();
        for token in &self.tokens {
            output.push('\n');
            output.push_str(&token.to_string());
            output.push_str("\n\n");
        }
        output
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn into_vec(self) -> Vec<Token> {
        self.tokens
    }
}

impl<'a> IntoIterator for &'a TokenSequence {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl IntoIterator for TokenSequence {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}
