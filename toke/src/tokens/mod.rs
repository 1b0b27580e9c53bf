//! Token types produced by the scanner
//!
//! A [`Token`] pairs the scanned text with its [`TokenType`] and the position
//! of its first byte. The scanner emits tokens into a [`TokenSequence`] in
//! input order; the post-typing pass may later rewrite the type of tokens
//! left [`TokenType::Untyped`], but never reorders, inserts, or removes them.

pub mod sequence;
pub mod token;

pub use sequence::{SequenceError, TokenSequence};
pub use token::{Token, TokenType, UNTYPED_LABEL};

pub use crate::utils::Position;
