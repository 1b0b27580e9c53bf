//! Table-driven lexical scanner
//!
//! Callers register reserved literals and format validators on a
//! [`Session`], then scan byte sources into a [`TokenSequence`]. Anything the
//! reserved table does not match comes out untyped, and a post-typing pass
//! offers those tokens to the validators.

pub mod config;
pub mod file_processor;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod session;
pub mod tables;
pub mod text;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use lexical::{apply_format_types, tokenize, CharSource, ScanError, Scanner};
pub use session::{Session, SessionError, TokenDefinitions};
pub use tables::{FormatValidatorTable, ReservedTokenTable, StandardFormat};
pub use text::TextSpan;
pub use tokens::{Token, TokenSequence, TokenType};
