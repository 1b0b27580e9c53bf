//! Scanning pipeline: character sources, the scanner, and post-typing

pub mod post_typing;
pub mod scanner;
pub mod source;

pub use post_typing::{apply_format_types, PostTypingSummary};
pub use scanner::{ScanError, ScanMetrics, Scanner};
pub use source::{CharSource, ReaderSource, SliceSource};

use crate::tables::{FormatValidatorTable, ReservedTokenTable};
use crate::tokens::TokenSequence;

/// Scan `source` and post-type the result with default preferences
pub fn tokenize<S: CharSource + ?Sized>(
    source: &mut S,
    reserved: &ReservedTokenTable,
    validators: &FormatValidatorTable,
) -> Result<TokenSequence, ScanError> {
    let mut tokens = Scanner::new().scan(source, reserved)?;
    apply_format_types(&mut tokens, validators);
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::formats;
    use crate::tokens::TokenType;

    #[test]
    fn test_tokenize_runs_both_phases() {
        let mut reserved = ReservedTokenTable::new();
        reserved.install_sentinel();
        reserved.register("EQ", "=");
        let mut validators = FormatValidatorTable::new();
        validators.register("INTEGER", formats::is_integer);

        let tokens = tokenize(&mut SliceSource::from("x=42"), &reserved, &validators).unwrap();

        assert_eq!(tokens.len(), 3);
        assert!(tokens.has_token(&TokenType::Untyped, b"x"));
        assert!(tokens.has_token(&TokenType::typed("EQ"), b"="));
        assert!(tokens.has_token(&TokenType::typed("INTEGER"), b"42"));
    }
}
