//! Second typing phase: untyped tokens are offered to the format validators

use crate::logging::codes;
use crate::log_success;
use crate::tables::FormatValidatorTable;
use crate::tokens::{TokenSequence, TokenType};
use serde::Serialize;

/// Counts from one post-typing pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PostTypingSummary {
    /// Untyped tokens offered to the validators
    pub examined: usize,
    pub retyped: usize,
    pub still_untyped: usize,
}

/// Retype every `Untyped` token whose text a validator accepts.
///
/// Order, text and positions are left alone, as are tokens the scanner
/// already typed. A token no validator accepts stays `Untyped`, so running
/// the pass again changes nothing.
pub fn apply_format_types(
    tokens: &mut TokenSequence,
    validators: &FormatValidatorTable,
) -> PostTypingSummary {
    let mut summary = PostTypingSummary::default();

    for token in tokens.as_mut_slice().iter_mut().filter(|t| t.is_untyped()) {
        summary.examined += 1;
        match validators.lookup(token.text.as_bytes()) {
            TokenType::Untyped => summary.still_untyped += 1,
            typed => {
                token.token_type = typed;
                summary.retyped += 1;
            }
        }
    }

    log_success!(codes::success::POST_TYPING_COMPLETE, "Post-typing completed",
        "examined" => summary.examined,
        "retyped" => summary.retyped,
        "still_untyped" => summary.still_untyped,
        "validators" => validators.len()
    );

    summary
}
