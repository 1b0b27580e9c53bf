//! Table-driven scanner
//!
//! One pass over the source, one byte of lookahead:
//!
//! 1. Newlines and spaces are consumed without emitting anything.
//! 2. A byte registered as a one-byte reserved literal is emitted on its own.
//! 3. Anything else starts a run that extends until a space, a newline, the
//!    end of input, or a one-byte reserved literal. The whole run is then
//!    looked up, so a multi-byte reserved literal only matches a complete run.
//!
//! The byte that ends a run is left in the source and handled by the next
//! iteration at its own position.

use crate::config::compile_time::scanner::{LONG_IDENTIFIER_THRESHOLD, METRICS_USAGE_CAPACITY};
use crate::config::runtime::ScannerPreferences;
use crate::lexical::source::CharSource;
use crate::logging::{codes, Code};
use crate::tables::ReservedTokenTable;
use crate::text::{TextError, TextSpan};
use crate::tokens::{SequenceError, Token, TokenSequence, TokenType};
use crate::utils::Position;
use crate::{log_debug, log_error, log_success, log_warning};
use serde::Serialize;
use std::collections::HashMap;

/// Scanning fails only when a buffer cannot grow
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("Out of memory growing {buffer} to {requested} elements")]
    OutOfMemory {
        buffer: &'static str,
        requested: usize,
    },
}

impl ScanError {
    pub fn error_code(&self) -> Code {
        match self {
            ScanError::OutOfMemory { .. } => codes::system::MEMORY_ALLOCATION_FAILURE,
        }
    }
}

impl From<TextError> for ScanError {
    fn from(error: TextError) -> Self {
        match error {
            TextError::OutOfMemory { requested } => ScanError::OutOfMemory {
                buffer: "token text",
                requested,
            },
        }
    }
}

impl From<SequenceError> for ScanError {
    fn from(error: SequenceError) -> Self {
        match error {
            SequenceError::OutOfMemory { requested } => ScanError::OutOfMemory {
                buffer: "token sequence",
                requested,
            },
        }
    }
}

/// Counters for the most recent scan
#[derive(Debug, Default, Clone, Serialize)]
pub struct ScanMetrics {
    pub total_tokens: usize,
    pub reserved_tokens: usize,
    pub multi_byte_reserved_tokens: usize,
    pub untyped_tokens: usize,
    pub lines: u32,
    pub bytes_consumed: usize,

    // Only collected with `collect_detailed_metrics`
    pub longest_run: usize,
    pub long_runs: usize,

    // Only collected with `track_reserved_usage`
    pub reserved_usage: HashMap<String, usize>,
}

impl ScanMetrics {
    fn record_token(&mut self, token: &Token, preferences: &ScannerPreferences) {
        self.total_tokens += 1;

        match &token.token_type {
            TokenType::Untyped => self.untyped_tokens += 1,
            TokenType::Typed(name) => {
                self.reserved_tokens += 1;
                if token.text.len() > 1 {
                    self.multi_byte_reserved_tokens += 1;
                }
                if preferences.track_reserved_usage {
                    *self.reserved_usage.entry(name.to_string()).or_insert(0) += 1;
                }
            }
        }
    }

    fn record_run(&mut self, length: usize, preferences: &ScannerPreferences) {
        if preferences.collect_detailed_metrics {
            self.longest_run = self.longest_run.max(length);
            if length > LONG_IDENTIFIER_THRESHOLD {
                self.long_runs += 1;
            }
        }
    }
}

/// Byte cursor with one byte of lookahead and position tracking
struct Cursor<'s, S: ?Sized> {
    source: &'s mut S,
    peeked: Option<Option<u8>>,
    position: Position,
}

impl<'s, S: CharSource + ?Sized> Cursor<'s, S> {
    fn new(source: &'s mut S) -> Self {
        Self {
            source,
            peeked: None,
            position: Position::start(),
        }
    }

    fn peek(&mut self) -> Option<u8> {
        if self.peeked.is_none() {
            self.peeked = Some(self.source.next_char());
        }
        self.peeked.flatten()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.peeked = None;
        self.position = self.position.advance(byte);
        Some(byte)
    }
}

fn is_separator(byte: u8) -> bool {
    byte == b' ' || byte == b'\n'
}

/// Scanner holding the preferences and metrics of its most recent scan
pub struct Scanner {
    metrics: ScanMetrics,
    preferences: ScannerPreferences,
}

impl Scanner {
    pub fn new() -> Self {
        Self::with_preferences(ScannerPreferences::default())
    }

    pub fn with_preferences(preferences: ScannerPreferences) -> Self {
        Self {
            metrics: ScanMetrics::default(),
            preferences,
        }
    }

    /// Scan a source that may be absent; an absent source yields no tokens
    pub fn scan_optional<S: CharSource + ?Sized>(
        &mut self,
        source: Option<&mut S>,
        reserved: &ReservedTokenTable,
    ) -> Result<TokenSequence, ScanError> {
        match source {
            Some(source) => self.scan(source, reserved),
            None => {
                self.metrics = ScanMetrics::default();
                log_debug!("No character source supplied; nothing to scan");
                Ok(TokenSequence::new())
            }
        }
    }

    /// Scan `source` to its end. Every input produces a sequence; the only
    /// failure is running out of memory.
    pub fn scan<S: CharSource + ?Sized>(
        &mut self,
        source: &mut S,
        reserved: &ReservedTokenTable,
    ) -> Result<TokenSequence, ScanError> {
        self.metrics = ScanMetrics {
            reserved_usage: if self.preferences.track_reserved_usage {
                HashMap::with_capacity(METRICS_USAGE_CAPACITY)
            } else {
                HashMap::new()
            },
            ..Default::default()
        };

        log_debug!("Starting scan",
            "reserved_entries" => reserved.len(),
            "long_run_threshold" => LONG_IDENTIFIER_THRESHOLD
        );

        let mut cursor = Cursor::new(source);
        let mut tokens = TokenSequence::new();

        if let Err(error) = self.scan_into(&mut cursor, reserved, &mut tokens) {
            log_error!(error.error_code(), "Scan aborted",
                position = cursor.position,
                "tokens_emitted" => tokens.len(),
                "error" => &error
            );
            return Err(error);
        }

        self.metrics.lines = cursor.position.line;
        self.metrics.bytes_consumed = cursor.position.offset;

        log_success!(codes::success::SCAN_COMPLETE, "Scan completed",
            "tokens" => self.metrics.total_tokens,
            "reserved" => self.metrics.reserved_tokens,
            "multi_byte_reserved" => self.metrics.multi_byte_reserved_tokens,
            "untyped" => self.metrics.untyped_tokens,
            "lines" => self.metrics.lines,
            "bytes" => self.metrics.bytes_consumed
        );

        Ok(tokens)
    }

    fn scan_into<S: CharSource + ?Sized>(
        &mut self,
        cursor: &mut Cursor<'_, S>,
        reserved: &ReservedTokenTable,
        tokens: &mut TokenSequence,
    ) -> Result<(), ScanError> {
        while let Some(byte) = cursor.peek() {
            let start = cursor.position;

            if is_separator(byte) {
                cursor.bump();
                continue;
            }

            let token = if reserved.is_reserved_byte(byte) {
                cursor.bump();
                let entry = reserved.lookup(&[byte]);
                Token::new(entry.token_type.clone(), TextSpan::copied(&[byte])?, start)
            } else {
                let run = self.accumulate_run(cursor, reserved)?;
                let token_type = reserved.lookup(run.as_bytes()).token_type.clone();
                self.check_run_length(&run, &token_type, start);
                Token::new(token_type, run, start)
            };

            self.emit(tokens, token)?;
        }
        Ok(())
    }

    /// Consume bytes up to, but not including, the next boundary byte
    fn accumulate_run<S: CharSource + ?Sized>(
        &mut self,
        cursor: &mut Cursor<'_, S>,
        reserved: &ReservedTokenTable,
    ) -> Result<TextSpan<'static>, ScanError> {
        let mut run = TextSpan::with_capacity(0)?;
        while let Some(byte) = cursor.peek() {
            if is_separator(byte) || reserved.is_reserved_byte(byte) {
                break;
            }
            run.push(byte)?;
            cursor.bump();
        }
        self.metrics.record_run(run.len(), &self.preferences);
        Ok(run)
    }

    fn check_run_length(&self, run: &TextSpan<'_>, token_type: &TokenType, start: Position) {
        if run.len() > LONG_IDENTIFIER_THRESHOLD
            && token_type.is_untyped()
            && self.preferences.warn_on_long_identifiers
        {
            log_warning!(codes::scanning::LONG_IDENTIFIER, "Untyped run exceeds length threshold",
                position = start,
                "length" => run.len(),
                "threshold" => LONG_IDENTIFIER_THRESHOLD
            );
        }
    }

    fn emit(&mut self, tokens: &mut TokenSequence, token: Token) -> Result<(), ScanError> {
        self.metrics.record_token(&token, &self.preferences);

        if self.preferences.log_token_events {
            log_debug!("Token emitted",
                "type" => &token.token_type,
                "text" => &token.text,
                "line" => token.line(),
                "column" => token.column()
            );
        }

        tokens.push(token)?;
        Ok(())
    }

    pub fn metrics(&self) -> &ScanMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &ScannerPreferences {
        &self.preferences
    }

    pub fn set_preferences(&mut self, preferences: ScannerPreferences) {
        self.preferences = preferences;
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}
