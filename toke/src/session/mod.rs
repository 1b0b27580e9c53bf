//! Session facade: owns both tables and the most recent scan result
//!
//! Registration happens through `&mut self` and scanning borrows the tables
//! for the whole call, so the tables cannot change while a scan is running.

mod definitions;
mod error;

pub use definitions::{FormatDefinition, FormatRule, ReservedDefinition, TokenDefinitions};
pub use error::SessionError;

use crate::config::runtime::RuntimeConfig;
use crate::file_processor::FileProcessor;
use crate::lexical::{
    apply_format_types, CharSource, PostTypingSummary, ReaderSource, ScanMetrics, Scanner,
    SliceSource,
};
use crate::logging::{self, codes};
use crate::tables::{FormatValidatorTable, ReservedTokenTable, StandardFormat};
use crate::text::TextSpan;
use crate::tokens::TokenSequence;
use crate::{log_error, log_info, log_success, log_warning};
use std::io::Read;
use std::mem;
use std::path::Path;

pub struct Session {
    reserved: ReservedTokenTable,
    validators: FormatValidatorTable,
    scanner: Scanner,
    file_processor: FileProcessor,
    tokens: TokenSequence,
    last_post_typing: Option<PostTypingSummary>,
    files_scanned: usize,
}

impl Session {
    pub fn new() -> Self {
        Self::from_parts(Scanner::new(), FileProcessor::new())
    }

    pub fn with_config(config: &RuntimeConfig) -> Self {
        Self::from_parts(
            Scanner::with_preferences(config.scanner.clone()),
            FileProcessor::from_preferences(&config.file_processor),
        )
    }

    fn from_parts(scanner: Scanner, file_processor: FileProcessor) -> Self {
        let mut reserved = ReservedTokenTable::new();
        reserved.install_sentinel();

        Self {
            reserved,
            validators: FormatValidatorTable::new(),
            scanner,
            file_processor,
            tokens: TokenSequence::new(),
            last_post_typing: None,
            files_scanned: 0,
        }
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register a reserved literal. An empty name is rejected and leaves the
    /// table unchanged. An empty literal is kept with a warning, since no
    /// scanned run is ever empty and so it never matches.
    pub fn register_reserved_token(
        &mut self,
        name: impl Into<TextSpan<'static>>,
        literal: impl Into<TextSpan<'static>>,
    ) -> Result<(), SessionError> {
        let name = name.into();
        let literal = literal.into();

        check_not_empty(&name, "reserved token", "type name")?;
        if literal.is_empty() {
            log_warning!(codes::configuration::UNMATCHABLE_LITERAL,
                "Reserved token has an empty literal and will never match",
                "name" => &name);
        }

        self.reserved.register(name, literal);
        Ok(())
    }

    pub fn register_format_validator<F>(
        &mut self,
        name: impl Into<TextSpan<'static>>,
        predicate: F,
    ) -> Result<(), SessionError>
    where
        F: Fn(&[u8]) -> bool + 'static,
    {
        let name = name.into();
        check_not_empty(&name, "format validator", "type name")?;
        self.validators.register(name, predicate);
        Ok(())
    }

    pub fn register_standard_format(
        &mut self,
        name: impl Into<TextSpan<'static>>,
        format: StandardFormat,
    ) -> Result<(), SessionError> {
        self.register_format_validator(name, format.predicate())
    }

    /// Accept exactly `expected`
    pub fn register_exact_format(
        &mut self,
        name: impl Into<TextSpan<'static>>,
        expected: impl Into<Vec<u8>>,
    ) -> Result<(), SessionError> {
        let name = name.into();
        check_not_empty(&name, "format validator", "type name")?;
        self.validators.register_exact(name, expected);
        Ok(())
    }

    /// Register every definition in order. Definitions are validated first,
    /// so an invalid set registers nothing.
    pub fn load_definitions(&mut self, definitions: &TokenDefinitions) -> Result<(), SessionError> {
        definitions.validate()?;

        for reserved in &definitions.reserved {
            self.register_reserved_token(reserved.name.clone(), reserved.literal.clone())?;
        }
        for format in &definitions.formats {
            match format.rule()? {
                FormatRule::Standard(standard) => {
                    self.register_standard_format(format.name.clone(), standard)?
                }
                FormatRule::Equals(text) => self.register_exact_format(format.name.clone(), text)?,
            }
        }

        self.reserved.fit();
        self.validators.fit();

        log_success!(codes::success::DEFINITIONS_LOADED, "Token definitions loaded",
            "reserved" => definitions.reserved.len(),
            "formats" => definitions.formats.len(),
            "reserved_total" => self.reserved.len(),
            "formats_total" => self.validators.len()
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Scanning
    // ------------------------------------------------------------------

    /// Scan and post-type `source`, replacing any previous result. An absent
    /// source produces an empty sequence.
    pub fn scan<S: CharSource + ?Sized>(
        &mut self,
        source: Option<&mut S>,
    ) -> Result<&TokenSequence, SessionError> {
        self.release();

        let mut tokens = self.scanner.scan_optional(source, &self.reserved)?;
        let summary = apply_format_types(&mut tokens, &self.validators);
        tokens.fit();

        self.tokens = tokens;
        self.last_post_typing = Some(summary);
        Ok(&self.tokens)
    }

    pub fn scan_str(&mut self, text: &str) -> Result<&TokenSequence, SessionError> {
        self.scan_bytes(text.as_bytes())
    }

    pub fn scan_bytes(&mut self, bytes: &[u8]) -> Result<&TokenSequence, SessionError> {
        self.scan(Some(&mut SliceSource::new(bytes)))
    }

    /// Scan a reader to its end. A read error discards the partial result.
    pub fn scan_reader<R: Read>(&mut self, reader: R) -> Result<&TokenSequence, SessionError> {
        let mut source = ReaderSource::new(reader);
        self.scan(Some(&mut source))?;

        if let Some(io_error) = source.take_error() {
            self.release();
            let error = SessionError::SourceRead {
                message: io_error.to_string(),
            };
            log_error!(error.error_code(), "Character source failed before end of input",
                "bytes_read" => source.bytes_read(),
                "io_error" => io_error);
            return Err(error);
        }

        Ok(&self.tokens)
    }

    /// Load `path` through the file processor and scan it. Events logged
    /// meanwhile are attributed to the file.
    pub fn scan_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&TokenSequence, SessionError> {
        let path = path.as_ref();
        let file_id = self.files_scanned;
        self.files_scanned += 1;

        logging::with_file_context(path.to_path_buf(), file_id, || -> Result<(), SessionError> {
            log_info!("Scanning file", "file" => path.display());
            let file_result = self.file_processor.process_file(path)?;
            self.scan_bytes(&file_result.source)?;
            Ok(())
        })?;

        Ok(&self.tokens)
    }

    // ------------------------------------------------------------------
    // Results
    // ------------------------------------------------------------------

    pub fn tokens(&self) -> &TokenSequence {
        &self.tokens
    }

    /// Move the result out, leaving an empty sequence behind
    pub fn take_tokens(&mut self) -> TokenSequence {
        mem::take(&mut self.tokens)
    }

    /// Drop the held result and its owned text
    pub fn release(&mut self) {
        self.tokens = TokenSequence::new();
        self.last_post_typing = None;
    }

    pub fn dump(&self) -> String {
        self.tokens.dump()
    }

    pub fn reserved_tokens(&self) -> &ReservedTokenTable {
        &self.reserved
    }

    pub fn format_validators(&self) -> &FormatValidatorTable {
        &self.validators
    }

    /// Metrics of the most recent scan
    pub fn metrics(&self) -> &ScanMetrics {
        self.scanner.metrics()
    }

    pub fn last_post_typing(&self) -> Option<PostTypingSummary> {
        self.last_post_typing
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn reject(message: String) -> SessionError {
    let error = SessionError::configuration(message);
    log_error!(error.error_code(), "Registration rejected", "reason" => &error);
    error
}

fn check_not_empty(name: &TextSpan<'_>, kind: &str, field: &str) -> Result<(), SessionError> {
    if name.is_empty() {
        return Err(reject(format!("{} has an empty {}", kind, field)));
    }
    Ok(())
}
