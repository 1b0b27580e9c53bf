//! Error, warning and success codes with their classification metadata
//!
//! Every code the crate emits is declared here together with the metadata
//! the loggers and the cargo-style collector use to render it.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Code wrapper shared by error, warning and success events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Registry entry for this code, if it has one
    pub fn metadata(&self) -> Option<&'static ErrorMetadata> {
        get_error_metadata(self.0)
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
    pub const MEMORY_ALLOCATION_FAILURE: Code = Code::new("ERR003");
}

/// File processing error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
    pub const LARGE_FILE: Code = Code::new("W007");
}

/// Scanning codes
pub mod scanning {
    use super::Code;

    pub const SOURCE_READ_FAILURE: Code = Code::new("E020");
    pub const LONG_IDENTIFIER: Code = Code::new("W020");
}

/// Table registration and definition file codes
pub mod configuration {
    use super::Code;

    pub const INVALID_REGISTRATION: Code = Code::new("E030");
    pub const INVALID_DEFINITIONS: Code = Code::new("E031");
    pub const UNMATCHABLE_LITERAL: Code = Code::new("W030");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const SCAN_COMPLETE: Code = Code::new("I020");
    pub const POST_TYPING_COMPLETE: Code = Code::new("I021");
    pub const DEFINITIONS_LOADED: Code = Code::new("I030");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

const METADATA: &[ErrorMetadata] = &[
    ErrorMetadata::new(
        "ERR001",
        "System",
        Severity::Critical,
        false,
        true,
        "Critical internal error",
        "File a bug report with the input that triggered it",
    ),
    ErrorMetadata::new(
        "ERR002",
        "System",
        Severity::Critical,
        false,
        true,
        "Logging or configuration initialization failed",
        "Check the runtime configuration and environment variables",
    ),
    ErrorMetadata::new(
        "ERR003",
        "System",
        Severity::Critical,
        false,
        true,
        "Buffer growth failed while scanning",
        "Scan a smaller source or run the scan in an isolated worker",
    ),
    ErrorMetadata::new(
        "E005",
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "Source file does not exist",
        "Check the path and working directory",
    ),
    ErrorMetadata::new(
        "E007",
        "FileProcessing",
        Severity::High,
        false,
        true,
        "Source file exceeds the compile-time size limit",
        "Split the input or rebuild with a larger max_file_size",
    ),
    ErrorMetadata::new(
        "E009",
        "FileProcessing",
        Severity::High,
        false,
        true,
        "Permission denied reading source file",
        "Check file permissions",
    ),
    ErrorMetadata::new(
        "E011",
        "FileProcessing",
        Severity::High,
        false,
        true,
        "I/O error while reading source file",
        "Check the underlying device or stream",
    ),
    ErrorMetadata::new(
        "E012",
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "Path is empty or does not name a regular file",
        "Pass the path of a regular file",
    ),
    ErrorMetadata::new(
        "W007",
        "FileProcessing",
        Severity::Low,
        true,
        false,
        "Source file is above the large-file threshold",
        "No action required; scanning may take longer",
    ),
    ErrorMetadata::new(
        "E020",
        "Scanning",
        Severity::High,
        false,
        true,
        "Character source failed before end of input",
        "Check the reader the source was built from",
    ),
    ErrorMetadata::new(
        "W020",
        "Scanning",
        Severity::Low,
        true,
        false,
        "Untyped run longer than the configured threshold",
        "Register a reserved token that splits the run if this is unintended",
    ),
    ErrorMetadata::new(
        "E030",
        "Configuration",
        Severity::Medium,
        true,
        false,
        "Token registration rejected",
        "Provide a non-empty type name",
    ),
    ErrorMetadata::new(
        "E031",
        "Configuration",
        Severity::Medium,
        true,
        false,
        "Token definition file is invalid",
        "Fix the TOML definitions and retry",
    ),
    ErrorMetadata::new(
        "W030",
        "Configuration",
        Severity::Low,
        true,
        false,
        "Reserved token registered with an empty literal",
        "The entry is kept but no scanned run can ever match it",
    ),
    ErrorMetadata::new(
        "I001",
        "Success",
        Severity::Low,
        true,
        false,
        "Operation completed successfully",
        "No action required",
    ),
    ErrorMetadata::new(
        "I004",
        "Success",
        Severity::Low,
        true,
        false,
        "Logging system initialized",
        "No action required",
    ),
    ErrorMetadata::new(
        "I006",
        "Success",
        Severity::Low,
        true,
        false,
        "Source file loaded",
        "No action required",
    ),
    ErrorMetadata::new(
        "I020",
        "Success",
        Severity::Low,
        true,
        false,
        "Scan completed",
        "No action required",
    ),
    ErrorMetadata::new(
        "I021",
        "Success",
        Severity::Low,
        true,
        false,
        "Post-typing pass completed",
        "No action required",
    ),
    ErrorMetadata::new(
        "I030",
        "Success",
        Severity::Low,
        true,
        false,
        "Token definitions loaded",
        "No action required",
    ),
];

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, &'static ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, &'static ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| METADATA.iter().map(|meta| (meta.code, meta)).collect())
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code).copied()
}

pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

/// Every code declared in this module, used by startup validation
pub fn all_codes() -> [Code; 20] {
    [
        system::INTERNAL_ERROR,
        system::INITIALIZATION_FAILURE,
        system::MEMORY_ALLOCATION_FAILURE,
        file_processing::FILE_NOT_FOUND,
        file_processing::FILE_TOO_LARGE,
        file_processing::PERMISSION_DENIED,
        file_processing::IO_ERROR,
        file_processing::INVALID_PATH,
        file_processing::LARGE_FILE,
        scanning::SOURCE_READ_FAILURE,
        scanning::LONG_IDENTIFIER,
        configuration::INVALID_REGISTRATION,
        configuration::INVALID_DEFINITIONS,
        configuration::UNMATCHABLE_LITERAL,
        success::OPERATION_COMPLETED_SUCCESSFULLY,
        success::SYSTEM_INITIALIZATION_COMPLETED,
        success::FILE_PROCESSING_SUCCESS,
        success::SCAN_COMPLETE,
        success::POST_TYPING_COMPLETE,
        success::DEFINITIONS_LOADED,
    ]
}
