//! Runtime preferences
//!
//! Each field defaults from a `TOKE_*` environment variable and can be
//! overridden by a TOML file passed on the command line.

pub use crate::logging::events::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerPreferences {
    /// Whether to collect per-run metrics beyond the token totals
    pub collect_detailed_metrics: bool,

    /// Whether to count how often each reserved type is emitted
    pub track_reserved_usage: bool,

    /// Whether to emit a debug event for every token produced
    pub log_token_events: bool,

    /// Whether unusually long untyped runs produce a warning
    pub warn_on_long_identifiers: bool,
}

impl Default for ScannerPreferences {
    fn default() -> Self {
        Self {
            collect_detailed_metrics: env_flag(env_vars::SCANNER_DETAILED_METRICS, true),
            track_reserved_usage: env_flag(env_vars::SCANNER_TRACK_RESERVED_USAGE, false),
            log_token_events: env_flag(env_vars::SCANNER_LOG_TOKEN_EVENTS, false),
            warn_on_long_identifiers: env_flag(env_vars::SCANNER_WARN_LONG_IDENTIFIERS, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProcessorPreferences {
    /// Whether to log throughput and size details on success
    pub enable_performance_logging: bool,

    /// Whether files above the large-file threshold produce a warning
    pub warn_on_large_files: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            enable_performance_logging: env_flag(env_vars::ENABLE_PERFORMANCE_LOGGING, true),
            warn_on_large_files: env_flag(env_vars::WARN_ON_LARGE_FILES, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Minimum level that reaches the configured logger
    pub min_log_level: LogLevel,

    /// Whether to enable cargo-style error reporting
    pub enable_cargo_style_output: bool,

    /// Whether to include file context in log messages
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_flag(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_flag(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            enable_cargo_style_output: env_flag(env_vars::LOGGING_CARGO_STYLE, true),
            include_file_context: env_flag(env_vars::LOGGING_INCLUDE_FILE_CONTEXT, true),
        }
    }
}

/// Parse a level name or number, as accepted by `TOKE_LOGGING_MIN_LEVEL`
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    level.trim().parse().ok()
}

/// All runtime preferences, loadable from a TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub scanner: ScannerPreferences,
    pub file_processor: FileProcessorPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse preferences from TOML; missing sections fall back to their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Invalid runtime configuration: {}", e))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_toml_str(&content)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Scanner
    pub const SCANNER_DETAILED_METRICS: &str = "TOKE_SCANNER_DETAILED_METRICS";
    pub const SCANNER_TRACK_RESERVED_USAGE: &str = "TOKE_SCANNER_TRACK_RESERVED_USAGE";
    pub const SCANNER_LOG_TOKEN_EVENTS: &str = "TOKE_SCANNER_LOG_TOKEN_EVENTS";
    pub const SCANNER_WARN_LONG_IDENTIFIERS: &str = "TOKE_SCANNER_WARN_LONG_IDENTIFIERS";

    // File Processor
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "TOKE_ENABLE_PERFORMANCE_LOGGING";
    pub const WARN_ON_LARGE_FILES: &str = "TOKE_WARN_ON_LARGE_FILES";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "TOKE_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "TOKE_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "TOKE_LOGGING_MIN_LEVEL";
    pub const LOGGING_CARGO_STYLE: &str = "TOKE_LOGGING_CARGO_STYLE";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "TOKE_LOGGING_INCLUDE_FILE_CONTEXT";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("1"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level(" info "), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_runtime_config_from_toml() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [scanner]
            track_reserved_usage = true
            log_token_events = false

            [logging]
            min_log_level = "debug"
            use_structured_logging = true
            "#,
        )
        .unwrap();

        assert!(config.scanner.track_reserved_usage);
        assert!(!config.scanner.log_token_events);
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
        assert!(config.logging.use_structured_logging);
    }

    #[test]
    fn test_runtime_config_rejects_bad_level() {
        let result = RuntimeConfig::from_toml_str("[logging]\nmin_log_level = \"loud\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_runtime_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toke.toml");
        fs::write(&path, "[file_processor]\nwarn_on_large_files = false\n").unwrap();

        let config = RuntimeConfig::from_file(&path).unwrap();
        assert!(!config.file_processor.warn_on_large_files);

        assert!(RuntimeConfig::from_file(dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_env_var_names_exist() {
        assert!(env_vars::LOGGING_MIN_LEVEL.starts_with("TOKE_"));
        assert!(env_vars::SCANNER_TRACK_RESERVED_USAGE.starts_with("TOKE_"));
    }
}
