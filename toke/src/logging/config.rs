//! Logging limits and preferences
//!
//! Buffer and message limits are generated at build time and fixed for the
//! life of the binary. Level and output choices come from
//! [`LoggingPreferences`], installed once at startup; until then the
//! environment-derived defaults apply.

use crate::config::compile_time::logging::{
    LOG_BUFFER_SIZE, MAX_LOG_EVENTS_PER_FILE, MAX_LOG_MESSAGE_LENGTH,
};
use crate::config::runtime::LoggingPreferences;
use crate::logging::events::LogLevel;
use std::sync::OnceLock;

/// Shortest message limit that still leaves room for a useful message
const MIN_MESSAGE_LENGTH: usize = 64;

static PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Install runtime preferences; only the first call succeeds
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime preferences already initialized".to_string())
}

fn preferences() -> &'static LoggingPreferences {
    static DEFAULTS: OnceLock<LoggingPreferences> = OnceLock::new();
    PREFERENCES
        .get()
        .unwrap_or_else(|| DEFAULTS.get_or_init(LoggingPreferences::default))
}

pub fn get_min_log_level() -> LogLevel {
    preferences().min_log_level
}

pub fn use_structured_logging() -> bool {
    preferences().use_structured_logging
}

pub fn use_console_logging() -> bool {
    preferences().enable_console_logging
}

pub fn use_cargo_style_output() -> bool {
    preferences().enable_cargo_style_output
}

pub fn include_file_context() -> bool {
    preferences().include_file_context
}

/// Events a memory logger keeps before dropping the oldest
pub fn get_error_buffer_size() -> usize {
    LOG_BUFFER_SIZE
}

pub fn get_max_log_events_per_file() -> usize {
    MAX_LOG_EVENTS_PER_FILE
}

pub fn get_max_log_message_length() -> usize {
    MAX_LOG_MESSAGE_LENGTH
}

/// Check the generated limits against each other
pub fn validate_config() -> Result<(), String> {
    if LOG_BUFFER_SIZE == 0 {
        return Err("log_buffer_size must be non-zero".to_string());
    }
    if MAX_LOG_EVENTS_PER_FILE > LOG_BUFFER_SIZE {
        return Err(format!(
            "max_log_events_per_file ({}) exceeds log_buffer_size ({})",
            MAX_LOG_EVENTS_PER_FILE, LOG_BUFFER_SIZE
        ));
    }
    if MAX_LOG_MESSAGE_LENGTH < MIN_MESSAGE_LENGTH {
        return Err(format!(
            "max_log_message_length ({}) is below {}",
            MAX_LOG_MESSAGE_LENGTH, MIN_MESSAGE_LENGTH
        ));
    }
    Ok(())
}
