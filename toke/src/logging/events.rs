//! Log events and their text and JSON renderings

use super::codes::{Code, ErrorMetadata};
use crate::utils::Position;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Event levels, ordered from most to least severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts names (`warn`, `warning`, any case) and the numeric levels `0..=3`
impl FromStr for LogLevel {
    type Err = String;

    fn from_str(level: &str) -> Result<Self, Self::Err> {
        match level.to_ascii_lowercase().as_str() {
            "error" | "0" => Ok(LogLevel::Error),
            "warning" | "warn" | "1" => Ok(LogLevel::Warning),
            "info" | "2" => Ok(LogLevel::Info),
            "debug" | "3" => Ok(LogLevel::Debug),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

pub const GENERIC_WARNING: Code = Code::new("W000");
pub const GENERIC_INFO: Code = Code::new("I000");
pub const GENERIC_DEBUG: Code = Code::new("D000");

const UNKNOWN_CATEGORY: &str = "Unknown";
const UNKNOWN_SEVERITY: &str = "Medium";

#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub code: Code,
    pub message: String,
    /// Source position the event refers to, if any
    pub position: Option<Position>,
    /// Sorted so every rendering lists context in the same order
    pub context: BTreeMap<String, String>,
}

impl LogEvent {
    pub fn new(level: LogLevel, code: Code, message: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            code,
            message: truncate_message(message),
            position: None,
            context: BTreeMap::new(),
        }
    }

    pub fn error(code: Code, message: &str) -> Self {
        Self::new(LogLevel::Error, code, message)
    }

    pub fn warning(code: Code, message: &str) -> Self {
        Self::new(LogLevel::Warning, code, message)
    }

    /// Info event carrying a success code
    pub fn success(code: Code, message: &str) -> Self {
        Self::new(LogLevel::Info, code, message)
    }

    pub fn info(message: &str) -> Self {
        Self::new(LogLevel::Info, GENERIC_INFO, message)
    }

    pub fn debug(message: &str) -> Self {
        Self::new(LogLevel::Debug, GENERIC_DEBUG, message)
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }

    pub fn is_warning(&self) -> bool {
        self.level == LogLevel::Warning
    }

    pub fn metadata(&self) -> Option<&'static ErrorMetadata> {
        self.code.metadata()
    }

    pub fn category(&self) -> &'static str {
        self.metadata().map_or(UNKNOWN_CATEGORY, |m| m.category)
    }

    pub fn severity(&self) -> &'static str {
        self.metadata().map_or(UNKNOWN_SEVERITY, |m| m.severity.as_str())
    }

    pub fn requires_halt(&self) -> bool {
        self.metadata().is_some_and(|m| m.requires_halt)
    }

    /// `[LEVEL] CODE - message at line:column`
    pub fn format(&self) -> String {
        let mut line = format!("[{}] {} - {}", self.level, self.code, self.message);
        if let Some(position) = &self.position {
            line.push_str(&format!(" at {}", position));
        }
        line
    }

    /// One-line summary followed by code metadata and context, one per line
    pub fn format_detailed(&self) -> String {
        let mut output = self.format();

        if let Some(metadata) = self.metadata() {
            output.push_str(&format!(
                "\n  {} / {}: {}",
                metadata.category,
                metadata.severity.as_str(),
                metadata.description
            ));
            if self.is_error() {
                output.push_str(&format!(
                    "\n  recoverable: {}, halts: {}",
                    metadata.recoverable, metadata.requires_halt
                ));
            }
            output.push_str(&format!("\n  help: {}", metadata.recommended_action));
        }

        for (key, value) in &self.context {
            output.push_str(&format!("\n  {} = {}", key, value));
        }

        output
    }

    /// Single-line JSON for the structured logger
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        let metadata = self.metadata();
        serde_json::to_string(&JsonEvent {
            timestamp: self.timestamp.to_rfc3339(),
            level: self.level.as_str(),
            code: self.code.as_str(),
            message: &self.message,
            category: self.category(),
            severity: self.severity(),
            requires_halt: metadata.filter(|_| self.is_error()).map(|m| m.requires_halt),
            help: metadata.filter(|_| self.is_error()).map(|m| m.recommended_action),
            position: self.position.as_ref(),
            context: Some(&self.context).filter(|c| !c.is_empty()),
        })
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    timestamp: String,
    level: &'static str,
    code: &'static str,
    message: &'a str,
    category: &'static str,
    severity: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    requires_halt: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    help: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<&'a Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a BTreeMap<String, String>>,
}

fn truncate_message(message: &str) -> String {
    let limit = super::config::get_max_log_message_length();
    if message.len() <= limit {
        return message.to_string();
    }
    let mut end = limit;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &message[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_level_parsing_and_order() {
        assert_eq!("ERROR".parse::<LogLevel>(), Ok(LogLevel::Error));
        assert_eq!("warn".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert_eq!("3".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert!("verbose".parse::<LogLevel>().is_err());
        assert!(LogLevel::Error < LogLevel::Debug);
    }

    #[test]
    fn test_event_metadata_comes_from_code() {
        let event = LogEvent::error(codes::system::MEMORY_ALLOCATION_FAILURE, "Out of memory");

        assert_eq!(event.category(), "System");
        assert_eq!(event.severity(), "Critical");
        assert!(event.requires_halt());

        let unknown = LogEvent::warning(GENERIC_WARNING, "generic");
        assert_eq!(unknown.category(), "Unknown");
        assert!(!unknown.requires_halt());
    }

    #[test]
    fn test_format_with_position() {
        let event = LogEvent::warning(codes::scanning::LONG_IDENTIFIER, "Long run")
            .with_position(Position::new(10, 3, 7));

        assert_eq!(event.format(), "[WARN] W020 - Long run at 3:7");
    }

    #[test]
    fn test_format_detailed_lists_sorted_context() {
        let event = LogEvent::error(codes::file_processing::FILE_TOO_LARGE, "File too large")
            .with_context("size", "1024")
            .with_context("limit", "512");
        let detailed = event.format_detailed();

        assert!(detailed.contains("FileProcessing / High"));
        assert!(detailed.contains("halts: true"));
        let limit = detailed.find("limit = 512").unwrap();
        let size = detailed.find("size = 1024").unwrap();
        assert!(limit < size);
    }

    #[test]
    fn test_json_formatting() {
        let event = LogEvent::error(codes::file_processing::PERMISSION_DENIED, "Access denied")
            .with_context("file", "index.html")
            .with_position(Position::start());

        let json: serde_json::Value =
            serde_json::from_str(&event.format_json().unwrap()).unwrap();
        assert_eq!(json["level"], "ERROR");
        assert_eq!(json["code"], "E009");
        assert_eq!(json["requires_halt"], true);
        assert_eq!(json["position"]["line"], 1);
        assert_eq!(json["context"]["file"], "index.html");
        assert!(json["timestamp"].as_str().unwrap().contains('T'));

        let info: serde_json::Value =
            serde_json::from_str(&LogEvent::info("hi").format_json().unwrap()).unwrap();
        assert!(info.get("help").is_none());
        assert!(info.get("context").is_none());
    }

    #[test]
    fn test_long_messages_are_truncated() {
        let limit = crate::logging::config::get_max_log_message_length();
        let event = LogEvent::info(&"x".repeat(limit + 10));
        assert_eq!(event.message.len(), limit + 3);
        assert!(event.message.ends_with("..."));
    }
}
