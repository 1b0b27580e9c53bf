//! Loggers and the level-filtering service in front of them

use super::codes::Code;
use super::config;
use super::events::{LogEvent, LogLevel};
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};

/// Destination for log events
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Drops events below its minimum level before they reach the logger
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Service writing to the console targets the installed preferences ask for
    pub fn with_config() -> Self {
        let min_level = config::get_min_log_level();
        Self::new(Arc::new(create_configured_multi_logger()), min_level)
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn set_min_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }
}

/// How a console logger renders each event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleFormat {
    Text,
    Json,
}

/// Errors go to stderr, everything else to stdout
pub struct ConsoleLogger {
    format: ConsoleFormat,
}

impl ConsoleLogger {
    pub fn new(format: ConsoleFormat) -> Self {
        Self { format }
    }

    fn render(&self, event: &LogEvent) -> String {
        match self.format {
            ConsoleFormat::Text => event.format(),
            // Plain text if the event cannot be serialized
            ConsoleFormat::Json => event.format_json().unwrap_or_else(|_| event.format()),
        }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        let line = self.render(event);
        // A closed pipe must not take the scanner down with it
        let _ = if event.is_error() {
            writeln!(std::io::stderr().lock(), "{}", line)
        } else {
            writeln!(std::io::stdout().lock(), "{}", line)
        };
    }
}

/// Keeps the most recent events in memory, bounded by the log buffer size
#[derive(Default)]
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEvent>> {
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn matching(&self, keep: impl Fn(&LogEvent) -> bool) -> Vec<LogEvent> {
        self.lock().iter().filter(|e| keep(*e)).cloned().collect()
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.lock().clone()
    }

    pub fn errors(&self) -> Vec<LogEvent> {
        self.matching(LogEvent::is_error)
    }

    pub fn warnings(&self) -> Vec<LogEvent> {
        self.matching(LogEvent::is_warning)
    }

    pub fn with_code(&self, code: Code) -> Vec<LogEvent> {
        self.matching(|e| e.code == code)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        let mut events = self.lock();
        let capacity = config::get_error_buffer_size();
        if events.len() >= capacity {
            let excess = events.len() + 1 - capacity;
            events.drain(..excess);
        }
        events.push(event.clone());
    }
}

/// Fans each event out to every target; with none it discards everything
#[derive(Default)]
pub struct MultiLogger {
    targets: Vec<Arc<dyn Logger>>,
}

impl MultiLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_logger(&mut self, logger: Arc<dyn Logger>) {
        self.targets.push(logger);
    }

    pub fn with_console(mut self, format: ConsoleFormat) -> Self {
        self.add_logger(Arc::new(ConsoleLogger::new(format)));
        self
    }

    pub fn with_memory(mut self) -> (Self, Arc<MemoryLogger>) {
        let memory = Arc::new(MemoryLogger::new());
        self.add_logger(memory.clone());
        (self, memory)
    }

    pub fn target_count(&self) -> usize {
        self.targets.len()
    }
}

impl Logger for MultiLogger {
    fn log(&self, event: &LogEvent) {
        for target in &self.targets {
            target.log(event);
        }
    }
}

/// Console target chosen by the installed preferences, or none when console output is off
pub fn create_configured_multi_logger() -> MultiLogger {
    let logger = MultiLogger::new();
    if !config::use_console_logging() {
        return logger;
    }
    if config::use_structured_logging() {
        logger.with_console(ConsoleFormat::Json)
    } else {
        logger.with_console(ConsoleFormat::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    fn service_with_memory(level: LogLevel) -> (LoggingService, Arc<MemoryLogger>) {
        let (multi, memory) = MultiLogger::new().with_memory();
        (LoggingService::new(Arc::new(multi), level), memory)
    }

    #[test]
    fn test_console_logger_renders_both_formats() {
        let event = LogEvent::error(codes::file_processing::FILE_NOT_FOUND, "missing.html")
            .with_context("path", "missing.html");

        assert_eq!(
            ConsoleLogger::new(ConsoleFormat::Text).render(&event),
            "[ERROR] E005 - missing.html"
        );
        assert!(ConsoleLogger::new(ConsoleFormat::Json)
            .render(&event)
            .starts_with('{'));
        ConsoleLogger::new(ConsoleFormat::Text).log(&LogEvent::info("console smoke test"));
    }

    #[test]
    fn test_memory_logger_queries() {
        let logger = MemoryLogger::new();
        assert!(logger.is_empty());

        logger.log(&LogEvent::info("scanning"));
        logger.log(&LogEvent::error(codes::scanning::SOURCE_READ_FAILURE, "read failed"));
        logger.log(&LogEvent::warning(codes::scanning::LONG_IDENTIFIER, "long run"));

        assert_eq!(logger.len(), 3);
        assert_eq!(logger.errors().len(), 1);
        assert_eq!(logger.warnings()[0].message, "long run");
        assert_eq!(logger.with_code(codes::scanning::SOURCE_READ_FAILURE).len(), 1);

        logger.clear();
        assert!(logger.events().is_empty());
    }

    #[test]
    fn test_memory_logger_is_bounded() {
        let logger = MemoryLogger::new();
        let capacity = config::get_error_buffer_size();
        for i in 0..capacity + 3 {
            logger.log(&LogEvent::debug(&i.to_string()));
        }

        let events = logger.events();
        assert_eq!(events.len(), capacity);
        assert_eq!(events[0].message, "3");
    }

    #[test]
    fn test_service_filters_by_level() {
        let (service, memory) = service_with_memory(LogLevel::Warning);

        service.log_event(LogEvent::debug("hidden"));
        service.log_event(LogEvent::info("hidden"));
        service.log_event(LogEvent::warning(codes::file_processing::LARGE_FILE, "big"));
        service.log_event(LogEvent::error(codes::system::INTERNAL_ERROR, "broken"));

        assert_eq!(memory.len(), 2);
        assert!(service.should_log(LogLevel::Error));
        assert!(!service.should_log(LogLevel::Info));
    }

    #[test]
    fn test_set_min_level() {
        let (mut service, memory) = service_with_memory(LogLevel::Error);
        service.set_min_level(LogLevel::Debug);
        assert_eq!(service.min_level(), LogLevel::Debug);

        service.log_event(LogEvent::success(codes::success::SCAN_COMPLETE, "done"));
        assert_eq!(memory.with_code(codes::success::SCAN_COMPLETE).len(), 1);
    }

    #[test]
    fn test_multi_logger_fans_out() {
        let (multi, first) = MultiLogger::new().with_memory();
        let (multi, second) = multi.with_memory();
        assert_eq!(multi.target_count(), 2);

        multi.log(&LogEvent::info("both"));
        assert_eq!((first.len(), second.len()), (1, 1));
    }
}
