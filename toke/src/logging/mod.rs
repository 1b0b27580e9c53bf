//! Process-wide logging
//!
//! One [`LoggingService`] filters and forwards events. Errors and warnings
//! raised while a file is being scanned are also kept by an [`ErrorCollector`]
//! so they can be reported cargo-style at the end of a run. Before
//! [`init_global_logging`] runs, every `log_*!` macro is a no-op.

pub mod codes;
pub mod collector;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use collector::{ErrorCollector, FileProcessingContext, ProcessingSummary};
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleFormat, ConsoleLogger, Logger, LoggingService, MemoryLogger, MultiLogger};

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();
static GLOBAL_ERROR_COLLECTOR: OnceLock<ErrorCollector> = OnceLock::new();

thread_local! {
    static FILE_CONTEXT: RefCell<Option<FileProcessingContext>> = const { RefCell::new(None) };
}

/// Validate the logging limits and install a service built from the runtime preferences
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    if let Some(code) = codes::all_codes().iter().find(|c| c.metadata().is_none()) {
        return Err(format!("Missing metadata for code: {}", code));
    }

    let service = Arc::new(LoggingService::with_config());
    init_global_logging_with_service(service.clone())?;
    service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));
    Ok(())
}

/// Install a caller-built service; only the first call in a process succeeds
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())?;
    // The collector is only ever set here, after the logger
    let _ = GLOBAL_ERROR_COLLECTOR.set(ErrorCollector::new());
    Ok(())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(Arc::as_ref)
}

pub fn try_get_global_error_collector() -> Option<&'static ErrorCollector> {
    GLOBAL_ERROR_COLLECTOR.get()
}

/// True when a `log_debug!` event would reach the logger
pub fn debug_enabled() -> bool {
    try_get_global_logger().is_some_and(|logger| logger.should_log(LogLevel::Debug))
}

// File context

/// Restores the enclosing context when a file scope ends, even on unwind
struct FileContextGuard {
    previous: Option<FileProcessingContext>,
}

impl Drop for FileContextGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        let finished = FILE_CONTEXT.with(|ctx| std::mem::replace(&mut *ctx.borrow_mut(), previous));
        if let (Some(context), Some(collector)) = (finished, try_get_global_error_collector()) {
            collector.finish_file(&context);
        }
    }
}

/// Run `f` with events attributed to `file_path`
///
/// Nested calls attribute events to the innermost file and restore the
/// outer one when they return.
pub fn with_file_context<F, R>(file_path: PathBuf, file_id: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    let context = FileProcessingContext::new(file_path, file_id);
    if let Some(collector) = try_get_global_error_collector() {
        collector.record_file(&context);
    }

    let _guard = FileContextGuard {
        previous: FILE_CONTEXT.with(|ctx| ctx.borrow_mut().replace(context)),
    };
    f()
}

pub fn get_current_file_context() -> Option<FileProcessingContext> {
    FILE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// Macro support

/// Send an event from a `log_*!` macro
///
/// Attaches the current file when configured to, and keeps errors and
/// warnings raised inside a file scope for the cargo-style report.
#[doc(hidden)]
pub fn dispatch(mut event: LogEvent) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };
    let file = get_current_file_context();

    if let Some(file) = &file {
        if config::include_file_context() {
            event = event
                .with_context("file", &file.file_path.display().to_string())
                .with_context("file_id", &file.file_id.to_string());
        }
    }

    if let (Some(file), Some(collector)) = (&file, try_get_global_error_collector()) {
        if event.is_error() || event.is_warning() {
            collector.record_event(&file.file_path, event.clone());
        }
    }

    logger.log_event(event);
}

// Reporting

pub fn get_processing_summary() -> ProcessingSummary {
    try_get_global_error_collector()
        .map(ErrorCollector::summary)
        .unwrap_or_default()
}

/// Cargo-style report of everything collected so far
pub fn cargo_style_summary() -> Option<String> {
    try_get_global_error_collector().map(ErrorCollector::format_cargo_style)
}

/// Print the report when cargo-style output is enabled and there is something to show
pub fn print_cargo_style_summary() {
    if !config::use_cargo_style_output() {
        return;
    }
    if let Some(summary) = cargo_style_summary().filter(|s| !s.is_empty()) {
        print!("{}", summary);
    }
}
