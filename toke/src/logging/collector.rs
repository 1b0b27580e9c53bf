//! Per-file record of errors and warnings, rendered like cargo diagnostics

use super::events::{LogEvent, GENERIC_WARNING};
use crate::config::compile_time::logging::MAX_LOG_EVENTS_PER_FILE;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// The file the current thread is scanning
#[derive(Debug, Clone)]
pub struct FileProcessingContext {
    pub file_path: PathBuf,
    pub file_id: usize,
    pub started: Instant,
}

impl FileProcessingContext {
    pub fn new(file_path: PathBuf, file_id: usize) -> Self {
        Self {
            file_path,
            file_id,
            started: Instant::now(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingSummary {
    pub total_files: usize,
    pub clean_files: usize,
    pub failed_files: usize,
    pub files_with_warnings: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
}

impl ProcessingSummary {
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.total_warnings > 0
    }
}

#[derive(Debug, Default)]
struct FileRecord {
    events: Vec<LogEvent>,
    scan_time: Option<Duration>,
}

impl FileRecord {
    fn count(&self, keep: fn(&LogEvent) -> bool) -> usize {
        self.events.iter().filter(|e| keep(*e)).count()
    }
}

/// Thread-safe, keyed by file path so reports come out in path order
#[derive(Debug, Default)]
pub struct ErrorCollector {
    files: Mutex<BTreeMap<PathBuf, FileRecord>>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    fn files(&self) -> MutexGuard<'_, BTreeMap<PathBuf, FileRecord>> {
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record an event; past the per-file limit one overflow warning is kept and the rest dropped
    pub fn record_event(&self, file_path: &Path, event: LogEvent) {
        let mut files = self.files();
        let events = &mut files.entry(file_path.to_path_buf()).or_default().events;

        match events.len() {
            n if n < MAX_LOG_EVENTS_PER_FILE => events.push(event),
            n if n == MAX_LOG_EVENTS_PER_FILE => events.push(LogEvent::warning(
                GENERIC_WARNING,
                &format!("Too many events for file (limit: {})", MAX_LOG_EVENTS_PER_FILE),
            )),
            _ => {}
        }
    }

    /// Note that a file was scanned, so clean files count in the summary
    pub fn record_file(&self, context: &FileProcessingContext) {
        self.files()
            .entry(context.file_path.clone())
            .or_default();
    }

    /// Store how long the scan of a file took
    pub fn finish_file(&self, context: &FileProcessingContext) {
        self.files()
            .entry(context.file_path.clone())
            .or_default()
            .scan_time = Some(context.started.elapsed());
    }

    pub fn file_events(&self, file_path: &Path) -> Vec<LogEvent> {
        self.files()
            .get(file_path)
            .map(|record| record.events.clone())
            .unwrap_or_default()
    }

    pub fn scan_time(&self, file_path: &Path) -> Option<Duration> {
        self.files().get(file_path).and_then(|record| record.scan_time)
    }

    pub fn summary(&self) -> ProcessingSummary {
        let files = self.files();
        let mut summary = ProcessingSummary {
            total_files: files.len(),
            ..Default::default()
        };

        for record in files.values() {
            let errors = record.count(LogEvent::is_error);
            let warnings = record.count(LogEvent::is_warning);
            match (errors, warnings) {
                (0, 0) => summary.clean_files += 1,
                (0, _) => summary.files_with_warnings += 1,
                _ => summary.failed_files += 1,
            }
            summary.total_errors += errors;
            summary.total_warnings += warnings;
        }

        summary
    }

    pub fn clear(&self) {
        self.files().clear();
    }

    /// Errors then warnings for each file, followed by the totals
    pub fn format_cargo_style(&self) -> String {
        let mut output = String::new();

        for (path, record) in self.files().iter() {
            if record.events.iter().all(|e| !e.is_error() && !e.is_warning()) {
                continue;
            }

            let _ = writeln!(output, "Checking {}...", path.display());
            let ordered = record
                .events
                .iter()
                .filter(|e| e.is_error())
                .chain(record.events.iter().filter(|e| e.is_warning()));
            for event in ordered {
                write_diagnostic(&mut output, path, event);
            }
            output.push('\n');
        }

        let summary = self.summary();
        if summary.has_errors() {
            let _ = writeln!(output, "Total errors: {}", summary.total_errors);
        }
        if summary.has_warnings() {
            let _ = writeln!(output, "Total warnings: {}", summary.total_warnings);
        }

        output
    }
}

fn write_diagnostic(output: &mut String, path: &Path, event: &LogEvent) {
    let kind = if event.is_error() { "error" } else { "warning" };
    let _ = write!(output, "{}[{}]: {}", kind, event.code, event.message);
    if let Some(position) = &event.position {
        let _ = write!(output, " --> {}:{}", path.display(), position);
    }
    output.push('\n');

    if event.is_error() {
        let _ = writeln!(
            output,
            "  = severity: {}, category: {}",
            event.severity(),
            event.category()
        );
    }
    // The file is already in the header
    for (key, value) in event.context.iter().filter(|(k, _)| !k.starts_with("file")) {
        let _ = writeln!(output, "  = {}: {}", key, value);
    }
    if let Some(metadata) = event.metadata().filter(|_| event.is_error()) {
        let _ = writeln!(output, "  = help: {}", metadata.recommended_action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;
    use crate::utils::Position;

    #[test]
    fn test_events_are_kept_per_file() {
        let collector = ErrorCollector::new();
        let path = PathBuf::from("index.html");

        collector.record_event(
            &path,
            LogEvent::error(codes::file_processing::FILE_NOT_FOUND, "missing"),
        );

        assert_eq!(collector.file_events(&path).len(), 1);
        assert!(collector.file_events(Path::new("other.html")).is_empty());
    }

    #[test]
    fn test_summary_counts_clean_files() {
        let collector = ErrorCollector::new();

        collector.record_event(
            Path::new("a.html"),
            LogEvent::error(codes::scanning::SOURCE_READ_FAILURE, "Error"),
        );
        collector.record_event(
            Path::new("b.html"),
            LogEvent::warning(codes::scanning::LONG_IDENTIFIER, "Warning"),
        );
        collector.record_file(&FileProcessingContext::new(PathBuf::from("c.html"), 3));

        let summary = collector.summary();
        assert_eq!(summary.total_files, 3);
        assert_eq!(summary.failed_files, 1);
        assert_eq!(summary.files_with_warnings, 1);
        assert_eq!(summary.clean_files, 1);
        assert!(summary.has_errors() && summary.has_warnings());
    }

    #[test]
    fn test_per_file_limit() {
        let collector = ErrorCollector::new();
        let path = PathBuf::from("noisy.txt");

        for _ in 0..MAX_LOG_EVENTS_PER_FILE + 5 {
            collector.record_event(
                &path,
                LogEvent::warning(codes::scanning::LONG_IDENTIFIER, "again"),
            );
        }

        let events = collector.file_events(&path);
        assert_eq!(events.len(), MAX_LOG_EVENTS_PER_FILE + 1);
        assert_eq!(events[MAX_LOG_EVENTS_PER_FILE].code, GENERIC_WARNING);
    }

    #[test]
    fn test_scan_time_is_recorded() {
        let collector = ErrorCollector::new();
        let context = FileProcessingContext::new(PathBuf::from("timed.html"), 1);

        collector.record_file(&context);
        assert_eq!(collector.scan_time(&context.file_path), None);

        collector.finish_file(&context);
        assert!(collector.scan_time(&context.file_path).is_some());
    }

    #[test]
    fn test_cargo_style_output() {
        let collector = ErrorCollector::new();
        let path = PathBuf::from("page.html");

        collector.record_event(
            &path,
            LogEvent::warning(codes::scanning::LONG_IDENTIFIER, "Long untyped run")
                .with_position(Position::new(4, 2, 5))
                .with_context("length", "300")
                .with_context("file", "page.html"),
        );
        collector.record_event(
            &path,
            LogEvent::error(codes::scanning::SOURCE_READ_FAILURE, "Read failed"),
        );
        collector.record_file(&FileProcessingContext::new(PathBuf::from("clean.html"), 2));

        let output = collector.format_cargo_style();
        assert!(output.starts_with("Checking page.html...\nerror[E020]: Read failed\n"));
        assert!(output.contains("warning[W020]: Long untyped run --> page.html:2:5"));
        assert!(output.contains("  = length: 300"));
        assert!(output.contains("  = help: Check the reader"));
        assert!(!output.contains("  = file:"));
        assert!(!output.contains("clean.html"));
        assert!(output.ends_with("Total errors: 1\nTotal warnings: 1\n"));
    }

    #[test]
    fn test_clear() {
        let collector = ErrorCollector::new();
        collector.record_event(
            Path::new("x"),
            LogEvent::warning(codes::scanning::LONG_IDENTIFIER, "w"),
        );
        collector.clear();
        assert_eq!(collector.summary(), ProcessingSummary::default());
    }
}
