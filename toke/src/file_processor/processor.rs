//! Reads a source file into memory for scanning
//!
//! The scanner consumes raw bytes, so files are never decoded. Every failure
//! is logged with its code before it is returned.

use crate::config::compile_time::file_processing::{LARGE_FILE_THRESHOLD, MAX_FILE_SIZE};
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::{codes, Code};
use crate::{log_debug, log_error, log_success, log_warning};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },

    #[error("Not a readable file path: {path}")]
    InvalidPath { path: String },
}

impl FileProcessorError {
    pub fn error_code(&self) -> Code {
        use codes::file_processing::*;
        match self {
            Self::FileNotFound { .. } => FILE_NOT_FOUND,
            Self::FileTooLarge { .. } => FILE_TOO_LARGE,
            Self::PermissionDenied { .. } => PERMISSION_DENIED,
            Self::IoError { .. } => IO_ERROR,
            Self::InvalidPath { .. } => INVALID_PATH,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    fn from_io(error: &io::Error, path: &Path) -> Self {
        let path = path.display().to_string();
        match error.kind() {
            io::ErrorKind::NotFound => Self::FileNotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::IoError {
                message: format!("{}: {}", path, error),
            },
        }
    }
}

/// What the processor learned about a file while loading it
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Canonical path
    pub path: PathBuf,
    pub size: u64,
    /// Lowercased, without the dot
    pub extension: Option<String>,
    /// Text lines in the file, counting a final unterminated line. This is
    /// not the scanner's `lines` metric, which is the 1-based line its
    /// cursor ends on and so is one higher after a trailing newline.
    pub line_count: usize,
    pub modified: Option<SystemTime>,
}

impl FileMetadata {
    fn from_fs(path: PathBuf, metadata: &fs::Metadata) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        Self {
            path,
            size: metadata.len(),
            extension,
            line_count: 0,
            modified: metadata.modified().ok(),
        }
    }

    pub fn human_readable_size(&self) -> String {
        human_readable(self.size)
    }

    pub fn is_large_file(&self) -> bool {
        self.size > LARGE_FILE_THRESHOLD
    }
}

fn human_readable(size: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if size < 1024 {
        return format!("{} B", size);
    }
    let mut scaled = size as f64 / 1024.0;
    let mut unit = 0;
    while scaled >= 1024.0 && unit + 1 < UNITS.len() {
        scaled /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", scaled, UNITS[unit])
}

fn count_lines(bytes: &[u8]) -> usize {
    let newlines = bytes.iter().filter(|&&b| b == b'\n').count();
    if bytes.last().is_some_and(|&b| b != b'\n') {
        newlines + 1
    } else {
        newlines
    }
}

/// File content ready for a byte source
#[derive(Debug, Clone)]
pub struct FileProcessingResult {
    pub source: Vec<u8>,
    pub metadata: FileMetadata,
    pub processing_duration: Duration,
}

impl FileProcessingResult {
    /// Throughput in bytes per millisecond; zero for an instant load
    pub fn processing_rate(&self) -> f64 {
        let millis = self.processing_duration.as_secs_f64() * 1000.0;
        if millis > 0.0 {
            self.source.len() as f64 / millis
        } else {
            0.0
        }
    }
}

/// Size limits are fixed at build time; what gets logged is a runtime choice
#[derive(Debug, Clone)]
pub struct FileProcessor {
    pub enable_performance_logging: bool,
    pub warn_on_large_files: bool,
}

impl FileProcessor {
    pub fn new() -> Self {
        Self {
            enable_performance_logging: true,
            warn_on_large_files: true,
        }
    }

    pub fn from_preferences(prefs: &FileProcessorPreferences) -> Self {
        Self {
            enable_performance_logging: prefs.enable_performance_logging,
            warn_on_large_files: prefs.warn_on_large_files,
        }
    }

    pub fn with_performance_logging(mut self, enabled: bool) -> Self {
        self.enable_performance_logging = enabled;
        self
    }

    pub fn with_large_file_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_large_files = enabled;
        self
    }

    pub fn max_file_size() -> u64 {
        MAX_FILE_SIZE
    }

    pub fn large_file_threshold() -> u64 {
        LARGE_FILE_THRESHOLD
    }

    /// Read `file_path` whole. Empty files are valid input.
    pub fn process_file<P: AsRef<Path>>(
        &self,
        file_path: P,
    ) -> Result<FileProcessingResult, FileProcessorError> {
        let started = Instant::now();
        let file_path = file_path.as_ref();
        log_debug!("Loading source file", "file" => file_path.display());

        let mut metadata = self.inspect(file_path)?;
        let source = fs::read(&metadata.path)
            .map_err(|e| io_failure(&e, file_path, "Failed to read file contents"))?;
        metadata.line_count = count_lines(&source);

        let result = FileProcessingResult {
            source,
            metadata,
            processing_duration: started.elapsed(),
        };
        self.report(&result, file_path);
        Ok(result)
    }

    /// Resolve the path and check it names a regular file within the size limit
    fn inspect(&self, file_path: &Path) -> Result<FileMetadata, FileProcessorError> {
        if file_path.as_os_str().is_empty() {
            return Err(rejected(
                FileProcessorError::InvalidPath {
                    path: String::new(),
                },
                "Empty file path provided",
            ));
        }

        let canonical = file_path
            .canonicalize()
            .map_err(|e| io_failure(&e, file_path, "Failed to resolve path"))?;
        let fs_metadata = fs::metadata(&canonical)
            .map_err(|e| io_failure(&e, file_path, "Failed to read file metadata"))?;

        if !fs_metadata.is_file() {
            return Err(rejected(
                FileProcessorError::InvalidPath {
                    path: file_path.display().to_string(),
                },
                "Path is not a regular file",
            ));
        }

        let metadata = FileMetadata::from_fs(canonical, &fs_metadata);
        log_debug!("File metadata collected",
            "path" => metadata.path.display(),
            "size_bytes" => metadata.size,
            "extension" => metadata.extension.as_deref().unwrap_or("none"));

        if metadata.size > MAX_FILE_SIZE {
            let error = FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_FILE_SIZE,
            };
            log_error!(error.error_code(), "File exceeds the compile-time size limit",
                "size_human" => metadata.human_readable_size(),
                "limit_human" => human_readable(MAX_FILE_SIZE));
            return Err(error);
        }

        if self.warn_on_large_files && metadata.is_large_file() {
            log_warning!(codes::file_processing::LARGE_FILE, "File is above the large-file threshold",
                "size_human" => metadata.human_readable_size(),
                "threshold_bytes" => LARGE_FILE_THRESHOLD);
        }

        Ok(metadata)
    }

    fn report(&self, result: &FileProcessingResult, file_path: &Path) {
        let metadata = &result.metadata;
        if self.enable_performance_logging {
            log_success!(codes::success::FILE_PROCESSING_SUCCESS, "Source file loaded",
                "file" => file_path.display(),
                "size_human" => metadata.human_readable_size(),
                "lines" => metadata.line_count,
                "duration_ms" => format!("{:.2}", result.processing_duration.as_secs_f64() * 1000.0),
                "bytes_per_ms" => format!("{:.2}", result.processing_rate()));
        } else {
            log_success!(codes::success::FILE_PROCESSING_SUCCESS, "Source file loaded",
                "file" => file_path.display(),
                "size_bytes" => metadata.size);
        }
    }
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}

fn rejected(error: FileProcessorError, message: &str) -> FileProcessorError {
    log_error!(error.error_code(), message, "reason" => &error);
    error
}

fn io_failure(error: &io::Error, path: &Path, message: &str) -> FileProcessorError {
    let failure = FileProcessorError::from_io(error, path);
    log_error!(failure.error_code(), message,
        "path" => path.display(),
        "io_error" => error);
    failure
}
