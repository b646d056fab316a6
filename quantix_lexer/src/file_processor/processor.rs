//! File loading with compile-time limits and global logging integration

use crate::config::compile_time::file_processing::{
    LARGE_FILE_THRESHOLD, MAX_FILE_SIZE, MAX_LINE_COUNT_FOR_ANALYSIS,
};
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::codes;
use crate::{log_debug, log_error, log_success, log_warning};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

/// Unreadable-source errors. Every variant stops the file before scanning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("File is empty: {path}")]
    EmptyFile { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid UTF-8 in {path} after byte {valid_up_to}")]
    InvalidEncoding { path: String, valid_up_to: usize },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },

    #[error("File exceeds maximum line count: {lines} (max: {max_lines})")]
    TooManyLines { lines: usize, max_lines: usize },
}

impl FileProcessorError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            Self::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            Self::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            Self::EmptyFile { .. } => codes::file_processing::EMPTY_FILE,
            Self::PermissionDenied { .. } => codes::file_processing::PERMISSION_DENIED,
            Self::InvalidEncoding { .. } => codes::file_processing::INVALID_ENCODING,
            Self::IoError { .. } => codes::file_processing::IO_ERROR,
            Self::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
            Self::TooManyLines { .. } => codes::file_processing::TOO_MANY_LINES,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn severity(&self) -> codes::Severity {
        codes::get_severity(self.error_code().as_str())
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }
}

#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Canonical file path
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    pub line_count: usize,
    pub char_count: usize,
    pub modified: Option<SystemTime>,
}

impl FileMetadata {
    pub fn human_readable_size(&self) -> String {
        human_readable(self.size)
    }

    /// Above the compile-time large file threshold
    pub fn is_large_file(&self) -> bool {
        self.size > LARGE_FILE_THRESHOLD
    }
}

fn human_readable(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

/// Decoded source plus the metadata collected while loading it
#[derive(Debug, Clone)]
pub struct FileProcessingResult {
    /// Source as code points; tokens index into this buffer
    pub source: Arc<[char]>,
    pub metadata: FileMetadata,
    pub processing_duration: Duration,
}

impl FileProcessingResult {
    /// Wrap in-memory text as if it had been loaded from `path`
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        let source: Arc<[char]> = text.chars().collect::<Vec<_>>().into();
        Self {
            metadata: FileMetadata {
                path: path.into(),
                size: text.len() as u64,
                line_count: text.lines().count(),
                char_count: source.len(),
                modified: None,
            },
            source,
            processing_duration: Duration::ZERO,
        }
    }

    pub fn char_count(&self) -> usize {
        self.source.len()
    }

    /// Nothing but whitespace
    pub fn is_effectively_empty(&self) -> bool {
        self.source.iter().all(|c| c.is_whitespace())
    }

    /// Characters per millisecond
    pub fn processing_rate(&self) -> f64 {
        let duration_ms = self.processing_duration.as_secs_f64() * 1000.0;
        if duration_ms > 0.0 {
            self.char_count() as f64 / duration_ms
        } else {
            0.0
        }
    }

    pub fn source_text(&self) -> String {
        self.source.iter().collect()
    }
}

/// Loads source files under the compile-time size and line limits
#[derive(Debug, Clone)]
pub struct FileProcessor {
    pub allow_empty_files: bool,
    pub enable_performance_logging: bool,
}

impl FileProcessor {
    pub fn new() -> Self {
        Self::from_preferences(&FileProcessorPreferences::default())
    }

    pub fn from_preferences(prefs: &FileProcessorPreferences) -> Self {
        Self {
            allow_empty_files: prefs.allow_empty_files,
            enable_performance_logging: prefs.enable_performance_logging,
        }
    }

    pub fn with_empty_files_allowed(mut self, allowed: bool) -> Self {
        self.allow_empty_files = allowed;
        self
    }

    pub fn with_performance_logging(mut self, enabled: bool) -> Self {
        self.enable_performance_logging = enabled;
        self
    }

    pub fn max_file_size() -> u64 {
        MAX_FILE_SIZE
    }

    pub fn large_file_threshold() -> u64 {
        LARGE_FILE_THRESHOLD
    }

    /// Load `file_path` and decode it into code points
    pub fn process_file(
        &self,
        file_path: impl AsRef<Path>,
    ) -> Result<FileProcessingResult, FileProcessorError> {
        let start_time = Instant::now();
        let file_path = file_path.as_ref();
        let display = file_path.display().to_string();

        log_debug!("Starting file processing", "file" => &display);

        let path = self.validate_path(file_path, &display)?;
        let (size, modified) = self.check_metadata(&path, &display)?;
        let text = self.read_file(&path, &display)?;

        let line_count = text.lines().count();
        if line_count > MAX_LINE_COUNT_FOR_ANALYSIS {
            let error = FileProcessorError::TooManyLines {
                lines: line_count,
                max_lines: MAX_LINE_COUNT_FOR_ANALYSIS,
            };
            log_error!(error.error_code(), "File exceeds maximum line count",
                "file" => &display,
                "lines" => line_count,
                "max_lines" => MAX_LINE_COUNT_FOR_ANALYSIS
            );
            return Err(error);
        }

        let source: Arc<[char]> = text.chars().collect::<Vec<_>>().into();
        let result = FileProcessingResult {
            metadata: FileMetadata {
                path,
                size,
                line_count,
                char_count: source.len(),
                modified,
            },
            source,
            processing_duration: start_time.elapsed(),
        };

        self.log_processing_success(&result, &display);
        Ok(result)
    }

    fn log_processing_success(&self, result: &FileProcessingResult, file_path: &str) {
        let duration_ms = format!("{:.2}", result.processing_duration.as_secs_f64() * 1000.0);

        if self.enable_performance_logging {
            log_success!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "File processed successfully with performance metrics",
                "file" => file_path,
                "size_bytes" => result.metadata.size,
                "size_human" => result.metadata.human_readable_size(),
                "lines" => result.metadata.line_count,
                "chars" => result.char_count(),
                "duration_ms" => duration_ms,
                "chars_per_ms" => format!("{:.2}", result.processing_rate()),
                "is_large_file" => result.metadata.is_large_file()
            );
        } else {
            log_success!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "File processed successfully",
                "file" => file_path,
                "size_bytes" => result.metadata.size,
                "lines" => result.metadata.line_count,
                "duration_ms" => duration_ms
            );
        }
    }

    fn validate_path(&self, file_path: &Path, display: &str) -> Result<PathBuf, FileProcessorError> {
        if file_path.as_os_str().is_empty() {
            let error = FileProcessorError::InvalidPath {
                path: display.to_string(),
            };
            log_error!(error.error_code(), "Empty file path provided");
            return Err(error);
        }

        if !file_path.exists() {
            let error = FileProcessorError::FileNotFound {
                path: display.to_string(),
            };
            log_error!(error.error_code(), "File not found", "path" => display);
            return Err(error);
        }

        if !file_path.is_file() {
            let error = FileProcessorError::InvalidPath {
                path: display.to_string(),
            };
            log_error!(error.error_code(), "Path is not a file", "path" => display);
            return Err(error);
        }

        file_path.canonicalize().map_err(|e| {
            let error = FileProcessorError::IoError {
                message: format!("Failed to resolve path '{}': {}", display, e),
            };
            log_error!(error.error_code(), "Failed to canonicalize path",
                "path" => display,
                "io_error" => e
            );
            error
        })
    }

    /// Size and modification time, checked against the size limits
    fn check_metadata(
        &self,
        path: &Path,
        display: &str,
    ) -> Result<(u64, Option<SystemTime>), FileProcessorError> {
        let metadata = fs::metadata(path).map_err(|e| {
            let error = match e.kind() {
                std::io::ErrorKind::PermissionDenied => FileProcessorError::PermissionDenied {
                    path: display.to_string(),
                },
                _ => FileProcessorError::IoError {
                    message: format!("Failed to read metadata for '{}': {}", display, e),
                },
            };
            log_error!(error.error_code(), "Failed to read file metadata",
                "path" => display,
                "io_error" => e
            );
            error
        })?;

        let size = metadata.len();
        if size > MAX_FILE_SIZE {
            let error = FileProcessorError::FileTooLarge {
                size,
                max_size: MAX_FILE_SIZE,
            };
            log_error!(error.error_code(), "File exceeds compile-time maximum size limit",
                "file" => display,
                "size_bytes" => size,
                "size_human" => human_readable(size),
                "limit_human" => human_readable(MAX_FILE_SIZE)
            );
            return Err(error);
        }

        if size == 0 {
            if !self.allow_empty_files {
                let error = FileProcessorError::EmptyFile {
                    path: display.to_string(),
                };
                log_error!(error.error_code(), "File is empty", "file" => display);
                return Err(error);
            }
            log_warning!("Empty file accepted; it scans to end-of-input only", "file" => display);
        }

        Ok((size, metadata.modified().ok()))
    }

    fn read_file(&self, path: &Path, display: &str) -> Result<String, FileProcessorError> {
        let bytes = fs::read(path).map_err(|e| {
            let error = match e.kind() {
                std::io::ErrorKind::PermissionDenied => FileProcessorError::PermissionDenied {
                    path: display.to_string(),
                },
                _ => FileProcessorError::IoError {
                    message: format!("Failed to read file '{}': {}", display, e),
                },
            };
            log_error!(error.error_code(), "Failed to read file",
                "file" => display,
                "io_error" => e
            );
            error
        })?;

        String::from_utf8(bytes).map_err(|e| {
            let error = FileProcessorError::InvalidEncoding {
                path: display.to_string(),
                valid_up_to: e.utf8_error().valid_up_to(),
            };
            log_error!(error.error_code(), "Invalid UTF-8 encoding in file",
                "file" => display,
                "valid_up_to" => e.utf8_error().valid_up_to()
            );
            error
        })
    }
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn test_process_valid_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("rules.qx");
        let content = "id : letter ;\nnum : <number> ;\n";
        fs::write(&file_path, content).unwrap();

        let result = FileProcessor::new().process_file(&file_path).unwrap();
        assert_eq!(result.metadata.line_count, 2);
        assert_eq!(result.char_count(), content.chars().count());
        assert_eq!(result.metadata.char_count, result.char_count());
        assert_eq!(result.source_text(), content);
        assert!(!result.is_effectively_empty());
    }

    #[test]
    fn test_multibyte_source_is_code_points() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("unicode.qx");
        fs::write(&file_path, "héllo ∀").unwrap();

        let result = FileProcessor::new().process_file(&file_path).unwrap();
        assert_eq!(result.char_count(), 7);
        assert!(result.metadata.size > 7);
        assert_eq!(result.source[1], 'é');
    }

    #[test]
    fn test_file_not_found() {
        let result = FileProcessor::new().process_file("nonexistent.qx");
        assert_matches!(result, Err(FileProcessorError::FileNotFound { .. }));
    }

    #[test]
    fn test_directory_is_invalid_path() {
        let dir = tempdir().unwrap();
        let result = FileProcessor::new().process_file(dir.path());
        assert_matches!(result, Err(FileProcessorError::InvalidPath { .. }));

        assert_matches!(
            FileProcessor::new().process_file(""),
            Err(FileProcessorError::InvalidPath { .. })
        );
    }

    #[test]
    fn test_compile_time_file_size_limit() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("large.qx");
        fs::write(&file_path, "a".repeat((MAX_FILE_SIZE + 1) as usize)).unwrap();

        let result = FileProcessor::new().process_file(&file_path);
        assert_matches!(
            result,
            Err(FileProcessorError::FileTooLarge { size, max_size })
                if size > MAX_FILE_SIZE && max_size == MAX_FILE_SIZE
        );
    }

    #[test]
    fn test_empty_file_gated_by_preference() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("empty.qx");
        fs::write(&file_path, "").unwrap();

        let strict = FileProcessor::new().with_empty_files_allowed(false);
        assert_matches!(
            strict.process_file(&file_path),
            Err(FileProcessorError::EmptyFile { .. })
        );

        let lenient = FileProcessor::new().with_empty_files_allowed(true);
        let result = lenient.process_file(&file_path).unwrap();
        assert_eq!(result.char_count(), 0);
        assert!(result.is_effectively_empty());
    }

    #[test]
    fn test_invalid_utf8() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("binary.qx");
        fs::write(&file_path, [b'o', b'k', 0xff, 0xfe]).unwrap();

        let result = FileProcessor::new().process_file(&file_path);
        assert_matches!(
            result,
            Err(FileProcessorError::InvalidEncoding { valid_up_to: 2, .. })
        );
    }

    #[test]
    fn test_too_many_lines() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("many_lines.qx");
        fs::write(&file_path, "x\n".repeat(MAX_LINE_COUNT_FOR_ANALYSIS + 1)).unwrap();

        let result = FileProcessor::new().process_file(&file_path);
        assert_matches!(
            &result,
            Err(FileProcessorError::TooManyLines { max_lines, .. })
                if *max_lines == MAX_LINE_COUNT_FOR_ANALYSIS
        );
        assert_eq!(
            result.unwrap_err().error_code(),
            codes::file_processing::TOO_MANY_LINES
        );
    }

    #[test]
    fn test_error_methods() {
        let error = FileProcessorError::FileNotFound {
            path: "test.qx".to_string(),
        };

        assert_eq!(error.error_code().as_str(), "E005");
        assert_eq!(error.category(), "FileProcessing");
        assert_eq!(error.severity(), codes::Severity::Medium);
        assert!(!error.is_recoverable());
        assert!(error.requires_halt());
    }

    #[test]
    fn test_from_text() {
        let result = FileProcessingResult::from_text("<memory>", "a\nb");
        assert_eq!(result.metadata.line_count, 2);
        assert_eq!(result.metadata.path, PathBuf::from("<memory>"));
        assert_eq!(result.processing_rate(), 0.0);
    }

    #[test]
    fn test_human_readable_size() {
        assert_eq!(human_readable(512), "512 B");
        assert_eq!(human_readable(2048), "2.00 KB");
        assert_eq!(human_readable(3 * 1024 * 1024), "3.00 MB");
    }
}
