//! Global logging module for the Quantix lexer
//!
//! Provides thread-safe global logging with per-thread file context
//! and a small macro interface.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

// Re-export main types
pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

/// File currently being processed on this thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContext {
    pub file_path: PathBuf,
    pub file_id: usize,
}

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    static FILE_CONTEXT: RefCell<Option<FileContext>> = const { RefCell::new(None) };
    static CAPTURE: RefCell<Option<Arc<MemoryLogger>>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging system
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| {
        initialization_failure(format!("Configuration validation failed: {}", e))
    })?;

    let logging_service = Arc::new(service::create_configured_service());

    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| initialization_failure("Global logger already initialized"))?;

    let required_codes = [
        codes::system::INTERNAL_ERROR,
        codes::file_processing::FILE_NOT_FOUND,
        codes::lexical::UNMATCHED_INPUT,
        codes::rules::DUPLICATE_RULE,
    ];
    for code in required_codes {
        if codes::get_description(code.as_str()) == "Unknown error" {
            return Err(initialization_failure(format!(
                "Missing metadata for error code: {}",
                code
            )));
        }
    }

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Report a startup failure and hand the message back for the caller's error
fn initialization_failure(message: impl Into<String>) -> String {
    let message = message.into();
    if !is_initialized() {
        safe_log_error(codes::system::INITIALIZATION_FAILURE, &message);
    }
    crate::log_error!(codes::system::INITIALIZATION_FAILURE, &message);
    message
}

/// Initialize with custom service (primarily for testing)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized")?;

    Ok(())
}

/// Check if global logging is initialized
pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

// ============================================================================
// EVENT CAPTURE
// ============================================================================

/// Run `f` while recording every event emitted on this thread through the
/// macro interface. Capture ignores the global level filter.
pub fn capture_events<F, R>(f: F) -> (R, Vec<LogEvent>)
where
    F: FnOnce() -> R,
{
    let memory = service::create_test_logger();
    let previous = CAPTURE.with(|cap| cap.borrow_mut().replace(memory.clone()));
    let result = f();
    CAPTURE.with(|cap| *cap.borrow_mut() = previous);
    (result, memory.get_events())
}

fn dispatch(event: LogEvent) {
    CAPTURE.with(|cap| {
        if let Some(memory) = cap.borrow().as_ref() {
            memory.log(&event);
        }
    });

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

// ============================================================================
// FILE CONTEXT MANAGEMENT
// ============================================================================

/// Set file context for current thread
pub fn set_file_context(file_path: PathBuf, file_id: usize) {
    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(FileContext { file_path, file_id });
    });
}

/// Clear file context for current thread
pub fn clear_file_context() {
    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Execute function with file context
pub fn with_file_context<F, R>(file_path: PathBuf, file_id: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    set_file_context(file_path, file_id);
    let result = f();
    clear_file_context();
    result
}

/// Get current file context (used by macros)
pub fn get_current_file_context() -> Option<FileContext> {
    FILE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// Tag an event with the current file, when one is set and the user wants it
pub fn attach_file_context(event: LogEvent) -> LogEvent {
    if !config::include_file_context() {
        return event;
    }

    match get_current_file_context() {
        Some(file_ctx) => event
            .with_context("file", &file_ctx.file_path.display().to_string())
            .with_context("file_id", &file_ctx.file_id.to_string()),
        None => event,
    }
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

/// Log error with context (used by log_error! macro)
pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<crate::utils::Span>,
    context: Vec<(&str, &str)>,
) {
    let mut event = LogEvent::error(code, &config::clamp_message(message));

    if let Some(s) = span {
        event = event.with_span(s);
    }

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    dispatch(attach_file_context(event));
}

/// Log success with context (used by log_success! macro)
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::success(code, &config::clamp_message(message));

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    dispatch(attach_file_context(event));
}

/// Log info with context (used by log_info! macro)
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::info(&config::clamp_message(message));

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    dispatch(attach_file_context(event));
}

/// Log a warning or debug event built by the macros
pub fn log_prepared_event(event: LogEvent) {
    dispatch(event);
}

// ============================================================================
// SAFE FALLBACK LOGGING
// ============================================================================

/// Safe error logging (won't panic if uninitialized)
pub fn safe_log_error(code: Code, message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(LogEvent::error(code, message));
    } else {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_context_management() {
        let file_path = PathBuf::from("rules.qx");

        assert!(get_current_file_context().is_none());

        set_file_context(file_path.clone(), 1);
        let context = get_current_file_context();
        assert_eq!(context.map(|c| c.file_path), Some(file_path));

        clear_file_context();
        assert!(get_current_file_context().is_none());
    }

    #[test]
    fn test_with_file_context() {
        let file_path = PathBuf::from("rules.qx");

        let result = with_file_context(file_path.clone(), 2, || {
            let context = get_current_file_context().unwrap();
            assert_eq!(context.file_path, file_path);
            assert_eq!(context.file_id, 2);
            42
        });

        assert_eq!(result, 42);
        assert!(get_current_file_context().is_none());
    }

    #[test]
    fn test_capture_events_records_macro_output() {
        let ((), events) = capture_events(|| {
            crate::log_error!(codes::lexical::UNMATCHED_INPUT, "No rule matches", "offset" => 4);
            crate::log_success!(codes::success::TOKENIZATION_COMPLETE, "done");
        });

        assert_eq!(events.len(), 2);
        assert!(events[0].is_error());
        assert_eq!(events[0].context.get("offset").map(String::as_str), Some("4"));
        assert_eq!(events[1].code, codes::success::TOKENIZATION_COMPLETE);
    }

    #[test]
    fn test_capture_is_scoped() {
        let (_, events) = capture_events(|| ());
        assert!(events.is_empty());

        crate::log_info!("outside capture");
        let (_, events) = capture_events(|| crate::log_info!("inside capture"));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "inside capture");
    }

    #[test]
    fn test_initialization_failure_uses_system_code() {
        let (message, events) = capture_events(|| initialization_failure("boom"));

        assert_eq!(message, "boom");
        assert!(events
            .iter()
            .any(|e| e.code == codes::system::INITIALIZATION_FAILURE && e.message == "boom"));
    }

    #[test]
    fn test_safe_logging() {
        safe_log_error(codes::system::INTERNAL_ERROR, "Test error");
    }
}
