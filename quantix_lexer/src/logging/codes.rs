//! Consolidated error codes and classification system
//!
//! Single source of truth for all error codes, their metadata, and classification functions.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

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

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Critical" => Some(Severity::Critical),
            "High" => Some(Severity::High),
            "Medium" => Some(Severity::Medium),
            "Low" => Some(Severity::Low),
            _ => None,
        }
    }
}

/// Complete metadata for an error code
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
    pub fn new(
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
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
    pub const CONFIGURATION_ERROR: Code = Code::new("ERR003");
}

/// File processing error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
    pub const TOO_MANY_LINES: Code = Code::new("E013");
}

/// Scanning error codes
pub mod lexical {
    use super::Code;

    /// No rule accepts any prefix at the current position
    pub const UNMATCHED_INPUT: Code = Code::new("E020");
}

/// Literal decoding error codes
pub mod literal {
    use super::Code;

    pub const MALFORMED_ESCAPE: Code = Code::new("E030");
    pub const MALFORMED_CHAR_LITERAL: Code = Code::new("E031");
    pub const UNTERMINATED_ESCAPE: Code = Code::new("E032");
}

/// Rule compilation error codes
pub mod rules {
    use super::Code;

    pub const EMPTY_BRACKET: Code = Code::new("E040");
    pub const DUPLICATE_RULE: Code = Code::new("E041");
    pub const WHITESPACE_LITERAL: Code = Code::new("E042");
    pub const EMPTY_RULE_SET: Code = Code::new("E043");
    pub const TOO_MANY_STATES: Code = Code::new("E044");
    pub const EMPTY_LITERAL: Code = Code::new("E045");
    pub const TOO_MANY_RULES: Code = Code::new("E046");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    // General success codes
    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");

    // File processing success codes
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");

    // Lexical success codes
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");

    // Rule compilation success codes
    pub const AUTOMATON_CONSTRUCTED: Code = Code::new("I030");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

/// Initialize and get the error registry
fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let entries = [
            // System errors
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                true,
                "Critical internal system error",
                "File a bug report with the input that triggered it",
            ),
            ErrorMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                true,
                "System initialization failure",
                "Check system configuration and dependencies",
            ),
            ErrorMetadata::new(
                "ERR003",
                "System",
                Severity::High,
                false,
                true,
                "Runtime configuration could not be loaded",
                "Fix the configuration file or unset the offending environment variable",
            ),
            // File processing errors
            ErrorMetadata::new(
                "E005",
                "FileProcessing",
                Severity::Medium,
                false,
                true,
                "File not found at specified path",
                "Check file path and ensure file exists",
            ),
            ErrorMetadata::new(
                "E007",
                "FileProcessing",
                Severity::Medium,
                false,
                true,
                "File exceeds maximum size limit",
                "Reduce file size or select a build profile with higher limits",
            ),
            ErrorMetadata::new(
                "E008",
                "FileProcessing",
                Severity::Medium,
                false,
                true,
                "File is empty when content expected",
                "Provide a file with content or allow empty files in preferences",
            ),
            ErrorMetadata::new(
                "E009",
                "FileProcessing",
                Severity::Medium,
                false,
                true,
                "Permission denied accessing file",
                "Check file permissions and user access rights",
            ),
            ErrorMetadata::new(
                "E010",
                "FileProcessing",
                Severity::Medium,
                false,
                true,
                "Invalid UTF-8 encoding in file",
                "Convert file to UTF-8 encoding or fix encoding issues",
            ),
            ErrorMetadata::new(
                "E011",
                "FileProcessing",
                Severity::Medium,
                false,
                true,
                "I/O error during file operation",
                "Check disk space, permissions, and file system integrity",
            ),
            ErrorMetadata::new(
                "E012",
                "FileProcessing",
                Severity::Medium,
                false,
                true,
                "Invalid file path provided",
                "Provide a path to a regular file",
            ),
            ErrorMetadata::new(
                "E013",
                "FileProcessing",
                Severity::Medium,
                false,
                true,
                "File has more lines than the analysis limit",
                "Split the input or select a build profile with higher limits",
            ),
            // Scanning errors
            ErrorMetadata::new(
                "E020",
                "Lexical",
                Severity::Low,
                true,
                false,
                "Input not matched by any lexical rule",
                "Inspect the Error token span; the scanner resumes after it",
            ),
            // Literal errors
            ErrorMetadata::new(
                "E030",
                "Literal",
                Severity::Medium,
                true,
                false,
                "Unknown escape sequence in literal",
                "Use one of the supported escapes: \\' \\\" \\\\ \\t \\n \\r",
            ),
            ErrorMetadata::new(
                "E031",
                "Literal",
                Severity::Medium,
                true,
                false,
                "Character literal is not a single quoted character",
                "Write the literal as 'x' or as a supported escape such as '\\n'",
            ),
            ErrorMetadata::new(
                "E032",
                "Literal",
                Severity::Medium,
                true,
                false,
                "Literal ends with an unfinished escape",
                "Complete the escape sequence before the closing quote",
            ),
            // Rule compilation errors
            ErrorMetadata::new(
                "E040",
                "Rules",
                Severity::High,
                false,
                true,
                "Bracket expression contains no alternatives",
                "Give the bracket at least one alternative",
            ),
            ErrorMetadata::new(
                "E041",
                "Rules",
                Severity::High,
                false,
                true,
                "Token name declared more than once",
                "Remove or rename the duplicate rule",
            ),
            ErrorMetadata::new(
                "E042",
                "Rules",
                Severity::High,
                false,
                true,
                "String literal token contains whitespace",
                "Split the literal or define it as a rule with explicit characters",
            ),
            ErrorMetadata::new(
                "E043",
                "Rules",
                Severity::High,
                false,
                true,
                "No lexical rules were supplied",
                "Add at least one rule or literal before building",
            ),
            ErrorMetadata::new(
                "E044",
                "Rules",
                Severity::High,
                false,
                true,
                "Automaton state limit exceeded",
                "Simplify the rule set or raise the automaton limits",
            ),
            ErrorMetadata::new(
                "E045",
                "Rules",
                Severity::High,
                false,
                true,
                "String literal token is empty",
                "Remove the empty literal",
            ),
            ErrorMetadata::new(
                "E046",
                "Rules",
                Severity::High,
                false,
                true,
                "Too many lexical rules",
                "Merge rules or raise the rule limit",
            ),
            // Success codes
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
                "System initialization completed",
                "No action required",
            ),
            ErrorMetadata::new(
                "I006",
                "FileProcessing",
                Severity::Low,
                true,
                false,
                "File read and validated",
                "Continue to scanning",
            ),
            ErrorMetadata::new(
                "I020",
                "Lexical",
                Severity::Low,
                true,
                false,
                "Tokenization completed",
                "Hand the token list to the parser",
            ),
            ErrorMetadata::new(
                "I030",
                "Rules",
                Severity::Low,
                true,
                false,
                "Scanner automaton constructed",
                "Scan inputs with the built lexicon",
            ),
        ];

        entries
            .into_iter()
            .map(|metadata| (metadata.code, metadata))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific error code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get error severity from error code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for error code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for error code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get error category from error code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_declared_code_has_metadata() {
        let codes = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            system::CONFIGURATION_ERROR,
            file_processing::FILE_NOT_FOUND,
            file_processing::FILE_TOO_LARGE,
            file_processing::EMPTY_FILE,
            file_processing::PERMISSION_DENIED,
            file_processing::INVALID_ENCODING,
            file_processing::IO_ERROR,
            file_processing::INVALID_PATH,
            file_processing::TOO_MANY_LINES,
            lexical::UNMATCHED_INPUT,
            literal::MALFORMED_ESCAPE,
            literal::MALFORMED_CHAR_LITERAL,
            literal::UNTERMINATED_ESCAPE,
            rules::EMPTY_BRACKET,
            rules::DUPLICATE_RULE,
            rules::WHITESPACE_LITERAL,
            rules::EMPTY_RULE_SET,
            rules::TOO_MANY_STATES,
            rules::EMPTY_LITERAL,
            rules::TOO_MANY_RULES,
            success::OPERATION_COMPLETED_SUCCESSFULLY,
            success::SYSTEM_INITIALIZATION_COMPLETED,
            success::FILE_PROCESSING_SUCCESS,
            success::TOKENIZATION_COMPLETE,
            success::AUTOMATON_CONSTRUCTED,
        ];

        for code in codes {
            assert!(
                get_error_metadata(code.as_str()).is_some(),
                "missing metadata for {}",
                code
            );
        }
    }

    #[test]
    fn test_unmatched_input_is_recoverable() {
        let code = lexical::UNMATCHED_INPUT.as_str();
        assert!(is_recoverable(code));
        assert!(!requires_halt(code));
        assert_eq!(get_severity(code), Severity::Low);
        assert_eq!(get_category(code), "Lexical");
    }

    #[test]
    fn test_unknown_code_fallbacks() {
        assert_eq!(get_description("Z999"), "Unknown error");
        assert_eq!(get_category("Z999"), "Unknown");
        assert_eq!(get_severity("Z999"), Severity::Medium);
        assert!(is_recoverable("Z999"));
    }

    #[test]
    fn test_severity_round_trip_names() {
        for severity in [
            Severity::Critical,
            Severity::High,
            Severity::Medium,
            Severity::Low,
        ] {
            assert_eq!(Severity::from_str(severity.as_str()), Some(severity));
        }
    }
}
