//! Lexical analysis module
//!
//! [`scanner`] holds the table-driven maximal-munch scanner; [`analyzer`]
//! wraps it with metrics and logging for loaded files.

pub mod analyzer;
pub mod scanner;

use crate::automaton::Lexicon;
use crate::config::runtime::LexicalPreferences;
use crate::file_processor::FileProcessingResult;

pub use analyzer::{LexicalAnalyzer, LexicalMetrics};
pub use scanner::Lexer;

/// Tokenize in-memory text with default preferences
pub fn tokenize_str(lexicon: &Lexicon, text: &str) -> Lexer {
    LexicalAnalyzer::new().tokenize_str(lexicon, text)
}

/// Tokenize a loaded file with default preferences
pub fn tokenize_file_result(lexicon: &Lexicon, file_result: &FileProcessingResult) -> Lexer {
    LexicalAnalyzer::new().tokenize_file_result(lexicon, file_result)
}

/// Create a new lexical analyzer with default preferences
pub fn create_analyzer() -> LexicalAnalyzer {
    LexicalAnalyzer::new()
}

pub fn create_analyzer_with_preferences(preferences: LexicalPreferences) -> LexicalAnalyzer {
    LexicalAnalyzer::with_preferences(preferences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::bootstrap_lexicon;

    #[test]
    fn test_create_analyzer_with_preferences() {
        let prefs = LexicalPreferences {
            log_error_tokens: false,
            collect_detailed_metrics: false,
            include_suppressed_in_counts: true,
        };
        let analyzer = create_analyzer_with_preferences(prefs);
        assert!(!analyzer.preferences().log_error_tokens);
        assert!(analyzer.preferences().include_suppressed_in_counts);
        assert_eq!(create_analyzer().metrics(), &LexicalMetrics::default());
    }

    #[test]
    fn test_tokenize_str_ends_with_eof() {
        let lexicon = bootstrap_lexicon().unwrap();
        let lexer = tokenize_str(&lexicon, "package demo");

        let last = lexer.tokens().last().unwrap();
        assert!(last.typ().is_eof());
        assert_eq!(last.lext(), 12);
        assert_eq!(lexer.tokens()[0].typ(), lexicon.lookup("package").unwrap());
        assert_eq!(lexer.tokens()[1].typ(), lexicon.lookup("nt").unwrap());
    }

    #[test]
    fn test_tokenize_file_result() {
        let lexicon = bootstrap_lexicon().unwrap();
        let file = FileProcessingResult::from_text("rules.qx", "'a' \"bc\"");
        let lexer = tokenize_file_result(&lexicon, &file);

        let types: Vec<_> = lexer.tokens().iter().map(|t| t.typ()).collect();
        assert_eq!(
            types,
            vec![
                crate::tokens::TokenType::CHAR_LIT,
                crate::tokens::TokenType::STRING_LIT,
                crate::tokens::TokenType::EOF,
            ]
        );
    }
}
