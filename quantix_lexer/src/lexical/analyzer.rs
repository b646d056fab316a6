//! Lexical analyzer: runs the scanner over loaded sources and keeps metrics
//!
//! Unmatched input never aborts a scan; it shows up as `Error` tokens, which
//! the analyzer counts and optionally reports through the logging system.

use super::scanner::Lexer;
use crate::automaton::Lexicon;
use crate::config::runtime::LexicalPreferences;
use crate::file_processor::FileProcessingResult;
use crate::logging::codes;
use crate::tokens::Token;
use crate::{log_debug, log_error, log_success};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Counts gathered from one tokenization. The trailing `EOF` is not counted.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub error_tokens: usize,
    pub suppressed_tokens: usize,
    pub significant_tokens: usize,
    /// Tokens per category name, filled only with detailed metrics enabled
    pub per_category: BTreeMap<String, usize>,
    /// Longest token in code points
    pub longest_token: usize,
    pub char_count: usize,
}

impl LexicalMetrics {
    pub(crate) fn record_token(
        &mut self,
        token: &Token,
        lexicon: &Lexicon,
        preferences: &LexicalPreferences,
    ) {
        let typ = token.typ();
        if typ.is_eof() {
            return;
        }

        self.total_tokens += 1;
        self.longest_token = self.longest_token.max(token.len());

        let suppressed = lexicon.registry().is_suppressed(typ);
        if typ.is_error() {
            self.error_tokens += 1;
        } else if suppressed {
            self.suppressed_tokens += 1;
        } else {
            self.significant_tokens += 1;
        }

        if preferences.collect_detailed_metrics
            && (!suppressed || preferences.include_suppressed_in_counts)
        {
            *self
                .per_category
                .entry(lexicon.type_name(typ))
                .or_insert(0) += 1;
        }
    }

    pub fn count_for(&self, category: &str) -> usize {
        self.per_category.get(category).copied().unwrap_or(0)
    }
}

/// Tokenizes sources against a compiled [`Lexicon`] with global logging
pub struct LexicalAnalyzer {
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self::with_preferences(LexicalPreferences::default())
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    /// Scan `source` to completion. `origin` names the input in log events.
    pub fn tokenize(&mut self, lexicon: &Lexicon, source: Arc<[char]>, origin: &str) -> Lexer {
        self.metrics = LexicalMetrics {
            char_count: source.len(),
            ..LexicalMetrics::default()
        };

        log_debug!("Starting lexical analysis",
            "source" => origin,
            "char_count" => source.len(),
            "states" => lexicon.automaton().state_count()
        );

        let lexer = Lexer::from_chars(lexicon.automaton(), source);

        for token in lexer.tokens() {
            self.metrics.record_token(token, lexicon, &self.preferences);
        }

        if self.preferences.log_error_tokens && lexer.has_errors() {
            let source_map = lexer.source_map();
            for token in lexer.error_tokens() {
                let span = source_map.span(token.lext(), token.rext());
                log_error!(codes::lexical::UNMATCHED_INPUT, "No rule matches input",
                    span = span,
                    "text" => token.literal(),
                    "line" => span.start.line,
                    "column" => span.start.column,
                    "source" => origin
                );
            }
        }

        log_success!(codes::success::TOKENIZATION_COMPLETE,
            "Lexical analysis completed",
            "source" => origin,
            "token_count" => self.metrics.total_tokens,
            "significant" => self.metrics.significant_tokens,
            "suppressed" => self.metrics.suppressed_tokens,
            "errors" => self.metrics.error_tokens,
            "char_count" => self.metrics.char_count
        );

        lexer
    }

    pub fn tokenize_str(&mut self, lexicon: &Lexicon, text: &str) -> Lexer {
        self.tokenize(lexicon, text.chars().collect::<Vec<_>>().into(), "<input>")
    }

    /// Tokenize a loaded file; its path is attached to the log events
    pub fn tokenize_file_result(
        &mut self,
        lexicon: &Lexicon,
        file_result: &FileProcessingResult,
    ) -> Lexer {
        let origin = file_result.metadata.path.display().to_string();
        self.tokenize(lexicon, file_result.source.clone(), &origin)
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    pub fn set_preferences(&mut self, preferences: LexicalPreferences) {
        self.preferences = preferences;
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
