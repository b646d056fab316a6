use crate::file_processor::FileMetadata;
use crate::lexical::{Lexer, LexicalMetrics};
use crate::tokens::{TokenStream, TypeRegistry};
use std::time::Duration;

/// Scanned file with the metadata and metrics gathered on the way
#[derive(Debug)]
pub struct PipelineResult {
    pub file_metadata: FileMetadata,
    pub lexer: Lexer,
    pub lexical_metrics: LexicalMetrics,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn new(
        file_metadata: FileMetadata,
        lexer: Lexer,
        lexical_metrics: LexicalMetrics,
        processing_duration: Duration,
    ) -> Self {
        Self {
            file_metadata,
            lexer,
            lexical_metrics,
            processing_duration,
        }
    }

    /// Tokens including the trailing `EOF`
    pub fn token_count(&self) -> usize {
        self.lexer.tokens().len()
    }

    pub fn has_errors(&self) -> bool {
        self.lexer.has_errors()
    }

    pub fn into_token_stream(self, registry: &TypeRegistry) -> TokenStream {
        self.lexer.into_token_stream(registry)
    }

    pub fn log_success(&self, file_path: &str) {
        let seconds = self.processing_duration.as_secs_f64();
        let per_sec = |count: f64| if seconds > 0.0 { count / seconds } else { 0.0 };

        crate::log_success!(
            crate::logging::codes::success::OPERATION_COMPLETED_SUCCESSFULLY,
            "File scanning pipeline completed",
            "file" => file_path,
            "duration_ms" => format!("{:.2}", seconds * 1000.0),
            "processing_rate_bytes_per_sec" => format!("{:.0}", per_sec(self.file_metadata.size as f64)),
            "processing_rate_tokens_per_sec" => format!("{:.0}", per_sec(self.token_count() as f64)),
            "error_tokens" => self.lexical_metrics.error_tokens
        );
    }
}
