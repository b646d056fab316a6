mod error;
mod result;

pub use error::PipelineError;
pub use result::PipelineResult;

use crate::automaton::Lexicon;
use crate::config::runtime::{FileProcessorPreferences, LexicalPreferences};
use crate::file_processor::FileProcessor;
use crate::lexical::LexicalAnalyzer;
use crate::logging;
use std::path::Path;
use std::time::Instant;

/// Load `file_path` and scan it against `lexicon` (file -> lexical)
pub fn process_file(
    file_path: impl AsRef<Path>,
    lexicon: &Lexicon,
) -> Result<PipelineResult, PipelineError> {
    process_file_with_preferences(
        file_path,
        lexicon,
        &FileProcessorPreferences::default(),
        LexicalPreferences::default(),
    )
}

pub fn process_file_with_preferences(
    file_path: impl AsRef<Path>,
    lexicon: &Lexicon,
    file_preferences: &FileProcessorPreferences,
    lexical_preferences: LexicalPreferences,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();
    let file_path = file_path.as_ref();
    let display = file_path.display().to_string();

    logging::with_file_context(file_path.to_path_buf(), 0, || {
        crate::log_info!("Starting file scanning pipeline",
            "file" => &display,
            "rules" => lexicon.rules().len()
        );

        // Stage 1: File processing
        let processor = FileProcessor::from_preferences(file_preferences);
        let file_result = processor.process_file(file_path)?;

        // Stage 2: Lexical analysis
        let mut analyzer = LexicalAnalyzer::with_preferences(lexical_preferences);
        let lexer = analyzer.tokenize_file_result(lexicon, &file_result);

        let result = PipelineResult::new(
            file_result.metadata,
            lexer,
            analyzer.metrics().clone(),
            start_time.elapsed(),
        );

        result.log_success(&display);
        Ok(result)
    })
}

/// Scan `file_path` with the rule language's own lexicon
pub fn process_rule_file(file_path: impl AsRef<Path>) -> Result<PipelineResult, PipelineError> {
    let lexicon = crate::grammar::bootstrap_lexicon()?;
    process_file(file_path, &lexicon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_processor::FileProcessorError;
    use crate::grammar::bootstrap_lexicon;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_process_rule_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("rules.qx");
        fs::write(
            &file_path,
            "package demo\n\n// identifiers\nId : letter { letter | number } ;\n",
        )
        .unwrap();

        let result = process_rule_file(&file_path).unwrap();
        assert!(!result.has_errors());
        assert_eq!(result.file_metadata.line_count, 4);
        assert_eq!(result.lexical_metrics.suppressed_tokens, 1);

        let lexicon = bootstrap_lexicon().unwrap();
        let stream = result.into_token_stream(lexicon.registry());
        let first = stream.iter_significant().next().unwrap();
        assert_eq!(first.typ(), lexicon.lookup("package").unwrap());
    }

    #[test]
    fn test_error_tokens_do_not_fail_pipeline() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("bad.qx");
        fs::write(&file_path, "Id : # ;").unwrap();

        let lexicon = bootstrap_lexicon().unwrap();
        let result = process_file(&file_path, &lexicon).unwrap();
        assert!(result.has_errors());
        assert_eq!(result.lexical_metrics.error_tokens, 1);
    }

    #[test]
    fn test_missing_file() {
        let lexicon = bootstrap_lexicon().unwrap();
        let result = process_file("does/not/exist.qx", &lexicon);

        assert_matches!(
            result,
            Err(PipelineError::FileProcessing(FileProcessorError::FileNotFound { .. }))
        );
    }

    #[test]
    fn test_error_code_delegates_to_stage() {
        let error = PipelineError::from(FileProcessorError::EmptyFile {
            path: "x.qx".to_string(),
        });
        assert_eq!(error.error_code().as_str(), "E008");
        assert_eq!(
            PipelineError::pipeline_error("boom").error_code(),
            crate::logging::codes::system::INTERNAL_ERROR
        );
    }
}
