//! Filtered token stream for downstream consumers
//!
//! The scanner emits every token, suppressed categories included. This stream
//! keeps the full list for diagnostics and navigates only the significant
//! ones, so span information stays exact after filtering.

use super::registry::TypeRegistry;
use super::token::{Token, TokenType};
use crate::utils::{SourceMap, Span};

#[derive(Debug, Clone)]
pub struct TokenStream {
    /// All tokens, including suppressed ones
    all_tokens: Vec<Token>,
    /// Indices into all_tokens for significant tokens
    significant_indices: Vec<usize>,
    /// Current position in significant_indices
    position: usize,
    source_map: Option<SourceMap>,
}

impl TokenStream {
    /// Build a stream hiding every category the registry marks as suppressed.
    /// End-of-input is always significant.
    pub fn new(tokens: Vec<Token>, registry: &TypeRegistry) -> Self {
        let significant_indices: Vec<usize> = tokens
            .iter()
            .enumerate()
            .filter(|(_, tok)| tok.typ() == TokenType::EOF || !registry.is_suppressed(tok.typ()))
            .map(|(i, _)| i)
            .collect();

        crate::log_debug!("Token stream filtered",
            "total_tokens" => tokens.len(),
            "significant_tokens" => significant_indices.len()
        );

        let source_map = tokens.first().map(|tok| SourceMap::new(tok.input().clone()));

        Self {
            all_tokens: tokens,
            significant_indices,
            position: 0,
            source_map,
        }
    }

    /// Stream over every token, no filtering
    pub fn with_all_tokens(tokens: Vec<Token>) -> Self {
        let significant_indices = (0..tokens.len()).collect();
        let source_map = tokens.first().map(|tok| SourceMap::new(tok.input().clone()));
        Self {
            all_tokens: tokens,
            significant_indices,
            position: 0,
            source_map,
        }
    }

    // === NAVIGATION ===

    pub fn current(&self) -> Option<&Token> {
        self.peek_ahead(0)
    }

    pub fn peek(&self) -> Option<&Token> {
        self.peek_ahead(1)
    }

    /// Peek ahead by n positions in significant tokens
    pub fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.significant_indices
            .get(self.position + n)
            .and_then(|&original_index| self.all_tokens.get(original_index))
    }

    /// Advance to the next significant token
    pub fn advance(&mut self) -> Option<&Token> {
        if self.position < self.significant_indices.len() {
            self.position += 1;
        }
        self.current()
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.significant_indices.len()
    }

    /// Number of significant tokens
    pub fn len(&self) -> usize {
        self.significant_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.significant_indices.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining_count(&self) -> usize {
        self.significant_indices.len().saturating_sub(self.position)
    }

    /// Save current position as checkpoint for backtracking
    pub fn save_position(&self) -> usize {
        self.position
    }

    pub fn restore_position(&mut self, saved_position: usize) {
        self.position = saved_position.min(self.significant_indices.len());
    }

    /// Consume the current token if it has category `expected`
    pub fn expect(&mut self, expected: TokenType) -> Result<Token, TokenStreamError> {
        match self.current() {
            Some(tok) if tok.typ() == expected => {
                let tok = tok.clone();
                self.advance();
                Ok(tok)
            }
            Some(tok) => Err(TokenStreamError::UnexpectedToken {
                expected,
                found: tok.typ(),
                lext: tok.lext(),
            }),
            None => Err(TokenStreamError::UnexpectedEndOfStream { expected }),
        }
    }

    // === SPANS AND DIAGNOSTICS ===

    pub fn current_span(&self) -> Option<Span> {
        let tok = self.current()?;
        let map = self.source_map.as_ref()?;
        Some(map.span(tok.lext(), tok.rext()))
    }

    /// Render an error pointing at `span` with a source excerpt
    pub fn format_error(&self, span: Span, message: &str) -> String {
        match &self.source_map {
            Some(map) => map.format_error(&span, message),
            None => format!("error at {}: {}", span, message),
        }
    }

    // === ITERATION ===

    pub fn iter_significant(&self) -> impl Iterator<Item = &Token> {
        self.significant_indices
            .iter()
            .map(|&i| &self.all_tokens[i])
    }

    /// All tokens, suppressed ones included
    pub fn all_tokens(&self) -> &[Token] {
        &self.all_tokens
    }

    pub fn has_eof(&self) -> bool {
        self.significant_indices
            .last()
            .and_then(|&i| self.all_tokens.get(i))
            .map(|tok| tok.typ() == TokenType::EOF)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenStreamError {
    #[error("expected {expected}, found {found} at offset {lext}")]
    UnexpectedToken {
        expected: TokenType,
        found: TokenType,
        lext: usize,
    },
    #[error("expected {expected}, but reached end of input")]
    UnexpectedEndOfStream { expected: TokenType },
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::Arc;

    fn setup() -> (Vec<Token>, TypeRegistry) {
        let mut registry = TypeRegistry::new();
        let word = registry.register("word", false);
        let comment = registry.register("comment", true);

        let input: Arc<[char]> = "ab /*c*/ d".chars().collect::<Vec<_>>().into();
        let tokens = vec![
            Token::new(word, 0, 2, input.clone()),
            Token::new(comment, 3, 8, input.clone()),
            Token::new(word, 9, 10, input.clone()),
            Token::new(TokenType::EOF, 10, 10, input),
        ];
        (tokens, registry)
    }

    #[test]
    fn test_suppressed_tokens_are_skipped() {
        let (tokens, registry) = setup();
        let stream = TokenStream::new(tokens, &registry);

        assert_eq!(stream.all_tokens().len(), 4);
        assert_eq!(stream.len(), 3);
        let texts: Vec<String> = stream.iter_significant().map(Token::literal).collect();
        assert_eq!(texts, vec!["ab", "d", ""]);
        assert!(stream.has_eof());
    }

    #[test]
    fn test_eof_stays_significant_when_suppressed() {
        let (tokens, mut registry) = setup();
        registry.register("EOF", true);
        let stream = TokenStream::new(tokens, &registry);
        assert!(stream.has_eof());
    }

    #[test]
    fn test_navigation_and_checkpoints() {
        let (tokens, registry) = setup();
        let mut stream = TokenStream::new(tokens, &registry);

        assert_eq!(stream.current().map(Token::literal).as_deref(), Some("ab"));
        assert_eq!(stream.peek().map(Token::literal).as_deref(), Some("d"));

        let checkpoint = stream.save_position();
        stream.advance();
        stream.advance();
        assert_eq!(stream.current().map(Token::typ), Some(TokenType::EOF));
        stream.advance();
        assert!(stream.is_at_end());
        assert_eq!(stream.remaining_count(), 0);

        stream.restore_position(checkpoint);
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn test_expect() {
        let (tokens, registry) = setup();
        let word = registry.lookup("word").unwrap();
        let mut stream = TokenStream::new(tokens, &registry);

        assert!(stream.expect(word).is_ok());
        assert_matches!(
            stream.expect(TokenType::EOF),
            Err(TokenStreamError::UnexpectedToken { lext: 9, .. })
        );
        stream.advance();
        stream.advance();
        assert_matches!(
            stream.expect(word),
            Err(TokenStreamError::UnexpectedEndOfStream { .. })
        );
    }

    #[test]
    fn test_current_span_uses_source_positions() {
        let (tokens, registry) = setup();
        let mut stream = TokenStream::new(tokens, &registry);
        stream.advance();

        let span = stream.current_span().unwrap();
        assert_eq!(span.start().column, 10);
        assert_eq!(span.len(), 1);
        assert!(stream.format_error(span, "unexpected").contains("--> 1:10"));
    }

    #[test]
    fn test_with_all_tokens_keeps_suppressed() {
        let (tokens, _) = setup();
        let stream = TokenStream::with_all_tokens(tokens);
        assert_eq!(stream.len(), 4);
    }
}
