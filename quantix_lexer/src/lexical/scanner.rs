//! Table-driven maximal-munch scanner
//!
//! Walks an [`Automaton`] from state 0 at each token start, remembers the
//! last position where a state accepted, and emits the longest accepted
//! span. Input with no accepted prefix becomes an `Error` token and scanning
//! resumes right after it. The scanner never filters by category.

use crate::automaton::Automaton;
use crate::config::compile_time::lexical::INITIAL_TOKEN_CAPACITY;
use crate::tokens::{Token, TokenStream, TokenType, TypeRegistry};
use crate::utils::{Position, SourceMap};
use std::sync::Arc;

/// Scan one token starting at `lext`, which must be in bounds
fn scan(automaton: &Automaton, input: &Arc<[char]>, lext: usize) -> Token {
    let Some(mut state) = automaton.next(Automaton::START, input[lext]) else {
        return Token::new(TokenType::ERROR, lext, lext + 1, input.clone());
    };

    let mut pos = lext + 1;
    let mut accepted: Option<(TokenType, usize)> = None;
    loop {
        let typ = automaton.accept(state);
        if !typ.is_error() {
            accepted = Some((typ, pos));
        }
        if pos >= input.len() {
            break;
        }
        match automaton.next(state, input[pos]) {
            Some(next) => {
                state = next;
                pos += 1;
            }
            None => break,
        }
    }

    match accepted {
        Some((typ, rext)) => Token::new(typ, lext, rext, input.clone()),
        // Nothing accepted: the code point that stopped the walk is part of the error
        None => Token::new(TokenType::ERROR, lext, (pos + 1).min(input.len()), input.clone()),
    }
}

/// Token list for one input, plus location queries over it
#[derive(Debug, Clone)]
pub struct Lexer {
    input: Arc<[char]>,
    tokens: Vec<Token>,
}

impl Lexer {
    pub fn new(automaton: &Automaton, input: &str) -> Self {
        Self::from_chars(automaton, input.chars().collect::<Vec<_>>().into())
    }

    /// Scan the whole of `input`. The last token is always a zero-width
    /// `EOF` at `input.len()`.
    pub fn from_chars(automaton: &Automaton, input: Arc<[char]>) -> Self {
        let mut tokens = Vec::with_capacity(INITIAL_TOKEN_CAPACITY);
        let mut lext = 0;

        while lext < input.len() {
            while lext < input.len() && input[lext].is_whitespace() {
                lext += 1;
            }
            if lext < input.len() {
                let token = scan(automaton, &input, lext);
                lext = token.rext();
                tokens.push(token);
            }
        }

        tokens.push(Token::new(
            TokenType::EOF,
            input.len(),
            input.len(),
            input.clone(),
        ));

        Self { input, tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    pub fn input(&self) -> &Arc<[char]> {
        &self.input
    }

    pub fn error_tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| t.typ().is_error())
    }

    pub fn has_errors(&self) -> bool {
        self.error_tokens().next().is_some()
    }

    /// 1-based line and column of the code point at `offset`. Each code point
    /// before it advances the column by one, a tab by the configured tab
    /// width, and a newline starts the next line.
    pub fn line_column(&self, offset: usize) -> (usize, usize) {
        let end = offset.min(self.input.len());
        let pos = self.input[..end]
            .iter()
            .fold(Position::start(), |pos, &c| pos.advance(c));
        (pos.line as usize, pos.column as usize)
    }

    /// Location of token `index`'s left extent
    pub fn line_column_of_token(&self, index: usize) -> Option<(usize, usize)> {
        self.tokens.get(index).map(|t| self.line_column(t.lext()))
    }

    /// Source text from the left extent of token `first` to the right extent
    /// of token `last`
    pub fn span_text(&self, first: usize, last: usize) -> Option<String> {
        let lext = self.tokens.get(first)?.lext();
        let rext = self.tokens.get(last)?.rext();
        if lext > rext {
            return None;
        }
        Some(self.input[lext..rext].iter().collect())
    }

    pub fn source_map(&self) -> SourceMap {
        SourceMap::new(self.input.clone())
    }

    /// Downstream view hiding the categories `registry` suppresses
    pub fn into_token_stream(self, registry: &TypeRegistry) -> TokenStream {
        TokenStream::new(self.tokens, registry)
    }
}
