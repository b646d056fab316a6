//! Scanner tokens
//!
//! A token is a category plus a half-open `[lext, rext)` extent over the
//! scanned code-point buffer. All tokens from one scan share that buffer
//! through an `Arc<[char]>`, so cloning a token never copies text.

use crate::grammar::literal::{self, RuleError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Token category. The vocabulary is open: a [`TypeRegistry`](super::TypeRegistry)
/// hands out new values per rule set. The first five are reserved in every
/// registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenType(pub u32);

impl TokenType {
    /// No rule matched
    pub const ERROR: TokenType = TokenType(0);
    /// Synthetic zero-width end marker
    pub const EOF: TokenType = TokenType(1);
    /// Rule identifier, also used for identifiers synthesized from string literals
    pub const TOK_ID: TokenType = TokenType(2);
    /// Quoted character literal
    pub const CHAR_LIT: TokenType = TokenType(3);
    /// Quoted string literal
    pub const STRING_LIT: TokenType = TokenType(4);

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_error(self) -> bool {
        self == Self::ERROR
    }

    pub fn is_eof(self) -> bool {
        self == Self::EOF
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T_{}", self.0)
    }
}

#[derive(Clone)]
pub struct Token {
    typ: TokenType,
    lext: usize,
    rext: usize,
    input: Arc<[char]>,
}

impl Token {
    /// Token over `input[lext..rext]`. Extents past the end of the buffer are
    /// clamped when the text is read.
    pub fn new(typ: TokenType, lext: usize, rext: usize, input: Arc<[char]>) -> Self {
        debug_assert!(lext <= rext, "token extents out of order");
        Self {
            typ,
            lext,
            rext,
            input,
        }
    }

    /// Token that owns a private buffer holding exactly `text`
    pub fn synthetic(typ: TokenType, text: &str) -> Self {
        let input: Arc<[char]> = text.chars().collect::<Vec<_>>().into();
        let rext = input.len();
        Self::new(typ, 0, rext, input)
    }

    pub fn typ(&self) -> TokenType {
        self.typ
    }

    pub fn lext(&self) -> usize {
        self.lext
    }

    pub fn rext(&self) -> usize {
        self.rext
    }

    pub fn len(&self) -> usize {
        self.rext - self.lext
    }

    pub fn is_empty(&self) -> bool {
        self.lext == self.rext
    }

    /// The buffer this token indexes into
    pub fn input(&self) -> &Arc<[char]> {
        &self.input
    }

    /// Raw text of the token as code points
    pub fn literal_chars(&self) -> &[char] {
        let end = self.rext.min(self.input.len());
        let start = self.lext.min(end);
        &self.input[start..end]
    }

    /// Raw text of the token
    pub fn literal(&self) -> String {
        self.literal_chars().iter().collect()
    }

    /// Raw text with every escape sequence decoded. Quotes are kept.
    pub fn literal_strip_escape(&self) -> Result<Vec<char>, RuleError> {
        literal::strip_escapes(self.literal_chars())
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.typ == other.typ
            && self.lext == other.lext
            && self.rext == other.rext
            && self.literal_chars() == other.literal_chars()
    }
}

impl Eq for Token {}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("typ", &self.typ)
            .field("lext", &self.lext)
            .field("rext", &self.rext)
            .field("literal", &self.literal())
            .finish()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({},{}) {:?}", self.typ, self.lext, self.rext, self.literal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn buffer(text: &str) -> Arc<[char]> {
        text.chars().collect::<Vec<_>>().into()
    }

    #[test]
    fn test_literal_is_code_point_slice() {
        let input = buffer("λx → y");
        let tok = Token::new(TokenType::TOK_ID, 2, 5, input.clone());

        assert_eq!(tok.literal(), " → ");
        assert_eq!(tok.len(), 3);
        assert!(Arc::ptr_eq(tok.input(), &input));
    }

    #[test]
    fn test_eof_token_is_empty() {
        let input = buffer("ab");
        let eof = Token::new(TokenType::EOF, 2, 2, input);
        assert!(eof.is_empty());
        assert_eq!(eof.literal(), "");
        assert!(eof.typ().is_eof());
    }

    #[test]
    fn test_strip_escape_decodes_string_literal() {
        let tok = Token::synthetic(TokenType::STRING_LIT, r#""a\tb\"c""#);
        let stripped: String = tok.literal_strip_escape().unwrap().into_iter().collect();
        assert_eq!(stripped, "\"a\tb\"c\"");
    }

    #[test]
    fn test_strip_escape_rejects_unknown_escape() {
        let tok = Token::synthetic(TokenType::STRING_LIT, r#""a\qb""#);
        assert_matches!(
            tok.literal_strip_escape(),
            Err(RuleError::MalformedEscape { escape: 'q', .. })
        );
    }

    #[test]
    fn test_equality_ignores_buffer_identity() {
        let a = Token::new(TokenType::CHAR_LIT, 0, 3, buffer("'a'"));
        let b = Token::new(TokenType::CHAR_LIT, 0, 3, buffer("'a'"));
        let c = Token::new(TokenType::CHAR_LIT, 0, 3, buffer("'b'"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
