//! Lexical rule AST
//!
//! Atoms ([`LexBase`]) match exactly one code point. Brackets group or
//! quantify alternatives, a [`RegExp`] concatenates symbols, and a
//! [`LexRule`] names a pattern. Every node keeps the token it was built from
//! so diagnostics can point back at the rule text; nodes built in code use
//! synthetic tokens over their canonical rendering.

use crate::grammar::literal::{self, RuleError};
use crate::grammar::runeset::RuneSet;
use crate::tokens::{Token, TokenType};
use std::fmt;

// Keyword and punctuation tokens of synthetic nodes have no rule category
const UNTYPED: TokenType = TokenType::ERROR;

// ============================================================================
// UNICODE CLASSES
// ============================================================================

/// The five fixed Unicode categories a rule can reference by keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnicodeClassKind {
    Letter,
    Upcase,
    Lowcase,
    Number,
    Space,
}

impl UnicodeClassKind {
    pub const ALL: [UnicodeClassKind; 5] = [
        UnicodeClassKind::Letter,
        UnicodeClassKind::Upcase,
        UnicodeClassKind::Lowcase,
        UnicodeClassKind::Number,
        UnicodeClassKind::Space,
    ];

    /// Rule-language keyword for this class
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Letter => "letter",
            Self::Upcase => "upcase",
            Self::Lowcase => "lowcase",
            Self::Number => "number",
            Self::Space => "space",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }

    pub fn matches(self, c: char) -> bool {
        match self {
            Self::Letter => c.is_alphabetic(),
            Self::Upcase => c.is_uppercase(),
            Self::Lowcase => c.is_lowercase(),
            Self::Number => c.is_numeric(),
            Self::Space => c.is_whitespace(),
        }
    }

    /// Bit used by the automaton's class signatures
    pub fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

// ============================================================================
// ATOMS
// ============================================================================

/// `.`: any single code point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Any {
    tok: Token,
}

impl Any {
    pub fn new(tok: Token) -> Self {
        Self { tok }
    }

    pub fn synthetic() -> Self {
        Self::new(Token::synthetic(UNTYPED, "."))
    }

    pub fn lext(&self) -> usize {
        self.tok.lext()
    }
}

/// Members of a quoted set literal, quotes removed and escapes decoded
fn set_from_literal(str_lit: &Token) -> Result<RuneSet, RuleError> {
    let decoded = str_lit.literal_strip_escape()?;
    let inner = match decoded.len() {
        0 | 1 => &decoded[..0],
        n => &decoded[1..n - 1],
    };
    Ok(inner.iter().copied().collect())
}

/// `any "abc"`: one code point from the set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnyOf {
    any: Token,
    str_lit: Token,
    set: RuneSet,
}

impl AnyOf {
    pub fn new(any: Token, str_lit: Token) -> Result<Self, RuleError> {
        let set = set_from_literal(&str_lit)?;
        Ok(Self { any, str_lit, set })
    }

    pub fn synthetic(members: &str) -> Self {
        Self {
            any: Token::synthetic(UNTYPED, "any"),
            str_lit: Token::synthetic(TokenType::STRING_LIT, &literal::quote_str(members)),
            set: members.into(),
        }
    }

    pub fn set(&self) -> &RuneSet {
        &self.set
    }

    pub fn lext(&self) -> usize {
        self.any.lext()
    }
}

/// `not "abc"`: one code point outside the set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Not {
    not: Token,
    str_lit: Token,
    set: RuneSet,
}

impl Not {
    pub fn new(not: Token, str_lit: Token) -> Result<Self, RuleError> {
        let set = set_from_literal(&str_lit)?;
        Ok(Self { not, str_lit, set })
    }

    pub fn synthetic(excluded: &str) -> Self {
        Self {
            not: Token::synthetic(UNTYPED, "not"),
            str_lit: Token::synthetic(TokenType::STRING_LIT, &literal::quote_str(excluded)),
            set: excluded.into(),
        }
    }

    pub fn set(&self) -> &RuneSet {
        &self.set
    }

    pub fn lext(&self) -> usize {
        self.not.lext()
    }
}

/// `'x'`: one specific code point. The raw literal is decoded eagerly, so a
/// malformed escape never produces a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharLiteral {
    tok: Token,
    literal: Vec<char>,
    ch: char,
}

impl CharLiteral {
    /// Node whose raw literal is the token's own text
    pub fn new(tok: Token) -> Result<Self, RuleError> {
        let literal = tok.literal_chars().to_vec();
        Self::with_literal(tok, literal)
    }

    /// Node whose raw literal differs from the token text, as when a
    /// character is lifted out of a longer string literal
    pub fn with_literal(tok: Token, literal: Vec<char>) -> Result<Self, RuleError> {
        let ch = literal::decode_char(&literal)?;
        Ok(Self { tok, literal, ch })
    }

    pub fn synthetic(c: char) -> Self {
        let text = literal::quote_char(c);
        Self {
            tok: Token::synthetic(TokenType::CHAR_LIT, &text),
            literal: text.chars().collect(),
            ch: c,
        }
    }

    /// The decoded character
    pub fn char(&self) -> char {
        self.ch
    }

    /// Raw literal text, quotes included
    pub fn literal(&self) -> &[char] {
        &self.literal
    }

    pub fn token(&self) -> &Token {
        &self.tok
    }

    pub fn lext(&self) -> usize {
        self.tok.lext()
    }
}

/// `letter`, `upcase`, `lowcase`, `number` or `space`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnicodeClass {
    tok: Token,
    kind: UnicodeClassKind,
}

impl UnicodeClass {
    pub fn new(tok: Token, kind: UnicodeClassKind) -> Self {
        Self { tok, kind }
    }

    pub fn synthetic(kind: UnicodeClassKind) -> Self {
        Self::new(Token::synthetic(UNTYPED, kind.keyword()), kind)
    }

    pub fn kind(&self) -> UnicodeClassKind {
        self.kind
    }

    pub fn lext(&self) -> usize {
        self.tok.lext()
    }
}

/// Single code point matchers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexBase {
    Any(Any),
    AnyOf(AnyOf),
    CharLiteral(CharLiteral),
    Not(Not),
    UnicodeClass(UnicodeClass),
}

impl LexBase {
    /// Structural equality between atoms of the same variant. Comparing with
    /// an absent node or with a different variant is always false.
    pub fn equal(&self, other: Option<&LexBase>) -> bool {
        let Some(other) = other else {
            return false;
        };
        match (self, other) {
            (Self::Any(_), Self::Any(_)) => true,
            (Self::AnyOf(a), Self::AnyOf(b)) => a.set == b.set,
            (Self::Not(a), Self::Not(b)) => a.set == b.set,
            (Self::CharLiteral(a), Self::CharLiteral(b)) => a.ch == b.ch,
            (Self::UnicodeClass(a), Self::UnicodeClass(b)) => a.kind == b.kind,
            _ => false,
        }
    }

    /// Whether this atom accepts `c`
    pub fn matches(&self, c: char) -> bool {
        match self {
            Self::Any(_) => true,
            Self::AnyOf(a) => a.set.contains(c),
            Self::Not(n) => !n.set.contains(c),
            Self::CharLiteral(cl) => cl.ch == c,
            Self::UnicodeClass(u) => u.kind.matches(c),
        }
    }

    pub fn lext(&self) -> usize {
        match self {
            Self::Any(a) => a.lext(),
            Self::AnyOf(a) => a.lext(),
            Self::CharLiteral(c) => c.lext(),
            Self::Not(n) => n.lext(),
            Self::UnicodeClass(u) => u.lext(),
        }
    }
}

// ============================================================================
// BRACKETS, SEQUENCES AND RULES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BracketKind {
    /// `( ... )`: exactly one alternative
    Group,
    /// `[ ... ]`: zero or one
    Optional,
    /// `{ ... }`: zero or more
    ZeroOrMore,
    /// `< ... >`: one or more
    OneOrMore,
}

impl BracketKind {
    pub fn left(self) -> &'static str {
        match self {
            Self::Group => "(",
            Self::Optional => "[",
            Self::ZeroOrMore => "{",
            Self::OneOrMore => "<",
        }
    }

    pub fn right(self) -> &'static str {
        match self {
            Self::Group => ")",
            Self::Optional => "]",
            Self::ZeroOrMore => "}",
            Self::OneOrMore => ">",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexBracket {
    left_bracket: Token,
    kind: BracketKind,
    alternates: Vec<RegExp>,
}

impl LexBracket {
    /// Fails when `alternates` is empty
    pub fn new(
        left_bracket: Token,
        kind: BracketKind,
        alternates: Vec<RegExp>,
    ) -> Result<Self, RuleError> {
        if alternates.is_empty() {
            return Err(RuleError::EmptyBracket {
                offset: left_bracket.lext(),
            });
        }
        Ok(Self {
            left_bracket,
            kind,
            alternates,
        })
    }

    pub fn synthetic(kind: BracketKind, alternates: Vec<RegExp>) -> Result<Self, RuleError> {
        Self::new(Token::synthetic(UNTYPED, kind.left()), kind, alternates)
    }

    pub fn kind(&self) -> BracketKind {
        self.kind
    }

    /// Never empty
    pub fn alternates(&self) -> &[RegExp] {
        &self.alternates
    }

    pub fn lext(&self) -> usize {
        self.left_bracket.lext()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexSymbol {
    Base(LexBase),
    Bracket(LexBracket),
}

impl LexSymbol {
    pub fn lext(&self) -> usize {
        match self {
            Self::Base(base) => base.lext(),
            Self::Bracket(bracket) => bracket.lext(),
        }
    }
}

impl From<LexBase> for LexSymbol {
    fn from(base: LexBase) -> Self {
        Self::Base(base)
    }
}

impl From<LexBracket> for LexSymbol {
    fn from(bracket: LexBracket) -> Self {
        Self::Bracket(bracket)
    }
}

macro_rules! base_into_symbol {
    ($($variant:ident),+) => {
        $(
            impl From<$variant> for LexBase {
                fn from(node: $variant) -> Self {
                    LexBase::$variant(node)
                }
            }

            impl From<$variant> for LexSymbol {
                fn from(node: $variant) -> Self {
                    LexSymbol::Base(LexBase::$variant(node))
                }
            }
        )+
    };
}

base_into_symbol!(Any, AnyOf, CharLiteral, Not, UnicodeClass);

/// Concatenation of symbols; empty means the empty string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegExp {
    symbols: Vec<LexSymbol>,
}

impl RegExp {
    pub fn new(symbols: Vec<LexSymbol>) -> Self {
        Self { symbols }
    }

    pub fn symbols(&self) -> &[LexSymbol] {
        &self.symbols
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl FromIterator<LexSymbol> for RegExp {
    fn from_iter<I: IntoIterator<Item = LexSymbol>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Identifier naming a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokId {
    tok: Token,
}

impl TokId {
    pub fn new(tok: Token) -> Self {
        Self { tok }
    }

    pub fn synthetic(name: &str) -> Self {
        Self::new(Token::synthetic(TokenType::TOK_ID, name))
    }

    pub fn id(&self) -> String {
        self.tok.literal()
    }

    pub fn token(&self) -> &Token {
        &self.tok
    }

    pub fn lext(&self) -> usize {
        self.tok.lext()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexRule {
    pub suppress: bool,
    pub tok_id: TokId,
    pub reg_exp: RegExp,
}

impl LexRule {
    pub fn new(tok_id: TokId, reg_exp: RegExp, suppress: bool) -> Self {
        Self {
            suppress,
            tok_id,
            reg_exp,
        }
    }

    pub fn id(&self) -> String {
        self.tok_id.id()
    }

    pub fn lext(&self) -> usize {
        self.tok_id.lext()
    }
}

// ============================================================================
// STRING LITERALS
// ============================================================================

/// Quoted string literal as written in rule text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLit {
    tok: Token,
}

impl StringLit {
    pub fn new(tok: Token) -> Self {
        Self { tok }
    }

    /// String literal token for `value`, quoted and escaped
    pub fn synthetic(value: &str) -> Self {
        Self::new(Token::synthetic(
            TokenType::STRING_LIT,
            &literal::quote_str(value),
        ))
    }

    /// Whether the decoded literal contains a space, tab, newline or carriage return
    pub fn contains_white_space(&self) -> Result<bool, RuleError> {
        Ok(self
            .tok
            .literal_strip_escape()?
            .iter()
            .any(|c| matches!(c, ' ' | '\t' | '\n' | '\r')))
    }

    /// Decoded content without the surrounding quotes
    pub fn value(&self) -> Result<Vec<char>, RuleError> {
        let mut decoded = self.tok.literal_strip_escape()?;
        if decoded.len() < 2 {
            return Ok(Vec::new());
        }
        decoded.pop();
        decoded.remove(0);
        Ok(decoded)
    }

    pub fn id(&self) -> Result<String, RuleError> {
        Ok(self.value()?.into_iter().collect())
    }

    /// Raw text, quotes and escapes included
    pub fn literal(&self) -> &[char] {
        self.tok.literal_chars()
    }

    pub fn token(&self) -> &Token {
        &self.tok
    }

    pub fn lext(&self) -> usize {
        self.tok.lext()
    }

    pub fn rext(&self) -> usize {
        self.tok.rext()
    }
}

/// Rule identifier spanning the interior of the literal, for rules named by
/// their literal text
pub fn string_lit_to_tok_id(sl: &StringLit) -> TokId {
    let lext = (sl.lext() + 1).min(sl.rext());
    let rext = sl.rext().saturating_sub(1).max(lext);
    TokId::new(Token::new(
        TokenType::TOK_ID,
        lext,
        rext,
        sl.token().input().clone(),
    ))
}

/// Character literal for the code point at raw index `i` of `sl`. When
/// `escaped`, `literal[i]` is a backslash and `literal[i + 1]` is the escaped
/// character; the node then spans both.
pub fn char_lit_from_string_lit(
    sl: &StringLit,
    i: usize,
    escaped: bool,
) -> Result<CharLiteral, RuleError> {
    let raw = sl.literal();
    let mut lit = vec!['\''];

    if escaped {
        let escape = *raw.get(i + 1).ok_or_else(|| RuleError::UnterminatedEscape {
            text: raw.iter().collect(),
        })?;
        // `\"` has no meaning in a char literal; `'"'` is the same character
        if escape != '"' {
            lit.push('\\');
        }
        lit.push(escape);
    } else {
        let c = *raw.get(i).ok_or_else(|| RuleError::MalformedCharLiteral {
            text: raw.iter().collect(),
        })?;
        lit.push(c);
    }
    lit.push('\'');

    let lext = sl.lext() + i;
    let rext = lext + if escaped { 2 } else { 1 };
    let tok = Token::new(TokenType::CHAR_LIT, lext, rext, sl.token().input().clone());
    CharLiteral::with_literal(tok, lit)
}

// ============================================================================
// RENDERING
// ============================================================================

impl fmt::Display for Any {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(".")
    }
}

impl fmt::Display for AnyOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "any {}", self.str_lit.literal())
    }
}

impl fmt::Display for Not {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not {}", self.str_lit.literal())
    }
}

impl fmt::Display for CharLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal.iter().collect::<String>())
    }
}

impl fmt::Display for UnicodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tok.literal())
    }
}

impl fmt::Display for LexBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any(n) => n.fmt(f),
            Self::AnyOf(n) => n.fmt(f),
            Self::CharLiteral(n) => n.fmt(f),
            Self::Not(n) => n.fmt(f),
            Self::UnicodeClass(n) => n.fmt(f),
        }
    }
}

impl fmt::Display for LexBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.left())?;
        for (i, alt) in self.alternates.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{}", alt)?;
        }
        f.write_str(self.kind.right())
    }
}

impl fmt::Display for LexSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base(base) => base.fmt(f),
            Self::Bracket(bracket) => bracket.fmt(f),
        }
    }
}

impl fmt::Display for RegExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.symbols {
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

impl fmt::Display for TokId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

impl fmt::Display for LexRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {} ;", self.id(), self.reg_exp)
    }
}

impl fmt::Display for StringLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tok.literal())
    }
}
