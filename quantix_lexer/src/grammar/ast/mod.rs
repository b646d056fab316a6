//! Abstract syntax for lexical rules

pub mod lex;

pub use lex::{
    char_lit_from_string_lit, string_lit_to_tok_id, Any, AnyOf, BracketKind, CharLiteral,
    LexBase, LexBracket, LexRule, LexSymbol, Not, RegExp, StringLit, TokId, UnicodeClass,
    UnicodeClassKind,
};
