//! Lexical rules of the rule language itself
//!
//! Built from AST nodes and compiled like any other rule set, so the scanner
//! can tokenize rule files with no hand-written automaton.

use crate::automaton::{AutomatonBuilder, BuildError, Lexicon};
use crate::config::runtime::AutomatonPreferences;
use crate::grammar::ast::{
    AnyOf, BracketKind, CharLiteral, LexBracket, LexRule, LexSymbol, Not, RegExp, StringLit,
    TokId, UnicodeClass, UnicodeClassKind,
};

pub const PUNCTUATION: [&str; 15] = [
    "!", "\"", "'", "(", ")", ".", ":", ";", "<", ">", "[", "]", "{", "|", "}",
];

pub const KEYWORDS: [&str; 9] = [
    "any", "empty", "letter", "lowcase", "not", "number", "package", "space", "upcase",
];

fn ch(c: char) -> LexSymbol {
    CharLiteral::synthetic(c).into()
}

fn class(kind: UnicodeClassKind) -> LexSymbol {
    UnicodeClass::synthetic(kind).into()
}

fn seq(symbols: Vec<LexSymbol>) -> RegExp {
    RegExp::new(symbols)
}

fn bracket(kind: BracketKind, alternates: Vec<RegExp>) -> Result<LexSymbol, BuildError> {
    Ok(LexBracket::synthetic(kind, alternates)?.into())
}

fn rule(name: &str, symbols: Vec<LexSymbol>, suppress: bool) -> LexRule {
    LexRule::new(TokId::synthetic(name), seq(symbols), suppress)
}

/// `first { letter | number | '_' }`
fn identifier(name: &str, first: UnicodeClassKind) -> Result<LexRule, BuildError> {
    let tail = bracket(
        BracketKind::ZeroOrMore,
        vec![
            seq(vec![class(UnicodeClassKind::Letter)]),
            seq(vec![class(UnicodeClassKind::Number)]),
            seq(vec![ch('_')]),
        ],
    )?;
    Ok(rule(name, vec![class(first), tail], false))
}

/// `'\'' ( '\\' any "'\\nrt" | not "'" ) '\''`
fn char_lit() -> Result<LexRule, BuildError> {
    let body = bracket(
        BracketKind::Group,
        vec![
            seq(vec![ch('\\'), AnyOf::synthetic("'\\nrt").into()]),
            seq(vec![Not::synthetic("'").into()]),
        ],
    )?;
    Ok(rule("char_lit", vec![ch('\''), body, ch('\'')], false))
}

/// `'"' { '\\' any "\"\\nrt" | not "\"\\" } '"'`
fn string_lit() -> Result<LexRule, BuildError> {
    let body = bracket(
        BracketKind::ZeroOrMore,
        vec![
            seq(vec![ch('\\'), AnyOf::synthetic("\"\\nrt").into()]),
            seq(vec![Not::synthetic("\"\\").into()]),
        ],
    )?;
    Ok(rule("string_lit", vec![ch('"'), body, ch('"')], false))
}

/// `'/' '/' { not "\n" }`
fn line_comment() -> Result<LexRule, BuildError> {
    let body = bracket(
        BracketKind::ZeroOrMore,
        vec![seq(vec![Not::synthetic("\n").into()])],
    )?;
    Ok(rule("line_comment", vec![ch('/'), ch('/'), body], true))
}

/// `'/' '*' { not "*" | '*' {'*'} not "*/" } '*' {'*'} '/'`
fn block_comment() -> Result<LexRule, BuildError> {
    let stars = || bracket(BracketKind::ZeroOrMore, vec![seq(vec![ch('*')])]);
    let body = bracket(
        BracketKind::ZeroOrMore,
        vec![
            seq(vec![Not::synthetic("*").into()]),
            seq(vec![ch('*'), stars()?, Not::synthetic("*/").into()]),
        ],
    )?;
    Ok(rule(
        "block_comment",
        vec![ch('/'), ch('*'), body, ch('*'), stars()?, ch('/')],
        true,
    ))
}

/// Builder loaded with the rule language's rules, in priority order
pub fn bootstrap_builder() -> Result<AutomatonBuilder, BuildError> {
    bootstrap_builder_with_preferences(AutomatonPreferences::default())
}

pub fn bootstrap_builder_with_preferences(
    preferences: AutomatonPreferences,
) -> Result<AutomatonBuilder, BuildError> {
    let mut builder = AutomatonBuilder::with_preferences(preferences);

    for text in PUNCTUATION.iter().chain(KEYWORDS.iter()) {
        builder.add_literal(&StringLit::synthetic(text), false)?;
    }

    builder.add_rule(identifier("tokid", UnicodeClassKind::Upcase)?)?;
    builder.add_rule(identifier("nt", UnicodeClassKind::Lowcase)?)?;
    builder.add_rule(char_lit()?)?;
    builder.add_rule(string_lit()?)?;
    builder.add_rule(line_comment()?)?;
    builder.add_rule(block_comment()?)?;

    Ok(builder)
}

pub fn bootstrap_lexicon() -> Result<Lexicon, BuildError> {
    bootstrap_builder()?.build()
}

pub fn bootstrap_lexicon_with_preferences(
    preferences: AutomatonPreferences,
) -> Result<Lexicon, BuildError> {
    bootstrap_builder_with_preferences(preferences)?.build()
}
