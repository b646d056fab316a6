//! Lexical rule language: AST, literal decoding and the bootstrap rule set

pub mod ast;
pub mod bootstrap;
pub mod literal;
pub mod runeset;

pub use ast::*;
pub use bootstrap::{
    bootstrap_builder, bootstrap_builder_with_preferences, bootstrap_lexicon,
    bootstrap_lexicon_with_preferences,
};
pub use literal::RuleError;
pub use runeset::RuneSet;
