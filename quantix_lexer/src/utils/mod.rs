//! Shared source-location types and small containers used across the lexer

pub mod span;
pub mod string_set;

pub use span::{Position, SourceMap, Span};
pub use string_set::{StringSet, StringSetError};
