// Internal modules
#[macro_use]
pub mod logging;
pub mod automaton;
pub mod config;
pub mod file_processor;
pub mod grammar;
pub mod lexical;
pub mod pipeline;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use automaton::{Automaton, AutomatonBuilder, BuildError, Lexicon};
pub use grammar::{bootstrap_lexicon, LexRule, RegExp, RuleError};
pub use lexical::Lexer;
pub use pipeline::{PipelineError, PipelineResult};
pub use tokens::{Token, TokenStream, TokenType, TypeRegistry};
