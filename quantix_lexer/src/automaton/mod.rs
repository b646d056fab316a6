//! Rule compilation and transition tables
//!
//! [`AutomatonBuilder`] turns an ordered rule set into a [`Lexicon`]: a dense
//! [`Automaton`] plus the [`TypeRegistry`](crate::tokens::TypeRegistry) naming
//! its accept categories. The scanner only ever sees the automaton.

pub mod builder;
pub mod nfa;
pub mod subset;
pub mod table;

pub use builder::{AutomatonBuilder, BuildError, Lexicon};
pub use table::{Automaton, ClassMask, StateTransitions};
