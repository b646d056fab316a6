//! Token model for Quantix lexical analysis
//!
//! - [`Token`]: category plus `[lext, rext)` extent over a shared code-point buffer
//! - [`TypeRegistry`]: rule-name to category mapping with per-category suppress flags
//! - [`TokenStream`]: consumer view that hides suppressed categories
//!
//! The scanner never filters; suppression is applied only by [`TokenStream`].

pub mod registry;
pub mod token;
pub mod token_stream;

pub use registry::TypeRegistry;
pub use token::{Token, TokenType};
pub use token_stream::{TokenStream, TokenStreamError};
