//! `storyc_core` compiles tokenized Harlowe passages into generator-based
//! narrative scripts. Executing the generated code yields a lazy sequence of
//! story events: text output, link offers, named fragments and navigation.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Token tree (from the markup tokenizer)
//!   → Driver (walks a body, decides each macro's usage: inline, line, line + hook)
//!   → Macro table (case-insensitive name → handler, runtime call as fallback)
//!   → Handlers (assignment, conditional chain, link, go-to, hook, print, runtime call)
//!   → Code buffer (statements, or deferred `function* () { ... }` fragments)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: loading of `storyc.toml` (indentation, runtime receivers, depth limit and macro
//!   aliases).
//! - [`macros`]: the handler for each built-in macro.
//!
//! ## Quick Start
//!
//! ```rust
//! use storyc_core::Generator;
//! use storyc_core::Token;
//!
//! let tokens = vec![
//! 	Token::macro_call("go-to", vec![Token::string("Kitchen")]),
//! ];
//!
//! let code = Generator::default().compile_passage(&tokens).unwrap();
//! assert_eq!(code, "yield abort(\"Kitchen\");\n");
//! ```

pub use code::*;
pub use config::*;
pub use dispatch::*;
pub use error::*;
pub use expression::*;
pub use generator::*;
pub use story::*;
pub use tokens::*;
pub use transcoder::*;

mod code;
pub mod config;
mod dispatch;
#[allow(unused_assignments)]
mod error;
mod expression;
mod generator;
pub mod macros;
mod story;
mod tokens;
mod transcoder;

#[cfg(test)]
mod __fixtures;
