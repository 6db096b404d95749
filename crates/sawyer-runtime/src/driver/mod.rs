//! The parse driver and its collaborators.
//!
//! The driver consumes tokens from a [`Lexer`] over an [`Input`], looks up
//! each `(state, symbol)` pair in the [`Language`]'s parse table, and
//! dispatches shift/reduce actions against a [`Stack`] of
//! `(state, node)` entries until the table accepts or recovery gives up.

mod error;
mod input;
mod language;
mod lexer;
mod parser;
mod stack;
mod trace;


pub use error::ParseError;
pub use input::{Input, InputEdit, StringInput};
pub use language::{Language, LanguageBuilder, LexFn, ParseAction};
pub use lexer::Lexer;
pub use parser::Parser;
pub use stack::{Stack, StackEntry};
pub use trace::{NoopTracer, PrintTracer, Tracer};
