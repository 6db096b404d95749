#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Incremental LR parse driver.
//!
//! This crate drives a [`Language`] (a parse table plus a character-level
//! lex function, normally produced by a table generator) over a pull-based
//! [`Input`], producing a concrete syntax tree of [`sawyer_core::Tree`]
//! nodes. Grammar mismatches never fail the parse; they are repaired
//! in-band by panic-mode recovery and surface as error nodes. Reparsing
//! after an edit reuses the previous tree by breaking the parse stack down
//! to the deepest prefix that is still trusted.

pub mod driver;

// Re-export commonly used items at crate root
pub use driver::{
    Input, InputEdit, Language, LanguageBuilder, LexFn, Lexer, NoopTracer, ParseAction,
    ParseError, Parser, PrintTracer, Stack, StackEntry, StringInput, Tracer,
};

pub use sawyer_core::{Length, LexStateId, SYM_END, SYM_ERROR, StateId, Symbol, Tree};
