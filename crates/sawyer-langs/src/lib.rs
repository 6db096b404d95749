#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Built-in languages for the Sawyer parse runtime.
//!
//! Shaped like a generated-language registry: each language is built once
//! behind a `LazyLock` and handed out as a shared `Arc<Language>`, with
//! name-based lookup for tools that take a language argument.

use std::sync::{Arc, LazyLock};

use sawyer_runtime::Language;

pub mod arith;

#[cfg(test)]
mod arith_tests;

/// The builtin arithmetic language: `expr → expr '+' expr | number`,
/// left-associative, with whitespace as token padding and `#` line
/// comments as extra nodes.
pub fn arithmetic() -> Arc<Language> {
    static LANG: LazyLock<Arc<Language>> = LazyLock::new(|| Arc::new(arith::language()));
    Arc::clone(&LANG)
}

/// Look up a builtin language by name or alias.
pub fn from_name(name: &str) -> Option<Arc<Language>> {
    match name.to_ascii_lowercase().as_str() {
        "arith" | "arithmetic" => Some(arithmetic()),
        _ => None,
    }
}

/// All builtin languages.
pub fn all() -> Vec<Arc<Language>> {
    vec![arithmetic()]
}
