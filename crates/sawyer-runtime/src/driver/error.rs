//! Driver errors.

use sawyer_core::{StateId, Symbol};

/// Failures caused by a defective language table.
///
/// Grammar-level mismatches never surface here — they are repaired in-band
/// as error nodes. These errors mean the table itself references states or
/// symbols it never declared; the parser stays destroyable and a
/// subsequent full parse (no edit) resets it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The parse table has no cell for this state/symbol pair.
    #[error("parse table has no entry for state {state}, symbol {symbol}")]
    MalformedTable { state: StateId, symbol: Symbol },

    /// No lex state is registered for a parse state.
    #[error("no lex state registered for parse state {state}")]
    MissingLexState { state: StateId },
}
