//! The builtin arithmetic language.
//!
//! A hand-built table for
//!
//! ```text
//! expr → expr '+' expr | number
//! ```
//!
//! with `+` left-associative (the table reduces when a second `+`
//! arrives), whitespace absorbed into token padding by the lexer, and `#`
//! line comments: the comment token shifts into a dedicated state, is
//! wrapped by `ReduceExtra` into an extra `comment` node, and then sits
//! transparently on the stack under the extra-shift override. The table
//! also carries error-shift entries so recovery can resume in front of an
//! operand.
//!
//! Small enough to audit by hand, rich enough to exercise every action
//! kind the driver dispatches.

use sawyer_core::{LexStateId, SYM_END, SYM_ERROR, StateId, Symbol, Tree};
use sawyer_runtime::{Language, Lexer, ParseAction};

/// Terminals and nonterminals, in slot order. `error` and `end` occupy
/// the reserved slots; `document` is appended by the builder.
pub const NUMBER: Symbol = Symbol::from_raw(2);
pub const PLUS: Symbol = Symbol::from_raw(3);
pub const COMMENT_TEXT: Symbol = Symbol::from_raw(4);
pub const COMMENT: Symbol = Symbol::from_raw(5);
pub const EXPR: Symbol = Symbol::from_raw(6);

// Parse states:
//   0  start
//   1  after `number`
//   2  after a complete `expr` at top level
//   3  after `expr '+'`
//   4  after `expr '+' expr`
//   5  after a shifted error node
//   6  after the `expr` that follows an error node
//   7  after a `comment_text` token
const STATE_COUNT: usize = 8;

fn state(index: u16) -> StateId {
    StateId::from_raw(index)
}

pub(crate) fn language() -> Language {
    let mut b = Language::builder("arithmetic", STATE_COUNT, lex);
    assert_eq!(b.symbol("number"), NUMBER);
    assert_eq!(b.symbol("+"), PLUS);
    assert_eq!(b.symbol("comment_text"), COMMENT_TEXT);
    assert_eq!(b.symbol("comment"), COMMENT);
    assert_eq!(b.symbol("expr"), EXPR);

    let shift = |to: u16| ParseAction::Shift { to_state: state(to) };
    let reduce_expr = |child_count: u16| ParseAction::Reduce {
        symbol: EXPR,
        child_count,
    };
    let wrap_comment = ParseAction::ReduceExtra { symbol: COMMENT };

    // The `COMMENT` column is the goto for the wrapped extra node; the
    // target state is irrelevant because the extra-shift override keeps
    // the current state.
    let states_expecting_tokens = [0, 2, 3, 5, 6];
    for &s in &states_expecting_tokens {
        b.action(state(s), COMMENT_TEXT, shift(7));
        b.action(state(s), COMMENT, shift(0));
    }

    // state 0: start
    b.action(state(0), SYM_END, ParseAction::Accept);
    b.action(state(0), NUMBER, shift(1));
    b.action(state(0), EXPR, shift(2));
    b.action(state(0), SYM_ERROR, shift(5));

    // state 1: `expr → number .`
    for sym in [SYM_END, PLUS, NUMBER, COMMENT_TEXT, SYM_ERROR] {
        b.action(state(1), sym, reduce_expr(1));
    }

    // state 2: a complete expr; a second operand without an operator has
    // no entry here, which is what sends `1 2` through recovery.
    b.action(state(2), SYM_END, ParseAction::Accept);
    b.action(state(2), PLUS, shift(3));
    b.action(state(2), SYM_ERROR, shift(5));

    // state 3: `expr → expr '+' . expr`
    b.action(state(3), NUMBER, shift(1));
    b.action(state(3), EXPR, shift(4));
    b.action(state(3), SYM_ERROR, shift(5));

    // state 4: `expr → expr '+' expr .`; reducing here instead of
    // shifting a following `+` makes the operator left-associative.
    for sym in [SYM_END, PLUS, NUMBER, COMMENT_TEXT, SYM_ERROR] {
        b.action(state(4), sym, reduce_expr(3));
    }

    // state 5: resume points after an error node.
    b.action(state(5), NUMBER, shift(1));
    b.action(state(5), PLUS, shift(3));
    b.action(state(5), EXPR, shift(6));

    // state 6: like state 2, but reached via recovery.
    b.action(state(6), SYM_END, ParseAction::Accept);
    b.action(state(6), PLUS, shift(3));
    b.action(state(6), SYM_ERROR, shift(5));

    // state 7: wrap the comment token into an extra node, whatever comes
    // next.
    for sym in [SYM_END, NUMBER, PLUS, COMMENT_TEXT, SYM_ERROR] {
        b.action(state(7), sym, wrap_comment);
    }

    b.lex_error_state(LexStateId::from_raw(1));
    b.build()
}

/// Both lex states run the same scanner: the main DFA already recognizes
/// every token of the language, which is all the error-recovery state
/// needs. Unrecognizable characters yield a zero-size error token without
/// consuming; the driver's recovery loop decides how far to skip.
fn lex(lexer: &mut Lexer<'_>, _state: LexStateId) -> Tree {
    while let Some(ch) = lexer.lookahead() {
        if !ch.is_whitespace() {
            break;
        }
        lexer.advance();
    }

    lexer.start_token();
    let Some(ch) = lexer.lookahead() else {
        return lexer.finish_end_token();
    };

    match ch {
        '0'..='9' => {
            while lexer.lookahead().is_some_and(|c| c.is_ascii_digit()) {
                lexer.advance();
            }
            lexer.finish_token(NUMBER)
        }
        '+' => {
            lexer.advance();
            lexer.finish_token(PLUS)
        }
        '#' => {
            while lexer.lookahead().is_some_and(|c| c != '\n') {
                lexer.advance();
            }
            lexer.finish_token(COMMENT_TEXT)
        }
        _ => lexer.finish_error_token(),
    }
}
