//! Parse tracing.
//!
//! The driver takes a generic [`Tracer`] so that the no-op case compiles
//! away entirely; [`PrintTracer`] writes one `PARSE <EVENT>` line per
//! driver event to any `io::Write` sink. The line format is stable enough
//! for tests to match but is not a compatibility contract.

use std::io::Write;

use sawyer_core::StateId;

/// Observer for driver events. Every method defaults to a no-op, so a
/// tracer only implements the events it cares about.
pub trait Tracer {
    /// The symbol about to be offered to the action table.
    fn lookahead(&mut self, _symbol_name: &str) {}
    fn shift(&mut self, _state: StateId) {}
    fn shift_extra(&mut self) {}
    fn reduce(&mut self, _symbol_name: &str, _child_count: usize) {}
    fn reduce_extra(&mut self) {}
    fn accept(&mut self) {}
    fn error(&mut self) {}
    /// Recovery found a state that shifts the error symbol.
    fn recover(&mut self, _state: StateId) {}
    /// Recovery is re-lexing in the error lex state.
    fn lex_again(&mut self) {}
    fn fail_to_recover(&mut self) {}
    /// Breakdown popped a node off the previous parse stack.
    fn pop(&mut self, _symbol_name: &str) {}
    /// Breakdown re-pushed a child of a popped node.
    fn put_back(&mut self, _symbol_name: &str) {}
    /// Breakdown finished; parsing resumes at this character offset.
    fn resume(&mut self, _chars: u32) {}
}

/// Tracer that ignores everything; calls through it are optimized away.
#[derive(Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {}

/// Tracer printing one line per event. Write failures are ignored; this
/// is a diagnostics sink, not a data path.
pub struct PrintTracer<W: Write> {
    out: W,
}

impl<W: Write> PrintTracer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the sink, e.g. to inspect captured output in tests.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Tracer for PrintTracer<W> {
    fn lookahead(&mut self, symbol_name: &str) {
        let _ = writeln!(self.out, "PARSE LOOKAHEAD {symbol_name}");
    }

    fn shift(&mut self, state: StateId) {
        let _ = writeln!(self.out, "PARSE SHIFT {state}");
    }

    fn shift_extra(&mut self) {
        let _ = writeln!(self.out, "PARSE SHIFT EXTRA");
    }

    fn reduce(&mut self, symbol_name: &str, child_count: usize) {
        let _ = writeln!(self.out, "PARSE REDUCE {symbol_name} {child_count}");
    }

    fn reduce_extra(&mut self) {
        let _ = writeln!(self.out, "PARSE REDUCE EXTRA");
    }

    fn accept(&mut self) {
        let _ = writeln!(self.out, "PARSE ACCEPT");
    }

    fn error(&mut self) {
        let _ = writeln!(self.out, "PARSE ERROR");
    }

    fn recover(&mut self, state: StateId) {
        let _ = writeln!(self.out, "PARSE RECOVER {state}");
    }

    fn lex_again(&mut self) {
        let _ = writeln!(self.out, "PARSE LEX AGAIN");
    }

    fn fail_to_recover(&mut self) {
        let _ = writeln!(self.out, "PARSE FAIL TO RECOVER");
    }

    fn pop(&mut self, symbol_name: &str) {
        let _ = writeln!(self.out, "PARSE POP {symbol_name}");
    }

    fn put_back(&mut self, symbol_name: &str) {
        let _ = writeln!(self.out, "PARSE PUT BACK {symbol_name}");
    }

    fn resume(&mut self, chars: u32) {
        let _ = writeln!(self.out, "PARSE RESUME {chars}");
    }
}
