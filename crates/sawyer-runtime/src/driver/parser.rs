//! The incremental LR parse driver.
//!
//! [`Parser::parse`] runs a single loop: lex a token whenever the
//! lookahead slot is empty, look up the action for the current top state
//! and lookahead symbol, dispatch. A reduction produces a synthetic
//! nonterminal "token" that is offered straight back to the table (the
//! goto step), so a second slot buffers the real token it displaced.
//! Grammar mismatches are repaired in-band by panic-mode recovery;
//! reparsing after an edit first breaks the previous stack down to the
//! deepest prefix that is still trusted.

use std::rc::Rc;
use std::sync::Arc;

use sawyer_core::{Length, SYM_ERROR, StateId, Symbol, Tree};

use super::error::ParseError;
use super::input::{Input, InputEdit};
use super::language::{Language, ParseAction};
use super::lexer::Lexer;
use super::stack::Stack;
use super::trace::{NoopTracer, Tracer};

const START_STATE: StateId = StateId::from_raw(0);

/// A reusable parse driver bound to one language.
///
/// The parser keeps its stack between parses: after a successful parse the
/// stack holds the document root, which is what an edit-driven reparse
/// breaks back down. Trees are `Rc`-shared, so a returned root stays valid
/// for as long as the caller holds it, independent of later parses.
pub struct Parser {
    language: Arc<Language>,
    stack: Stack,
    lookahead: Option<Tree>,
    next_lookahead: Option<Tree>,
}

enum Recovery {
    Recovered,
    Failed,
}

impl Parser {
    pub fn new(language: Arc<Language>) -> Self {
        Self {
            language,
            stack: Stack::new(),
            lookahead: None,
            next_lookahead: None,
        }
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Parse `input`, reusing the previous tree's prefix when `edit`
    /// describes how the input changed since the last parse. Always
    /// returns a tree covering the whole input unless the language table
    /// itself is defective.
    pub fn parse(
        &mut self,
        input: &mut dyn Input,
        edit: Option<InputEdit>,
    ) -> Result<Rc<Tree>, ParseError> {
        self.parse_with(input, edit, &mut NoopTracer)
    }

    /// Parse with a [`Tracer`] observing every driver event.
    pub fn parse_with<T: Tracer>(
        &mut self,
        input: &mut dyn Input,
        edit: Option<InputEdit>,
        tracer: &mut T,
    ) -> Result<Rc<Tree>, ParseError> {
        self.lookahead = None;
        self.next_lookahead = None;
        let position = self.breakdown_stack(edit, tracer);

        let mut lexer = Lexer::new(input);
        lexer.reset(position);

        loop {
            let state = self.stack.top_state();
            let symbol = match &self.lookahead {
                Some(node) => node.symbol(),
                None => {
                    let lex_state = self
                        .language
                        .lex_state(state)
                        .ok_or(ParseError::MissingLexState { state })?;
                    let token = self.language.lex(&mut lexer, lex_state);
                    let symbol = token.symbol();
                    self.lookahead = Some(token);
                    symbol
                }
            };
            tracer.lookahead(self.language.symbol_name(symbol));

            let action = self
                .language
                .action(state, symbol)
                .ok_or(ParseError::MalformedTable { state, symbol })?;

            match action {
                ParseAction::Shift { to_state } => {
                    if symbol == SYM_ERROR {
                        if let Recovery::Failed = self.recover(&mut lexer, tracer) {
                            return Ok(self.finalize());
                        }
                    } else {
                        tracer.shift(to_state);
                        self.shift(to_state);
                    }
                }
                ParseAction::ShiftExtra => {
                    tracer.shift_extra();
                    self.shift_extra();
                }
                ParseAction::Reduce {
                    symbol,
                    child_count,
                } => {
                    tracer.reduce(self.language.symbol_name(symbol), child_count as usize);
                    self.reduce(symbol, child_count as usize);
                }
                ParseAction::ReduceExtra { symbol } => {
                    tracer.reduce_extra();
                    self.reduce_extra(symbol);
                }
                ParseAction::Accept => {
                    tracer.accept();
                    return Ok(self.finalize());
                }
                ParseAction::Error => {
                    tracer.error();
                    if let Recovery::Failed = self.recover(&mut lexer, tracer) {
                        return Ok(self.finalize());
                    }
                }
            }
        }
    }

    /// Push the lookahead under `to_state` and promote the buffered token.
    /// Extras never change the automaton state, so an extra lookahead is
    /// pushed under the current top state instead.
    fn shift(&mut self, to_state: StateId) {
        let node = self.lookahead.take().expect("shift without a lookahead");
        let state = if node.is_extra() {
            self.stack.top_state()
        } else {
            to_state
        };
        self.stack.push(state, Rc::new(node));
        self.lookahead = self.next_lookahead.take();
    }

    fn shift_extra(&mut self) {
        if let Some(node) = self.lookahead.as_mut() {
            node.mark_extra();
        }
        self.shift(START_STATE);
    }

    /// Pop children into a new `symbol` node, which becomes the lookahead.
    fn reduce(&mut self, symbol: Symbol, child_count: usize) {
        debug_assert!(
            self.next_lookahead.is_none(),
            "reduce with an occupied lookahead buffer"
        );
        self.next_lookahead = self.lookahead.take();

        // The nominal arity counts grammar children only; every extra
        // encountered while walking down widens the window by one, capped
        // at the stack height.
        let entries = self.stack.entries();
        let mut count = child_count;
        let mut index = 0;
        while index < count && count < entries.len() {
            if entries[entries.len() - 1 - index].node.is_extra() {
                count += 1;
            }
            index += 1;
        }
        let count = count.min(entries.len());

        let children = self
            .stack
            .split_off_top(count)
            .into_iter()
            .map(|entry| entry.node)
            .collect();
        let hidden = self.language.symbol_is_hidden(symbol);
        self.lookahead = Some(Tree::interior(symbol, children, hidden));
    }

    fn reduce_extra(&mut self, symbol: Symbol) {
        self.reduce(symbol, 1);
        if let Some(node) = self.lookahead.as_mut() {
            node.mark_extra();
        }
    }

    /// Wrap whatever is on the stack into the document node and return it.
    fn finalize(&mut self) -> Rc<Tree> {
        if self.stack.is_empty() {
            self.stack.push(
                START_STATE,
                Rc::new(Tree::error(Length::zero(), Length::zero())),
            );
        }
        // A buffered token can survive a failed recovery of a nonterminal
        // lookahead; it has no place in the document.
        self.next_lookahead = None;
        self.reduce(self.language.document_symbol(), self.stack.len());
        if let Some(document) = self.lookahead.as_mut() {
            // The document is never extra or hidden.
            document.clear_flags();
        }
        self.shift(START_STATE);
        Rc::clone(&self.stack.entries()[0].node)
    }

    /// Break the previous parse stack down to a prefix that is still
    /// trusted, returning the position at which lexing resumes.
    ///
    /// Internal nodes whose span reaches the edit point are decomposed:
    /// the node is popped and its children re-pushed one by one, each
    /// under the state the table's `Shift` entry dictates for its symbol
    /// (the popping parent's state otherwise). A leaf entirely left of the
    /// edit ends the walk.
    fn breakdown_stack<T: Tracer>(&mut self, edit: Option<InputEdit>, tracer: &mut T) -> Length {
        let Some(edit) = edit else {
            self.stack.clear();
            return Length::zero();
        };

        let mut position = self.stack.right_position();

        while let Some(top) = self.stack.top_node() {
            if position.chars < edit.position && top.children().is_empty() {
                break;
            }
            let node = Rc::clone(top);
            tracer.pop(self.language.symbol_name(node.symbol()));
            self.stack.pop();
            position = position - node.total_size();

            for child in node.children() {
                if position.chars >= edit.position {
                    break;
                }
                let state = self.stack.top_state();
                let next_state = match self.language.action(state, child.symbol()) {
                    Some(ParseAction::Shift { to_state }) => to_state,
                    _ => state,
                };
                tracer.put_back(self.language.symbol_name(child.symbol()));
                self.stack.push(next_state, Rc::clone(child));
                position += child.total_size();
            }
        }

        tracer.resume(position.chars);
        position
    }

    /// Panic-mode recovery, entered when the action table has no entry or
    /// the lexer produced an error token.
    fn recover<T: Tracer>(&mut self, lexer: &mut Lexer<'_>, tracer: &mut T) -> Recovery {
        // Construct or retain: an error token becomes the error node
        // itself; a rejected regular token stays in the lookahead slot and
        // gets a fresh zero-size error node in front of it.
        let mut error = match self.lookahead.take() {
            Some(node) if node.symbol() == SYM_ERROR => node,
            other => {
                self.lookahead = other;
                Tree::error(Length::zero(), Length::zero())
            }
        };

        loop {
            // Unwind: find a state that expects an error and can continue
            // with the current lookahead after shifting it.
            let lookahead_symbol = self
                .lookahead
                .as_ref()
                .map(Tree::symbol)
                .unwrap_or(SYM_ERROR);

            let mut target = None;
            for (index, entry) in self.stack.iter_from_top() {
                if let Some(ParseAction::Shift { to_state }) =
                    self.language.action(entry.state, SYM_ERROR)
                {
                    let after = self.language.action(to_state, lookahead_symbol);
                    if !matches!(after, None | Some(ParseAction::Error)) {
                        target = Some((index, to_state));
                        break;
                    }
                }
            }

            if let Some((index, state_after_error)) = target {
                tracer.recover(state_after_error);
                self.stack.truncate(index + 1);
                if let Some(node) = self.lookahead.as_mut() {
                    // The skipped span, including the token's own leading
                    // trivia, belongs to the error node now.
                    node.set_padding(Length::zero());
                }
                self.resize_error(&mut error, lexer);
                self.stack.push(state_after_error, Rc::new(error));
                return Recovery::Recovered;
            }

            // No recoverable state for this lookahead: skip ahead to the
            // next plausible token. If the error-state lexer cannot move
            // either, skip a single character; at end of input, give up
            // and let the driver finalize around the error.
            tracer.lex_again();
            let previous_position = lexer.current_position();
            let token = self.language.lex(lexer, self.language.lex_error_state());
            self.lookahead = Some(token);

            if lexer.current_position() == previous_position && !lexer.advance() {
                tracer.fail_to_recover();
                self.resize_error(&mut error, lexer);
                self.stack.push(START_STATE, Rc::new(error));
                return Recovery::Failed;
            }
        }
    }

    /// Stretch the error node from the stack's right edge to the current
    /// token start. Saturates: a lexer that regressed during recovery must
    /// not underflow the extent.
    fn resize_error(&self, error: &mut Tree, lexer: &Lexer<'_>) {
        let size =
            lexer.token_start_position() - self.stack.right_position() - error.padding();
        error.set_size(size);
    }
}
