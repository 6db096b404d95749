//! Language definitions: the parse table and its companion lexing tables.

use std::fmt::Write as _;

use indexmap::IndexMap;

use sawyer_core::{Length, LexStateId, SYM_END, SYM_ERROR, StateId, Symbol, Tree};

use super::lexer::Lexer;

/// Character-level lex function supplied by a language.
///
/// The driver invokes it with the lex state registered for the current
/// parse state. It must always produce a token: `SYM_END` at end of input,
/// `SYM_ERROR` when no token can start at the cursor.
pub type LexFn = fn(&mut Lexer<'_>, LexStateId) -> Tree;

/// One cell of the parse table.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ParseAction {
    /// Consume the lookahead and push it under the given state. For
    /// nonterminal columns this doubles as the goto entry.
    Shift { to_state: StateId },
    /// Mark the lookahead as an extra, then shift it under the current
    /// top state.
    ShiftExtra,
    /// Pop `child_count` grammar children (plus any interleaved extras)
    /// into a new `symbol` node, which becomes the next lookahead.
    Reduce { symbol: Symbol, child_count: u16 },
    /// Reduce a single child and mark the result as an extra. Used for
    /// trivia productions such as comments.
    ReduceExtra { symbol: Symbol },
    /// The input matches the grammar; wrap up the document.
    Accept,
    /// No entry. The driver enters error recovery.
    #[default]
    Error,
}

/// An immutable language definition: the parse table, the lex-state map,
/// and the lex function, as emitted by a table generator (or written by
/// hand for small grammars).
///
/// Languages are shared freely — typically as `Arc<Language>` — across
/// parsers and threads; nothing here is ever mutated after `build`.
#[derive(Debug)]
pub struct Language {
    name: String,
    symbol_count: usize,
    state_count: usize,
    /// Dense row-major: `state * symbol_count + symbol`.
    parse_table: Vec<ParseAction>,
    lex_states: Vec<LexStateId>,
    lex_error_state: LexStateId,
    lex_fn: LexFn,
    hidden: Vec<bool>,
    symbol_names: Vec<String>,
}

impl Language {
    /// Start assembling a language with `state_count` parse states.
    pub fn builder(name: &str, state_count: usize, lex_fn: LexFn) -> LanguageBuilder {
        LanguageBuilder::new(name, state_count, lex_fn)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn symbol_count(&self) -> usize {
        self.symbol_count
    }

    #[inline]
    pub fn state_count(&self) -> usize {
        self.state_count
    }

    /// The implicit root symbol; always the last slot.
    #[inline]
    pub fn document_symbol(&self) -> Symbol {
        Symbol::from_raw((self.symbol_count - 1) as u16)
    }

    /// Dense table lookup. `None` marks a defective table (out-of-range
    /// state or symbol), not a grammar failure; unfilled in-range cells
    /// are [`ParseAction::Error`].
    pub fn action(&self, state: StateId, symbol: Symbol) -> Option<ParseAction> {
        if symbol.index() >= self.symbol_count {
            return None;
        }
        self.parse_table
            .get(state.index() * self.symbol_count + symbol.index())
            .copied()
    }

    /// The lex state registered for a parse state.
    pub fn lex_state(&self, state: StateId) -> Option<LexStateId> {
        self.lex_states.get(state.index()).copied()
    }

    /// The dedicated lex state used while recovering from an error: a DFA
    /// that skips ahead to any token start.
    #[inline]
    pub fn lex_error_state(&self) -> LexStateId {
        self.lex_error_state
    }

    pub(crate) fn lex(&self, lexer: &mut Lexer<'_>, lex_state: LexStateId) -> Tree {
        (self.lex_fn)(lexer, lex_state)
    }

    pub fn symbol_is_hidden(&self, symbol: Symbol) -> bool {
        self.hidden.get(symbol.index()).copied().unwrap_or(false)
    }

    pub fn symbol_name(&self, symbol: Symbol) -> &str {
        self.symbol_names
            .get(symbol.index())
            .map(String::as_str)
            .unwrap_or("?")
    }

    /// Render a tree as indented lines of `name [start..end]` character
    /// spans, with `extra`/`hidden` markers. Used by tests and debugging.
    pub fn render_tree(&self, tree: &Tree) -> String {
        let mut out = String::new();
        self.render_node(tree, Length::zero(), 0, &mut out);
        out
    }

    fn render_node(&self, node: &Tree, position: Length, depth: usize, out: &mut String) {
        let start = position + node.padding();
        let end = position + node.total_size();
        let _ = write!(
            out,
            "{:indent$}{} [{}..{}]",
            "",
            self.symbol_name(node.symbol()),
            start.chars,
            end.chars,
            indent = depth * 2
        );
        if node.is_extra() {
            out.push_str(" extra");
        }
        if node.is_hidden() {
            out.push_str(" hidden");
        }
        out.push('\n');

        // The first child's padding is the node's own padding, so children
        // are laid out from the node's outer start.
        let mut child_position = position;
        for child in node.children() {
            self.render_node(child, child_position, depth + 1, out);
            child_position += child.total_size();
        }
    }
}

/// Assembles a [`Language`].
///
/// Symbols are registered in insertion order. `SYM_ERROR` and `SYM_END`
/// are pre-registered in the two reserved slots, and the document symbol
/// is appended automatically by [`build`](LanguageBuilder::build), so it
/// always lands in the last slot.
pub struct LanguageBuilder {
    name: String,
    state_count: usize,
    lex_fn: LexFn,
    /// symbol name -> hidden flag, in slot order.
    symbols: IndexMap<String, bool>,
    actions: Vec<(StateId, Symbol, ParseAction)>,
    lex_states: Vec<LexStateId>,
    lex_error_state: LexStateId,
}

impl LanguageBuilder {
    fn new(name: &str, state_count: usize, lex_fn: LexFn) -> Self {
        let mut symbols = IndexMap::new();
        symbols.insert("error".to_owned(), false);
        symbols.insert("end".to_owned(), false);
        Self {
            name: name.to_owned(),
            state_count,
            lex_fn,
            symbols,
            actions: Vec::new(),
            lex_states: vec![LexStateId::default(); state_count],
            lex_error_state: LexStateId::default(),
        }
    }

    /// Register a symbol, returning its slot. Registering the same name
    /// twice returns the original slot.
    pub fn symbol(&mut self, name: &str) -> Symbol {
        let entry = self.symbols.entry(name.to_owned());
        let index = entry.index();
        entry.or_insert(false);
        Symbol::from_raw(index as u16)
    }

    /// Register a hidden symbol: its reductions are folded into the
    /// parent when enumerating visible structure.
    pub fn hidden_symbol(&mut self, name: &str) -> Symbol {
        let entry = self.symbols.entry(name.to_owned());
        let index = entry.index();
        *entry.or_insert(true) = true;
        Symbol::from_raw(index as u16)
    }

    /// Fill one table cell. Later writes to the same cell win.
    pub fn action(&mut self, state: StateId, symbol: Symbol, action: ParseAction) -> &mut Self {
        assert!(
            state.index() < self.state_count,
            "action for state {state} out of range (state count {})",
            self.state_count
        );
        self.actions.push((state, symbol, action));
        self
    }

    /// Register the lex state for a parse state (defaults to lex state 0).
    pub fn lex_state(&mut self, state: StateId, lex_state: LexStateId) -> &mut Self {
        assert!(
            state.index() < self.state_count,
            "lex state for parse state {state} out of range (state count {})",
            self.state_count
        );
        self.lex_states[state.index()] = lex_state;
        self
    }

    pub fn lex_error_state(&mut self, lex_state: LexStateId) -> &mut Self {
        self.lex_error_state = lex_state;
        self
    }

    /// Append the document symbol and freeze everything into a
    /// [`Language`].
    pub fn build(mut self) -> Language {
        self.symbols.insert("document".to_owned(), false);
        let symbol_count = self.symbols.len();

        let mut parse_table = vec![ParseAction::Error; self.state_count * symbol_count];
        for (state, symbol, action) in &self.actions {
            assert!(
                symbol.index() < symbol_count,
                "action references unregistered symbol {symbol}"
            );
            parse_table[state.index() * symbol_count + symbol.index()] = *action;
        }

        let hidden = self.symbols.values().copied().collect();
        let symbol_names = self.symbols.keys().cloned().collect();

        Language {
            name: self.name,
            symbol_count,
            state_count: self.state_count,
            parse_table,
            lex_states: self.lex_states,
            lex_error_state: self.lex_error_state,
            lex_fn: self.lex_fn,
            hidden,
            symbol_names,
        }
    }
}

// Reserved slots are part of the builder contract; keep them checkable.
const _: () = {
    assert!(SYM_ERROR.index() == 0);
    assert!(SYM_END.index() == 1);
};
