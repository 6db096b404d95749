//! The parse stack.

use std::rc::Rc;

use sawyer_core::{Length, StateId, Tree};

/// One stack slot: the automaton state entered when `node` was pushed.
#[derive(Clone, Debug)]
pub struct StackEntry {
    pub state: StateId,
    pub node: Rc<Tree>,
}

/// An ordered sequence of `(state, node)` entries; index 0 is the bottom.
#[derive(Default, Debug)]
pub struct Stack {
    entries: Vec<StackEntry>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, state: StateId, node: Rc<Tree>) {
        self.entries.push(StackEntry { state, node });
    }

    pub fn pop(&mut self) -> Option<StackEntry> {
        self.entries.pop()
    }

    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Detach the top `count` entries, preserving their bottom-to-top
    /// order. Reduction turns these into the children of a new node.
    pub fn split_off_top(&mut self, count: usize) -> Vec<StackEntry> {
        let start = self.entries.len() - count.min(self.entries.len());
        self.entries.split_off(start)
    }

    /// The state of the top entry; state 0 when the stack is empty.
    #[inline]
    pub fn top_state(&self) -> StateId {
        self.entries
            .last()
            .map(|entry| entry.state)
            .unwrap_or_default()
    }

    #[inline]
    pub fn top_node(&self) -> Option<&Rc<Tree>> {
        self.entries.last().map(|entry| &entry.node)
    }

    #[inline]
    pub fn entries(&self) -> &[StackEntry] {
        &self.entries
    }

    /// Iterate entries from the top of the stack downward, with their
    /// indices. Error recovery scans in this order.
    pub fn iter_from_top(&self) -> impl Iterator<Item = (usize, &StackEntry)> {
        self.entries.iter().enumerate().rev()
    }

    /// Combined extent of everything on the stack: the position at which
    /// the next token will be lexed.
    pub fn right_position(&self) -> Length {
        self.entries
            .iter()
            .fold(Length::zero(), |sum, entry| sum + entry.node.total_size())
    }
}
