//! Reference-counted concrete syntax tree nodes.
//!
//! A node records its grammar `symbol`, the extent of its leading trivia
//! (`padding`), the extent of its own content (`size`), and its children.
//! An interior node takes its padding from its first child and its size is
//! the children's combined extent minus that padding, so `total_size`
//! tiles the input exactly.
//!
//! Ownership is `Rc`-based: parent nodes and the parse stack hold
//! `Rc<Tree>` handles, while the driver keeps not-yet-shared nodes
//! (freshly lexed tokens, fresh reductions) by value and only wraps them
//! when they are pushed. All mutation happens in that uniquely-owned
//! window; a node reachable from two trees is never written again, which
//! is what lets an incremental reparse share subtrees with the previous
//! tree.

use std::rc::Rc;

use crate::{Length, SYM_ERROR, Symbol};

/// One concrete syntax tree node.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Tree {
    symbol: Symbol,
    padding: Length,
    size: Length,
    children: Vec<Rc<Tree>>,
    extra: bool,
    hidden: bool,
}

impl Tree {
    /// A token with no children.
    pub fn leaf(symbol: Symbol, padding: Length, size: Length) -> Self {
        Self {
            symbol,
            padding,
            size,
            children: Vec::new(),
            extra: false,
            hidden: false,
        }
    }

    /// An error leaf. Recovery resizes these to cover skipped input.
    pub fn error(padding: Length, size: Length) -> Self {
        Self::leaf(SYM_ERROR, padding, size)
    }

    /// An interior node over `children` (bottom-to-top parse order).
    ///
    /// Padding comes from the first child; size is the children's combined
    /// extent minus that padding. An empty child list yields a zero-extent
    /// node.
    pub fn interior(symbol: Symbol, children: Vec<Rc<Tree>>, hidden: bool) -> Self {
        let padding = children
            .first()
            .map(|child| child.padding)
            .unwrap_or_default();
        let combined = children
            .iter()
            .fold(Length::zero(), |sum, child| sum + child.total_size());
        Self {
            symbol,
            padding,
            size: combined - padding,
            children,
            extra: false,
            hidden,
        }
    }

    #[inline]
    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    /// Extent of the leading trivia attached to this node.
    #[inline]
    pub fn padding(&self) -> Length {
        self.padding
    }

    /// Extent of the node's own content, excluding padding.
    #[inline]
    pub fn size(&self) -> Length {
        self.size
    }

    /// Padding plus size: the full span this node accounts for.
    #[inline]
    pub fn total_size(&self) -> Length {
        self.padding + self.size
    }

    #[inline]
    pub fn children(&self) -> &[Rc<Tree>] {
        &self.children
    }

    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Whether this node is an extra (ubiquitous token or trivia
    /// production). Extras sit on the parse stack without affecting the
    /// automaton state and are absorbed by reductions without counting
    /// against the nominal arity.
    #[inline]
    pub fn is_extra(&self) -> bool {
        self.extra
    }

    /// Whether this node's symbol is hidden: present in the tree but
    /// folded into its parent when enumerating visible structure.
    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.symbol == SYM_ERROR
    }

    /// Mark the node as an extra. Driver-side; valid only while the node
    /// is still uniquely owned.
    pub fn mark_extra(&mut self) {
        self.extra = true;
    }

    /// Clear both flag bits. The document node is never extra or hidden.
    pub fn clear_flags(&mut self) {
        self.extra = false;
        self.hidden = false;
    }

    /// Replace the padding. Recovery clears the lookahead's padding when
    /// the skipped span is folded into an error node.
    pub fn set_padding(&mut self, padding: Length) {
        self.padding = padding;
    }

    /// Replace the size. Recovery resizes error nodes to span from the
    /// stack's right edge to the next token start.
    pub fn set_size(&mut self, size: Length) {
        self.size = size;
    }
}
