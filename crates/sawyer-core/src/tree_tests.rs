use std::rc::Rc;

use crate::{Length, SYM_ERROR, Symbol, Tree};

const NUMBER: Symbol = Symbol::from_raw(2);
const PLUS: Symbol = Symbol::from_raw(3);
const EXPR: Symbol = Symbol::from_raw(6);

#[test]
fn leaf_extents() {
    let token = Tree::leaf(NUMBER, Length::new(1, 1), Length::new(2, 2));
    assert_eq!(token.symbol(), NUMBER);
    assert_eq!(token.padding(), Length::new(1, 1));
    assert_eq!(token.size(), Length::new(2, 2));
    assert_eq!(token.total_size(), Length::new(3, 3));
    assert!(token.children().is_empty());
    assert!(!token.is_extra());
    assert!(!token.is_hidden());
}

#[test]
fn error_leaf_uses_reserved_symbol() {
    let node = Tree::error(Length::zero(), Length::new(1, 1));
    assert_eq!(node.symbol(), SYM_ERROR);
    assert!(node.is_error());
}

#[test]
fn interior_takes_padding_from_first_child() {
    // "1 + 2": the '+' carries one char of padding, as does the second
    // number. The interior node's size must exclude only the first child's
    // padding.
    let children = vec![
        Rc::new(Tree::leaf(NUMBER, Length::zero(), Length::new(1, 1))),
        Rc::new(Tree::leaf(PLUS, Length::new(1, 1), Length::new(1, 1))),
        Rc::new(Tree::leaf(NUMBER, Length::new(1, 1), Length::new(1, 1))),
    ];
    let expr = Tree::interior(EXPR, children, false);
    assert_eq!(expr.padding(), Length::zero());
    assert_eq!(expr.size(), Length::new(5, 5));
    assert_eq!(expr.total_size(), Length::new(5, 5));
    assert_eq!(expr.child_count(), 3);
}

#[test]
fn interior_padding_propagates_through_nesting() {
    let inner = Tree::interior(
        EXPR,
        vec![Rc::new(Tree::leaf(
            NUMBER,
            Length::new(2, 2),
            Length::new(1, 1),
        ))],
        false,
    );
    assert_eq!(inner.padding(), Length::new(2, 2));
    assert_eq!(inner.size(), Length::new(1, 1));

    let outer = Tree::interior(EXPR, vec![Rc::new(inner)], false);
    assert_eq!(outer.padding(), Length::new(2, 2));
    assert_eq!(outer.size(), Length::new(1, 1));
    assert_eq!(outer.total_size(), Length::new(3, 3));
}

#[test]
fn interior_with_no_children_is_empty() {
    let node = Tree::interior(EXPR, Vec::new(), false);
    assert_eq!(node.padding(), Length::zero());
    assert_eq!(node.size(), Length::zero());
}

#[test]
fn size_invariant_holds_over_children() {
    let children = vec![
        Rc::new(Tree::leaf(NUMBER, Length::new(1, 2), Length::new(3, 5))),
        Rc::new(Tree::leaf(PLUS, Length::new(2, 2), Length::new(1, 1))),
    ];
    let combined: Length = children
        .iter()
        .fold(Length::zero(), |sum, child| sum + child.total_size());
    let node = Tree::interior(EXPR, children, false);
    assert_eq!(node.padding() + node.size(), combined);
}

#[test]
fn flags_and_mutators() {
    let mut node = Tree::leaf(NUMBER, Length::zero(), Length::new(1, 1));
    node.mark_extra();
    assert!(node.is_extra());

    let mut wrapped = Tree::interior(EXPR, vec![Rc::new(node)], true);
    assert!(wrapped.is_hidden());
    wrapped.mark_extra();
    wrapped.clear_flags();
    assert!(!wrapped.is_extra());
    assert!(!wrapped.is_hidden());

    let mut error = Tree::error(Length::new(1, 1), Length::zero());
    error.set_padding(Length::zero());
    error.set_size(Length::new(4, 4));
    assert_eq!(error.total_size(), Length::new(4, 4));
}

#[test]
fn shared_children_stay_alive_after_parent_drop() {
    let child = Rc::new(Tree::leaf(NUMBER, Length::zero(), Length::new(1, 1)));
    let parent = Tree::interior(EXPR, vec![Rc::clone(&child)], false);
    assert_eq!(Rc::strong_count(&child), 2);
    drop(parent);
    assert_eq!(Rc::strong_count(&child), 1);
}
