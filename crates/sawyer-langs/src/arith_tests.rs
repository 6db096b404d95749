//! Driver scenarios exercised through the arithmetic language: clean
//! parses, trivia, error recovery, and incremental reparsing.

use std::rc::Rc;
use std::sync::Arc;

use indoc::indoc;

use sawyer_core::{Length, Tree};
use sawyer_runtime::{InputEdit, Language, Parser, PrintTracer, StringInput};

use crate::arithmetic;

fn parse_keep_parser(text: &str) -> (Parser, Rc<Tree>) {
    let mut parser = Parser::new(arithmetic());
    let mut input = StringInput::new(text);
    let tree = parser
        .parse(&mut input, None)
        .expect("arithmetic table is well-formed");
    (parser, tree)
}

fn parse_text(text: &str) -> Rc<Tree> {
    parse_keep_parser(text).1
}

fn rendered(text: &str) -> String {
    arithmetic().render_tree(&parse_text(text))
}

fn first_leaf(root: &Rc<Tree>) -> Rc<Tree> {
    let mut node = Rc::clone(root);
    while let Some(child) = node.children().first() {
        let child = Rc::clone(child);
        node = child;
    }
    node
}

/// Visible structure only: symbol names, extras skipped, spans ignored.
fn skeleton(language: &Language, node: &Tree, out: &mut String) {
    out.push_str(language.symbol_name(node.symbol()));
    let visible: Vec<_> = node
        .children()
        .iter()
        .filter(|child| !child.is_extra())
        .collect();
    if !visible.is_empty() {
        out.push('(');
        for (index, child) in visible.iter().enumerate() {
            if index > 0 {
                out.push(' ');
            }
            skeleton(language, child, out);
        }
        out.push(')');
    }
}

fn skeleton_of(text: &str) -> String {
    let language = arithmetic();
    let tree = parse_text(text);
    let mut out = String::new();
    skeleton(&language, &tree, &mut out);
    out
}

#[test]
fn plain_addition() {
    insta::assert_snapshot!(rendered("1+2"), @r#"
    document [0..3]
      expr [0..3]
        expr [0..1]
          number [0..1]
        + [1..2]
        expr [2..3]
          number [2..3]
    "#);
}

#[test]
fn whitespace_becomes_padding() {
    insta::assert_snapshot!(rendered("1 + 2"), @r#"
    document [0..5]
      expr [0..5]
        expr [0..1]
          number [0..1]
        + [2..3]
        expr [4..5]
          number [4..5]
    "#);
}

#[test]
fn addition_is_left_associative() {
    insta::assert_snapshot!(rendered("1+2+3"), @r#"
    document [0..5]
      expr [0..5]
        expr [0..3]
          expr [0..1]
            number [0..1]
          + [1..2]
          expr [2..3]
            number [2..3]
        + [3..4]
        expr [4..5]
          number [4..5]
    "#);
}

#[test]
fn multi_digit_numbers() {
    insta::assert_snapshot!(rendered("12+345"), @r#"
    document [0..6]
      expr [0..6]
        expr [0..2]
          number [0..2]
        + [2..3]
        expr [3..6]
          number [3..6]
    "#);
}

#[test]
fn truncated_input_gets_empty_error_node() {
    // "1+" ends where an operand should start; the error node is empty
    // and sits at the end of the input.
    insta::assert_snapshot!(rendered("1+"), @r#"
    document [0..2]
      expr [0..1]
        number [0..1]
      + [1..2]
      error [2..2]
    "#);
}

#[test]
fn unrecognized_character_becomes_error_node() {
    insta::assert_snapshot!(rendered("1@2"), @r#"
    document [0..3]
      expr [0..1]
        number [0..1]
      error [1..2]
      expr [2..3]
        number [2..3]
    "#);
}

#[test]
fn error_node_absorbs_surrounding_whitespace() {
    // The space before the `@` stays as the error's padding; the space
    // after it is skipped input and lands inside the error's size.
    insta::assert_snapshot!(rendered("1 @ 2"), @r#"
    document [0..5]
      expr [0..1]
        number [0..1]
      error [2..4]
      expr [4..5]
        number [4..5]
    "#);
}

#[test]
fn recovery_resumes_inside_an_expression() {
    insta::assert_snapshot!(rendered("1++2"), @r#"
    document [0..4]
      expr [0..4]
        expr [0..1]
          number [0..1]
        + [1..2]
        expr [2..4]
          error [2..2]
          + [2..3]
          expr [3..4]
            number [3..4]
    "#);
}

#[test]
fn missing_operator_gets_error_between_operands() {
    insta::assert_snapshot!(rendered("1 2"), @r#"
    document [0..3]
      expr [0..1]
        number [0..1]
      error [1..2]
      expr [2..3]
        number [2..3]
    "#);
}

#[test]
fn empty_input_yields_empty_error_child() {
    insta::assert_snapshot!(rendered(""), @r#"
    document [0..0]
      error [0..0]
    "#);
}

#[test]
fn garbage_only_input_is_one_error_node() {
    insta::assert_snapshot!(rendered("@@@@"), @r#"
    document [0..4]
      error [0..4]
    "#);
}

#[test]
fn trailing_comment_is_an_extra_child() {
    insta::assert_snapshot!(rendered("1+2 # done"), @r#"
    document [0..10]
      expr [0..3]
        expr [0..1]
          number [0..1]
        + [1..2]
        expr [2..3]
          number [2..3]
      comment [4..10] extra
        comment_text [4..10]
    "#);
}

#[test]
fn comment_inside_expression_is_absorbed_by_the_reduction() {
    let input = indoc! {"
        1+ # two
        2
    "};
    insta::assert_snapshot!(rendered(input.trim_end()), @r#"
    document [0..10]
      expr [0..10]
        expr [0..1]
          number [0..1]
        + [1..2]
        comment [3..8] extra
          comment_text [3..8]
        expr [9..10]
          number [9..10]
    "#);
}

#[test]
fn comment_only_input() {
    insta::assert_snapshot!(rendered("# hi"), @r#"
    document [0..4]
      comment [0..4] extra
        comment_text [0..4]
    "#);
}

#[test]
fn extras_do_not_change_visible_structure() {
    let plain = skeleton_of("1+2");
    assert_eq!(plain, "document(expr(expr(number) + expr(number)))");
    assert_eq!(skeleton_of("1 + 2"), plain);
    assert_eq!(skeleton_of("1+ # two\n2"), plain);
    assert_eq!(skeleton_of("1 # a\n+ # b\n2"), plain);
}

#[test]
fn always_covers_the_input() {
    let language = arithmetic();
    let inputs = [
        "", "1", "1+2", "1 + 2", "1+", "+1", "1@2", "1 @ 2", "@@@@", "1++2", "1 2", "((", "# c",
        "1+α", "12+3 # αβ∑",
    ];
    for text in inputs {
        let mut parser = Parser::new(Arc::clone(&language));
        let mut input = StringInput::new(text);
        let tree = parser.parse(&mut input, None).expect("parse never fails");
        let expected = Length::new(text.chars().count() as u32, text.len() as u32);
        assert_eq!(tree.total_size(), expected, "coverage for {text:?}");
    }
}

#[test]
fn parsing_is_deterministic() {
    for text in ["1+2", "1 + 2", "1@2", "1++2", "# hi", "@@@@"] {
        assert_eq!(parse_text(text), parse_text(text), "determinism for {text:?}");
    }
}

#[test]
fn reparse_without_edit_resets_the_parser() {
    let (mut parser, first) = parse_keep_parser("1+2");
    let mut input = StringInput::new("1+2");
    let second = parser.parse(&mut input, None).expect("reparse succeeds");
    assert_eq!(first, second);
}

#[test]
fn empty_edit_reproduces_the_previous_tree() {
    let (mut parser, first) = parse_keep_parser("1+2");
    let mut input = StringInput::new("1+2");
    let edit = InputEdit {
        position: 3,
        chars_inserted: 0,
        chars_removed: 0,
    };
    let second = parser.parse(&mut input, Some(edit)).expect("reparse succeeds");
    assert_eq!(first, second);
}

#[test]
fn incremental_reparse_matches_fresh_parse() {
    let (mut parser, old_root) = parse_keep_parser("1+2");
    let old_leaf = first_leaf(&old_root);

    // Insert "3+" at offset 2: "1+2" -> "1+3+2".
    let mut input = StringInput::new("1+3+2");
    let edit = InputEdit {
        position: 2,
        chars_inserted: 2,
        chars_removed: 0,
    };
    let new_root = parser.parse(&mut input, Some(edit)).expect("reparse succeeds");

    let language = arithmetic();
    assert_eq!(language.render_tree(&new_root), rendered("1+3+2"));

    // The prefix left of the edit is shared with the old tree, not rebuilt.
    assert!(Rc::ptr_eq(&old_leaf, &first_leaf(&new_root)));
    // The old tree is untouched.
    assert_eq!(language.render_tree(&old_root), rendered("1+2"));
}

#[test]
fn edit_at_position_zero_reparses_from_scratch() {
    let (mut parser, _) = parse_keep_parser("1+2");
    let mut input = StringInput::new("91+2");
    let edit = InputEdit {
        position: 0,
        chars_inserted: 1,
        chars_removed: 0,
    };
    let tree = parser.parse(&mut input, Some(edit)).expect("reparse succeeds");
    assert_eq!(arithmetic().render_tree(&tree), rendered("91+2"));
}

#[test]
fn chunked_input_matches_default_chunking() {
    let text = "12+3 # αβ∑";
    for chunk_size in [1, 2, 3, 7] {
        let mut parser = Parser::new(arithmetic());
        let mut input = StringInput::with_chunk_size(text, chunk_size);
        let tree = parser.parse(&mut input, None).expect("parse succeeds");
        assert_eq!(
            arithmetic().render_tree(&tree),
            rendered(text),
            "chunk size {chunk_size}"
        );
    }
}

#[test]
fn trees_are_released_when_parser_and_root_drop() {
    let (parser, root) = parse_keep_parser("1+2");
    let leaf = first_leaf(&root);
    let weak_root = Rc::downgrade(&root);
    let weak_leaf = Rc::downgrade(&leaf);

    drop(root);
    drop(leaf);
    // The parser's stack still owns the document.
    assert!(weak_root.upgrade().is_some());
    assert!(weak_leaf.upgrade().is_some());

    drop(parser);
    assert!(weak_root.upgrade().is_none());
    assert!(weak_leaf.upgrade().is_none());
}

#[test]
fn trace_of_a_clean_parse() {
    let mut parser = Parser::new(arithmetic());
    let mut input = StringInput::new("1+2");
    let mut tracer = PrintTracer::new(Vec::new());
    parser
        .parse_with(&mut input, None, &mut tracer)
        .expect("parse succeeds");
    let log = String::from_utf8(tracer.into_inner()).expect("trace is UTF-8");
    insta::assert_snapshot!(log, @r#"
    PARSE LOOKAHEAD number
    PARSE SHIFT 1
    PARSE LOOKAHEAD +
    PARSE REDUCE expr 1
    PARSE LOOKAHEAD expr
    PARSE SHIFT 2
    PARSE LOOKAHEAD +
    PARSE SHIFT 3
    PARSE LOOKAHEAD number
    PARSE SHIFT 1
    PARSE LOOKAHEAD end
    PARSE REDUCE expr 1
    PARSE LOOKAHEAD expr
    PARSE SHIFT 4
    PARSE LOOKAHEAD end
    PARSE REDUCE expr 3
    PARSE LOOKAHEAD expr
    PARSE SHIFT 2
    PARSE LOOKAHEAD end
    PARSE ACCEPT
    "#);
}

#[test]
fn trace_of_an_incremental_reparse() {
    let (mut parser, _) = parse_keep_parser("1+2");
    let mut input = StringInput::new("1+3+2");
    let edit = InputEdit {
        position: 2,
        chars_inserted: 2,
        chars_removed: 0,
    };
    let mut tracer = PrintTracer::new(Vec::new());
    parser
        .parse_with(&mut input, Some(edit), &mut tracer)
        .expect("reparse succeeds");
    let log = String::from_utf8(tracer.into_inner()).expect("trace is UTF-8");
    assert!(log.starts_with("PARSE POP document\n"), "log was: {log}");
    assert!(log.contains("PARSE PUT BACK number\n"));
    assert!(log.contains("PARSE RESUME 1\n"));
}

#[test]
fn trace_of_a_recovery() {
    let mut parser = Parser::new(arithmetic());
    let mut input = StringInput::new("1@2");
    let mut tracer = PrintTracer::new(Vec::new());
    parser
        .parse_with(&mut input, None, &mut tracer)
        .expect("parse succeeds");
    let log = String::from_utf8(tracer.into_inner()).expect("trace is UTF-8");
    assert!(log.contains("PARSE LEX AGAIN\n"));
    assert!(log.contains("PARSE RECOVER 5\n"));
    assert!(log.contains("PARSE ACCEPT\n"));
}

#[test]
fn failed_recovery_is_traced() {
    let mut parser = Parser::new(arithmetic());
    let mut input = StringInput::new("1+");
    let mut tracer = PrintTracer::new(Vec::new());
    parser
        .parse_with(&mut input, None, &mut tracer)
        .expect("parse succeeds");
    let log = String::from_utf8(tracer.into_inner()).expect("trace is UTF-8");
    assert!(log.contains("PARSE ERROR\n"));
    assert!(log.contains("PARSE FAIL TO RECOVER\n"));
}
