#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use cat_peg::{Ast, NodeId};
use pretty_assertions::assert_eq;

fn only_child(ast: &Ast) -> NodeId {
    let children = ast.children(ast.root());
    assert_eq!(children.len(), 1, "expected one top-level node");
    children[0]
}

#[test]
fn simple_function_type() {
    let ast = fxn_type().parse("('a 'b -> 'b 'a)").unwrap();
    let fxn = only_child(&ast);
    assert_eq!(ast.get(fxn).label(), "type_fxn");
    assert_eq!(ast.child_labels(fxn), vec!["stack", "arrow", "stack"]);

    let production = ast.children(fxn)[0];
    assert_eq!(ast.child_labels(production), vec!["type_var", "type_var"]);
}

#[test]
fn impure_arrow_and_type_names() {
    let ast = fxn_type().parse("(int ~> string)").unwrap();
    let fxn = only_child(&ast);
    let labels: Vec<_> = ast
        .descendants(fxn)
        .map(|id| ast.get(id).label())
        .collect();
    assert_eq!(
        labels,
        vec!["type_fxn", "stack", "type_name", "arrow", "stack", "type_name"]
    );
}

#[test]
fn nested_function_type_and_stack_var() {
    let source = "('A ('A -> 'B) -> 'B)";
    let ast = fxn_type().parse(source).unwrap();
    let fxn = only_child(&ast);
    let production = ast.children(fxn)[0];
    assert_eq!(ast.child_labels(production), vec!["stack_var", "type_fxn"]);
    assert_eq!(ast.depth(fxn), 5);
}

#[test]
fn type_alias_wraps_component() {
    let ast = fxn_type().parse("(f=('a -> 'a) -> )").unwrap();
    let fxn = only_child(&ast);
    let production = ast.children(fxn)[0];
    assert_eq!(ast.child_labels(production), vec!["type_fxn"]);
    assert!(ast.children(ast.children(fxn)[2]).is_empty());
}

#[test]
fn missing_arrow_is_fatal() {
    let err = fxn_type().parse("('a 'b)").unwrap_err();
    assert_eq!(err.message, "expected either -> or ~>");
    assert_eq!(err.position, 6);
}

#[test]
fn bad_variable_name_is_fatal() {
    let err = fxn_type().parse("('1 -> )").unwrap_err();
    assert_eq!(err.message, "invalid type or stack variable name");
    assert_eq!(err.position, 2);
}

#[test]
fn type_decl_requires_function_type() {
    let err = type_decl().parse(": int").unwrap_err();
    assert_eq!(err.message, "expected function type declaration");
    assert_eq!(err.position, 2);
}
