use super::*;
use tg_ast::{AstBuilder, Program};
use tg_binder::{ModuleGraph, bind_program};
use tg_solver::{TypeInterner, format_type};

fn graph_for(program: &Program, types: &TypeInterner) -> ModuleGraph {
    bind_program(program, types).graph
}

#[test]
fn test_literals() {
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let nodes = vec![b.num(42.0), b.str_lit("hi"), b.bool_lit(false), b.null(), b.this()];
    let program = b.program(vec![]);
    let mut graph = graph_for(&program, &types);
    let module = graph.module_scope();

    let leaf = LiteralInferencer;
    let mut cx = Normalizer::new(&mut graph, &types, &leaf);
    let inferred: Vec<String> = nodes
        .iter()
        .map(|node| {
            let ty = leaf
                .infer_leaf(node, module, module, &mut cx)
                .expect("leaf type");
            format_type(&types, ty)
        })
        .collect();
    assert_eq!(inferred, vec!["42", "\"hi\"", "false", "null", "unknown"]);
}

#[test]
fn test_object_literal_widens_property_values() {
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let one = b.num(1.0);
    let name = b.str_lit("n");
    let object = b.object(vec![("a", one), ("b", name)]);
    let program = b.program(vec![]);
    let mut graph = graph_for(&program, &types);
    let module = graph.module_scope();

    let leaf = LiteralInferencer;
    let mut cx = Normalizer::new(&mut graph, &types, &leaf);
    let ty = cx.normalize_type(&object, module).expect("object");
    assert_eq!(format_type(&types, ty), "{ a: number, b: string }");
}

#[test]
fn test_array_literal_is_indexed_object() {
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let one = b.num(1.0);
    let two = b.str_lit("two");
    let array = b.array(vec![one, two]);
    let program = b.program(vec![]);
    let mut graph = graph_for(&program, &types);
    let module = graph.module_scope();

    let leaf = LiteralInferencer;
    let mut cx = Normalizer::new(&mut graph, &types, &leaf);
    let ty = cx.normalize_type(&array, module).expect("array");
    assert_eq!(
        format_type(&types, ty),
        "{ 0: number, 1: string, length: number }"
    );
}

#[test]
fn test_template_substitutions_are_normalized() {
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let one = b.num(1.0);
    let two = b.num(2.0);
    let sum = b.binary("+", one, two);
    let template = b.template(vec![sum]);
    let program = b.program(vec![]);
    let mut graph = graph_for(&program, &types);
    let module = graph.module_scope();

    let leaf = LiteralInferencer;
    let mut cx = Normalizer::new(&mut graph, &types, &leaf);
    let ty = cx.normalize_type(&template, module).expect("template");
    assert_eq!(ty, TypeId::STRING);
    assert_eq!(graph.scope(module).calls.len(), 1);
}

#[test]
fn test_statements_are_not_leaves() {
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let empty = b.empty();
    let program = b.program(vec![]);
    let mut graph = graph_for(&program, &types);
    let module = graph.module_scope();

    let leaf = LiteralInferencer;
    let mut cx = Normalizer::new(&mut graph, &types, &leaf);
    let err = cx.normalize(&empty, module).unwrap_err();
    assert!(matches!(
        err,
        CheckError::UnexpectedNode {
            node: "EmptyStatement",
            ..
        }
    ));
    assert!(err.is_internal());
}
