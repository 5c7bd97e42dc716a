use super::*;
use tg_ast::{AstBuilder, FunctionParts};
use tg_solver::{TypeInterner, format_type};

fn binding_type(result: &BindResult, types: &TypeInterner, name: &str, scope: ScopeId) -> String {
    let id = result
        .graph
        .resolve_binding(name, Span::dummy(), scope)
        .unwrap_or_else(|err| panic!("{err}"));
    format_type(types, result.graph.binding(id).ty)
}

#[test]
fn test_variable_declarations() {
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let one = b.num(1.0);
    let x = b.let_decl("x", None, Some(one));
    let two = b.num(2.0);
    let y = b.const_decl("y", Some(TypeAnnotation::named("number")), two);
    let program = b.program(vec![x, y]);

    let result = bind_program(&program, &types);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let module = result.graph.module_scope();

    let x = result.graph.scope(module).binding("x").expect("x declared");
    let x = result.graph.binding(x);
    assert!(x.is_placeholder());
    assert!(x.flags.is_empty());

    let y = result.graph.scope(module).binding("y").expect("y declared");
    let y = result.graph.binding(y);
    assert_eq!(y.ty, TypeId::NUMBER);
    assert!(y.flags.contains(BindingFlags::CONST | BindingFlags::ANNOTATED));
    assert!(!y.is_placeholder());
}

#[test]
fn test_function_declarations_are_hoisted_and_typed() {
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let f = b.ident("double");
    let arg = b.num(2.0);
    let call = b.call(f, vec![arg]);
    let use_before = b.expr_stmt(call);

    let n = b.param("n", Some(TypeAnnotation::named("number")));
    let n_ref = b.ident("n");
    let two = b.num(2.0);
    let product = b.binary("*", n_ref, two);
    let ret = b.ret(Some(product));
    let decl = b.function_decl("double", vec![n], Some(TypeAnnotation::named("number")), vec![ret]);
    let decl_id = decl.id;

    let noop = b.function_decl("noop", vec![], None, vec![]);
    let p = b.param("p", None);
    let p_ref = b.ident("p");
    let ret_p = b.ret(Some(p_ref));
    let echo = b.function_decl("echo", vec![p], None, vec![ret_p]);
    let program = b.program(vec![use_before, decl, noop, echo]);

    let result = bind_program(&program, &types);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let module = result.graph.module_scope();

    // Declared before the statement that uses it.
    let double = result.graph.scope(module).bindings.get_index_of("double");
    assert_eq!(double, Some(0));

    assert_eq!(binding_type(&result, &types, "double", module), "(number) => number");
    assert_eq!(binding_type(&result, &types, "noop", module), "() => void");
    assert_eq!(binding_type(&result, &types, "echo", module), "(unknown) => unknown");

    let function_scope = result.graph.scope_of_node(decl_id).expect("function scope");
    assert_eq!(result.graph.scope(function_scope).kind, ScopeKind::Function);
    let n = result.graph.scope(function_scope).binding("n").expect("param");
    assert!(result.graph.binding(n).flags.contains(BindingFlags::PARAMETER));
}

#[test]
fn test_generic_function_and_throws() {
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let value = b.param("value", Some(TypeAnnotation::named("T")));
    let value_ref = b.ident("value");
    let ret = b.ret(Some(value_ref));
    let identity = b.function_decl_full(
        "identity",
        FunctionParts {
            type_params: vec!["T".to_string()],
            params: vec![value],
            return_type: Some(TypeAnnotation::named("T")),
            throws: Some(TypeAnnotation::named("string")),
            body: vec![ret],
        },
    );
    let program = b.program(vec![identity]);

    let result = bind_program(&program, &types);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let module = result.graph.module_scope();
    assert_eq!(binding_type(&result, &types, "identity", module), "<T>(T) => T");

    let id = result.graph.scope(module).binding("identity").expect("declared");
    assert_eq!(result.graph.binding(id).throwable, Some(TypeId::STRING));
}

#[test]
fn test_for_scope_is_keyed_by_body() {
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let zero = b.num(0.0);
    let init = b.let_decl("i", None, Some(zero));
    let i = b.ident("i");
    let ten = b.num(10.0);
    let test = b.binary("<", i, ten);
    let one = b.num(1.0);
    let inner = b.let_decl("inner", None, Some(one));
    let body = b.block(vec![inner]);
    let body_id = body.id;
    let for_stmt = b.for_stmt(Some(init), Some(test), None, body);
    let program = b.program(vec![for_stmt]);

    let result = bind_program(&program, &types);
    assert!(result.errors.is_empty(), "{:?}", result.errors);

    let loop_scope = result.graph.scope_of_node(body_id).expect("loop scope");
    let scope = result.graph.scope(loop_scope);
    assert_eq!(scope.kind, ScopeKind::Block);
    assert!(scope.binding("i").is_some());
    // The block body reuses the loop scope.
    assert!(scope.binding("inner").is_some());
    assert!(result.graph.scope(result.graph.module_scope()).binding("i").is_none());
}

#[test]
fn test_var_is_function_scoped_and_redeclarable() {
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let one = b.num(1.0);
    let d1 = b.declarator("v", None, Some(one));
    let first = b.var_decl(DeclarationKind::Var, vec![d1]);
    let two = b.num(2.0);
    let d2 = b.declarator("v", None, Some(two));
    let second = b.var_decl(DeclarationKind::Var, vec![d2]);
    let block = b.block(vec![first, second]);
    let program = b.program(vec![block]);

    let result = bind_program(&program, &types);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let module = result.graph.module_scope();
    assert!(result.graph.scope(module).binding("v").is_some());
}

#[test]
fn test_duplicate_let_is_reported() {
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let first = b.let_decl("a", None, None);
    let second = b.let_decl("a", None, None);
    let program = b.program(vec![first, second]);

    let result = bind_program(&program, &types);
    assert_eq!(result.errors.len(), 1);
    assert!(matches!(&result.errors[0], ScopeError::Duplicate { name, .. } if name == "a"));
}

#[test]
fn test_unknown_annotation_is_reported() {
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let decl = b.let_decl("a", Some(TypeAnnotation::named("Missing")), None);
    let program = b.program(vec![decl]);

    let result = bind_program(&program, &types);
    assert!(matches!(
        result.errors.as_slice(),
        [ScopeError::UnknownType { name, .. }] if name == "Missing"
    ));
    let module = result.graph.module_scope();
    let a = result.graph.scope(module).binding("a").expect("still declared");
    assert_eq!(result.graph.binding(a).ty, TypeId::UNKNOWN);
}

#[test]
fn test_class_binding_is_constructor() {
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let class = b.class_decl(
        "Point",
        vec![
            ("x", TypeAnnotation::named("number")),
            ("y", TypeAnnotation::named("number")),
        ],
    );
    let program = b.program(vec![class]);

    let result = bind_program(&program, &types);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let module = result.graph.module_scope();
    assert_eq!(
        binding_type(&result, &types, "Point", module),
        "() => { x: number, y: number }"
    );
}

#[test]
fn test_function_expressions_use_position_keys() {
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let arrow_body = b.block(vec![]);
    let arrow = b.arrow(vec![], None, arrow_body);
    let arrow_key = arrow.anonymous_key();
    let arrow_stmt = b.expr_stmt(arrow);

    let named_body = b.block(vec![]);
    let named = b.function_expr(Some("f"), vec![], None, named_body);
    let named_key = named.anonymous_key();
    let named_id = named.id;
    let decl = b.const_decl("f", None, named);
    let program = b.program(vec![arrow_stmt, decl]);

    let result = bind_program(&program, &types);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let module = result.graph.module_scope();
    let scope = result.graph.scope(module);
    assert!(scope.binding(&arrow_key).is_some());
    let expr_binding = scope.binding(&named_key).expect("expression binding");

    // `f` outside is the constant; inside the function it is the expression.
    let outer_f = scope.binding("f").expect("const f");
    assert_ne!(outer_f, expr_binding);
    let inner_scope = result.graph.scope_of_node(named_id).expect("function scope");
    assert_eq!(
        result.graph.resolve_binding("f", Span::dummy(), inner_scope),
        Ok(expr_binding)
    );
}

#[test]
fn test_deep_blocks_stop_at_the_statement_limit() {
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let one = b.num(1.0);
    let neg = b.unary("-", one);
    let mut stmt = b.expr_stmt(neg);
    let mut blocks = Vec::new();
    for _ in 0..600 {
        stmt = b.block(vec![stmt]);
        blocks.push((stmt.id, stmt.span));
    }
    let program = b.program(vec![stmt]);

    let result = bind_program(&program, &types);
    // Blocks are listed innermost first; the 501st from the outside is skipped.
    let (skipped_id, skipped_span) = blocks[600 - 501];
    let (last_id, _) = blocks[600 - 500];
    assert_eq!(
        result.errors,
        vec![ScopeError::TooDeep {
            limit: MAX_STATEMENT_DEPTH,
            span: skipped_span,
        }]
    );
    assert!(result.graph.scope_of_node(last_id).is_some());
    assert!(result.graph.scope_of_node(skipped_id).is_none());
}

#[test]
fn test_nested_function_bodies_count_toward_the_limit() {
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let mut expr = b.num(1.0);
    for _ in 0..2000 {
        expr = b.arrow(vec![], None, expr);
    }
    let stmt = b.expr_stmt(expr);
    let program = b.program(vec![stmt]);

    let result = bind_program(&program, &types);
    assert_eq!(result.errors.len(), 1);
    assert!(matches!(
        result.errors[0],
        ScopeError::TooDeep {
            limit: MAX_STATEMENT_DEPTH,
            ..
        }
    ));
    // One function scope per arrow whose enclosing body was bound.
    let function_scopes = result
        .graph
        .scopes
        .iter()
        .filter(|s| s.kind == ScopeKind::Function)
        .count();
    assert_eq!(function_scopes, MAX_STATEMENT_DEPTH as usize);
}
