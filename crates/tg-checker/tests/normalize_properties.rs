//! End-to-end properties of the normalizer, driven through the public API.

use tg_ast::{AstBuilder, Program, TypeAnnotation};
use tg_binder::{CallArgument, CallDescriptor, ModuleGraph, bind_program};
use tg_checker::{CheckError, CheckerOptions, LiteralInferencer, Normalized, Normalizer};
use tg_common::Span;
use tg_common::tracing_config::init_tracing;
use tg_solver::{TypeDatabase, TypeId, TypeInterner, format_type, is_assignable};

fn bound(program: &Program, types: &TypeInterner) -> ModuleGraph {
    init_tracing();
    let result = bind_program(program, types);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    result.graph
}

fn module_calls(graph: &ModuleGraph) -> &[CallDescriptor] {
    &graph.scope(graph.module_scope()).calls
}

#[test]
fn identifier_normalizes_to_its_binding() {
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let decl = b.let_decl("count", Some(TypeAnnotation::named("number")), None);
    let count = b.ident("count");
    let program = b.program(vec![decl]);
    let mut graph = bound(&program, &types);
    let module = graph.module_scope();
    let binding = graph
        .resolve_binding("count", count.span, module)
        .expect("count");

    let leaf = LiteralInferencer;
    let mut normalizer = Normalizer::new(&mut graph, &types, &leaf);
    assert_eq!(
        normalizer.normalize(&count, module).expect("normalize"),
        Normalized::Binding(binding)
    );
    assert!(module_calls(&graph).is_empty());
}

#[test]
fn binary_expression_records_one_descriptor() {
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let a = b.let_decl("a", Some(TypeAnnotation::named("number")), None);
    let c = b.let_decl("c", Some(TypeAnnotation::named("number")), None);
    let left = b.ident("a");
    let right = b.ident("c");
    let product = b.binary("*", left, right);
    let span = product.span;
    let stmt = b.expr_stmt(product);
    let program = b.program(vec![a, c, stmt]);
    let mut graph = bound(&program, &types);

    let result = tg_checker::check_program(&program, &mut graph, &types, &CheckerOptions::default())
        .expect("check");
    assert!(!result.has_errors(), "{:?}", result.diagnostics);

    let module = graph.module_scope();
    let a = graph.scope(module).binding("a").expect("a");
    let c = graph.scope(module).binding("c").expect("c");
    let star = graph
        .resolve_binding("*", span, module)
        .expect("global operator");
    let calls = module_calls(&graph);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].operator, "*");
    assert_eq!(calls[0].target, star);
    assert_eq!(calls[0].span, span);
    assert_eq!(
        calls[0].arguments.as_slice(),
        &[CallArgument::Binding(a), CallArgument::Binding(c)]
    );
    assert_eq!(calls[0].generic_arguments, None);
}

#[test]
fn let_with_sum_records_plus_then_assign() {
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let one = b.num(1.0);
    let two = b.num(2.0);
    let sum = b.binary("+", one, two);
    let decl = b.let_decl("x", None, Some(sum));
    let program = b.program(vec![decl]);
    let mut graph = bound(&program, &types);

    tg_checker::check_program(&program, &mut graph, &types, &CheckerOptions::default())
        .expect("check");

    let module = graph.module_scope();
    let x = graph.scope(module).binding("x").expect("x");
    let calls = module_calls(&graph);
    let operators: Vec<&str> = calls.iter().map(|c| c.operator.as_str()).collect();
    assert_eq!(operators, vec!["+", "="]);
    assert_eq!(
        calls[0].arguments.as_slice(),
        &[
            CallArgument::Type(types.literal_number(1.0)),
            CallArgument::Type(types.literal_number(2.0)),
        ]
    );
    assert_eq!(
        calls[1].arguments.as_slice(),
        &[CallArgument::Binding(x), CallArgument::Type(TypeId::NUMBER)]
    );
    assert_eq!(graph.binding(x).ty, TypeId::NUMBER);
}

#[test]
fn for_is_a_three_argument_call() {
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let body = b.block(vec![]);
    let forever = b.for_stmt(None, None, None, body);
    let program = b.program(vec![forever]);
    let mut graph = bound(&program, &types);

    tg_checker::check_program(&program, &mut graph, &types, &CheckerOptions::default())
        .expect("check");

    let calls = module_calls(&graph);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].operator, "for");
    assert_eq!(
        calls[0].arguments.as_slice(),
        &[
            CallArgument::Type(TypeId::MIXED),
            CallArgument::Type(TypeId::UNDEFINED),
            CallArgument::Type(TypeId::MIXED),
        ]
    );
}

#[test]
fn for_test_sees_loop_declarations() {
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let zero = b.num(0.0);
    let init = b.let_decl("i", None, Some(zero));
    let i = b.ident("i");
    let test = b.unary("!", i);
    let body = b.block(vec![]);
    let body_id = body.id;
    let for_stmt = b.for_stmt(Some(init), Some(test), None, body);
    let program = b.program(vec![for_stmt]);
    let mut graph = bound(&program, &types);

    let result =
        tg_checker::check_program(&program, &mut graph, &types, &CheckerOptions::default())
            .expect("check");
    assert!(!result.has_errors(), "{:?}", result.diagnostics);

    let loop_scope = graph.scope_of_node(body_id).expect("loop scope");
    assert!(graph.scope(graph.module_scope()).binding("i").is_none());
    assert!(graph.scope(loop_scope).binding("i").is_some());
    let operators: Vec<&str> = module_calls(&graph)
        .iter()
        .map(|c| c.operator.as_str())
        .collect();
    assert_eq!(operators, vec!["=", "!", "for"]);
}

#[test]
fn throw_adds_to_the_accumulator() {
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let oops = b.str_lit("oops");
    let throw = b.throw(oops);
    let code = b.num(7.0);
    let throw_code = b.throw(code);
    let again = b.str_lit("oops");
    let throw_again = b.throw(again);
    let program = b.program(vec![throw, throw_code, throw_again]);
    let mut graph = bound(&program, &types);

    tg_checker::check_program(&program, &mut graph, &types, &CheckerOptions::default())
        .expect("check");

    let module = graph.scope(graph.module_scope());
    assert_eq!(
        module.throwable,
        vec![types.literal_string("oops"), types.literal_number(7.0)]
    );
    assert_eq!(
        module.throwable_type(&types),
        Some(types.union2(types.literal_string("oops"), types.literal_number(7.0)))
    );
}

#[test]
fn calling_a_throwing_function_propagates_its_throwable() {
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let inner_msg = b.str_lit("inner");
    let inner_throw = b.throw(inner_msg);
    let inner = b.function_decl("inner", vec![], None, vec![inner_throw]);
    let inner_callee = b.ident("inner");
    let inner_call = b.call(inner_callee, vec![]);
    let inner_stmt = b.expr_stmt(inner_call);
    let outer = b.function_decl("outer", vec![], None, vec![inner_stmt]);
    let outer_id = outer.id;
    let outer_callee = b.ident("outer");
    let outer_call = b.call(outer_callee, vec![]);
    let stmt = b.expr_stmt(outer_call);
    // Hoisted bodies run in declaration order: `inner` settles before
    // `outer` calls it.
    let program = b.program(vec![stmt, inner, outer]);
    let mut graph = bound(&program, &types);

    let result =
        tg_checker::check_program(&program, &mut graph, &types, &CheckerOptions::default())
            .expect("check");
    assert!(!result.has_errors(), "{:?}", result.diagnostics);

    let thrown = types.literal_string("inner");
    let outer_scope = graph.scope_of_node(outer_id).expect("outer scope");
    assert_eq!(graph.scope(outer_scope).throwable, vec![thrown]);
    assert_eq!(graph.scope(graph.module_scope()).throwable, vec![thrown]);
}

#[test]
fn member_access_passes_generic_arguments() {
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let one = b.num(1.0);
    let literal = b.object(vec![("size", one)]);
    let decl = b.const_decl("box", None, literal);
    let target = b.ident("box");
    let access = b.member(target, "size");
    let stmt = b.expr_stmt(access);
    let program = b.program(vec![decl, stmt]);
    let mut graph = bound(&program, &types);

    let result =
        tg_checker::check_program(&program, &mut graph, &types, &CheckerOptions::default())
            .expect("check");
    assert!(!result.has_errors(), "{:?}", result.diagnostics);

    let calls = module_calls(&graph);
    let dot = calls.iter().find(|c| c.operator == ".").expect("member call");
    assert_eq!(dot.generic_arguments.as_ref(), Some(&dot.arguments));
    assert_eq!(dot.arguments.len(), 2);
    let key = dot.arguments[1].type_id(&graph);
    assert_eq!(key, types.literal_string("size"));
    assert!(is_assignable(&types, key, TypeId::STRING));
    let object = dot.arguments[0].type_id(&graph);
    assert_eq!(format_type(&types, object), "{ size: number }");
}

#[test]
fn new_yields_the_constructed_object() {
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let class = b.class_decl("Point", vec![("x", TypeAnnotation::named("number"))]);
    // function Foo(): number { return 1; }
    let one = b.num(1.0);
    let ret = b.ret(Some(one));
    let foo = b.function_decl("Foo", vec![], Some(TypeAnnotation::named("number")), vec![ret]);
    let ctor = b.ident("Point");
    let make = b.new_expr(ctor, vec![]);
    let decl = b.const_decl("p", None, make);
    let five = b.num(5.0);
    let odd = b.new_expr(five, vec![]);
    let odd_decl = b.const_decl("q", None, odd);
    let foo_ctor = b.ident("Foo");
    let make_foo = b.new_expr(foo_ctor, vec![]);
    let foo_decl = b.const_decl("r", None, make_foo);
    let program = b.program(vec![class, foo, decl, odd_decl, foo_decl]);
    let mut graph = bound(&program, &types);

    let result =
        tg_checker::check_program(&program, &mut graph, &types, &CheckerOptions::default())
            .expect("check");
    assert!(!result.has_errors(), "{:?}", result.diagnostics);

    let module = graph.module_scope();
    let instance = |name: &str| {
        let id = graph.scope(module).binding(name).expect(name);
        graph.binding(id).ty
    };
    let (p, q, r) = (instance("p"), instance("q"), instance("r"));
    assert_eq!(format_type(&types, p), "{ x: number }");
    assert_eq!(q, types.empty_object());
    // Foo is callable but returns a number, which is not an object.
    assert_eq!(r, types.empty_object());

    let news: Vec<&CallDescriptor> = module_calls(&graph)
        .iter()
        .filter(|c| c.operator == "new")
        .collect();
    assert_eq!(news.len(), 3);
    for (call, expected) in news.iter().zip([p, q, r]) {
        assert_eq!(call.arguments.as_slice(), &[CallArgument::Type(expected)]);
    }
}

#[test]
fn non_callable_operator_binding_is_fatal() {
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let t = b.bool_lit(true);
    let then = b.block(vec![]);
    let branch = b.if_stmt(t, then, None);
    let program = b.program(vec![branch]);
    let mut graph = bound(&program, &types);
    let global = graph.global_scope();
    let if_binding = graph
        .resolve_binding("if", Span::dummy(), global)
        .expect("global if");
    graph.binding_mut(if_binding).ty = TypeId::NUMBER;

    let err = tg_checker::check_program(&program, &mut graph, &types, &CheckerOptions::default())
        .unwrap_err();
    assert!(err.is_internal());
    assert!(matches!(err, CheckError::InvalidCallable { ref name, .. } if name == "if"));
    assert!(module_calls(&graph).is_empty());
}
