//! Statement isolation in the driver: failed statements roll back, the rest
//! of the unit is still checked.

use tg_ast::AstBuilder;
use tg_binder::{ScopeError, bind_program};
use tg_checker::{CheckError, CheckerOptions, bind_and_check, check_program};
use tg_common::diagnostics::diagnostic_codes;
use tg_common::limits::MAX_STATEMENT_DEPTH;
use tg_common::tracing_config::init_tracing;
use tg_solver::{TypeDatabase, TypeInterner};

#[test]
fn earlier_statements_survive_a_failure() {
    init_tracing();
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let first = b.str_lit("first");
    let throw_first = b.throw(first);
    // throw "second" + ghost;
    let second = b.str_lit("second");
    let ghost = b.ident("ghost");
    let broken = b.binary("+", second, ghost);
    let throw_broken = b.throw(broken);
    let one = b.num(1.0);
    let neg = b.unary("-", one);
    let last = b.expr_stmt(neg);
    let program = b.program(vec![throw_first, throw_broken, last]);

    let (graph, result) =
        bind_and_check(&program, &types, &CheckerOptions::default()).expect("check");

    let module = graph.scope(graph.module_scope());
    let operators: Vec<&str> = module.calls.iter().map(|c| c.operator.as_str()).collect();
    assert_eq!(operators, vec!["throw", "-"]);
    assert_eq!(module.throwable, vec![types.literal_string("first")]);
    assert_eq!(result.codes(), vec![diagnostic_codes::CANNOT_FIND_NAME]);
}

#[test]
fn every_failing_statement_is_reported_in_order() {
    init_tracing();
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let a = b.ident("a");
    let missing_a = b.expr_stmt(a);
    let five = b.num(5.0);
    let callee = b.num(1.0);
    let bad_call = b.call(callee, vec![five]);
    let not_callable = b.expr_stmt(bad_call);
    let yes = b.bool_lit(true);
    let flag = b.str_lit("x");
    let mismatch = b.binary("*", yes, flag);
    let mismatched = b.expr_stmt(mismatch);
    let program = b.program(vec![missing_a, not_callable, mismatched]);

    let (graph, result) =
        bind_and_check(&program, &types, &CheckerOptions::default()).expect("check");

    assert_eq!(
        result.codes(),
        vec![
            diagnostic_codes::CANNOT_FIND_NAME,
            diagnostic_codes::NOT_CALLABLE,
            diagnostic_codes::ARGUMENT_NOT_ASSIGNABLE,
        ]
    );
    assert!(graph.calls().next().is_none());
}

#[test]
fn missing_scope_aborts_even_when_isolated() {
    init_tracing();
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let one = b.num(1.0);
    let neg = b.unary("-", one);
    let inner = b.expr_stmt(neg);
    let block = b.block(vec![inner]);
    let block_id = block.id;
    let program = b.program(vec![block]);
    let mut graph = bind_program(&program, &types).graph;
    graph.node_scope_ids.remove(&block_id);

    let err = check_program(&program, &mut graph, &types, &CheckerOptions::default())
        .unwrap_err();
    assert!(err.is_internal());
    assert!(matches!(
        err,
        CheckError::MissingScope {
            node: "BlockStatement",
            ..
        }
    ));
}

#[test]
fn recursion_limit_is_a_statement_error() {
    init_tracing();
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let mut expr = b.num(0.0);
    for _ in 0..20 {
        expr = b.unary("-", expr);
    }
    let deep = b.expr_stmt(expr);
    let two = b.num(2.0);
    let shallow_expr = b.unary("~", two);
    let shallow = b.expr_stmt(shallow_expr);
    let program = b.program(vec![deep, shallow]);
    let options = CheckerOptions {
        max_depth: 10,
        ..CheckerOptions::default()
    };

    let (graph, result) = bind_and_check(&program, &types, &options).expect("check");
    assert_eq!(result.codes(), vec![diagnostic_codes::EXPRESSION_TOO_DEEP]);
    let operators: Vec<&str> = graph
        .scope(graph.module_scope())
        .calls
        .iter()
        .map(|c| c.operator.as_str())
        .collect();
    assert_eq!(operators, vec!["~"]);
}

#[test]
fn deep_blocks_report_the_nesting_limit_once() {
    init_tracing();
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let one = b.num(1.0);
    let neg = b.unary("-", one);
    let mut stmt = b.expr_stmt(neg);
    let mut spans = Vec::new();
    for _ in 0..600 {
        stmt = b.block(vec![stmt]);
        spans.push(stmt.span);
    }
    let two = b.num(2.0);
    let not = b.unary("~", two);
    let after = b.expr_stmt(not);
    let program = b.program(vec![stmt, after]);

    let (graph, result) =
        bind_and_check(&program, &types, &CheckerOptions::default()).expect("check");
    assert_eq!(result.codes(), vec![diagnostic_codes::EXPRESSION_TOO_DEEP]);
    // Innermost first: the 501st block from the outside is where both passes stop.
    let skipped = spans[600 - 501];
    assert_eq!(
        (result.diagnostics[0].start, result.diagnostics[0].length),
        (skipped.start, skipped.len())
    );
    let operators: Vec<&str> = graph.calls().map(|(_, c)| c.operator.as_str()).collect();
    assert_eq!(operators, vec!["~"]);
}

#[test]
fn shallow_nesting_is_checked_in_full() {
    init_tracing();
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let one = b.num(1.0);
    let neg = b.unary("-", one);
    let mut stmt = b.expr_stmt(neg);
    for _ in 0..250 {
        stmt = b.block(vec![stmt]);
    }
    let program = b.program(vec![stmt]);

    let (graph, result) =
        bind_and_check(&program, &types, &CheckerOptions::default()).expect("check");
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(graph.calls().count(), 1);
}

#[test]
fn deep_arrows_stop_at_the_nesting_limit() {
    init_tracing();
    let types = TypeInterner::new();
    let mut b = AstBuilder::new();
    let mut expr = b.num(1.0);
    for _ in 0..2000 {
        expr = b.arrow(vec![], None, expr);
    }
    let stmt = b.expr_stmt(expr);
    let program = b.program(vec![stmt]);

    let bound = bind_program(&program, &types);
    assert!(matches!(
        bound.errors.as_slice(),
        [ScopeError::TooDeep {
            limit: MAX_STATEMENT_DEPTH,
            ..
        }]
    ));

    let (_, result) =
        bind_and_check(&program, &types, &CheckerOptions::default()).expect("check");
    assert_eq!(result.codes(), vec![diagnostic_codes::EXPRESSION_TOO_DEEP]);
    assert_eq!(result.diagnostics[0].start, bound.errors[0].span().start);
}
