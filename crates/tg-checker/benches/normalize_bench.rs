//! Normalizer benchmarks.
//!
//! Measures binding plus checking for deep expression chains and for long,
//! flat statement lists.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tg_ast::{AstBuilder, Program};
use tg_checker::{CheckerOptions, bind_and_check};
use tg_solver::TypeInterner;

/// `1 + 1 + ... + 1` nested `depth` levels deep.
fn binary_chain(depth: usize) -> Program {
    let mut b = AstBuilder::new();
    let mut expr = b.num(1.0);
    for _ in 0..depth {
        let one = b.num(1.0);
        expr = b.binary("+", expr, one);
    }
    let stmt = b.expr_stmt(expr);
    b.program(vec![stmt])
}

/// `let vN = N * 2; if (vN > 3) { vN = vN - 1; }` repeated.
fn flat_statements(count: usize) -> Program {
    let mut b = AstBuilder::new();
    let mut body = Vec::with_capacity(count * 2);
    for i in 0..count {
        let name = format!("v{i}");
        let n = b.num(i as f64);
        let two = b.num(2.0);
        let product = b.binary("*", n, two);
        body.push(b.let_decl(&name, None, Some(product)));
        b.newline();

        let left = b.ident(&name);
        let three = b.num(3.0);
        let test = b.binary(">", left, three);
        let target = b.ident(&name);
        let current = b.ident(&name);
        let one = b.num(1.0);
        let less = b.binary("-", current, one);
        let assign = b.assign("=", target, less);
        let stmt = b.expr_stmt(assign);
        let block = b.block(vec![stmt]);
        body.push(b.if_stmt(test, block, None));
        b.newline();
    }
    b.program(body)
}

fn bench_binary_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_binary_chain");

    for depth in [10, 100, 400] {
        let program = binary_chain(depth);
        group.bench_with_input(BenchmarkId::new("check", depth), &program, |b, program| {
            b.iter(|| {
                let types = TypeInterner::new();
                let (graph, result) =
                    bind_and_check(program, &types, &CheckerOptions::default())
                        .expect("bench program checks");
                black_box((graph.calls().count(), result.diagnostics.len()))
            })
        });
    }

    group.finish();
}

fn bench_flat_statements(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_statements");

    for count in [10, 100, 1000] {
        let program = flat_statements(count);
        group.bench_with_input(BenchmarkId::new("check", count), &program, |b, program| {
            b.iter(|| {
                let types = TypeInterner::new();
                let (graph, result) =
                    bind_and_check(program, &types, &CheckerOptions::default())
                        .expect("bench program checks");
                black_box((graph.calls().count(), result.diagnostics.len()))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_binary_chain, bench_flat_statements);
criterion_main!(benches);
