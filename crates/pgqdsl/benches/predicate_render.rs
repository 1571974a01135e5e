use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pgqdsl::qb::{Predicate, Statement, and, eq, in_list, or, raw, select};
use pgqdsl::{NamedArgs, Param, named_to_positional};

/// `n` OR groups of two comparisons, ANDed together.
fn nested_predicate(n: usize) -> Predicate {
    and((0..n).map(|i| {
        or(vec![
            eq(format!("a{i}"), i as i64),
            raw(format!("b{i} > $1 AND c{i} < $2"), pgqdsl::params![i as i64, (i * 2) as i64]),
        ])
    }))
}

fn bench_render_positional(c: &mut Criterion) {
    let mut group = c.benchmark_group("predicate/to_positional");

    for n in [1, 5, 10, 50, 100] {
        let pred = nested_predicate(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &pred, |b, pred| {
            b.iter(|| black_box(pred.to_positional(1)));
        });
    }

    group.finish();
}

fn bench_render_named(c: &mut Criterion) {
    let mut group = c.benchmark_group("predicate/to_named");

    for n in [1, 5, 10, 50, 100] {
        let pred = nested_predicate(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &pred, |b, pred| {
            b.iter(|| black_box(pred.to_named(0)));
        });
    }

    group.finish();
}

fn bench_select_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("select/build");

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        let stmt = select(["id", "name"])
            .from("users")
            .filter(in_list("id", values))
            .filter(eq("active", true))
            .order_by_desc("id")
            .limit(50);
        group.bench_with_input(BenchmarkId::from_parameter(n), &stmt, |b, stmt| {
            b.iter(|| black_box(stmt.build()));
        });
    }

    group.finish();
}

fn bench_bridge(c: &mut Criterion) {
    let mut group = c.benchmark_group("bridge/named_to_positional");

    for n in [5, 20, 100] {
        let sql = (0..n)
            .map(|i| format!("c{i} = @v{} OR d{i} = @v{}", i % 7, i % 7))
            .collect::<Vec<_>>()
            .join(" AND ");
        let args: NamedArgs = (0..7).map(|i| (format!("v{i}"), Param::new(i as i64))).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &(sql, args), |b, (sql, args)| {
            b.iter(|| black_box(named_to_positional(sql, args)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_render_positional,
    bench_render_named,
    bench_select_build,
    bench_bridge
);
criterion_main!(benches);
