use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pdokit::MySqlQuoter;
use pdokit::executor::to_positional;
use pdokit::matcher::Conditions;
use pdokit::osql::{self, Condition, ConditionGroup, Query, Select};

/// SELECT with `n` AND-ed equality conditions and one OR group.
fn build_select(n: usize) -> Select {
    let mut select = osql::select().from("t");
    for i in 0..n {
        select = select.where_(Condition::eq(format!("col{i}"), i as i64).unwrap());
    }
    let group = ConditionGroup::or()
        .with(Condition::lt("age", 18).unwrap())
        .with(Condition::in_list("id", (0..n as i64).collect::<Vec<_>>()).unwrap());
    select.and(group).limit(10).unwrap()
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("osql/render");

    for n in [1, 5, 10, 50, 100] {
        let select = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &select, |b, select| {
            b.iter(|| black_box(select.render().unwrap()));
        });
    }

    group.finish();
}

fn bench_to_positional(c: &mut Criterion) {
    let mut group = c.benchmark_group("executor/to_positional");

    for n in [1, 10, 100] {
        let stmt = build_select(n).render().unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &stmt, |b, stmt| {
            b.iter(|| black_box(to_positional(stmt).unwrap()));
        });
    }

    group.finish();
}

fn bench_matcher(c: &mut Criterion) {
    let mut group = c.benchmark_group("matcher/render");

    for n in [1, 10, 50] {
        let mut conds = Conditions::new();
        for i in 0..n {
            let value = match i % 4 {
                0 => "><1 & 5".to_string(),
                1 => format!(">= {i}"),
                2 => "!%%bot%".to_string(),
                _ => format!("name{i}"),
            };
            conds = conds.push(format!("col{i}"), value);
        }
        group.bench_with_input(BenchmarkId::from_parameter(n), &conds, |b, conds| {
            b.iter(|| black_box(conds.render(&MySqlQuoter).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_render, bench_to_positional, bench_matcher);
criterion_main!(benches);
