use criterion::{black_box, criterion_group, criterion_main, Criterion};
use qi_collection::{Collection, Key, Selector, Value};

/// コレクション操作のベンチマーク
///
/// 10,000-100,000要素で遅延パイプラインと実体化のコストを測定

fn numbers(n: i64) -> Collection {
    Collection::from_values(0..n)
}

fn int(v: &Value) -> i64 {
    match v {
        Value::Integer(n) => *n,
        _ => 0,
    }
}

fn bench_lazy_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("lazy_pipeline");

    group.bench_function("map_filter_sum_10k", |b| {
        let source = numbers(10_000);
        b.iter(|| {
            let total = source
                .map(|v, _| Ok(Value::Integer(int(v) * 2)))
                .filter(|v, _| Ok(int(v) % 3 == 0))
                .sum()
                .unwrap();
            black_box(total);
        });
    });

    group.bench_function("take_10_of_100k", |b| {
        let source = numbers(100_000);
        b.iter(|| {
            let head = source
                .map(|v, _| Ok(Value::Integer(int(v) + 1)))
                .take(10)
                .to_values()
                .unwrap();
            black_box(head);
        });
    });

    group.finish();
}

fn bench_materialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("materialize");

    group.bench_function("to_array_10k", |b| {
        let source = numbers(10_000).map(|v, _| Ok(v.clone()));
        b.iter(|| black_box(source.to_array().unwrap()));
    });

    group.bench_function("sort_10k", |b| {
        let source = Collection::from_values((0..10_000i64).rev());
        b.iter(|| black_box(source.sort().unwrap()));
    });

    group.bench_function("group_by_10k", |b| {
        let source = numbers(10_000);
        let selector = Selector::by(|v, _| Ok(Value::Integer(int(v) % 10)));
        b.iter(|| black_box(source.group_by(selector.clone()).unwrap()));
    });

    group.finish();
}

fn bench_set_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_ops");

    group.bench_function("diff_10k", |b| {
        let left = numbers(10_000);
        let right = Collection::from_values((0..10_000i64).step_by(2));
        b.iter(|| black_box(left.diff(&right).count().unwrap()));
    });

    group.bench_function("distinct_10k", |b| {
        let source = Collection::from_values((0..10_000i64).map(|i| i % 100));
        b.iter(|| black_box(source.distinct().count().unwrap()));
    });

    group.bench_function("index_by_10k", |b| {
        let source = numbers(10_000);
        b.iter(|| {
            let indexed = source
                .index_by(Selector::by(|v, _| Ok(Value::from(format!("k{}", int(v))))))
                .to_array()
                .unwrap();
            black_box(indexed.get(&Key::from("k42")).cloned());
        });
    });

    group.finish();
}

fn bench_mutation(c: &mut Criterion) {
    c.bench_function("push_1k", |b| {
        b.iter(|| {
            let mut c = Collection::new();
            for i in 0..1_000 {
                c.push(i).unwrap();
            }
            black_box(c);
        });
    });
}

criterion_group!(
    benches,
    bench_lazy_pipeline,
    bench_materialize,
    bench_set_ops,
    bench_mutation
);
criterion_main!(benches);
