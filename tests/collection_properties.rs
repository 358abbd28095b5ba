// コレクションの性質テスト
//
// 遅延評価・キーの扱い・集合演算などの公開APIの振る舞いを確認する

use qi_collection::{collection, Collection, ErrorCode, Key, Selector, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 列挙された要素数を数える遅延ソース
fn counted_source(n: i64, counter: Arc<AtomicUsize>) -> Collection {
    Collection::from_fn(move || {
        let counter = Arc::clone(&counter);
        (0..n).map(move |i| {
            counter.fetch_add(1, Ordering::SeqCst);
            (Key::Int(i), Value::Integer(i))
        })
    })
}

fn int(v: &Value) -> i64 {
    match v {
        Value::Integer(n) => *n,
        _ => 0,
    }
}

// ========================================
// 遅延評価
// ========================================

#[test]
fn test_lazy_chain_does_no_work_until_enumerated() {
    let counter = Arc::new(AtomicUsize::new(0));
    let chain = counted_source(1000, Arc::clone(&counter))
        .map(|v, _| Ok(Value::Integer(int(v) * 2)))
        .filter(|v, _| Ok(int(v) % 3 == 0));

    assert_eq!(counter.load(Ordering::SeqCst), 0);
    drop(chain);
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[test]
fn test_lazy_chain_reads_only_what_it_needs() {
    let counter = Arc::new(AtomicUsize::new(0));
    let first_five = counted_source(1_000_000, Arc::clone(&counter))
        .map(|v, _| Ok(Value::Integer(int(v) + 1)))
        .take(5);

    assert_eq!(first_five, collection![1, 2, 3, 4, 5]);
    assert_eq!(counter.load(Ordering::SeqCst), 5);
}

#[test]
fn test_first_stops_early() {
    let counter = Arc::new(AtomicUsize::new(0));
    let source = counted_source(100, Arc::clone(&counter));
    let found = source
        .first_matching(|v, _| Ok(int(v) == 3), None)
        .unwrap();
    assert_eq!(found, Value::Integer(3));
    assert_eq!(counter.load(Ordering::SeqCst), 4);
}

#[test]
fn test_concat_reads_second_only_when_reached() {
    let left = Arc::new(AtomicUsize::new(0));
    let right = Arc::new(AtomicUsize::new(0));
    let joined = counted_source(1000, Arc::clone(&left))
        .concat(counted_source(1000, Arc::clone(&right)));

    assert_eq!(joined.take(3), collection![0, 1, 2]);
    assert_eq!(left.load(Ordering::SeqCst), 3);
    assert_eq!(right.load(Ordering::SeqCst), 0);

    left.store(0, Ordering::SeqCst);
    let short =
        counted_source(2, Arc::clone(&left)).concat(counted_source(1000, Arc::clone(&right)));
    assert_eq!(short.take(3), collection![0, 1, 0]);
    assert_eq!(left.load(Ordering::SeqCst), 2);
    assert_eq!(right.load(Ordering::SeqCst), 1);
}

#[test]
fn test_flatten_reads_nested_lazily() {
    let outer = Arc::new(AtomicUsize::new(0));
    let inner = Arc::new(AtomicUsize::new(0));
    let (outer_count, inner_count) = (Arc::clone(&outer), Arc::clone(&inner));
    let nested = Collection::from_fn(move || {
        let outer_count = Arc::clone(&outer_count);
        let inner_count = Arc::clone(&inner_count);
        (0..1000).map(move |i| {
            outer_count.fetch_add(1, Ordering::SeqCst);
            let row = counted_source(1000, Arc::clone(&inner_count));
            (Key::Int(i), Value::from(row))
        })
    });

    let head = nested.flatten(-1).unwrap().take(2);
    assert_eq!(outer.load(Ordering::SeqCst), 0);
    assert_eq!(head, collection![0, 1]);
    assert_eq!(outer.load(Ordering::SeqCst), 1);
    assert_eq!(inner.load(Ordering::SeqCst), 2);
}

#[test]
fn test_per_item_transforms_read_only_what_they_need() {
    let counter = Arc::new(AtomicUsize::new(0));
    let source = counted_source(1000, Arc::clone(&counter));
    let cases: Vec<(&str, Collection)> = vec![
        ("extract", source.extract(Selector::Identity)),
        (
            "index_by",
            source.index_by(Selector::by(|v, _| Ok(Value::Integer(int(v) * 10)))),
        ),
        ("flip", source.flip()),
        ("distinct", source.distinct()),
    ];

    for (name, lazy) in cases {
        counter.store(0, Ordering::SeqCst);
        assert_eq!(lazy.take(3).count().unwrap(), 3, "{}", name);
        assert_eq!(counter.load(Ordering::SeqCst), 3, "{} reads", name);
    }
}

#[test]
fn test_slice_and_nth_stop_early() {
    let counter = Arc::new(AtomicUsize::new(0));
    let source = counted_source(1000, Arc::clone(&counter));

    let window = source.slice(2, Some(2));
    assert_eq!(counter.load(Ordering::SeqCst), 0);
    assert_eq!(window.to_values().unwrap(), vec![Value::Integer(2), Value::Integer(3)]);
    assert_eq!(counter.load(Ordering::SeqCst), 4);

    counter.store(0, Ordering::SeqCst);
    let every_other = source.nth(2, 0).unwrap().take(2);
    assert_eq!(every_other.to_values().unwrap(), vec![Value::Integer(0), Value::Integer(2)]);
    assert_eq!(counter.load(Ordering::SeqCst), 3);
}

#[test]
fn test_diff_and_intersect_defer_receiver() {
    let counter = Arc::new(AtomicUsize::new(0));
    let source = counted_source(10, Arc::clone(&counter));

    let diff = source.diff(collection![1, 2]);
    let intersect = source.intersect(collection![1, 2]);
    assert_eq!(counter.load(Ordering::SeqCst), 0);

    assert_eq!(intersect.take(1).to_values().unwrap(), vec![Value::Integer(1)]);
    assert_eq!(counter.load(Ordering::SeqCst), 2);
    assert_eq!(diff.count().unwrap(), 8);
}

#[test]
fn test_reiteration_restarts_source() {
    let counter = Arc::new(AtomicUsize::new(0));
    let source = counted_source(3, Arc::clone(&counter));
    assert_eq!(source.count().unwrap(), 3);
    assert_eq!(source.count().unwrap(), 3);
    assert_eq!(counter.load(Ordering::SeqCst), 6);
}

#[test]
fn test_error_surfaces_at_failing_item() {
    let c = collection![1, 2, 0, 4].map(|v, _| {
        if int(v) == 0 {
            Err(qi_collection::CollectionError::new(
                ErrorCode::InvalidArgument,
                "zero",
            ))
        } else {
            Ok(Value::Integer(10 / int(v)))
        }
    });

    let mut iter = c.iter();
    assert!(iter.next().unwrap().is_ok());
    assert!(iter.next().unwrap().is_ok());
    assert!(iter.next().unwrap().is_err());

    // 失敗より前で止まる操作は成功する
    assert_eq!(c.take(2).count().unwrap(), 2);
    assert!(c.to_array().is_err());
}

// ========================================
// 性質
// ========================================

#[test]
fn test_reverse_is_involution() {
    let c = collection! {"a" => 1, "b" => 2, "c" => 3};
    let twice = c.reverse().unwrap().reverse().unwrap();
    assert_eq!(twice.to_pairs().unwrap(), c.to_pairs().unwrap());
}

#[test]
fn test_to_array_matches_lazy_last_write_wins() {
    let c = collection![1, 2, 3, 4, 5]
        .index_by(Selector::by(|v, _| Ok(Value::Integer(int(v) % 2))));
    let array = c.to_array().unwrap();

    let mut expected: Vec<(Key, Value)> = Vec::new();
    for pair in c.iter() {
        let (k, v) = pair.unwrap();
        match expected.iter_mut().find(|(ek, _)| *ek == k) {
            Some(entry) => entry.1 = v,
            None => expected.push((k, v)),
        }
    }

    let actual: Vec<(Key, Value)> = array.iter().cloned().collect();
    assert_eq!(actual, expected);
    assert_eq!(array.get(&Key::Int(1)), Some(&Value::Integer(5)));
}

#[test]
fn test_map_fusion() {
    let c = collection! {"x" => 1, "y" => 2, "z" => 3};
    let f = |v: &Value, _: &Key| Ok(Value::Integer(int(v) + 1));
    let g = |v: &Value, _: &Key| Ok(Value::Integer(int(v) * 10));

    let chained = c.map(f).map(g);
    let fused = c.map(move |v, k| g(&f(v, k)?, k));
    assert_eq!(chained, fused);
}

#[test]
fn test_chunk_concatenation_reproduces_source() {
    let c = Collection::from_values(0..17);
    for size in 1..=20 {
        let parts = c.chunk(size, true).unwrap();
        let rebuilt: Vec<(Key, Value)> = parts
            .iter()
            .flat_map(|part| part.to_pairs().unwrap())
            .collect();
        assert_eq!(rebuilt, c.to_pairs().unwrap(), "chunk size {}", size);
    }
}

#[test]
fn test_diff_and_intersect_are_complements() {
    let c = collection![1, 2.0, "3", 4, 5, 2];
    let other = collection![2, "3", 5.0, 7];

    let diff = c.diff(&other).to_pairs().unwrap();
    let intersect = c.intersect(&other).to_pairs().unwrap();

    assert_eq!(
        diff.iter().map(|(_, v)| v.clone()).collect::<Vec<_>>(),
        vec![Value::Integer(1), Value::Float(2.0), Value::Integer(4), Value::Integer(5)]
    );
    assert_eq!(diff.len() + intersect.len(), c.count().unwrap());
    for (k, v) in &intersect {
        assert!(other.contains(v).unwrap());
        assert!(!diff.iter().any(|(dk, _)| dk == k));
    }
}

// ========================================
// シナリオ
// ========================================

#[test]
fn test_sort_with_renumbers_keys() {
    let sorted = collection![3, 1, 2]
        .sort_with(|a, b| Ok(Value::Integer(int(a) - int(b))))
        .unwrap();
    assert_eq!(
        sorted.to_pairs().unwrap(),
        vec![
            (Key::Int(0), Value::Integer(1)),
            (Key::Int(1), Value::Integer(2)),
            (Key::Int(2), Value::Integer(3)),
        ]
    );
}

#[test]
fn test_avg_of_empty_is_error() {
    let err = Collection::new().avg().unwrap_err();
    assert_eq!(err.code(), ErrorCode::EmptyCollection);
}

#[test]
fn test_merge_string_keys() {
    let merged = collection! {"a" => 1, "b" => 2}
        .merge(collection! {"a" => 9, "c" => 3})
        .unwrap();
    assert_eq!(merged, collection! {"a" => 9, "b" => 2, "c" => 3});
}

#[test]
fn test_median_even() {
    assert_eq!(collection![1, 2, 3, 4].median().unwrap(), Value::Float(2.5));
}

#[test]
fn test_zip_stops_at_shorter() {
    let zipped = collection![1, 2].zip(collection![10, 20, 30]);
    assert_eq!(
        zipped,
        Collection::from_values(vec![Value::from(vec![1, 10]), Value::from(vec![2, 20])])
    );
}

#[test]
fn test_pipeline_over_records() {
    let people = Collection::from_values(vec![
        Value::from(collection! {"name" => "ann", "team" => "red", "score" => 7}),
        Value::from(collection! {"name" => "bob", "team" => "blue", "score" => 3}),
        Value::from(collection! {"name" => "cid", "team" => "red", "score" => 5}),
    ]);

    let by_team = people.group_by("team").unwrap();
    let red = by_team.get(&Key::from("red"), Value::Nil).unwrap();
    let red = red.as_collection().unwrap();
    assert_eq!(red.sum_by("score").unwrap(), Value::Integer(12));

    let best = people.max_by("score").unwrap();
    assert_eq!(
        Selector::from("name").resolve(&best, &Key::Int(0)).unwrap(),
        Value::from("ann")
    );

    let names = people.sort_by("score").unwrap().extract("name");
    assert_eq!(names, collection!["bob", "cid", "ann"]);

    assert_eq!(
        people.count_by("team").unwrap(),
        collection! {"red" => 2, "blue" => 1}
    );
}

#[test]
fn test_to_array_unique_rejects_duplicates() {
    let c = collection!["a", "b"].flip();
    assert!(c.to_array_unique().is_ok());

    let dup = collection![1, 1].flip();
    assert_eq!(
        dup.to_array_unique().unwrap_err().code(),
        ErrorCode::DuplicateKey
    );
    assert_eq!(dup.to_array().unwrap().len(), 1);
}

#[test]
fn test_collections_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Collection>();
    assert_send_sync::<Value>();
}
