//! Join and fact-layer benchmarks using Criterion.
//!
//! Run with: `cargo bench`
//!
//! - Hash join on a shared key, value-owned and shared flavors
//! - Cross product (no shared variable)
//! - Projected join that keeps one column
//! - Fact layers over a grid of roads

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use relground::{
    config::FactLayerConfig,
    fact_layer::run_fact_layers,
    grounder::Grounder,
    join::{hash_join, hash_join_projected},
    model::{Argument, Atom, Parameter},
    table::{SharedTable, Table},
    task::{Task, TaskBuilder},
    tuple::{ObjectId, SharedTuple, Tuple},
};

/// `rows` pairs `(i, i % fanout)`.
fn pairs(rows: u32, fanout: u32) -> Vec<[ObjectId; 2]> {
    (0..rows).map(|i| [i, i % fanout]).collect()
}

fn owned(index: [i32; 2], rows: &[[ObjectId; 2]]) -> Table {
    Table::new(
        rows.iter().map(|r| Tuple::from_slice(r)).collect(),
        index.to_vec(),
    )
}

fn shared(index: [i32; 2], rows: &[[ObjectId; 2]]) -> SharedTable {
    SharedTable::new(
        rows.iter().map(|r| SharedTuple::new(r)).collect(),
        index.to_vec(),
    )
}

fn bench_keyed_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyed_join");
    for rows in [100u32, 1_000, 10_000] {
        // x -> y on the left, z -> y on the right, joined on y.
        let left = pairs(rows, 64);
        let right = pairs(rows, 64);
        let (a, b) = (owned([0, 1], &left), owned([2, 1], &right));
        let (sa, sb) = (shared([0, 1], &left), shared([2, 1], &right));

        group.bench_with_input(BenchmarkId::new("owned", rows), &rows, |bench, _| {
            bench.iter(|| hash_join(black_box(&a), black_box(&b)))
        });
        group.bench_with_input(BenchmarkId::new("projected", rows), &rows, |bench, _| {
            bench.iter(|| hash_join_projected(black_box(&sa), black_box(&sb), &[0]))
        });
    }
    group.finish();
}

fn bench_cross_product(c: &mut Criterion) {
    let mut group = c.benchmark_group("cross_product");
    for rows in [10u32, 100, 300] {
        let left = pairs(rows, 7);
        let right = pairs(rows, 5);
        let (a, b) = (owned([0, 1], &left), owned([2, 3], &right));

        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |bench, _| {
            bench.iter(|| hash_join(black_box(&a), black_box(&b)))
        });
    }
    group.finish();
}

/// A truck on an `n x n` grid with roads to the right and downward.
fn grid_task(n: u32) -> Task {
    let mut b = TaskBuilder::new();
    let truck = b.add_type("truck").unwrap();
    let location = b.add_type("location").unwrap();
    let t = b.add_object("t", &[truck]).unwrap();
    let cell = |r: u32, c: u32| 1 + r * n + c;
    for r in 0..n {
        for c in 0..n {
            b.add_object(&format!("l{r}_{c}"), &[location]).unwrap();
        }
    }
    let road = b.add_predicate("road", 2).unwrap();
    let at = b.add_predicate("at", 2).unwrap();

    let param = |name: &str, ty| Parameter {
        name: name.into(),
        ty,
    };
    let p = Argument::Parameter;
    b.add_action(
        "drive",
        vec![
            param("?t", truck),
            param("?from", location),
            param("?to", location),
        ],
        vec![
            Atom::new(at, [p(0), p(1)]),
            Atom::new(road, [p(1), p(2)]),
        ],
        vec![
            Atom::new(at, [p(0), p(2)]),
            Atom::negated(at, [p(0), p(1)]),
        ],
        1,
    )
    .unwrap();

    for r in 0..n {
        for c in 0..n {
            if c + 1 < n {
                b.add_fact(road, &[cell(r, c), cell(r, c + 1)]);
            }
            if r + 1 < n {
                b.add_fact(road, &[cell(r, c), cell(r + 1, c)]);
            }
        }
    }
    b.add_fact(at, &[t, cell(0, 0)]);
    b.add_goal(at, &[t, cell(n - 1, n - 1)], false);
    b.build().unwrap()
}

fn bench_fact_layers(c: &mut Criterion) {
    let mut group = c.benchmark_group("fact_layers");
    for n in [4u32, 8, 16] {
        let task = grid_task(n);
        let grounder = Grounder::new(&task).unwrap();
        let config = FactLayerConfig::saturate();

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bench, _| {
            bench.iter(|| {
                run_fact_layers(
                    black_box(&grounder),
                    task.initial_state(),
                    task.goal(),
                    &config,
                )
                .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_keyed_join,
    bench_cross_product,
    bench_fact_layers
);
criterion_main!(benches);
