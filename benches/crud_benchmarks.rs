use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use degree_btree::BTree;
use std::collections::BTreeSet;

const N: usize = 10_000;

/// Minimum degrees compared in every group.
const DEGREES: [usize; 3] = [2, 6, 32];

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn reverse_ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).rev().collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

fn build(degree: usize, keys: &[i64]) -> BTree<i64> {
    let mut tree = BTree::new(degree).unwrap();
    tree.extend(keys.iter().copied());
    tree
}

// ─── Benchmarks ─────────────────────────────────────────────────────────────

fn bench_insert(c: &mut Criterion, name: &str, keys: &[i64]) {
    let mut group = c.benchmark_group(name);

    for degree in DEGREES {
        group.bench_function(BenchmarkId::new("BTree", degree), |b| {
            b.iter(|| build(degree, keys));
        });
    }

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| keys.iter().copied().collect::<BTreeSet<i64>>());
    });

    group.finish();
}

fn bench_search(c: &mut Criterion, name: &str, keys: &[i64]) {
    let mut group = c.benchmark_group(name);

    for degree in DEGREES {
        let tree = build(degree, keys);
        group.bench_function(BenchmarkId::new("BTree", degree), |b| {
            b.iter(|| keys.iter().filter(|k| tree.search(*k).is_some()).count());
        });
    }

    let set: BTreeSet<i64> = keys.iter().copied().collect();
    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| keys.iter().filter(|k| set.contains(*k)).count());
    });

    group.finish();
}

fn bench_erase(c: &mut Criterion, name: &str, keys: &[i64]) {
    let mut group = c.benchmark_group(name);

    for degree in DEGREES {
        let tree = build(degree, keys);
        group.bench_function(BenchmarkId::new("BTree", degree), |b| {
            b.iter(|| {
                let mut tree = tree.clone();
                for k in keys {
                    tree.erase(k);
                }
                tree
            });
        });
    }

    let set: BTreeSet<i64> = keys.iter().copied().collect();
    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut set = set.clone();
            for k in keys {
                set.remove(k);
            }
            set
        });
    });

    group.finish();
}

fn bench_traverse(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("traverse_random");

    for degree in DEGREES {
        let tree = build(degree, &keys);
        group.bench_function(BenchmarkId::new("BTree", degree), |b| {
            b.iter(|| tree.traverse().len());
        });
    }

    group.finish();
}

fn insert_benches(c: &mut Criterion) {
    bench_insert(c, "insert_ordered", &ordered_keys(N));
    bench_insert(c, "insert_reverse", &reverse_ordered_keys(N));
    bench_insert(c, "insert_random", &random_keys(N));
}

fn search_benches(c: &mut Criterion) {
    bench_search(c, "search_ordered", &ordered_keys(N));
    bench_search(c, "search_random", &random_keys(N));
}

fn erase_benches(c: &mut Criterion) {
    bench_erase(c, "erase_ordered", &ordered_keys(N));
    bench_erase(c, "erase_reverse", &reverse_ordered_keys(N));
    bench_erase(c, "erase_random", &random_keys(N));
}

criterion_group!(crud_benches, insert_benches, search_benches, erase_benches, bench_traverse);

criterion_main!(crud_benches);
