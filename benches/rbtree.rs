use criterion::{criterion_group, criterion_main, Bencher, BenchmarkId, Criterion, Throughput};
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;

use bedrock::{BinaryHeap, RbTree};

const SIZES: [usize; 3] = [128, 1024, 8192];

static SHUFFLED: Lazy<Vec<i64>> = Lazy::new(|| {
    let max = *SIZES.iter().max().unwrap();
    let mut v: Vec<i64> = (0..max as i64).collect();
    v.shuffle(&mut rand::thread_rng());
    v
});

fn rbtree(c: &mut Criterion) {
    let mut group = c.benchmark_group("rbtree");

    for &size in SIZES.iter() {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("insert", size), &size, |b, &size| {
            insert(b, size)
        });
        group.bench_with_input(BenchmarkId::new("find", size), &size, |b, &size| {
            find(b, size)
        });
        group.bench_with_input(
            BenchmarkId::new("insert then erase all", size),
            &size,
            |b, &size| insert_erase(b, size),
        );
        group.bench_with_input(BenchmarkId::new("heap push/pop", size), &size, |b, &size| {
            heap_push_pop(b, size)
        });
    }

    group.finish()
}

fn insert(b: &mut Bencher, size: usize) {
    let values = &SHUFFLED[..size];
    b.iter(|| {
        let mut t = RbTree::new();
        for &v in values {
            t.insert(v);
        }
    });
}

fn find(b: &mut Bencher, size: usize) {
    let values = &SHUFFLED[..size];
    let t: RbTree<i64> = values.iter().copied().collect();
    b.iter(|| {
        for v in values {
            assert!(t.contains(v));
        }
    });
}

fn insert_erase(b: &mut Bencher, size: usize) {
    let values = &SHUFFLED[..size];
    b.iter(|| {
        let mut t: RbTree<i64> = values.iter().copied().collect();
        for v in values {
            t.erase(v);
        }
        assert!(t.is_empty());
    });
}

fn heap_push_pop(b: &mut Bencher, size: usize) {
    let values = &SHUFFLED[..size];
    b.iter(|| {
        let mut h: BinaryHeap<i64> = BinaryHeap::new();
        for &v in values {
            h.push(v);
        }
        while h.pop().is_some() {}
    });
}

criterion_group!(benches, rbtree);
criterion_main!(benches);
