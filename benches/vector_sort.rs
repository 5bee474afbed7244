use criterion::{criterion_group, criterion_main, Bencher, BenchmarkId, Criterion, Throughput};
use once_cell::sync::Lazy;
use rand::Rng;

use bedrock::vector::SortAlgorithm;
use bedrock::Vector;

const SIZES: [usize; 3] = [128, 1024, 8192];

static UNSORTED: Lazy<Vec<i64>> = Lazy::new(|| {
    let mut rng = rand::thread_rng();
    let max = *SIZES.iter().max().unwrap();
    (0..max).map(|_| rng.gen_range(0, i64::MAX)).collect()
});

static SORTED: Lazy<Vec<i64>> = Lazy::new(|| {
    let mut v = UNSORTED.clone();
    v.sort();
    v
});

fn vector_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("vector_sort");

    for &size in SIZES.iter() {
        group.throughput(Throughput::Elements(size as u64));

        for algorithm in [
            SortAlgorithm::Quick,
            SortAlgorithm::QuickRandom,
            SortAlgorithm::QuickMedian,
            SortAlgorithm::Heap,
        ] {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?} random", algorithm), size),
                &size,
                |b, &size| sort_random(b, size, algorithm),
            );
            group.bench_with_input(
                BenchmarkId::new(format!("{:?} presorted", algorithm), size),
                &size,
                |b, &size| sort_presorted(b, size, algorithm),
            );
        }

        group.bench_with_input(BenchmarkId::new("search", size), &size, |b, &size| {
            search(b, size)
        });
    }

    group.finish()
}

fn sort_random(b: &mut Bencher, size: usize, algorithm: SortAlgorithm) {
    let source = &UNSORTED[..size];
    b.iter(|| {
        let mut v: Vector<i64> = source.iter().copied().collect();
        v.sort(algorithm);
    });
}

/// Already-sorted input is the worst case for a fixed-pivot quicksort, so
/// it's worth tracking separately from the random-input numbers above.
fn sort_presorted(b: &mut Bencher, size: usize, algorithm: SortAlgorithm) {
    let source = &SORTED[..size];
    b.iter(|| {
        let mut v: Vector<i64> = source.iter().copied().collect();
        v.sort(algorithm);
    });
}

fn search(b: &mut Bencher, size: usize) {
    let source = &SORTED[..size];
    let v: Vector<i64> = source.iter().copied().collect();
    b.iter(|| {
        for key in source.iter().step_by((size / 32).max(1)) {
            assert!(v.search(key).is_some());
        }
    });
}

criterion_group!(benches, vector_sort);
criterion_main!(benches);
