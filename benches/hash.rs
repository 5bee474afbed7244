use criterion::{criterion_group, criterion_main, Bencher, BenchmarkId, Criterion, Throughput};
use itertools::Itertools;
use once_cell::sync::Lazy;
use rand::Rng;

use bedrock::config::{GrowthPolicy, HashTableConfig};
use bedrock::HashTable;

const INITIAL_BUCKETS: [usize; 3] = [512, 4096, 10024];
const TOTAL_KEYS: u64 = 10000;
const TOTAL_OPERATIONS: u64 = 1000;

static RANDOM_KEYS: Lazy<Vec<u64>> = Lazy::new(|| {
    let mut rng = rand::thread_rng();
    let mut keys = Vec::with_capacity(TOTAL_OPERATIONS as usize);
    for _ in 0..TOTAL_OPERATIONS {
        keys.push(rng.gen_range(0, TOTAL_KEYS));
    }
    keys
});

fn hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash");
    group.throughput(Throughput::Elements(TOTAL_OPERATIONS));

    for &initial_buckets in INITIAL_BUCKETS.iter() {
        let description = format!("initial_buckets: {}", initial_buckets);

        group.bench_with_input(
            BenchmarkId::new("Insert", description.clone()),
            &initial_buckets,
            |b, &initial_buckets| insert(b, initial_buckets),
        );

        group.bench_with_input(
            BenchmarkId::new("Random Get", description.clone()),
            &initial_buckets,
            |b, &initial_buckets| random_get(b, initial_buckets),
        );

        group.bench_with_input(
            BenchmarkId::new("Erase then Reinsert", description.clone()),
            &initial_buckets,
            |b, &initial_buckets| erase_reinsert(b, initial_buckets),
        );
    }

    for input in [(9usize, 2048usize), (23, 2048), (12, 8192)]
        .iter()
        .cartesian_product([0].iter())
    {
        let ((resize_to, initial), _) = input;
        group.bench_with_input(
            BenchmarkId::new("Incremental Rehash", format!("{} -> {}", initial, resize_to)),
            &(*initial, *resize_to),
            |b, &(initial, resize_to)| rehash(b, initial, resize_to),
        );
    }

    group.finish()
}

fn fresh_table(initial_buckets: usize) -> HashTable<u64, u64> {
    HashTable::with_config(HashTableConfig::new(initial_buckets, GrowthPolicy::Doubling))
}

fn insert(b: &mut Bencher, initial_buckets: usize) {
    b.iter(|| {
        let mut table = fresh_table(initial_buckets);
        for &k in RANDOM_KEYS.iter() {
            table.insert(k, k * k);
        }
    });
}

fn random_get(b: &mut Bencher, initial_buckets: usize) {
    let mut table = fresh_table(initial_buckets);
    for i in 0..TOTAL_KEYS {
        table.insert(i, i * i);
    }
    b.iter(|| {
        for &k in RANDOM_KEYS.iter() {
            assert!(table.find(&k).is_some());
        }
    });
}

fn erase_reinsert(b: &mut Bencher, initial_buckets: usize) {
    let mut table = fresh_table(initial_buckets);
    for i in 0..TOTAL_KEYS {
        table.insert(i, i);
    }
    b.iter(|| {
        for &k in RANDOM_KEYS.iter() {
            table.erase(&k);
            table.insert(k, k);
        }
    });
}

fn rehash(b: &mut Bencher, initial_buckets: usize, resize_to: usize) {
    b.iter(|| {
        let mut table = fresh_table(initial_buckets);
        for i in 0..TOTAL_KEYS {
            table.insert(i, i);
        }
        table.resize(resize_to, None);
        for &k in RANDOM_KEYS.iter() {
            let _ = table.find(&k);
        }
        table.rehash();
    });
}

criterion_group!(benches, hash);
criterion_main!(benches);
