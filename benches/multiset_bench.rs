use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use multibag::Multiset;
use std::collections::BTreeMap;
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

// 1k distinct keys so that most inserts hit an existing element.
fn key(n: u64) -> String {
    format!("k{:04}", (n >> 33) % 1_000)
}

fn filled(seed: u64, n: usize) -> Multiset<String> {
    lcg(seed).take(n).map(key).collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiset::insert");
    group.throughput(Throughput::Elements(10_000));
    group.bench_function("hashed_10k", |b| {
        b.iter_batched(
            Multiset::<String>::new,
            |mut ms| {
                for x in lcg(1).take(10_000) {
                    ms.insert(key(x)).unwrap();
                }
                black_box(ms)
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function("ordered_10k", |b| {
        b.iter_batched(
            Multiset::<String, BTreeMap<String, usize>>::default,
            |mut ms| {
                for x in lcg(1).take(10_000) {
                    ms.insert(key(x)).unwrap();
                }
                black_box(ms)
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function("collect_10k", |b| {
        b.iter(|| black_box(filled(1, 10_000)))
    });
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    c.bench_function("multiset_multiplicity_hit", |b| {
        let ms = filled(7, 20_000);
        let keys: Vec<_> = lcg(7).take(20_000).map(key).collect();
        let mut i = 0usize;
        b.iter(|| {
            let k = &keys[i % keys.len()];
            i = i.wrapping_add(1);
            black_box(ms.multiplicity(k))
        })
    });
    c.bench_function("multiset_multiplicity_miss", |b| {
        let ms = filled(11, 10_000);
        let mut miss = lcg(0xdead_beef).map(|x| format!("m{x:x}"));
        b.iter(|| {
            let k = miss.next().unwrap_or_default();
            black_box(ms.multiplicity(&k))
        })
    });
}

fn bench_algebra(c: &mut Criterion) {
    let a = filled(3, 20_000);
    let b_set = filled(5, 20_000);
    let mut group = c.benchmark_group("multiset::algebra");
    group.bench_function("union", |b| b.iter(|| black_box(a.union(&b_set))));
    group.bench_function("intersect", |b| b.iter(|| black_box(a.intersect(&b_set))));
    group.bench_function("minus", |b| b.iter(|| black_box(a.minus(&b_set))));
    group.bench_function("merge_max", |b| {
        b.iter(|| black_box(a.merge(&b_set, usize::max)))
    });
    group.finish();
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert, bench_lookup, bench_algebra
}
criterion_main!(benches);
