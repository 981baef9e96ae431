use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::Rng;
use stream_deduper_rs::{
    ClassicBloomConfigBuilder, Deduper, FilterFactory,
    InverseBloomConfigBuilder, StableBloomConfigBuilder,
};

fn classic_factory(capacity: usize) -> FilterFactory {
    ClassicBloomConfigBuilder::default()
        .capacity(capacity)
        .false_positive_rate(0.01)
        .build()
        .unwrap()
        .into_factory()
        .unwrap()
}

fn random_key(len: usize) -> Vec<u8> {
    let mut rng = rand::rng();
    (0..len).map(|_| rng.random()).collect()
}

// the hot path: duplicate arrives while its key is still in the current layer
fn bench_test_current_layer_hit(c: &mut Criterion) {
    let deduper = Deduper::new(10, classic_factory(100_000)).unwrap();
    let key = random_key(16);
    deduper.add(&key);

    c.bench_function("test/current_layer_hit", |b| {
        b.iter(|| deduper.test(std::hint::black_box(&key)))
    });
}

// worst case: absent key forces a full window scan
fn bench_test_full_window_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("test/full_window_miss");
    for layers in [1usize, 4, 16] {
        let deduper = Deduper::new(layers, classic_factory(100_000)).unwrap();
        let key = random_key(16);

        group.bench_with_input(
            BenchmarkId::from_parameter(layers),
            &layers,
            |b, _| b.iter(|| deduper.test(std::hint::black_box(&key))),
        );
    }
    group.finish();
}

fn bench_add(c: &mut Criterion) {
    let deduper = Deduper::new(10, classic_factory(1_000_000)).unwrap();
    let keys: Vec<Vec<u8>> = (0..1024).map(|_| random_key(16)).collect();
    let mut i = 0;

    c.bench_function("add", |b| {
        b.iter(|| {
            deduper.add(std::hint::black_box(&keys[i % keys.len()]));
            i += 1;
        })
    });
}

fn bench_try_insert_duplicate(c: &mut Criterion) {
    let deduper = Deduper::new(10, classic_factory(100_000)).unwrap();
    let key = random_key(16);
    deduper.add(&key);

    c.bench_function("try_insert/duplicate", |b| {
        b.iter(|| deduper.try_insert(std::hint::black_box(&key)))
    });
}

fn bench_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("cycle");

    let classic = Deduper::new(10, classic_factory(100_000)).unwrap();
    group.bench_function("classic", |b| b.iter(|| classic.cycle()));

    let inverse_factory = InverseBloomConfigBuilder::default()
        .capacity(100_000)
        .build()
        .unwrap()
        .into_factory()
        .unwrap();
    let inverse = Deduper::new(10, inverse_factory).unwrap();
    group.bench_function("inverse", |b| b.iter(|| inverse.cycle()));

    let stable_factory = StableBloomConfigBuilder::default()
        .num_cells(100_000)
        .false_positive_rate(0.01)
        .build()
        .unwrap()
        .into_factory()
        .unwrap();
    let stable = Deduper::new(10, stable_factory).unwrap();
    group.bench_function("stable", |b| b.iter(|| stable.cycle()));

    group.finish();
}

criterion_group!(
    benches,
    bench_test_current_layer_hit,
    bench_test_full_window_miss,
    bench_add,
    bench_try_insert_duplicate,
    bench_cycle,
);
criterion_main!(benches);
