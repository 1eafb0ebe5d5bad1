use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use roll_intel::{
    analysis::analyze, core::rng::ProvablyFairRoller, Entitlement, OutcomePredictor, RollConfig,
    RollHistory,
};

fn setup_history(size: usize) -> RollHistory {
    let config = RollConfig::default();
    let mut roller = ProvablyFairRoller::new("bench", "bench-client", 0);
    let mut history = RollHistory::new();
    for _ in 0..size {
        let roll = roller.next_roll(&config).expect("roll");
        history.push_roll(roll, &config).expect("push");
    }
    history
}

fn forecasting(c: &mut Criterion) {
    let mut group = c.benchmark_group("forecasting");
    let config = RollConfig::default();
    let predictor = OutcomePredictor::default();

    for size in [50usize, 500, 5_000] {
        let history = setup_history(size);

        group.bench_function(BenchmarkId::new("analyze", size), |b| {
            b.iter(|| black_box(analyze(history.snapshot(), size, &config)))
        });

        group.bench_function(BenchmarkId::new("predict_free", size), |b| {
            b.iter(|| black_box(predictor.predict(history.snapshot(), Entitlement::FREE)))
        });

        group.bench_function(BenchmarkId::new("predict_pro", size), |b| {
            b.iter(|| black_box(predictor.predict(history.snapshot(), Entitlement::PRO)))
        });
    }
    group.finish();
}

fn derivation(c: &mut Criterion) {
    let config = RollConfig::default();
    c.bench_function("derive_roll", |b| {
        let mut nonce = 0u64;
        b.iter(|| {
            nonce += 1;
            black_box(roll_intel::derive_roll("abc123", "xyz", nonce, &config))
        })
    });
}

criterion_group!(benches, forecasting, derivation);
criterion_main!(benches);
