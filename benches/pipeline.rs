use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gyrosync::{cross_correlate, synchronize, Signal, SyncConfig};
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use rand_xoshiro::Xoshiro256PlusPlus;

/// A jittered-clock recording of band-limited motion plus Gaussian sensor
/// noise, `n` samples at a nominal 5 ms interval.
fn noisy_signal(n: usize, seed: u64) -> Signal {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut times = Vec::with_capacity(n);
    let mut t = 0.0;
    for _ in 0..n {
        times.push(t);
        t += 0.005 + rng.random_range(-0.001..0.001);
    }
    let values: Vec<f64> = times
        .iter()
        .map(|&t| {
            let noise: f64 = StandardNormal.sample(&mut rng);
            (t * 11.0).sin() + 0.4 * (t * 3.1 + 0.7).sin() + 0.01 * noise
        })
        .collect();
    Signal::new(times, values).expect("valid signal")
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("gyrosync");
    group.sample_size(20);

    let first = noisy_signal(2000, 3);
    let second = noisy_signal(2000, 17);

    group.bench_function("correlate_2k", |b| {
        let x1 = first.values().to_vec();
        let x2 = second.values().to_vec();
        b.iter(|| {
            let profile = cross_correlate(black_box(&x1), black_box(&x2));
            black_box(profile.peak)
        });
    });

    group.bench_function("synchronize_2k_native_rate", |b| {
        // Accuracy at the nominal interval keeps the grids near input size.
        let config = SyncConfig {
            accuracy: 0.005,
            resample: true,
        };
        b.iter(|| {
            let estimate = synchronize(black_box(&first), black_box(&second), config)
                .expect("estimate");
            black_box(estimate.seconds)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
