//! Recover a known sub-sample delay between two simulated recordings.
//!
//! Two devices sample the same motion at a nominal 100 Hz with independent
//! clock jitter; the second device runs 4.2 ms late. That is less than half
//! a sample interval, so recovering it needs the spline refinement step.
//!
//! Run with: `cargo run --example recover_shift`

use gyrosync::{synchronize, Signal, SyncConfig};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

const TRUE_DELAY: f64 = 0.0042;

fn motion(t: f64) -> f64 {
    (t * 6.3).sin() + 0.5 * (t * 2.17 + 0.4).sin() + 0.25 * (t * 9.8 + 1.1).sin()
}

fn jittered_times(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut times = Vec::with_capacity(n);
    let mut t = 0.0;
    for _ in 0..n {
        times.push(t);
        t += 0.01 + rng.random_range(-0.002..0.002);
    }
    times
}

fn main() -> anyhow::Result<()> {
    let times1 = jittered_times(600, 42);
    let times2 = jittered_times(600, 1337);
    let values1: Vec<f64> = times1.iter().map(|&t| motion(t)).collect();
    let values2: Vec<f64> = times2.iter().map(|&t| motion(t - TRUE_DELAY)).collect();

    let first = Signal::new(times1, values1)?;
    let second = Signal::new(times2, values2)?;
    let config = SyncConfig {
        accuracy: 0.002,
        resample: true,
    };

    let estimate = synchronize(&first, &second, config)?;

    println!("true delay:      {:+.6} s", TRUE_DELAY);
    println!("recovered delay: {:+.6} s", estimate.seconds);
    println!("error:           {:+.6} s", estimate.seconds - TRUE_DELAY);
    println!(
        "grid interval:   {:.6} s ({:.2} samples of lag)",
        estimate.dt, estimate.lag
    );
    println!("\n{}", estimate.to_json_pretty()?);
    Ok(())
}
