//! Differential timing harness for the `constant_time_tests` feature.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::thread_rng;

/// Runs `measure` `n` times, half with `class == true` and half with
/// `class == false` in shuffled order, and returns the Pearson correlation
/// coefficient between the class and the measured duration.
///
/// A value close to zero means the run time does not tell the two classes
/// apart.
pub fn correlation<F>(n: usize, mut measure: F) -> f64
where
    F: FnMut(bool) -> Duration,
{
    // Each element is (class, duration).
    let mut tests = (0..n)
        .map(|i| (i < n / 2, Duration::ZERO))
        .collect::<Vec<_>>();
    tests.shuffle(&mut thread_rng());

    for test in tests.iter_mut() {
        test.1 = measure(test.0);
    }

    let tests = tests
        .iter()
        .map(|t| (if t.0 { 1_f64 } else { 0_f64 }, t.1.as_nanos() as f64))
        .collect::<Vec<_>>();
    let (avg_x, avg_y): (f64, f64) = (
        tests.iter().map(|t| t.0).sum::<f64>() / n as f64,
        tests.iter().map(|t| t.1).sum::<f64>() / n as f64,
    );
    // exactly half the samples are in each class
    let sd_x = 0.5;
    let sd_y = (tests
        .iter()
        .map(|t| {
            let difference = t.1 - avg_y;
            difference * difference
        })
        .sum::<f64>()
        / n as f64)
        .sqrt();
    let cv = tests
        .iter()
        .map(|t| (t.0 - avg_x) * (t.1 - avg_y))
        .sum::<f64>()
        / n as f64;

    cv / (sd_x * sd_y)
}
