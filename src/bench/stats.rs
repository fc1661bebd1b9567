//! Single-pass running mean/variance (Welford)

use crate::types::Summary;
use std::time::Duration;

/// Streaming accumulator over iteration latencies in nanoseconds.
///
/// Scoped to one run; the timer owns it exclusively and consumes it with
/// [`RunningStats::finish`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one sample into the accumulator.
    ///
    /// `delta` is taken against the mean *before* the update and multiplied
    /// by the residual against the mean *after* it.
    #[inline]
    pub fn push(&mut self, sample_ns: f64) {
        self.count += 1;
        let delta = sample_ns - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (sample_ns - self.mean);
    }

    #[inline]
    pub fn push_duration(&mut self, sample: Duration) {
        self.push(sample.as_nanos() as f64);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn sum_squared_deviation(&self) -> f64 {
        self.m2
    }

    /// Sample variance, dividing by `count - 1`.
    ///
    /// Zero when fewer than two samples were seen.
    pub fn sample_variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn sample_std_dev(&self) -> f64 {
        self.sample_variance().sqrt()
    }

    pub fn finish(self, elapsed: Duration) -> Summary {
        Summary {
            iterations: self.count,
            mean_ns: self.mean,
            stdev_ns: self.sample_std_dev(),
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn batch(samples: &[f64]) -> (f64, f64) {
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        (mean, var.sqrt())
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_known_sequence() {
        let mut stats = RunningStats::new();
        for x in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            stats.push(x);
        }
        assert_eq!(stats.count(), 8);
        assert!(close(stats.mean(), 5.0));
        // population variance 4, sample variance 32/7
        assert!(close(stats.sum_squared_deviation(), 32.0));
        assert!(close(stats.sample_variance(), 32.0 / 7.0));
    }

    #[test]
    fn test_single_sample_has_zero_stdev() {
        let mut stats = RunningStats::new();
        stats.push(1234.0);
        let summary = stats.finish(Duration::from_nanos(1234));
        assert_eq!(summary.iterations, 1);
        assert_eq!(summary.mean_ns, 1234.0);
        assert_eq!(summary.stdev_ns, 0.0);
    }

    #[test]
    fn test_empty_accumulator() {
        let summary = RunningStats::new().finish(Duration::ZERO);
        assert_eq!(summary.iterations, 0);
        assert_eq!(summary.mean_ns, 0.0);
        assert_eq!(summary.stdev_ns, 0.0);
    }

    #[test]
    fn test_constant_samples() {
        let mut stats = RunningStats::new();
        for _ in 0..1000 {
            stats.push_duration(Duration::from_micros(3));
        }
        assert_eq!(stats.mean(), 3_000.0);
        assert_eq!(stats.sample_std_dev(), 0.0);
    }

    #[test]
    fn test_large_offset_stays_stable() {
        // naive sum-of-squares loses everything here
        let base = 1.0e9;
        let mut stats = RunningStats::new();
        for x in [4.0, 7.0, 13.0, 16.0] {
            stats.push(base + x);
        }
        assert!(close(stats.mean(), base + 10.0));
        assert!(close(stats.sample_variance(), 30.0));
    }

    proptest! {
        #[test]
        fn prop_matches_batch(samples in prop::collection::vec(0.0f64..1.0e7, 2..200)) {
            let mut stats = RunningStats::new();
            for &s in &samples {
                stats.push(s);
            }
            let (mean, stdev) = batch(&samples);
            prop_assert!((stats.mean() - mean).abs() <= 1e-6 * mean.max(1.0));
            prop_assert!((stats.sample_std_dev() - stdev).abs() <= 1e-6 * stdev.max(1.0));
        }
    }
}
