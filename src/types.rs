//! Core result types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Final statistics of one run, all times in nanoseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub iterations: u64,
    pub mean_ns: f64,
    pub stdev_ns: f64,
    /// Wall time from run start to the budget check that ended it
    #[serde(with = "duration_nanos")]
    pub elapsed: Duration,
}

impl Summary {
    /// The `(mean, stdev)` pair handed to result listeners
    pub fn pair(&self) -> (f64, f64) {
        (self.mean_ns, self.stdev_ns)
    }
}

/// How a named benchmark ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    Completed,
    Failed(String),
}

/// Result row for one named benchmark
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchResult {
    pub name: String,
    pub iterations: u64,
    pub mean_ns: f64,
    pub stdev_ns: f64,
    pub outcome: Outcome,
}

impl BenchResult {
    pub fn completed(name: impl Into<String>, summary: &Summary) -> Self {
        Self {
            name: name.into(),
            iterations: summary.iterations,
            mean_ns: summary.mean_ns,
            stdev_ns: summary.stdev_ns,
            outcome: Outcome::Completed,
        }
    }

    pub fn failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            iterations: 0,
            mean_ns: 0.0,
            stdev_ns: 0.0,
            outcome: Outcome::Failed(reason.into()),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.outcome == Outcome::Completed
    }

    /// Operations per second implied by the mean
    pub fn throughput_ops(&self) -> f64 {
        if self.mean_ns > 0.0 {
            1_000_000_000.0 / self.mean_ns
        } else {
            0.0
        }
    }
}

impl fmt::Display for BenchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Completed => write!(
                f,
                "{:<30} | mean: {:>12.2}ns | stdev: {:>12.2}ns | iters: {:>10} | {:>12.0} ops/s",
                self.name,
                self.mean_ns,
                self.stdev_ns,
                self.iterations,
                self.throughput_ops()
            ),
            Outcome::Failed(reason) => write!(f, "{:<30} | FAILED: {}", self.name, reason),
        }
    }
}

mod duration_nanos {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let nanos = u64::deserialize(d)?;
        Ok(Duration::from_nanos(nanos))
    }
}
