//! Bench Core
//!
//! Latency harness for platform service calls: runs an opaque operation
//! repeatedly for a fixed wall-clock budget and reports the mean and standard
//! deviation of iteration time.
//!
//! ## Architecture
//! - Clock: injectable monotonic time source
//! - Bench: Welford running statistics, budgeted timer, registry, suite runner
//! - Workload: portable built-in benchmarks (empty baseline, CPU-bound)

pub mod bench;
pub mod clock;
pub mod config;
pub mod error;
pub mod types;
pub mod workload;

pub use bench::{
    run_in_background,
    run_suite,
    BenchmarkRegistry,
    BenchmarkRunner,
    BenchmarkTimer,
    Operation,
    ResultListener,
    RunningStats,
};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::Config;
pub use error::{BenchError, RunError};
pub use types::{BenchResult, Outcome, Summary};
