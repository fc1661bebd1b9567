//! Benchmark module
//! Budgeted timing loop, running statistics and the named-benchmark registry

pub mod registry;
pub mod stats;
pub mod suite;
pub mod timer;

pub use registry::{
    boxed,
    infallible,
    BenchmarkRegistry,
    BenchmarkRunner,
    BoxedOperation,
    Operation,
};
pub use stats::RunningStats;
pub use suite::{print_report, render_report, run_suite, run_suite_with};
pub use timer::{
    run_in_background,
    BenchmarkTimer,
    CancelHandle,
    ResultListener,
};
