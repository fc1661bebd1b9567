//! Non-interactive runner
//! Runs every registered benchmark in order and reports a table

use std::fmt::Write as _;

use tracing::{error, info};

use super::registry::{BenchmarkRegistry, Operation};
use super::timer::BenchmarkTimer;
use crate::clock::Clock;
use crate::config::TimerConfig;
use crate::error::{BenchError, RunError};
use crate::types::BenchResult;

/// Run all benchmarks with the wall clock and the configured budget
pub async fn run_suite(
    registry: BenchmarkRegistry,
    config: &TimerConfig,
) -> Result<Vec<BenchResult>, BenchError> {
    let timer = BenchmarkTimer::new(config.budget()?)?;
    run_suite_with(registry, timer).await
}

/// Run all benchmarks one after another, each on the blocking pool.
///
/// A failing benchmark is recorded and the suite moves on.
pub async fn run_suite_with<C>(
    registry: BenchmarkRegistry,
    timer: BenchmarkTimer<C>,
) -> Result<Vec<BenchResult>, BenchError>
where
    C: Clock + Clone + 'static,
{
    let mut results = Vec::with_capacity(registry.len());

    for (name, mut op) in registry.into_entries() {
        info!("Running benchmark: {}", name);

        let outcome = timer.clone().spawn(move || op.invoke()).await?;
        let result = match outcome {
            Ok(summary) => BenchResult::completed(&name, &summary),
            Err(e) => {
                let reason = failure_reason(&e);
                error!("Benchmark {} failed: {}", name, reason);
                BenchResult::failed(&name, reason)
            }
        };

        info!("{}", result);
        results.push(result);
    }

    Ok(results)
}

fn failure_reason(e: &RunError<anyhow::Error>) -> String {
    match e {
        RunError::Operation { iteration, source } => {
            format!("iteration {}: {:#}", iteration, source)
        }
        other => other.to_string(),
    }
}

/// Render results as a boxed table
pub fn render_report(results: &[BenchResult]) -> String {
    let mut out = String::new();
    let bar = "═".repeat(120);

    let _ = writeln!(out, "╔{}╗", bar);
    let _ = writeln!(out, "║ {:<118} ║", "BENCHMARK RESULTS");
    let _ = writeln!(out, "╠{}╣", bar);
    for r in results {
        let _ = writeln!(out, "║ {:<118} ║", r.to_string());
    }
    let _ = writeln!(out, "╚{}╝", bar);

    let completed = results.iter().filter(|r| r.is_completed()).count();
    let _ = writeln!(out, "{} of {} benchmarks completed", completed, results.len());
    out
}

pub fn print_report(results: &[BenchResult]) {
    print!("{}", render_report(results));
}
