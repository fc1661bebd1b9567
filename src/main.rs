//! Benchmark runner CLI
//! Runs the built-in benchmarks non-interactively and prints a report

use bench_core::bench::{print_report, run_suite, BenchmarkRegistry};
use bench_core::config::LoggingConfig;
use bench_core::{workload, Config};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;
    init_logging(&config.logging)?;

    info!("✅ Configuration loaded");
    info!("   Time budget: {}s per benchmark", config.timer.time_budget_secs);

    let mut registry = BenchmarkRegistry::new();
    workload::register_builtin(&mut registry, &config.workload);
    info!("Registered {} benchmarks", registry.len());

    let results = run_suite(registry, &config.timer).await?;
    print_report(&results);

    if results.iter().all(|r| r.is_completed()) {
        Ok(())
    } else {
        anyhow::bail!("one or more benchmarks failed")
    }
}

fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))?;

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true);

    if config.json_output {
        builder.json().try_init().map_err(|e| anyhow::anyhow!(e))?;
    } else {
        builder.try_init().map_err(|e| anyhow::anyhow!(e))?;
    }
    Ok(())
}
