//! Configuration module

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::bench::timer::budget_from_secs;
use crate::error::BenchError;

/// Default time budget per benchmark, in seconds
pub const DEFAULT_TIME_BUDGET_SECS: f64 = 5.0;

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Timer settings
    pub timer: TimerConfig,

    /// Built-in workload settings
    pub workload: WorkloadConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Minimum wall-clock time each benchmark runs for
    pub time_budget_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    /// Arithmetic steps per CPU-intensive iteration, split across threads
    pub cpu_work_units: u64,
    /// Thread counts for the CPU-intensive benchmarks
    pub cpu_threads: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json_output: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            time_budget_secs: DEFAULT_TIME_BUDGET_SECS,
        }
    }
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            cpu_work_units: 1_000_000,
            cpu_threads: vec![1, 2, 4, 8],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_output: false,
        }
    }
}

impl TimerConfig {
    pub fn budget(&self) -> Result<Duration, BenchError> {
        budget_from_secs(self.time_budget_secs)
    }
}

impl Config {
    /// Load config from environment
    pub fn from_env() -> anyhow::Result<Self> {
        // Try to load from file first
        let config_path = std::env::var("BENCH_CONFIG")
            .unwrap_or_else(|_| "config/bench.json".to_string());

        let mut config = if std::path::Path::new(&config_path).exists() {
            Self::load(&config_path)?
        } else {
            Config::default()
        };

        if let Ok(secs) = std::env::var("BENCH_TIME_BUDGET_SECS") {
            config.timer.time_budget_secs = secs.trim().parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load config from a JSON file
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), BenchError> {
        self.timer.budget().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.timer.budget().unwrap(), Duration::from_secs(5));
        assert_eq!(config.workload.cpu_threads, vec![1, 2, 4, 8]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"timer": {"time_budget_secs": 0.5}}"#).unwrap();
        assert_eq!(config.timer.budget().unwrap(), Duration::from_millis(500));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.workload.cpu_work_units, 1_000_000);
    }

    #[test]
    fn test_rejects_non_positive_budget() {
        let mut config = Config::default();
        config.timer.time_budget_secs = 0.0;
        assert!(matches!(
            config.validate(),
            Err(BenchError::InvalidBudgetSecs(_))
        ));
        config.timer.time_budget_secs = -3.0;
        assert!(config.validate().is_err());
        // rounds to zero nanoseconds
        config.timer.time_budget_secs = 1e-12;
        assert!(matches!(
            config.validate(),
            Err(BenchError::InvalidBudgetSecs(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("bench-config-{}.json", std::process::id()));
        let path = path.to_str().unwrap();

        let mut config = Config::default();
        config.timer.time_budget_secs = 1.5;
        config.logging.json_output = true;
        config.save(path).unwrap();

        let loaded = Config::load(path).unwrap();
        std::fs::remove_file(path).ok();

        assert_eq!(loaded.timer.time_budget_secs, 1.5);
        assert!(loaded.logging.json_output);
    }
}
