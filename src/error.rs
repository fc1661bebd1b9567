//! Error types

use std::time::Duration;
use thiserror::Error;

/// Errors raised while setting up a benchmark run
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("time budget must be positive and finite, got {0:?}")]
    InvalidBudget(Duration),

    #[error("invalid time budget in seconds: {0}")]
    InvalidBudgetSecs(f64),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Why a run ended without a result.
///
/// `E` is the measured operation's own error type, carried through untouched.
#[derive(Debug, Error)]
pub enum RunError<E> {
    #[error("operation failed on iteration {iteration}")]
    Operation {
        iteration: u64,
        #[source]
        source: E,
    },

    #[error("run cancelled after {iterations} iterations")]
    Cancelled { iterations: u64 },

    #[error(transparent)]
    Harness(#[from] BenchError),
}
