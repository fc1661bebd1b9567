//! Budgeted benchmark timer
//!
//! Runs an operation back to back until a wall-clock budget is used up,
//! folding each iteration's latency into [`RunningStats`]. The loop always
//! completes at least one iteration and only checks the budget after an
//! iteration finished. It stops once the budget is reached, so a run covers
//! at least the budget and overshoots it by at most one iteration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::registry::Operation;
use super::stats::RunningStats;
use crate::clock::{Clock, MonotonicClock};
use crate::error::{BenchError, RunError};
use crate::types::Summary;

/// Receives the `(mean, stdev)` pair of a finished run, in nanoseconds.
///
/// `on_result` takes `self`, so a listener can fire at most once.
pub trait ResultListener: Send {
    fn on_result(self, mean: f64, stdev: f64);
}

impl<F> ResultListener for F
where
    F: FnOnce(f64, f64) + Send,
{
    fn on_result(self, mean: f64, stdev: f64) {
        self(mean, stdev)
    }
}

/// Forwards the result to the receiving half
impl ResultListener for oneshot::Sender<(f64, f64)> {
    fn on_result(self, mean: f64, stdev: f64) {
        // receiver gone means nobody is waiting for the result
        let _ = self.send((mean, stdev));
    }
}

/// Cooperative cancellation flag, checked between iterations only
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Timer bound to a budget and a clock
#[derive(Debug, Clone)]
pub struct BenchmarkTimer<C = MonotonicClock> {
    budget: Duration,
    clock: C,
    cancel: Option<CancelHandle>,
}

impl BenchmarkTimer<MonotonicClock> {
    pub fn new(budget: Duration) -> Result<Self, BenchError> {
        Self::with_clock(budget, MonotonicClock::new())
    }

    /// Budget given in (fractional) seconds, as in config files
    pub fn from_secs_f64(secs: f64) -> Result<Self, BenchError> {
        Self::new(budget_from_secs(secs)?)
    }
}

impl<C: Clock> BenchmarkTimer<C> {
    pub fn with_clock(budget: Duration, clock: C) -> Result<Self, BenchError> {
        if budget.is_zero() {
            return Err(BenchError::InvalidBudget(budget));
        }
        Ok(Self {
            budget,
            clock,
            cancel: None,
        })
    }

    pub fn with_cancel(mut self, handle: CancelHandle) -> Self {
        self.cancel = Some(handle);
        self
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Run on the current thread and return the summary
    pub fn measure<O>(&self, op: &mut O) -> Result<Summary, RunError<O::Error>>
    where
        O: Operation + ?Sized,
    {
        timed_loop(&self.clock, self.budget, self.cancel.as_ref(), op)
    }

    /// Run on the current thread and deliver the result to `listener`.
    ///
    /// On failure the listener is dropped without being called.
    pub fn run<O, L>(&self, op: &mut O, listener: L) -> Result<Summary, RunError<O::Error>>
    where
        O: Operation + ?Sized,
        L: ResultListener,
    {
        let summary = self.measure(op)?;
        listener.on_result(summary.mean_ns, summary.stdev_ns);
        Ok(summary)
    }
}

impl<C: Clock + 'static> BenchmarkTimer<C> {
    /// Move the loop onto the blocking pool.
    ///
    /// The returned handle resolves once, after the loop has terminated.
    pub fn spawn<O>(self, mut op: O) -> JoinHandle<Result<Summary, RunError<O::Error>>>
    where
        O: Operation + 'static,
        O::Error: Send + 'static,
    {
        tokio::task::spawn_blocking(move || self.measure(&mut op))
    }

    /// Run in the background, then hand `(mean, stdev)` to `listener` from
    /// the async side once the loop is done.
    pub fn run_in_background<O, L>(
        self,
        op: O,
        listener: L,
    ) -> JoinHandle<Result<Summary, RunError<O::Error>>>
    where
        O: Operation + 'static,
        O::Error: Send + 'static,
        L: ResultListener + 'static,
    {
        let worker = self.spawn(op);
        tokio::spawn(async move {
            let result = match worker.await {
                Ok(result) => result,
                Err(e) => Err(RunError::from(BenchError::from(e))),
            };
            if let Ok(summary) = &result {
                listener.on_result(summary.mean_ns, summary.stdev_ns);
            }
            result
        })
    }
}

/// Validate `budget` and run `op` in the background with the wall clock
pub fn run_in_background<O, L>(
    op: O,
    budget: Duration,
    listener: L,
) -> Result<JoinHandle<Result<Summary, RunError<O::Error>>>, BenchError>
where
    O: Operation + 'static,
    O::Error: Send + 'static,
    L: ResultListener + 'static,
{
    Ok(BenchmarkTimer::new(budget)?.run_in_background(op, listener))
}

pub(crate) fn budget_from_secs(secs: f64) -> Result<Duration, BenchError> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(BenchError::InvalidBudgetSecs(secs));
    }
    match Duration::try_from_secs_f64(secs) {
        // below clock resolution
        Ok(budget) if budget.is_zero() => Err(BenchError::InvalidBudgetSecs(secs)),
        Ok(budget) => Ok(budget),
        Err(_) => Err(BenchError::InvalidBudgetSecs(secs)),
    }
}

fn timed_loop<C, O>(
    clock: &C,
    budget: Duration,
    cancel: Option<&CancelHandle>,
    op: &mut O,
) -> Result<Summary, RunError<O::Error>>
where
    C: Clock + ?Sized,
    O: Operation + ?Sized,
{
    debug!("Starting timed run, budget {:?}", budget);

    let mut stats = RunningStats::new();
    let run_start = clock.now();

    loop {
        let iter_start = clock.now();
        if let Err(source) = op.invoke() {
            let iteration = stats.count() + 1;
            warn!("Operation failed on iteration {}, aborting run", iteration);
            return Err(RunError::Operation { iteration, source });
        }
        let elapsed = clock.now().saturating_sub(iter_start);
        stats.push_duration(elapsed);

        let since_start = clock.now().saturating_sub(run_start);
        if since_start >= budget {
            let summary = stats.finish(since_start);
            debug!(
                "Run finished | iters: {} | mean: {:.2}ns | stdev: {:.2}ns",
                summary.iterations, summary.mean_ns, summary.stdev_ns
            );
            return Ok(summary);
        }

        if cancel.is_some_and(CancelHandle::is_cancelled) {
            warn!("Run cancelled after {} iterations", stats.count());
            return Err(RunError::Cancelled {
                iterations: stats.count(),
            });
        }
    }
}
