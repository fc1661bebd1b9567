//! Portable built-in workloads
//!
//! Platform service calls are registered by the embedding application; the
//! benchmarks here only need the standard library and serve as baselines.

use std::hint::black_box;
use std::thread;

use anyhow::anyhow;
use tracing::debug;

use crate::bench::registry::{boxed, BenchmarkRunner};
use crate::config::WorkloadConfig;

/// Name of the no-op baseline
pub const EMPTY: &str = "Empty";

/// Display name of the CPU-intensive benchmark for `threads` workers
pub fn cpu_intensive_name(threads: usize) -> String {
    format!("CPU Intensive ({} thread)", threads)
}

/// Register the built-in benchmarks, in order: the empty baseline, then one
/// CPU-intensive benchmark per configured thread count.
pub fn register_builtin<R: BenchmarkRunner + ?Sized>(runner: &mut R, config: &WorkloadConfig) {
    runner.add_benchmark(EMPTY, boxed(|| Ok(())));

    for &threads in &config.cpu_threads {
        let units = config.cpu_work_units;
        runner.add_benchmark(
            &cpu_intensive_name(threads),
            boxed(move || cpu_intensive(threads, units).map(drop)),
        );
    }
    debug!("Registered {} built-in benchmarks", config.cpu_threads.len() + 1);
}

/// Split `units` steps of integer mixing across `threads` scoped threads and
/// wait for all of them. Returns the combined checksum.
pub fn cpu_intensive(threads: usize, units: u64) -> anyhow::Result<u64> {
    let threads = threads.max(1);
    let per_thread = units / threads as u64;

    thread::scope(|scope| {
        let workers: Vec<_> = (0..threads)
            .map(|i| scope.spawn(move || spin(i as u64 + 1, per_thread)))
            .collect();

        workers.into_iter().try_fold(0u64, |acc, worker| {
            worker
                .join()
                .map(|sum| acc ^ sum)
                .map_err(|_| anyhow!("cpu worker panicked"))
        })
    })
}

#[inline(never)]
fn spin(seed: u64, steps: u64) -> u64 {
    // xorshift64*
    let mut x = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
    for _ in 0..steps {
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        x = black_box(x.wrapping_mul(0x2545_F491_4F6C_DD1D));
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::registry::{BenchmarkRegistry, Operation};

    #[test]
    fn test_builtin_names_in_order() {
        let mut registry = BenchmarkRegistry::new();
        register_builtin(&mut registry, &WorkloadConfig::default());

        let names: Vec<_> = registry.names().collect();
        assert_eq!(
            names,
            vec![
                "Empty",
                "CPU Intensive (1 thread)",
                "CPU Intensive (2 thread)",
                "CPU Intensive (4 thread)",
                "CPU Intensive (8 thread)",
            ]
        );
    }

    #[test]
    fn test_cpu_intensive_is_deterministic() {
        let a = cpu_intensive(4, 10_000).unwrap();
        let b = cpu_intensive(4, 10_000).unwrap();
        assert_eq!(a, b);
        // zero threads is treated as one
        assert_eq!(cpu_intensive(0, 1_000).unwrap(), cpu_intensive(1, 1_000).unwrap());
    }

    #[test]
    fn test_registered_operations_succeed() {
        let mut registry = BenchmarkRegistry::new();
        let config = WorkloadConfig {
            cpu_work_units: 100,
            cpu_threads: vec![2],
        };
        register_builtin(&mut registry, &config);

        for (name, mut op) in registry.into_entries() {
            assert!(op.invoke().is_ok(), "{} failed", name);
        }
    }
}
