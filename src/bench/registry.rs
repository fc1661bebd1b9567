//! Named benchmark registry
//!
//! The embedding application hands zero-argument operations to a
//! [`BenchmarkRunner`]; what the runner does with them (run all, let a user
//! pick one) is up to the runner.

use std::convert::Infallible;

/// A unit of work under measurement.
///
/// Invoked repeatedly by the timer; never copied or inspected.
pub trait Operation: Send {
    type Error;

    fn invoke(&mut self) -> Result<(), Self::Error>;
}

impl<F, E> Operation for F
where
    F: FnMut() -> Result<(), E> + Send,
{
    type Error = E;

    #[inline(always)]
    fn invoke(&mut self) -> Result<(), E> {
        self()
    }
}

/// Boxed operation as stored in the registry
pub type BoxedOperation = Box<dyn Operation<Error = anyhow::Error>>;

/// Wrap a closure that cannot fail
pub fn infallible<F>(mut f: F) -> impl FnMut() -> Result<(), Infallible> + Send
where
    F: FnMut() + Send,
{
    move || {
        f();
        Ok(())
    }
}

/// Box a closure for registration
pub fn boxed<F>(f: F) -> BoxedOperation
where
    F: FnMut() -> anyhow::Result<()> + Send + 'static,
{
    Box::new(f)
}

/// Sink for named benchmarks
pub trait BenchmarkRunner {
    fn add_benchmark(&mut self, name: &str, op: BoxedOperation);
}

/// Ordered list of named benchmarks
#[derive(Default)]
pub struct BenchmarkRegistry {
    entries: Vec<(String, BoxedOperation)>,
}

impl BenchmarkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn into_entries(self) -> Vec<(String, BoxedOperation)> {
        self.entries
    }
}

impl BenchmarkRunner for BenchmarkRegistry {
    fn add_benchmark(&mut self, name: &str, op: BoxedOperation) {
        self.entries.push((name.to_string(), op));
    }
}

impl std::fmt::Debug for BenchmarkRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_order() {
        let mut registry = BenchmarkRegistry::new();
        registry.add_benchmark("b", boxed(|| Ok(())));
        registry.add_benchmark("a", boxed(|| Ok(())));
        registry.add_benchmark("c", boxed(|| Ok(())));

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_entries_keep_operations() {
        let mut registry = BenchmarkRegistry::new();
        registry.add_benchmark("fails", boxed(|| anyhow::bail!("nope")));

        let mut entries = registry.into_entries();
        assert_eq!(entries.len(), 1);
        let (name, op) = &mut entries[0];
        assert_eq!(name.as_str(), "fails");
        assert_eq!(op.invoke().unwrap_err().to_string(), "nope");
    }

    #[test]
    fn test_infallible_adapter() {
        let mut calls = 0;
        {
            let mut op = infallible(|| calls += 1);
            op.invoke().unwrap();
            op.invoke().unwrap();
        }
        assert_eq!(calls, 2);
    }
}
