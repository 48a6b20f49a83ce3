use std::{future::Future, time::Duration};
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};

/// Bounded exponential backoff.
///
/// The n-th retry waits `base_millis^n * factor` milliseconds, capped at `max_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryOptions {
    retries: usize,
    base_millis: u64,
    factor: u64,
    max_delay: Duration,
}

impl RetryOptions {
    pub fn new() -> Self {
        Self {
            retries: 3,
            base_millis: 10,
            factor: 2,
            max_delay: Duration::from_secs(2),
        }
    }

    /// Number of attempts after the first one.
    pub fn retries(mut self, count: usize) -> Self {
        self.retries = count;
        self
    }

    pub fn base_millis(mut self, base: u64) -> Self {
        self.base_millis = base;
        self
    }

    pub fn factor(mut self, factor: u64) -> Self {
        self.factor = factor;
        self
    }

    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    fn strategy(&self) -> impl Iterator<Item = Duration> {
        ExponentialBackoff::from_millis(self.base_millis)
            .factor(self.factor)
            .max_delay(self.max_delay)
            .take(self.retries)
    }
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs `operation` until it succeeds, `should_retry` rejects its error, or
/// the retries are used up. The last error is returned in the latter cases.
pub async fn retry_async_operation_if<F, Fut, T, E, C>(
    mut operation: F,
    options: RetryOptions,
    mut should_retry: C,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: FnMut(&E) -> bool,
{
    let mut attempt = 0usize;
    let action = move || {
        attempt += 1;
        if attempt > 1 {
            tracing::debug!(attempt, "retrying operation");
        }
        operation()
    };

    RetryIf::spawn(options.strategy(), action, move |err: &E| should_retry(err)).await
}

/// Runs `operation` with up to `max_retries` retries on any error.
pub async fn retry_async_operation<F, Fut, T, E>(operation: F, max_retries: usize) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    retry_async_operation_if(operation, RetryOptions::new().retries(max_retries), |_| true).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn fast() -> RetryOptions {
        RetryOptions::new().base_millis(1).factor(1)
    }

    // Fails `failures` times, then succeeds.
    fn eventually_successful(
        failures: usize,
    ) -> (Arc<AtomicUsize>, impl FnMut() -> std::future::Ready<Result<usize, &'static str>>) {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let operation = move || {
            let current = counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(if current < failures {
                Err("operation failed")
            } else {
                Ok(current)
            })
        };
        (attempts, operation)
    }

    #[tokio::test]
    async fn test_eventual_success() {
        let (attempts, operation) = eventually_successful(2);

        let result = retry_async_operation_if(operation, fast().retries(3), |_| true).await;

        assert_eq!(result, Ok(2));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let (attempts, operation) = eventually_successful(usize::MAX);

        let result = retry_async_operation_if(operation, fast().retries(2), |_| true).await;

        assert_eq!(result, Err("operation failed"));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_condition_stops_retrying() {
        let (attempts, operation) = eventually_successful(usize::MAX);

        let result = retry_async_operation_if(operation, fast().retries(5), |_| false).await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_retries_runs_once() {
        let (attempts, operation) = eventually_successful(1);

        let result = retry_async_operation(operation, 0).await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
