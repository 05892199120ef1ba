use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Backoff settings for retried database operations.
///
/// Used by the postgres connector so a server booting alongside its
/// database (compose, CI containers) survives the race instead of
/// failing on the first refused connection.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the initial attempt
    pub max_retries: u32,

    /// Delay before the first retry, in milliseconds
    pub initial_delay_ms: u64,

    /// Upper bound the growing delay is clamped to, in milliseconds
    pub max_delay_ms: u64,

    /// Growth factor applied to the delay after each failure
    pub backoff_multiplier: f64,

    /// Randomize each delay so a fleet of replicas does not reconnect
    /// in lockstep
    pub use_jitter: bool,
}

impl RetryConfig {
    /// Defaults: 3 retries, 100ms initial delay doubling up to 5s,
    /// with jitter.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    pub fn with_max_delay(mut self, delay_ms: u64) -> Self {
        self.max_delay_ms = delay_ms;
        self
    }

    /// Deterministic delays, for tests
    pub fn without_jitter(mut self) -> Self {
        self.use_jitter = false;
        self
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 100,
            max_delay_ms: 5000,
            backoff_multiplier: 2.0,
            use_jitter: true,
        }
    }
}

/// Run `operation` until it succeeds or the retry budget is spent.
///
/// # Example
/// ```ignore
/// use database::common::retry::{retry_with_backoff, RetryConfig};
///
/// let config = RetryConfig::new().with_max_retries(5);
/// let db = retry_with_backoff(
///     || database::postgres::connect(&db_url),
///     config,
/// )
/// .await?;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, config: RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut delay = config.initial_delay_ms;
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!("Operation succeeded after {} retries", attempt);
                }
                return Ok(result);
            }
            Err(e) => {
                if attempt == config.max_retries {
                    warn!("Operation failed after {} attempts: {}", attempt + 1, e);
                    return Err(e);
                }
                attempt += 1;

                let pause = if config.use_jitter {
                    jittered(delay)
                } else {
                    delay
                };
                debug!(
                    "Operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                    attempt,
                    config.max_retries + 1,
                    e,
                    pause
                );
                tokio::time::sleep(Duration::from_millis(pause)).await;
                delay =
                    ((delay as f64 * config.backoff_multiplier) as u64).min(config.max_delay_ms);
            }
        }
    }
}

/// Scale a delay to a random point between 50% and 100% of itself.
fn jittered(delay: u64) -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    // Hashing the current instant is random enough here; pulling in a
    // rand dependency for connection pacing is not worth it.
    let factor = (RandomState::new().hash_one(std::time::SystemTime::now()) % 50) as f64 / 100.0
        + 0.5;

    (delay as f64 * factor) as u64
}

/// Retry with the default budget (3 retries from 100ms).
pub async fn retry<F, Fut, T, E>(operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    retry_with_backoff(operation, RetryConfig::default()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn failing_until(successes_after: u32) -> (Arc<AtomicU32>, impl FnMut() -> FailFuture) {
        let counter = Arc::new(AtomicU32::new(0));
        let shared = counter.clone();
        let op = move || {
            let counter = shared.clone();
            Box::pin(async move {
                let count = counter.fetch_add(1, Ordering::SeqCst);
                if count < successes_after {
                    Err(format!("attempt {}", count + 1))
                } else {
                    Ok("connected")
                }
            }) as FailFuture
        };
        (counter, op)
    }

    type FailFuture =
        std::pin::Pin<Box<dyn Future<Output = Result<&'static str, String>> + Send>>;

    #[tokio::test]
    async fn test_first_attempt_success_does_not_sleep() {
        let (counter, op) = failing_until(0);

        let result = retry(op).await;

        assert_eq!(result, Ok("connected"));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recovers_within_budget() {
        let (counter, op) = failing_until(2);
        let config = RetryConfig::new().with_initial_delay(10).without_jitter();

        let result = retry_with_backoff(op, config).await;

        assert_eq!(result, Ok("connected"));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_budget_exhaustion_returns_last_error() {
        let (counter, op) = failing_until(u32::MAX);
        let config = RetryConfig::new()
            .with_max_retries(2)
            .with_initial_delay(10)
            .without_jitter();

        let result = retry_with_backoff(op, config).await;

        assert_eq!(result, Err("attempt 3".to_string()));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_delay_growth_is_clamped() {
        let (_, op) = failing_until(u32::MAX);
        let config = RetryConfig::new()
            .with_max_retries(3)
            .with_initial_delay(50)
            .with_max_delay(100)
            .without_jitter();

        let start = std::time::Instant::now();
        let _ = retry_with_backoff(op, config).await;

        // 50 + 100 + 100, with the clamp keeping the third pause at 100
        let elapsed = start.elapsed().as_millis();
        assert!(elapsed >= 250);
        assert!(elapsed < 1000);
    }

    #[test]
    fn test_jittered_stays_in_range() {
        for _ in 0..10 {
            let value = jittered(1000);
            assert!((500..=1000).contains(&value));
        }
    }
}
