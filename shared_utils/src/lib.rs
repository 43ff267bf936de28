//! Retry helpers shared by the site's storage code.
//!
//! Storage calls (connecting, signing in, querying posts, syncing content)
//! go through [`retry_async`] so a briefly unavailable database does not
//! take a page render or a server start down with it.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tokio_retry::{strategy::ExponentialBackoff, Retry};
use tracing::{error, warn};

/// Backoff parameters for [`retry_async`].
///
/// `max_retries` counts retries, so an operation runs at most
/// `max_retries + 1` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub initial_delay_millis: u64,
    pub max_delay_secs: u64,
    pub max_retries: u32,
}

impl RetryConfig {
    #[must_use]
    pub const fn new(initial_delay_millis: u64, max_delay_secs: u64, max_retries: u32) -> Self {
        Self {
            initial_delay_millis,
            max_delay_secs,
            max_retries,
        }
    }

    /// Short backoff for queries issued while serving a request.
    #[must_use]
    pub const fn query() -> Self {
        Self::new(50, 2, 3)
    }

    /// Longer backoff for establishing the database connection at startup.
    #[must_use]
    pub const fn connect() -> Self {
        Self::new(100, 5, 5)
    }

    fn strategy(&self) -> impl Iterator<Item = Duration> + Clone {
        ExponentialBackoff::from_millis(self.initial_delay_millis)
            .max_delay(Duration::from_secs(self.max_delay_secs))
            .take(self.max_retries as usize)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::query()
    }
}

/// Runs `operation` until it succeeds or the retry budget in `config` is spent.
///
/// `context` names the call site in log output. Every failed attempt is
/// logged at `warn`, the final failure at `error`.
pub async fn retry_async<F, Fut, T, E>(
    context: &str,
    config: RetryConfig,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Debug,
{
    let attempts = AtomicU32::new(0);
    let result = Retry::spawn(config.strategy(), || {
        let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
        let fut = operation();
        async move {
            fut.await.map_err(|err| {
                warn!(error = ?err, retry_context = context, attempt, "Operation failed");
                err
            })
        }
    })
    .await;

    if let Err(err) = &result {
        error!(
            error = ?err,
            retry_context = context,
            attempts = attempts.load(Ordering::Relaxed),
            "Operation failed after exhausting retries"
        );
    }

    result
}
