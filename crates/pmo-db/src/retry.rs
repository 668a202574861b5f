//! Transient error retry logic for the remote primary.
//!
//! Remote libSQL (Turso) endpoints occasionally reject requests while nodes
//! are recycled or a shared lock is held during provisioning. These resolve
//! on their own within seconds, so operations against the primary are
//! retried with exponential backoff before the caller falls back.
//!
//! Local databases only surface these errors under lock contention.

use std::future::Future;
use std::time::Duration;

use pmo_config::RetrySettings;

use crate::error::DatabaseError;

/// Configuration for retry behavior on transient errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Initial delay before the first retry.
    pub base_delay: Duration,
    /// Maximum delay between retries (backoff is capped here).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            base_delay: settings.base_delay(),
            max_delay: settings.max_delay(),
        }
    }
}

impl RetryConfig {
    /// Delay to sleep after `current`, doubled and capped at `max_delay`.
    #[must_use]
    pub fn next_delay(&self, current: Duration) -> Duration {
        std::cmp::min(current.saturating_mul(2), self.max_delay)
    }
}

/// Detect transient libSQL / Turso infrastructure errors.
///
/// The predicate is narrow: genuine SQL or constraint errors must surface
/// immediately instead of burning the retry budget.
pub fn is_transient_libsql_error(e: &libsql::Error) -> bool {
    let msg = e.to_string().to_ascii_lowercase();
    msg.contains("unable to acquire shared lock")
        || msg.contains("deletion must be in progress")
        || msg.contains("database is locked")
        || msg.contains("connection refused")
        || msg.contains("connection reset")
        || msg.contains("timed out")
}

/// Run `op` until it succeeds, fails with a non-transient error, or the
/// attempt budget is spent. Returns the last result.
///
/// # Errors
///
/// Returns the error of the final attempt.
pub async fn with_retry<T, F, Fut>(
    config: &RetryConfig,
    label: &str,
    mut op: F,
) -> Result<T, DatabaseError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DatabaseError>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut delay = config.base_delay;
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < max_attempts => {
                tracing::debug!(
                    op = label,
                    attempt,
                    max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %e,
                    "transient store error, retrying"
                );
                tokio::time::sleep(delay).await;
                delay = config.next_delay(delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
