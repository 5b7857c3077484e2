use std::collections::BTreeSet;
use std::time::Duration;

/// Status that every policy retries: nginx/gunicorn answer 504 when the backend
/// workers are busy or otherwise unavailable.
pub const ALWAYS_RETRY_STATUS: u16 = 504;

/// Upper bound on time spent in one retried call, waits included.
pub const MAX_ELAPSED: Duration = Duration::from_secs(600);

/// First backoff delay; doubled on every further attempt.
pub const BASE_DELAY: Duration = Duration::from_secs(1);

/// High-level classification of a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 4xx response. Never retried.
    ClientFault(u16),
    /// 5xx response. Retried only when the status is in the policy's set.
    ServerFault(u16),
    /// No usable status (transport, decode, auth). Not retried.
    Other,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Exponential backoff bounded by total elapsed time rather than attempt count.
///
/// The retryable set always contains 504. Built once per operation and not
/// mutated afterwards; `with_statuses` never touches the caller's list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    retryable_statuses: BTreeSet<u16>,
    max_elapsed: Duration,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::with_statuses(std::iter::empty())
    }
}

impl RetryPolicy {
    /// Policy retrying the given 5xx statuses plus 504.
    pub fn with_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = u16>,
    {
        let mut retryable_statuses: BTreeSet<u16> = statuses.into_iter().collect();
        retryable_statuses.insert(ALWAYS_RETRY_STATUS);
        Self {
            retryable_statuses,
            max_elapsed: MAX_ELAPSED,
            base_delay: BASE_DELAY,
        }
    }

    pub fn retryable_statuses(&self) -> &BTreeSet<u16> {
        &self.retryable_statuses
    }

    pub fn max_elapsed(&self) -> Duration {
        self.max_elapsed
    }

    /// True if a 5xx with this status should be retried.
    pub fn is_retryable(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }

    /// Wait before the retry that follows attempt `attempt` (1-based):
    /// `base * 2^(attempt-1)`, saturating instead of overflowing.
    pub fn backoff(&self, attempt: u32) -> Duration {
        1u32.checked_shl(attempt.saturating_sub(1))
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .unwrap_or(Duration::MAX)
    }

    /// Decide what to do after attempt `attempt` failed with `kind`, given the
    /// time already spent on this call.
    pub fn decide(&self, attempt: u32, elapsed: Duration, kind: ErrorKind) -> RetryDecision {
        match kind {
            ErrorKind::ServerFault(status) if self.is_retryable(status) => {
                let wait = self.backoff(attempt);
                if elapsed.saturating_add(wait) > self.max_elapsed {
                    RetryDecision::NoRetry
                } else {
                    RetryDecision::RetryAfter(wait)
                }
            }
            ErrorKind::ServerFault(_) | ErrorKind::ClientFault(_) | ErrorKind::Other => {
                RetryDecision::NoRetry
            }
        }
    }
}
