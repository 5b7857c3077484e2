//! Retry and backoff policy for remote calls.
//!
//! Failures are classified by HTTP status; only 5xx statuses in an operation's
//! retryable set are retried, with exponential backoff bounded by a total
//! elapsed-time budget.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_http_status};
pub use policy::{
    ErrorKind, RetryDecision, RetryPolicy, ALWAYS_RETRY_STATUS, BASE_DELAY, MAX_ELAPSED,
};
pub use run::{run_with_retry, Sleeper, ThreadSleeper};
