//! Retry loop: run a closure until success or the policy says stop.

use std::rc::Rc;
use std::time::{Duration, Instant};

use super::classify;
use super::policy::{RetryDecision, RetryPolicy};
use crate::error::ApiError;

/// Blocks the calling thread between attempts.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<S: Sleeper + ?Sized> Sleeper for Rc<S> {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

/// Runs `f` until it succeeds or `policy` says to stop, returning the last error
/// in the latter case.
///
/// Elapsed time is the time spent inside `f` plus the waits handed to `sleeper`,
/// so a non-sleeping sleeper still exhausts the budget. `operation` names the
/// call in the backoff log line.
pub fn run_with_retry<T, F>(
    policy: &RetryPolicy,
    operation: &str,
    sleeper: &dyn Sleeper,
    mut f: F,
) -> Result<T, ApiError>
where
    F: FnMut() -> Result<T, ApiError>,
{
    let mut attempt = 1u32;
    let mut elapsed = Duration::ZERO;
    loop {
        let started = Instant::now();
        let result = f();
        elapsed += started.elapsed();
        match result {
            Ok(value) => return Ok(value),
            Err(e) => match policy.decide(attempt, elapsed, classify::classify(&e)) {
                RetryDecision::NoRetry => return Err(e),
                RetryDecision::RetryAfter(wait) => {
                    tracing::info!(
                        wait_secs = wait.as_secs_f64(),
                        tries = attempt,
                        operation,
                        status = e.status(),
                        "Trying again in {:.1} seconds after {} tries calling {}",
                        wait.as_secs_f64(),
                        attempt,
                        operation
                    );
                    sleeper.sleep(wait);
                    elapsed += wait;
                    attempt += 1;
                }
            },
        }
    }
}
