//! Bounded retry for writes.

use std::thread;
use std::time::Duration;

use log::{debug, warn};

use crate::error::{Error, Result};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_DELAY: Duration = Duration::from_millis(200);

/// Fixed number of attempts with a fixed pause in between. No backoff, no
/// jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_DELAY,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Runs `operation` until it succeeds or the attempts run out.
    ///
    /// `operation` receives the 1-based attempt number. Errors that are not
    /// [retryable](Error::is_retryable) are returned straight away.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persist`] naming `target` and the attempt count once
    /// every attempt has failed.
    pub fn run<T, F>(&self, target: &str, mut operation: F) -> Result<T>
    where
        F: FnMut(u32) -> Result<T>,
    {
        let mut attempt = 1;
        loop {
            match operation(attempt) {
                Ok(value) => {
                    debug!("`{target}` succeeded on attempt {attempt}");
                    return Ok(value);
                }
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) if attempt >= self.max_attempts => {
                    return Err(Error::Persist {
                        name: target.to_string(),
                        attempts: attempt,
                        source: Box::new(e),
                    });
                }
                Err(e) => {
                    warn!(
                        "Attempt {attempt}/{} for `{target}` failed: {e}",
                        self.max_attempts
                    );
                    thread::sleep(self.delay);
                    attempt += 1;
                }
            }
        }
    }
}
