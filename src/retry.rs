//! Bounded retry with a fixed blocking backoff
//!
//! Used by the transfer engine for every chunk and by the driver for the
//! chip identity check.

use embedded_hal::delay::DelayNs;

/// How often an operation is attempted and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryPolicy {
    /// Maximum number of attempts (a value of 0 is treated as 1)
    pub attempts: u8,
    /// Blocking delay between two attempts, in microseconds
    pub backoff_us: u32,
}

impl RetryPolicy {
    /// Per-chunk bus transfer policy: 3 attempts, 2 ms apart
    pub const TRANSFER: Self = Self::new(3, 2_000);

    /// Chip identity check policy: 3 reads, back to back
    pub const IDENTITY: Self = Self::new(3, 0);

    /// Create a new retry policy
    pub const fn new(attempts: u8, backoff_us: u32) -> Self {
        Self {
            attempts,
            backoff_us,
        }
    }

    /// Worst-case time spent sleeping before the policy gives up
    #[must_use]
    pub const fn worst_case_backoff_us(self) -> u32 {
        let attempts = if self.attempts == 0 { 1 } else { self.attempts };
        self.backoff_us.saturating_mul(attempts as u32 - 1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::TRANSFER
    }
}

/// Run `attempt` until it succeeds or the policy is exhausted
///
/// `attempt` receives the 1-based attempt number. The delay runs only between
/// attempts, never after the last one. On exhaustion the error of the final
/// attempt is returned.
///
/// # Errors
///
/// Returns the error of the last attempt when every attempt failed.
pub fn retry<T, E, D, F>(policy: RetryPolicy, delay: &mut D, mut attempt: F) -> Result<T, E>
where
    D: DelayNs + ?Sized,
    F: FnMut(u8) -> Result<T, E>,
{
    let attempts = policy.attempts.max(1);
    let mut n = 1;
    loop {
        match attempt(n) {
            Ok(value) => return Ok(value),
            Err(e) if n >= attempts => return Err(e),
            Err(_) => {
                if policy.backoff_us > 0 {
                    delay.delay_us(policy.backoff_us);
                }
                n += 1;
            }
        }
    }
}
