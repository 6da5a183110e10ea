//! Commit retry policy.
//!
//! Optimistic commits re-read state and try again on conflict. The policy
//! only decides how many attempts an operation gets; there is no backoff.

use crate::api::RuntimeError;

pub trait RetryPolicy: Send + Sync {
    /// Total attempts allowed, including the first.
    fn max_attempts(&self) -> u32;

    /// Whether another attempt may follow attempt number `attempt` (1-based).
    fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts()
    }

    /// Error reported once `operation` ran out of attempts.
    fn exhausted(&self, operation: &'static str) -> RuntimeError {
        tracing::error!(target: "tower", operation, attempts = self.max_attempts(), "commit retries exhausted");
        RuntimeError::RetriesExhausted {
            operation,
            attempts: self.max_attempts(),
        }
    }
}

/// Fixed number of immediate attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAttempts(pub u32);

impl FixedAttempts {
    pub const DEFAULT: u32 = 5;
}

impl Default for FixedAttempts {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl RetryPolicy for FixedAttempts {
    fn max_attempts(&self) -> u32 {
        self.0.max(1)
    }
}
