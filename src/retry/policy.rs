use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::RetryError;

/// Validated retry configuration owned by a [`Retry`](super::Retry) instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Delay before the second attempt, in milliseconds
    pub base_delay_ms: u64,
    /// Total number of invocations permitted, including the first
    pub max_attempts: u32,
    /// Double the delay after every wait
    pub exponential: bool,
}

impl RetryPolicy {
    /// 125ms base delay, 4 attempts, exponential backoff
    pub const DEFAULT: RetryPolicy = RetryPolicy {
        base_delay_ms: 125,
        max_attempts: 4,
        exponential: true,
    };

    /// Checks the policy constraints
    pub fn validate(&self) -> Result<(), RetryError> {
        if self.max_attempts == 0 {
            return Err(RetryError::InvalidPolicy(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Delay awaited after the given failed attempt (1-based)
    ///
    /// Returns `None` for the last permitted attempt, which is never followed by a wait.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt >= self.max_attempts {
            return None;
        }
        let ms = if self.exponential {
            let factor = 1u64.checked_shl(attempt - 1).unwrap_or(u64::MAX);
            self.base_delay_ms.saturating_mul(factor)
        } else {
            self.base_delay_ms
        };
        Some(Duration::from_millis(ms))
    }

    /// Full schedule of delays a run that never succeeds would wait through
    pub fn schedule(&self) -> Vec<Duration> {
        (1..self.max_attempts)
            .filter_map(|attempt| self.delay_after(attempt))
            .collect()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Partial policy used for construction and per-call overrides
///
/// Unset fields fall back to the policy the options are resolved against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryOptions {
    /// Override for [`RetryPolicy::base_delay_ms`]
    pub base_delay_ms: Option<u64>,
    /// Override for [`RetryPolicy::max_attempts`]
    pub max_attempts: Option<u32>,
    /// Override for [`RetryPolicy::exponential`]
    pub exponential: Option<bool>,
}

impl RetryOptions {
    /// Options with every field unset
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base delay in milliseconds
    pub fn base_delay_ms(mut self, ms: u64) -> Self {
        self.base_delay_ms = Some(ms);
        self
    }

    /// Sets the attempt budget
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Enables or disables exponential doubling
    pub fn exponential(mut self, exponential: bool) -> Self {
        self.exponential = Some(exponential);
        self
    }

    /// Merges these options over `base` without touching either
    pub fn resolve(&self, base: &RetryPolicy) -> RetryPolicy {
        RetryPolicy {
            base_delay_ms: self.base_delay_ms.unwrap_or(base.base_delay_ms),
            max_attempts: self.max_attempts.unwrap_or(base.max_attempts),
            exponential: self.exponential.unwrap_or(base.exponential),
        }
    }
}

impl From<RetryPolicy> for RetryOptions {
    fn from(policy: RetryPolicy) -> Self {
        Self {
            base_delay_ms: Some(policy.base_delay_ms),
            max_attempts: Some(policy.max_attempts),
            exponential: Some(policy.exponential),
        }
    }
}
