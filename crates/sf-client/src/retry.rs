//! Backoff configuration for the token-refresh retry loop.

use std::time::Duration;

/// Configuration for the delay applied before each token refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Base delay before a refresh.
    pub base_delay: Duration,
    /// Upper bound on any computed delay.
    pub max_delay: Duration,
    /// Backoff strategy to use.
    pub backoff: BackoffStrategy,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff: BackoffStrategy::Logarithmic,
        }
    }
}

impl RetryConfig {
    /// Set the base delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Set the max delay.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the backoff strategy.
    pub fn with_backoff(mut self, backoff: BackoffStrategy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Delay to wait before the refresh that follows failed attempt `attempt`.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.backoff
            .delay(attempt, self.base_delay, self.max_delay)
    }
}

/// Backoff strategy for determining refresh delays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackoffStrategy {
    /// Base delay plus `ln(attempt)` microseconds.
    ///
    /// `ln(0)` is undefined, so attempt 0 is treated as attempt 1 and both
    /// contribute nothing beyond the base delay.
    Logarithmic,
    /// Constant delay between retries.
    Constant,
    /// Exponential increase in delay (delay * factor^attempt).
    ///
    /// Products beyond `max_delay` are capped, and a non-positive or
    /// non-finite result falls back to zero.
    Exponential { factor: f64 },
}

impl BackoffStrategy {
    /// Calculate the delay for a given attempt number (0-indexed).
    pub fn delay(&self, attempt: u32, base_delay: Duration, max_delay: Duration) -> Duration {
        let delay = match self {
            BackoffStrategy::Logarithmic => {
                let micros = f64::from(attempt.max(1)).ln();
                base_delay + Duration::from_secs_f64(micros / 1_000_000.0)
            }
            BackoffStrategy::Constant => base_delay,
            BackoffStrategy::Exponential { factor } => {
                let multiplier = factor.powi(attempt.min(i32::MAX as u32) as i32);
                let secs = base_delay.as_secs_f64() * multiplier;
                if secs.is_nan() || secs <= 0.0 {
                    Duration::ZERO
                } else {
                    Duration::from_secs_f64(secs.min(max_delay.as_secs_f64()))
                }
            }
        };

        std::cmp::min(delay, max_delay)
    }
}
