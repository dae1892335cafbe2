//! Retry backoff for failed phases
//!
//! Exponential backoff with optional jitter, applied between retries of a
//! phase that hit a communication error.

use std::time::Duration;

use rand::Rng;

/// Retry delay policy
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Backoff multiplier for exponential delay
    pub backoff_multiplier: f64,
    /// Whether to add ±25% jitter to delays
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Create from configuration values
    pub fn from_config(
        initial_delay_ms: u64,
        max_delay_ms: u64,
        backoff_multiplier: f64,
        jitter: bool,
    ) -> Self {
        Self {
            initial_delay: Duration::from_millis(initial_delay_ms),
            max_delay: Duration::from_millis(max_delay_ms),
            backoff_multiplier,
            jitter,
        }
    }

    /// No waiting between retries
    pub fn immediate() -> Self {
        Self {
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
            jitter: false,
        }
    }

    /// Delay before retry number `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;

        // delay = initial_delay * (multiplier ^ (attempt - 1))
        let secs = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        let mut delay = if secs.is_finite() && secs < self.max_delay.as_secs_f64() {
            Duration::from_secs_f64(secs.max(0.0))
        } else {
            self.max_delay
        };

        if self.jitter && !delay.is_zero() {
            let jitter_range = delay.as_millis() as f64 * 0.25;
            let jitter = rand::thread_rng().gen_range(-jitter_range..=jitter_range);
            let delay_ms = (delay.as_millis() as f64 + jitter).max(0.0);
            delay = Duration::from_millis(delay_ms as u64);
        }

        delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(jitter: bool) -> RetryPolicy {
        RetryPolicy::from_config(100, 1000, 2.0, jitter)
    }

    #[test]
    fn test_exponential_backoff() {
        let p = policy(false);
        assert_eq!(p.delay_for(1), Duration::from_millis(100));
        assert_eq!(p.delay_for(2), Duration::from_millis(200));
        assert_eq!(p.delay_for(3), Duration::from_millis(400));
    }

    #[test]
    fn test_capped_at_max_delay() {
        let p = policy(false);
        assert_eq!(p.delay_for(5), Duration::from_millis(1000));
        assert_eq!(p.delay_for(u32::MAX), Duration::from_millis(1000));
    }

    #[test]
    fn test_jitter_within_quarter() {
        let p = policy(true);
        for _ in 0..50 {
            let d = p.delay_for(2).as_millis();
            assert!((150..=250).contains(&d), "delay {} out of bounds", d);
        }
    }

    #[test]
    fn test_immediate() {
        assert_eq!(RetryPolicy::immediate().delay_for(7), Duration::ZERO);
    }
}
