//! Exponential backoff between forward attempts

use std::time::Duration;

use rand::Rng;

/// Exponential backoff configuration
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    /// Delay before the first retry, in milliseconds
    pub initial_delay_ms: u64,
    /// Maximum delay in milliseconds
    pub max_delay_ms: u64,
    /// Multiplier for exponential growth
    pub multiplier: f64,
    /// Jitter factor (0.0 to 1.0)
    pub jitter_factor: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 250,
            max_delay_ms: 5_000,
            multiplier: 2.0,
            jitter_factor: 0.1, // 10% jitter
        }
    }
}

/// Exponential backoff calculator with jitter
pub struct ExponentialBackoff {
    config: BackoffConfig,
    current_delay_ms: f64,
    attempt: u32,
}

impl ExponentialBackoff {
    pub fn new(config: BackoffConfig) -> Self {
        let initial = config.initial_delay_ms as f64;
        Self {
            config,
            current_delay_ms: initial,
            attempt: 0,
        }
    }

    /// Delay to wait before the next attempt
    pub fn next_delay(&mut self) -> Duration {
        self.attempt += 1;

        let base = self.current_delay_ms.min(self.config.max_delay_ms as f64);
        self.current_delay_ms =
            (base * self.config.multiplier).min(self.config.max_delay_ms as f64);

        let jitter_range = base * self.config.jitter_factor;
        let delay = if jitter_range > 0.0 {
            let jitter = rand::rng().random_range(-jitter_range..jitter_range);
            (base + jitter).max(1.0)
        } else {
            base.max(1.0)
        };

        Duration::from_millis(delay as u64)
    }

    /// Number of delays handed out so far
    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_jitter(initial: u64, max: u64, multiplier: f64) -> ExponentialBackoff {
        ExponentialBackoff::new(BackoffConfig {
            initial_delay_ms: initial,
            max_delay_ms: max,
            multiplier,
            jitter_factor: 0.0, // No jitter for predictable testing
        })
    }

    #[test]
    fn test_exponential_backoff_doubles() {
        let mut backoff = no_jitter(100, 10_000, 2.0);

        assert_eq!(backoff.next_delay(), Duration::from_millis(100));
        assert_eq!(backoff.next_delay(), Duration::from_millis(200));
        assert_eq!(backoff.next_delay(), Duration::from_millis(400));
        assert_eq!(backoff.attempt(), 3);
    }

    #[test]
    fn test_exponential_backoff_caps_at_max() {
        let mut backoff = no_jitter(1000, 5000, 10.0);

        for _ in 0..5 {
            backoff.next_delay();
        }

        assert_eq!(backoff.next_delay(), Duration::from_millis(5000));
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let mut backoff = ExponentialBackoff::new(BackoffConfig {
            initial_delay_ms: 1000,
            max_delay_ms: 1000,
            multiplier: 2.0,
            jitter_factor: 0.1,
        });

        for _ in 0..20 {
            let delay = backoff.next_delay().as_millis();
            assert!((900..=1100).contains(&delay));
        }
    }

    #[test]
    fn test_zero_initial_delay_does_not_panic() {
        let mut backoff = ExponentialBackoff::new(BackoffConfig {
            initial_delay_ms: 0,
            ..BackoffConfig::default()
        });
        assert_eq!(backoff.next_delay(), Duration::from_millis(1));
    }
}
