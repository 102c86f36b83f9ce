//! # Backoff tuning for reconnect loops.
//!
//! [`BackoffPolicy`] holds the fixed parameters that shape retry delays:
//! - [`BackoffPolicy::base_delay`] the delay of the first attempt;
//! - [`BackoffPolicy::max_delay`] the cap applied **before** jitter;
//! - [`BackoffPolicy::multiplier`] the growth factor per attempt;
//! - [`BackoffPolicy::jitter_factor`] the additive jitter range as a fraction of the capped delay;
//! - [`BackoffPolicy::max_retries`] the retry budget (`None` = unbounded).
//!
//! The capped delay for attempt `n` is `min(base_delay × multiplier^n, max_delay)`.
//! It depends only on `n`, so the jitter added on top never feeds back into later
//! attempts. The stateful side (attempt counters, jitter draws) lives in
//! [`Backoff`](crate::Backoff).
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use rebound::BackoffPolicy;
//!
//! let policy = BackoffPolicy {
//!     base_delay: Duration::from_secs(1),
//!     max_delay: Duration::from_secs(5),
//!     multiplier: 2.0,
//!     jitter_factor: 0.0,
//!     max_retries: None,
//! };
//!
//! assert_eq!(policy.capped_delay(0), Duration::from_secs(1));
//! assert_eq!(policy.capped_delay(2), Duration::from_secs(4));
//! // 1s × 2^3 = 8s → capped at max=5s
//! assert_eq!(policy.capped_delay(3), Duration::from_secs(5));
//! ```

use std::time::Duration;

use crate::error::ConfigError;

/// Retry backoff tuning.
///
/// No range checks happen on construction. Degenerate values (`multiplier < 1`,
/// `max_delay < base_delay`, negative jitter) are accepted and produce shrinking,
/// flat or jitter-free sequences; see [`BackoffPolicy::validate`] for an opt-in check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    /// Delay before jitter for the first attempt.
    pub base_delay: Duration,
    /// Upper bound on the pre-jitter delay.
    pub max_delay: Duration,
    /// Exponential growth factor per attempt (`>= 1.0` expected).
    pub multiplier: f64,
    /// Upper bound of the added jitter, as a fraction of the capped delay (`>= 0.0` expected).
    pub jitter_factor: f64,
    /// Retries allowed between resets; `None` retries forever.
    pub max_retries: Option<u32>,
}

impl Default for BackoffPolicy {
    /// Generic reconnect tuning:
    /// - `base_delay = 2s`;
    /// - `max_delay = 60s`;
    /// - `multiplier = 2.0`;
    /// - `jitter_factor = 0.25`;
    /// - `max_retries = None` (unbounded).
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
            jitter_factor: 0.25,
            max_retries: None,
        }
    }
}

impl BackoffPolicy {
    /// Tuning for a long-lived broker connection that should never give up.
    ///
    /// `2s → 120s`, multiplier `2.0`, jitter `0.25`, unbounded retries.
    pub const fn persistent_broker() -> Self {
        Self {
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(120),
            multiplier: 2.0,
            jitter_factor: 0.25,
            max_retries: None,
        }
    }

    /// Tuning for a short collector fetch that gives up quickly so the caller
    /// can fall back to cached data.
    ///
    /// `1s → 10s`, multiplier `2.0`, jitter `0.15`, at most 3 retries.
    pub const fn bounded_collector() -> Self {
        Self {
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
            jitter_factor: 0.15,
            max_retries: Some(3),
        }
    }

    /// Returns a copy with a different first delay.
    pub const fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Returns a copy with a different pre-jitter cap.
    pub const fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Returns a copy with a different growth factor.
    pub const fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Returns a copy with a different jitter fraction.
    pub const fn with_jitter_factor(mut self, jitter_factor: f64) -> Self {
        self.jitter_factor = jitter_factor;
        self
    }

    /// Returns a copy limited to `max_retries` retries between resets.
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Returns a copy that retries forever.
    pub const fn with_unlimited_retries(mut self) -> Self {
        self.max_retries = None;
        self
    }

    /// Computes the pre-jitter delay for the given attempt number (0-indexed).
    ///
    /// The result is `base_delay × multiplier^attempt`, clamped to [`BackoffPolicy::max_delay`].
    ///
    /// # Notes
    /// - Non-finite intermediate values (exponent overflow) clamp to `max_delay`.
    /// - A negative result (negative multiplier) saturates to zero.
    /// - If `multiplier` is below 1.0, delays shrink with higher attempts.
    pub fn capped_delay(&self, attempt: u32) -> Duration {
        let max_secs = self.max_delay.as_secs_f64();
        let clamped_exp = attempt.min(i32::MAX as u32) as i32;
        let raw_secs = self.base_delay.as_secs_f64() * self.multiplier.powi(clamped_exp);

        if !raw_secs.is_finite() || raw_secs > max_secs {
            self.max_delay
        } else {
            secs_to_duration(raw_secs)
        }
    }

    /// Upper bound of the jitter range for a given capped delay.
    pub fn jitter_range(&self, capped: Duration) -> f64 {
        capped.as_secs_f64() * self.jitter_factor
    }

    /// Largest delay this policy can ever return: `max_delay × (1 + jitter_factor)`.
    pub fn max_jittered_delay(&self) -> Duration {
        let range = self.jitter_range(self.max_delay);
        self.max_delay.saturating_add(secs_to_duration(range))
    }

    /// Checks the tuning for values that make the backoff degenerate.
    ///
    /// Not called by [`Backoff`](crate::Backoff); construction stays permissive.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use rebound::{BackoffPolicy, ConfigError};
    ///
    /// assert!(BackoffPolicy::default().validate().is_ok());
    ///
    /// let shrinking = BackoffPolicy::default().with_multiplier(0.5);
    /// assert_eq!(
    ///     shrinking.validate(),
    ///     Err(ConfigError::InvalidMultiplier { multiplier: 0.5 })
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_delay.is_zero() {
            return Err(ConfigError::ZeroBaseDelay);
        }
        if self.max_delay < self.base_delay {
            return Err(ConfigError::MaxBelowBase {
                base: self.base_delay,
                max: self.max_delay,
            });
        }
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return Err(ConfigError::InvalidMultiplier {
                multiplier: self.multiplier,
            });
        }
        if !self.jitter_factor.is_finite() || self.jitter_factor < 0.0 {
            return Err(ConfigError::InvalidJitterFactor {
                jitter_factor: self.jitter_factor,
            });
        }
        Ok(())
    }
}

/// Seconds to `Duration`, saturating: negative/NaN → zero, overflow → `Duration::MAX`.
pub(crate) fn secs_to_duration(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}
