//! Error types for policy configuration.
//!
//! The backoff algorithm itself never fails. Errors only come from the opt-in
//! checks a host application may run on its configuration:
//!
//! - [`ConfigError`] returned by [`BackoffPolicy::validate`](crate::BackoffPolicy::validate)
//!   and by parsing a [`Preset`](crate::Preset) label.
//!
//! Like the rest of the crate's errors it provides `as_label` / `as_message`
//! helpers for logs and metrics.

use std::time::Duration;
use thiserror::Error;

/// # Rejected policy configuration.
///
/// Constructing a [`Backoff`](crate::Backoff) never produces this error: the
/// policy accepts degenerate tuning and behaves degenerately. Callers that want
/// stricter input handling run [`BackoffPolicy::validate`](crate::BackoffPolicy::validate)
/// themselves.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The first delay is zero, so the exponential ramp never grows.
    #[error("base delay must be greater than zero")]
    ZeroBaseDelay,

    /// The cap is below the first delay; every attempt collapses to the cap.
    #[error("max delay {max:?} is below base delay {base:?}")]
    MaxBelowBase {
        /// Configured base delay.
        base: Duration,
        /// Configured max delay.
        max: Duration,
    },

    /// Multiplier is below 1.0 or not finite; delays would shrink or explode.
    #[error("multiplier must be a finite value >= 1.0, got {multiplier}")]
    InvalidMultiplier {
        /// Configured multiplier.
        multiplier: f64,
    },

    /// Jitter factor is negative or not finite.
    #[error("jitter factor must be a finite value >= 0.0, got {jitter_factor}")]
    InvalidJitterFactor {
        /// Configured jitter factor.
        jitter_factor: f64,
    },

    /// A preset label did not match any known preset.
    #[error("unknown backoff preset {name:?}")]
    UnknownPreset {
        /// The label that failed to parse.
        name: String,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use rebound::ConfigError;
    ///
    /// assert_eq!(ConfigError::ZeroBaseDelay.as_label(), "config_zero_base_delay");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::ZeroBaseDelay => "config_zero_base_delay",
            ConfigError::MaxBelowBase { .. } => "config_max_below_base",
            ConfigError::InvalidMultiplier { .. } => "config_invalid_multiplier",
            ConfigError::InvalidJitterFactor { .. } => "config_invalid_jitter_factor",
            ConfigError::UnknownPreset { .. } => "config_unknown_preset",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ConfigError::ZeroBaseDelay => "base_delay=0s".to_string(),
            ConfigError::MaxBelowBase { base, max } => {
                format!("max_delay={max:?} < base_delay={base:?}")
            }
            ConfigError::InvalidMultiplier { multiplier } => format!("multiplier={multiplier}"),
            ConfigError::InvalidJitterFactor { jitter_factor } => {
                format!("jitter_factor={jitter_factor}")
            }
            ConfigError::UnknownPreset { name } => format!("preset={name:?}"),
        }
    }
}
