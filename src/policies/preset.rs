//! # Named backoff presets.
//!
//! [`Preset`] names the two tuning choices reconnect loops usually need, so a host
//! application can pick one from its own config file or command line by label.
//!
//! - [`Preset::PersistentBroker`] long-lived connection; retry forever.
//! - [`Preset::BoundedCollector`] short fetch; give up after 3 retries and fall back.
//!
//! ## Choosing a preset
//!
//! **Broker sessions** (the connection is expected to come back eventually):
//! ```text
//! Preset::PersistentBroker  → 2s, 4s, 8s, ... capped at 120s (+ up to 25% jitter), never gives up
//! ```
//!
//! **Collector fetches** (stale cached data beats waiting):
//! ```text
//! Preset::BoundedCollector  → 1s, 2s, 4s (+ up to 15% jitter), then should_retry() == false
//! ```
//!
//! ## Example
//! ```rust
//! use rebound::{BackoffPolicy, Preset};
//!
//! let preset: Preset = "bounded-collector".parse().unwrap();
//! assert_eq!(preset.policy(), BackoffPolicy::bounded_collector());
//! assert_eq!(preset.to_string(), "bounded-collector");
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::policies::backoff::BackoffPolicy;

/// Named tuning for a class of connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Long-lived broker connection: `2s → 120s`, ×2, 25% jitter, unbounded retries.
    PersistentBroker,
    /// Bounded collector fetch: `1s → 10s`, ×2, 15% jitter, at most 3 retries.
    BoundedCollector,
}

impl Preset {
    /// Every preset, in declaration order.
    pub const ALL: [Preset; 2] = [Preset::PersistentBroker, Preset::BoundedCollector];

    /// Returns the tuning this preset stands for.
    pub const fn policy(self) -> BackoffPolicy {
        match self {
            Preset::PersistentBroker => BackoffPolicy::persistent_broker(),
            Preset::BoundedCollector => BackoffPolicy::bounded_collector(),
        }
    }

    /// Returns the stable kebab-case label used for parsing and display.
    pub const fn as_label(self) -> &'static str {
        match self {
            Preset::PersistentBroker => "persistent-broker",
            Preset::BoundedCollector => "bounded-collector",
        }
    }
}

impl From<Preset> for BackoffPolicy {
    fn from(preset: Preset) -> Self {
        preset.policy()
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    /// Parses a label, ignoring ASCII case, surrounding whitespace and `_` vs `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Preset::ALL
            .into_iter()
            .find(|p| p.as_label() == normalized)
            .ok_or_else(|| ConfigError::UnknownPreset {
                name: s.to_string(),
            })
    }
}
