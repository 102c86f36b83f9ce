//! Backoff tuning and jitter.
//!
//! This module groups the knobs that control **how long** a reconnect loop waits
//! between attempts and **how many** attempts it gets.
//!
//! ## Contents
//! - [`BackoffPolicy`] how delays evolve (base / multiplier / max + jitter factor, retry budget)
//! - [`Preset`]        named tunings (persistent broker / bounded collector)
//! - [`JitterSource`]  where the additive jitter comes from
//!
//! ## Quick wiring
//! ```text
//! Preset ──► BackoffPolicy ──► Backoff<J: JitterSource>
//!                                 └─► next_delay(): capped_delay(attempt) + jitter
//! ```
//!
//! ## Defaults
//! - `BackoffPolicy::default()` → base=2s, multiplier=2.0, max=60s, jitter=0.25, unbounded.
//! - `ThreadJitter` as the jitter source; inject a seeded rng or `FixedJitter` in tests.

mod backoff;
mod jitter;
mod preset;

pub use backoff::BackoffPolicy;
pub(crate) use backoff::secs_to_duration;
pub use jitter::{FixedJitter, JitterSource, ThreadJitter};
pub use preset::Preset;
