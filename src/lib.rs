//! # rebound
//!
//! **Rebound** is a reconnection backoff policy for clients that must reattach to
//! an unreliable endpoint (a message broker, an HTTP collector) after a
//! disconnect or a failed request.
//!
//! It spaces retries out so a single client does not hammer a recovering
//! endpoint, and adds independent jitter so many clients recovering at the same
//! moment do not retry in lockstep (thundering herd).
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌──────────────┐        ┌──────────────────────────────────────────┐
//!   │    Preset    │──────► │  BackoffPolicy (immutable tuning, Copy)  │
//!   │ broker/coll. │        │  base_delay · multiplier · max_delay     │
//!   └──────────────┘        │  jitter_factor · max_retries             │
//!                           └────────────────────┬─────────────────────┘
//!                                                ▼
//!                           ┌──────────────────────────────────────────┐
//!                           │  Backoff<J: JitterSource>  (one per conn)│
//!                           │  attempt · total_attempts · last_attempt │
//!                           └──┬──────────────┬──────────────┬─────────┘
//!                              ▼              ▼              ▼
//!                         next_delay()   should_retry()    reset()
//!                              │
//!                              └─► wait_once() (tokio timer, optional)
//! ```
//!
//! ### Delay for attempt `n` (0-indexed, since last reset)
//! ```text
//! capped = min(base_delay × multiplier^n, max_delay)
//! delay  = capped + uniform[0, capped × jitter_factor]
//! ```
//!
//! ### Caller responsibilities
//! The connection manager around a [`Backoff`] decides whether a failure is
//! retryable, checks [`Backoff::should_retry`] before each retry, performs the
//! actual reconnect, calls [`Backoff::reset`] on success, and picks a fallback
//! (e.g. cached data) once the retry budget is spent.
//!
//! ## Features
//! | Area              | Description                                                        | Key types / traits                    |
//! |-------------------|--------------------------------------------------------------------|---------------------------------------|
//! | **Policies**      | Tuning, presets and pure capped-delay math.                        | [`BackoffPolicy`], [`Preset`]         |
//! | **State**         | Attempt counters, retry budget, delay sequence, async wait.        | [`Backoff`], [`BackoffState`]         |
//! | **Jitter**        | Injectable randomness (thread rng, seeded rng, fixed fraction).    | [`JitterSource`], [`ThreadJitter`], [`FixedJitter`] |
//! | **Errors**        | Opt-in configuration checks and preset parsing.                    | [`ConfigError`]                       |
//!
//! ## Logging
//! Delay computations are emitted as `tracing` events at `TRACE`, resets and
//! waits at `DEBUG`. The crate never installs a subscriber.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use rebound::Backoff;
//!
//! #[derive(Debug)]
//! struct Refused;
//!
//! async fn fetch(attempt: u32) -> Result<&'static str, Refused> {
//!     if attempt < 2 { Err(Refused) } else { Ok("fresh") }
//! }
//!
//! #[tokio::main(flavor = "current_thread", start_paused = true)]
//! async fn main() {
//!     let mut backoff = Backoff::bounded_collector();
//!     let mut tries = 0;
//!
//!     let data = loop {
//!         match fetch(tries).await {
//!             Ok(data) => {
//!                 backoff.reset();
//!                 break data;
//!             }
//!             Err(_) if backoff.should_retry() => {
//!                 let waited = backoff.wait_once().await;
//!                 assert!(waited >= Duration::from_secs(1));
//!                 tries += 1;
//!             }
//!             Err(_) => break "cached",
//!         }
//!     };
//!
//!     assert_eq!(data, "fresh");
//!     assert_eq!(backoff.total_attempts(), 2);
//! }
//! ```
mod error;
mod policies;
mod state;

// ---- Public re-exports ----

pub use error::ConfigError;
pub use policies::{BackoffPolicy, FixedJitter, JitterSource, Preset, ThreadJitter};
pub use state::{Backoff, BackoffState};
