//! Per-connection backoff state.
//!
//! The only public API from this module is [`Backoff`] (plus its [`BackoffState`]
//! snapshot), which turns a [`BackoffPolicy`](crate::BackoffPolicy) into a
//! sequence of delays for one reconnect loop.
//!
//! Internal modules:
//! - [`backoff`]: delay computation, attempt bookkeeping, retry budget, wait-once.

mod backoff;

pub use backoff::{Backoff, BackoffState};
