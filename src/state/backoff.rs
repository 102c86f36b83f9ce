//! # Backoff: per-connection retry state.
//!
//! Tracks one reconnect loop's progress through a [`BackoffPolicy`]:
//! - computes the next delay (capped exponential + additive jitter),
//! - counts attempts since the last success and over the whole lifetime,
//! - answers whether the retry budget allows another attempt.
//!
//! ## Caller loop
//! ```text
//! connection manager                         Backoff
//! ──────────────────                         ───────
//! connect() ── Err (retryable) ──► should_retry()? ── false ──► give up / use cache
//!                                      │ true
//!                                      ▼
//!                                 next_delay() ─► attempt += 1, total_attempts += 1
//!                                      ▼
//!                                 sleep(delay) (or wait_once())
//!                                      ▼
//! connect() ── Ok ───────────────► reset()     ─► attempt = 0
//! ```
//!
//! ## Rules
//! - One instance per connection; `&mut self` on every mutation, no internal locking.
//! - The retry limit is **advisory**: `next_delay` keeps answering past it.
//! - `total_attempts` is a lifetime counter and survives `reset`.
//! - Jitter only adds: every delay is `>= policy.capped_delay(attempt)`.

use std::time::{Duration, SystemTime};

use tokio::time;
use tracing::{debug, trace};

use crate::policies::{BackoffPolicy, JitterSource, ThreadJitter, secs_to_duration};

/// Snapshot of a [`Backoff`]'s counters, for diagnostics and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackoffState {
    /// Delays computed since the last reset.
    pub attempt: u32,
    /// Delays computed over the whole lifetime.
    pub total_attempts: u64,
    /// Wall-clock time of the last delay computation.
    pub last_attempt_at: Option<SystemTime>,
}

/// Stateful backoff for a single reconnect loop.
///
/// Parameterized over its [`JitterSource`] so tests can inject a seeded generator
/// or a [`FixedJitter`](crate::FixedJitter).
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use rebound::{Backoff, BackoffPolicy, FixedJitter};
///
/// let policy = BackoffPolicy::default()
///     .with_base_delay(Duration::from_secs(1))
///     .with_max_delay(Duration::from_secs(5))
///     .with_max_retries(3);
/// let mut backoff = Backoff::with_jitter(policy, FixedJitter::new(0.0));
///
/// let delays: Vec<Duration> = backoff.by_ref().collect();
/// assert_eq!(
///     delays,
///     [Duration::from_secs(1), Duration::from_secs(2), Duration::from_secs(4)]
/// );
/// assert!(!backoff.should_retry());
///
/// backoff.reset();
/// assert!(backoff.should_retry());
/// assert_eq!(backoff.total_attempts(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct Backoff<J = ThreadJitter> {
    policy: BackoffPolicy,
    jitter: J,
    attempt: u32,
    total_attempts: u64,
    last_attempt_at: Option<SystemTime>,
}

impl Backoff<ThreadJitter> {
    /// Creates a backoff drawing jitter from the thread-local generator.
    pub fn new(policy: BackoffPolicy) -> Self {
        Self::with_jitter(policy, ThreadJitter)
    }

    /// Backoff for a long-lived broker connection (see [`BackoffPolicy::persistent_broker`]).
    pub fn persistent_broker() -> Self {
        Self::new(BackoffPolicy::persistent_broker())
    }

    /// Backoff for a bounded collector fetch (see [`BackoffPolicy::bounded_collector`]).
    pub fn bounded_collector() -> Self {
        Self::new(BackoffPolicy::bounded_collector())
    }
}

impl Default for Backoff<ThreadJitter> {
    fn default() -> Self {
        Self::new(BackoffPolicy::default())
    }
}

impl<J> Backoff<J> {
    /// Creates a backoff drawing jitter from `jitter`.
    pub fn with_jitter(policy: BackoffPolicy, jitter: J) -> Self {
        Self {
            policy,
            jitter,
            attempt: 0,
            total_attempts: 0,
            last_attempt_at: None,
        }
    }

    /// The tuning this backoff was built with.
    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// Delays computed since construction or the last [`reset`](Self::reset).
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Delays computed over the whole lifetime; never reset.
    pub fn total_attempts(&self) -> u64 {
        self.total_attempts
    }

    /// Wall-clock time of the last [`next_delay`](Self::next_delay) call.
    pub fn last_attempt_at(&self) -> Option<SystemTime> {
        self.last_attempt_at
    }

    /// Returns a copy of the counters.
    pub fn state(&self) -> BackoffState {
        BackoffState {
            attempt: self.attempt,
            total_attempts: self.total_attempts,
            last_attempt_at: self.last_attempt_at,
        }
    }

    /// Whether the retry budget allows another attempt.
    ///
    /// Always `true` without `max_retries`; otherwise `attempt < max_retries`.
    /// Check this **before** each retry; [`next_delay`](Self::next_delay) does not.
    pub fn should_retry(&self) -> bool {
        match self.policy.max_retries {
            None => true,
            Some(max) => self.attempt < max,
        }
    }

    /// Retries left before [`should_retry`](Self::should_retry) turns `false`.
    ///
    /// `None` when retries are unbounded.
    pub fn remaining_retries(&self) -> Option<u32> {
        self.policy
            .max_retries
            .map(|max| max.saturating_sub(self.attempt))
    }

    /// Restarts the exponential ramp from `base_delay`.
    ///
    /// Call once per successful reconnect. Leaves `total_attempts` and the
    /// tuning untouched.
    pub fn reset(&mut self) {
        debug!(
            attempt = self.attempt,
            total_attempts = self.total_attempts,
            "backoff reset"
        );
        self.attempt = 0;
    }
}

impl<J: JitterSource> Backoff<J> {
    /// Computes the delay before the next attempt and advances the counters.
    ///
    /// For the pre-increment attempt `n`:
    /// `capped = min(base_delay × multiplier^n, max_delay)`, then a jitter drawn
    /// uniformly from `[0, capped × jitter_factor]` is **added**.
    pub fn next_delay(&mut self) -> Duration {
        let n = self.attempt;
        let capped = self.policy.capped_delay(n);
        let jitter = secs_to_duration(self.jitter.sample_jitter(self.policy.jitter_range(capped)));
        let delay = capped.saturating_add(jitter);

        self.attempt = self.attempt.saturating_add(1);
        self.total_attempts = self.total_attempts.saturating_add(1);
        self.last_attempt_at = Some(SystemTime::now());

        trace!(
            attempt = n,
            total_attempts = self.total_attempts,
            capped = ?capped,
            jitter = ?jitter,
            delay = ?delay,
            "backoff delay computed"
        );
        delay
    }

    /// Computes the next delay and sleeps for it on the tokio timer.
    ///
    /// Returns the delay waited. Not cancellable on its own: race it against a
    /// shutdown signal (e.g. `tokio::select!`) if the loop must stop early.
    pub async fn wait_once(&mut self) -> Duration {
        let delay = self.next_delay();
        debug!(attempt = self.attempt, delay = ?delay, "backoff waiting");
        time::sleep(delay).await;
        delay
    }
}

/// Yields delays while the retry budget lasts.
///
/// After exhaustion the iterator returns `None` until [`Backoff::reset`] is called,
/// so it is not fused.
impl<J: JitterSource> Iterator for Backoff<J> {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.should_retry() {
            Some(self.next_delay())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::FixedJitter;
    use rand::{SeedableRng, rngs::StdRng};

    fn flat(base_s: u64, max_s: u64, multiplier: f64) -> Backoff<FixedJitter> {
        let policy = BackoffPolicy {
            base_delay: Duration::from_secs(base_s),
            max_delay: Duration::from_secs(max_s),
            multiplier,
            jitter_factor: 0.0,
            max_retries: None,
        };
        Backoff::with_jitter(policy, FixedJitter::new(0.0))
    }

    fn within(delay: Duration, lo: f64, hi: f64) -> bool {
        const EPS: f64 = 1e-9;
        let s = delay.as_secs_f64();
        s >= lo - EPS && s <= hi + EPS
    }

    #[test]
    fn test_fresh_state() {
        let b: Backoff = Backoff::default();
        assert_eq!(
            b.state(),
            BackoffState {
                attempt: 0,
                total_attempts: 0,
                last_attempt_at: None,
            }
        );
        assert_eq!(*b.policy(), BackoffPolicy::default());
        assert!(b.should_retry());
        assert_eq!(b.remaining_retries(), None);
    }

    #[test]
    fn test_zero_jitter_sequence() {
        let mut b = flat(1, 5, 2.0);
        let got: Vec<Duration> = (0..5).map(|_| b.next_delay()).collect();
        let want: Vec<Duration> = [1, 2, 4, 5, 5].map(Duration::from_secs).to_vec();
        assert_eq!(got, want);
    }

    #[test]
    fn test_zero_jitter_is_reproducible_across_instances() {
        let policy = BackoffPolicy::default().with_jitter_factor(0.0);
        let mut a = Backoff::new(policy);
        let mut b = Backoff::new(policy);
        for _ in 0..12 {
            assert_eq!(a.next_delay(), b.next_delay());
        }
    }

    #[test]
    fn test_jitter_is_additive_and_bounded() {
        let policy = BackoffPolicy::default().with_jitter_factor(0.5);
        let mut b = Backoff::with_jitter(policy, StdRng::seed_from_u64(9));
        for n in 0..30 {
            let capped = policy.capped_delay(n).as_secs_f64();
            let d = b.next_delay();
            assert!(
                within(d, capped, capped * 1.5),
                "attempt {n}: {d:?} outside [{capped}, {}]",
                capped * 1.5
            );
            assert!(d <= policy.max_jittered_delay());
        }
    }

    #[test]
    fn test_full_fixed_jitter_hits_upper_bound() {
        let policy = BackoffPolicy::persistent_broker();
        let mut b = Backoff::with_jitter(policy, FixedJitter::new(1.0));
        assert_eq!(b.next_delay(), Duration::from_millis(2500));
        for _ in 0..20 {
            b.next_delay();
        }
        assert_eq!(b.next_delay(), Duration::from_secs(150));
    }

    #[test]
    fn test_independent_sources_diverge() {
        let policy = BackoffPolicy::persistent_broker();
        let mut a = Backoff::with_jitter(policy, StdRng::seed_from_u64(1));
        let mut b = Backoff::with_jitter(policy, StdRng::seed_from_u64(2));
        let da: Vec<Duration> = (0..5).map(|_| a.next_delay()).collect();
        let db: Vec<Duration> = (0..5).map(|_| b.next_delay()).collect();
        assert_ne!(da, db);
    }

    #[test]
    fn test_counters_and_reset() {
        let mut b = flat(1, 10, 2.0);
        for i in 1..=4u32 {
            b.next_delay();
            assert_eq!(b.attempt(), i);
            assert_eq!(b.total_attempts(), u64::from(i));
            assert!(u64::from(b.attempt()) <= b.total_attempts());
        }

        b.reset();
        assert_eq!(b.attempt(), 0);
        assert_eq!(b.total_attempts(), 4);

        assert_eq!(b.next_delay(), Duration::from_secs(1));
        assert_eq!(b.attempt(), 1);
        assert_eq!(b.total_attempts(), 5);
    }

    #[test]
    fn test_reset_keeps_timestamp_and_policy() {
        let mut b = flat(1, 10, 2.0);
        let before = SystemTime::now();
        b.next_delay();
        let stamp = b.last_attempt_at().expect("timestamp recorded");
        assert!(stamp >= before);

        b.reset();
        assert_eq!(b.last_attempt_at(), Some(stamp));
        assert_eq!(b.policy().base_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_should_retry_bounded() {
        let mut b = Backoff::bounded_collector();
        for left in (1..=3).rev() {
            assert_eq!(b.remaining_retries(), Some(left));
            assert!(b.should_retry());
            b.next_delay();
        }
        assert!(!b.should_retry());
        assert_eq!(b.remaining_retries(), Some(0));

        // limit is advisory
        b.next_delay();
        assert!(!b.should_retry());
        assert_eq!(b.remaining_retries(), Some(0));

        b.reset();
        assert!(b.should_retry());
        assert_eq!(b.remaining_retries(), Some(3));
    }

    #[test]
    fn test_zero_retry_budget() {
        let b = Backoff::new(BackoffPolicy::default().with_max_retries(0));
        assert!(!b.should_retry());
    }

    #[test]
    fn test_should_retry_unbounded() {
        let mut b = Backoff::persistent_broker();
        for _ in 0..1_000 {
            assert!(b.should_retry());
            b.next_delay();
        }
    }

    #[test]
    fn test_iterator_stops_at_budget_and_revives_after_reset() {
        let policy = BackoffPolicy::bounded_collector();
        let mut b = Backoff::with_jitter(policy, FixedJitter::new(0.0));

        assert_eq!(b.by_ref().count(), 3);
        assert_eq!(b.next(), None);

        b.reset();
        assert_eq!(b.next(), Some(Duration::from_secs(1)));
        assert_eq!(b.total_attempts(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_once_sleeps_for_returned_delay() {
        let mut b = flat(1, 5, 2.0);

        let start = time::Instant::now();
        let waited = b.wait_once().await;
        assert_eq!(waited, Duration::from_secs(1));
        assert!(start.elapsed() >= waited);
        assert!(start.elapsed() < waited + Duration::from_millis(2));

        let start = time::Instant::now();
        let waited = b.wait_once().await;
        assert_eq!(waited, Duration::from_secs(2));
        assert!(start.elapsed() >= waited);
        assert_eq!(b.attempt(), 2);
    }
}
