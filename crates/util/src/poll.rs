//! Bounded polling for remote jobs that finish asynchronously.
//!
//! A [`PollPolicy`] fixes how many checks are made and how long to wait
//! between them. [`poll_until`] drives a check future until a caller supplied
//! predicate reports completion or the attempts run out. Check failures are
//! logged and counted as an attempt; they never abort the loop.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// Delay schedule between checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Wait the same delay between every check.
    Fixed,
    /// Multiply the delay by `factor` after each check, capped at `max_delay`.
    Exponential { factor: f64, max_delay: Duration },
}

/// Attempt and delay bounds for a polling loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
    pub backoff: Backoff,
}

impl PollPolicy {
    /// Fixed delay between a bounded number of attempts.
    pub const fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            backoff: Backoff::Fixed,
        }
    }

    /// Switch to exponential backoff.
    pub fn with_exponential_backoff(mut self, factor: f64, max_delay: Duration) -> Self {
        self.backoff = Backoff::Exponential { factor, max_delay };
        self
    }

    /// Delay to wait after the check numbered `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.delay,
            Backoff::Exponential { factor, max_delay } => {
                let exponent = attempt.saturating_sub(1) as i32;
                let scaled = self.delay.as_secs_f64() * factor.powi(exponent);
                if !scaled.is_finite() || scaled >= max_delay.as_secs_f64() {
                    max_delay
                } else {
                    Duration::from_secs_f64(scaled.max(0.0))
                }
            }
        }
    }
}

/// Result of a polling loop.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome<T> {
    /// The predicate accepted a check result.
    Done { value: T, attempts: u32 },
    /// Attempts ran out. `last` holds the most recent successful check, if any.
    Pending { last: Option<T>, attempts: u32 },
}

impl<T> PollOutcome<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, PollOutcome::Done { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Done { attempts, .. } | PollOutcome::Pending { attempts, .. } => *attempts,
        }
    }
}

/// Check until `is_done` accepts a result or `policy.max_attempts` checks have run.
///
/// The check receives the 1-based attempt number. No delay follows the final
/// attempt.
pub async fn poll_until<T, E, F, Fut, D>(policy: &PollPolicy, mut check: F, mut is_done: D) -> PollOutcome<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    D: FnMut(&T) -> bool,
{
    let mut last = None;
    for attempt in 1..=policy.max_attempts {
        match check(attempt).await {
            Ok(value) if is_done(&value) => return PollOutcome::Done { value, attempts: attempt },
            Ok(value) => last = Some(value),
            Err(error) => debug!(attempt, %error, "poll check failed"),
        }
        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.delay_after(attempt)).await;
        }
    }
    PollOutcome::Pending {
        last,
        attempts: policy.max_attempts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn stops_as_soon_as_the_predicate_accepts() {
        let policy = PollPolicy::fixed(5, Duration::from_secs(2));
        let outcome = poll_until(&policy, |attempt| async move { Ok::<_, String>(attempt) }, |value| *value == 3).await;
        assert_eq!(outcome, PollOutcome::Done { value: 3, attempts: 3 });
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_reports_pending_with_last_value() {
        let policy = PollPolicy::fixed(4, Duration::from_millis(500));
        let outcome = poll_until(&policy, |attempt| async move { Ok::<_, String>(attempt * 10) }, |_| false).await;
        assert_eq!(
            outcome,
            PollOutcome::Pending {
                last: Some(40),
                attempts: 4
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failed_checks_count_as_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = PollPolicy::fixed(3, Duration::from_secs(1));
        let counter = Arc::clone(&calls);
        let outcome = poll_until(
            &policy,
            move |_| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<u32, _>("remote unavailable")
                }
            },
            |_| true,
        )
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(outcome, PollOutcome::Pending { last: None, attempts: 3 });
    }

    #[tokio::test(start_paused = true)]
    async fn waits_between_attempts_but_not_after_the_last() {
        let policy = PollPolicy::fixed(3, Duration::from_secs(2));
        let started = tokio::time::Instant::now();
        let _ = poll_until(&policy, |_| async { Ok::<_, String>(()) }, |_| false).await;
        assert_eq!(started.elapsed(), Duration::from_secs(4));
    }

    #[test]
    fn exponential_backoff_is_capped() {
        let policy = PollPolicy::fixed(10, Duration::from_millis(100)).with_exponential_backoff(2.0, Duration::from_millis(500));
        assert_eq!(policy.delay_after(1), Duration::from_millis(100));
        assert_eq!(policy.delay_after(2), Duration::from_millis(200));
        assert_eq!(policy.delay_after(3), Duration::from_millis(400));
        assert_eq!(policy.delay_after(4), Duration::from_millis(500));
    }
}
