//! Exponential backoff with optional jitter.

use std::time::Duration;

use rand::Rng;
use tokio::time::Instant;

/// Retry schedule shared by all verifications of one verifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffPolicy {
    /// First retry delay.
    pub initial_interval: Duration,
    /// Cap on any single delay.
    pub max_interval: Duration,
    /// Total budget; no delay is handed out that would end past it.
    pub max_elapsed_time: Duration,
    /// Growth factor applied after each retryable outcome.
    pub multiplier: f64,
    /// Extra random delay as a fraction of the interval, 0.0 disables.
    pub jitter_ratio: f64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(25),
            max_interval: Duration::from_millis(500),
            max_elapsed_time: Duration::from_secs(60),
            multiplier: 2.0,
            jitter_ratio: 0.0,
        }
    }
}

impl BackoffPolicy {
    pub fn with_max_elapsed_time(mut self, max_elapsed_time: Duration) -> Self {
        self.max_elapsed_time = max_elapsed_time;
        self
    }

    /// Start a new cursor. The elapsed-time clock starts now.
    pub fn start(&self) -> BackoffCursor {
        BackoffCursor {
            policy: *self,
            current: self.initial_interval.min(self.max_interval),
            floor: Duration::ZERO,
            started: Instant::now(),
        }
    }
}

/// Mutable retry state for a single verification.
#[derive(Debug)]
pub struct BackoffCursor {
    policy: BackoffPolicy,
    current: Duration,
    /// Last delay handed out; later delays never go below it.
    floor: Duration,
    started: Instant,
}

impl BackoffCursor {
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Budget left before `max_elapsed_time` is reached.
    pub fn remaining(&self) -> Duration {
        self.policy.max_elapsed_time.saturating_sub(self.elapsed())
    }

    /// Interval the next call to [`next_backoff`](Self::next_backoff) is based on.
    pub fn current_interval(&self) -> Duration {
        self.current
    }

    /// Delay before the next attempt, or `None` once that attempt would start
    /// after the elapsed-time budget.
    pub fn next_backoff(&mut self) -> Option<Duration> {
        let delay = self.jittered(self.current).max(self.floor);
        if self.elapsed() + delay > self.policy.max_elapsed_time {
            return None;
        }
        self.current = self.grow(self.current);
        self.floor = delay;
        Some(delay)
    }

    fn grow(&self, interval: Duration) -> Duration {
        Duration::try_from_secs_f64(interval.as_secs_f64() * self.policy.multiplier)
            .unwrap_or(self.policy.max_interval)
            .max(interval)
            .min(self.policy.max_interval)
    }

    fn jittered(&self, interval: Duration) -> Duration {
        let ratio = self.policy.jitter_ratio;
        if ratio.is_nan() || ratio <= 0.0 {
            return interval;
        }
        let factor = rand::thread_rng().gen_range(0.0..ratio);
        let extra = Duration::try_from_secs_f64(interval.as_secs_f64() * factor)
            .unwrap_or(Duration::ZERO);
        (interval + extra).min(self.policy.max_interval)
    }
}
