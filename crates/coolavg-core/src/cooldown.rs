use std::time::{Duration, Instant};

use thiserror::Error;

/// Resume attempted before the cooldown interval elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("resumed too fast ({}ms < {}ms)", .elapsed.as_millis(), .required.as_millis())]
pub struct CooldownViolation {
    pub elapsed: Duration,
    pub required: Duration,
}

/// Gate armed by a zero input.
///
/// While armed, input may only be consumed once `interval` has passed since
/// arming. Elapsed time is compared in whole milliseconds, truncated.
#[derive(Debug, Clone)]
pub struct CooldownTimer {
    interval: Duration,
    armed_at: Option<Instant>,
}

impl CooldownTimer {
    pub fn new(interval: Duration) -> Self {
        Self { interval, armed_at: None }
    }

    pub fn arm(&mut self, now: Instant) {
        self.armed_at = Some(now);
    }

    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    pub fn armed_at(&self) -> Option<Instant> {
        self.armed_at
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Validate the interval at `now`.
    ///
    /// Returns `Ok(None)` when not armed and `Ok(Some(elapsed))` when the
    /// interval was satisfied, in which case the timer is disarmed. A too-early
    /// check leaves the timer armed.
    pub fn check(&mut self, now: Instant) -> Result<Option<Duration>, CooldownViolation> {
        let Some(armed_at) = self.armed_at else {
            return Ok(None);
        };
        let elapsed = now.saturating_duration_since(armed_at);
        if elapsed.as_millis() < self.interval.as_millis() {
            return Err(CooldownViolation { elapsed, required: self.interval });
        }
        self.armed_at = None;
        Ok(Some(elapsed))
    }
}
