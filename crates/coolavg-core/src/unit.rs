use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, MonotonicClock};
use crate::config::UnitConfig;
use crate::cooldown::{CooldownTimer, CooldownViolation};
use crate::source::InputSource;
use crate::window::SlidingWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitState {
    NotStarted,
    Suspended,
    Violated,
    Finished,
}

impl UnitState {
    pub fn is_terminal(self) -> bool {
        matches!(self, UnitState::Violated | UnitState::Finished)
    }
}

/// Result of a single [`AverageUnit::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Non-zero input consumed; mean of the updated window published.
    Published(f64),
    /// Zero consumed; cooldown armed and the pre-zero mean published.
    CooldownArmed(f64),
    /// Input source exhausted.
    Finished,
    /// Resumed before the cooldown elapsed.
    Violated(CooldownViolation),
    /// Already terminal; nothing ran.
    Inactive(UnitState),
}

impl StepOutcome {
    pub fn is_active(&self) -> bool {
        matches!(self, StepOutcome::Published(_) | StepOutcome::CooldownArmed(_))
    }

    pub fn value(&self) -> Option<f64> {
        match *self {
            StepOutcome::Published(v) | StepOutcome::CooldownArmed(v) => Some(v),
            _ => None,
        }
    }
}

/// Point-in-time view of a unit, for display and logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub state: UnitState,
    pub last_result: f64,
    pub window: Vec<f64>,
    pub cooldown_armed: bool,
    pub steps: u64,
}

/// Manually stepped moving average with a zero-triggered cooldown.
///
/// Each [`advance`](Self::advance) runs exactly one step and hands control
/// back. A zero input arms the cooldown; the next step must start at least
/// `cooldown_ms` later or the unit ends in [`UnitState::Violated`].
#[derive(Debug)]
pub struct AverageUnit<S, C = MonotonicClock> {
    cfg: UnitConfig,
    source: S,
    clock: C,
    window: SlidingWindow,
    cooldown: CooldownTimer,
    state: UnitState,
    last_result: f64,
    violation: Option<CooldownViolation>,
    cooldown_cleared: Option<Duration>,
    steps: u64,
}

impl<S: InputSource> AverageUnit<S, MonotonicClock> {
    /// Default window and cooldown on the steady clock.
    pub fn create(source: S) -> Self {
        Self::with_config(UnitConfig::default(), source, MonotonicClock)
    }
}

impl<S: InputSource, C: Clock> AverageUnit<S, C> {
    pub fn with_config(cfg: UnitConfig, source: S, clock: C) -> Self {
        Self {
            window: SlidingWindow::new(cfg.window_size),
            cooldown: CooldownTimer::new(cfg.cooldown()),
            cfg,
            source,
            clock,
            state: UnitState::NotStarted,
            last_result: 0.0,
            violation: None,
            cooldown_cleared: None,
            steps: 0,
        }
    }

    /// Run one step; returns whether the unit is still active.
    pub fn resume(&mut self) -> bool {
        self.advance().is_active()
    }

    pub fn advance(&mut self) -> StepOutcome {
        if self.state.is_terminal() {
            return StepOutcome::Inactive(self.state);
        }
        self.state = UnitState::Suspended;
        self.cooldown_cleared = None;

        match self.cooldown.check(self.clock.now()) {
            Ok(Some(elapsed)) => {
                debug!("cooldown cleared after {}ms, resuming work", elapsed.as_millis());
                self.cooldown_cleared = Some(elapsed);
            }
            Ok(None) => {}
            Err(violation) => {
                warn!("cooldown violation: {violation}");
                self.state = UnitState::Violated;
                self.violation = Some(violation);
                return StepOutcome::Violated(violation);
            }
        }

        let Some(value) = self.source.next_value() else {
            debug!("input exhausted after {} steps", self.steps);
            self.state = UnitState::Finished;
            return StepOutcome::Finished;
        };
        self.steps += 1;

        // exact comparison; -0.0 counts as zero too
        if value == 0.0 {
            self.cooldown.arm(self.clock.now());
            self.last_result = self.window.mean();
            info!(
                "zero input: cooldown {}ms armed, average {}",
                self.cfg.cooldown_ms, self.last_result
            );
            return StepOutcome::CooldownArmed(self.last_result);
        }

        self.window.push(value);
        self.last_result = self.window.mean();
        debug!("input {value} -> average {}", self.last_result);
        StepOutcome::Published(self.last_result)
    }

    pub fn last_result(&self) -> f64 {
        self.last_result
    }

    pub fn state(&self) -> UnitState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        !self.state.is_terminal()
    }

    pub fn window(&self) -> &SlidingWindow {
        &self.window
    }

    pub fn cooldown(&self) -> &CooldownTimer {
        &self.cooldown
    }

    /// Elapsed time of the cooldown cleared by the latest step, if it cleared one.
    pub fn cooldown_cleared(&self) -> Option<Duration> {
        self.cooldown_cleared
    }

    /// The violation that ended the unit, if any.
    pub fn violation(&self) -> Option<&CooldownViolation> {
        self.violation.as_ref()
    }

    pub fn config(&self) -> &UnitConfig {
        &self.cfg
    }

    pub fn snapshot(&self) -> UnitSnapshot {
        UnitSnapshot {
            state: self.state,
            last_result: self.last_result,
            window: self.window.to_vec(),
            cooldown_armed: self.cooldown.is_armed(),
            steps: self.steps,
        }
    }
}
