use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerState {
    #[default]
    Stopped,
    Running,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer is stopped or the tick belongs to an older session.
    Idle,
    Ticked,
    /// The countdown reached zero.
    Expired,
}

impl TickOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// One-second resolution game timer, advanced by the caller once per second.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTimer {
    clock: Clock,
    value: u32,
    state: TimerState,
}

impl GameTimer {
    pub const fn new(clock: Clock) -> Self {
        Self {
            clock,
            value: clock.starting_value(),
            state: TimerState::Stopped,
        }
    }

    pub const fn clock(&self) -> Clock {
        self.clock
    }

    /// Elapsed seconds when counting up, remaining seconds when counting down.
    pub const fn value(&self) -> u32 {
        self.value
    }

    pub const fn state(&self) -> TimerState {
        self.state
    }

    pub const fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running)
    }

    pub fn start(&mut self) {
        self.state = TimerState::Running;
    }

    pub fn stop(&mut self) {
        self.state = TimerState::Stopped;
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Idle;
        }

        match self.clock {
            Clock::CountUp => {
                self.value = self.value.saturating_add(1);
                TickOutcome::Ticked
            }
            Clock::CountDown { .. } => {
                self.value = self.value.saturating_sub(1);
                if self.value == 0 {
                    self.stop();
                    TickOutcome::Expired
                } else {
                    TickOutcome::Ticked
                }
            }
        }
    }
}

/// Formats seconds as `M:SS`.
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

impl fmt::Display for GameTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_clock(self.value))
    }
}
