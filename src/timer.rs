//! Session countdown timer.
//!
//! A jam round runs for a fixed number of seconds. The host calls
//! [`SessionTimer::tick`] once per second; the tick that reaches zero stops
//! the timer and reports expiry so the board can raise its alert.

#[cfg(test)]
#[path = "timer_test.rs"]
mod timer_test;

use crate::consts::TIMER_DURATION_SECS;

/// Outcome of one timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Timer is not running.
    Stopped,
    /// Still counting down.
    Running { remaining: u32 },
    /// This tick hit zero; the timer has stopped.
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionTimer {
    remaining: Option<u32>,
}

impl SessionTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh round, or stop the running one.
    pub fn toggle(&mut self) {
        self.remaining = match self.remaining {
            Some(_) => None,
            None => Some(TIMER_DURATION_SECS),
        };
    }

    pub fn tick(&mut self) -> Tick {
        match self.remaining {
            None => Tick::Stopped,
            Some(secs) if secs <= 1 => {
                self.remaining = None;
                Tick::Expired
            }
            Some(secs) => {
                self.remaining = Some(secs - 1);
                Tick::Running { remaining: secs - 1 }
            }
        }
    }

    #[must_use]
    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }
}

/// Render seconds as `m:ss`.
#[must_use]
pub fn format_remaining(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
