//=========================================================================
// Timer
//=========================================================================
//
// Countdown object that runs an action every `countdown` milliseconds
// while it is live and running.
//
// Firing rule (checked on each update while running):
//   fire when the first check has not happened yet, or when at least
//   `countdown` ms passed since the last fire. Firing re-arms the timer
//   from the current time.
//
// Suspension:
//   When its scene is parked the timer freezes the elapsed delta and
//   stops. On restore the baseline is moved forward so the same delta
//   remains, and the previous running state comes back.
//
// One-shot timers are built by destroying the timer from its own action.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Standard Library Imports ============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use super::{Context, GameObject, ObjectId};
use crate::error::Result;

//=== TimerAction =========================================================

/// Callback run when the timer fires. Receives the timer's own id.
pub type TimerAction = Box<dyn FnMut(ObjectId, &mut Context<'_>) -> Result<()>>;

//=== Timer ===============================================================

pub struct Timer {
    countdown: u64,
    current_time: i64,
    last_update: i64,
    running: bool,
    first_check: bool,
    suspended: Option<Suspended>,
    action: TimerAction,
}

#[derive(Debug, Clone, Copy)]
struct Suspended {
    delta: i64,
    was_running: bool,
}

impl Timer {
    //--- Construction -----------------------------------------------------

    /// Creates a running timer started at `now`.
    pub fn new<F>(countdown: u64, now: u64, action: F) -> Self
    where
        F: FnMut(ObjectId, &mut Context<'_>) -> Result<()> + 'static,
    {
        let mut timer = Self::stopped(countdown, action);
        timer.start_timer(now);
        timer
    }

    /// Creates a timer that does nothing until [`start_timer`](Self::start_timer).
    pub fn stopped<F>(countdown: u64, action: F) -> Self
    where
        F: FnMut(ObjectId, &mut Context<'_>) -> Result<()> + 'static,
    {
        Self {
            countdown,
            current_time: 0,
            last_update: -1,
            running: false,
            first_check: false,
            suspended: None,
            action: Box::new(action),
        }
    }

    /// When set, the first update after start waits a full countdown
    /// instead of firing immediately.
    pub fn with_first_check(mut self, first_check: bool) -> Self {
        self.first_check = first_check;
        self
    }

    //--- Control ----------------------------------------------------------

    /// (Re)starts the countdown from `now`.
    pub fn start_timer(&mut self, now: u64) {
        self.running = true;
        self.current_time = now as i64;
        self.last_update = now as i64;
    }

    pub fn stop_timer(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn countdown(&self) -> u64 {
        self.countdown
    }

    /// Progress toward the next fire as of the last update. May exceed
    /// 1.0 until the next update re-arms the timer.
    pub fn get_percentage(&self) -> f32 {
        if self.countdown == 0 {
            return 1.0;
        }
        (self.current_time - self.last_update) as f32 / self.countdown as f32
    }
}

impl GameObject for Timer {
    fn update(&mut self, this: ObjectId, ctx: &mut Context<'_>) -> Result<()> {
        if !self.running {
            return Ok(());
        }

        self.current_time = ctx.now() as i64;
        if !self.first_check || self.current_time - self.last_update >= self.countdown as i64 {
            self.first_check = true;
            self.last_update = self.current_time;
            trace!(target: "objects", "Timer {} fired at {}", this, self.current_time);
            (self.action)(this, ctx)?;
        }
        Ok(())
    }

    fn save_object(&mut self, now: u64) {
        self.suspended = Some(Suspended {
            delta: now as i64 - self.last_update,
            was_running: self.running,
        });
        self.running = false;
    }

    fn load_object(&mut self, now: u64) {
        if let Some(suspended) = self.suspended.take() {
            self.last_update = now as i64 - suspended.delta;
            self.current_time = now as i64;
            self.running = suspended.was_running;
        }
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("countdown", &self.countdown)
            .field("last_update", &self.last_update)
            .field("running", &self.running)
            .field("first_check", &self.first_check)
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
