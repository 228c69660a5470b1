//! When the animation runs.
//!
//! The loop ticks on a repeating timer while the pointer is around and stops itself after a quiet
//! period. Dragging an icon suspends it entirely until shortly after the drag ends.

use std::time::Duration;

use crate::timers::{TimerKind, Timers};

pub const BASE_INTERVAL: Duration = Duration::from_millis(15);
/// Added to the tick interval per step of the `fps` setting.
pub const INTERVAL_PAD: Duration = Duration::from_millis(15);
/// Quiet period after which the loop stops, on top of one tick interval.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(750);
/// Delay between the end of a drag and the loop becoming available again.
pub const REENABLE_DELAY: Duration = Duration::from_millis(750);

/// Ticks that force a shell relayout after enabling or an explicit relayout request.
pub const RELAYOUT_FULL: u32 = 20;
/// Ticks that force a shell relayout after a focus or icon count change.
pub const RELAYOUT_SHORT: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    DraggingSuspended,
}

#[derive(Debug)]
pub struct FrameLoop<T: Timers> {
    timers: T,
    state: LoopState,
    interval: Duration,
    tick_timer: Option<T::Handle>,
    stop_timer: Option<T::Handle>,
    resume_timer: Option<T::Handle>,
    /// Remaining ticks that run the shell relayout.
    relayout: u32,
    /// A drag started while running; applied at the next tick.
    suspend_pending: bool,
}

pub fn interval_for(fps: f64) -> Duration {
    BASE_INTERVAL + INTERVAL_PAD.mul_f64(fps.max(0.))
}

impl<T: Timers> FrameLoop<T> {
    pub fn new(timers: T) -> Self {
        Self {
            timers,
            state: LoopState::Idle,
            interval: BASE_INTERVAL,
            tick_timer: None,
            stop_timer: None,
            resume_timer: None,
            relayout: 0,
            suspend_pending: false,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }

    /// Starts ticking unless already running or suspended.
    pub fn start(&mut self, fps: f64) {
        if self.state != LoopState::Idle {
            return;
        }

        let interval = interval_for(fps);
        let Some(token) = self.timers.schedule_repeating(interval, TimerKind::Tick) else {
            return;
        };

        debug!("starting frame loop at {interval:?}");
        self.interval = interval;
        self.tick_timer = Some(token);
        self.state = LoopState::Running;
    }

    /// Stops the loop once no request has come in for a while.
    ///
    /// Each call restarts the quiet period.
    pub fn request_stop(&mut self) {
        if self.state != LoopState::Running {
            return;
        }

        if let Some(token) = self.stop_timer.take() {
            self.timers.cancel(token);
        }
        self.stop_timer = self
            .timers
            .schedule_once(DEBOUNCE_DELAY + self.interval, TimerKind::StopDebounce);
    }

    /// Stops ticking right away.
    pub fn stop(&mut self) {
        if let Some(token) = self.tick_timer.take() {
            self.timers.cancel(token);
        }
        if let Some(token) = self.stop_timer.take() {
            self.timers.cancel(token);
        }
        self.relayout = 0;

        if self.state == LoopState::Running {
            debug!("stopping frame loop");
            self.state = LoopState::Idle;
        }
    }

    /// Handles the quiet period running out.
    pub fn stop_debounce_fired(&mut self) {
        // Spent.
        self.stop_timer = None;
        self.stop();
    }

    pub fn set_relayout(&mut self, ticks: u32) {
        self.relayout = ticks;
    }

    /// Consumes one tick of the relayout countdown, returning whether this tick should relayout.
    pub fn take_relayout(&mut self) -> bool {
        if self.relayout == 0 {
            return false;
        }
        self.relayout -= 1;
        true
    }

    /// Suspends for a drag: at the next tick when running, right away otherwise.
    pub fn request_suspend(&mut self) {
        if let Some(token) = self.resume_timer.take() {
            self.timers.cancel(token);
        }

        match self.state {
            LoopState::Running => self.suspend_pending = true,
            LoopState::Idle => self.suspend(),
            LoopState::DraggingSuspended => (),
        }
    }

    /// Applies a queued drag suspension. Returns `true` if the loop is now suspended.
    pub fn apply_pending_suspend(&mut self) -> bool {
        if !self.suspend_pending {
            return false;
        }
        self.suspend();
        true
    }

    fn suspend(&mut self) {
        debug!("suspending frame loop for drag");
        self.stop();
        self.suspend_pending = false;
        self.state = LoopState::DraggingSuspended;
    }

    /// Lifts the drag suspension after [`REENABLE_DELAY`].
    pub fn schedule_resume(&mut self) {
        if self.suspend_pending {
            self.suspend();
        }
        if self.state != LoopState::DraggingSuspended {
            return;
        }

        if let Some(token) = self.resume_timer.take() {
            self.timers.cancel(token);
        }
        self.resume_timer = self
            .timers
            .schedule_once(REENABLE_DELAY, TimerKind::Resume);

        // Without a timer there is nothing to wait for.
        if self.resume_timer.is_none() {
            self.resume();
        }
    }

    /// Handles the resume timer. Returns `true` if the loop left the drag suspension.
    pub fn resume(&mut self) -> bool {
        self.resume_timer = None;
        if self.state != LoopState::DraggingSuspended {
            return false;
        }

        debug!("resuming frame loop after drag");
        self.state = LoopState::Idle;
        true
    }

    /// Cancels every timer and forgets all pending requests.
    pub fn shutdown(&mut self) {
        self.stop();
        if let Some(token) = self.resume_timer.take() {
            self.timers.cancel(token);
        }
        self.suspend_pending = false;
        self.state = LoopState::Idle;
    }
}
