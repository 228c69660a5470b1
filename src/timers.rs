//! Timer backends for the frame loop.

use std::fmt;
use std::time::Duration;

use calloop::timer::{TimeoutAction, Timer};
use calloop::{LoopHandle, RegistrationToken};

/// What a timer is for. Timer callbacks carry nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Repeating animation tick.
    Tick,
    /// Stops the loop after a quiet period.
    StopDebounce,
    /// Lifts the drag suspension.
    Resume,
}

pub trait Timers {
    type Handle: Copy + fmt::Debug;

    /// Fires `kind` every `interval` until cancelled.
    ///
    /// Returns `None` if the timer could not be registered.
    fn schedule_repeating(&mut self, interval: Duration, kind: TimerKind) -> Option<Self::Handle>;

    /// Fires `kind` once after `delay`. The handle is spent once the timer fires.
    fn schedule_once(&mut self, delay: Duration, kind: TimerKind) -> Option<Self::Handle>;

    /// Cancels a pending timer. Cancelling a spent handle does nothing.
    fn cancel(&mut self, handle: Self::Handle);
}

/// Receives fired timers on the event loop.
pub trait TimerDispatch: 'static {
    fn dispatch_timer(&mut self, kind: TimerKind);
}

/// [`Timers`] on a calloop event loop.
pub struct CalloopTimers<D: 'static> {
    event_loop: LoopHandle<'static, D>,
}

impl<D: 'static> fmt::Debug for CalloopTimers<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalloopTimers").finish_non_exhaustive()
    }
}

impl<D: TimerDispatch> CalloopTimers<D> {
    pub fn new(event_loop: LoopHandle<'static, D>) -> Self {
        Self { event_loop }
    }

    fn insert(
        &self,
        timer: Timer,
        repeat: Option<Duration>,
        kind: TimerKind,
    ) -> Option<RegistrationToken> {
        let rv = self.event_loop.insert_source(timer, move |_, _, state| {
            state.dispatch_timer(kind);
            match repeat {
                Some(interval) => TimeoutAction::ToDuration(interval),
                None => TimeoutAction::Drop,
            }
        });

        match rv {
            Ok(token) => Some(token),
            Err(err) => {
                warn!("error inserting {kind:?} timer: {:?}", err.error);
                None
            }
        }
    }
}

impl<D: TimerDispatch> Timers for CalloopTimers<D> {
    type Handle = RegistrationToken;

    fn schedule_repeating(&mut self, interval: Duration, kind: TimerKind) -> Option<Self::Handle> {
        self.insert(Timer::from_duration(interval), Some(interval), kind)
    }

    fn schedule_once(&mut self, delay: Duration, kind: TimerKind) -> Option<Self::Handle> {
        self.insert(Timer::from_duration(delay), None, kind)
    }

    fn cancel(&mut self, handle: Self::Handle) {
        self.event_loop.remove(handle);
    }
}

#[cfg(test)]
mod tests {
    use calloop::EventLoop;

    use super::*;

    #[derive(Default)]
    struct Fired(Vec<TimerKind>);

    impl TimerDispatch for Fired {
        fn dispatch_timer(&mut self, kind: TimerKind) {
            self.0.push(kind);
        }
    }

    #[test]
    fn calloop_timers_fire_and_cancel() {
        let mut event_loop = EventLoop::<Fired>::try_new().unwrap();
        let mut timers = CalloopTimers::new(event_loop.handle());
        let mut fired = Fired::default();

        timers
            .schedule_once(Duration::ZERO, TimerKind::Resume)
            .unwrap();
        let cancelled = timers
            .schedule_once(Duration::ZERO, TimerKind::StopDebounce)
            .unwrap();
        timers.cancel(cancelled);

        event_loop
            .dispatch(Duration::from_millis(50), &mut fired)
            .unwrap();
        assert_eq!(fired.0, [TimerKind::Resume]);
    }

    #[test]
    fn calloop_timers_repeat() {
        let mut event_loop = EventLoop::<Fired>::try_new().unwrap();
        let mut timers = CalloopTimers::new(event_loop.handle());
        let mut fired = Fired::default();

        let token = timers
            .schedule_repeating(Duration::from_millis(1), TimerKind::Tick)
            .unwrap();
        while fired.0.len() < 3 {
            event_loop
                .dispatch(Duration::from_millis(50), &mut fired)
                .unwrap();
        }
        timers.cancel(token);

        let count = fired.0.len();
        event_loop
            .dispatch(Duration::from_millis(10), &mut fired)
            .unwrap();
        assert_eq!(fired.0.len(), count);
    }
}
