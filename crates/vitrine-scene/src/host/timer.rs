use std::time::Duration;

use super::{TimerHandle, TimerHost};

/// Owner of at most one live timer.
///
/// Arming always cancels the previous handle first, so a slot can never leak
/// a timer no matter how often it is re-armed.
#[derive(Debug, Default)]
pub struct TimerSlot {
    handle: Option<TimerHandle>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm_once<H: TimerHost + ?Sized>(&mut self, host: &mut H, delay: Duration) -> TimerHandle {
        self.release(host);
        let handle = host.schedule_once(delay);
        self.handle = Some(handle);
        handle
    }

    pub fn arm_repeating<H: TimerHost + ?Sized>(
        &mut self,
        host: &mut H,
        interval: Duration,
    ) -> TimerHandle {
        self.release(host);
        let handle = host.schedule_repeating(interval);
        self.handle = Some(handle);
        handle
    }

    pub fn release<H: TimerHost + ?Sized>(&mut self, host: &mut H) {
        if let Some(handle) = self.handle.take() {
            host.cancel(handle);
        }
    }

    pub fn owns(&self, handle: TimerHandle) -> bool {
        self.handle == Some(handle)
    }

    /// Forget a one-shot timer that just fired. Returns whether it was ours.
    pub fn take_fired(&mut self, handle: TimerHandle) -> bool {
        if self.owns(handle) {
            self.handle = None;
            true
        } else {
            false
        }
    }

    pub fn handle(&self) -> Option<TimerHandle> {
        self.handle
    }

    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }
}

/// Runs an action only after `wait` of quiescence; every poke restarts the
/// window and discards the pending run.
#[derive(Debug)]
pub struct Debouncer {
    slot: TimerSlot,
    wait: Duration,
}

impl Debouncer {
    pub fn new(wait: Duration) -> Self {
        Self {
            slot: TimerSlot::new(),
            wait,
        }
    }

    pub fn poke<H: TimerHost + ?Sized>(&mut self, host: &mut H) {
        self.slot.arm_once(host, self.wait);
    }

    /// True when `handle` is the pending run, which is now consumed.
    pub fn fire(&mut self, handle: TimerHandle) -> bool {
        self.slot.take_fired(handle)
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_armed()
    }
}

/// Leading-edge throttle: the first call passes, later calls are dropped
/// until `limit` has elapsed.
#[derive(Debug)]
pub struct Throttle {
    slot: TimerSlot,
    limit: Duration,
}

impl Throttle {
    pub fn new(limit: Duration) -> Self {
        Self {
            slot: TimerSlot::new(),
            limit,
        }
    }

    pub fn try_acquire<H: TimerHost + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.slot.is_armed() {
            return false;
        }
        self.slot.arm_once(host, self.limit);
        true
    }

    pub fn on_timer(&mut self, handle: TimerHandle) -> bool {
        self.slot.take_fired(handle)
    }
}
