use std::time::Duration;
use tracing::trace;
use vitrine_config::PageConfig;

use crate::host::{TimerHandle, TimerHost, TimerSlot, WidgetSurface, WidgetTarget};

/// Testimonial marquee that holds still while pressed and picks up again a
/// while after release.
#[derive(Debug)]
pub struct Marquee {
    present: bool,
    paused: bool,
    pressed: bool,
    resume_after: Duration,
    resume: TimerSlot,
}

impl Marquee {
    pub fn mount(present: bool, config: &PageConfig) -> Self {
        Self {
            present,
            paused: false,
            pressed: false,
            resume_after: Duration::from_millis(config.marquee_resume_ms),
            resume: TimerSlot::new(),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// A new press cancels any resume still pending from the last release.
    pub fn press<H>(&mut self, host: &mut H)
    where
        H: TimerHost + WidgetSurface + ?Sized,
    {
        if !self.present {
            return;
        }
        self.pressed = true;
        self.resume.release(host);
        if !self.paused {
            self.paused = true;
            host.set_active(WidgetTarget::MarqueePaused, true);
        }
    }

    /// Releases without a press, such as a pointer leaving, change nothing.
    pub fn release<H: TimerHost + ?Sized>(&mut self, host: &mut H) {
        if !self.present || !self.pressed {
            return;
        }
        self.pressed = false;
        self.resume.arm_once(host, self.resume_after);
        trace!(resume_ms = self.resume_after.as_millis() as u64, "marquee resume scheduled");
    }

    pub fn on_timer<H: WidgetSurface + ?Sized>(&mut self, handle: TimerHandle, host: &mut H) -> bool {
        if !self.resume.take_fired(handle) {
            return false;
        }
        self.paused = false;
        host.set_active(WidgetTarget::MarqueePaused, false);
        true
    }
}
