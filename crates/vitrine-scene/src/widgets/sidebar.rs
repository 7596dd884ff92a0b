use std::time::Duration;
use tracing::debug;
use vitrine_config::PageConfig;

use crate::host::{TimerHandle, TimerHost, TimerSlot, WidgetSurface, WidgetTarget};

/// Work the page must do when a sidebar timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarFollowUp {
    OpenModal,
}

/// Off-canvas navigation for narrow viewports.
#[derive(Debug)]
pub struct MobileSidebar {
    present: bool,
    open: bool,
    close_width: u32,
    delay: Duration,
    close_delay: TimerSlot,
    modal_delay: TimerSlot,
}

impl MobileSidebar {
    pub fn mount(present: bool, config: &PageConfig) -> Self {
        Self {
            present,
            open: false,
            close_width: config.sidebar_close_width,
            delay: Duration::from_millis(config.sidebar_close_delay_ms),
            close_delay: TimerSlot::new(),
            modal_delay: TimerSlot::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open<H: WidgetSurface + ?Sized>(&mut self, host: &mut H) {
        self.set(true, host);
    }

    pub fn close<H: WidgetSurface + ?Sized>(&mut self, host: &mut H) {
        self.set(false, host);
    }

    pub fn on_escape<H: WidgetSurface + ?Sized>(&mut self, host: &mut H) {
        if self.open {
            self.close(host);
        }
    }

    /// Navigation links let the page scroll before the panel slides away.
    pub fn on_nav_link<H: TimerHost + ?Sized>(&mut self, host: &mut H) {
        if self.open {
            self.close_delay.arm_once(host, self.delay);
        }
    }

    /// Close now; the modal opens once the panel has slid out.
    pub fn on_get_started<H>(&mut self, host: &mut H)
    where
        H: TimerHost + WidgetSurface + ?Sized,
    {
        if !self.present {
            return;
        }
        self.close(host);
        self.modal_delay.arm_once(host, self.delay);
    }

    pub fn on_resize<H: WidgetSurface + ?Sized>(&mut self, width: u32, host: &mut H) {
        if self.open && width > self.close_width {
            debug!(width, "viewport widened, closing sidebar");
            self.close(host);
        }
    }

    /// `None` when the handle is not ours or needs no follow-up.
    pub fn on_timer<H: WidgetSurface + ?Sized>(
        &mut self,
        handle: TimerHandle,
        host: &mut H,
    ) -> Option<SidebarFollowUp> {
        if self.close_delay.take_fired(handle) {
            self.close(host);
            return None;
        }
        if self.modal_delay.take_fired(handle) {
            return Some(SidebarFollowUp::OpenModal);
        }
        None
    }

    /// Whether `handle` is one of the sidebar's pending delays.
    pub fn owns(&self, handle: TimerHandle) -> bool {
        self.close_delay.owns(handle) || self.modal_delay.owns(handle)
    }

    fn set<H: WidgetSurface + ?Sized>(&mut self, open: bool, host: &mut H) {
        if !self.present || self.open == open {
            return;
        }
        self.open = open;
        host.set_active(WidgetTarget::Sidebar, open);
        host.set_active(WidgetTarget::SidebarOverlay, open);
        host.set_active(WidgetTarget::MenuOpen, open);
    }
}
