use tracing::info;

use crate::host::{WidgetSurface, WidgetTarget};

/// Demo request modal. Absent markup leaves it inert.
#[derive(Debug, Default)]
pub struct Modal {
    present: bool,
    open: bool,
}

impl Modal {
    pub fn mount(present: bool) -> Self {
        Self {
            present,
            open: false,
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

    /// Form submission is a stub: log and close.
    pub fn submit<H: WidgetSurface + ?Sized>(&mut self, host: &mut H) {
        if !self.present {
            return;
        }
        info!("demo form submitted");
        self.close(host);
    }

    fn set<H: WidgetSurface + ?Sized>(&mut self, open: bool, host: &mut H) {
        if !self.present || self.open == open {
            return;
        }
        self.open = open;
        host.set_active(WidgetTarget::ModalOverlay, open);
    }
}
