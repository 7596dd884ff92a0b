//! Capabilities the page components need from their host.
//!
//! Components never hold a host; each operation borrows the capabilities it
//! needs for the duration of one call. Timer callbacks come back as
//! [`TimerHandle`]s that the owning component recognizes.

mod headless;
mod observer;
mod timer;

use serde::{Deserialize, Serialize};
use std::time::Duration;
use vitrine_ir::ElementId;

use crate::animation::AppliedTiming;
use crate::widgets::ConnectionLine;

pub use headless::{HeadlessHost, SurfaceWrite};
pub use observer::{MarginLength, ObserverOptions, Rect, RootMargin, intersection_ratio};
pub use timer::{Debouncer, Throttle, TimerSlot};

/// Opaque handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerHandle(pub u64);

pub trait TimerHost {
    fn schedule_once(&mut self, delay: Duration) -> TimerHandle;
    fn schedule_repeating(&mut self, interval: Duration) -> TimerHandle;
    /// Cancelling an unknown or already fired handle is a no-op.
    fn cancel(&mut self, handle: TimerHandle);
}

pub trait Viewport {
    /// Layout viewport width in CSS pixels.
    fn viewport_width(&self) -> u32;
    fn viewport_height(&self) -> u32;
}

/// Read access to the host's current layout.
pub trait LayoutQuery {
    /// Border box of `target`, or `None` when it is not rendered.
    fn bounding_rect(&self, target: ElementId) -> Option<Rect>;
}

/// One element's change in visibility, delivered in batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub is_intersecting: bool,
}

/// A single shared subscription covering every registered element.
pub trait VisibilityObserver {
    fn observe(&mut self, target: ElementId);
    fn unobserve(&mut self, target: ElementId);
}

pub trait RevealSurface {
    fn set_transition(&mut self, target: ElementId, timing: &AppliedTiming);
    fn set_transition_delay(&mut self, target: ElementId, delay_ms: f64);
    fn set_in_view(&mut self, target: ElementId, in_view: bool);
}

pub trait CarouselSurface {
    /// CSS transform for the slide track, e.g. `translateX(-50%)`.
    fn set_translation(&mut self, transform: &str);
    /// Replace the paging indicators; the first one starts highlighted.
    fn rebuild_indicators(&mut self, count: usize);
    fn highlight_indicator(&mut self, index: usize);
}

/// Toggleable pieces of the collaborator widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "index", rename_all = "snake_case")]
pub enum WidgetTarget {
    AccordionItem(usize),
    ModalOverlay,
    Sidebar,
    SidebarOverlay,
    /// Body-level marker while the mobile menu is open.
    MenuOpen,
    ScrollTopButton,
    /// Pauses the testimonial marquee animation.
    MarqueePaused,
}

pub trait WidgetSurface {
    fn set_active(&mut self, target: WidgetTarget, active: bool);
    /// Stroke dash offset of the scroll progress ring.
    fn set_scroll_progress(&mut self, dash_offset: f64);
}

pub trait ConnectionSurface {
    /// Replace every drawn connection line.
    fn draw_connection_lines(&mut self, lines: &[ConnectionLine]);
}

/// Window-level navigation.
pub trait Navigator {
    fn scroll_to_top(&mut self);
    fn open_link(&mut self, href: &str, new_tab: bool);
}
