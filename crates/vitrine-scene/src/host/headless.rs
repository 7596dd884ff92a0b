//! In-memory host with a virtual clock.
//!
//! Timers fire in `(due, handle)` order when the clock is advanced, element
//! rectangles plus a scroll offset stand in for layout, and every surface
//! write is recorded in order next to the latest value per target.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Duration;
use tracing::trace;
use vitrine_ir::ElementId;

use super::{
    CarouselSurface, ConnectionSurface, IntersectionEntry, LayoutQuery, Navigator, ObserverOptions,
    Rect, RevealSurface, TimerHandle, TimerHost, Viewport, VisibilityObserver, WidgetSurface,
    WidgetTarget,
};
use crate::animation::AppliedTiming;
use crate::widgets::{ConnectionLine, ScrollMetrics};

/// One recorded write, in the order the components issued them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SurfaceWrite {
    Transition {
        element: ElementId,
        timing: AppliedTiming,
    },
    TransitionDelay {
        element: ElementId,
        delay_ms: f64,
    },
    InView {
        element: ElementId,
        in_view: bool,
    },
    Translation {
        transform: String,
    },
    Indicators {
        count: usize,
    },
    Highlight {
        index: usize,
    },
    Widget {
        target: WidgetTarget,
        active: bool,
    },
    ScrollProgress {
        dash_offset: f64,
    },
    ConnectionLines {
        lines: Vec<ConnectionLine>,
    },
    ScrollToTop,
    OpenLink {
        href: String,
        new_tab: bool,
    },
}

#[derive(Debug, Clone, Copy)]
struct ScheduledTimer {
    due: Duration,
    /// `None` for one-shot timers.
    interval: Option<Duration>,
}

#[derive(Debug)]
pub struct HeadlessHost {
    now: Duration,
    next_handle: u64,
    timers: BTreeMap<TimerHandle, ScheduledTimer>,

    width: u32,
    height: u32,
    scroll_y: f64,
    options: ObserverOptions,
    layout: HashMap<ElementId, Rect>,
    observed: BTreeSet<ElementId>,
    reported: HashMap<ElementId, bool>,

    writes: Vec<SurfaceWrite>,
    transitions: HashMap<ElementId, AppliedTiming>,
    in_view: HashMap<ElementId, bool>,
    revealed_at: HashMap<ElementId, Duration>,
    translation: Option<String>,
    indicators: usize,
    highlighted: Option<usize>,
    widgets: HashMap<WidgetTarget, bool>,
    scroll_progress: Option<f64>,
    connection_lines: Vec<ConnectionLine>,
    links: Vec<String>,
}

impl HeadlessHost {
    pub fn new(width: u32, height: u32, options: ObserverOptions) -> Self {
        Self {
            now: Duration::ZERO,
            next_handle: 0,
            timers: BTreeMap::new(),
            width,
            height,
            scroll_y: 0.0,
            options,
            layout: HashMap::new(),
            observed: BTreeSet::new(),
            reported: HashMap::new(),
            writes: Vec::new(),
            transitions: HashMap::new(),
            in_view: HashMap::new(),
            revealed_at: HashMap::new(),
            translation: None,
            indicators: 0,
            highlighted: None,
            widgets: HashMap::new(),
            scroll_progress: None,
            connection_lines: Vec::new(),
            links: Vec::new(),
        }
    }

    // ---- clock ----

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn live_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn is_live(&self, handle: TimerHandle) -> bool {
        self.timers.contains_key(&handle)
    }

    /// Fire the earliest timer due at or before `deadline`, moving the clock
    /// to its due time. Repeating timers are rescheduled.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<TimerHandle> {
        let (handle, timer) = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.due <= deadline)
            .min_by_key(|(handle, timer)| (timer.due, **handle))
            .map(|(handle, timer)| (*handle, *timer))?;

        self.now = self.now.max(timer.due);
        match timer.interval {
            Some(interval) => {
                if let Some(slot) = self.timers.get_mut(&handle) {
                    slot.due = timer.due + interval;
                }
            }
            None => {
                self.timers.remove(&handle);
            }
        }
        trace!(handle = handle.0, now_ms = self.now.as_millis() as u64, "timer fired");
        Some(handle)
    }

    /// Advance the clock by `by`, handing every timer that comes due to
    /// `on_fire` in order. Timers scheduled by `on_fire` fire in the same run
    /// if they fall inside the window.
    pub fn run_for<F>(&mut self, by: Duration, mut on_fire: F)
    where
        F: FnMut(&mut Self, TimerHandle),
    {
        let deadline = self.now + by;
        while let Some(handle) = self.pop_due(deadline) {
            on_fire(self, handle);
        }
        self.now = deadline;
    }

    // ---- layout ----

    pub fn set_layout(&mut self, element: ElementId, rect: Rect) {
        self.layout.insert(element, rect);
    }

    pub fn scroll_to(&mut self, scroll_y: f64) {
        self.scroll_y = scroll_y.max(0.0);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn viewport_rect(&self) -> Rect {
        Rect::new(0.0, self.scroll_y, f64::from(self.width), f64::from(self.height))
    }

    /// Document height is the lowest laid-out edge, never less than the
    /// viewport.
    pub fn scroll_metrics(&self) -> ScrollMetrics {
        let viewport_height = f64::from(self.height);
        let bottom = self
            .layout
            .values()
            .map(|rect| rect.y + rect.height)
            .fold(viewport_height, f64::max);
        ScrollMetrics {
            scroll_y: self.scroll_y,
            scroll_height: bottom,
            viewport_height,
        }
    }

    pub fn is_observed(&self, element: ElementId) -> bool {
        self.observed.contains(&element)
    }

    /// Visibility changes since the last call, in document order. Elements
    /// observed since then always report once, like the browser primitive.
    pub fn take_intersections(&mut self) -> Vec<IntersectionEntry> {
        let viewport = self.viewport_rect();
        let mut batch = Vec::new();
        for &element in &self.observed {
            let visible = self
                .layout
                .get(&element)
                .is_some_and(|rect| self.options.is_visible(*rect, viewport));
            if self.reported.get(&element) != Some(&visible) {
                self.reported.insert(element, visible);
                batch.push(IntersectionEntry {
                    target: element,
                    is_intersecting: visible,
                });
            }
        }
        batch
    }

    // ---- recorded surface state ----

    pub fn writes(&self) -> &[SurfaceWrite] {
        &self.writes
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    pub fn transition(&self, element: ElementId) -> Option<&AppliedTiming> {
        self.transitions.get(&element)
    }

    pub fn in_view(&self, element: ElementId) -> bool {
        self.in_view.get(&element).copied().unwrap_or(false)
    }

    /// Eased progress of an element's reveal transition on the virtual
    /// clock. `None` while hidden or when its curve cannot be sampled.
    pub fn reveal_progress(&self, element: ElementId) -> Option<f32> {
        let since = self.revealed_at.get(&element)?;
        let timing = self.transitions.get(&element)?;
        let elapsed = self.now.saturating_sub(*since);
        timing.progress_at(elapsed.as_secs_f64() * 1000.0)
    }

    pub fn translation(&self) -> Option<&str> {
        self.translation.as_deref()
    }

    pub fn indicator_count(&self) -> usize {
        self.indicators
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn widget(&self, target: WidgetTarget) -> bool {
        self.widgets.get(&target).copied().unwrap_or(false)
    }

    pub fn scroll_progress(&self) -> Option<f64> {
        self.scroll_progress
    }

    pub fn connection_lines(&self) -> &[ConnectionLine] {
        &self.connection_lines
    }

    /// Every link followed so far, oldest first.
    pub fn links(&self) -> &[String] {
        &self.links
    }
}

impl TimerHost for HeadlessHost {
    fn schedule_once(&mut self, delay: Duration) -> TimerHandle {
        self.next_handle += 1;
        let handle = TimerHandle(self.next_handle);
        self.timers.insert(
            handle,
            ScheduledTimer {
                due: self.now + delay,
                interval: None,
            },
        );
        handle
    }

    fn schedule_repeating(&mut self, interval: Duration) -> TimerHandle {
        // A zero interval would never let the clock move.
        let interval = interval.max(Duration::from_millis(1));
        self.next_handle += 1;
        let handle = TimerHandle(self.next_handle);
        self.timers.insert(
            handle,
            ScheduledTimer {
                due: self.now + interval,
                interval: Some(interval),
            },
        );
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.remove(&handle);
    }
}

impl Viewport for HeadlessHost {
    fn viewport_width(&self) -> u32 {
        self.width
    }

    fn viewport_height(&self) -> u32 {
        self.height
    }
}

impl LayoutQuery for HeadlessHost {
    fn bounding_rect(&self, target: ElementId) -> Option<Rect> {
        self.layout.get(&target).copied()
    }
}

impl VisibilityObserver for HeadlessHost {
    fn observe(&mut self, target: ElementId) {
        self.observed.insert(target);
        self.reported.remove(&target);
    }

    fn unobserve(&mut self, target: ElementId) {
        self.observed.remove(&target);
        self.reported.remove(&target);
    }
}

impl RevealSurface for HeadlessHost {
    fn set_transition(&mut self, target: ElementId, timing: &AppliedTiming) {
        self.transitions.insert(target, timing.clone());
        self.writes.push(SurfaceWrite::Transition {
            element: target,
            timing: timing.clone(),
        });
    }

    fn set_transition_delay(&mut self, target: ElementId, delay_ms: f64) {
        if let Some(timing) = self.transitions.get_mut(&target) {
            timing.delay_ms = delay_ms;
        }
        self.writes.push(SurfaceWrite::TransitionDelay {
            element: target,
            delay_ms,
        });
    }

    fn set_in_view(&mut self, target: ElementId, in_view: bool) {
        if in_view {
            self.revealed_at.insert(target, self.now);
        } else {
            self.revealed_at.remove(&target);
        }
        self.in_view.insert(target, in_view);
        self.writes.push(SurfaceWrite::InView {
            element: target,
            in_view,
        });
    }
}

impl CarouselSurface for HeadlessHost {
    fn set_translation(&mut self, transform: &str) {
        self.translation = Some(transform.to_string());
        self.writes.push(SurfaceWrite::Translation {
            transform: transform.to_string(),
        });
    }

    fn rebuild_indicators(&mut self, count: usize) {
        self.indicators = count;
        self.highlighted = (count > 0).then_some(0);
        self.writes.push(SurfaceWrite::Indicators { count });
    }

    fn highlight_indicator(&mut self, index: usize) {
        if index < self.indicators {
            self.highlighted = Some(index);
        }
        self.writes.push(SurfaceWrite::Highlight { index });
    }
}

impl WidgetSurface for HeadlessHost {
    fn set_active(&mut self, target: WidgetTarget, active: bool) {
        self.widgets.insert(target, active);
        self.writes.push(SurfaceWrite::Widget { target, active });
    }

    fn set_scroll_progress(&mut self, dash_offset: f64) {
        self.scroll_progress = Some(dash_offset);
        self.writes.push(SurfaceWrite::ScrollProgress { dash_offset });
    }
}

impl ConnectionSurface for HeadlessHost {
    fn draw_connection_lines(&mut self, lines: &[ConnectionLine]) {
        self.connection_lines = lines.to_vec();
        self.writes.push(SurfaceWrite::ConnectionLines {
            lines: lines.to_vec(),
        });
    }
}

impl Navigator for HeadlessHost {
    /// Jumps straight to the top; smooth scrolling has no virtual-clock cost.
    fn scroll_to_top(&mut self) {
        self.scroll_y = 0.0;
        self.writes.push(SurfaceWrite::ScrollToTop);
    }

    fn open_link(&mut self, href: &str, new_tab: bool) {
        self.links.push(href.to_string());
        self.writes.push(SurfaceWrite::OpenLink {
            href: href.to_string(),
            new_tab,
        });
    }
}
