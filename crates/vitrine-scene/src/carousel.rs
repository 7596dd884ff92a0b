//! Bounded-window logo carousel.
//!
//! [`CarouselState`] holds the pure paging arithmetic; every transition is
//! total and keeps `0 <= current <= total - per_view`. [`WindowedCarousel`]
//! drives it from host events, owns the single auto-advance timer and the
//! resize debounce, and renders to a [`CarouselSurface`].

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, trace};
use vitrine_config::SliderConfig;

use crate::host::{CarouselSurface, Debouncer, TimerHandle, TimerHost, TimerSlot, Viewport};

/// Viewport width tiers mapped to visible slide counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoints {
    pub wide_min_width: u32,
    pub medium_min_width: u32,
    pub wide: usize,
    pub medium: usize,
    pub narrow: usize,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self::from_config(&SliderConfig::default())
    }
}

impl Breakpoints {
    pub fn from_config(config: &SliderConfig) -> Self {
        Self {
            wide_min_width: config.desktop_breakpoint,
            medium_min_width: config.tablet_breakpoint,
            wide: config.desktop_slides,
            medium: config.tablet_slides,
            narrow: config.mobile_slides,
        }
    }

    pub fn slides_for_width(&self, width: u32) -> usize {
        if width >= self.wide_min_width {
            self.wide
        } else if width >= self.medium_min_width {
            self.medium
        } else {
            self.narrow
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselState {
    total: usize,
    per_view: usize,
    current: usize,
}

impl CarouselState {
    /// `None` when there is nothing to page through.
    pub fn new(total: usize, per_view: usize) -> Option<Self> {
        (total > 0).then(|| Self {
            total,
            per_view: per_view.clamp(1, total),
            current: 0,
        })
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn per_view(&self) -> usize {
        self.per_view
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Last offset that still fills the window.
    pub fn max_index(&self) -> usize {
        self.total - self.per_view
    }

    /// One indicator per reachable offset.
    pub fn indicator_count(&self) -> usize {
        self.max_index() + 1
    }

    pub fn next(&mut self) {
        self.current = if self.current >= self.max_index() {
            0
        } else {
            self.current + 1
        };
    }

    pub fn prev(&mut self) {
        self.current = match self.current {
            0 => self.max_index(),
            n => (n - 1).min(self.max_index()),
        };
    }

    /// Offsets past the end are clamped.
    pub fn goto(&mut self, index: usize) {
        self.current = index.min(self.max_index());
    }

    /// Same arithmetic as [`CarouselState::next`]; timers differ, not state.
    pub fn auto_tick(&mut self) {
        self.next();
    }

    /// Apply a new window size, keeping the offset unless it no longer fits.
    pub fn resize(&mut self, per_view: usize) {
        self.per_view = per_view.clamp(1, self.total);
        self.current = self.current.min(self.max_index());
    }

    pub fn translation_percent(&self) -> f64 {
        if self.current == 0 {
            return 0.0;
        }
        -(self.current as f64) * (100.0 / self.per_view as f64)
    }

    pub fn transform(&self) -> String {
        format!("translateX({}%)", self.translation_percent())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselSettings {
    pub auto_advance: Duration,
    pub resize_debounce: Duration,
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self::from_config(&SliderConfig::default())
    }
}

impl CarouselSettings {
    pub fn from_config(config: &SliderConfig) -> Self {
        Self {
            auto_advance: Duration::from_millis(config.auto_slide_interval_ms),
            resize_debounce: Duration::from_millis(config.resize_debounce_ms),
        }
    }
}

#[derive(Debug)]
pub struct WindowedCarousel {
    /// `None` while inert.
    state: Option<CarouselState>,
    breakpoints: Breakpoints,
    settings: CarouselSettings,
    auto: TimerSlot,
    resize: Debouncer,
}

impl WindowedCarousel {
    pub fn inert(breakpoints: Breakpoints, settings: CarouselSettings) -> Self {
        Self {
            state: None,
            breakpoints,
            settings,
            auto: TimerSlot::new(),
            resize: Debouncer::new(settings.resize_debounce),
        }
    }

    /// Size the window for the current viewport, build the indicators,
    /// render offset 0 and start auto-advancing. Zero slides stays inert.
    pub fn initialize<H>(
        slides: usize,
        breakpoints: Breakpoints,
        settings: CarouselSettings,
        host: &mut H,
    ) -> Self
    where
        H: TimerHost + CarouselSurface + Viewport + ?Sized,
    {
        let mut carousel = Self::inert(breakpoints, settings);
        let per_view = breakpoints.slides_for_width(host.viewport_width());
        let Some(state) = CarouselState::new(slides, per_view) else {
            debug!("no slides, carousel is inert");
            return carousel;
        };

        host.rebuild_indicators(state.indicator_count());
        render(&state, host);
        carousel.state = Some(state);
        carousel.auto.arm_repeating(host, settings.auto_advance);
        info!(
            slides,
            per_view = state.per_view(),
            indicators = state.indicator_count(),
            "carousel initialized"
        );
        carousel
    }

    pub fn is_inert(&self) -> bool {
        self.state.is_none()
    }

    pub fn state(&self) -> Option<&CarouselState> {
        self.state.as_ref()
    }

    /// Handle of the live auto-advance timer, if any.
    pub fn auto_timer(&self) -> Option<TimerHandle> {
        self.auto.handle()
    }

    pub fn next<H>(&mut self, host: &mut H)
    where
        H: TimerHost + CarouselSurface + ?Sized,
    {
        self.manual(host, CarouselState::next);
    }

    pub fn prev<H>(&mut self, host: &mut H)
    where
        H: TimerHost + CarouselSurface + ?Sized,
    {
        self.manual(host, CarouselState::prev);
    }

    pub fn goto_index<H>(&mut self, index: usize, host: &mut H)
    where
        H: TimerHost + CarouselSurface + ?Sized,
    {
        self.manual(host, |state| state.goto(index));
    }

    /// Manual paging renders and then restarts the auto-advance interval
    /// within the same call, so no tick can slip in between.
    fn manual<H, F>(&mut self, host: &mut H, step: F)
    where
        H: TimerHost + CarouselSurface + ?Sized,
        F: FnOnce(&mut CarouselState),
    {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        step(state);
        trace!(current = state.current(), "carousel paged");
        render(state, host);
        self.auto.arm_repeating(host, self.settings.auto_advance);
    }

    /// Start (or restart) the resize quiescence window.
    pub fn on_resize<H>(&mut self, host: &mut H)
    where
        H: TimerHost + ?Sized,
    {
        if self.state.is_some() {
            self.resize.poke(host);
        }
    }

    /// Returns whether `handle` belonged to this carousel.
    pub fn on_timer<H>(&mut self, handle: TimerHandle, host: &mut H) -> bool
    where
        H: TimerHost + CarouselSurface + Viewport + ?Sized,
    {
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        if self.auto.owns(handle) {
            state.auto_tick();
            trace!(current = state.current(), "carousel auto-advanced");
            render(state, host);
            return true;
        }
        if self.resize.fire(handle) {
            state.resize(self.breakpoints.slides_for_width(host.viewport_width()));
            debug!(
                per_view = state.per_view(),
                current = state.current(),
                "carousel resized"
            );
            host.rebuild_indicators(state.indicator_count());
            render(state, host);
            return true;
        }
        false
    }
}

fn render<H: CarouselSurface + ?Sized>(state: &CarouselState, host: &mut H) {
    host.set_translation(&state.transform());
    host.highlight_indicator(state.current());
}
