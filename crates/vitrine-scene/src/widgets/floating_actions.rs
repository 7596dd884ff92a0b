//! Scroll progress ring plus the scroll-to-top, call and WhatsApp buttons.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::time::Duration;
use tracing::{debug, trace};
use vitrine_config::PageConfig;

use crate::host::{Navigator, Throttle, TimerHandle, TimerHost, WidgetSurface, WidgetTarget};

/// Radius of the progress ring in SVG user units.
pub const RING_RADIUS: f64 = 30.0;

/// Snapshot of the document's scroll geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollMetrics {
    pub scroll_y: f64,
    pub scroll_height: f64,
    pub viewport_height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollProgress {
    /// Percent scrolled, in `[0, 100]`.
    pub percent: f64,
    pub dash_offset: f64,
    pub show_scroll_top: bool,
}

impl ScrollProgress {
    pub fn circumference() -> f64 {
        2.0 * PI * RING_RADIUS
    }

    /// A document that cannot scroll reports zero progress.
    pub fn compute(metrics: ScrollMetrics, scroll_top_threshold: f64) -> Self {
        let scrollable = metrics.scroll_height - metrics.viewport_height;
        let percent = if scrollable > 0.0 {
            (metrics.scroll_y / scrollable * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        let circumference = Self::circumference();
        Self {
            percent,
            dash_offset: circumference - percent / 100.0 * circumference,
            show_scroll_top: metrics.scroll_y > scroll_top_threshold,
        }
    }
}

#[derive(Debug)]
pub struct FloatingActions {
    present: bool,
    threshold: f64,
    throttle: Throttle,
    last: Option<ScrollProgress>,
    call_href: String,
    whatsapp_href: String,
}

impl FloatingActions {
    pub fn mount(present: bool, config: &PageConfig) -> Self {
        Self {
            present,
            threshold: config.scroll_top_threshold,
            throttle: Throttle::new(Duration::from_millis(config.scroll_throttle_ms)),
            last: None,
            call_href: config.call_href.clone(),
            whatsapp_href: config.whatsapp_href.clone(),
        }
    }

    pub fn last(&self) -> Option<ScrollProgress> {
        self.last
    }

    /// Scroll events inside the throttle window are dropped.
    pub fn on_scroll<H>(&mut self, metrics: ScrollMetrics, host: &mut H)
    where
        H: TimerHost + WidgetSurface + ?Sized,
    {
        if !self.present || !self.throttle.try_acquire(host) {
            return;
        }
        let progress = ScrollProgress::compute(metrics, self.threshold);
        trace!(percent = progress.percent, "scroll progress");
        host.set_scroll_progress(progress.dash_offset);
        if self.last.map(|last| last.show_scroll_top) != Some(progress.show_scroll_top) {
            host.set_active(WidgetTarget::ScrollTopButton, progress.show_scroll_top);
        }
        self.last = Some(progress);
    }

    pub fn on_timer(&mut self, handle: TimerHandle) -> bool {
        self.throttle.on_timer(handle)
    }

    pub fn scroll_to_top<H: Navigator + ?Sized>(&self, host: &mut H) {
        if self.present {
            host.scroll_to_top();
        }
    }

    /// Follows the call link in place.
    pub fn call<H: Navigator + ?Sized>(&self, host: &mut H) {
        self.follow(&self.call_href, false, host);
    }

    /// Opens the chat link in a new tab.
    pub fn whatsapp<H: Navigator + ?Sized>(&self, host: &mut H) {
        self.follow(&self.whatsapp_href, true, host);
    }

    fn follow<H: Navigator + ?Sized>(&self, href: &str, new_tab: bool, host: &mut H) {
        if !self.present || href.is_empty() {
            return;
        }
        debug!(href, new_tab, "floating action link");
        host.open_link(href, new_tab);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn metrics(scroll_y: f64) -> ScrollMetrics {
        ScrollMetrics {
            scroll_y,
            scroll_height: 3000.0,
            viewport_height: 1000.0,
        }
    }

    #[test]
    fn progress_maps_to_dash_offset() {
        let circumference = ScrollProgress::circumference();
        let top = ScrollProgress::compute(metrics(0.0), 300.0);
        assert!((top.dash_offset - circumference).abs() < EPSILON);
        assert!(!top.show_scroll_top);

        let half = ScrollProgress::compute(metrics(1000.0), 300.0);
        assert!((half.percent - 50.0).abs() < EPSILON);
        assert!((half.dash_offset - circumference / 2.0).abs() < EPSILON);
        assert!(half.show_scroll_top);
    }

    #[test]
    fn progress_is_capped() {
        let past = ScrollProgress::compute(metrics(5000.0), 300.0);
        assert_eq!(past.percent, 100.0);
        assert!(past.dash_offset.abs() < EPSILON);
    }

    #[test]
    fn unscrollable_document_reports_zero() {
        let flat = ScrollMetrics {
            scroll_y: 0.0,
            scroll_height: 800.0,
            viewport_height: 800.0,
        };
        let progress = ScrollProgress::compute(flat, 300.0);
        assert_eq!(progress.percent, 0.0);
        assert!(progress.percent.is_finite());
    }

    #[derive(Default)]
    struct RecordingNavigator {
        scrolled_to_top: usize,
        links: Vec<(String, bool)>,
    }

    impl Navigator for RecordingNavigator {
        fn scroll_to_top(&mut self) {
            self.scrolled_to_top += 1;
        }

        fn open_link(&mut self, href: &str, new_tab: bool) {
            self.links.push((href.to_string(), new_tab));
        }
    }

    #[test]
    fn buttons_navigate() {
        let config = PageConfig::default();
        let actions = FloatingActions::mount(true, &config);
        let mut nav = RecordingNavigator::default();

        actions.scroll_to_top(&mut nav);
        actions.call(&mut nav);
        actions.whatsapp(&mut nav);

        assert_eq!(nav.scrolled_to_top, 1);
        assert_eq!(
            nav.links,
            vec![
                (config.call_href.clone(), false),
                (config.whatsapp_href.clone(), true),
            ]
        );
    }

    #[test]
    fn absent_buttons_do_nothing() {
        let actions = FloatingActions::mount(false, &PageConfig::default());
        let mut nav = RecordingNavigator::default();
        actions.scroll_to_top(&mut nav);
        actions.call(&mut nav);
        assert_eq!(nav.scrolled_to_top, 0);
        assert!(nav.links.is_empty());
    }

    #[test]
    fn scroll_top_threshold_is_exclusive() {
        assert!(!ScrollProgress::compute(metrics(300.0), 300.0).show_scroll_top);
        assert!(ScrollProgress::compute(metrics(301.0), 300.0).show_scroll_top);
    }
}
