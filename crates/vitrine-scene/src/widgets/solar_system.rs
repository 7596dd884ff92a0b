//! Lines from the centre logo to each orbiting planet.
//!
//! Geometry is measured relative to the system container, so a line starts
//! at the centre logo's midpoint, is as long as the distance to a planet's
//! midpoint and is rotated by the angle of that vector.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, trace};
use vitrine_config::PageConfig;
use vitrine_ir::ElementId;

use crate::host::{ConnectionSurface, Debouncer, LayoutQuery, Rect, TimerHandle, TimerHost};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectionLine {
    /// Start point, relative to the system container.
    pub left: f64,
    pub top: f64,
    pub length: f64,
    /// Clockwise from the positive x axis, in `(-180, 180]`.
    pub angle_deg: f64,
}

impl ConnectionLine {
    pub fn transform(&self) -> String {
        format!("rotate({}deg)", self.angle_deg)
    }
}

/// One line per planet, in the order given.
pub fn connection_lines<I>(system: Rect, center: Rect, planets: I) -> Vec<ConnectionLine>
where
    I: IntoIterator<Item = Rect>,
{
    let (cx, cy) = center.center();
    let (left, top) = (cx - system.x, cy - system.y);
    planets
        .into_iter()
        .map(|planet| {
            let (px, py) = planet.center();
            let (dx, dy) = (px - cx, py - cy);
            ConnectionLine {
                left,
                top,
                length: dx.hypot(dy),
                angle_deg: dy.atan2(dx).to_degrees(),
            }
        })
        .collect()
}

/// Elements making up the solar system section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolarMarkup {
    pub system: ElementId,
    pub center: ElementId,
    pub planets: Vec<ElementId>,
}

#[derive(Debug)]
pub struct SolarSystem {
    markup: Option<SolarMarkup>,
    resize: Debouncer,
    lines: Vec<ConnectionLine>,
}

impl SolarSystem {
    pub fn mount(markup: Option<SolarMarkup>, config: &PageConfig) -> Self {
        Self {
            markup,
            resize: Debouncer::new(Duration::from_millis(config.connection_debounce_ms)),
            lines: Vec::new(),
        }
    }

    pub fn is_inert(&self) -> bool {
        self.markup.is_none()
    }

    pub fn lines(&self) -> &[ConnectionLine] {
        &self.lines
    }

    /// Measure and redraw now. Planets without a layout box are skipped.
    pub fn refresh<H>(&mut self, host: &mut H)
    where
        H: LayoutQuery + ConnectionSurface + ?Sized,
    {
        let Some(markup) = &self.markup else {
            return;
        };
        let (Some(system), Some(center)) = (
            host.bounding_rect(markup.system),
            host.bounding_rect(markup.center),
        ) else {
            debug!("solar system not laid out, no connection lines");
            return;
        };
        let planets = markup
            .planets
            .iter()
            .filter_map(|planet| host.bounding_rect(*planet));
        self.lines = connection_lines(system, center, planets);
        trace!(lines = self.lines.len(), "connection lines drawn");
        host.draw_connection_lines(&self.lines);
    }

    pub fn on_resize<H: TimerHost + ?Sized>(&mut self, host: &mut H) {
        if self.markup.is_some() {
            self.resize.poke(host);
        }
    }

    pub fn on_timer<H>(&mut self, handle: TimerHandle, host: &mut H) -> bool
    where
        H: LayoutQuery + ConnectionSurface + ?Sized,
    {
        if !self.resize.fire(handle) {
            return false;
        }
        self.refresh(host);
        true
    }
}
