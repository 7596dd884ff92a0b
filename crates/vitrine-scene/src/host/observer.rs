//! Geometry behind threshold-based visibility observation.

use serde::{Deserialize, Serialize};
use tracing::debug;
use vitrine_config::AnimationConfig;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Edge-inclusive intersection; touching rectangles yield a zero-area rect.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = (self.x + self.width).min(other.x + other.width);
        let bottom = (self.y + self.height).min(other.y + other.height);
        if right < left || bottom < top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "snake_case")]
pub enum MarginLength {
    Px(f64),
    Percent(f64),
}

impl MarginLength {
    fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if let Some(px) = token.strip_suffix("px") {
            return px.parse().ok().map(Self::Px);
        }
        if let Some(pct) = token.strip_suffix('%') {
            return pct.parse().ok().map(Self::Percent);
        }
        // Only a bare zero is allowed without a unit.
        match token.parse::<f64>() {
            Ok(v) if v == 0.0 => Some(Self::Px(0.0)),
            _ => None,
        }
    }

    fn resolve(self, basis: f64) -> f64 {
        match self {
            Self::Px(v) => v,
            Self::Percent(p) => basis * p / 100.0,
        }
    }
}

/// Grows (positive) or shrinks (negative) the viewport before intersecting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RootMargin {
    pub top: MarginLength,
    pub right: MarginLength,
    pub bottom: MarginLength,
    pub left: MarginLength,
}

impl Default for RootMargin {
    fn default() -> Self {
        let zero = MarginLength::Px(0.0);
        Self {
            top: zero,
            right: zero,
            bottom: zero,
            left: zero,
        }
    }
}

impl RootMargin {
    /// Parse CSS margin shorthand with one to four `px`/`%` values.
    pub fn parse(source: &str) -> Option<Self> {
        let values = source
            .split_whitespace()
            .map(MarginLength::parse)
            .collect::<Option<Vec<_>>>()?;
        let (top, right, bottom, left) = match values.as_slice() {
            [all] => (*all, *all, *all, *all),
            [vertical, horizontal] => (*vertical, *horizontal, *vertical, *horizontal),
            [top, horizontal, bottom] => (*top, *horizontal, *bottom, *horizontal),
            [top, right, bottom, left] => (*top, *right, *bottom, *left),
            _ => return None,
        };
        Some(Self {
            top,
            right,
            bottom,
            left,
        })
    }

    pub fn apply(&self, viewport: Rect) -> Rect {
        let top = self.top.resolve(viewport.height);
        let bottom = self.bottom.resolve(viewport.height);
        let left = self.left.resolve(viewport.width);
        let right = self.right.resolve(viewport.width);
        Rect::new(
            viewport.x - left,
            viewport.y - top,
            viewport.width + left + right,
            viewport.height + top + bottom,
        )
    }
}

/// Fraction of `element` inside the margin-adjusted `viewport`.
pub fn intersection_ratio(element: Rect, viewport: Rect, margin: &RootMargin) -> f64 {
    let root = margin.apply(viewport);
    let Some(overlap) = element.intersect(&root) else {
        return 0.0;
    };
    let area = element.area();
    if area == 0.0 {
        return 1.0;
    }
    (overlap.area() / area).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: RootMargin,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self::from_config(&AnimationConfig::default())
    }
}

impl ObserverOptions {
    pub fn from_config(config: &AnimationConfig) -> Self {
        let root_margin = RootMargin::parse(&config.root_margin).unwrap_or_else(|| {
            debug!(margin = %config.root_margin, "unparseable root margin, using zero");
            RootMargin::default()
        });
        Self {
            threshold: f64::from(config.threshold).clamp(0.0, 1.0),
            root_margin,
        }
    }

    pub fn is_visible(&self, element: Rect, viewport: Rect) -> bool {
        if self.threshold == 0.0 {
            return element.intersect(&self.root_margin.apply(viewport)).is_some();
        }
        intersection_ratio(element, viewport, &self.root_margin) >= self.threshold
    }
}
