//! CSS timing functions.
//!
//! Reveal transitions carry their easing as an [`EasingFunction`], parsed
//! from the element's `data-easing` attribute (or the page default) and
//! written back out as CSS when the transition is applied.
//!
//! ```
//! use vitrine_scene::animation::easing::EasingFunction;
//!
//! let ease = EasingFunction::parse("cubic-bezier(0.22, 1, 0.36, 1)").unwrap();
//! assert_eq!(ease.to_string(), "cubic-bezier(0.22, 1, 0.36, 1)");
//! let progress = ease.evaluate(0.5);
//! assert!(progress > 0.5);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position for stepped easing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPosition {
    /// `jump-start` / `start`
    Start,
    /// `jump-end` / `end`
    #[default]
    End,
    /// `jump-both`
    Both,
    /// `jump-none`
    None,
}

impl StepPosition {
    fn parse(keyword: &str) -> Option<Self> {
        match keyword {
            "jump-start" | "start" => Some(Self::Start),
            "jump-end" | "end" => Some(Self::End),
            "jump-both" => Some(Self::Both),
            "jump-none" => Some(Self::None),
            _ => None,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            Self::Start => "jump-start",
            Self::End => "jump-end",
            Self::Both => "jump-both",
            Self::None => "jump-none",
        }
    }
}

/// Maps linear progress in `[0, 1]` to eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    Linear,
    /// `cubic-bezier(0.25, 0.1, 0.25, 1.0)`
    #[default]
    Ease,
    /// `cubic-bezier(0.42, 0, 1, 1)`
    EaseIn,
    /// `cubic-bezier(0, 0, 0.58, 1)`
    EaseOut,
    /// `cubic-bezier(0.42, 0, 0.58, 1)`
    EaseInOut,
    /// x values lie in [0, 1]; y values are unbounded.
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
    /// `count` is at least 1 (at least 2 for `jump-none`).
    Steps { count: u32, position: StepPosition },
}

impl EasingFunction {
    /// Parse a CSS `<easing-function>`. Returns `None` for anything this
    /// runtime cannot evaluate.
    pub fn parse(css: &str) -> Option<Self> {
        let css = css.trim().to_ascii_lowercase();
        match css.as_str() {
            "linear" => return Some(Self::Linear),
            "ease" => return Some(Self::Ease),
            "ease-in" => return Some(Self::EaseIn),
            "ease-out" => return Some(Self::EaseOut),
            "ease-in-out" => return Some(Self::EaseInOut),
            "step-start" => {
                return Some(Self::Steps {
                    count: 1,
                    position: StepPosition::Start,
                });
            }
            "step-end" => {
                return Some(Self::Steps {
                    count: 1,
                    position: StepPosition::End,
                });
            }
            _ => {}
        }

        let (name, args) = css.strip_suffix(')')?.split_once('(')?;
        let args: Vec<&str> = args.split(',').map(str::trim).collect();
        match (name.trim(), args.as_slice()) {
            ("cubic-bezier", [x1, y1, x2, y2]) => {
                let x1: f32 = x1.parse().ok()?;
                let y1: f32 = y1.parse().ok()?;
                let x2: f32 = x2.parse().ok()?;
                let y2: f32 = y2.parse().ok()?;
                let valid_x = (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2);
                let finite = y1.is_finite() && y2.is_finite();
                (valid_x && finite).then_some(Self::CubicBezier { x1, y1, x2, y2 })
            }
            ("steps", [count]) => Self::steps(count, StepPosition::End),
            ("steps", [count, position]) => Self::steps(count, StepPosition::parse(position)?),
            _ => None,
        }
    }

    fn steps(count: &str, position: StepPosition) -> Option<Self> {
        let count: u32 = count.parse().ok()?;
        let minimum = if position == StepPosition::None { 2 } else { 1 };
        (count >= minimum).then_some(Self::Steps { count, position })
    }

    /// Eased progress at `t`; input is clamped to `[0, 1]`, output may
    /// overshoot for some bezier curves.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(*x1, *y1, *x2, *y2, t),
            Self::Steps { count, position } => stepped(*count, *position, t),
        }
    }
}

impl fmt::Display for EasingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::Ease => f.write_str("ease"),
            Self::EaseIn => f.write_str("ease-in"),
            Self::EaseOut => f.write_str("ease-out"),
            Self::EaseInOut => f.write_str("ease-in-out"),
            Self::CubicBezier { x1, y1, x2, y2 } => {
                write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
            Self::Steps { count, position } => {
                write!(f, "steps({count}, {})", position.keyword())
            }
        }
    }
}

/// A `transition-timing-function` value exactly as the page wrote it.
///
/// The text is what gets applied; the parsed [`EasingFunction`] is kept only
/// for sampling and is `None` for curves this runtime cannot evaluate, such
/// as `linear(...)` stops or `var(...)` references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingCurve {
    css: String,
    function: Option<EasingFunction>,
}

impl TimingCurve {
    /// `None` for blank input.
    pub fn new(css: &str) -> Option<Self> {
        let css = css.trim();
        if css.is_empty() {
            return None;
        }
        Some(Self {
            css: css.to_string(),
            function: EasingFunction::parse(css),
        })
    }

    pub fn css(&self) -> &str {
        &self.css
    }

    pub fn function(&self) -> Option<EasingFunction> {
        self.function
    }

    /// Eased progress at `t`, when the curve is evaluable.
    pub fn sample(&self, t: f32) -> Option<f32> {
        self.function.map(|function| function.evaluate(t))
    }
}

impl From<EasingFunction> for TimingCurve {
    fn from(function: EasingFunction) -> Self {
        Self {
            css: function.to_string(),
            function: Some(function),
        }
    }
}

impl Default for TimingCurve {
    fn default() -> Self {
        EasingFunction::default().into()
    }
}

impl fmt::Display for TimingCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css)
    }
}

fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, progress: f32) -> f32 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }
    let t = solve_bezier_x(x1, x2, progress);
    bezier_component(y1, y2, t)
}

/// Newton-Raphson for the curve parameter whose x equals `target_x`.
fn solve_bezier_x(x1: f32, x2: f32, target_x: f32) -> f32 {
    let mut t = target_x;
    for _ in 0..8 {
        let error = bezier_component(x1, x2, t) - target_x;
        if error.abs() < 1e-6 {
            break;
        }
        let slope = bezier_x_derivative(x1, x2, t);
        if slope.abs() < 1e-6 {
            break;
        }
        t = (t - error / slope).clamp(0.0, 1.0);
    }
    t
}

/// 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³
#[inline]
fn bezier_component(p1: f32, p2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

#[inline]
fn bezier_x_derivative(x1: f32, x2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * x1 + 6.0 * mt * t * (x2 - x1) + 3.0 * t * t * (1.0 - x2)
}

fn stepped(steps: u32, position: StepPosition, t: f32) -> f32 {
    if steps == 0 {
        return t;
    }
    let n = steps as f32;
    match position {
        StepPosition::Start => (t * n).ceil() / n,
        StepPosition::End => (t * n).floor() / n,
        StepPosition::Both => ((t * n).floor() + 1.0).min(n + 1.0) / (n + 1.0),
        StepPosition::None if steps == 1 => 0.5,
        StepPosition::None => ((t * n).floor().min(n - 1.0) / (n - 1.0)).min(1.0),
    }
}
