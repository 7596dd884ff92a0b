//! Reveal-on-scroll animation.
//!
//! - **Easing**: CSS timing functions, parsed from and rendered back to CSS
//! - **Timing**: lenient parsing of `250ms` / `0.25s` style attribute values
//! - **Reveal**: the scheduler that turns visibility changes into transitions

pub mod easing;
pub mod reveal;
pub mod timing;

pub use easing::{EasingFunction, StepPosition, TimingCurve};
pub use reveal::{
    AppliedTiming, RepeatPolicy, RevealAction, RevealDefaults, RevealEntry, RevealScheduler,
    RevealState, StaggerSlot,
};
pub use timing::{RawTime, parse_stagger_base, parse_time, parse_time_attr};
