//! Viewport-driven reveal scheduling.
//!
//! Elements tagged `data-animate` are registered once, when the scheduler is
//! initialized. Each entry caches its timing and its position inside the
//! nearest `data-stagger` group, so visibility events never query the
//! document again.
//!
//! ```text
//! IntersectionEntry ──▶ RevealEntry::on_visibility (pure) ──▶ RevealAction
//!                                                              │
//!                    RevealSurface / VisibilityObserver ◀──────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, trace};
use vitrine_config::AnimationConfig;
use vitrine_ir::{ElementId, PageDocument};

use super::easing::TimingCurve;
use super::timing::{parse_stagger_base, parse_time_attr};
use crate::host::{IntersectionEntry, RevealSurface, VisibilityObserver};

pub const ANIMATE_ATTR: &str = "data-animate";
pub const DURATION_ATTR: &str = "data-duration";
pub const DELAY_ATTR: &str = "data-delay";
pub const EASING_ATTR: &str = "data-easing";
pub const ONCE_ATTR: &str = "data-once";
pub const STAGGER_ATTR: &str = "data-stagger";

pub const DURATION_PROPERTY: &str = "--anim-duration";
pub const EASING_PROPERTY: &str = "--anim-ease";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatPolicy {
    /// Reveal on first entry, then stop observing.
    Once,
    /// Reveal on every entry, hide again on every exit.
    Always,
}

impl RepeatPolicy {
    /// Only the literal `"false"` opts out of once-only reveals.
    pub fn from_attr(raw: Option<&str>) -> Self {
        match raw {
            Some("false") => Self::Always,
            _ => Self::Once,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealState {
    #[default]
    Hidden,
    Revealed,
}

/// What gets written to an element's transition when it reveals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedTiming {
    pub duration_ms: f64,
    pub delay_ms: f64,
    pub easing: TimingCurve,
}

impl AppliedTiming {
    /// Eased transition progress `elapsed_ms` after the reveal was applied.
    /// `None` when the curve cannot be evaluated here.
    pub fn progress_at(&self, elapsed_ms: f64) -> Option<f32> {
        let running = elapsed_ms - self.delay_ms;
        let t = if running <= 0.0 {
            0.0
        } else if self.duration_ms <= 0.0 {
            1.0
        } else {
            (running / self.duration_ms).min(1.0)
        };
        self.easing.sample(t as f32)
    }
}

/// Process-wide fallbacks for elements that declare no timing of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealDefaults {
    pub duration_ms: f64,
    pub easing: TimingCurve,
    pub stagger_base_ms: f64,
}

impl Default for RevealDefaults {
    fn default() -> Self {
        Self::from_config(&AnimationConfig::default())
    }
}

impl RevealDefaults {
    pub fn from_config(config: &AnimationConfig) -> Self {
        let easing = TimingCurve::new(&config.default_easing).unwrap_or_else(|| {
            debug!("blank default easing, using ease");
            TimingCurve::default()
        });
        Self {
            duration_ms: config.default_duration_ms,
            easing,
            stagger_base_ms: config.stagger_base_ms,
        }
    }

    /// Apply `--anim-duration` / `--anim-ease` declared on the page's `:root`.
    pub fn with_page_overrides(mut self, document: &PageDocument) -> Self {
        self.duration_ms = parse_time_attr(document.root_property(DURATION_PROPERTY), self.duration_ms);
        if let Some(easing) = document
            .root_property(EASING_PROPERTY)
            .and_then(TimingCurve::new)
        {
            self.easing = easing;
        }
        self
    }
}

/// Membership in a stagger group, fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaggerSlot {
    pub group: ElementId,
    pub index: usize,
    pub base_ms: f64,
}

impl StaggerSlot {
    pub fn offset_ms(&self) -> f64 {
        (self.base_ms * self.index as f64).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealAction {
    Reveal { unobserve: bool },
    Conceal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealEntry {
    pub target: ElementId,
    pub duration_ms: f64,
    pub own_delay_ms: f64,
    pub easing: TimingCurve,
    pub policy: RepeatPolicy,
    pub stagger: Option<StaggerSlot>,
    pub state: RevealState,
    pub observed: bool,
}

impl RevealEntry {
    pub fn effective_delay_ms(&self) -> f64 {
        self.own_delay_ms + self.stagger.map_or(0.0, |slot| slot.offset_ms())
    }

    pub fn timing(&self) -> AppliedTiming {
        AppliedTiming {
            duration_ms: self.duration_ms,
            delay_ms: self.effective_delay_ms(),
            easing: self.easing.clone(),
        }
    }

    /// Pure state transition for one visibility change.
    ///
    /// Entries that are no longer observed ignore every event, which makes a
    /// repeated entry on a once-only element a no-op.
    pub fn on_visibility(&mut self, visible: bool) -> Option<RevealAction> {
        if !self.observed {
            return None;
        }
        match (visible, self.policy) {
            (true, policy) => {
                self.state = RevealState::Revealed;
                let unobserve = policy == RepeatPolicy::Once;
                if unobserve {
                    self.observed = false;
                }
                Some(RevealAction::Reveal { unobserve })
            }
            (false, RepeatPolicy::Always) => {
                self.state = RevealState::Hidden;
                Some(RevealAction::Conceal)
            }
            (false, RepeatPolicy::Once) => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct RevealScheduler {
    entries: Vec<RevealEntry>,
    by_target: HashMap<ElementId, usize>,
}

impl RevealScheduler {
    /// Scan `document` once, register every tagged element and start
    /// observing it. A page without tagged elements yields an inert scheduler.
    pub fn initialize<O>(document: &PageDocument, defaults: &RevealDefaults, observer: &mut O) -> Self
    where
        O: VisibilityObserver + ?Sized,
    {
        let mut members: HashMap<ElementId, Vec<ElementId>> = HashMap::new();
        let mut scheduler = Self::default();

        for target in document.elements_with_attr(ANIMATE_ATTR) {
            let stagger = document.closest_with_attr(target, STAGGER_ATTR).map(|group| {
                let group_members = members
                    .entry(group)
                    .or_insert_with(|| document.descendants_with_attr(group, ANIMATE_ATTR).collect());
                StaggerSlot {
                    group,
                    // A group marker that is itself animated is not its own member.
                    index: group_members.iter().position(|id| *id == target).unwrap_or(0),
                    base_ms: parse_stagger_base(
                        document.attribute(group, STAGGER_ATTR),
                        defaults.stagger_base_ms,
                    ),
                }
            });

            let easing = document
                .attribute(target, EASING_ATTR)
                .and_then(TimingCurve::new)
                .unwrap_or_else(|| defaults.easing.clone());
            if easing.function().is_none() {
                trace!(element = %target, easing = easing.css(), "easing applied verbatim");
            }

            let entry = RevealEntry {
                target,
                duration_ms: parse_time_attr(document.attribute(target, DURATION_ATTR), defaults.duration_ms),
                own_delay_ms: parse_time_attr(document.attribute(target, DELAY_ATTR), 0.0),
                easing,
                policy: RepeatPolicy::from_attr(document.attribute(target, ONCE_ATTR)),
                stagger,
                state: RevealState::Hidden,
                observed: true,
            };
            scheduler.by_target.insert(target, scheduler.entries.len());
            scheduler.entries.push(entry);
            observer.observe(target);
        }

        if scheduler.entries.is_empty() {
            debug!("no animatable elements, reveal scheduler is inert");
        } else {
            info!(
                elements = scheduler.entries.len(),
                groups = members.len(),
                "reveal scheduler initialized"
            );
        }
        scheduler
    }

    pub fn is_inert(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RevealEntry] {
        &self.entries
    }

    pub fn entry(&self, target: ElementId) -> Option<&RevealEntry> {
        self.by_target.get(&target).map(|&i| &self.entries[i])
    }

    pub fn observed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.observed).count()
    }

    /// Handle one batch from the visibility observer. Unknown targets are
    /// ignored.
    pub fn on_intersections<H>(&mut self, batch: &[IntersectionEntry], host: &mut H)
    where
        H: VisibilityObserver + RevealSurface + ?Sized,
    {
        for change in batch {
            let Some(&index) = self.by_target.get(&change.target) else {
                continue;
            };
            let entry = &mut self.entries[index];
            match entry.on_visibility(change.is_intersecting) {
                Some(RevealAction::Reveal { unobserve }) => {
                    let timing = entry.timing();
                    trace!(element = %entry.target, delay_ms = timing.delay_ms, "reveal");
                    host.set_transition(entry.target, &timing);
                    host.set_in_view(entry.target, true);
                    if unobserve {
                        host.unobserve(entry.target);
                    }
                }
                Some(RevealAction::Conceal) => {
                    trace!(element = %entry.target, "conceal");
                    host.set_in_view(entry.target, false);
                    host.set_transition_delay(entry.target, 0.0);
                }
                None => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(policy: RepeatPolicy) -> RevealEntry {
        RevealEntry {
            target: ElementId(3),
            duration_ms: 700.0,
            own_delay_ms: 50.0,
            easing: TimingCurve::default(),
            policy,
            stagger: Some(StaggerSlot {
                group: ElementId(1),
                index: 2,
                base_ms: 100.0,
            }),
            state: RevealState::Hidden,
            observed: true,
        }
    }

    #[test]
    fn effective_delay_adds_stagger_offset() {
        assert_eq!(entry(RepeatPolicy::Once).effective_delay_ms(), 250.0);
    }

    #[test]
    fn negative_stagger_base_clamps_offset_to_zero() {
        let slot = StaggerSlot {
            group: ElementId(0),
            index: 4,
            base_ms: -20.0,
        };
        assert_eq!(slot.offset_ms(), 0.0);
    }

    #[test]
    fn once_entries_stop_after_first_reveal() {
        let mut e = entry(RepeatPolicy::Once);
        assert_eq!(e.on_visibility(false), None);
        assert_eq!(e.on_visibility(true), Some(RevealAction::Reveal { unobserve: true }));
        assert_eq!(e.state, RevealState::Revealed);
        assert_eq!(e.on_visibility(true), None);
        assert_eq!(e.on_visibility(false), None);
        assert_eq!(e.state, RevealState::Revealed);
    }

    #[test]
    fn always_entries_toggle_both_ways() {
        let mut e = entry(RepeatPolicy::Always);
        assert_eq!(e.on_visibility(true), Some(RevealAction::Reveal { unobserve: false }));
        assert_eq!(e.on_visibility(false), Some(RevealAction::Conceal));
        assert_eq!(e.state, RevealState::Hidden);
        assert_eq!(e.on_visibility(true), Some(RevealAction::Reveal { unobserve: false }));
        assert!(e.observed);
    }

    #[test]
    fn repeat_policy_reads_literal_false_only() {
        assert_eq!(RepeatPolicy::from_attr(None), RepeatPolicy::Once);
        assert_eq!(RepeatPolicy::from_attr(Some("true")), RepeatPolicy::Once);
        assert_eq!(RepeatPolicy::from_attr(Some("")), RepeatPolicy::Once);
        assert_eq!(RepeatPolicy::from_attr(Some("False")), RepeatPolicy::Once);
        assert_eq!(RepeatPolicy::from_attr(Some("false")), RepeatPolicy::Always);
    }

    #[test]
    fn defaults_follow_config() {
        let defaults = RevealDefaults::default();
        assert_eq!(defaults.duration_ms, 700.0);
        assert_eq!(defaults.stagger_base_ms, 100.0);
        assert_eq!(defaults.easing.css(), "cubic-bezier(0.22,1,0.36,1)");

        let config = AnimationConfig {
            default_easing: "var(--ease-out)".into(),
            ..AnimationConfig::default()
        };
        assert_eq!(RevealDefaults::from_config(&config).easing.css(), "var(--ease-out)");

        let blank = AnimationConfig {
            default_easing: " ".into(),
            ..AnimationConfig::default()
        };
        assert_eq!(RevealDefaults::from_config(&blank).easing.css(), "ease");
    }

    #[test]
    fn progress_waits_for_delay_then_eases() {
        let timing = AppliedTiming {
            duration_ms: 400.0,
            delay_ms: 100.0,
            easing: TimingCurve::new("linear").unwrap(),
        };
        assert_eq!(timing.progress_at(50.0), Some(0.0));
        assert_eq!(timing.progress_at(300.0), Some(0.5));
        assert_eq!(timing.progress_at(900.0), Some(1.0));

        let opaque = AppliedTiming {
            easing: TimingCurve::new("linear(0, 1)").unwrap(),
            ..timing
        };
        assert_eq!(opaque.progress_at(300.0), None);
    }
}
