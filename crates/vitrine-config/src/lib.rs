//! Vitrine configuration system
//!
//! Centralized settings for the page decorations, loaded from `vitrine.toml`
//! with environment variable overrides.

mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub use error::{ConfigError, Result};

/// Main configuration structure for Vitrine
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VitrineConfig {
    /// Reveal-on-scroll defaults
    pub animation: AnimationConfig,
    /// Logo carousel settings
    pub slider: SliderConfig,
    /// Collaborator widgets (sidebar, scroll progress)
    pub page: PageConfig,
    /// Headless demo settings
    pub demo: DemoConfig,
}

/// Reveal scheduler defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Transition duration used when an element declares none
    pub default_duration_ms: f64,
    /// CSS easing used when an element declares none
    pub default_easing: String,
    /// Fraction of the element area that must be visible to count as entered
    pub threshold: f32,
    /// Margin applied to the viewport before intersecting (CSS shorthand)
    pub root_margin: String,
    /// Stagger increment used by a `data-stagger` marker without a value
    pub stagger_base_ms: f64,
}

/// Logo carousel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    /// Minimum viewport width of the desktop tier
    pub desktop_breakpoint: u32,
    /// Minimum viewport width of the tablet tier
    pub tablet_breakpoint: u32,
    pub desktop_slides: usize,
    pub tablet_slides: usize,
    pub mobile_slides: usize,
    /// Interval of the auto-advance timer
    pub auto_slide_interval_ms: u64,
    /// Quiescence window before a resize is applied
    pub resize_debounce_ms: u64,
}

/// Collaborator widget configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// The sidebar closes when the viewport grows wider than this
    pub sidebar_close_width: u32,
    /// Delay before the sidebar closes after a nav link click
    pub sidebar_close_delay_ms: u64,
    /// Scroll offset after which the scroll-to-top button shows
    pub scroll_top_threshold: f64,
    /// Minimum spacing between scroll progress updates
    pub scroll_throttle_ms: u64,
    /// Link followed by the floating call button
    pub call_href: String,
    /// Link the floating WhatsApp button opens in a new tab
    pub whatsapp_href: String,
    /// How long the testimonial marquee stays paused after a release
    pub marquee_resume_ms: u64,
    /// Quiescence window before connection lines are recomputed on resize
    pub connection_debounce_ms: u64,
}

/// Headless demo configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// HTML page to mount (falls back to the bundled sample page)
    pub page: Option<PathBuf>,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: 700.0,
            default_easing: "cubic-bezier(0.22,1,0.36,1)".to_string(),
            threshold: 0.15,
            root_margin: "0px 0px -10% 0px".to_string(),
            stagger_base_ms: 100.0,
        }
    }
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            desktop_breakpoint: 1200,
            tablet_breakpoint: 768,
            desktop_slides: 6,
            tablet_slides: 3,
            mobile_slides: 1,
            auto_slide_interval_ms: 5000,
            resize_debounce_ms: 250,
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            sidebar_close_width: 768,
            sidebar_close_delay_ms: 300,
            scroll_top_threshold: 300.0,
            scroll_throttle_ms: 100,
            call_href: "tel:+919999999999".to_string(),
            whatsapp_href: "https://wa.me/9199999999999".to_string(),
            marquee_resume_ms: 3000,
            connection_debounce_ms: 100,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            page: None,
            viewport_width: 1280,
            viewport_height: 800,
        }
    }
}

impl VitrineConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from `vitrine.toml` in the current directory,
    /// or return the defaults if it is missing or invalid
    pub fn load_or_default() -> Self {
        match Self::load_from_file("vitrine.toml") {
            Ok(config) => config,
            Err(err) => {
                debug!(%err, "using default configuration");
                Self::default()
            }
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// Values that fail to parse are ignored.
    pub fn merge_with_env(&mut self) {
        if let Ok(page) = std::env::var("VITRINE_PAGE") {
            self.demo.page = Some(PathBuf::from(page));
        }
        if let Ok(val) = std::env::var("VITRINE_VIEWPORT_WIDTH") {
            if let Ok(width) = val.parse::<u32>() {
                self.demo.viewport_width = width;
            }
        }
        if let Ok(val) = std::env::var("VITRINE_VIEWPORT_HEIGHT") {
            if let Ok(height) = val.parse::<u32>() {
                self.demo.viewport_height = height;
            }
        }

        if let Ok(val) = std::env::var("VITRINE_ANIM_DURATION") {
            if let Ok(ms) = val.parse::<f64>() {
                self.animation.default_duration_ms = ms;
            }
        }
        if let Ok(ease) = std::env::var("VITRINE_ANIM_EASE") {
            self.animation.default_easing = ease;
        }

        if let Ok(val) = std::env::var("VITRINE_AUTO_SLIDE_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                self.slider.auto_slide_interval_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("VITRINE_RESIZE_DEBOUNCE_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                self.slider.resize_debounce_ms = ms;
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from vitrine.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
