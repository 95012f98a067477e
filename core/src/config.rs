use serde::{Deserialize, Serialize};

use crate::carousel::{AUTO_ADVANCE_MS, DRAG_THRESHOLD_PX};
use crate::contact::{ContactTransport, SENDING_LABEL, SUCCESS_MESSAGE_MS};
use crate::counter::{COUNTER_DURATION_MS, COUNTER_TICK_MS, DEFAULT_COUNTER_SUFFIX};
use crate::error::ConfigError;
use crate::geometry::RootMargin;
use crate::policy::TriggerPolicy;
use crate::reload::{DevReloadMode, POLL_INTERVAL_MS, RELOAD_SOCKET_URL, SOCKET_FALLBACK_MS};
use crate::strategy::StrategyPreference;
use crate::tween::{Ease, TweenSpec};
use crate::watcher::WatchOptions;

pub const SITE_CONFIG_ELEMENT_ID: &str = "site-config";

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub reveal: RevealConfig,
    pub counters: CounterConfig,
    pub cursor: CursorConfig,
    pub carousel: CarouselConfig,
    pub portfolio: PortfolioConfig,
    pub contact: ContactConfig,
    pub media: MediaConfig,
    pub animation: AnimationConfig,
    pub dev_reload: DevReloadConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    pub selectors: Vec<String>,
    pub grid_selectors: Vec<String>,
    pub above_fold_selectors: Vec<String>,
    pub visible_class: String,
    pub grid_class: String,
    pub threshold: f64,
    pub root_margin: String,
    pub policy: TriggerPolicy,
    pub stagger_ms: u32,
    pub max_stagger_ms: u32,
    pub tweens: Vec<TweenRevealConfig>,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selectors: strings(&[
                ".fade-in-element",
                "[class*=\"card\"]",
                ".hero-content",
                ".story-text",
                ".join-content",
                ".promise-card",
                ".service-body",
                ".project-card",
                ".furniture-card",
                ".team-card",
                "section h2",
                ".portfolio-header",
                ".contact-info",
                ".contact-form",
            ]),
            grid_selectors: strings(&[
                ".team-grid",
                ".services-grid",
                ".furniture-grid",
                ".portfolio-grid",
                ".promise-grid",
                ".story-section",
            ]),
            above_fold_selectors: strings(&[".hero", ".portfolio-header"]),
            visible_class: "fade-in-visible".to_string(),
            grid_class: "fade-in-grid".to_string(),
            threshold: 0.15,
            root_margin: "0px 0px -10% 0px".to_string(),
            policy: TriggerPolicy::Once,
            stagger_ms: 100,
            max_stagger_ms: 800,
            tweens: vec![
                TweenRevealConfig::default(),
                TweenRevealConfig {
                    selectors: strings(&[".footer-container > div"]),
                    offset_y: 100.0,
                    from_scale: 1.0,
                    stagger_ms: 200,
                    root_margin: "0px 0px -10% 0px".to_string(),
                    ..TweenRevealConfig::default()
                },
            ],
        }
    }
}

impl RevealConfig {
    pub fn watch_options(&self) -> WatchOptions {
        WatchOptions::new(self.threshold, self.policy)
    }

    pub fn margin(&self) -> Result<RootMargin, ConfigError> {
        self.root_margin
            .parse::<RootMargin>()
            .map_err(|source| ConfigError::Margin {
                field: "reveal.root_margin",
                source,
            })
    }

    pub fn stagger_delay_ms(&self, index: usize) -> u32 {
        let delay = (index as u64).saturating_mul(self.stagger_ms as u64);
        delay.min(self.max_stagger_ms as u64) as u32
    }
}

/// Fade-up entrance played through the animator instead of a class toggle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TweenRevealConfig {
    pub selectors: Vec<String>,
    /// Starting offset below the resting position.
    pub offset_y: f64,
    pub from_scale: f64,
    pub duration_s: f64,
    pub ease: Ease,
    /// Delay step between consecutive matches of one selector.
    pub stagger_ms: u32,
    pub threshold: f64,
    pub root_margin: String,
    pub policy: TriggerPolicy,
}

impl Default for TweenRevealConfig {
    fn default() -> Self {
        Self {
            selectors: strings(&[
                ".trusted-text",
                ".ourwork-header h2 span",
                ".ourwork-header p",
                ".featured-title",
                ".text-sectionz h2",
            ]),
            offset_y: 80.0,
            from_scale: 0.9,
            duration_s: 1.0,
            ease: Ease::Power3Out,
            stagger_ms: 150,
            threshold: 0.0,
            root_margin: "0px 0px -15% 0px".to_string(),
            policy: TriggerPolicy::Repeat,
        }
    }
}

impl TweenRevealConfig {
    pub fn watch_options(&self) -> WatchOptions {
        WatchOptions::new(self.threshold, self.policy)
    }

    pub fn margin(&self) -> Result<RootMargin, ConfigError> {
        self.root_margin
            .parse::<RootMargin>()
            .map_err(|source| ConfigError::Margin {
                field: "reveal.tweens.root_margin",
                source,
            })
    }

    /// Resting-below state, reached over `duration_s` (zero sets it at once).
    pub fn hidden(&self, duration_s: f64) -> TweenSpec {
        TweenSpec::new(duration_s)
            .translate(0.0, self.offset_y)
            .scale(self.from_scale)
            .opacity(0.0)
            .ease(self.ease)
    }

    /// Entrance for the `index`-th match of its selector.
    pub fn shown(&self, index: usize) -> TweenSpec {
        let delay_ms = (index as u64).saturating_mul(self.stagger_ms as u64);
        TweenSpec::new(self.duration_s)
            .translate(0.0, 0.0)
            .scale(1.0)
            .opacity(1.0)
            .ease(self.ease)
            .delay(delay_ms as f64 / 1000.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CounterConfig {
    pub selector: String,
    pub stat_selector: String,
    pub counted_class: String,
    pub pulse_class: String,
    pub threshold: f64,
    pub root_margin: String,
    pub policy: TriggerPolicy,
    pub duration_ms: u32,
    pub tick_ms: u32,
    pub suffix: String,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            selector: "[data-target]".to_string(),
            stat_selector: ".stats-section .stat".to_string(),
            counted_class: "counted".to_string(),
            pulse_class: "stat-pulse".to_string(),
            threshold: 0.7,
            root_margin: "0px".to_string(),
            policy: TriggerPolicy::Once,
            duration_ms: COUNTER_DURATION_MS,
            tick_ms: COUNTER_TICK_MS,
            suffix: DEFAULT_COUNTER_SUFFIX.to_string(),
        }
    }
}

impl CounterConfig {
    pub fn watch_options(&self) -> WatchOptions {
        WatchOptions::new(self.threshold, self.policy)
    }

    pub fn margin(&self) -> Result<RootMargin, ConfigError> {
        self.root_margin
            .parse::<RootMargin>()
            .map_err(|source| ConfigError::Margin {
                field: "counters.root_margin",
                source,
            })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CursorConfig {
    pub cursor: String,
    pub follower: String,
    pub hover_targets: String,
    pub tilt_cards: String,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            cursor: ".cursor".to_string(),
            follower: ".cursor-follower".to_string(),
            hover_targets: "a, button, .project-card".to_string(),
            tilt_cards: ".project-card".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    pub root: String,
    pub track: String,
    pub slide: String,
    pub prev: String,
    pub next: String,
    pub dot: String,
    pub active_class: String,
    pub interval_ms: u32,
    pub drag_threshold_px: f64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            root: ".testimonial-carousel".to_string(),
            track: ".testimonial-track".to_string(),
            slide: ".testimonial-slide".to_string(),
            prev: ".carousel-prev".to_string(),
            next: ".carousel-next".to_string(),
            dot: ".carousel-dot".to_string(),
            active_class: "active".to_string(),
            interval_ms: AUTO_ADVANCE_MS,
            drag_threshold_px: DRAG_THRESHOLD_PX,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortfolioConfig {
    pub filter_button: String,
    pub filter_item: String,
    pub active_class: String,
    /// Cards that open the modal; the n-th card shows the n-th catalog entry.
    pub modal_item: String,
    pub modal: String,
    pub open_class: String,
    pub modal_content: String,
    pub close: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub client: String,
    pub location: String,
    pub year: String,
    pub image: String,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            filter_button: ".filter-btn".to_string(),
            filter_item: ".project-card".to_string(),
            active_class: "active".to_string(),
            modal_item: ".portfolio-item".to_string(),
            modal: "#projectModal".to_string(),
            open_class: "active".to_string(),
            modal_content: ".modal-content".to_string(),
            close: ".modal-close".to_string(),
            title: "#modalTitle".to_string(),
            category: "#modalCategory".to_string(),
            description: "#modalDescription".to_string(),
            client: "#modalClient".to_string(),
            location: "#modalLocation".to_string(),
            year: "#modalYear".to_string(),
            image: "#modalImage".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactConfig {
    pub form: String,
    pub submit: String,
    pub sending_label: String,
    pub success_class: String,
    pub success_ms: u32,
    pub transport: ContactTransport,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            form: "#contactForm".to_string(),
            submit: "button[type=\"submit\"], input[type=\"submit\"]".to_string(),
            sending_label: SENDING_LABEL.to_string(),
            success_class: "form-success".to_string(),
            success_ms: SUCCESS_MESSAGE_MS,
            transport: ContactTransport::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediaConfig {
    pub hero: String,
    pub video: String,
    pub fallback_background: Option<String>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            hero: ".hero".to_string(),
            video: ".hero video".to_string(),
            fallback_background: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    pub strategy: StrategyPreference,
    pub library_global: String,
    /// Primary source first, then alternates.
    pub script_sources: Vec<String>,
    pub respect_reduced_motion: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyPreference::Auto,
            library_global: "gsap".to_string(),
            script_sources: Vec::new(),
            respect_reduced_motion: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DevReloadConfig {
    pub mode: DevReloadMode,
    pub hosts: Vec<String>,
    pub socket_url: String,
    pub fallback_after_ms: u32,
    pub poll_interval_ms: u32,
}

impl Default for DevReloadConfig {
    fn default() -> Self {
        Self {
            mode: DevReloadMode::Auto,
            hosts: strings(&["localhost", "127.0.0.1"]),
            socket_url: RELOAD_SOCKET_URL.to_string(),
            fallback_after_ms: SOCKET_FALLBACK_MS,
            poll_interval_ms: POLL_INTERVAL_MS,
        }
    }
}

fn check_threshold(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Threshold { field, value })
    }
}

fn check_positive(field: &'static str, value: u32) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::NonPositive { field })
    } else {
        Ok(())
    }
}

fn check_non_empty(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::Empty { field })
    } else {
        Ok(())
    }
}

impl SiteConfig {
    /// Parses the inline JSON block; missing sections keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::default());
        }
        let config: SiteConfig =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold("reveal.threshold", self.reveal.threshold)?;
        check_threshold("counters.threshold", self.counters.threshold)?;
        check_non_empty("reveal.visible_class", &self.reveal.visible_class)?;
        check_non_empty("counters.selector", &self.counters.selector)?;
        check_positive("counters.duration_ms", self.counters.duration_ms)?;
        check_positive("counters.tick_ms", self.counters.tick_ms)?;
        check_positive("carousel.interval_ms", self.carousel.interval_ms)?;
        check_positive("contact.success_ms", self.contact.success_ms)?;
        check_positive("dev_reload.poll_interval_ms", self.dev_reload.poll_interval_ms)?;
        if !self.carousel.drag_threshold_px.is_finite() || self.carousel.drag_threshold_px <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "carousel.drag_threshold_px",
            });
        }
        if let ContactTransport::Endpoint { url } = &self.contact.transport {
            check_non_empty("contact.transport.url", url)?;
        }
        self.reveal.margin()?;
        for tween in &self.reveal.tweens {
            check_threshold("reveal.tweens.threshold", tween.threshold)?;
            tween.margin()?;
        }
        self.counters.margin()?;
        Ok(())
    }
}
