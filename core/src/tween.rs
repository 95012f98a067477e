use std::fmt::Write;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    Linear,
    Power1Out,
    #[default]
    Power2Out,
    Power3Out,
    BackOut,
    SineInOut,
}

impl Ease {
    pub fn gsap_name(self) -> &'static str {
        match self {
            Ease::Linear => "none",
            Ease::Power1Out => "power1.out",
            Ease::Power2Out => "power2.out",
            Ease::Power3Out => "power3.out",
            Ease::BackOut => "back.out(1.7)",
            Ease::SineInOut => "sine.inOut",
        }
    }

    pub fn css_timing(self) -> &'static str {
        match self {
            Ease::Linear => "linear",
            Ease::Power1Out => "cubic-bezier(0.25, 0.46, 0.45, 0.94)",
            Ease::Power2Out => "cubic-bezier(0.215, 0.61, 0.355, 1)",
            Ease::Power3Out => "cubic-bezier(0.165, 0.84, 0.44, 1)",
            Ease::BackOut => "cubic-bezier(0.175, 0.885, 0.32, 1.275)",
            Ease::SineInOut => "cubic-bezier(0.445, 0.05, 0.55, 0.95)",
        }
    }
}

/// Target values for one tween; unset fields are left alone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TweenSpec {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub scale: Option<f64>,
    pub rotate_x: Option<f64>,
    pub rotate_y: Option<f64>,
    pub perspective: Option<f64>,
    pub opacity: Option<f64>,
    pub background: Option<String>,
    pub duration_s: f64,
    pub delay_s: Option<f64>,
    pub ease: Option<Ease>,
    /// Play forward then back this many extra times.
    pub yoyo_repeat: Option<u32>,
}

impl TweenSpec {
    pub fn new(duration_s: f64) -> Self {
        Self {
            duration_s: duration_s.max(0.0),
            ..Self::default()
        }
    }

    pub fn translate(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn rotation(mut self, rotate_x: f64, rotate_y: f64) -> Self {
        self.rotate_x = Some(rotate_x);
        self.rotate_y = Some(rotate_y);
        self
    }

    pub fn perspective(mut self, px: f64) -> Self {
        self.perspective = Some(px);
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity.clamp(0.0, 1.0));
        self
    }

    pub fn background(mut self, value: &str) -> Self {
        self.background = Some(value.to_string());
        self
    }

    pub fn delay(mut self, delay_s: f64) -> Self {
        self.delay_s = Some(delay_s.max(0.0));
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }

    pub fn yoyo(mut self, repeat: u32) -> Self {
        self.yoyo_repeat = Some(repeat);
        self
    }

    pub fn has_transform(&self) -> bool {
        self.x.is_some()
            || self.y.is_some()
            || self.scale.is_some()
            || self.rotate_x.is_some()
            || self.rotate_y.is_some()
    }

    /// Inline `transform` value for the CSS path.
    pub fn css_transform(&self) -> Option<String> {
        if !self.has_transform() {
            return None;
        }
        let mut out = String::new();
        if let Some(px) = self.perspective {
            let _ = write!(out, "perspective({px}px) ");
        }
        if self.x.is_some() || self.y.is_some() {
            let x = self.x.unwrap_or(0.0);
            let y = self.y.unwrap_or(0.0);
            let _ = write!(out, "translate3d({x}px, {y}px, 0) ");
        }
        if let Some(rx) = self.rotate_x {
            let _ = write!(out, "rotateX({rx}deg) ");
        }
        if let Some(ry) = self.rotate_y {
            let _ = write!(out, "rotateY({ry}deg) ");
        }
        if let Some(scale) = self.scale {
            let _ = write!(out, "scale({scale}) ");
        }
        Some(out.trim_end().to_string())
    }

    /// Inline `transition` value covering every property this tween touches.
    pub fn css_transition(&self) -> String {
        let timing = self.ease.unwrap_or_default().css_timing();
        let duration = self.duration_s;
        let delay = match self.delay_s {
            Some(delay) if delay > 0.0 => format!(" {delay}s"),
            _ => String::new(),
        };
        let mut parts = Vec::new();
        if self.has_transform() {
            parts.push(format!("transform {duration}s {timing}{delay}"));
        }
        if self.opacity.is_some() {
            parts.push(format!("opacity {duration}s {timing}{delay}"));
        }
        if self.background.is_some() {
            parts.push(format!("background {duration}s {timing}{delay}"));
        }
        if parts.is_empty() {
            return "none".to_string();
        }
        parts.join(", ")
    }
}
