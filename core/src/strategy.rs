use serde::{Deserialize, Serialize};

/// How transitions are rendered for the whole page lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderStrategy {
    /// The animation library is present and drives tweens.
    Enhanced,
    /// Inline styles and timers.
    Fallback,
    /// `prefers-reduced-motion`: final states are applied immediately.
    Reduced,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyPreference {
    #[default]
    Auto,
    Fallback,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub animation_library: bool,
    pub intersection_observer: bool,
    pub reduced_motion: bool,
}

impl StrategyPreference {
    pub fn resolve(self, caps: Capabilities, respect_reduced_motion: bool) -> RenderStrategy {
        if respect_reduced_motion && caps.reduced_motion {
            return RenderStrategy::Reduced;
        }
        match self {
            StrategyPreference::Auto if caps.animation_library => RenderStrategy::Enhanced,
            _ => RenderStrategy::Fallback,
        }
    }
}
