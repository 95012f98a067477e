use serde::{Deserialize, Serialize};

/// How a watch target behaves after its first trigger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerPolicy {
    /// Fire on the first crossing, then stop watching.
    #[default]
    Once,
    /// Fire on every crossing from below and report every exit.
    Repeat,
}

impl TriggerPolicy {
    pub fn rearms(self) -> bool {
        matches!(self, TriggerPolicy::Repeat)
    }
}
