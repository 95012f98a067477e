use std::collections::{BTreeMap, BTreeSet};

use crate::policy::TriggerPolicy;

/// Observers report ratios like 0.6999 for a 0.7 crossing.
pub const THRESHOLD_EPSILON: f64 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u32);

impl TargetId {
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<u32>().ok().map(TargetId)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WatchOptions {
    pub threshold: f64,
    pub policy: TriggerPolicy,
}

impl WatchOptions {
    pub fn new(threshold: f64, policy: TriggerPolicy) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            policy,
        }
    }

    pub fn is_visible(&self, ratio: f64) -> bool {
        if !ratio.is_finite() || ratio <= 0.0 {
            return false;
        }
        ratio + THRESHOLD_EPSILON >= self.threshold
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilitySample {
    pub id: TargetId,
    pub ratio: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchEvent {
    Enter(TargetId),
    Leave(TargetId),
}

impl WatchEvent {
    pub fn id(&self) -> TargetId {
        match self {
            WatchEvent::Enter(id) | WatchEvent::Leave(id) => *id,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WatchBatch {
    pub events: Vec<WatchEvent>,
    /// Once-policy targets that fired in this batch and must no longer be observed.
    pub unobserve: Vec<TargetId>,
}

impl WatchBatch {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.unobserve.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Entry {
    inside: bool,
}

/// Tracks which targets are inside the viewport and decides when a trigger fires.
#[derive(Clone, Debug)]
pub struct VisibilityWatcher {
    options: WatchOptions,
    entries: BTreeMap<TargetId, Entry>,
    fired: BTreeSet<TargetId>,
    next_id: u32,
}

impl VisibilityWatcher {
    pub fn new(options: WatchOptions) -> Self {
        Self {
            options,
            entries: BTreeMap::new(),
            fired: BTreeSet::new(),
            next_id: 0,
        }
    }

    pub fn options(&self) -> WatchOptions {
        self.options
    }

    pub fn register(&mut self) -> TargetId {
        let id = TargetId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.entries.insert(id, Entry::default());
        id
    }

    pub fn unregister(&mut self, id: TargetId) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub fn is_watching(&self, id: TargetId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn has_fired(&self, id: TargetId) -> bool {
        self.fired.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn watched(&self) -> impl Iterator<Item = TargetId> + '_ {
        self.entries.keys().copied()
    }

    pub fn process<I>(&mut self, samples: I) -> WatchBatch
    where
        I: IntoIterator<Item = VisibilitySample>,
    {
        let mut batch = WatchBatch::default();
        for sample in samples {
            let visible = self.options.is_visible(sample.ratio);
            let Some(entry) = self.entries.get_mut(&sample.id) else {
                continue;
            };
            match (entry.inside, visible) {
                (false, true) => {
                    entry.inside = true;
                    self.fired.insert(sample.id);
                    batch.events.push(WatchEvent::Enter(sample.id));
                    if !self.options.policy.rearms() {
                        self.entries.remove(&sample.id);
                        batch.unobserve.push(sample.id);
                    }
                }
                (true, false) => {
                    entry.inside = false;
                    batch.events.push(WatchEvent::Leave(sample.id));
                }
                _ => {}
            }
        }
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_threshold_needs_some_overlap() {
        let options = WatchOptions::new(0.0, TriggerPolicy::Once);
        assert!(!options.is_visible(0.0));
        assert!(options.is_visible(0.01));
    }

    #[test]
    fn near_miss_counts_as_crossing() {
        let options = WatchOptions::new(0.7, TriggerPolicy::Once);
        assert!(options.is_visible(0.6995));
        assert!(!options.is_visible(0.69));
    }
}
