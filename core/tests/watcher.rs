use milanzi_site_core::{
    TargetId, TriggerPolicy, VisibilitySample, VisibilityWatcher, WatchEvent, WatchOptions,
};

fn sample(id: TargetId, ratio: f64) -> VisibilitySample {
    VisibilitySample { id, ratio }
}

fn enters(events: &[WatchEvent], id: TargetId) -> usize {
    events
        .iter()
        .filter(|event| **event == WatchEvent::Enter(id))
        .count()
}

#[test]
fn once_target_fires_once_across_repeated_entries() {
    let mut watcher = VisibilityWatcher::new(WatchOptions::new(0.15, TriggerPolicy::Once));
    let id = watcher.register();

    let mut fired = 0;
    for _ in 0..5 {
        let batch = watcher.process([sample(id, 0.5)]);
        fired += enters(&batch.events, id);
        let batch = watcher.process([sample(id, 0.0)]);
        fired += enters(&batch.events, id);
    }

    assert_eq!(fired, 1);
    assert!(watcher.has_fired(id));
    assert!(!watcher.is_watching(id));
}

#[test]
fn once_target_is_reported_for_unobserve() {
    let mut watcher = VisibilityWatcher::new(WatchOptions::new(0.15, TriggerPolicy::Once));
    let first = watcher.register();
    let second = watcher.register();

    let batch = watcher.process([sample(first, 0.4), sample(second, 0.05)]);
    assert_eq!(batch.events, vec![WatchEvent::Enter(first)]);
    assert_eq!(batch.unobserve, vec![first]);
    assert_eq!(watcher.len(), 1);
    assert!(watcher.is_watching(second));
}

#[test]
fn repeat_target_alternates_enter_and_leave() {
    let mut watcher = VisibilityWatcher::new(WatchOptions::new(0.7, TriggerPolicy::Repeat));
    let id = watcher.register();

    let ratios = [0.2, 0.8, 0.9, 0.1, 0.75, 0.0];
    let mut events = Vec::new();
    for ratio in ratios {
        events.extend(watcher.process([sample(id, ratio)]).events);
    }

    assert_eq!(
        events,
        vec![
            WatchEvent::Enter(id),
            WatchEvent::Leave(id),
            WatchEvent::Enter(id),
            WatchEvent::Leave(id),
        ]
    );
    assert!(watcher.is_watching(id));
}

#[test]
fn below_threshold_never_fires() {
    let mut watcher = VisibilityWatcher::new(WatchOptions::new(0.7, TriggerPolicy::Once));
    let id = watcher.register();
    let batch = watcher.process([sample(id, 0.5), sample(id, 0.69)]);
    assert!(batch.is_empty());
    assert!(!watcher.has_fired(id));
}

#[test]
fn unknown_and_unregistered_targets_are_ignored() {
    let mut watcher = VisibilityWatcher::new(WatchOptions::new(0.15, TriggerPolicy::Repeat));
    let id = watcher.register();
    assert!(watcher.unregister(id));

    let batch = watcher.process([sample(id, 1.0), sample(TargetId(42), 1.0)]);
    assert!(batch.is_empty());
    assert!(watcher.is_empty());
}

#[test]
fn target_ids_parse_from_attributes() {
    assert_eq!(TargetId::parse(" 7 "), Some(TargetId(7)));
    assert_eq!(TargetId::parse("seven"), None);
}
