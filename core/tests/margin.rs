use milanzi_site_core::{
    visible_ratio, MarginError, MarginLength, Rect, RootMargin, TriggerPolicy, VisibilitySample,
    VisibilityWatcher, WatchOptions,
};

#[test]
fn shorthand_expands_like_css() {
    let margin: RootMargin = "0px 0px -10% 0px".parse().unwrap();
    assert_eq!(margin.bottom, MarginLength::Percent(-10.0));
    assert_eq!(margin.top, MarginLength::Px(0.0));

    let two: RootMargin = "5px 10%".parse().unwrap();
    assert_eq!(two.top, MarginLength::Px(5.0));
    assert_eq!(two.bottom, MarginLength::Px(5.0));
    assert_eq!(two.left, MarginLength::Percent(10.0));

    let three: RootMargin = "1px 2px 3px".parse().unwrap();
    assert_eq!(three.right, MarginLength::Px(2.0));
    assert_eq!(three.left, MarginLength::Px(2.0));
    assert_eq!(three.bottom, MarginLength::Px(3.0));

    assert_eq!("0".parse::<RootMargin>().unwrap(), RootMargin::ZERO);
}

#[test]
fn malformed_margins_are_rejected() {
    assert_eq!("".parse::<RootMargin>(), Err(MarginError::Empty));
    assert_eq!(
        "1px 2px 3px 4px 5px".parse::<RootMargin>(),
        Err(MarginError::Arity(5))
    );
    assert_eq!(
        "10em".parse::<RootMargin>(),
        Err(MarginError::Component("10em".to_string()))
    );
    assert_eq!(
        "12".parse::<RootMargin>(),
        Err(MarginError::Component("12".to_string()))
    );
}

#[test]
fn negative_bottom_margin_shrinks_viewport() {
    let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
    let margin: RootMargin = "0px 0px -10% 0px".parse().unwrap();
    // Sits in the bottom 80px, which the margin cuts away.
    let target = Rect::new(0.0, 720.0, 100.0, 80.0);
    assert_eq!(visible_ratio(target, viewport, &RootMargin::ZERO), 1.0);
    assert_eq!(visible_ratio(target, viewport, &margin), 0.0);
}

#[test]
fn partial_overlap_is_a_fraction_of_target_area() {
    let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
    let target = Rect::new(0.0, 700.0, 100.0, 200.0);
    let ratio = visible_ratio(target, viewport, &RootMargin::ZERO);
    assert!((ratio - 0.5).abs() < 1e-9);
}

#[test]
fn offscreen_target_has_zero_ratio() {
    let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
    let target = Rect::new(0.0, 1200.0, 100.0, 100.0);
    assert_eq!(visible_ratio(target, viewport, &RootMargin::ZERO), 0.0);
}

#[test]
fn unrendered_target_never_counts_as_visible() {
    let viewport = Rect::new(0.0, 0.0, 1280.0, 800.0);
    let margin: RootMargin = "0px 0px -10% 0px".parse().unwrap();
    let hidden = Rect::new(0.0, 0.0, 0.0, 0.0);
    let ratio = visible_ratio(hidden, viewport, &margin);
    assert_eq!(ratio, 0.0);

    let mut watcher = VisibilityWatcher::new(WatchOptions::new(0.7, TriggerPolicy::Once));
    let id = watcher.register();
    let batch = watcher.process([VisibilitySample { id, ratio }]);
    assert!(batch.events.is_empty());
    assert!(watcher.is_watching(id));
}
