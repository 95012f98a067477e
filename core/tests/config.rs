use milanzi_site_core::{
    ConfigError, ContactTransport, DevReloadMode, Ease, MarginError, RootMargin, SiteConfig,
    StrategyPreference, TriggerPolicy, TweenRevealConfig,
};

#[test]
fn defaults_validate() {
    let config = SiteConfig::default();
    assert_eq!(config.validate(), Ok(()));
    assert_eq!(config.reveal.threshold, 0.15);
    assert_eq!(config.counters.threshold, 0.7);
    assert_eq!(config.counters.tick_ms, 16);
    assert_eq!(config.carousel.interval_ms, 5000);
    assert_eq!(config.contact.success_ms, 5000);
    assert_eq!(config.reveal.visible_class, "fade-in-visible");
    assert_eq!(
        config.reveal.margin().unwrap(),
        "0px 0px -10% 0px".parse::<RootMargin>().unwrap()
    );
}

#[test]
fn empty_block_keeps_defaults() {
    assert_eq!(SiteConfig::from_json("  "), Ok(SiteConfig::default()));
    assert_eq!(SiteConfig::from_json("{}"), Ok(SiteConfig::default()));
}

#[test]
fn partial_json_overrides_only_named_fields() {
    let config = SiteConfig::from_json(
        r#"{
            "counters": { "policy": "repeat", "suffix": "+" },
            "contact": { "transport": { "kind": "endpoint", "url": "/api/contact" } },
            "animation": { "strategy": "fallback" },
            "dev_reload": { "mode": "never" }
        }"#,
    )
    .unwrap();
    assert_eq!(config.counters.policy, TriggerPolicy::Repeat);
    assert_eq!(config.counters.suffix, "+");
    assert_eq!(config.counters.duration_ms, 2000);
    assert_eq!(
        config.contact.transport,
        ContactTransport::Endpoint {
            url: "/api/contact".to_string()
        }
    );
    assert_eq!(config.animation.strategy, StrategyPreference::Fallback);
    assert_eq!(config.dev_reload.mode, DevReloadMode::Never);
    assert_eq!(config.reveal, SiteConfig::default().reveal);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = SiteConfig::from_json(r#"{ "reveal": { "treshold": 0.2 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn out_of_range_values_fail_validation() {
    let err = SiteConfig::from_json(r#"{ "reveal": { "threshold": 1.5 } }"#).unwrap_err();
    assert_eq!(
        err,
        ConfigError::Threshold {
            field: "reveal.threshold",
            value: 1.5
        }
    );

    let err = SiteConfig::from_json(r#"{ "counters": { "tick_ms": 0 } }"#).unwrap_err();
    assert_eq!(
        err,
        ConfigError::NonPositive {
            field: "counters.tick_ms"
        }
    );

    let err = SiteConfig::from_json(r#"{ "reveal": { "visible_class": " " } }"#).unwrap_err();
    assert_eq!(
        err,
        ConfigError::Empty {
            field: "reveal.visible_class"
        }
    );
}

#[test]
fn bad_margin_names_its_field() {
    let err = SiteConfig::from_json(r#"{ "counters": { "root_margin": "1px 2em" } }"#).unwrap_err();
    assert_eq!(
        err,
        ConfigError::Margin {
            field: "counters.root_margin",
            source: MarginError::Component("2em".to_string()),
        }
    );
}

#[test]
fn stagger_is_capped() {
    let reveal = SiteConfig::default().reveal;
    assert_eq!(reveal.stagger_delay_ms(0), 0);
    assert_eq!(reveal.stagger_delay_ms(3), 300);
    assert_eq!(reveal.stagger_delay_ms(50), 800);
}

#[test]
fn tween_reveals_default_to_repeating_fade_up() {
    let config = SiteConfig::default();
    assert_eq!(config.reveal.tweens.len(), 2);
    let fade_up = &config.reveal.tweens[0];
    assert_eq!(fade_up.policy, TriggerPolicy::Repeat);
    assert!(fade_up.selectors.iter().any(|selector| selector == ".featured-title"));

    let hidden = fade_up.hidden(0.0);
    assert_eq!(hidden.y, Some(80.0));
    assert_eq!(hidden.opacity, Some(0.0));
    assert_eq!(hidden.delay_s, None);

    let third = fade_up.shown(2);
    assert_eq!(third.y, Some(0.0));
    assert_eq!(third.opacity, Some(1.0));
    assert_eq!(third.scale, Some(1.0));
    assert_eq!(third.delay_s, Some(0.3));
    assert_eq!(third.ease, Some(Ease::Power3Out));
}

#[test]
fn tween_reveal_block_parses_and_validates() {
    let config = SiteConfig::from_json(
        r#"{ "reveal": { "tweens": [
            { "selectors": [".award-item"], "ease": "back_out", "policy": "once" }
        ] } }"#,
    )
    .unwrap();
    assert_eq!(config.reveal.tweens.len(), 1);
    let tween = &config.reveal.tweens[0];
    assert_eq!(tween.ease, Ease::BackOut);
    assert_eq!(tween.policy, TriggerPolicy::Once);
    assert_eq!(tween.offset_y, TweenRevealConfig::default().offset_y);

    let err = SiteConfig::from_json(r#"{ "reveal": { "tweens": [ { "root_margin": "1em" } ] } }"#)
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Margin {
            field: "reveal.tweens.root_margin",
            ..
        }
    ));
}
