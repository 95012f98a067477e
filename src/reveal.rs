use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use gloo::render::{request_animation_frame, AnimationFrame};
use web_sys::{Document, Element};

use milanzi_site_core::{
    RenderStrategy, RevealConfig, RootMargin, TargetId, TweenRevealConfig, WatchEvent,
};

use crate::animator::Animator;
use crate::dom;
use crate::observer::WatchGroup;

pub(crate) struct Reveal {
    config: RevealConfig,
    group: Option<Rc<WatchGroup>>,
    tweens: Vec<Rc<TweenReveal>>,
    above_fold_frame: RefCell<Option<AnimationFrame>>,
}

impl Reveal {
    pub(crate) fn install(
        document: &Document,
        config: &RevealConfig,
        animator: Rc<dyn Animator>,
        use_observer: bool,
    ) -> Rc<Self> {
        let strategy = animator.strategy();
        stagger_grids(document, config);
        let targets = dom::query_union(document, &config.selectors);

        if strategy == RenderStrategy::Reduced {
            for element in &targets {
                dom::add_class(element, &config.visible_class);
            }
            for element in dom::query_union(document, &config.above_fold_selectors) {
                dom::add_class(&element, &config.visible_class);
            }
            gloo::console::log!("reveal: reduced motion, revealed", targets.len() as u32);
            return Rc::new(Self {
                config: config.clone(),
                group: None,
                tweens: Vec::new(),
                above_fold_frame: RefCell::new(None),
            });
        }

        let margin = config.margin().unwrap_or_else(|err| {
            gloo::console::warn!("reveal:", err.to_string());
            RootMargin::ZERO
        });
        let group = WatchGroup::new("reveal", config.watch_options(), margin);
        for element in &targets {
            if dom::has_class(element, &config.visible_class) {
                continue;
            }
            group.watch(element);
        }

        let tweens = config
            .tweens
            .iter()
            .filter_map(|tween| {
                TweenReveal::install(document, tween, Rc::clone(&animator), use_observer)
            })
            .collect();
        let reveal = Rc::new(Self {
            config: config.clone(),
            group: Some(Rc::clone(&group)),
            tweens,
            above_fold_frame: RefCell::new(None),
        });
        let handler_reveal = Rc::clone(&reveal);
        group.start(
            Rc::new(move |event: WatchEvent, element: &Element| {
                handler_reveal.apply(event, element)
            }),
            use_observer,
        );
        reveal.reveal_above_fold(document);
        gloo::console::log!(
            "reveal: watching",
            group.len() as u32,
            if group.uses_observer() { "observer" } else { "scroll" }
        );
        reveal
    }

    fn apply(&self, event: WatchEvent, element: &Element) {
        match event {
            WatchEvent::Enter(_) => dom::add_class(element, &self.config.visible_class),
            WatchEvent::Leave(_) => dom::remove_class(element, &self.config.visible_class),
        }
    }

    fn reveal_above_fold(self: &Rc<Self>, document: &Document) {
        let elements = dom::query_union(document, &self.config.above_fold_selectors);
        if elements.is_empty() {
            return;
        }
        let class = self.config.visible_class.clone();
        let reveal = Rc::clone(self);
        let handle = request_animation_frame(move |_| {
            reveal.above_fold_frame.borrow_mut().take();
            for element in &elements {
                dom::add_class(element, &class);
            }
        });
        *self.above_fold_frame.borrow_mut() = Some(handle);
    }

    pub(crate) fn watched(&self) -> usize {
        self.group.as_ref().map(|group| group.len()).unwrap_or(0)
    }

    pub(crate) fn tweened(&self) -> usize {
        self.tweens.iter().map(|tween| tween.len()).sum()
    }
}

/// Fade-up entrances: parked below and transparent, tweened in on entry, back out on exit.
struct TweenReveal {
    config: TweenRevealConfig,
    animator: Rc<dyn Animator>,
    group: Rc<WatchGroup>,
    order: RefCell<BTreeMap<TargetId, usize>>,
}

impl TweenReveal {
    fn install(
        document: &Document,
        config: &TweenRevealConfig,
        animator: Rc<dyn Animator>,
        use_observer: bool,
    ) -> Option<Rc<Self>> {
        let margin = config.margin().unwrap_or_else(|err| {
            gloo::console::warn!("reveal:", err.to_string());
            RootMargin::ZERO
        });
        let tween = Rc::new(Self {
            config: config.clone(),
            animator,
            group: WatchGroup::new("tween", config.watch_options(), margin),
            order: RefCell::new(BTreeMap::new()),
        });
        let hidden = config.hidden(0.0);
        for selector in &config.selectors {
            for (index, element) in dom::query_all(document, selector).into_iter().enumerate() {
                let Some(html) = dom::html(&element) else {
                    continue;
                };
                let Some(id) = tween.group.watch(&element) else {
                    continue;
                };
                tween.animator.to(&html, &hidden);
                tween.order.borrow_mut().insert(id, index);
            }
        }
        if tween.order.borrow().is_empty() {
            return None;
        }
        let handler_tween = Rc::clone(&tween);
        tween.group.start(
            Rc::new(move |event: WatchEvent, element: &Element| {
                handler_tween.apply(event, element)
            }),
            use_observer,
        );
        Some(tween)
    }

    fn apply(&self, event: WatchEvent, element: &Element) {
        let Some(html) = dom::html(element) else {
            return;
        };
        match event {
            WatchEvent::Enter(id) => {
                let index = self.order.borrow().get(&id).copied().unwrap_or(0);
                self.animator.to(&html, &self.config.shown(index));
            }
            WatchEvent::Leave(_) => {
                self.animator
                    .to(&html, &self.config.hidden(self.config.duration_s));
            }
        }
    }

    fn len(&self) -> usize {
        self.group.len()
    }
}

fn stagger_grids(document: &Document, config: &RevealConfig) {
    for grid in dom::query_union(document, &config.grid_selectors) {
        dom::add_class(&grid, &config.grid_class);
        let children = grid.children();
        for index in 0..children.length() {
            let Some(child) = children.item(index).and_then(|child| dom::html(&child)) else {
                continue;
            };
            let delay = config.stagger_delay_ms(index as usize);
            dom::set_style(&child, "transition-delay", &format!("{delay}ms"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::{CssAnimator, InstantAnimator};
    use gloo::timers::future::TimeoutFuture;
    use milanzi_site_core::TriggerPolicy;
    use web_sys::Event;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    /// Mounted first in the body so the targets sit inside the viewport.
    fn fixture(html: &str) -> Element {
        console_error_panic_hook::set_once();
        let window = dom::window().unwrap();
        window.scroll_to_with_x_and_y(0.0, 0.0);
        let document = dom::document().unwrap();
        let root = document.create_element("div").unwrap();
        root.set_inner_html(html);
        document.body().unwrap().prepend_with_node_1(&root).unwrap();
        root
    }

    fn config(policy: TriggerPolicy) -> RevealConfig {
        RevealConfig {
            selectors: vec![".test-reveal".to_string()],
            grid_selectors: vec![".test-grid".to_string()],
            above_fold_selectors: vec![".test-hero".to_string()],
            policy,
            tweens: Vec::new(),
            ..RevealConfig::default()
        }
    }

    fn scroll() {
        let event = Event::new("scroll").unwrap();
        dom::window().unwrap().dispatch_event(&event).unwrap();
    }

    fn hide(element: &Element, hidden: bool) {
        let html = dom::html(element).unwrap();
        dom::set_style(&html, "display", if hidden { "none" } else { "block" });
    }

    const TARGET: &str = r#"<div class="test-reveal" style="height: 100px">a</div>"#;

    #[wasm_bindgen_test(async)]
    async fn scroll_fallback_reveals_once_and_releases_target() {
        let root = fixture(TARGET);
        let document = dom::document().unwrap();
        let reveal = Reveal::install(
            &document,
            &config(TriggerPolicy::Once),
            Rc::new(CssAnimator),
            false,
        );
        let target = dom::query_in(&root, ".test-reveal").unwrap();
        assert_eq!(target.get_attribute("data-watch-reveal").as_deref(), Some("0"));
        assert_eq!(reveal.watched(), 1);

        TimeoutFuture::new(100).await;
        assert!(dom::has_class(&target, "fade-in-visible"));
        assert_eq!(reveal.watched(), 0);

        dom::remove_class(&target, "fade-in-visible");
        scroll();
        TimeoutFuture::new(100).await;
        assert!(!dom::has_class(&target, "fade-in-visible"));
        root.remove();
    }

    #[wasm_bindgen_test(async)]
    async fn observer_resolves_stamped_targets() {
        let root = fixture(TARGET);
        let document = dom::document().unwrap();
        let reveal = Reveal::install(
            &document,
            &config(TriggerPolicy::Once),
            Rc::new(CssAnimator),
            true,
        );
        TimeoutFuture::new(300).await;
        let target = dom::query_in(&root, ".test-reveal").unwrap();
        assert!(dom::has_class(&target, "fade-in-visible"));
        assert_eq!(reveal.watched(), 0);
        root.remove();
    }

    #[wasm_bindgen_test(async)]
    async fn hidden_target_waits_until_rendered() {
        let root = fixture(r#"<div class="test-reveal" style="height: 100px; display: none">a</div>"#);
        let document = dom::document().unwrap();
        let reveal = Reveal::install(
            &document,
            &config(TriggerPolicy::Once),
            Rc::new(CssAnimator),
            false,
        );
        let target = dom::query_in(&root, ".test-reveal").unwrap();
        TimeoutFuture::new(100).await;
        assert!(!dom::has_class(&target, "fade-in-visible"));
        assert_eq!(reveal.watched(), 1);

        hide(&target, false);
        scroll();
        TimeoutFuture::new(100).await;
        assert!(dom::has_class(&target, "fade-in-visible"));
        root.remove();
    }

    #[wasm_bindgen_test(async)]
    async fn repeat_policy_toggles_class() {
        let root = fixture(TARGET);
        let document = dom::document().unwrap();
        let reveal = Reveal::install(
            &document,
            &config(TriggerPolicy::Repeat),
            Rc::new(CssAnimator),
            false,
        );
        let target = dom::query_in(&root, ".test-reveal").unwrap();
        TimeoutFuture::new(100).await;
        assert!(dom::has_class(&target, "fade-in-visible"));

        hide(&target, true);
        scroll();
        TimeoutFuture::new(100).await;
        assert!(!dom::has_class(&target, "fade-in-visible"));
        assert_eq!(reveal.watched(), 1);

        hide(&target, false);
        scroll();
        TimeoutFuture::new(100).await;
        assert!(dom::has_class(&target, "fade-in-visible"));
        root.remove();
    }

    #[wasm_bindgen_test]
    fn grid_children_get_capped_delays() {
        let root = fixture(
            r#"<div class="test-grid"><div>a</div><div>b</div><div>c</div></div>"#,
        );
        let document = dom::document().unwrap();
        let config = RevealConfig {
            max_stagger_ms: 150,
            ..config(TriggerPolicy::Once)
        };
        stagger_grids(&document, &config);
        let grid = dom::query_in(&root, ".test-grid").unwrap();
        assert!(dom::has_class(&grid, "fade-in-grid"));
        let delays: Vec<String> = dom::query_all_in(&grid, "div")
            .iter()
            .map(|child| {
                dom::html(child)
                    .unwrap()
                    .style()
                    .get_property_value("transition-delay")
                    .unwrap()
            })
            .collect();
        assert_eq!(delays, ["0ms", "100ms", "150ms"]);
        root.remove();
    }

    #[wasm_bindgen_test(async)]
    async fn above_fold_reveals_on_next_frame() {
        let root = fixture(r#"<section class="test-hero">hero</section>"#);
        let document = dom::document().unwrap();
        let _reveal = Reveal::install(
            &document,
            &config(TriggerPolicy::Once),
            Rc::new(CssAnimator),
            false,
        );
        let hero = dom::query_in(&root, ".test-hero").unwrap();
        assert!(!dom::has_class(&hero, "fade-in-visible"));
        TimeoutFuture::new(100).await;
        assert!(dom::has_class(&hero, "fade-in-visible"));
        root.remove();
    }

    #[wasm_bindgen_test]
    fn reduced_motion_reveals_everything_at_once() {
        let root = fixture(
            r#"<div class="test-reveal">a</div><section class="test-hero">hero</section>
               <p class="test-fade">b</p>"#,
        );
        let document = dom::document().unwrap();
        let mut config = config(TriggerPolicy::Once);
        config.tweens = vec![TweenRevealConfig {
            selectors: vec![".test-fade".to_string()],
            ..TweenRevealConfig::default()
        }];
        let reveal = Reveal::install(&document, &config, Rc::new(InstantAnimator), true);
        assert!(dom::has_class(&dom::query_in(&root, ".test-reveal").unwrap(), "fade-in-visible"));
        assert!(dom::has_class(&dom::query_in(&root, ".test-hero").unwrap(), "fade-in-visible"));
        let fade = dom::html(&dom::query_in(&root, ".test-fade").unwrap()).unwrap();
        assert_eq!(fade.style().get_property_value("opacity").unwrap(), "");
        assert_eq!(reveal.watched(), 0);
        assert_eq!(reveal.tweened(), 0);
        root.remove();
    }

    #[wasm_bindgen_test(async)]
    async fn tween_reveal_fades_up_and_back() {
        let root = fixture(
            r#"<p class="test-fade" style="height: 60px">a</p>
               <p class="test-fade" style="height: 60px">b</p>"#,
        );
        let document = dom::document().unwrap();
        let mut config = config(TriggerPolicy::Once);
        config.tweens = vec![TweenRevealConfig {
            selectors: vec![".test-fade".to_string()],
            duration_s: 0.05,
            ..TweenRevealConfig::default()
        }];
        let reveal = Reveal::install(&document, &config, Rc::new(CssAnimator), false);
        assert_eq!(reveal.tweened(), 2);
        let items: Vec<_> = dom::query_all_in(&root, ".test-fade")
            .iter()
            .map(|item| dom::html(item).unwrap())
            .collect();
        assert_eq!(items[0].style().get_property_value("opacity").unwrap(), "0");
        assert!(items[0].get_attribute("data-watch-tween").is_some());

        TimeoutFuture::new(100).await;
        assert_eq!(items[0].style().get_property_value("opacity").unwrap(), "1");
        assert!(items[1]
            .style()
            .get_property_value("transition")
            .unwrap()
            .contains("0.15s"));

        hide(&items[0], true);
        scroll();
        TimeoutFuture::new(100).await;
        assert_eq!(items[0].style().get_property_value("opacity").unwrap(), "0");
        assert_eq!(reveal.tweened(), 2);
        root.remove();
    }
}
