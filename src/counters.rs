use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use gloo::timers::callback::Interval;
use web_sys::{Document, Element};

use milanzi_site_core::{
    format_counter, parse_counter_target, CounterAnimation, CounterConfig, Ease, RenderStrategy,
    RootMargin, TargetId, TweenSpec, WatchEvent,
};

use crate::animator::Animator;
use crate::dom;
use crate::observer::WatchGroup;

const STAT_HIGHLIGHT: &str = "rgba(255,255,255,0.1)";

struct CounterSlot {
    element: Element,
    target: u64,
    suffix: String,
    animation: RefCell<Option<CounterAnimation>>,
    ticker: RefCell<Option<Interval>>,
}

pub(crate) struct Counters {
    config: CounterConfig,
    animator: Rc<dyn Animator>,
    slots: RefCell<BTreeMap<TargetId, Rc<CounterSlot>>>,
}

impl Counters {
    pub(crate) fn install(
        document: &Document,
        config: &CounterConfig,
        animator: Rc<dyn Animator>,
        use_observer: bool,
    ) -> Rc<Self> {
        let counters = Rc::new(Self {
            config: config.clone(),
            animator,
            slots: RefCell::new(BTreeMap::new()),
        });
        let reduced = counters.animator.strategy() == RenderStrategy::Reduced;
        let margin = config.margin().unwrap_or_else(|err| {
            gloo::console::warn!("counters:", err.to_string());
            RootMargin::ZERO
        });
        let group = WatchGroup::new("counter", config.watch_options(), margin);

        for element in dom::query_all(document, &config.selector) {
            if !config.policy.rearms() && dom::has_class(&element, &config.counted_class) {
                continue;
            }
            let target = match parse_counter_target(element.get_attribute("data-target").as_deref()) {
                Ok(target) => target,
                Err(err) => {
                    gloo::console::warn!("counters: skipped", err.to_string());
                    continue;
                }
            };
            let suffix = element
                .get_attribute("data-suffix")
                .unwrap_or_else(|| config.suffix.clone());
            let slot = Rc::new(CounterSlot {
                element,
                target,
                suffix,
                animation: RefCell::new(None),
                ticker: RefCell::new(None),
            });
            if reduced {
                counters.finish(&slot);
                continue;
            }
            if let Some(id) = group.watch(&slot.element) {
                counters.slots.borrow_mut().insert(id, slot);
            }
        }

        if reduced {
            return counters;
        }
        let handler_counters = Rc::clone(&counters);
        group.start(
            Rc::new(move |event: WatchEvent, _element: &Element| {
                handler_counters.on_event(event)
            }),
            use_observer,
        );
        gloo::console::log!("counters: watching", group.len() as u32);
        counters
    }

    fn on_event(&self, event: WatchEvent) {
        let slot = self.slots.borrow().get(&event.id()).cloned();
        let Some(slot) = slot else {
            return;
        };
        match event {
            WatchEvent::Enter(_) => self.start(&slot),
            WatchEvent::Leave(_) if self.config.policy.rearms() => self.reset(&slot),
            WatchEvent::Leave(_) => {}
        }
    }

    fn start(&self, slot: &Rc<CounterSlot>) {
        if !self.config.policy.rearms() && dom::has_class(&slot.element, &self.config.counted_class) {
            return;
        }
        slot.ticker.borrow_mut().take();
        *slot.animation.borrow_mut() = Some(CounterAnimation::new(
            slot.target,
            self.config.duration_ms,
            self.config.tick_ms,
            &slot.suffix,
        ));
        self.pulse(slot);

        let tick_slot = Rc::clone(slot);
        let counted_class = self.config.counted_class.clone();
        let pulse_class = self.config.pulse_class.clone();
        let stat = self.stat_for(slot);
        let interval = Interval::new(self.config.tick_ms, move || {
            let frame = match tick_slot.animation.borrow_mut().as_mut() {
                Some(animation) => animation.tick(),
                None => {
                    tick_slot.ticker.borrow_mut().take();
                    return;
                }
            };
            tick_slot.element.set_text_content(Some(&frame.text));
            if frame.done {
                tick_slot.ticker.borrow_mut().take();
                dom::add_class(&tick_slot.element, &counted_class);
                if let Some(stat) = &stat {
                    dom::remove_class(stat, &pulse_class);
                }
            }
        });
        *slot.ticker.borrow_mut() = Some(interval);
    }

    /// Repeat policy: back to zero so the next entry replays.
    fn reset(&self, slot: &Rc<CounterSlot>) {
        slot.ticker.borrow_mut().take();
        let text = slot
            .animation
            .borrow_mut()
            .take()
            .map(|animation| animation.reset_text())
            .unwrap_or_else(|| format_counter(0, &slot.suffix));
        slot.element.set_text_content(Some(&text));
        dom::remove_class(&slot.element, &self.config.counted_class);
        let Some(stat) = self.stat_for(slot) else {
            return;
        };
        dom::remove_class(&stat, &self.config.pulse_class);
        if self.animator.strategy() == RenderStrategy::Enhanced {
            if let Some(stat) = dom::html(&stat) {
                let tween = TweenSpec::new(0.3).scale(1.0).background("transparent");
                self.animator.to(&stat, &tween);
            }
        }
    }

    fn finish(&self, slot: &CounterSlot) {
        let text = format_counter(slot.target, &slot.suffix);
        slot.element.set_text_content(Some(&text));
        dom::add_class(&slot.element, &self.config.counted_class);
    }

    fn stat_for(&self, slot: &CounterSlot) -> Option<Element> {
        slot.element.closest(&self.config.stat_selector).ok().flatten()
    }

    fn pulse(&self, slot: &CounterSlot) {
        let Some(stat) = self.stat_for(slot) else {
            return;
        };
        if self.animator.strategy() == RenderStrategy::Enhanced {
            let Some(stat) = dom::html(&stat) else {
                return;
            };
            let bounce = TweenSpec::new(0.3).scale(1.1).ease(Ease::Power2Out).yoyo(1);
            self.animator.to(&stat, &bounce);
            self.animator
                .to(&stat, &TweenSpec::new(0.5).background(STAT_HIGHLIGHT));
        } else {
            // Restart the css animation if it is still running.
            dom::remove_class(&stat, &self.config.pulse_class);
            let _ = stat.get_bounding_client_rect();
            dom::add_class(&stat, &self.config.pulse_class);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::InstantAnimator;
    use gloo::timers::future::TimeoutFuture;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn fixture(html: &str) -> Element {
        console_error_panic_hook::set_once();
        let document = dom::document().unwrap();
        let root = document.create_element("div").unwrap();
        root.set_inner_html(html);
        document.body().unwrap().append_child(&root).unwrap();
        root
    }

    #[wasm_bindgen_test]
    fn reduced_motion_renders_final_values() {
        let root = fixture(
            r#"<div class="stats-section"><div class="stat"><span data-target="100">0%</span></div>
               <span data-target="12" data-suffix="+">0</span>
               <span data-target="oops">0</span></div>"#,
        );
        let document = dom::document().unwrap();
        let counters = Counters::install(
            &document,
            &CounterConfig::default(),
            Rc::new(InstantAnimator),
            true,
        );
        let spans = dom::query_all_in(&root, "[data-target]");
        assert_eq!(spans[0].text_content().as_deref(), Some("100%"));
        assert_eq!(spans[1].text_content().as_deref(), Some("12+"));
        assert_eq!(spans[2].text_content().as_deref(), Some("0"));
        assert!(dom::has_class(&spans[0], "counted"));
        assert_eq!(counters.len(), 0);
        root.remove();
    }

    #[wasm_bindgen_test(async)]
    async fn counter_runs_to_target() {
        let root = fixture(r#"<span id="runs-to-target" data-target="40">0%</span>"#);
        let config = CounterConfig {
            selector: "#runs-to-target".to_string(),
            duration_ms: 160,
            ..CounterConfig::default()
        };
        let document = dom::document().unwrap();
        let counters = Counters::install(
            &document,
            &config,
            Rc::new(crate::animator::CssAnimator),
            false,
        );
        let slot = counters.slots.borrow().values().next().cloned().unwrap();
        counters.start(&slot);
        TimeoutFuture::new(600).await;
        let span = dom::query_in(&root, "#runs-to-target").unwrap();
        assert_eq!(span.text_content().as_deref(), Some("40%"));
        assert!(dom::has_class(&span, "counted"));
        assert!(slot.ticker.borrow().is_none());
        root.remove();
    }

    #[wasm_bindgen_test(async)]
    async fn repeat_counter_resets_on_leave_and_replays() {
        let root = fixture(
            r#"<div class="stats-section"><div class="stat">
                 <span id="repeat-counter" data-target="30">0</span></div></div>"#,
        );
        let config = CounterConfig {
            selector: "#repeat-counter".to_string(),
            policy: milanzi_site_core::TriggerPolicy::Repeat,
            duration_ms: 100,
            suffix: "+".to_string(),
            ..CounterConfig::default()
        };
        let document = dom::document().unwrap();
        let counters = Counters::install(
            &document,
            &config,
            Rc::new(crate::animator::CssAnimator),
            false,
        );
        let id = *counters.slots.borrow().keys().next().unwrap();
        let span = dom::query_in(&root, "#repeat-counter").unwrap();
        let stat = dom::query_in(&root, ".stat").unwrap();

        counters.on_event(WatchEvent::Enter(id));
        assert!(dom::has_class(&stat, "stat-pulse"));
        TimeoutFuture::new(400).await;
        assert_eq!(span.text_content().as_deref(), Some("30+"));
        assert!(dom::has_class(&span, "counted"));

        counters.on_event(WatchEvent::Leave(id));
        assert_eq!(span.text_content().as_deref(), Some("0+"));
        assert!(!dom::has_class(&span, "counted"));
        assert!(!dom::has_class(&stat, "stat-pulse"));
        assert_eq!(counters.len(), 1);

        counters.on_event(WatchEvent::Enter(id));
        TimeoutFuture::new(400).await;
        assert_eq!(span.text_content().as_deref(), Some("30+"));
        root.remove();
    }
}
