use std::rc::Rc;

use js_sys::{Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlElement;

use milanzi_site_core::{RenderStrategy, TweenSpec};

use crate::capabilities;
use crate::dom::{self, js_err};

/// Drives element transitions for the strategy picked at startup.
pub(crate) trait Animator {
    fn strategy(&self) -> RenderStrategy;
    fn to(&self, element: &HtmlElement, tween: &TweenSpec);
}

pub(crate) fn for_strategy(strategy: RenderStrategy, library_global: &str) -> Rc<dyn Animator> {
    match strategy {
        RenderStrategy::Enhanced => match GsapAnimator::from_window(library_global) {
            Some(animator) => Rc::new(animator),
            None => {
                gloo::console::warn!("animation: library vanished, using css");
                Rc::new(CssAnimator)
            }
        },
        RenderStrategy::Fallback => Rc::new(CssAnimator),
        RenderStrategy::Reduced => Rc::new(InstantAnimator),
    }
}

pub(crate) struct GsapAnimator {
    library: Object,
    to: Function,
}

impl GsapAnimator {
    fn from_window(library_global: &str) -> Option<Self> {
        let window = dom::window()?;
        let library = capabilities::global(&window, library_global)?
            .dyn_into::<Object>()
            .ok()?;
        let to = Reflect::get(&library, &JsValue::from_str("to"))
            .ok()?
            .dyn_into::<Function>()
            .ok()?;
        Some(Self { library, to })
    }

    fn vars(tween: &TweenSpec) -> Object {
        let vars = Object::new();
        let set = |key: &str, value: JsValue| {
            let _ = Reflect::set(&vars, &JsValue::from_str(key), &value);
        };
        let number = |key: &str, value: Option<f64>| {
            if let Some(value) = value {
                set(key, JsValue::from_f64(value));
            }
        };
        number("x", tween.x);
        number("y", tween.y);
        number("scale", tween.scale);
        number("rotationX", tween.rotate_x);
        number("rotationY", tween.rotate_y);
        number("transformPerspective", tween.perspective);
        number("opacity", tween.opacity);
        if let Some(background) = &tween.background {
            set("background", JsValue::from_str(background));
        }
        set("duration", JsValue::from_f64(tween.duration_s));
        number("delay", tween.delay_s);
        set("overwrite", JsValue::from_str("auto"));
        if let Some(ease) = tween.ease {
            set("ease", JsValue::from_str(ease.gsap_name()));
        }
        if let Some(repeat) = tween.yoyo_repeat {
            set("yoyo", JsValue::TRUE);
            set("repeat", JsValue::from_f64(repeat as f64));
        }
        vars
    }
}

impl Animator for GsapAnimator {
    fn strategy(&self) -> RenderStrategy {
        RenderStrategy::Enhanced
    }

    fn to(&self, element: &HtmlElement, tween: &TweenSpec) {
        let vars = Self::vars(tween);
        if let Err(err) = self.to.call2(&self.library, element, &vars) {
            gloo::console::warn!("animation: tween failed", js_err(err));
        }
    }
}

/// Inline `transition` plus the end state; the browser interpolates.
pub(crate) struct CssAnimator;

impl Animator for CssAnimator {
    fn strategy(&self) -> RenderStrategy {
        RenderStrategy::Fallback
    }

    fn to(&self, element: &HtmlElement, tween: &TweenSpec) {
        dom::set_style(element, "transition", &tween.css_transition());
        apply_end_state(element, tween);
    }
}

/// Jumps straight to the end state.
pub(crate) struct InstantAnimator;

impl Animator for InstantAnimator {
    fn strategy(&self) -> RenderStrategy {
        RenderStrategy::Reduced
    }

    fn to(&self, element: &HtmlElement, tween: &TweenSpec) {
        dom::set_style(element, "transition", "none");
        apply_end_state(element, tween);
    }
}

fn apply_end_state(element: &HtmlElement, tween: &TweenSpec) {
    if let Some(transform) = tween.css_transform() {
        dom::set_style(element, "transform", &transform);
    }
    if let Some(opacity) = tween.opacity {
        dom::set_style(element, "opacity", &opacity.to_string());
    }
    if let Some(background) = &tween.background {
        dom::set_style(element, "background", background);
    }
}
