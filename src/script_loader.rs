use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, HtmlScriptElement};

use milanzi_site_core::AnimationConfig;

use crate::capabilities;
use crate::dom::{self, js_err};

fn load_promise(script: &HtmlScriptElement) -> js_sys::Promise {
    js_sys::Promise::new(&mut |resolve, reject| {
        let on_load = Closure::once(move |_event: Event| {
            let _ = resolve.call0(&JsValue::NULL);
        });
        let on_error = Closure::once(move |_event: Event| {
            let _ = reject.call1(&JsValue::NULL, &JsValue::from_str("script failed to load"));
        });
        script.set_onload(Some(on_load.as_ref().unchecked_ref()));
        script.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        on_load.forget();
        on_error.forget();
    })
}

async fn load_script(src: &str) -> Result<(), JsValue> {
    let document = dom::document().ok_or_else(|| JsValue::from_str("missing document"))?;
    let script = document
        .create_element("script")?
        .dyn_into::<HtmlScriptElement>()?;
    script.set_src(src);
    script.set_async(true);
    let done = load_promise(&script);
    let parent = match document.head() {
        Some(head) => head.into(),
        None => document
            .document_element()
            .ok_or_else(|| JsValue::from_str("missing root element"))?,
    };
    parent.append_child(&script)?;
    JsFuture::from(done).await?;
    Ok(())
}

/// Loads the animation library if the page did not already; returns whether it is now present.
pub(crate) async fn ensure_library(config: &AnimationConfig) -> bool {
    let Some(window) = dom::window() else {
        return false;
    };
    if capabilities::global(&window, &config.library_global).is_some() {
        return true;
    }
    for src in &config.script_sources {
        match load_script(src).await {
            Ok(()) if capabilities::global(&window, &config.library_global).is_some() => {
                gloo::console::log!("animation: loaded", src.as_str());
                return true;
            }
            Ok(()) => {
                gloo::console::warn!("animation: script loaded without global", src.as_str());
            }
            Err(err) => {
                gloo::console::warn!("animation: script failed", src.as_str(), js_err(err));
            }
        }
    }
    false
}
