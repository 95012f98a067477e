use js_sys::Reflect;
use wasm_bindgen::JsValue;
use web_sys::Window;

use milanzi_site_core::Capabilities;

pub(crate) const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

pub(crate) fn global(window: &Window, name: &str) -> Option<JsValue> {
    let value = Reflect::get(window, &JsValue::from_str(name)).ok()?;
    if value.is_null() || value.is_undefined() {
        return None;
    }
    Some(value)
}

pub(crate) fn prefers_reduced_motion(window: &Window) -> bool {
    match window.match_media(REDUCED_MOTION_QUERY) {
        Ok(Some(list)) => list.matches(),
        _ => false,
    }
}

pub(crate) fn probe(window: &Window, library_global: &str) -> Capabilities {
    Capabilities {
        animation_library: global(window, library_global).is_some(),
        intersection_observer: global(window, "IntersectionObserver").is_some(),
        reduced_motion: prefers_reduced_motion(window),
    }
}
