use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, NodeList, Window};

use milanzi_site_core::Rect;

pub(crate) fn window() -> Option<Window> {
    web_sys::window()
}

pub(crate) fn document() -> Option<Document> {
    window()?.document()
}

pub(crate) fn js_err(error: JsValue) -> String {
    if let Some(value) = error.as_string() {
        return value;
    }
    if let Some(err) = error.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    if let Ok(json) = js_sys::JSON::stringify(&error) {
        if let Some(value) = json.as_string() {
            return value;
        }
    }
    "js error".to_string()
}

fn collect(list: NodeList) -> Vec<Element> {
    let mut out = Vec::with_capacity(list.length() as usize);
    for index in 0..list.length() {
        let Some(node) = list.item(index) else {
            continue;
        };
        if let Ok(element) = node.dyn_into::<Element>() {
            out.push(element);
        }
    }
    out
}

/// Invalid selectors match nothing.
pub(crate) fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    match document.query_selector_all(selector) {
        Ok(list) => collect(list),
        Err(err) => {
            gloo::console::warn!("dom: bad selector", selector, js_err(err));
            Vec::new()
        }
    }
}

pub(crate) fn query_all_in(root: &Element, selector: &str) -> Vec<Element> {
    root.query_selector_all(selector).map(collect).unwrap_or_default()
}

/// Every element matching any selector, once each, in selector order.
pub(crate) fn query_union(document: &Document, selectors: &[String]) -> Vec<Element> {
    let mut out: Vec<Element> = Vec::new();
    for selector in selectors {
        for element in query_all(document, selector) {
            if out.iter().any(|seen| seen.is_same_node(Some(&element))) {
                continue;
            }
            out.push(element);
        }
    }
    out
}

pub(crate) fn query(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

pub(crate) fn query_in(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

pub(crate) fn html(element: &Element) -> Option<HtmlElement> {
    element.clone().dyn_into::<HtmlElement>().ok()
}

pub(crate) fn set_style(element: &HtmlElement, property: &str, value: &str) {
    let _ = element.style().set_property(property, value);
}

pub(crate) fn add_class(element: &Element, class: &str) {
    let _ = element.class_list().add_1(class);
}

pub(crate) fn remove_class(element: &Element, class: &str) {
    let _ = element.class_list().remove_1(class);
}

pub(crate) fn has_class(element: &Element, class: &str) -> bool {
    element.class_list().contains(class)
}

pub(crate) fn rect_of(element: &Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
}

pub(crate) fn viewport_rect(window: &Window) -> Rect {
    let width = window
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    Rect::new(0.0, 0.0, width, height)
}

/// `true` when `node` is `ancestor` or sits inside it.
pub(crate) fn is_within(ancestor: &Element, target: &JsValue) -> bool {
    let Some(node) = target.dyn_ref::<web_sys::Node>() else {
        return false;
    };
    ancestor.contains(Some(node))
}
