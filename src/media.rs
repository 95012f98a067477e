use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, HtmlVideoElement};

use milanzi_site_core::MediaConfig;

use crate::dom::{self, js_err};

fn fallback_background(video: &HtmlVideoElement, config: &MediaConfig) -> Option<String> {
    let poster = video.poster();
    if !poster.trim().is_empty() {
        return Some(format!("url(\"{poster}\") center / cover no-repeat"));
    }
    config.fallback_background.clone()
}

/// Starts the hero background video; swaps to a still background when playback is refused.
pub(crate) fn install(document: &Document, config: &MediaConfig) {
    let Some(video) = dom::query(document, &config.video)
        .and_then(|el| el.dyn_into::<HtmlVideoElement>().ok())
    else {
        return;
    };
    let hero = dom::query(document, &config.hero).and_then(|el| dom::html(&el));
    let background = fallback_background(&video, config);

    video.set_muted(true);
    let played = video.play();
    spawn_local(async move {
        let result = match played {
            Ok(promise) => JsFuture::from(promise).await.map(|_| ()),
            Err(err) => Err(err),
        };
        let Err(err) = result else {
            return;
        };
        gloo::console::warn!("media: hero video refused", js_err(err));
        if let (Some(hero), Some(background)) = (&hero, &background) {
            dom::set_style(hero, "background", background);
        }
        dom::set_style(&video, "display", "none");
    });
}
