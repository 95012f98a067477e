use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen_futures::spawn_local;
use web_sys::Document;

use milanzi_site_core::{RenderStrategy, SiteConfig, SITE_CONFIG_ELEMENT_ID};

use crate::animator;
use crate::capabilities;
use crate::carousel::{self, CarouselView};
use crate::contact::ContactForm;
use crate::counters::Counters;
use crate::cursor::CursorFollower;
use crate::dev_reload::DevReload;
use crate::dom;
use crate::media;
use crate::portfolio::{PortfolioFilter, ProjectModal};
use crate::reveal::Reveal;
use crate::script_loader;
use crate::tilt::CardTilt;

const INIT_ATTRIBUTE: &str = "data-fade-init";

thread_local! {
    static SITE: RefCell<Option<Rc<Site>>> = RefCell::new(None);
    static READY_LISTENERS: RefCell<Vec<EventListener>> = RefCell::new(Vec::new());
}

/// Everything installed on the page; dropping it detaches every listener and timer.
pub(crate) struct Site {
    strategy: RenderStrategy,
    reveal: Rc<Reveal>,
    counters: Rc<Counters>,
    cursor: Option<Rc<CursorFollower>>,
    tilt: CardTilt,
    carousels: Vec<Rc<CarouselView>>,
    filter: Option<Rc<PortfolioFilter>>,
    modal: Option<Rc<ProjectModal>>,
    contact: Option<Rc<ContactForm>>,
    dev_reload: Option<Rc<DevReload>>,
}

pub(crate) fn load_config(document: &Document) -> SiteConfig {
    let Some(raw) = document
        .get_element_by_id(SITE_CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content())
    else {
        return SiteConfig::default();
    };
    match SiteConfig::from_json(&raw) {
        Ok(config) => config,
        Err(err) => {
            gloo::console::warn!("site: config rejected, using defaults:", err.to_string());
            SiteConfig::default()
        }
    }
}

/// Runs `init` once the document is parsed.
pub(crate) fn start() {
    let Some(document) = dom::document() else {
        return;
    };
    if document.ready_state() != "loading" {
        init();
        return;
    }
    let mut listeners = vec![EventListener::once(&document, "DOMContentLoaded", |_event| {
        init();
    })];
    if let Some(window) = dom::window() {
        listeners.push(EventListener::once(&window, "load", |_event| {
            init();
        }));
    }
    READY_LISTENERS.with(|slot| slot.borrow_mut().extend(listeners));
}

/// Idempotent: the body marker stops a second run from double-registering anything.
pub(crate) fn init() {
    let Some(document) = dom::document() else {
        return;
    };
    let Some(body) = document.body() else {
        gloo::console::warn!("site: no body, skipping init");
        return;
    };
    if body.has_attribute(INIT_ATTRIBUTE) {
        return;
    }
    if let Err(err) = body.set_attribute(INIT_ATTRIBUTE, "true") {
        gloo::console::warn!("site: init marker", dom::js_err(err));
        return;
    }
    let config = load_config(&document);
    spawn_local(async move {
        let loaded = script_loader::ensure_library(&config.animation).await;
        let site = Site::install(&document, &config);
        gloo::console::log!(
            "site: ready,",
            format!("{:?}", site.strategy()),
            "library",
            loaded
        );
        SITE.with(|slot| *slot.borrow_mut() = Some(site));
    });
}

impl Site {
    pub(crate) fn install(document: &Document, config: &SiteConfig) -> Rc<Self> {
        let caps = dom::window()
            .map(|window| capabilities::probe(&window, &config.animation.library_global))
            .unwrap_or_default();
        let strategy = config
            .animation
            .strategy
            .resolve(caps, config.animation.respect_reduced_motion);
        let use_observer = caps.intersection_observer;
        let animator = animator::for_strategy(strategy, &config.animation.library_global);

        media::install(document, &config.media);
        let site = Rc::new(Self {
            strategy,
            reveal: Reveal::install(document, &config.reveal, Rc::clone(&animator), use_observer),
            counters: Counters::install(document, &config.counters, Rc::clone(&animator), use_observer),
            cursor: CursorFollower::install(document, &config.cursor, Rc::clone(&animator)),
            tilt: CardTilt::install(document, &config.cursor.tilt_cards, Rc::clone(&animator)),
            carousels: carousel::install_all(document, &config.carousel),
            filter: PortfolioFilter::install(document, &config.portfolio),
            modal: ProjectModal::install(document, &config.portfolio),
            contact: ContactForm::install(document, &config.contact),
            dev_reload: DevReload::install(&config.dev_reload),
        });
        gloo::console::log!(
            "site: reveal",
            site.reveal.watched() as u32,
            "tweened",
            site.reveal.tweened() as u32,
            "counters",
            site.counters.len() as u32,
            "carousels",
            site.carousels.len() as u32,
            "tilt",
            !site.tilt.is_empty(),
            "cursor",
            site.cursor.is_some(),
            "portfolio",
            site.filter.is_some() || site.modal.is_some(),
            "contact",
            site.contact.is_some(),
            "reload",
            site.dev_reload.is_some()
        );
        site
    }

    pub(crate) fn strategy(&self) -> RenderStrategy {
        self.strategy
    }
}

#[cfg(test)]
impl Site {
    pub(crate) fn has_cursor(&self) -> bool {
        self.cursor.is_some()
    }

    pub(crate) fn has_portfolio(&self) -> bool {
        self.filter.is_some() && self.modal.is_some()
    }

    pub(crate) fn has_contact_form(&self) -> bool {
        self.contact.is_some()
    }

    pub(crate) fn has_dev_reload(&self) -> bool {
        self.dev_reload.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use milanzi_site_core::{DevReloadMode, StrategyPreference};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn document() -> Document {
        console_error_panic_hook::set_once();
        dom::document().unwrap()
    }

    #[wasm_bindgen_test]
    fn invalid_config_falls_back_to_defaults() {
        let document = document();
        let script = document.create_element("script").unwrap();
        script.set_id(SITE_CONFIG_ELEMENT_ID);
        script.set_attribute("type", "application/json").unwrap();
        script.set_text_content(Some(r#"{"reveal": {"threshold": 4.0}}"#));
        document.body().unwrap().append_child(&script).unwrap();
        assert_eq!(load_config(&document), SiteConfig::default());

        script.set_text_content(Some(r#"{"carousel": {"interval_ms": 7000}}"#));
        assert_eq!(load_config(&document).carousel.interval_ms, 7000);
        script.remove();
    }

    #[wasm_bindgen_test]
    fn install_tolerates_a_bare_page() {
        let document = document();
        let mut config = SiteConfig::default();
        config.animation.strategy = StrategyPreference::Fallback;
        config.animation.respect_reduced_motion = false;
        config.dev_reload.mode = DevReloadMode::Never;
        config.cursor.cursor = "#no-such-cursor".to_string();
        config.contact.form = "#no-such-form".to_string();
        config.portfolio.modal = "#no-such-modal".to_string();

        let site = Site::install(&document, &config);
        assert_eq!(site.strategy(), RenderStrategy::Fallback);
        assert!(!site.has_cursor());
        assert!(!site.has_contact_form());
        assert!(!site.has_portfolio());
        assert!(!site.has_dev_reload());
    }

    #[wasm_bindgen_test]
    fn init_marks_body_once() {
        let document = document();
        let script = document.create_element("script").unwrap();
        script.set_id(SITE_CONFIG_ELEMENT_ID);
        script.set_attribute("type", "application/json").unwrap();
        script.set_text_content(Some(r#"{"dev_reload": {"mode": "never"}}"#));
        document.body().unwrap().append_child(&script).unwrap();
        init();
        script.remove();
        let body = document.body().unwrap();
        assert!(body.has_attribute(INIT_ATTRIBUTE));
        init();
        assert!(body.has_attribute(INIT_ATTRIBUTE));
    }
}
