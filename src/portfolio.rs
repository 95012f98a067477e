use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, Element, Event, HtmlElement, HtmlImageElement, KeyboardEvent};

use milanzi_site_core::{
    partition, FilterBar, ImageLoad, ModalClick, ModalContent, ModalState, PortfolioConfig,
    FALLBACK_PROJECT_IMAGE, PROJECT_CATALOG,
};

use crate::dom::{self, js_err};

pub(crate) struct PortfolioFilter {
    buttons: Vec<Element>,
    cards: Vec<(HtmlElement, String)>,
    active_class: String,
    bar: RefCell<FilterBar>,
    listeners: RefCell<Vec<EventListener>>,
}

impl PortfolioFilter {
    pub(crate) fn install(document: &Document, config: &PortfolioConfig) -> Option<Rc<Self>> {
        let buttons = dom::query_all(document, &config.filter_button);
        if buttons.is_empty() {
            return None;
        }
        let keys: Vec<String> = buttons
            .iter()
            .map(|button| button.get_attribute("data-filter").unwrap_or_default())
            .collect();
        let cards = dom::query_all(document, &config.filter_item)
            .into_iter()
            .filter_map(|card| {
                let categories = card
                    .get_attribute("data-category")
                    .unwrap_or_else(|| card.class_name());
                dom::html(&card).map(|card| (card, categories))
            })
            .collect();
        let filter = Rc::new(Self {
            buttons,
            cards,
            active_class: config.active_class.clone(),
            bar: RefCell::new(FilterBar::new(keys)),
            listeners: RefCell::new(Vec::new()),
        });
        let mut listeners = Vec::new();
        for (index, button) in filter.buttons.iter().enumerate() {
            let filter = Rc::clone(&filter);
            listeners.push(EventListener::new(button, "click", move |_event| {
                filter.select(index);
            }));
        }
        *filter.listeners.borrow_mut() = listeners;
        filter.mark_active();
        Some(filter)
    }

    pub(crate) fn select(&self, index: usize) {
        let Some(active) = self.bar.borrow_mut().select(index).cloned() else {
            return;
        };
        let visible = partition(&active, self.cards.iter().map(|(_, tags)| tags.as_str()));
        for ((card, _), show) in self.cards.iter().zip(visible) {
            dom::set_style(card, "display", if show { "block" } else { "none" });
        }
        self.mark_active();
    }

    fn mark_active(&self) {
        let active = self.bar.borrow().active_index();
        for (index, button) in self.buttons.iter().enumerate() {
            if Some(index) == active {
                dom::add_class(button, &self.active_class);
            } else {
                dom::remove_class(button, &self.active_class);
            }
        }
    }
}

fn image_promise(image: &HtmlImageElement) -> js_sys::Promise {
    js_sys::Promise::new(&mut |resolve, reject| {
        let on_load = Closure::once(move |_event: Event| {
            let _ = resolve.call0(&JsValue::NULL);
        });
        let on_error = Closure::once(move |_event: Event| {
            let _ = reject.call1(&JsValue::NULL, &JsValue::from_str("image failed to load"));
        });
        image.set_onload(Some(on_load.as_ref().unchecked_ref()));
        image.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        on_load.forget();
        on_error.forget();
    })
}

async fn preload(src: &str) -> Result<(), JsValue> {
    let image = HtmlImageElement::new()?;
    let done = image_promise(&image);
    image.set_src(src);
    JsFuture::from(done).await?;
    Ok(())
}

struct ModalFields {
    title: Option<Element>,
    category: Option<Element>,
    description: Option<Element>,
    client: Option<Element>,
    location: Option<Element>,
    year: Option<Element>,
    image: Option<HtmlImageElement>,
}

impl ModalFields {
    fn find(modal: &Element, config: &PortfolioConfig) -> Self {
        let field = |selector: &str| dom::query_in(modal, selector);
        Self {
            title: field(&config.title),
            category: field(&config.category),
            description: field(&config.description),
            client: field(&config.client),
            location: field(&config.location),
            year: field(&config.year),
            image: field(&config.image).and_then(|el| el.dyn_into::<HtmlImageElement>().ok()),
        }
    }

    fn fill(&self, content: &ModalContent) {
        let pairs = [
            (&self.title, &content.title),
            (&self.category, &content.category),
            (&self.description, &content.description),
            (&self.client, &content.client),
            (&self.location, &content.location),
            (&self.year, &content.year),
        ];
        for (element, value) in pairs {
            if let Some(element) = element {
                element.set_text_content(Some(value));
            }
        }
    }
}

pub(crate) struct ProjectModal {
    document: Document,
    modal: HtmlElement,
    content: Option<Element>,
    close: Option<Element>,
    fields: ModalFields,
    open_class: String,
    state: RefCell<ModalState>,
    generation: Cell<u32>,
    listeners: RefCell<Vec<EventListener>>,
}

impl ProjectModal {
    pub(crate) fn install(document: &Document, config: &PortfolioConfig) -> Option<Rc<Self>> {
        let modal = dom::query(document, &config.modal)?;
        let fields = ModalFields::find(&modal, config);
        let view = Rc::new(Self {
            document: document.clone(),
            content: dom::query_in(&modal, &config.modal_content),
            close: dom::query_in(&modal, &config.close),
            modal: dom::html(&modal)?,
            fields,
            open_class: config.open_class.clone(),
            state: RefCell::new(ModalState::new()),
            generation: Cell::new(0),
            listeners: RefCell::new(Vec::new()),
        });

        let mut listeners = Vec::new();
        for (index, item) in dom::query_all(document, &config.modal_item).into_iter().enumerate() {
            let view = Rc::clone(&view);
            listeners.push(EventListener::new(&item, "click", move |_event| {
                view.open(index);
            }));
        }
        let click_view = Rc::clone(&view);
        listeners.push(EventListener::new(&view.modal, "click", move |event: &Event| {
            let Some(target) = event.target() else {
                return;
            };
            let click = click_view.classify(&target);
            if click_view.state.borrow_mut().handle_click(click) {
                click_view.render_closed();
            }
        }));
        let key_view = Rc::clone(&view);
        listeners.push(EventListener::new(document, "keydown", move |event: &Event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if event.key() == "Escape" {
                key_view.close();
            }
        }));
        *view.listeners.borrow_mut() = listeners;
        Some(view)
    }

    fn classify(&self, target: &JsValue) -> ModalClick {
        if let Some(close) = &self.close {
            if dom::is_within(close, target) {
                return ModalClick::CloseControl;
            }
        }
        match &self.content {
            Some(content) if dom::is_within(content, target) => ModalClick::Content,
            _ => ModalClick::Backdrop,
        }
    }

    pub(crate) fn open(self: &Rc<Self>, index: usize) {
        let opened =
            self.state
                .borrow_mut()
                .open(index, PROJECT_CATALOG, FALLBACK_PROJECT_IMAGE);
        let Some(content) = opened else {
            gloo::console::warn!("portfolio: no project at", index as u32);
            return;
        };
        self.fields.fill(&content);
        dom::set_style(&self.modal, "display", "flex");
        dom::add_class(&self.modal, &self.open_class);
        self.apply_body_overflow();
        self.load_image(content.image);
    }

    pub(crate) fn close(&self) {
        if self.state.borrow_mut().close() {
            self.render_closed();
        }
    }

    fn render_closed(&self) {
        dom::set_style(&self.modal, "display", "none");
        dom::remove_class(&self.modal, &self.open_class);
        self.generation.set(self.generation.get().wrapping_add(1));
        self.apply_body_overflow();
    }

    fn apply_body_overflow(&self) {
        let Some(body) = self.document.body() else {
            return;
        };
        dom::set_style(&body, "overflow", self.state.borrow().body_overflow());
    }

    fn load_image(self: &Rc<Self>, mut image: ImageLoad) {
        let Some(element) = self.fields.image.clone() else {
            return;
        };
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);
        let view = Rc::clone(self);
        spawn_local(async move {
            let mut next = image.current_src().map(str::to_string);
            while let Some(src) = next {
                let result = preload(&src).await;
                if view.generation.get() != generation {
                    return;
                }
                match result {
                    Ok(()) => {
                        element.set_src(&src);
                        dom::set_style(&element, "display", "");
                        return;
                    }
                    Err(err) => {
                        gloo::console::warn!("portfolio: image failed", src.as_str(), js_err(err));
                        next = image.on_error().map(str::to_string);
                    }
                }
            }
            dom::set_style(&element, "display", "none");
        });
    }

    #[cfg(test)]
    pub(crate) fn is_open(&self) -> bool {
        self.state.borrow().is_open()
    }
}
