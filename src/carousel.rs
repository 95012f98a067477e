use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::callback::Interval;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, MouseEvent};

use milanzi_site_core::{Carousel, CarouselConfig, DragOutcome};

use crate::dom;

pub(crate) struct CarouselView {
    track: Option<HtmlElement>,
    slides: Vec<Element>,
    dots: Vec<Element>,
    active_class: String,
    state: RefCell<Carousel>,
    ticker: RefCell<Option<Interval>>,
    listeners: RefCell<Vec<EventListener>>,
}

pub(crate) fn install_all(document: &Document, config: &CarouselConfig) -> Vec<Rc<CarouselView>> {
    dom::query_all(document, &config.root)
        .into_iter()
        .filter_map(|root| CarouselView::install(&root, config))
        .collect()
}

fn client_x(event: &Event) -> Option<f64> {
    event
        .dyn_ref::<MouseEvent>()
        .map(|event| event.client_x() as f64)
}

impl CarouselView {
    fn install(root: &Element, config: &CarouselConfig) -> Option<Rc<Self>> {
        let slides = dom::query_all_in(root, &config.slide);
        if slides.is_empty() {
            return None;
        }
        let view = Rc::new(Self {
            track: dom::query_in(root, &config.track).and_then(|el| dom::html(&el)),
            dots: dom::query_all_in(root, &config.dot),
            active_class: config.active_class.clone(),
            state: RefCell::new(Carousel::with_threshold(slides.len(), config.drag_threshold_px)),
            slides,
            ticker: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
        });

        let mut listeners = Vec::new();
        if let Some(prev) = dom::query_in(root, &config.prev) {
            let view = Rc::clone(&view);
            listeners.push(EventListener::new(&prev, "click", move |_event| {
                view.state.borrow_mut().retreat();
                view.render();
            }));
        }
        if let Some(next) = dom::query_in(root, &config.next) {
            let view = Rc::clone(&view);
            listeners.push(EventListener::new(&next, "click", move |_event| {
                view.state.borrow_mut().advance();
                view.render();
            }));
        }
        for (position, dot) in view.dots.iter().enumerate() {
            let index = dot
                .get_attribute("data-index")
                .and_then(|raw| raw.trim().parse::<usize>().ok())
                .unwrap_or(position);
            let view = Rc::clone(&view);
            listeners.push(EventListener::new(dot, "click", move |_event| {
                if view.state.borrow_mut().go_to(index).is_some() {
                    view.render();
                }
            }));
        }

        let enter_view = Rc::clone(&view);
        listeners.push(EventListener::new(root, "mouseenter", move |_event| {
            enter_view.state.borrow_mut().pause();
        }));
        let leave_view = Rc::clone(&view);
        listeners.push(EventListener::new(root, "mouseleave", move |_event| {
            leave_view.state.borrow_mut().resume();
        }));

        let down_view = Rc::clone(&view);
        listeners.push(EventListener::new(root, "pointerdown", move |event| {
            let Some(x) = client_x(event) else {
                return;
            };
            down_view.state.borrow_mut().begin_drag(x);
            if let Some(track) = &down_view.track {
                dom::set_style(track, "transition", "none");
            }
        }));
        if let Some(window) = dom::window() {
            let move_view = Rc::clone(&view);
            listeners.push(EventListener::new(&window, "pointermove", move |event| {
                let Some(x) = client_x(event) else {
                    return;
                };
                move_view.follow_drag(x);
            }));
            let up_view = Rc::clone(&view);
            listeners.push(EventListener::new(&window, "pointerup", move |event| {
                let Some(x) = client_x(event) else {
                    return;
                };
                up_view.end_drag(x);
            }));
            let cancel_view = Rc::clone(&view);
            listeners.push(EventListener::new(&window, "pointercancel", move |_event| {
                if !cancel_view.state.borrow().is_dragging() {
                    return;
                }
                cancel_view.state.borrow_mut().cancel_drag();
                cancel_view.render();
            }));
        }
        *view.listeners.borrow_mut() = listeners;

        let tick_view = Rc::clone(&view);
        *view.ticker.borrow_mut() = Some(Interval::new(config.interval_ms, move || {
            if tick_view.state.borrow_mut().tick().is_some() {
                tick_view.render();
            }
        }));
        view.render();
        Some(view)
    }

    fn follow_drag(&self, x: f64) {
        let (delta, offset) = {
            let state = self.state.borrow();
            let Some(delta) = state.drag_delta(x) else {
                return;
            };
            (delta, state.track_offset_percent())
        };
        if let Some(track) = &self.track {
            let transform = format!("translateX(calc({offset}% + {delta}px))");
            dom::set_style(track, "transform", &transform);
        }
    }

    fn end_drag(&self, x: f64) {
        if !self.state.borrow().is_dragging() {
            return;
        }
        let outcome = self.state.borrow_mut().end_drag(x);
        if outcome != DragOutcome::Stay {
            gloo::console::log!("carousel: swipe", format!("{outcome:?}"));
        }
        self.render();
    }

    fn render(&self) {
        let (index, offset) = {
            let state = self.state.borrow();
            (state.index(), state.track_offset_percent())
        };
        if let Some(track) = &self.track {
            dom::set_style(track, "transition", "");
            dom::set_style(track, "transform", &format!("translateX({offset}%)"));
        }
        for (position, slide) in self.slides.iter().enumerate() {
            if position == index {
                dom::add_class(slide, &self.active_class);
            } else {
                dom::remove_class(slide, &self.active_class);
            }
        }
        for (position, dot) in self.dots.iter().enumerate() {
            if position == index {
                dom::add_class(dot, &self.active_class);
            } else {
                dom::remove_class(dot, &self.active_class);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn index(&self) -> usize {
        self.state.borrow().index()
    }
}
