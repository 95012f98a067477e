use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::render::{request_animation_frame, AnimationFrame};
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlElement, MouseEvent};

use milanzi_site_core::{tilt_for_pointer, Coalescer, Ease, Tilt, TweenSpec, TILT_PERSPECTIVE_PX};

use crate::animator::Animator;
use crate::dom;

const TILT_FOLLOW_S: f64 = 0.5;
const TILT_RELEASE_S: f64 = 0.6;

struct TiltCard {
    card: HtmlElement,
    animator: Rc<dyn Animator>,
    pending: RefCell<Coalescer<Tilt>>,
    frame: RefCell<Option<AnimationFrame>>,
}

impl TiltCard {
    fn queue(self: &Rc<Self>, tilt: Tilt) {
        if !self.pending.borrow_mut().push(tilt) {
            return;
        }
        let card = Rc::clone(self);
        let handle = request_animation_frame(move |_| {
            card.frame.borrow_mut().take();
            let latest = card.pending.borrow_mut().take();
            if let Some(tilt) = latest {
                card.apply(tilt, TILT_FOLLOW_S, Ease::Power1Out);
            }
        });
        *self.frame.borrow_mut() = Some(handle);
    }

    fn release(&self) {
        self.pending.borrow_mut().take();
        self.frame.borrow_mut().take();
        self.apply(Tilt::FLAT, TILT_RELEASE_S, Ease::Power2Out);
    }

    fn apply(&self, tilt: Tilt, duration_s: f64, ease: Ease) {
        let tween = TweenSpec::new(duration_s)
            .rotation(tilt.rotate_x, tilt.rotate_y)
            .perspective(TILT_PERSPECTIVE_PX)
            .ease(ease);
        self.animator.to(&self.card, &tween);
    }
}

pub(crate) struct CardTilt {
    listeners: Vec<EventListener>,
}

impl CardTilt {
    pub(crate) fn install(document: &Document, selector: &str, animator: Rc<dyn Animator>) -> Self {
        let mut listeners = Vec::new();
        for element in dom::query_all(document, selector) {
            let Some(card) = dom::html(&element) else {
                continue;
            };
            let state = Rc::new(TiltCard {
                card,
                animator: Rc::clone(&animator),
                pending: RefCell::new(Coalescer::new()),
                frame: RefCell::new(None),
            });
            let move_state = Rc::clone(&state);
            listeners.push(EventListener::new(&element, "mousemove", move |event: &Event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let rect = move_state.card.get_bounding_client_rect();
                let tilt = tilt_for_pointer(
                    event.client_x() as f64 - rect.left(),
                    event.client_y() as f64 - rect.top(),
                    rect.width(),
                    rect.height(),
                );
                move_state.queue(tilt);
            }));
            let leave_state = Rc::clone(&state);
            listeners.push(EventListener::new(&element, "mouseleave", move |_event| {
                leave_state.release();
            }));
        }
        Self { listeners }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
