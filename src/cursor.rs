use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::render::{request_animation_frame, AnimationFrame};
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlElement, MouseEvent};

use milanzi_site_core::{
    Coalescer, CursorConfig, Ease, Follower, HoverState, Point, RenderStrategy, TweenSpec,
    CURSOR_DURATION_S, FOLLOWER_DURATION_S,
};

use crate::animator::Animator;
use crate::dom;

const HOVER_DURATION_S: f64 = 0.3;

pub(crate) struct CursorFollower {
    cursor: HtmlElement,
    follower: HtmlElement,
    animator: Rc<dyn Animator>,
    pending: RefCell<Coalescer<Point>>,
    frame: RefCell<Option<AnimationFrame>>,
    smoothing: RefCell<Follower>,
    settle_frame: RefCell<Option<AnimationFrame>>,
    last_tick: Cell<Option<f64>>,
    pointer: Cell<Point>,
    hover: Cell<HoverState>,
    listeners: RefCell<Vec<EventListener>>,
}

impl CursorFollower {
    pub(crate) fn install(
        document: &Document,
        config: &CursorConfig,
        animator: Rc<dyn Animator>,
    ) -> Option<Rc<Self>> {
        let cursor = dom::query(document, &config.cursor).and_then(|el| dom::html(&el))?;
        let follower = dom::query(document, &config.follower).and_then(|el| dom::html(&el))?;
        let state = Rc::new(Self {
            cursor,
            follower,
            animator,
            pending: RefCell::new(Coalescer::new()),
            frame: RefCell::new(None),
            smoothing: RefCell::new(Follower::new(FOLLOWER_DURATION_S)),
            settle_frame: RefCell::new(None),
            last_tick: Cell::new(None),
            pointer: Cell::new(Point::default()),
            hover: Cell::new(HoverState::Idle),
            listeners: RefCell::new(Vec::new()),
        });

        let mut listeners = Vec::new();
        let move_state = Rc::clone(&state);
        listeners.push(EventListener::new(document, "mousemove", move |event: &Event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            move_state.queue_pointer(Point::new(event.client_x() as f64, event.client_y() as f64));
        }));
        for target in dom::query_all(document, &config.hover_targets) {
            let enter_state = Rc::clone(&state);
            listeners.push(EventListener::new(&target, "mouseenter", move |_event| {
                enter_state.set_hover(HoverState::Interactive);
            }));
            let leave_state = Rc::clone(&state);
            listeners.push(EventListener::new(&target, "mouseleave", move |_event| {
                leave_state.set_hover(HoverState::Idle);
            }));
        }
        *state.listeners.borrow_mut() = listeners;
        Some(state)
    }

    /// Latest position wins; at most one frame is pending.
    fn queue_pointer(self: &Rc<Self>, point: Point) {
        if !self.pending.borrow_mut().push(point) {
            return;
        }
        let state = Rc::clone(self);
        let handle = request_animation_frame(move |_| {
            state.frame.borrow_mut().take();
            let latest = state.pending.borrow_mut().take();
            if let Some(point) = latest {
                state.apply_pointer(point);
            }
        });
        *self.frame.borrow_mut() = Some(handle);
    }

    fn apply_pointer(self: &Rc<Self>, point: Point) {
        self.pointer.set(point);
        let look = self.hover.get().look();
        match self.animator.strategy() {
            RenderStrategy::Enhanced => {
                self.animator.to(
                    &self.cursor,
                    &TweenSpec::new(CURSOR_DURATION_S).translate(point.x, point.y),
                );
                self.animator.to(
                    &self.follower,
                    &TweenSpec::new(FOLLOWER_DURATION_S)
                        .translate(point.x, point.y)
                        .ease(Ease::Power2Out),
                );
            }
            RenderStrategy::Fallback => {
                place(&self.cursor, point, look.cursor_scale);
                self.smoothing.borrow_mut().set_target(point);
                self.ensure_settle_frame();
            }
            RenderStrategy::Reduced => {
                place(&self.cursor, point, look.cursor_scale);
                place(&self.follower, point, look.follower_scale);
            }
        }
    }

    fn ensure_settle_frame(self: &Rc<Self>) {
        if self.settle_frame.borrow().is_some() {
            return;
        }
        let state = Rc::clone(self);
        let handle = request_animation_frame(move |timestamp| {
            state.settle_frame.borrow_mut().take();
            state.settle_step(timestamp);
        });
        *self.settle_frame.borrow_mut() = Some(handle);
    }

    fn settle_step(self: &Rc<Self>, timestamp: f64) {
        let dt_ms = match self.last_tick.replace(Some(timestamp)) {
            Some(prev) => (timestamp - prev).max(0.0),
            None => 16.0,
        };
        let (position, settled) = {
            let mut smoothing = self.smoothing.borrow_mut();
            let position = smoothing.step(dt_ms);
            (position, smoothing.is_settled())
        };
        place(&self.follower, position, self.hover.get().look().follower_scale);
        if settled {
            self.last_tick.set(None);
            return;
        }
        self.ensure_settle_frame();
    }

    fn set_hover(&self, hover: HoverState) {
        if self.hover.replace(hover) == hover {
            return;
        }
        let look = hover.look();
        match self.animator.strategy() {
            RenderStrategy::Enhanced => {
                self.animator
                    .to(&self.cursor, &TweenSpec::new(HOVER_DURATION_S).scale(look.cursor_scale));
                self.animator.to(
                    &self.follower,
                    &TweenSpec::new(HOVER_DURATION_S)
                        .scale(look.follower_scale)
                        .background(look.follower_background),
                );
            }
            _ => {
                let pointer = self.pointer.get();
                let follower_at = if self.animator.strategy() == RenderStrategy::Fallback {
                    self.smoothing.borrow().position()
                } else {
                    pointer
                };
                place(&self.cursor, pointer, look.cursor_scale);
                place(&self.follower, follower_at, look.follower_scale);
                dom::set_style(&self.follower, "background", look.follower_background);
            }
        }
    }
}

fn place(element: &HtmlElement, point: Point, scale: f64) {
    let tween = TweenSpec::new(0.0).translate(point.x, point.y).scale(scale);
    if let Some(transform) = tween.css_transform() {
        dom::set_style(element, "transform", &transform);
    }
}
