use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::render::{request_animation_frame, AnimationFrame};
use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use milanzi_site_core::{
    visible_ratio, FrameGate, RootMargin, TargetId, VisibilitySample, VisibilityWatcher,
    WatchBatch, WatchEvent, WatchOptions,
};

use crate::dom::{self, js_err};

pub(crate) type WatchHandler = Rc<dyn Fn(WatchEvent, &Element)>;

enum Driver {
    Observer {
        observer: IntersectionObserver,
        _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
    },
    Scroll,
}

/// One watcher core plus the browser plumbing that feeds it visibility samples.
pub(crate) struct WatchGroup {
    name: &'static str,
    attribute: String,
    margin: RootMargin,
    watcher: RefCell<VisibilityWatcher>,
    targets: RefCell<BTreeMap<TargetId, Element>>,
    handler: RefCell<Option<WatchHandler>>,
    driver: RefCell<Option<Driver>>,
    gate: Cell<FrameGate>,
    frame: RefCell<Option<AnimationFrame>>,
    listeners: RefCell<Vec<EventListener>>,
}

impl WatchGroup {
    pub(crate) fn new(name: &'static str, options: WatchOptions, margin: RootMargin) -> Rc<Self> {
        Rc::new(Self {
            name,
            attribute: format!("data-watch-{name}"),
            margin,
            watcher: RefCell::new(VisibilityWatcher::new(options)),
            targets: RefCell::new(BTreeMap::new()),
            handler: RefCell::new(None),
            driver: RefCell::new(None),
            gate: Cell::new(FrameGate::new()),
            frame: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.watcher.borrow().len()
    }

    pub(crate) fn uses_observer(&self) -> bool {
        matches!(*self.driver.borrow(), Some(Driver::Observer { .. }))
    }

    /// Elements already carrying this group's id attribute are skipped.
    pub(crate) fn watch(self: &Rc<Self>, element: &Element) -> Option<TargetId> {
        if element.has_attribute(&self.attribute) {
            return None;
        }
        let id = self.watcher.borrow_mut().register();
        // Observer entries resolve targets through this attribute.
        if let Err(err) = element.set_attribute(&self.attribute, &id.0.to_string()) {
            gloo::console::warn!(format!("{}: id stamp failed", self.name), js_err(err));
            self.watcher.borrow_mut().unregister(id);
            return None;
        }
        self.targets.borrow_mut().insert(id, element.clone());
        match &*self.driver.borrow() {
            Some(Driver::Observer { observer, .. }) => observer.observe(element),
            Some(Driver::Scroll) => self.schedule_check(),
            None => {}
        }
        Some(id)
    }

    pub(crate) fn start(self: &Rc<Self>, handler: WatchHandler, use_observer: bool) {
        *self.handler.borrow_mut() = Some(handler);
        if use_observer {
            match self.install_observer() {
                Ok(()) => return,
                Err(err) => {
                    gloo::console::warn!(format!("{}: observer unavailable", self.name), js_err(err));
                }
            }
        }
        self.install_scroll();
    }

    fn install_observer(self: &Rc<Self>) -> Result<(), JsValue> {
        let group = Rc::clone(self);
        let callback = Closure::wrap(Box::new(move |entries: Array, _observer: IntersectionObserver| {
            group.on_entries(entries);
        }) as Box<dyn FnMut(Array, IntersectionObserver)>);
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(self.watcher.borrow().options().threshold));
        init.set_root_margin(&self.margin.to_string());
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        for element in self.targets.borrow().values() {
            observer.observe(element);
        }
        *self.driver.borrow_mut() = Some(Driver::Observer {
            observer,
            _callback: callback,
        });
        Ok(())
    }

    fn install_scroll(self: &Rc<Self>) {
        *self.driver.borrow_mut() = Some(Driver::Scroll);
        let Some(window) = dom::window() else {
            return;
        };
        let mut listeners = Vec::new();
        for event in ["scroll", "resize"] {
            let group = Rc::clone(self);
            listeners.push(EventListener::new(&window, event, move |_event| {
                group.schedule_check();
            }));
        }
        *self.listeners.borrow_mut() = listeners;
        self.schedule_check();
    }

    fn schedule_check(self: &Rc<Self>) {
        let mut gate = self.gate.get();
        if !gate.try_begin() {
            return;
        }
        self.gate.set(gate);
        let group = Rc::clone(self);
        let handle = request_animation_frame(move |_| {
            group.frame.borrow_mut().take();
            let mut gate = group.gate.get();
            gate.finish();
            group.gate.set(gate);
            group.check_geometry();
        });
        *self.frame.borrow_mut() = Some(handle);
    }

    fn check_geometry(&self) {
        let Some(window) = dom::window() else {
            return;
        };
        let viewport = dom::viewport_rect(&window);
        let samples: Vec<VisibilitySample> = self
            .targets
            .borrow()
            .iter()
            .map(|(id, element)| VisibilitySample {
                id: *id,
                ratio: visible_ratio(dom::rect_of(element), viewport, &self.margin),
            })
            .collect();
        let batch = self.watcher.borrow_mut().process(samples);
        self.dispatch(batch);
    }

    fn on_entries(&self, entries: Array) {
        let mut samples = Vec::with_capacity(entries.length() as usize);
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            let Some(id) = entry
                .target()
                .get_attribute(&self.attribute)
                .and_then(|raw| TargetId::parse(&raw))
            else {
                continue;
            };
            let ratio = if entry.is_intersecting() {
                entry.intersection_ratio()
            } else {
                0.0
            };
            samples.push(VisibilitySample { id, ratio });
        }
        let batch = self.watcher.borrow_mut().process(samples);
        self.dispatch(batch);
    }

    fn dispatch(&self, batch: WatchBatch) {
        if batch.is_empty() {
            return;
        }
        let handler = self.handler.borrow().clone();
        if let Some(handler) = handler {
            for event in &batch.events {
                let element = self.targets.borrow().get(&event.id()).cloned();
                if let Some(element) = element {
                    handler(*event, &element);
                }
            }
        }
        for id in &batch.unobserve {
            let Some(element) = self.targets.borrow_mut().remove(id) else {
                continue;
            };
            if let Some(Driver::Observer { observer, .. }) = &*self.driver.borrow() {
                observer.unobserve(&element);
            }
        }
        if self.watcher.borrow().is_empty() {
            self.stop();
        }
    }

    /// Releases the observer and listeners once nothing is left to watch.
    fn stop(&self) {
        if let Some(Driver::Observer { observer, .. }) = &*self.driver.borrow() {
            observer.disconnect();
        }
        self.listeners.borrow_mut().clear();
        self.frame.borrow_mut().take();
    }
}
