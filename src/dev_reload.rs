use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::timers::callback::{Interval, Timeout};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, MessageEvent, WebSocket};

use milanzi_site_core::{is_reload_signal, should_enable, DevReloadConfig, PollFingerprint, ReloadPoller};

use crate::dom::{self, js_err};
use crate::http;

/// Live reload for local development: a socket push, or `HEAD` polling when no socket answers.
pub(crate) struct DevReload {
    socket: Option<WebSocket>,
    _onmessage: Option<Closure<dyn FnMut(MessageEvent)>>,
    _onerror: Option<Closure<dyn FnMut(Event)>>,
    fallback: RefCell<Option<Timeout>>,
    poll: RefCell<Option<Interval>>,
    poller: RefCell<ReloadPoller>,
    in_flight: Cell<bool>,
}

fn reload_page() {
    let Some(window) = dom::window() else {
        return;
    };
    gloo::console::log!("reload: change detected");
    if let Err(err) = window.location().reload() {
        gloo::console::warn!("reload: failed", js_err(err));
    }
}

fn connect(url: &str) -> Option<(WebSocket, Closure<dyn FnMut(MessageEvent)>, Closure<dyn FnMut(Event)>)> {
    let socket = match WebSocket::new(url) {
        Ok(socket) => socket,
        Err(err) => {
            gloo::console::warn!("reload: socket unavailable", js_err(err));
            return None;
        }
    };
    let onmessage = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Some(text) = event.data().as_string() {
            if is_reload_signal(&text) {
                reload_page();
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);
    let onerror = Closure::wrap(Box::new(move |_event: Event| {
        gloo::console::log!("reload: socket error");
    }) as Box<dyn FnMut(Event)>);
    socket.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
    socket.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    Some((socket, onmessage, onerror))
}

impl DevReload {
    pub(crate) fn install(config: &DevReloadConfig) -> Option<Rc<Self>> {
        let window = dom::window()?;
        let hostname = window.location().hostname().unwrap_or_default();
        if !should_enable(config.mode, &hostname, &config.hosts) {
            return None;
        }
        let (socket, onmessage, onerror) = match connect(&config.socket_url) {
            Some((socket, onmessage, onerror)) => (Some(socket), Some(onmessage), Some(onerror)),
            None => (None, None, None),
        };
        let reload = Rc::new(Self {
            socket,
            _onmessage: onmessage,
            _onerror: onerror,
            fallback: RefCell::new(None),
            poll: RefCell::new(None),
            poller: RefCell::new(ReloadPoller::new()),
            in_flight: Cell::new(false),
        });

        let poll_interval = config.poll_interval_ms;
        if reload.socket.is_none() {
            reload.start_polling(poll_interval);
        } else {
            let check = Rc::clone(&reload);
            let timer = Timeout::new(config.fallback_after_ms, move || {
                check.fallback.borrow_mut().take();
                if check.socket_open() {
                    gloo::console::log!("reload: socket connected");
                    return;
                }
                check.start_polling(poll_interval);
            });
            *reload.fallback.borrow_mut() = Some(timer);
        }
        Some(reload)
    }

    fn socket_open(&self) -> bool {
        self.socket
            .as_ref()
            .is_some_and(|socket| socket.ready_state() == WebSocket::OPEN)
    }

    fn start_polling(self: &Rc<Self>, interval_ms: u32) {
        if let Some(socket) = &self.socket {
            let _ = socket.close();
        }
        gloo::console::log!("reload: polling every", interval_ms, "ms");
        let reload = Rc::clone(self);
        let interval = Interval::new(interval_ms, move || reload.poll_once());
        *self.poll.borrow_mut() = Some(interval);
        self.poll_once();
    }

    fn poll_once(self: &Rc<Self>) {
        if self.in_flight.replace(true) {
            return;
        }
        let Some(url) = dom::window().and_then(|window| window.location().href().ok()) else {
            self.in_flight.replace(false);
            return;
        };
        let reload = Rc::clone(self);
        spawn_local(async move {
            let result = http::head_validators(&url).await;
            reload.in_flight.replace(false);
            match result {
                Ok((etag, last_modified)) => {
                    let changed = reload
                        .poller
                        .borrow_mut()
                        .observe(PollFingerprint { etag, last_modified });
                    if changed {
                        reload.poll.borrow_mut().take();
                        reload_page();
                    }
                }
                Err(err) => gloo::console::log!("reload: poll failed", err.to_string()),
            }
        });
    }

    #[cfg(test)]
    pub(crate) fn is_polling(&self) -> bool {
        self.poll.borrow().is_some()
    }
}

impl Drop for DevReload {
    fn drop(&mut self) {
        if let Some(socket) = &self.socket {
            socket.set_onmessage(None);
            socket.set_onerror(None);
        }
    }
}
