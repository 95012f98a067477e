use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Timeout;
use gloo::timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, Element, Event, HtmlButtonElement, HtmlFormElement, HtmlInputElement,
    HtmlTextAreaElement,
};

use milanzi_site_core::{
    ContactConfig, ContactMessage, ContactTransport, SubmitControl, SubmitController,
    FAILURE_MESSAGE, SUCCESS_MESSAGE,
};

use crate::dom::{self, js_err};
use crate::http;

fn field_value(form: &Element, name: &str) -> Option<String> {
    let element = dom::query_in(form, &format!("[name=\"{name}\"]"))?;
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    element
        .dyn_ref::<HtmlTextAreaElement>()
        .map(HtmlTextAreaElement::value)
}

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn read_message(form: &Element) -> ContactMessage {
    ContactMessage {
        name: field_value(form, "name").unwrap_or_default(),
        email: field_value(form, "email").unwrap_or_default(),
        phone: optional(field_value(form, "phone")),
        subject: optional(field_value(form, "subject")),
        message: field_value(form, "message").unwrap_or_default(),
    }
}

fn alert(message: &str) {
    if let Some(window) = dom::window() {
        let _ = window.alert_with_message(message);
    }
}

async fn send(transport: &ContactTransport, message: &ContactMessage) -> Result<(), gloo::net::Error> {
    match transport {
        ContactTransport::Simulated { delay_ms } => {
            TimeoutFuture::new(*delay_ms).await;
            Ok(())
        }
        ContactTransport::Endpoint { url } => http::post_json(url, message).await,
    }
}

/// `<button type="submit">` labels with its text, `<input type="submit">` with its value.
enum SubmitButton {
    Button(HtmlButtonElement),
    Input(HtmlInputElement),
}

impl SubmitButton {
    fn from_element(element: Element) -> Option<Self> {
        let element = match element.dyn_into::<HtmlButtonElement>() {
            Ok(button) => return Some(Self::Button(button)),
            Err(element) => element,
        };
        element.dyn_into::<HtmlInputElement>().ok().map(Self::Input)
    }

    fn label(&self) -> String {
        match self {
            Self::Button(button) => button.text_content().unwrap_or_default(),
            Self::Input(input) => input.value(),
        }
    }

    fn apply(&self, control: &SubmitControl) {
        match self {
            Self::Button(button) => {
                button.set_disabled(control.disabled);
                button.set_text_content(Some(&control.label));
            }
            Self::Input(input) => {
                input.set_disabled(control.disabled);
                input.set_value(&control.label);
            }
        }
    }
}

pub(crate) struct ContactForm {
    form: HtmlFormElement,
    submit: Option<SubmitButton>,
    config: ContactConfig,
    controller: RefCell<SubmitController>,
    success_timer: RefCell<Option<Timeout>>,
    listeners: RefCell<Vec<EventListener>>,
}

impl ContactForm {
    pub(crate) fn install(document: &Document, config: &ContactConfig) -> Option<Rc<Self>> {
        let form = dom::query(document, &config.form)?
            .dyn_into::<HtmlFormElement>()
            .ok()?;
        let submit = dom::query_in(&form, &config.submit).and_then(SubmitButton::from_element);
        if submit.is_none() {
            gloo::console::warn!("contact: no submit control for", config.submit.clone());
        }
        let view = Rc::new(Self {
            form,
            submit,
            config: config.clone(),
            controller: RefCell::new(SubmitController::new(&config.sending_label)),
            success_timer: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
        });
        let submit_view = Rc::clone(&view);
        let listener = EventListener::new_with_options(
            &view.form,
            "submit",
            EventListenerOptions::enable_prevent_default(),
            move |event: &Event| {
                event.prevent_default();
                submit_view.submit();
            },
        );
        view.listeners.borrow_mut().push(listener);
        Some(view)
    }

    fn current_label(&self) -> String {
        self.submit
            .as_ref()
            .map(SubmitButton::label)
            .unwrap_or_default()
    }

    fn apply(&self, control: &SubmitControl) {
        if let Some(button) = &self.submit {
            button.apply(control);
        }
    }

    pub(crate) fn submit(self: &Rc<Self>) {
        if self.controller.borrow().is_sending() {
            return;
        }
        let message = read_message(&self.form);
        if let Err(err) = message.validate() {
            alert(&err.to_string());
            return;
        }
        let control = match self.controller.borrow_mut().begin(&self.current_label()) {
            Ok(control) => control,
            Err(err) => {
                gloo::console::log!("contact:", err.to_string());
                return;
            }
        };
        self.apply(&control);

        let view = Rc::clone(self);
        spawn_local(async move {
            let result = send(&view.config.transport, &message).await;
            if let Some(control) = view.controller.borrow_mut().finish() {
                view.apply(&control);
            }
            match result {
                Ok(()) => {
                    gloo::console::log!("contact: sent");
                    view.form.reset();
                    view.show_success();
                }
                Err(err) => {
                    gloo::console::warn!("contact: send failed", err.to_string());
                    alert(FAILURE_MESSAGE);
                }
            }
        });
    }

    fn show_success(&self) {
        let Some(document) = dom::document() else {
            return;
        };
        let Ok(notice) = document.create_element("div") else {
            return;
        };
        notice.set_class_name(&self.config.success_class);
        notice.set_text_content(Some(SUCCESS_MESSAGE));
        if let Err(err) = self.form.before_with_node_1(&notice) {
            gloo::console::warn!("contact: success notice", js_err(err));
            return;
        }
        let timer = Timeout::new(self.config.success_ms, move || {
            notice.remove();
        });
        *self.success_timer.borrow_mut() = Some(timer);
    }

    #[cfg(test)]
    pub(crate) fn is_sending(&self) -> bool {
        self.controller.borrow().is_sending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen::JsValue;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const FORM_HTML: &str = r#"
        <form id="testContactForm">
          <input name="name" value="Thoko">
          <input name="email" value="thoko@example.mw">
          <textarea name="message">Hello</textarea>
          <button type="submit">Send Message</button>
        </form>"#;

    fn fixture(html: &str) -> Element {
        console_error_panic_hook::set_once();
        let document = dom::document().unwrap();
        let root = document.create_element("div").unwrap();
        root.set_inner_html(html);
        document.body().unwrap().append_child(&root).unwrap();
        root
    }

    fn install(transport: ContactTransport) -> Rc<ContactForm> {
        let config = ContactConfig {
            form: "#testContactForm".to_string(),
            transport,
            ..ContactConfig::default()
        };
        ContactForm::install(&dom::document().unwrap(), &config).unwrap()
    }

    fn button(root: &Element) -> HtmlButtonElement {
        dom::query_in(root, "button").unwrap().dyn_into().unwrap()
    }

    #[wasm_bindgen_test(async)]
    async fn submit_disables_then_restores_after_success() {
        let root = fixture(FORM_HTML);
        let form = install(ContactTransport::Simulated { delay_ms: 50 });
        form.submit();
        let submit = button(&root);
        assert!(submit.disabled());
        assert_eq!(submit.text_content().unwrap(), "Sending...");
        assert!(form.is_sending());

        form.submit();
        assert!(form.is_sending());

        TimeoutFuture::new(200).await;
        assert!(!submit.disabled());
        assert_eq!(submit.text_content().unwrap(), "Send Message");
        assert!(!form.is_sending());
        assert!(dom::query_in(&root, ".form-success").is_some());
        root.remove();
    }

    #[wasm_bindgen_test(async)]
    async fn submit_restores_after_failure() {
        let root = fixture(FORM_HTML);
        // Keep the failure alert from blocking the test runner.
        let window = dom::window().unwrap();
        let noop = js_sys::Function::new_no_args("");
        js_sys::Reflect::set(&window, &JsValue::from_str("alert"), &noop).unwrap();

        let form = install(ContactTransport::Endpoint {
            url: "http://127.0.0.1:9/unreachable".to_string(),
        });
        form.submit();
        let submit = button(&root);
        assert!(submit.disabled());

        TimeoutFuture::new(1500).await;
        assert!(!submit.disabled());
        assert_eq!(submit.text_content().unwrap(), "Send Message");
        assert!(dom::query_in(&root, ".form-success").is_none());
        root.remove();
    }

    #[wasm_bindgen_test(async)]
    async fn input_submit_is_disabled_and_relabelled() {
        let root = fixture(
            r#"<form id="testContactForm">
                 <input name="name" value="Thoko">
                 <input name="email" value="thoko@example.mw">
                 <textarea name="message">Hello</textarea>
                 <input type="submit" value="Send">
               </form>"#,
        );
        let form = install(ContactTransport::Simulated { delay_ms: 50 });
        let submit: HtmlInputElement = dom::query_in(&root, "input[type=\"submit\"]")
            .unwrap()
            .dyn_into()
            .unwrap();
        form.submit();
        assert!(submit.disabled());
        assert_eq!(submit.value(), "Sending...");

        TimeoutFuture::new(200).await;
        assert!(!submit.disabled());
        assert_eq!(submit.value(), "Send");
        assert!(!form.is_sending());
        root.remove();
    }

    #[wasm_bindgen_test]
    fn invalid_form_never_disables_control() {
        let root = fixture(
            r#"<form id="testContactForm">
                 <input name="name" value="">
                 <button type="submit">Send</button>
               </form>"#,
        );
        let window = dom::window().unwrap();
        let noop = js_sys::Function::new_no_args("");
        js_sys::Reflect::set(&window, &JsValue::from_str("alert"), &noop).unwrap();

        let form = install(ContactTransport::default());
        form.submit();
        assert!(!button(&root).disabled());
        assert!(!form.is_sending());
        root.remove();
    }
}
