#![cfg(not(tarpaulin_include))]
#![cfg(feature = "web")]
//! Browser binding
//!
//! Wires document events to [`ViewController`] methods and applies the node
//! updates it renders. The controller lives in one `Rc<App>` captured by
//! the event closures; no borrow of it is held across an `await`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use js_sys::{Array, Uint8Array};
use log::{Level, LevelFilter, Metadata, Record, debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    Blob, Document, DragEvent, Element, Event, File, FormData, HtmlElement, HtmlInputElement,
    HtmlTextAreaElement, Request, RequestInit, Response, console,
};

use crate::config::PanelConfig;
use crate::controller::ViewController;
use crate::dispatcher::{self, Transport, TransportError};
use crate::error::PanelError;
use crate::form::{PartValue, SortColumn, UploadForm};
use crate::render::{NodeUpdate, Target};
use crate::selection::SelectedFile;

/// `fetch` based transport
pub struct FetchTransport;

fn js_message(err: &JsValue) -> String {
    err.dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{:?}", err))
}

fn transport_error(err: JsValue) -> TransportError {
    TransportError(js_message(&err))
}

fn dom_error(err: JsValue) -> PanelError {
    PanelError::Dom(js_message(&err))
}

impl Transport for FetchTransport {
    async fn post_form(&self, url: &str, form: &UploadForm) -> Result<String, TransportError> {
        let data = FormData::new().map_err(transport_error)?;
        for part in form.parts() {
            match part.value {
                PartValue::Text(value) => data
                    .append_with_str(part.name, value)
                    .map_err(transport_error)?,
                PartValue::File { filename, bytes } => {
                    let chunks = Array::of1(&Uint8Array::from(bytes));
                    let blob = Blob::new_with_u8_array_sequence(&chunks).map_err(transport_error)?;
                    data.append_with_blob_and_filename(part.name, &blob, filename)
                        .map_err(transport_error)?;
                }
            }
        }

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_body(&data);
        let request = Request::new_with_str_and_init(url, &init).map_err(transport_error)?;

        let window =
            web_sys::window().ok_or_else(|| TransportError("no window object".to_string()))?;
        let reply = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(transport_error)?;
        let response: Response = reply.dyn_into().map_err(transport_error)?;
        let body = JsFuture::from(response.text().map_err(transport_error)?)
            .await
            .map_err(transport_error)?;
        body.as_string()
            .ok_or_else(|| TransportError("response body is not text".to_string()))
    }
}

struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.level(), record.args()));
        match record.level() {
            Level::Error => console::error_1(&line),
            Level::Warn => console::warn_1(&line),
            _ => console::log_1(&line),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Element lookups, cached by id
struct Dom {
    document: Document,
    cache: RefCell<HashMap<&'static str, Element>>,
}

impl Dom {
    fn new(document: Document) -> Self {
        Self {
            document,
            cache: RefCell::new(HashMap::new()),
        }
    }

    fn element(&self, id: &'static str) -> Result<Element, PanelError> {
        if let Some(el) = self.cache.borrow().get(id) {
            return Ok(el.clone());
        }
        let el = self
            .document
            .get_element_by_id(id)
            .ok_or_else(|| PanelError::Dom(format!("missing #{}", id)))?;
        self.cache.borrow_mut().insert(id, el.clone());
        Ok(el)
    }

    fn resolve(&self, target: Target) -> Result<Element, PanelError> {
        match target {
            Target::Id(id) => self.element(id),
            Target::FieldGroup(field) => self
                .element(field.input_id())?
                .parent_element()
                .ok_or_else(|| PanelError::Dom(format!("#{} has no parent", field.input_id()))),
            Target::DetailsPanel => self
                .document
                .query_selector(".details-section")
                .map_err(dom_error)?
                .ok_or_else(|| PanelError::Dom("missing .details-section".to_string())),
            Target::SortCard => self
                .element("sortList")?
                .closest(".detail-card")
                .map_err(dom_error)?
                .ok_or_else(|| PanelError::Dom("#sortList has no .detail-card".to_string())),
        }
    }

    fn apply_one(&self, update: &NodeUpdate) -> Result<(), PanelError> {
        match update {
            NodeUpdate::SetText { target, text } => {
                self.resolve(*target)?.set_text_content(Some(text.as_str()));
            }
            NodeUpdate::SetHtml { target, html } => {
                self.resolve(*target)?.set_inner_html(html);
            }
            NodeUpdate::SetDisplay { target, display } => {
                let el = self.resolve(*target)?;
                if let Some(html) = el.dyn_ref::<HtmlElement>() {
                    html.style()
                        .set_property("display", display.as_css())
                        .map_err(dom_error)?;
                }
            }
            NodeUpdate::SetClass { target, class, on } => {
                self.resolve(*target)?
                    .class_list()
                    .toggle_with_force(class, *on)
                    .map_err(dom_error)?;
            }
            NodeUpdate::ClearValue { target } => {
                let el = self.resolve(*target)?;
                if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
                    input.set_value("");
                } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
                    area.set_value("");
                }
            }
        }
        Ok(())
    }

    // A page without some optional node (older templates lack #totalStFo)
    // still gets every other update.
    fn apply(&self, updates: &[NodeUpdate]) {
        for update in updates {
            if let Err(err) = self.apply_one(update) {
                debug!("skipped {:?}: {}", update, err);
            }
        }
    }

    fn value_of(&self, id: &'static str) -> String {
        match self.element(id) {
            Ok(el) => {
                if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
                    input.value()
                } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
                    area.value()
                } else {
                    String::new()
                }
            }
            Err(_) => String::new(),
        }
    }

    fn checked_sort_column(&self) -> Option<SortColumn> {
        let el = self
            .document
            .query_selector("input[name=\"sortColumn\"]:checked")
            .ok()??;
        let input = el.dyn_into::<HtmlInputElement>().ok()?;
        SortColumn::from_value(&input.value())
    }
}

struct App {
    controller: RefCell<ViewController>,
    dom: Dom,
}

impl App {
    fn refresh(&self) {
        let rendered = self.controller.borrow_mut().render();
        match rendered {
            Ok(updates) => self.dom.apply(&updates),
            Err(err) => warn!("render failed: {}", err),
        }
    }

    fn take_file(self: &Rc<Self>, file: File) {
        let name = file.name();
        if self.controller.borrow_mut().check_candidate(&name).is_err() {
            self.refresh();
            return;
        }

        let app = Rc::clone(self);
        spawn_local(async move {
            match JsFuture::from(file.array_buffer()).await {
                Ok(buffer) => {
                    let bytes = Uint8Array::new(&buffer).to_vec();
                    let _ = app
                        .controller
                        .borrow_mut()
                        .choose_file(SelectedFile::new(name, bytes));
                }
                Err(err) => app
                    .controller
                    .borrow_mut()
                    .file_unreadable(&name, &js_message(&err)),
            }
            app.refresh();
        });
    }

    fn process(self: &Rc<Self>) {
        let started = {
            let mut controller = self.controller.borrow_mut();
            if let Some(column) = self.dom.checked_sort_column() {
                controller.set_sort_column(column);
            }
            controller.set_date_start(&self.dom.value_of("dateDebut"));
            controller.set_date_end(&self.dom.value_of("dateFin"));
            controller.set_purpose(&self.dom.value_of("objetVisite"));
            controller.begin_submit()
        };
        self.refresh();

        let Ok((ticket, form)) = started else {
            return;
        };
        let (url, fallback) = {
            let controller = self.controller.borrow();
            (
                controller.config().upload_url.clone(),
                controller.config().fallback_error.clone(),
            )
        };

        let app = Rc::clone(self);
        spawn_local(async move {
            let outcome = dispatcher::dispatch(&FetchTransport, &url, &form, &fallback).await;
            app.controller.borrow_mut().finish_submit(ticket, outcome);
            app.refresh();
        });
    }
}

fn listen<F>(target: &Element, event: &str, app: &Rc<App>, handler: F) -> Result<(), PanelError>
where
    F: Fn(&Rc<App>, Event) + 'static,
{
    let app = Rc::clone(app);
    let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| handler(&app, event));
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(dom_error)?;
    // Listeners live as long as the page
    closure.forget();
    Ok(())
}

fn input_value(event: &Event) -> String {
    event
        .target()
        .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .or_else(|| {
            event
                .target()
                .and_then(|t| t.dyn_into::<HtmlTextAreaElement>().ok())
                .map(|area| area.value())
        })
        .unwrap_or_default()
}

fn wire(app: &Rc<App>) -> Result<(), PanelError> {
    let dom = &app.dom;
    let drop_zone = dom.element("dropZone")?;

    listen(&drop_zone, "dragover", app, |app, event| {
        event.prevent_default();
        app.controller.borrow_mut().drag_over();
        app.refresh();
    })?;
    listen(&drop_zone, "dragleave", app, |app, event| {
        event.prevent_default();
        app.controller.borrow_mut().drag_leave();
        app.refresh();
    })?;
    listen(&drop_zone, "drop", app, |app, event| {
        event.prevent_default();
        app.controller.borrow_mut().drag_leave();
        let file = event
            .dyn_ref::<DragEvent>()
            .and_then(|drag| drag.data_transfer())
            .and_then(|transfer| transfer.files())
            .and_then(|files| files.get(0));
        match file {
            Some(file) => app.take_file(file),
            None => app.refresh(),
        }
    })?;
    listen(&drop_zone, "click", app, |app, _| {
        if let Ok(input) = app.dom.element("fileInput") {
            if let Some(input) = input.dyn_ref::<HtmlElement>() {
                input.click();
            }
        }
    })?;

    listen(&dom.element("fileInput")?, "change", app, |app, event| {
        let file = event
            .target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            .and_then(|input| input.files())
            .and_then(|files| files.get(0));
        if let Some(file) = file {
            app.take_file(file);
        }
    })?;

    listen(&dom.element("dateDebut")?, "change", app, |app, event| {
        app.controller.borrow_mut().set_date_start(&input_value(&event));
        app.refresh();
    })?;
    listen(&dom.element("dateFin")?, "change", app, |app, event| {
        app.controller.borrow_mut().set_date_end(&input_value(&event));
        app.refresh();
    })?;
    let purpose = dom.element("objetVisite")?;
    listen(&purpose, "input", app, |app, event| {
        app.controller.borrow_mut().set_purpose(&input_value(&event));
        app.refresh();
    })?;
    listen(&purpose, "blur", app, |app, _| {
        app.controller.borrow_mut().blur_purpose();
        app.refresh();
    })?;

    let radios = dom
        .document
        .query_selector_all("input[name=\"sortColumn\"]")
        .map_err(dom_error)?;
    for i in 0..radios.length() {
        let Some(radio) = radios.item(i).and_then(|node| node.dyn_into::<Element>().ok()) else {
            continue;
        };
        listen(&radio, "change", app, |app, event| {
            if let Some(column) = SortColumn::from_value(&input_value(&event)) {
                app.controller.borrow_mut().set_sort_column(column);
            }
        })?;
    }

    listen(&dom.element("processBtn")?, "click", app, |app, _| app.process())?;
    listen(&dom.element("removeBtn")?, "click", app, |app, _| {
        app.controller.borrow_mut().remove_file();
        app.refresh();
    })?;

    // "New file" button at the bottom of the results
    let results = dom.element("results")?;
    let button = dom.document.create_element("button").map_err(dom_error)?;
    button.set_text_content(Some("Traiter un nouveau fichier"));
    button.set_class_name("btn-process");
    if let Some(html) = button.dyn_ref::<HtmlElement>() {
        html.style()
            .set_property("margin-top", "20px")
            .map_err(dom_error)?;
    }
    results.append_child(&button).map_err(dom_error)?;
    listen(&button, "click", app, |app, _| {
        app.controller.borrow_mut().reset();
        app.refresh();
    })?;

    Ok(())
}

fn mount() -> Result<Rc<App>, PanelError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| PanelError::Dom("no document".to_string()))?;

    let config = match document.body().and_then(|b| b.get_attribute("data-config")) {
        Some(text) => PanelConfig::from_json(&text)?,
        None => PanelConfig::default(),
    };
    debug!("upload panel config: {:?}", config);

    let app = Rc::new(App {
        controller: RefCell::new(ViewController::new(config)?),
        dom: Dom::new(document),
    });
    wire(&app)?;
    app.refresh();
    Ok(app)
}

/// WebAssembly entry point
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
    mount().map(|_| ()).map_err(|err| JsValue::from_str(&err.to_string()))
}
