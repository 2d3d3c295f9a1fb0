//! [`Platform`] implementation for the browser.

use std::rc::Rc;

use js_sys::{Array, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Event, HtmlElement, KeyboardEvent, ResizeObserver, ResizeObserverEntry, Window,
};

use super::pdfjs::set_worker_src;
use super::{js_message, JsFlipWidget, PdfJsDocument};
use crate::config::{InitOptions, ViewerConfig};
use crate::document::BookAdapter;
use crate::error::{FlipviewError, Result};
use crate::platform::{LocalTask, Platform};
use crate::viewer::{SessionInput, WidgetOptions};

/// Class of the paragraph that replaces a broken viewer's content.
const ERROR_CLASS: &str = "bws-pdf-viewer-error";

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// The page the flipbooks live on.
pub struct BrowserPlatform {
    window: Window,
    document: Document,
    selector: String,
    worker_src: Option<String>,
}

impl BrowserPlatform {
    /// # Errors
    /// Returns [`FlipviewError::Init`] outside a browser window.
    pub fn new(options: &InitOptions) -> Result<Self> {
        let window =
            web_sys::window().ok_or_else(|| FlipviewError::Init("no window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| FlipviewError::Init("no document".to_string()))?;
        Ok(Self {
            window,
            document,
            selector: options.container_selector().to_string(),
            worker_src: options.worker_src(),
        })
    }
}

/// Keeps a container's resize observer connected.
pub struct ResizeSubscription {
    observer: ResizeObserver,
    _callback: Closure<dyn FnMut(Array, JsValue)>,
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Event listeners attached to one element, detached on drop.
pub struct EventListeners {
    target: HtmlElement,
    listeners: Vec<(&'static str, Closure<dyn FnMut(Event)>)>,
}

impl EventListeners {
    fn new(target: HtmlElement) -> Self {
        Self {
            target,
            listeners: Vec::new(),
        }
    }

    fn listen(&mut self, event: &'static str, handler: impl FnMut(Event) + 'static) {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        match self
            .target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            Ok(()) => self.listeners.push((event, closure)),
            Err(err) => log::warn!("cannot listen for {event}: {}", js_message(&err)),
        }
    }
}

impl Drop for EventListeners {
    fn drop(&mut self) {
        for (event, closure) in &self.listeners {
            let _ = self
                .target
                .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
    }
}

impl Platform for BrowserPlatform {
    type Container = HtmlElement;
    type Document = PdfJsDocument;
    type Widget = JsFlipWidget;
    type ResizeGuard = ResizeSubscription;
    type InputGuard = EventListeners;

    fn discover_containers(&self) -> Vec<HtmlElement> {
        let nodes = match self.document.query_selector_all(&self.selector) {
            Ok(nodes) => nodes,
            Err(err) => {
                log::error!("invalid container selector {}: {}", self.selector, js_message(&err));
                return Vec::new();
            }
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .collect()
    }

    fn container_id(&self, container: &HtmlElement) -> Option<String> {
        let id = container.id();
        (!id.is_empty()).then_some(id)
    }

    fn container_config(&self, container: &HtmlElement) -> Option<String> {
        container.get_attribute("data-config")
    }

    fn container_width(&self, container: &HtmlElement) -> f64 {
        f64::from(container.offset_width())
    }

    fn show_error(&self, container: &HtmlElement, message: &str) {
        self.clear(container);
        match self.document.create_element("p") {
            Ok(paragraph) => {
                paragraph.set_class_name(ERROR_CLASS);
                paragraph.set_text_content(Some(message));
                let _ = container.append_child(&paragraph);
            }
            Err(_) => container.set_text_content(Some(message)),
        }
    }

    fn clear(&self, container: &HtmlElement) {
        container.set_inner_html("");
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.window
            .match_media(REDUCED_MOTION_QUERY)
            .ok()
            .flatten()
            .is_some_and(|query| query.matches())
    }

    async fn load_document(&self, config: &ViewerConfig) -> Result<PdfJsDocument> {
        // PDF.js may have loaded after the page controller was created.
        if let Some(src) = &self.worker_src {
            set_worker_src(src)?;
        }
        PdfJsDocument::load(&config.pdf).await
    }

    async fn create_widget(
        &self,
        book: BookAdapter<PdfJsDocument>,
        container: &HtmlElement,
        options: &WidgetOptions,
    ) -> Result<JsFlipWidget> {
        JsFlipWidget::create(book, container, options).await
    }

    fn observe_resize(
        &self,
        container: &HtmlElement,
        mut on_resize: Box<dyn FnMut(f64)>,
    ) -> Option<ResizeSubscription> {
        let supported = Reflect::has(&js_sys::global(), &JsValue::from_str("ResizeObserver"))
            .unwrap_or(false);
        if !supported {
            return None;
        }

        let callback = Closure::wrap(Box::new(move |entries: Array, _observer: JsValue| {
            for entry in entries.iter() {
                if let Ok(entry) = entry.dyn_into::<ResizeObserverEntry>() {
                    on_resize(entry.content_rect().width());
                }
            }
        }) as Box<dyn FnMut(Array, JsValue)>);

        let observer = ResizeObserver::new(callback.as_ref().unchecked_ref()).ok()?;
        observer.observe(container);
        Some(ResizeSubscription {
            observer,
            _callback: callback,
        })
    }

    fn bind_input(&self, container: &HtmlElement, input: Rc<SessionInput>) -> EventListeners {
        if !container.has_attribute("tabindex") {
            let _ = container.set_attribute("tabindex", "0");
        }

        let mut listeners = EventListeners::new(container.clone());
        {
            let input = Rc::clone(&input);
            listeners.listen("focus", move |_| input.focus_in());
        }
        {
            let input = Rc::clone(&input);
            listeners.listen("blur", move |_| input.focus_out());
        }
        {
            let container = container.clone();
            listeners.listen("click", move |_| {
                let _ = container.focus();
            });
        }
        listeners.listen("keydown", move |event| {
            if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                if input.key_down(&event.key()).prevents_default() {
                    event.prevent_default();
                }
            }
        });
        listeners
    }

    fn spawn(&self, task: LocalTask) {
        wasm_bindgen_futures::spawn_local(task);
    }
}
