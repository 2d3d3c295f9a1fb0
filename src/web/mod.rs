//! Browser bindings.
//!
//! Implements [`Platform`](crate::platform::Platform) on top of the DOM,
//! PDF.js (`pdfjsLib`) and the flip widget library (`flipbook`), and exports
//! the [`Flipbooks`] entry point to JavaScript.

mod pdfjs;
mod platform;
mod widget;

pub use pdfjs::PdfJsDocument;
pub use platform::{BrowserPlatform, EventListeners, ResizeSubscription};
pub use widget::JsFlipWidget;

use std::rc::Rc;

use js_sys::{Array, Function, Promise, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::config::InitOptions;
use crate::logger::ConsoleLogger;
use crate::orchestrator::Orchestrator;

/// All flipbooks on the page, exported to JavaScript.
#[wasm_bindgen]
pub struct Flipbooks {
    orchestrator: Rc<Orchestrator<BrowserPlatform>>,
    #[allow(dead_code)] // Kept alive until the DOM is ready
    ready_listener: Option<Closure<dyn FnMut()>>,
}

#[wasm_bindgen]
impl Flipbooks {
    /// Create the page controller from the page's init options
    /// (`{ pluginUrl, workerSrc, containerSelector, logLevel }`).
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<Flipbooks, JsValue> {
        console_error_panic_hook::set_once();

        let options: InitOptions = if options.is_undefined() || options.is_null() {
            InitOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)?
        };
        ConsoleLogger::init(options.log_level());

        let platform = BrowserPlatform::new(&options)?;
        Ok(Flipbooks {
            orchestrator: Rc::new(Orchestrator::new(platform)),
            ready_listener: None,
        })
    }

    /// Initialize every flipbook now, or once the DOM has finished loading.
    pub fn run(&mut self) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;

        if document.ready_state() == "loading" {
            let orchestrator = Rc::clone(&self.orchestrator);
            let listener: Closure<dyn FnMut()> = Closure::once(move || {
                orchestrator.init_all();
            });
            document.add_event_listener_with_callback(
                "DOMContentLoaded",
                listener.as_ref().unchecked_ref(),
            )?;
            self.ready_listener = Some(listener);
        } else {
            self.orchestrator.init_all();
        }
        Ok(())
    }

    /// Initialize containers that are not active yet. Returns how many were scheduled.
    #[wasm_bindgen(js_name = "initFlipbooks")]
    pub fn init_flipbooks(&self) -> u32 {
        u32::try_from(self.orchestrator.init_all()).unwrap_or(u32::MAX)
    }

    /// Ids of the initialized flipbooks.
    #[wasm_bindgen(js_name = "activeViewers")]
    pub fn active_viewers(&self) -> Vec<String> {
        self.orchestrator.registry().ids()
    }

    /// Id of the flipbook that currently receives keyboard navigation.
    #[wasm_bindgen(js_name = "focusedViewer")]
    pub fn focused_viewer(&self) -> Option<String> {
        self.orchestrator.focus().focused()
    }

    /// Detach a flipbook, cancelling it if it is still loading.
    pub fn teardown(&self, id: &str) -> bool {
        self.orchestrator.teardown(id)
    }
}

/// Best-effort message from a thrown JS value.
pub(crate) fn js_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// A global like `pdfjsLib`, if the page defines it.
pub(crate) fn global(name: &str) -> Option<JsValue> {
    Reflect::get(&js_sys::global(), &JsValue::from_str(name))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

pub(crate) fn has_method(target: &JsValue, name: &str) -> bool {
    Reflect::get(target, &JsValue::from_str(name)).is_ok_and(|value| value.is_function())
}

pub(crate) fn call_method(target: &JsValue, name: &str, args: &Array) -> Result<JsValue, JsValue> {
    let method: Function = Reflect::get(target, &JsValue::from_str(name))?.dyn_into()?;
    method.apply(target, args)
}

pub(crate) fn set(target: &JsValue, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(key), value).map(|_| ())
}

/// Await a promise or thenable.
pub(crate) async fn resolve(value: &JsValue) -> Result<JsValue, JsValue> {
    JsFuture::from(Promise::resolve(value)).await
}
