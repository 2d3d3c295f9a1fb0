//! Binding to the `flipbook` animation widget.

use js_sys::{Array, Function, Object, Promise};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{HtmlElement, HtmlImageElement};

use super::{call_method, global, has_method, js_message, set, PdfJsDocument};
use crate::document::{BookAdapter, RenderedPage};
use crate::error::{FlipviewError, Result};
use crate::layout::to_px;
use crate::viewer::{FlipWidget, NavCapabilities, WidgetOptions};

/// JS callbacks backing the page-provider object handed to the widget.
struct BookCallbacks {
    _num_pages: Closure<dyn FnMut() -> u32>,
    _get_page: Closure<dyn FnMut(JsValue, Function)>,
}

/// A flip widget instance created by `flipbook.init`.
pub struct JsFlipWidget {
    viewer: JsValue,
    capabilities: NavCapabilities,
    _book: BookCallbacks,
}

impl JsFlipWidget {
    /// Construct the widget inside `container`.
    ///
    /// # Errors
    /// Returns [`FlipviewError::Init`] if the widget library is missing or
    /// reports a construction error.
    pub async fn create(
        book: BookAdapter<PdfJsDocument>,
        container: &HtmlElement,
        options: &WidgetOptions,
    ) -> Result<Self> {
        let flipbook = global("flipbook")
            .ok_or_else(|| FlipviewError::Init("flipbook library not loaded".to_string()))?;
        let options = serde_wasm_bindgen::to_value(options)
            .map_err(|e| FlipviewError::Init(e.to_string()))?;
        let (book_object, callbacks) = book_object(book);
        let container = JsValue::from(container.clone());

        let constructed = Promise::new(&mut |resolve, reject| {
            let on_throw = reject.clone();
            let done = Closure::once_into_js(move |err: JsValue, viewer: JsValue| {
                let _ = if err.is_null() || err.is_undefined() {
                    resolve.call1(&JsValue::NULL, &viewer)
                } else {
                    reject.call1(&JsValue::NULL, &err)
                };
            });
            let args = Array::of4(&book_object, &container, &options, &done);
            if let Err(err) = call_method(&flipbook, "init", &args) {
                let _ = on_throw.call1(&JsValue::NULL, &err);
            }
        });
        let viewer = JsFuture::from(constructed)
            .await
            .map_err(|e| FlipviewError::Init(js_message(&e)))?;

        let capabilities = NavCapabilities {
            flip_forward: has_method(&viewer, "flip_forward"),
            flip_back: has_method(&viewer, "flip_back"),
        };
        Ok(Self {
            viewer,
            capabilities,
            _book: callbacks,
        })
    }

    fn call(&self, method: &str) {
        if let Err(err) = call_method(&self.viewer, method, &Array::new()) {
            log::warn!("flipbook {method} failed: {}", js_message(&err));
        }
    }
}

impl FlipWidget for JsFlipWidget {
    fn capabilities(&self) -> NavCapabilities {
        self.capabilities
    }

    fn flip_forward(&self) {
        self.call("flip_forward");
    }

    fn flip_back(&self) {
        self.call("flip_back");
    }
}

/// Display index sent by the widget, `None` for negative or non-numeric values.
fn slot_index(value: &JsValue) -> Option<u32> {
    value.as_f64().filter(|v| *v >= 0.0).map(to_px)
}

/// The `{ img, num, width, height }` record the widget draws.
fn page_object(page: &RenderedPage<HtmlImageElement>) -> JsValue {
    let object = Object::new();
    let _ = set(&object, "img", &page.raster);
    let _ = set(&object, "num", &JsValue::from(page.number));
    let _ = set(&object, "width", &JsValue::from(page.width));
    let _ = set(&object, "height", &JsValue::from(page.height));
    object.into()
}

/// Build the `{ numPages(), getPage(displayIndex, cb) }` page provider.
fn book_object(book: BookAdapter<PdfJsDocument>) -> (Object, BookCallbacks) {
    let num_pages = {
        let book = book.clone();
        Closure::wrap(Box::new(move || book.num_pages()) as Box<dyn FnMut() -> u32>)
    };

    let get_page = Closure::wrap(Box::new(move |display: JsValue, callback: Function| {
        let book = book.clone();
        spawn_local(async move {
            let result = match slot_index(&display) {
                Some(slot) => book.get_page(slot).await,
                None => Ok(None),
            };
            let _ = match result {
                Ok(Some(page)) => {
                    callback.call2(&JsValue::NULL, &JsValue::NULL, &page_object(&page))
                }
                Ok(None) => callback.call2(&JsValue::NULL, &JsValue::NULL, &JsValue::NULL),
                Err(err) => {
                    log::warn!("{err}");
                    callback.call1(&JsValue::NULL, &JsValue::from_str(&err.to_string()))
                }
            };
        });
    }) as Box<dyn FnMut(JsValue, Function)>);

    let object = Object::new();
    let _ = set(&object, "numPages", num_pages.as_ref());
    let _ = set(&object, "getPage", get_page.as_ref());
    (
        object,
        BookCallbacks {
            _num_pages: num_pages,
            _get_page: get_page,
        },
    )
}
