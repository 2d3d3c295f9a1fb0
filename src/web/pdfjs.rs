//! PDF.js document loading and page rasterization.

use js_sys::{Array, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlCanvasElement, HtmlImageElement};

use super::{call_method, global, js_message, resolve, set};
use crate::document::{PdfDocument, RenderScale, RenderedPage};
use crate::error::{FlipviewError, Result};
use crate::layout::to_px;

fn pdfjs() -> Result<JsValue> {
    global("pdfjsLib").ok_or_else(|| FlipviewError::Load("PDF.js library not loaded".to_string()))
}

/// Point PDF.js at its worker script.
///
/// # Errors
/// Returns [`FlipviewError::Load`] if PDF.js is not on the page.
pub(crate) fn set_worker_src(src: &str) -> Result<()> {
    let options = Reflect::get(&pdfjs()?, &JsValue::from_str("GlobalWorkerOptions"))
        .map_err(|e| FlipviewError::Load(js_message(&e)))?;
    set(&options, "workerSrc", &JsValue::from_str(src))
        .map_err(|e| FlipviewError::Load(js_message(&e)))
}

fn load_error(value: &JsValue) -> FlipviewError {
    let message = js_message(value);
    if message.is_empty() {
        FlipviewError::Load("PDF loading failed".to_string())
    } else {
        FlipviewError::Load(message)
    }
}

/// A document loaded by PDF.js.
pub struct PdfJsDocument {
    pdf: JsValue,
    page_count: u32,
}

impl PdfJsDocument {
    /// Fetch and parse the document at `url`.
    ///
    /// # Errors
    /// Returns [`FlipviewError::Load`] if PDF.js is missing or the document
    /// cannot be fetched or parsed.
    pub async fn load(url: &str) -> Result<Self> {
        let task = call_method(&pdfjs()?, "getDocument", &Array::of1(&JsValue::from_str(url)))
            .map_err(|e| load_error(&e))?;
        let promise = Reflect::get(&task, &JsValue::from_str("promise")).map_err(|e| load_error(&e))?;
        let pdf = resolve(&promise).await.map_err(|e| load_error(&e))?;

        let page_count = Reflect::get(&pdf, &JsValue::from_str("numPages"))
            .ok()
            .and_then(|n| n.as_f64())
            .map_or(0, to_px);
        Ok(Self { pdf, page_count })
    }
}

impl PdfDocument for PdfJsDocument {
    type Raster = HtmlImageElement;

    fn page_count(&self) -> u32 {
        self.page_count
    }

    async fn render_page(
        &self,
        page: u32,
        scale: RenderScale,
    ) -> Result<RenderedPage<HtmlImageElement>> {
        let fail = move |e: JsValue| FlipviewError::Render {
            page,
            message: js_message(&e),
        };

        let pending =
            call_method(&self.pdf, "getPage", &Array::of1(&JsValue::from(page))).map_err(fail)?;
        let pdf_page = resolve(&pending).await.map_err(fail)?;

        let params = Object::new();
        set(&params, "scale", &JsValue::from_f64(scale.scale)).map_err(fail)?;
        let viewport = call_method(&pdf_page, "getViewport", &Array::of1(&params)).map_err(fail)?;
        let dimension = |key: &str| {
            Reflect::get(&viewport, &JsValue::from_str(key))
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0)
        };
        let geometry = scale.geometry(dimension("width"), dimension("height"));

        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| fail(JsValue::from_str("no document")))?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(fail)?
            .dyn_into()
            .map_err(|e: web_sys::Element| fail(e.into()))?;
        canvas.set_width(geometry.pixel_width);
        canvas.set_height(geometry.pixel_height);
        let style = canvas.style();
        style
            .set_property("width", &format!("{}px", geometry.css_width))
            .map_err(fail)?;
        style
            .set_property("height", &format!("{}px", geometry.css_height))
            .map_err(fail)?;

        let context = canvas
            .get_context("2d")
            .map_err(fail)?
            .ok_or_else(|| fail(JsValue::from_str("2d canvas context unavailable")))?;
        let transform = match scale.transform() {
            Some(matrix) => matrix
                .iter()
                .map(|v| JsValue::from_f64(*v))
                .collect::<Array>()
                .into(),
            None => JsValue::NULL,
        };
        let render_context = Object::new();
        set(&render_context, "canvasContext", &context).map_err(fail)?;
        set(&render_context, "transform", &transform).map_err(fail)?;
        set(&render_context, "viewport", &viewport).map_err(fail)?;

        let task = call_method(&pdf_page, "render", &Array::of1(&render_context)).map_err(fail)?;
        let rendered = Reflect::get(&task, &JsValue::from_str("promise")).map_err(fail)?;
        resolve(&rendered).await.map_err(fail)?;

        let data_url = canvas.to_data_url().map_err(fail)?;
        let image = HtmlImageElement::new().map_err(fail)?;
        let loaded = Promise::new(&mut |on_load, on_error| {
            image.set_onload(Some(&on_load));
            image.set_onerror(Some(&on_error));
        });
        image.set_src(&data_url);
        let decoded = JsFuture::from(loaded).await;
        image.set_onload(None);
        image.set_onerror(None);
        decoded.map_err(fail)?;

        Ok(RenderedPage {
            number: page,
            width: image.width(),
            height: image.height(),
            raster: image,
        })
    }
}
