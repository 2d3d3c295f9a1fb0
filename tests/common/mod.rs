//! Common test utilities: an in-memory page for driving the orchestrator.
//!
//! `FakePlatform` stands in for the browser. Containers record the error
//! message shown in them and the input/resize hooks bound to them, documents
//! are page counts keyed by URL, and spawned tasks queue up until
//! `run_pending` drives them.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll, Wake, Waker};

use flipview::document::{BookAdapter, PdfDocument, RenderScale, RenderedPage};
use flipview::platform::{LocalTask, Platform};
use flipview::viewer::{FlipWidget, KeyOutcome, NavCapabilities, SessionInput, WidgetOptions};
use flipview::{FlipviewError, Orchestrator, Result, ViewerConfig};

/// Width of a US Letter page in PDF points.
pub const PAGE_WIDTH_PT: f64 = 612.0;
pub const PAGE_HEIGHT_PT: f64 = 792.0;

/// A document whose pages render to `"page-N"` strings.
pub struct FakeDocument {
    pub pages: u32,
    pub renders: Rc<Cell<u32>>,
    pub failing: HashSet<u32>,
}

impl FakeDocument {
    pub fn new(pages: u32) -> Self {
        Self {
            pages,
            renders: Rc::new(Cell::new(0)),
            failing: HashSet::new(),
        }
    }

    pub fn failing_on(mut self, page: u32) -> Self {
        self.failing.insert(page);
        self
    }
}

impl PdfDocument for FakeDocument {
    type Raster = String;

    fn page_count(&self) -> u32 {
        self.pages
    }

    async fn render_page(&self, page: u32, scale: RenderScale) -> Result<RenderedPage<String>> {
        self.renders.set(self.renders.get() + 1);
        if self.failing.contains(&page) {
            return Err(FlipviewError::Render {
                page,
                message: "corrupt page stream".to_string(),
            });
        }
        let geometry = scale.geometry(
            PAGE_WIDTH_PT * scale.scale,
            PAGE_HEIGHT_PT * scale.scale,
        );
        Ok(RenderedPage {
            number: page,
            width: geometry.pixel_width,
            height: geometry.pixel_height,
            raster: format!("page-{page}"),
        })
    }
}

/// A widget that counts navigation calls.
pub struct FakeWidget {
    pub capabilities: NavCapabilities,
    pub options: WidgetOptions,
    pub book: BookAdapter<FakeDocument>,
    pub forward: Cell<u32>,
    pub back: Cell<u32>,
}

impl FlipWidget for FakeWidget {
    fn capabilities(&self) -> NavCapabilities {
        self.capabilities
    }

    fn flip_forward(&self) {
        self.forward.set(self.forward.get() + 1);
    }

    fn flip_back(&self) {
        self.back.set(self.back.get() + 1);
    }
}

/// A flipbook container element.
#[derive(Default)]
pub struct FakeContainer {
    pub id: Option<String>,
    pub config: Option<String>,
    pub width: Cell<f64>,
    pub error: RefCell<Option<String>>,
    pub focusable: Cell<bool>,
    /// Widgets currently mounted inside the container.
    pub mounted: Cell<u32>,
    /// How many times the container was emptied.
    pub cleared: Cell<u32>,
    input: RefCell<Option<Rc<SessionInput>>>,
    resize: RefCell<Option<Box<dyn FnMut(f64)>>>,
}

impl FakeContainer {
    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn has_input(&self) -> bool {
        self.input.borrow().is_some()
    }

    pub fn is_observed(&self) -> bool {
        self.resize.borrow().is_some()
    }

    pub fn focus(&self) {
        if let Some(input) = self.input.borrow().as_ref() {
            input.focus_in();
        }
    }

    pub fn blur(&self) {
        if let Some(input) = self.input.borrow().as_ref() {
            input.focus_out();
        }
    }

    /// Clicking a focusable container focuses it.
    pub fn click(&self) {
        if self.focusable.get() {
            self.focus();
        }
    }

    pub fn key(&self, key: &str) -> KeyOutcome {
        match self.input.borrow().as_ref() {
            Some(input) => input.key_down(key),
            None => KeyOutcome::Ignored,
        }
    }

    /// Change the container's width and notify the resize observer.
    pub fn resize(&self, width: f64) {
        self.width.set(width);
        if let Some(on_resize) = self.resize.borrow_mut().as_mut() {
            on_resize(width);
        }
    }
}

/// Unhooks a container's resize observer when dropped.
pub struct ResizeHook(Rc<FakeContainer>);

impl Drop for ResizeHook {
    fn drop(&mut self) {
        self.0.resize.borrow_mut().take();
    }
}

/// Unhooks a container's input routing when dropped.
pub struct InputHook(Rc<FakeContainer>);

impl Drop for InputHook {
    fn drop(&mut self) {
        self.0.input.borrow_mut().take();
    }
}

/// An in-memory page.
pub struct FakePlatform {
    pub containers: Vec<Rc<FakeContainer>>,
    /// Page counts of the documents that load, by URL.
    pub documents: HashMap<String, u32>,
    /// Container ids whose widget construction fails.
    pub broken_widgets: HashSet<String>,
    pub reduced_motion: bool,
    pub resize_supported: bool,
    pub pixel_ratio: f64,
    pub loads: Cell<u32>,
    /// While set, widget construction mounts the widget but does not complete.
    pub hold_widgets: Cell<bool>,
    tasks: RefCell<Vec<LocalTask>>,
}

impl Default for FakePlatform {
    fn default() -> Self {
        Self {
            containers: Vec::new(),
            documents: HashMap::new(),
            broken_widgets: HashSet::new(),
            reduced_motion: false,
            resize_supported: true,
            pixel_ratio: 1.0,
            loads: Cell::new(0),
            hold_widgets: Cell::new(false),
            tasks: RefCell::new(Vec::new()),
        }
    }
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, url: &str, pages: u32) -> Self {
        self.documents.insert(url.to_string(), pages);
        self
    }

    pub fn with_container(mut self, id: &str, config: &str, width: f64) -> Self {
        self.containers.push(Rc::new(FakeContainer {
            id: Some(id.to_string()),
            config: Some(config.to_string()),
            width: Cell::new(width),
            ..FakeContainer::default()
        }));
        self
    }

    pub fn with_anonymous_container(mut self, config: &str, width: f64) -> Self {
        self.containers.push(Rc::new(FakeContainer {
            config: Some(config.to_string()),
            width: Cell::new(width),
            ..FakeContainer::default()
        }));
        self
    }

    pub fn with_broken_widget(mut self, id: &str) -> Self {
        self.broken_widgets.insert(id.to_string());
        self
    }

    pub fn container(&self, id: &str) -> Rc<FakeContainer> {
        self.containers
            .iter()
            .find(|c| c.id.as_deref() == Some(id))
            .cloned()
            .unwrap()
    }

    /// Take the spawned tasks without running them.
    pub fn take_tasks(&self) -> Vec<LocalTask> {
        std::mem::take(&mut *self.tasks.borrow_mut())
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Drive every spawned task (and any they spawn) to completion.
    pub async fn run_pending(&self) {
        loop {
            let tasks = std::mem::take(&mut *self.tasks.borrow_mut());
            if tasks.is_empty() {
                break;
            }
            for task in tasks {
                task.await;
            }
        }
    }
}

impl Platform for FakePlatform {
    type Container = Rc<FakeContainer>;
    type Document = FakeDocument;
    type Widget = FakeWidget;
    type ResizeGuard = ResizeHook;
    type InputGuard = InputHook;

    fn discover_containers(&self) -> Vec<Rc<FakeContainer>> {
        self.containers.clone()
    }

    fn container_id(&self, container: &Rc<FakeContainer>) -> Option<String> {
        container.id.clone()
    }

    fn container_config(&self, container: &Rc<FakeContainer>) -> Option<String> {
        container.config.clone()
    }

    fn container_width(&self, container: &Rc<FakeContainer>) -> f64 {
        container.width.get()
    }

    fn show_error(&self, container: &Rc<FakeContainer>, message: &str) {
        self.clear(container);
        *container.error.borrow_mut() = Some(message.to_string());
    }

    fn clear(&self, container: &Rc<FakeContainer>) {
        container.mounted.set(0);
        container.cleared.set(container.cleared.get() + 1);
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    async fn load_document(&self, config: &ViewerConfig) -> Result<FakeDocument> {
        self.loads.set(self.loads.get() + 1);
        match self.documents.get(&config.pdf) {
            Some(&pages) => Ok(FakeDocument::new(pages)),
            None => Err(FlipviewError::Load(format!(
                "Missing PDF \"{}\"",
                config.pdf
            ))),
        }
    }

    async fn create_widget(
        &self,
        book: BookAdapter<FakeDocument>,
        container: &Rc<FakeContainer>,
        options: &WidgetOptions,
    ) -> Result<FakeWidget> {
        if let Some(id) = &container.id {
            if self.broken_widgets.contains(id) {
                return Err(FlipviewError::Init("flipbook library not loaded".to_string()));
            }
        }
        container.mounted.set(container.mounted.get() + 1);
        Held(&self.hold_widgets).await;
        Ok(FakeWidget {
            capabilities: NavCapabilities::all(),
            options: options.clone(),
            book,
            forward: Cell::new(0),
            back: Cell::new(0),
        })
    }

    fn observe_resize(
        &self,
        container: &Rc<FakeContainer>,
        on_resize: Box<dyn FnMut(f64)>,
    ) -> Option<ResizeHook> {
        if !self.resize_supported {
            return None;
        }
        *container.resize.borrow_mut() = Some(on_resize);
        Some(ResizeHook(Rc::clone(container)))
    }

    fn bind_input(&self, container: &Rc<FakeContainer>, input: Rc<SessionInput>) -> InputHook {
        container.focusable.set(true);
        *container.input.borrow_mut() = Some(input);
        InputHook(Rc::clone(container))
    }

    fn spawn(&self, task: LocalTask) {
        self.tasks.borrow_mut().push(task);
    }
}

/// Pending for as long as the flag is set.
struct Held<'a>(&'a Cell<bool>);

impl Future for Held<'_> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        if self.0.get() {
            Poll::Pending
        } else {
            Poll::Ready(())
        }
    }
}

struct NoopWake;

impl Wake for NoopWake {
    fn wake(self: Arc<Self>) {}
}

/// Poll a task once by hand.
pub fn poll_once(task: &mut LocalTask) -> Poll<()> {
    let waker = Waker::from(Arc::new(NoopWake));
    let mut cx = Context::from_waker(&waker);
    task.as_mut().poll(&mut cx)
}

/// JSON payload for a document URL with extra fields merged in.
pub fn config_json(pdf: &str, extra: &str) -> String {
    if extra.is_empty() {
        format!(r#"{{"pdf": "{pdf}"}}"#)
    } else {
        format!(r#"{{"pdf": "{pdf}", {extra}}}"#)
    }
}

/// Build an orchestrator, initialize every container and run all tasks.
pub async fn init_page(platform: FakePlatform) -> Orchestrator<FakePlatform> {
    let orchestrator = Orchestrator::new(platform);
    orchestrator.init_all();
    orchestrator.platform().run_pending().await;
    orchestrator
}
