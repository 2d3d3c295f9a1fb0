//! The environment a flipbook page runs in.
//!
//! [`Platform`] is everything the orchestrator needs from the host page:
//! finding containers, loading documents, building flip widgets, observing
//! resizes, wiring input and scheduling tasks. The browser implementation
//! lives in `web`; tests drive the orchestrator through an in-memory one.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use crate::config::ViewerConfig;
use crate::document::{BookAdapter, PdfDocument};
use crate::error::Result;
use crate::viewer::{FlipWidget, SessionInput, WidgetOptions};

/// A unit of work scheduled on the page's event loop.
pub type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

/// Host page services.
#[allow(async_fn_in_trait)]
pub trait Platform: 'static {
    /// A viewer container element.
    type Container: Clone + 'static;
    type Document: PdfDocument + 'static;
    type Widget: FlipWidget + 'static;
    /// Keeps a resize subscription alive; dropping it unsubscribes.
    type ResizeGuard: 'static;
    /// Keeps input listeners attached; dropping it detaches them.
    type InputGuard: 'static;

    /// Every viewer container currently on the page, in document order.
    fn discover_containers(&self) -> Vec<Self::Container>;

    /// The container's id, if it has one.
    fn container_id(&self, container: &Self::Container) -> Option<String>;

    /// The raw JSON configuration attached to the container.
    fn container_config(&self, container: &Self::Container) -> Option<String>;

    /// The container's current layout width in CSS pixels.
    fn container_width(&self, container: &Self::Container) -> f64;

    /// Replace the container's contents with a short error message.
    fn show_error(&self, container: &Self::Container, message: &str);

    /// Remove whatever the widget mounted in the container.
    fn clear(&self, container: &Self::Container);

    fn device_pixel_ratio(&self) -> f64;

    fn prefers_reduced_motion(&self) -> bool;

    /// Load the document a configuration points at.
    ///
    /// # Errors
    /// Returns [`crate::FlipviewError::Load`] if the document cannot be fetched or parsed.
    async fn load_document(&self, config: &ViewerConfig) -> Result<Self::Document>;

    /// Build the flip widget inside a container.
    ///
    /// # Errors
    /// Returns [`crate::FlipviewError::Init`] if the widget cannot be constructed.
    async fn create_widget(
        &self,
        book: BookAdapter<Self::Document>,
        container: &Self::Container,
        options: &WidgetOptions,
    ) -> Result<Self::Widget>;

    /// Subscribe to content-width changes of a container.
    ///
    /// Returns `None` when the environment cannot observe resizes.
    fn observe_resize(
        &self,
        container: &Self::Container,
        on_resize: Box<dyn FnMut(f64)>,
    ) -> Option<Self::ResizeGuard>;

    /// Make the container focusable and route its focus, click and key events
    /// to `input`. Clicking the container must request focus for it.
    fn bind_input(&self, container: &Self::Container, input: Rc<SessionInput>)
        -> Self::InputGuard;

    /// Run a task on the page's event loop.
    fn spawn(&self, task: LocalTask);
}
