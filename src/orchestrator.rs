//! Page initialization.
//!
//! The [`Orchestrator`] discovers every flipbook container on the page and
//! initializes each one as an independent task:
//!
//! load document → slot mapping → layout and dimensions → widget → register
//!
//! A failure at any step replaces that container's content with an error
//! message and abandons only that container. Every task owns an
//! [`InitHandle`]; tearing a container down cancels it, so continuations that
//! resume afterwards stop at their next checkpoint.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::config::ViewerConfig;
use crate::document::{BookAdapter, DocumentHandle};
use crate::error::{FlipviewError, Result};
use crate::platform::Platform;
use crate::viewer::{
    FlipWidget, FocusCoordinator, ResponsiveController, SessionId, SessionInput, ViewerSession,
};

/// Cancellation token for one container's in-flight initialization.
#[derive(Debug, Clone, Default)]
pub struct InitHandle {
    cancelled: Rc<Cell<bool>>,
}

impl InitHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// Checkpoint between initialization steps.
    ///
    /// # Errors
    /// Returns [`FlipviewError::Cancelled`] once the handle has been cancelled.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(FlipviewError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cancelled, &other.cancelled)
    }
}

/// A fully initialized viewer and everything that keeps it wired to the page.
pub struct ActiveViewer<P: Platform> {
    container: P::Container,
    session: Rc<RefCell<ViewerSession>>,
    widget: Rc<P::Widget>,
    book: BookAdapter<P::Document>,
    input: Rc<SessionInput>,
    resize: Option<P::ResizeGuard>,
    _listeners: P::InputGuard,
}

impl<P: Platform> ActiveViewer<P> {
    pub fn session(&self) -> &Rc<RefCell<ViewerSession>> {
        &self.session
    }

    pub fn widget(&self) -> &Rc<P::Widget> {
        &self.widget
    }

    pub fn book(&self) -> &BookAdapter<P::Document> {
        &self.book
    }

    pub fn input(&self) -> &Rc<SessionInput> {
        &self.input
    }

    /// Whether a resize observer is attached.
    pub fn is_responsive(&self) -> bool {
        self.resize.is_some()
    }
}

/// Active and pending viewers, keyed by container id.
pub struct ViewerRegistry<P: Platform> {
    active: Rc<RefCell<BTreeMap<SessionId, ActiveViewer<P>>>>,
    pending: Rc<RefCell<HashMap<SessionId, InitHandle>>>,
}

impl<P: Platform> Clone for ViewerRegistry<P> {
    fn clone(&self) -> Self {
        Self {
            active: Rc::clone(&self.active),
            pending: Rc::clone(&self.pending),
        }
    }
}

impl<P: Platform> Default for ViewerRegistry<P> {
    fn default() -> Self {
        Self {
            active: Rc::new(RefCell::new(BTreeMap::new())),
            pending: Rc::new(RefCell::new(HashMap::new())),
        }
    }
}

impl<P: Platform> ViewerRegistry<P> {
    /// Ids of the active viewers, sorted.
    pub fn ids(&self) -> Vec<SessionId> {
        self.active.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.active.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.borrow().is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.active.borrow().contains_key(id)
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.borrow().contains_key(id)
    }

    pub fn session(&self, id: &str) -> Option<Rc<RefCell<ViewerSession>>> {
        self.active.borrow().get(id).map(|v| Rc::clone(&v.session))
    }

    pub fn widget(&self, id: &str) -> Option<Rc<P::Widget>> {
        self.active.borrow().get(id).map(|v| Rc::clone(&v.widget))
    }

    pub fn input(&self, id: &str) -> Option<Rc<SessionInput>> {
        self.active.borrow().get(id).map(|v| Rc::clone(&v.input))
    }

    pub fn book(&self, id: &str) -> Option<BookAdapter<P::Document>> {
        self.active.borrow().get(id).map(|v| v.book.clone())
    }

    pub fn is_responsive(&self, id: &str) -> bool {
        self.active
            .borrow()
            .get(id)
            .is_some_and(ActiveViewer::is_responsive)
    }

    fn begin(&self, id: &str, handle: InitHandle) {
        self.pending.borrow_mut().insert(id.to_string(), handle);
    }

    fn finish(&self, id: &str, handle: &InitHandle) {
        let mut pending = self.pending.borrow_mut();
        if pending.get(id).is_some_and(|current| current.same(handle)) {
            pending.remove(id);
        }
    }

    fn insert(&self, id: SessionId, viewer: ActiveViewer<P>) {
        let replaced = self.active.borrow_mut().insert(id, viewer);
        drop(replaced);
    }

    /// Cancel a pending initialization. Returns whether one was in flight.
    fn cancel(&self, id: &str) -> bool {
        let cancelled = self.pending.borrow_mut().remove(id);
        if let Some(handle) = &cancelled {
            handle.cancel();
        }
        cancelled.is_some()
    }

    /// Take an active viewer out of the registry.
    fn remove(&self, id: &str) -> Option<ActiveViewer<P>> {
        self.active.borrow_mut().remove(id)
    }
}

/// Discovers and initializes every flipbook on a page.
pub struct Orchestrator<P: Platform> {
    platform: Rc<P>,
    registry: ViewerRegistry<P>,
    focus: FocusCoordinator,
}

impl<P: Platform> Orchestrator<P> {
    pub fn new(platform: P) -> Self {
        Self {
            platform: Rc::new(platform),
            registry: ViewerRegistry::default(),
            focus: FocusCoordinator::new(),
        }
    }

    pub fn platform(&self) -> &Rc<P> {
        &self.platform
    }

    pub fn registry(&self) -> &ViewerRegistry<P> {
        &self.registry
    }

    pub fn focus(&self) -> &FocusCoordinator {
        &self.focus
    }

    /// Schedule initialization for every container on the page.
    ///
    /// Containers that are already active or still initializing are skipped,
    /// so calling this again only picks up new containers. Returns how many
    /// initializations were scheduled.
    pub fn init_all(&self) -> usize {
        let mut scheduled = 0;
        for (index, container) in self.platform.discover_containers().into_iter().enumerate() {
            let id = self
                .platform
                .container_id(&container)
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| format!("flipbook-{}", index + 1));

            if self.registry.contains(&id) || self.registry.is_pending(&id) {
                log::debug!("Flipbook {id} already initialized, skipping");
                continue;
            }

            let handle = InitHandle::new();
            self.registry.begin(&id, handle.clone());
            self.platform.spawn(Box::pin(init_viewer(
                Rc::clone(&self.platform),
                self.registry.clone(),
                self.focus.clone(),
                container,
                id,
                handle,
            )));
            scheduled += 1;
        }
        scheduled
    }

    /// Tear down a viewer: cancel its pending initialization or detach it
    /// from the page. Returns whether anything was torn down.
    ///
    /// An active viewer's container is emptied before its widget and page
    /// provider are dropped, so the widget cannot call back into them.
    pub fn teardown(&self, id: &str) -> bool {
        self.focus.focus_out(id);
        let cancelled = self.registry.cancel(id);
        let detached = match self.registry.remove(id) {
            Some(viewer) => {
                self.platform.clear(&viewer.container);
                drop(viewer);
                true
            }
            None => false,
        };

        let removed = cancelled || detached;
        if removed {
            log::info!("Flipbook torn down: {id}");
        }
        removed
    }
}

async fn init_viewer<P: Platform>(
    platform: Rc<P>,
    registry: ViewerRegistry<P>,
    focus: FocusCoordinator,
    container: P::Container,
    id: SessionId,
    handle: InitHandle,
) {
    match build_viewer(platform.as_ref(), &focus, &container, &id, &handle).await {
        Ok(viewer) => {
            registry.insert(id.clone(), viewer);
            log::info!("Flipbook initialized: {id}");
        }
        Err(err) if handle.is_cancelled() || !err.is_user_visible() => {
            log::debug!("Flipbook {id} abandoned: {err}");
        }
        Err(err) => {
            log::error!("Flipbook {id} failed: {err}");
            platform.show_error(&container, &err.to_string());
        }
    }
    registry.finish(&id, &handle);
}

async fn build_viewer<P: Platform>(
    platform: &P,
    focus: &FocusCoordinator,
    container: &P::Container,
    id: &str,
    handle: &InitHandle,
) -> Result<ActiveViewer<P>> {
    handle.check()?;
    let raw = platform.container_config(container).ok_or_else(|| {
        FlipviewError::Config("container has no data-config attribute".to_string())
    })?;
    let config = Rc::new(ViewerConfig::from_json(&raw)?);

    let document = platform.load_document(&config).await?;
    handle.check()?;

    let document = DocumentHandle::new(document, platform.device_pixel_ratio());
    let book = BookAdapter::new(Rc::new(document), config.book_layout);
    let session = ViewerSession::new(
        id,
        Rc::clone(&config),
        platform.container_width(container),
        platform.prefers_reduced_motion(),
    );

    let widget = platform
        .create_widget(book.clone(), container, &session.widget_options())
        .await?;
    if let Err(err) = handle.check() {
        // Unmount before the page provider goes away with the widget.
        platform.clear(container);
        return Err(err);
    }
    let widget = Rc::new(widget);

    let session = Rc::new(RefCell::new(session));
    let resize = ResponsiveController::for_config(&config).and_then(|controller| {
        let session = Rc::clone(&session);
        let guard = platform.observe_resize(
            container,
            Box::new(move |width| {
                controller.on_resize(&mut session.borrow_mut(), width);
            }),
        );
        if guard.is_none() {
            log::warn!("ResizeObserver not supported, responsive behavior disabled");
        }
        guard
    });

    let navigator: Rc<dyn FlipWidget> = Rc::clone(&widget) as Rc<dyn FlipWidget>;
    let input = Rc::new(SessionInput::new(id, focus.clone(), navigator));
    let listeners = platform.bind_input(container, Rc::clone(&input));

    Ok(ActiveViewer {
        container: container.clone(),
        session,
        widget,
        book,
        input,
        resize,
        _listeners: listeners,
    })
}
