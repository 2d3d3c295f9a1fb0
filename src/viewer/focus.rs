//! Keyboard focus routing across viewers on one page.
//!
//! At most one viewer holds keyboard focus. The [`FocusCoordinator`] is shared
//! by every viewer the orchestrator builds; each viewer gets a [`SessionInput`]
//! that translates its container's focus and key events into navigation on
//! its own widget only.

use std::cell::RefCell;
use std::rc::Rc;

use super::widget::{FlipWidget, NavCapabilities};

/// Identifier of a viewer session (its container id).
pub type SessionId = String;

/// Tracks which viewer currently has keyboard focus.
#[derive(Debug, Clone, Default)]
pub struct FocusCoordinator {
    focused: Rc<RefCell<Option<SessionId>>>,
}

impl FocusCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The focused session, if any.
    #[must_use]
    pub fn focused(&self) -> Option<SessionId> {
        self.focused.borrow().clone()
    }

    #[must_use]
    pub fn is_focused(&self, id: &str) -> bool {
        self.focused.borrow().as_deref() == Some(id)
    }

    pub fn focus_in(&self, id: &str) {
        *self.focused.borrow_mut() = Some(id.to_string());
    }

    /// Clear focus, but only if `id` still holds it.
    pub fn focus_out(&self, id: &str) {
        let mut focused = self.focused.borrow_mut();
        if focused.as_deref() == Some(id) {
            *focused = None;
        }
    }
}

/// Navigation requested by a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Forward,
    Back,
    /// Reserved: jump to the first page. Not wired to the widget yet.
    First,
    /// Reserved: jump to the last page. Not wired to the widget yet.
    Last,
}

impl NavAction {
    /// Map a `KeyboardEvent.key` value to a navigation action.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowRight" | "PageDown" | " " => Some(Self::Forward),
            "ArrowLeft" | "PageUp" => Some(Self::Back),
            "Home" => Some(Self::First),
            "End" => Some(Self::Last),
            _ => None,
        }
    }
}

/// Result of routing one key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not for this viewer; leave the event alone.
    Ignored,
    /// Consumed; the browser's default action must be suppressed.
    Handled(NavAction),
}

impl KeyOutcome {
    #[must_use]
    pub fn prevents_default(self) -> bool {
        matches!(self, Self::Handled(_))
    }
}

/// Input routing for one viewer session.
pub struct SessionInput {
    id: SessionId,
    focus: FocusCoordinator,
    widget: Rc<dyn FlipWidget>,
    capabilities: NavCapabilities,
}

impl SessionInput {
    pub fn new(
        id: impl Into<SessionId>,
        focus: FocusCoordinator,
        widget: Rc<dyn FlipWidget>,
    ) -> Self {
        let capabilities = widget.capabilities();
        Self {
            id: id.into(),
            focus,
            widget,
            capabilities,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn capabilities(&self) -> NavCapabilities {
        self.capabilities
    }

    pub fn focus_in(&self) {
        self.focus.focus_in(&self.id);
    }

    pub fn focus_out(&self) {
        self.focus.focus_out(&self.id);
    }

    pub fn has_focus(&self) -> bool {
        self.focus.is_focused(&self.id)
    }

    /// Route a key press. Only the focused session reacts.
    pub fn key_down(&self, key: &str) -> KeyOutcome {
        if !self.has_focus() {
            return KeyOutcome::Ignored;
        }
        let Some(action) = NavAction::from_key(key) else {
            return KeyOutcome::Ignored;
        };

        match action {
            NavAction::Forward if self.capabilities.flip_forward => self.widget.flip_forward(),
            NavAction::Back if self.capabilities.flip_back => self.widget.flip_back(),
            NavAction::Forward | NavAction::Back => {}
            NavAction::First | NavAction::Last => {
                log::debug!("{action:?} navigation is reserved, ignoring for {}", self.id);
            }
        }
        KeyOutcome::Handled(action)
    }
}
