//! Container-width driven layout switching.

use super::ViewerSession;
use crate::config::ViewerConfig;
use crate::layout::{resolve_layout, EffectiveLayout, LayoutMode};

/// Recomputes a session's layout when its container is resized.
///
/// Only exists for `auto` layouts. The new layout is recorded on the session;
/// the widget keeps rendering with the layout it was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponsiveController {
    breakpoint: u32,
}

impl ResponsiveController {
    /// Controller for a configuration, `None` unless its layout is `auto`.
    #[must_use]
    pub fn for_config(config: &ViewerConfig) -> Option<Self> {
        (config.layout == LayoutMode::Auto).then_some(Self {
            breakpoint: config.breakpoint,
        })
    }

    #[must_use]
    pub fn breakpoint(&self) -> u32 {
        self.breakpoint
    }

    /// Handle a resize notification carrying the container's content width.
    ///
    /// Returns the new layout if it changed.
    pub fn on_resize(
        &self,
        session: &mut ViewerSession,
        container_width: f64,
    ) -> Option<EffectiveLayout> {
        let next = resolve_layout(LayoutMode::Auto, container_width, self.breakpoint);
        if !session.set_layout(next) {
            return None;
        }
        log::info!("Layout of {} changed to: {next}", session.id());
        // TODO: rebuild the widget with the new layout once re-rendering is supported
        Some(next)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn session(layout: LayoutMode, width: f64) -> ViewerSession {
        let config = ViewerConfig {
            layout,
            ..ViewerConfig::for_document("https://example.com/a.pdf")
        };
        ViewerSession::new("viewer", Rc::new(config), width, false)
    }

    #[test]
    fn test_only_auto_layouts_are_responsive() {
        let auto = ViewerConfig::for_document("a.pdf");
        assert!(ResponsiveController::for_config(&auto).is_some());
        let fixed = ViewerConfig {
            layout: LayoutMode::Double,
            ..auto
        };
        assert!(ResponsiveController::for_config(&fixed).is_none());
    }

    #[test]
    fn test_controller_uses_configured_breakpoint() {
        let config = ViewerConfig {
            breakpoint: 1000,
            ..ViewerConfig::for_document("a.pdf")
        };
        let controller = ResponsiveController::for_config(&config).unwrap();
        assert_eq!(controller.breakpoint(), 1000);

        let mut session = ViewerSession::new("viewer", Rc::new(config), 1200.0, false);
        assert_eq!(
            controller.on_resize(&mut session, 999.0),
            Some(EffectiveLayout::Single)
        );
    }

    #[test]
    fn test_crossing_the_breakpoint_switches_layout() {
        let mut session = session(LayoutMode::Auto, 1024.0);
        let controller = ResponsiveController::for_config(session.config()).unwrap();
        assert_eq!(session.layout(), EffectiveLayout::Double);

        assert_eq!(
            controller.on_resize(&mut session, 500.0),
            Some(EffectiveLayout::Single)
        );
        assert_eq!(session.layout(), EffectiveLayout::Single);

        // staying on the same side is not a change
        assert_eq!(controller.on_resize(&mut session, 600.0), None);
        assert_eq!(
            controller.on_resize(&mut session, 768.0),
            Some(EffectiveLayout::Double)
        );
    }
}
