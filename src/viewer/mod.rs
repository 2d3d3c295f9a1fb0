//! Per-container viewer state.
//!
//! A [`ViewerSession`] is created for every flipbook container once its
//! document has loaded. It records the layout currently in effect, the pixel
//! dimensions the widget was built with, and whether page turns animate.
//!
//! Input routing lives in [`focus`], width-driven layout switching in
//! [`responsive`], and the external widget contract in [`widget`].

mod focus;
mod responsive;
mod widget;

pub use focus::{FocusCoordinator, KeyOutcome, NavAction, SessionId, SessionInput};
pub use responsive::ResponsiveController;
pub use widget::{FlipWidget, NavCapabilities};

use std::rc::Rc;

use serde::Serialize;

use crate::config::ViewerConfig;
use crate::layout::{resolve_dimensions, resolve_layout, Dimensions, EffectiveLayout};

/// Whether page turns animate.
///
/// Either the configuration or the user's reduced-motion preference can turn
/// animation off.
#[must_use]
pub fn should_animate(enable_animations: bool, prefers_reduced_motion: bool) -> bool {
    enable_animations && !prefers_reduced_motion
}

/// Style and behavior options passed to the flip widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetOptions {
    pub background_color: String,
    pub box_color: String,
    pub box_border: u32,
    pub margin: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_left: Option<f64>,
    pub width: u32,
    pub height: u32,
    #[serde(rename = "singlepage")]
    pub single_page: bool,
    #[serde(rename = "traditionallayout")]
    pub traditional_layout: bool,
    pub should_animate: bool,
}

/// State of one flipbook on the page.
#[derive(Debug, Clone)]
pub struct ViewerSession {
    id: SessionId,
    config: Rc<ViewerConfig>,
    layout: EffectiveLayout,
    dimensions: Dimensions,
    should_animate: bool,
}

impl ViewerSession {
    /// Build a session for a container of the given measured width.
    pub fn new(
        id: impl Into<SessionId>,
        config: Rc<ViewerConfig>,
        container_width: f64,
        prefers_reduced_motion: bool,
    ) -> Self {
        let layout = resolve_layout(config.layout, container_width, config.breakpoint);
        let dimensions = resolve_dimensions(&config, container_width);
        let should_animate = should_animate(config.enable_animations, prefers_reduced_motion);
        Self {
            id: id.into(),
            config,
            layout,
            dimensions,
            should_animate,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn layout(&self) -> EffectiveLayout {
        self.layout
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn should_animate(&self) -> bool {
        self.should_animate
    }

    /// Record a new effective layout. Returns whether it changed.
    pub fn set_layout(&mut self, layout: EffectiveLayout) -> bool {
        if self.layout == layout {
            return false;
        }
        self.layout = layout;
        true
    }

    /// Options for constructing this session's flip widget.
    pub fn widget_options(&self) -> WidgetOptions {
        let config = &self.config;
        WidgetOptions {
            background_color: config.background_color.clone(),
            box_color: config.box_color.clone(),
            box_border: config.box_border,
            margin: config.margin,
            margin_top: config.margin_top,
            margin_left: config.margin_left,
            width: self.dimensions.width,
            height: self.dimensions.height,
            single_page: config.singlepage(),
            traditional_layout: config.traditional_layout(),
            should_animate: self.should_animate,
        }
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
    use crate::config::{SizeSpec, ViewMode};
    use crate::layout::{BookLayout, LayoutMode};

    fn config() -> ViewerConfig {
        ViewerConfig::for_document("https://example.com/a.pdf")
    }

    #[test]
    fn test_should_animate() {
        assert!(should_animate(true, false));
        assert!(!should_animate(false, false));
        assert!(!should_animate(true, true));
        assert!(!should_animate(false, true));
    }

    #[test]
    fn test_initial_layout_from_width() {
        let session = ViewerSession::new("a", Rc::new(config()), 800.0, false);
        assert_eq!(session.layout(), EffectiveLayout::Double);
        let session = ViewerSession::new("a", Rc::new(config()), 767.0, false);
        assert_eq!(session.layout(), EffectiveLayout::Single);
    }

    #[test]
    fn test_reduced_motion_disables_animation() {
        let session = ViewerSession::new("a", Rc::new(config()), 800.0, true);
        assert!(!session.should_animate());
        assert!(!session.widget_options().should_animate);
    }

    #[test]
    fn test_widget_options() {
        let config = ViewerConfig {
            width: SizeSpec::Pixels(900),
            height: SizeSpec::Pixels(700),
            box_border: 3,
            margin_left: Some(2.0),
            layout: LayoutMode::Single,
            book_layout: BookLayout::Spread,
            view_mode: ViewMode::SinglePage,
            ..config()
        };
        let session = ViewerSession::new("a", Rc::new(config), 1200.0, false);
        let options = session.widget_options();
        assert_eq!(options.width, 900);
        assert_eq!(options.height, 700);
        assert_eq!(options.box_border, 3);
        assert!(options.single_page);
        assert!(!options.traditional_layout);
        assert!(options.should_animate);

        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["singlepage"], true);
        assert_eq!(json["traditionallayout"], false);
        assert_eq!(json["shouldAnimate"], true);
        assert_eq!(json["backgroundColor"], "#353535");
        assert_eq!(json["marginLeft"], 2.0);
        assert!(json.get("marginTop").is_none());
    }

    #[test]
    fn test_set_layout_reports_changes() {
        let mut session = ViewerSession::new("a", Rc::new(config()), 800.0, false);
        assert!(!session.set_layout(EffectiveLayout::Double));
        assert!(session.set_layout(EffectiveLayout::Single));
        assert_eq!(session.layout(), EffectiveLayout::Single);
    }
}
