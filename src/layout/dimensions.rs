//! Viewer pixel dimensions from the configured size specifiers.

use serde::Serialize;

use super::to_px;
use crate::config::{SizeSpec, ViewerConfig};

/// Provisional height used for `auto` until the widget knows the page aspect ratio.
pub const DEFAULT_AUTO_HEIGHT: u32 = 600;

/// Pixel height a `100%` height specifier resolves to.
const FILL_HEIGHT_PX: u32 = 100;

/// Resolved viewer size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Resolve the widget's pixel size for a container of the given measured width.
#[must_use]
pub fn resolve_dimensions(config: &ViewerConfig, container_width: f64) -> Dimensions {
    let width = match config.width {
        SizeSpec::Fill | SizeSpec::Auto => to_px(container_width),
        SizeSpec::Pixels(px) => px,
    };
    let height = match config.height {
        SizeSpec::Auto => DEFAULT_AUTO_HEIGHT,
        SizeSpec::Pixels(px) => px,
        // Only `auto` is special for heights; `100%` reads as its leading digits.
        SizeSpec::Fill => FILL_HEIGHT_PX,
    };
    Dimensions { width, height }
}
