//! Layout policy for flipbooks.
//!
//! This module handles:
//! - Mapping display slots to document pages (traditional vs spread books)
//! - Resolving single vs double page layout from the container width
//! - Resolving the viewer's pixel dimensions

mod dimensions;
mod mode;
mod slots;

pub use dimensions::{resolve_dimensions, Dimensions, DEFAULT_AUTO_HEIGHT};
pub use mode::{resolve_layout, EffectiveLayout, LayoutMode};
pub use slots::{map_slot, slot_count, BookLayout, SlotContent};

/// Convert a measured CSS length to whole pixels, truncating like `Math.floor`.
///
/// Negative and non-finite inputs clamp to 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn to_px(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.floor().min(f64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::to_px;

    #[test]
    fn test_to_px_floors_and_clamps() {
        assert_eq!(to_px(12.9), 12);
        assert_eq!(to_px(-3.0), 0);
        assert_eq!(to_px(f64::NAN), 0);
        assert_eq!(to_px(1e20), u32::MAX);
    }
}
