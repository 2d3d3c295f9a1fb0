//! Layout mapping tests for flipview
//!
//! Display slot to page mapping, effective layout resolution and viewer
//! dimensions.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use flipview::layout::{
    map_slot, resolve_dimensions, resolve_layout, slot_count, BookLayout, Dimensions,
    EffectiveLayout, LayoutMode, SlotContent,
};
use flipview::{SizeSpec, ViewerConfig};
use test_case::test_case;

// ============================================================================
// Slot mapping
// ============================================================================

#[test_case(0, Some(1) ; "cover")]
#[test_case(1, None ; "placeholder beside cover")]
#[test_case(2, Some(2) ; "first inner page")]
#[test_case(9, Some(9) ; "inner page")]
#[test_case(10, Some(10) ; "last page")]
#[test_case(11, None ; "past the end")]
fn test_traditional_mapping(slot: u32, expected: Option<u32>) {
    assert_eq!(map_slot(slot, BookLayout::Traditional, 10).page(), expected);
}

#[test_case(0, Some(1) ; "first slot")]
#[test_case(1, Some(2) ; "second slot")]
#[test_case(9, Some(10) ; "last page")]
#[test_case(10, None ; "past the end")]
#[test_case(u32::MAX, None ; "overflow")]
fn test_spread_mapping(slot: u32, expected: Option<u32>) {
    assert_eq!(map_slot(slot, BookLayout::Spread, 10).page(), expected);
}

#[test]
fn test_single_page_document() {
    assert_eq!(
        map_slot(0, BookLayout::Traditional, 1),
        SlotContent::Page { number: 1 }
    );
    assert_eq!(map_slot(2, BookLayout::Traditional, 1), SlotContent::Empty);
    assert_eq!(map_slot(1, BookLayout::Spread, 1), SlotContent::Empty);
}

#[test]
fn test_every_page_reachable_exactly_once() {
    for layout in [BookLayout::Traditional, BookLayout::Spread] {
        for pages in [1, 2, 7, 40] {
            let mut shown: Vec<u32> = (0..slot_count(layout, pages))
                .filter_map(|slot| map_slot(slot, layout, pages).page())
                .collect();
            shown.sort_unstable();
            assert_eq!(shown, (1..=pages).collect::<Vec<_>>(), "{layout} / {pages}");
        }
    }
}

#[test]
fn test_slot_content_serialization() {
    let page = serde_json::to_value(SlotContent::Page { number: 4 }).unwrap();
    assert_eq!(page, serde_json::json!({"kind": "page", "pageNumber": 4}));
    let empty = serde_json::to_value(SlotContent::Empty).unwrap();
    assert_eq!(empty, serde_json::json!({"kind": "empty"}));
}

// ============================================================================
// Effective layout
// ============================================================================

#[test_case(LayoutMode::Auto, 767.0, EffectiveLayout::Single ; "auto below breakpoint")]
#[test_case(LayoutMode::Auto, 768.0, EffectiveLayout::Double ; "auto at breakpoint")]
#[test_case(LayoutMode::Auto, 1440.0, EffectiveLayout::Double ; "auto wide")]
#[test_case(LayoutMode::Auto, 0.0, EffectiveLayout::Single ; "auto unmeasured")]
#[test_case(LayoutMode::Single, 2000.0, EffectiveLayout::Single ; "forced single")]
#[test_case(LayoutMode::Double, 320.0, EffectiveLayout::Double ; "forced double")]
fn test_resolve_layout(mode: LayoutMode, width: f64, expected: EffectiveLayout) {
    assert_eq!(resolve_layout(mode, width, 768), expected);
}

#[test]
fn test_custom_breakpoint() {
    assert_eq!(resolve_layout(LayoutMode::Auto, 600.0, 600), EffectiveLayout::Double);
    assert_eq!(resolve_layout(LayoutMode::Auto, 599.9, 600), EffectiveLayout::Single);
}

// ============================================================================
// Dimensions
// ============================================================================

fn sized(width: SizeSpec, height: SizeSpec) -> ViewerConfig {
    ViewerConfig {
        width,
        height,
        ..ViewerConfig::for_document("https://example.com/a.pdf")
    }
}

#[test_case(SizeSpec::Fill, SizeSpec::Auto, 912.7, (912, 600) ; "defaults follow container")]
#[test_case(SizeSpec::Pixels(640), SizeSpec::Pixels(480), 912.0, (640, 480) ; "fixed pixels")]
#[test_case(SizeSpec::Auto, SizeSpec::Fill, 500.0, (500, 100) ; "fill height reads as pixels")]
#[test_case(SizeSpec::Fill, SizeSpec::Auto, -3.0, (0, 600) ; "negative width clamps")]
fn test_resolve_dimensions(width: SizeSpec, height: SizeSpec, container: f64, expected: (u32, u32)) {
    let dims = resolve_dimensions(&sized(width, height), container);
    assert_eq!(
        dims,
        Dimensions {
            width: expected.0,
            height: expected.1,
        }
    );
}

#[test]
fn test_dimensions_from_json_config() {
    let config =
        ViewerConfig::from_json(r#"{"pdf": "a.pdf", "width": "750px", "height": "auto"}"#).unwrap();
    assert_eq!(resolve_dimensions(&config, 1000.0).width, 750);
    assert_eq!(resolve_dimensions(&config, 1000.0).height, 600);
}

#[test]
fn test_percent_height_from_json_config() {
    let config = ViewerConfig::from_json(r#"{"pdf": "a.pdf", "height": "100%"}"#).unwrap();
    let dims = resolve_dimensions(&config, 900.0);
    assert_eq!(dims.width, 900);
    assert_eq!(dims.height, 100);
}
