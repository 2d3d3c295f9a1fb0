//! Display slot to document page mapping.
//!
//! The flip widget asks for pages by *slot*: its position in the on-screen
//! spread sequence. In a traditional book the cover sits alone on the first
//! spread, so slots and page numbers diverge by one empty placeholder.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// How document pages are paired into spreads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookLayout {
    /// Cover (page 1) alone, then pages pair into spreads.
    #[default]
    Traditional,
    /// No cover special-casing; slot `k` is page `k + 1`.
    Spread,
}

impl FromStr for BookLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "traditional" => Ok(Self::Traditional),
            "spread" => Ok(Self::Spread),
            other => Err(format!("unknown book layout '{other}'")),
        }
    }
}

impl fmt::Display for BookLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Traditional => "traditional",
            Self::Spread => "spread",
        })
    }
}

/// What occupies a display slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SlotContent {
    /// A 1-based document page number.
    Page {
        #[serde(rename = "pageNumber")]
        number: u32,
    },
    /// Nothing is drawn in this slot.
    Empty,
}

impl SlotContent {
    /// The page number, if the slot holds a page.
    #[must_use]
    pub fn page(self) -> Option<u32> {
        match self {
            Self::Page { number } => Some(number),
            Self::Empty => None,
        }
    }
}

/// Map a display slot to the document page it shows.
///
/// Pure: depends only on its arguments. Any page beyond `page_count` maps to
/// [`SlotContent::Empty`].
#[must_use]
pub fn map_slot(slot: u32, layout: BookLayout, page_count: u32) -> SlotContent {
    let page = match layout {
        BookLayout::Traditional => match slot {
            0 => Some(1),
            1 => None,
            k => Some(k),
        },
        BookLayout::Spread => slot.checked_add(1),
    };

    match page {
        Some(number) if number <= page_count => SlotContent::Page { number },
        _ => SlotContent::Empty,
    }
}

/// Number of display slots needed to show every page of a document.
///
/// Traditional layout needs one extra slot for the empty placeholder beside
/// the cover.
#[must_use]
pub fn slot_count(layout: BookLayout, page_count: u32) -> u32 {
    match layout {
        BookLayout::Traditional if page_count > 0 => page_count.saturating_add(1),
        _ => page_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: u32) -> SlotContent {
        SlotContent::Page { number }
    }

    #[test]
    fn test_traditional_cover_stands_alone() {
        assert_eq!(map_slot(0, BookLayout::Traditional, 5), page(1));
        assert_eq!(map_slot(1, BookLayout::Traditional, 5), SlotContent::Empty);
        assert_eq!(map_slot(2, BookLayout::Traditional, 5), page(2));
    }

    #[test]
    fn test_traditional_five_page_document() {
        let slots: Vec<Option<u32>> = (0..=5)
            .map(|slot| map_slot(slot, BookLayout::Traditional, 5).page())
            .collect();
        assert_eq!(
            slots,
            vec![Some(1), None, Some(2), Some(3), Some(4), Some(5)]
        );
        assert_eq!(map_slot(6, BookLayout::Traditional, 5), SlotContent::Empty);
    }

    #[test]
    fn test_spread_is_shifted_identity() {
        assert_eq!(map_slot(0, BookLayout::Spread, 3), page(1));
        assert_eq!(map_slot(2, BookLayout::Spread, 3), page(3));
        assert_eq!(map_slot(3, BookLayout::Spread, 3), SlotContent::Empty);
    }

    #[test]
    fn test_empty_document_has_no_pages() {
        assert_eq!(map_slot(0, BookLayout::Traditional, 0), SlotContent::Empty);
        assert_eq!(map_slot(0, BookLayout::Spread, 0), SlotContent::Empty);
        assert_eq!(slot_count(BookLayout::Traditional, 0), 0);
    }

    #[test]
    fn test_last_slot_does_not_overflow() {
        assert_eq!(
            map_slot(u32::MAX, BookLayout::Spread, u32::MAX),
            SlotContent::Empty
        );
    }

    #[test]
    fn test_slot_count() {
        assert_eq!(slot_count(BookLayout::Traditional, 5), 6);
        assert_eq!(slot_count(BookLayout::Spread, 5), 5);
    }

    #[test]
    fn test_book_layout_parse() {
        assert_eq!("spread".parse::<BookLayout>(), Ok(BookLayout::Spread));
        assert!("magazine".parse::<BookLayout>().is_err());
        assert_eq!(BookLayout::Traditional.to_string(), "traditional");
    }
}
