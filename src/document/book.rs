//! Page provider handed to the flip widget.

use std::rc::Rc;

use super::{DocumentHandle, PdfDocument, RenderedPage};
use crate::error::Result;
use crate::layout::{map_slot, BookLayout, SlotContent};

/// Serves pages to the flip widget by display slot.
pub struct BookAdapter<D: PdfDocument> {
    document: Rc<DocumentHandle<D>>,
    layout: BookLayout,
}

impl<D: PdfDocument> Clone for BookAdapter<D> {
    fn clone(&self) -> Self {
        Self {
            document: Rc::clone(&self.document),
            layout: self.layout,
        }
    }
}

impl<D: PdfDocument> BookAdapter<D> {
    pub fn new(document: Rc<DocumentHandle<D>>, layout: BookLayout) -> Self {
        Self { document, layout }
    }

    /// Page count reported to the widget: the document's page count.
    pub fn num_pages(&self) -> u32 {
        self.document.page_count()
    }

    pub fn layout(&self) -> BookLayout {
        self.layout
    }

    pub fn document(&self) -> &Rc<DocumentHandle<D>> {
        &self.document
    }

    /// What the given display slot shows.
    pub fn slot(&self, display: u32) -> SlotContent {
        map_slot(display, self.layout, self.num_pages())
    }

    /// Fetch the page shown in a display slot, `None` for empty slots.
    ///
    /// # Errors
    /// Propagates the page's render error.
    pub async fn get_page(&self, display: u32) -> Result<Option<Rc<RenderedPage<D::Raster>>>> {
        match self.slot(display) {
            SlotContent::Page { number } => self.document.get_page(number).await,
            SlotContent::Empty => Ok(None),
        }
    }
}
