//! Document adapter and page cache.
//!
//! [`PdfDocument`] is the seam to the external rendering library: it knows the
//! page count and can rasterize one page. [`DocumentHandle`] wraps a loaded
//! document with a [`PageCache`] so each page is rasterized once, and
//! [`BookAdapter`] puts the slot mapping in front of it for the flip widget.

mod book;
mod cache;

pub use book::BookAdapter;
pub use cache::PageCache;

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{FlipviewError, Result};
use crate::layout::to_px;

/// Base scale pages are rendered at, before the display's pixel density.
pub const RENDER_SCALE: f64 = 1.5;

/// Scale a page is rasterized at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderScale {
    /// Viewport scale passed to the renderer.
    pub scale: f64,
    /// Device pixels per CSS pixel.
    pub pixel_ratio: f64,
}

/// Pixel sizes of a rasterized page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterGeometry {
    /// Backing store size in device pixels.
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Displayed size in CSS pixels.
    pub css_width: u32,
    pub css_height: u32,
}

impl RenderScale {
    /// Render scale for a display with the given pixel density.
    ///
    /// Missing or nonsensical densities count as 1.
    #[must_use]
    pub fn for_display(pixel_ratio: f64) -> Self {
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        Self {
            scale: RENDER_SCALE,
            pixel_ratio,
        }
    }

    /// Device pixels per PDF point.
    #[must_use]
    pub fn effective(&self) -> f64 {
        self.scale * self.pixel_ratio
    }

    /// Raster sizes for a viewport of the given CSS size.
    #[must_use]
    pub fn geometry(&self, viewport_width: f64, viewport_height: f64) -> RasterGeometry {
        RasterGeometry {
            pixel_width: to_px(viewport_width * self.pixel_ratio),
            pixel_height: to_px(viewport_height * self.pixel_ratio),
            css_width: to_px(viewport_width),
            css_height: to_px(viewport_height),
        }
    }

    /// Canvas transform for high-density displays, `None` at 1:1.
    #[must_use]
    pub fn transform(&self) -> Option<[f64; 6]> {
        if (self.pixel_ratio - 1.0).abs() < f64::EPSILON {
            return None;
        }
        let r = self.pixel_ratio;
        Some([r, 0.0, 0.0, r, 0.0, 0.0])
    }
}

/// One rasterized page.
#[derive(Debug)]
pub struct RenderedPage<R> {
    /// 1-based page number.
    pub number: u32,
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    pub raster: R,
}

/// A loaded document from the external rendering library.
#[allow(async_fn_in_trait)]
pub trait PdfDocument {
    /// Image type produced by rasterizing a page.
    type Raster;

    fn page_count(&self) -> u32;

    /// Rasterize `page` (1-based, in range) at `scale`.
    async fn render_page(&self, page: u32, scale: RenderScale)
        -> Result<RenderedPage<Self::Raster>>;
}

/// A loaded document with a page cache in front of it.
pub struct DocumentHandle<D: PdfDocument> {
    document: D,
    cache: RefCell<PageCache<RenderedPage<D::Raster>>>,
    scale: RenderScale,
}

impl<D: PdfDocument> DocumentHandle<D> {
    /// Wrap a document with an unbounded page cache.
    pub fn new(document: D, pixel_ratio: f64) -> Self {
        Self::with_cache(document, pixel_ratio, PageCache::new())
    }

    /// Wrap a document with a cache of at most `limit` pages.
    pub fn with_cache_limit(document: D, pixel_ratio: f64, limit: usize) -> Self {
        Self::with_cache(document, pixel_ratio, PageCache::with_limit(limit))
    }

    fn with_cache(
        document: D,
        pixel_ratio: f64,
        cache: PageCache<RenderedPage<D::Raster>>,
    ) -> Self {
        Self {
            document,
            cache: RefCell::new(cache),
            scale: RenderScale::for_display(pixel_ratio),
        }
    }

    pub fn page_count(&self) -> u32 {
        self.document.page_count()
    }

    pub fn scale(&self) -> RenderScale {
        self.scale
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    /// Number of pages currently cached.
    pub fn cached_pages(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Fetch a rendered page, rasterizing it on first request.
    ///
    /// Returns `Ok(None)` for page numbers outside `1..=page_count()`.
    ///
    /// # Errors
    /// Returns [`FlipviewError::Render`] if rasterizing this page fails. The
    /// cache and the document are left untouched.
    pub async fn get_page(&self, page: u32) -> Result<Option<Rc<RenderedPage<D::Raster>>>> {
        if page == 0 || page > self.page_count() {
            return Ok(None);
        }

        if let Some(cached) = self.cache.borrow().get(page) {
            return Ok(Some(cached));
        }

        let rendered = self
            .document
            .render_page(page, self.scale)
            .await
            .map_err(|err| match err {
                FlipviewError::Render { .. } => err,
                other => FlipviewError::Render {
                    page,
                    message: other.to_string(),
                },
            })?;

        Ok(Some(
            self.cache
                .borrow_mut()
                .get_or_insert(page, Rc::new(rendered)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_scale_defaults() {
        let scale = RenderScale::for_display(0.0);
        assert!((scale.pixel_ratio - 1.0).abs() < f64::EPSILON);
        assert!((scale.effective() - 1.5).abs() < f64::EPSILON);
        assert_eq!(scale.transform(), None);
    }

    #[test]
    fn test_high_density_geometry() {
        let scale = RenderScale::for_display(2.0);
        assert!((scale.effective() - 3.0).abs() < f64::EPSILON);
        assert_eq!(scale.transform(), Some([2.0, 0.0, 0.0, 2.0, 0.0, 0.0]));

        let geometry = scale.geometry(918.4, 1188.6);
        assert_eq!(
            geometry,
            RasterGeometry {
                pixel_width: 1836,
                pixel_height: 2377,
                css_width: 918,
                css_height: 1188,
            }
        );
    }
}
