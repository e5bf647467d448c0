//! PDF rasterisation: render capped pages to `DynamicImage` via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. `tokio::task::spawn_blocking` moves the work onto a dedicated
//! blocking-pool thread so the async workers never stall mid-render.
//!
//! ## Why load from bytes, not a staged file?
//!
//! The document arrives as a byte buffer and pdfium can open it in memory
//! (`load_pdf_from_byte_slice`), so nothing touches the filesystem during
//! rasterisation and there is nothing to clean up afterwards.
//!
//! The page cap is enforced here, before any recognition call exists to
//! be paced or paid for. Retained pages keep the original document's
//! 1-based numbering.

use crate::error::HinglishError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use tracing::{debug, info, warn};

/// One rasterised page, in original document order.
pub struct RenderedPage {
    /// 1-based page number from the source document.
    pub number: usize,
    /// The page bitmap, held in memory.
    pub image: DynamicImage,
}

/// Result of rasterising a PDF byte buffer.
pub struct RasterOutput {
    /// Retained pages in ascending page-number order.
    pub pages: Vec<RenderedPage>,
    /// Pages in the source document before the cap was applied.
    pub total_pages: usize,
    /// True when `total_pages` exceeded the cap and the excess was skipped.
    pub truncated: bool,
}

/// Rasterise the first `page_cap` pages of a PDF into images.
///
/// Renders at `dpi/72` scale per axis. Any open or per-page render failure
/// fails the whole rasterisation; partial page sets are never returned.
pub async fn rasterize(
    pdf_bytes: Vec<u8>,
    dpi: u32,
    page_cap: usize,
) -> Result<RasterOutput, HinglishError> {
    tokio::task::spawn_blocking(move || rasterize_blocking(&pdf_bytes, dpi, page_cap))
        .await
        .map_err(|e| HinglishError::Internal(format!("Render task panicked: {}", e)))?
}

/// Blocking implementation of page rasterisation.
fn rasterize_blocking(
    pdf_bytes: &[u8],
    dpi: u32,
    page_cap: usize,
) -> Result<RasterOutput, HinglishError> {
    let pdfium = Pdfium::default();

    let document = pdfium
        .load_pdf_from_byte_slice(pdf_bytes, None)
        .map_err(|e| HinglishError::DocumentOpen {
            detail: format!("{:?}", e),
        })?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    let (retained, truncated) = retention(total_pages, page_cap);
    if truncated {
        warn!(
            "PDF has {} pages; only the first {} will be processed due to the page cap",
            total_pages, page_cap
        );
    }

    let scale = dpi as f32 / 72.0;
    let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);

    let mut results = Vec::with_capacity(retained);

    for idx in 0..retained {
        let page = pages
            .get(idx as u16)
            .map_err(|e| HinglishError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            })?;

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            HinglishError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            }
        })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            idx + 1,
            image.width(),
            image.height()
        );

        results.push(RenderedPage {
            number: idx + 1,
            image,
        });
    }

    Ok(RasterOutput {
        pages: results,
        total_pages,
        truncated,
    })
}

/// Pages to retain under the cap, and whether the excess was cut.
fn retention(total_pages: usize, page_cap: usize) -> (usize, bool) {
    (total_pages.min(page_cap), total_pages > page_cap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retention_keeps_small_documents_whole() {
        assert_eq!(retention(3, 10), (3, false));
        assert_eq!(retention(10, 10), (10, false));
    }

    #[test]
    fn retention_caps_oversized_documents() {
        assert_eq!(retention(11, 10), (10, true));
        assert_eq!(retention(25, 10), (10, true));
    }

    #[test]
    fn retention_of_empty_document() {
        assert_eq!(retention(0, 10), (0, false));
    }
}
