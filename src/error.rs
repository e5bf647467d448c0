//! Error types for the hindi2hinglish library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`HinglishError`] — **Fatal**: the batch cannot proceed at all
//!   (unreadable input, zero pages extracted, provider not configured).
//!   Returned as `Err(HinglishError)` from the top-level `convert*`
//!   functions.
//!
//! * [`PageError`] — **Non-fatal**: a single page's recognition call
//!   failed but the batch continues. Stored inside
//!   [`crate::output::PageResult`] so callers can inspect partial success
//!   rather than losing the whole document to one bad page.
//!
//! Cleanup failures are deliberately absent from both enums: a temporary
//! file that survives its deletion retries is logged as a warning and
//! never escalated (see [`crate::cleanup`]).

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the hindi2hinglish library.
///
/// Page-level recognition failures use [`PageError`] and are stored in
/// [`crate::output::PageResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum HinglishError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input bytes are neither a PDF nor a JPEG/PNG image.
    #[error("Unsupported input: {detail}\nExpected a PDF or a JPEG/PNG image.")]
    UnsupportedInput { detail: String },

    // ── Document errors ───────────────────────────────────────────────────
    /// The PDF could not be opened or parsed.
    #[error("Document cannot be opened: {detail}")]
    DocumentOpen { detail: String },

    /// pdfium returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// The rasterizer produced no pages at all.
    #[error("No pages could be extracted from the document")]
    NoPagesExtracted,

    // ── Recognition service errors ────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    ///
    /// Raised before any page is rasterised: a missing credential is a
    /// startup-time hard stop, not a per-page failure.
    #[error("Recognition provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// Every page failed recognition; the combined output is empty.
    ///
    /// The batch itself returns `Ok` with an empty combined output; this
    /// variant is surfaced by callers that need a usable artifact, e.g.
    /// [`crate::convert::convert_to_file`] and
    /// [`crate::output::ConversionOutput::require_usable`].
    #[error("No usable output: all {total} pages failed recognition.\nFirst error: {first_error}")]
    NoUsableOutput { total: usize, first_error: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output PDF document could not be assembled.
    #[error("Failed to generate output PDF: {detail}")]
    PdfEmitFailed { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (task join failures and the like).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single page.
///
/// Stored alongside [`crate::output::PageResult`] when a page fails.
/// A failed page is skipped in the combined output; the batch continues.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// The external recognition call failed (network, quota, malformed
    /// response). Carries the underlying cause as text.
    #[error("Page {page}: recognition failed: {detail}")]
    RecognitionFailed { page: usize, detail: String },
}

impl PageError {
    /// The 1-based page number this error belongs to.
    pub fn page(&self) -> usize {
        match self {
            PageError::RecognitionFailed { page, .. } => *page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_usable_output_display() {
        let e = HinglishError::NoUsableOutput {
            total: 3,
            first_error: "quota exceeded".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("all 3 pages"), "got: {msg}");
        assert!(msg.contains("quota exceeded"));
    }

    #[test]
    fn rasterisation_failed_display() {
        let e = HinglishError::RasterisationFailed {
            page: 7,
            detail: "render error".into(),
        };
        assert!(e.to_string().contains("page 7"));
    }

    #[test]
    fn provider_not_configured_display() {
        let e = HinglishError::ProviderNotConfigured {
            provider: "gemini".into(),
            hint: "set GEMINI_API_KEY".into(),
        };
        assert!(e.to_string().contains("gemini"));
        assert!(e.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn page_error_reports_page_number() {
        let e = PageError::RecognitionFailed {
            page: 2,
            detail: "timeout".into(),
        };
        assert_eq!(e.page(), 2);
        assert!(e.to_string().contains("Page 2"));
    }
}
