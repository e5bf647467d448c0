//! Pipeline stages for image/PDF-to-Hinglish conversion.
//!
//! Each submodule implements exactly one transformation step. Keeping
//! stages separate makes each independently testable and lets us swap an
//! implementation (e.g. the rendering backend) without touching the rest.
//!
//! ## Data Flow
//!
//! ```text
//! bytes ──▶ raster ──▶ encode ──▶ recognize ──▶ postprocess ──▶ emit
//! (PDF/img) (pdfium)   (base64)   (one call     (strip lead-   (output
//!                                  per page,     in phrases)    PDF)
//!                                  paced)
//! ```
//!
//! 1. [`raster`]      — open the PDF from its byte buffer, cap at the
//!    page limit, render each retained page; runs in `spawn_blocking`
//!    because pdfium is not async-safe
//! 2. [`encode`]      — PNG-encode and base64-wrap each bitmap (or pass
//!    raw JPEG/PNG uploads through) for the multimodal request body
//! 3. [`recognize`]   — one prompt + one image → one recognition call;
//!    the only stage with network I/O
//! 4. [`postprocess`] — deterministic cleanup of model lead-in phrases
//! 5. [`emit`]        — render the combined text as the output PDF
//!    artifact

pub mod emit;
pub mod encode;
pub mod postprocess;
pub mod raster;
pub mod recognize;
