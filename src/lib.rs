//! # hindi2hinglish
//!
//! Convert Hindi text in images and scanned PDFs to Hinglish (Hindi
//! written in Roman script) using multimodal text-generation models.
//!
//! ## Why this crate?
//!
//! Conventional OCR stacks read Devanagari poorly and stop at raw text —
//! transliteration is a second, error-prone step. Instead this crate
//! rasterises each page into a bitmap and lets a multimodal model read
//! and romanise it in one pass, producing natural, readable Hinglish.
//!
//! ## Pipeline Overview
//!
//! ```text
//! image / PDF bytes
//!  │
//!  ├─ 1. Raster   first 10 pages via pdfium at 300 DPI (CPU-bound, spawn_blocking)
//!  ├─ 2. Encode   PNG → base64 ImageData
//!  ├─ 3. Recognise one paced call per page (flat 10 s between calls)
//!  ├─ 4. Clean    strip model lead-in phrases, trim
//!  └─ 5. Output   combined text + optional PDF artifact
//! ```
//!
//! Pages are processed strictly sequentially: the recognition service's
//! rate limit is the binding constraint, so there is no parallelism and
//! the flat inter-call delay is the only pacing. A page whose call fails
//! is reported and skipped; the batch carries on.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hindi2hinglish::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from GEMINI_API_KEY (and friends)
//!     let config = ConversionConfig::default();
//!     let output = convert("scan.pdf", &config).await?;
//!     if output.has_usable_output() {
//!         println!("{}", output.text);
//!     } else {
//!         eprintln!("no usable output: every page failed");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `hindi2hinglish` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! hindi2hinglish = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod cleanup;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pacing;
pub mod pipeline;
pub mod progress;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, DEFAULT_DPI, DEFAULT_PAGE_CAP, DEFAULT_PAGE_DELAY_SECS};
pub use convert::{
    convert, convert_bytes, convert_image_bytes, convert_pdf_bytes, convert_sync, convert_to_file,
};
pub use error::{HinglishError, PageError};
pub use output::{ConversionOutput, ConversionStats, PageResult};
pub use pacing::PacingPolicy;
pub use pipeline::emit::text_to_pdf;
pub use pipeline::postprocess::clean_response;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
