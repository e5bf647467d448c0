//! Batch conversion entry points and the sequential page loop.
//!
//! One batch = one document. The loop is deliberately sequential: the
//! recognition service's rate limit is the binding constraint, so pages
//! are recognised one at a time with a flat pacing delay between calls
//! (see [`crate::pacing`]). A failed page is recorded and skipped; it
//! never aborts the batch.

use crate::config::ConversionConfig;
use crate::error::HinglishError;
use crate::output::{ConversionOutput, ConversionStats, PageResult};
use crate::pipeline::{emit, encode, raster, recognize};
use edgequake_llm::{ImageData, LLMProvider, ProviderFactory};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Model used when neither the config nor the environment names one.
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// What the input byte buffer turned out to be.
enum InputKind {
    Pdf,
    Image,
}

/// Convert a local image or PDF file to Hinglish.
///
/// This is the primary entry point for the library. The file type is
/// detected from its content (PDF magic bytes, then image signature),
/// not its extension.
///
/// # Returns
/// `Ok(ConversionOutput)` on success, even if some pages failed — check
/// [`ConversionOutput::has_usable_output`] before treating the combined
/// text as meaningful.
///
/// # Errors
/// Returns `Err(HinglishError)` only for fatal errors: unreadable file,
/// unsupported format, rasterisation failure, missing API key.
pub async fn convert(
    input_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, HinglishError> {
    let path = input_path.as_ref();
    info!("Starting conversion: {}", path.display());

    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => HinglishError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => HinglishError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => HinglishError::Internal(format!("Failed to read {}: {}", path.display(), e)),
    })?;

    convert_bytes(&bytes, config).await
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, HinglishError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| HinglishError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(input_path, config))
}

/// Convert an in-memory document (image or PDF) to Hinglish.
pub async fn convert_bytes(
    bytes: &[u8],
    config: &ConversionConfig,
) -> Result<ConversionOutput, HinglishError> {
    match detect_input(bytes)? {
        InputKind::Pdf => convert_pdf_bytes(bytes, config).await,
        InputKind::Image => convert_image_bytes(bytes, config).await,
    }
}

/// Convert an in-memory PDF to Hinglish.
///
/// At most [`crate::config::ConversionConfig::page_cap`] pages are
/// processed, in original page order; excess pages are skipped with an
/// advisory. The cap is applied before any recognition call is made.
pub async fn convert_pdf_bytes(
    bytes: &[u8],
    config: &ConversionConfig,
) -> Result<ConversionOutput, HinglishError> {
    let total_start = Instant::now();

    // A missing credential is a startup-time hard stop: resolve the
    // provider before spending any time rasterising.
    let provider = resolve_provider(config)?;

    let render_start = Instant::now();
    let rastered = raster::rasterize(bytes.to_vec(), config.dpi, config.page_cap).await?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;

    if rastered.pages.is_empty() {
        return Err(HinglishError::NoPagesExtracted);
    }
    info!(
        "Rasterised {}/{} pages in {}ms",
        rastered.pages.len(),
        rastered.total_pages,
        render_duration_ms
    );

    if rastered.truncated {
        if let Some(ref cb) = config.progress_callback {
            cb.on_pages_truncated(rastered.total_pages, rastered.pages.len());
        }
    }

    // Encoding a rendered bitmap is part of producing the page image, so
    // a failure here fails the whole rasterisation step, like a render
    // error would.
    let mut encoded: Vec<(usize, ImageData)> = Vec::with_capacity(rastered.pages.len());
    for page in &rastered.pages {
        let data = encode::encode_page(&page.image).map_err(|e| {
            HinglishError::RasterisationFailed {
                page: page.number,
                detail: format!("image encoding failed: {}", e),
            }
        })?;
        encoded.push((page.number, data));
    }

    let pages = run_batch(&provider, encoded, config).await;
    let output = finish_batch(
        pages,
        rastered.total_pages,
        rastered.truncated,
        total_start,
        render_duration_ms,
        config,
    );
    Ok(output)
}

/// Convert a single in-memory JPEG/PNG image to Hinglish.
///
/// A single-image batch has one "page" and never waits on pacing.
pub async fn convert_image_bytes(
    bytes: &[u8],
    config: &ConversionConfig,
) -> Result<ConversionOutput, HinglishError> {
    let total_start = Instant::now();

    let provider = resolve_provider(config)?;
    let image = encode::encode_image_bytes(bytes)?;

    let pages = run_batch(&provider, vec![(1, image)], config).await;
    let output = finish_batch(pages, 1, false, total_start, 0, config);
    Ok(output)
}

/// Convert a document and write the Hinglish PDF artifact to `output_path`.
///
/// Uses atomic write (temp file + rename) so a crash never leaves a
/// partial artifact; a temp file orphaned by a failed rename is removed
/// with the bounded-retry cleanup policy. Fails with
/// [`HinglishError::NoUsableOutput`] when every page failed — an empty
/// artifact would be an empty success.
pub async fn convert_to_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, HinglishError> {
    let output = convert(input_path, config).await?.require_usable()?;
    let pdf_bytes = emit::text_to_pdf(&output.text)?;

    let path = output_path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                HinglishError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                }
            })?;
        }
    }

    let tmp_path = path.with_extension("pdf.tmp");
    tokio::fs::write(&tmp_path, &pdf_bytes).await.map_err(|e| {
        HinglishError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        // Cleanup is advisory: the rename failure is the real error.
        crate::cleanup::remove_file_with_retries(
            &tmp_path,
            crate::cleanup::CLEANUP_MAX_ATTEMPTS,
            crate::cleanup::CLEANUP_RETRY_PAUSE,
        )
        .await;
        return Err(HinglishError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        });
    }

    info!("Wrote Hinglish PDF to {}", path.display());
    Ok(output.stats)
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Classify the input buffer by its leading bytes.
fn detect_input(bytes: &[u8]) -> Result<InputKind, HinglishError> {
    if bytes.starts_with(b"%PDF") {
        return Ok(InputKind::Pdf);
    }
    if image::guess_format(bytes).is_ok() {
        return Ok(InputKind::Image);
    }
    Err(HinglishError::UnsupportedInput {
        detail: format!(
            "first bytes {:02X?} match neither PDF nor a known image format",
            &bytes[..bytes.len().min(4)]
        ),
    })
}

/// Resolve the recognition provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`) — used as-is; the seam
///    for tests and callers with custom middleware.
/// 2. **Named provider + model** (`config.provider_name`) — the factory
///    reads the matching API key from the environment.
/// 3. **`GEMINI_API_KEY`** — the preferred service for this pipeline;
///    checked explicitly so users with several keys still land on Gemini
///    unless they ask for something else.
/// 4. **Full auto-detection** — the factory scans all known key
///    variables and picks the first configured provider.
fn resolve_provider(
    config: &ConversionConfig,
) -> Result<Arc<dyn LLMProvider>, HinglishError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);

    if let Some(ref name) = config.provider_name {
        return create_provider(name, model);
    }

    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        if !key.is_empty() {
            return create_provider("gemini", model);
        }
    }

    let (provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| HinglishError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No recognition provider could be auto-detected from the environment.\n\
                 Set GEMINI_API_KEY (or another supported provider key).\n\
                 Error: {}",
                e
            ),
        })?;
    Ok(provider)
}

/// Instantiate a named provider with the given model.
fn create_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, HinglishError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        HinglishError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// The sequential per-page loop: recognise, record, pace.
///
/// Always returns one [`PageResult`] per input page — a recognition
/// failure is recorded in its page's slot and the loop continues. The
/// pacing pause runs between calls, never after the last page.
async fn run_batch(
    provider: &Arc<dyn LLMProvider>,
    pages: Vec<(usize, ImageData)>,
    config: &ConversionConfig,
) -> Vec<PageResult> {
    let total = pages.len();
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let mut results = Vec::with_capacity(total);

    let mut queue = pages.into_iter().enumerate().peekable();
    while let Some((i, (page_num, image))) = queue.next() {
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page_num, total);
        }

        let start = Instant::now();
        let result = match recognize::recognize(provider, page_num, image, config).await {
            Ok(text) => {
                debug!("Page {} recognised, {} chars", page_num, text.len());
                PageResult {
                    page_num,
                    text,
                    duration_ms: start.elapsed().as_millis() as u64,
                    error: None,
                }
            }
            Err(e) => {
                warn!("Page {} failed: {}", page_num, e);
                PageResult {
                    page_num,
                    text: String::new(),
                    duration_ms: start.elapsed().as_millis() as u64,
                    error: Some(e),
                }
            }
        };

        if let Some(ref cb) = config.progress_callback {
            match &result.error {
                None => cb.on_page_complete(page_num, total, result.text.len()),
                Some(e) => cb.on_page_error(page_num, total, &e.to_string()),
            }
        }
        results.push(result);

        // Flat rate-limit pacing; no adaptivity, no backoff on error.
        if let Some(delay) = config.pacing.delay_after(i, total) {
            if let Some(ref cb) = config.progress_callback {
                cb.on_pause_start(page_num, delay.as_secs());
            }
            if let Some((_, (next_num, _))) = queue.peek() {
                debug!("Pacing: waiting {:?} before page {}", delay, next_num);
            }
            tokio::time::sleep(delay).await;
            if let Some(ref cb) = config.progress_callback {
                cb.on_pause_end(page_num);
            }
        }
    }

    results
}

/// Assemble the combined output and stats from the per-page results.
fn finish_batch(
    mut pages: Vec<PageResult>,
    total_pages: usize,
    truncated: bool,
    total_start: Instant,
    render_duration_ms: u64,
    config: &ConversionConfig,
) -> ConversionOutput {
    pages.sort_by_key(|p| p.page_num);

    let text = assemble_combined(&pages);
    let processed = pages.iter().filter(|p| p.is_success()).count();
    let failed = pages.len() - processed;

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(pages.len(), processed);
    }

    let stats = ConversionStats {
        total_pages,
        retained_pages: pages.len(),
        processed_pages: processed,
        failed_pages: failed,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        render_duration_ms,
        recognition_duration_ms: pages.iter().map(|p| p.duration_ms).sum(),
    };

    info!(
        "Batch complete: {}/{} pages in {}ms",
        processed,
        pages.len(),
        stats.total_duration_ms
    );

    ConversionOutput {
        text,
        pages,
        truncated,
        stats,
    }
}

/// Join successful page texts in page order, one blank line between
/// pages, trimmed. Empty when every page failed.
fn assemble_combined(pages: &[PageResult]) -> String {
    pages
        .iter()
        .filter(|p| p.is_success() && !p.text.is_empty())
        .map(|p| p.text.trim())
        .collect::<Vec<_>>()
        .join("\n\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PageError;

    fn ok_page(n: usize, text: &str) -> PageResult {
        PageResult {
            page_num: n,
            text: text.to_string(),
            duration_ms: 1,
            error: None,
        }
    }

    fn failed_page(n: usize) -> PageResult {
        PageResult {
            page_num: n,
            text: String::new(),
            duration_ms: 1,
            error: Some(PageError::RecognitionFailed {
                page: n,
                detail: "quota exceeded".into(),
            }),
        }
    }

    #[test]
    fn combined_output_separates_pages_with_one_blank_line() {
        let pages = vec![ok_page(1, "Namaste"), ok_page(2, "Aap kaise hain?")];
        assert_eq!(assemble_combined(&pages), "Namaste\n\nAap kaise hain?");
    }

    #[test]
    fn failed_middle_page_is_skipped_but_order_kept() {
        let pages = vec![
            ok_page(1, "Pehla panna"),
            failed_page(2),
            ok_page(3, "Teesra panna"),
        ];
        assert_eq!(
            assemble_combined(&pages),
            "Pehla panna\n\nTeesra panna"
        );
    }

    #[test]
    fn all_failed_yields_empty_string() {
        let pages = vec![failed_page(1), failed_page(2)];
        assert_eq!(assemble_combined(&pages), "");
    }

    #[test]
    fn combined_output_is_trimmed() {
        let pages = vec![ok_page(1, "  Namaste \n")];
        assert_eq!(assemble_combined(&pages), "Namaste");
    }

    #[test]
    fn finish_batch_counts_and_sorts() {
        let config = ConversionConfig::default();
        let pages = vec![ok_page(3, "teen"), failed_page(1), ok_page(2, "do")];
        let out = finish_batch(pages, 12, true, Instant::now(), 42, &config);

        assert_eq!(
            out.pages.iter().map(|p| p.page_num).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(out.stats.total_pages, 12);
        assert_eq!(out.stats.retained_pages, 3);
        assert_eq!(out.stats.processed_pages, 2);
        assert_eq!(out.stats.failed_pages, 1);
        assert_eq!(out.stats.render_duration_ms, 42);
        assert!(out.truncated);
        assert_eq!(out.text, "do\n\nteen");
    }

    #[test]
    fn detect_input_recognises_pdf_magic() {
        assert!(matches!(
            detect_input(b"%PDF-1.7 rest of file"),
            Ok(InputKind::Pdf)
        ));
    }

    #[test]
    fn detect_input_recognises_png() {
        let png_magic = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        assert!(matches!(detect_input(&png_magic), Ok(InputKind::Image)));
    }

    #[test]
    fn detect_input_rejects_garbage() {
        assert!(matches!(
            detect_input(b"hello world"),
            Err(HinglishError::UnsupportedInput { .. })
        ));
    }
}
