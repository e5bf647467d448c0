//! CLI binary for hindi2hinglish.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use hindi2hinglish::{
    convert, convert_to_file, ConversionConfig, ConversionProgressCallback, PacingPolicy,
    ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live progress bar, per-page log
/// lines, and a countdown message during each pacing pause.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set dynamically by
    /// `on_batch_start` (called once the page count is known).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_batch_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening document…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>2}/{len} pages  ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Converting");
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Converting {total_pages} page(s) to Hinglish…"))
        ));
    }

    fn on_pages_truncated(&self, total_pages: usize, retained: usize) {
        self.bar.println(format!(
            "{} PDF has {} pages; only the first {} will be processed (page cap)",
            cyan("⚠"),
            total_pages,
            retained
        ));
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, text_len: usize) {
        self.bar.println(format!(
            "  {} Page {:>2}/{:<2}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{text_len:>5} chars")),
        ));
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, total: usize, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg = if error.chars().count() > 80 {
            let head: String = error.chars().take(79).collect();
            format!("{head}\u{2026}")
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} Page {:>2}/{:<2}  {}",
            red("✗"),
            page_num,
            total,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_pause_start(&self, _page_num: usize, delay_secs: u64) {
        self.bar
            .set_message(format!("waiting {delay_secs}s (rate limit)…"));
    }

    fn on_pause_end(&self, _page_num: usize) {
        self.bar.set_message(String::new());
    }

    fn on_batch_complete(&self, total_pages: usize, success_count: usize) {
        let failed = total_pages.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} page(s) converted successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} pages converted  ({} failed)",
                if failed == total_pages {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_pages,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a photographed page, print Hinglish to stdout
  hindi2hinglish photo.jpg --text-only

  # Convert a scanned PDF (first 10 pages) to a Hinglish PDF
  hindi2hinglish scan.pdf -o scan_hinglish.pdf

  # Faster runs against a provider without strict rate limits
  hindi2hinglish scan.pdf --delay 0 -o out.pdf

  # Use a specific model
  hindi2hinglish --model gemini-2.5-pro notes.png --text-only

  # Structured JSON (per-page results + stats)
  hindi2hinglish scan.pdf --json > result.json

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key (preferred provider)
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  PDFIUM_LIB_PATH         Path to an existing libpdfium

NOTES:
  At most 10 PDF pages are processed per run; extra pages are skipped
  with a warning. A flat delay (default 10 s) is inserted between pages
  to respect the recognition service's rate limits.
"#;

/// Convert Hindi text in images and scanned PDFs to Hinglish.
#[derive(Parser, Debug)]
#[command(
    name = "hindi2hinglish",
    version,
    about = "Convert Hindi text in images and scanned PDFs to Hinglish",
    long_about = "Convert Hindi text embedded in images (JPEG/PNG) or scanned PDF pages to \
Hinglish (Hindi written in Roman script) using a multimodal recognition model. Produces plain \
text or a generated PDF artifact.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input image (JPEG/PNG) or PDF file.
    input: PathBuf,

    /// Write the Hinglish text as a PDF to this file.
    /// Default: <input stem>_hinglish_converted.pdf next to the input.
    #[arg(short, long, env = "HINDI2HINGLISH_OUTPUT")]
    output: Option<PathBuf>,

    /// Print plain Hinglish text to stdout instead of writing a PDF.
    #[arg(long)]
    text_only: bool,

    /// Recognition model ID (e.g. gemini-2.0-flash, gemini-2.5-pro).
    #[arg(long, env = "HINDI2HINGLISH_MODEL")]
    model: Option<String>,

    /// Provider: gemini, openai, anthropic, ollama.
    /// Auto-detected from API key env vars if not set.
    #[arg(long, env = "HINDI2HINGLISH_PROVIDER")]
    provider: Option<String>,

    /// Delay between recognition calls in seconds (rate-limit pacing).
    #[arg(long, env = "HINDI2HINGLISH_DELAY", default_value_t = 10)]
    delay: u64,

    /// Rendering DPI for PDF pages (72–600).
    #[arg(long, env = "HINDI2HINGLISH_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Path to a text file containing a custom instruction prompt.
    #[arg(long, env = "HINDI2HINGLISH_PROMPT")]
    prompt: Option<PathBuf>,

    /// Output structured JSON (ConversionOutput) instead of text/PDF.
    #[arg(long)]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "HINDI2HINGLISH_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "HINDI2HINGLISH_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "HINDI2HINGLISH_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new_dynamic() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb).await?;

    // ── Run conversion ───────────────────────────────────────────────────
    if cli.text_only || cli.json {
        let output = convert(&cli.input, &config)
            .await
            .context("Conversion failed")?;

        if cli.json {
            let json =
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
            println!("{json}");
            return Ok(());
        }

        if !output.has_usable_output() {
            anyhow::bail!("No usable output: every page failed recognition");
        }

        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.text.as_bytes())
            .context("Failed to write to stdout")?;
        handle.write_all(b"\n").ok();

        if !cli.quiet && !show_progress {
            eprintln!(
                "Converted {}/{} pages in {}ms",
                output.stats.processed_pages,
                output.stats.retained_pages,
                output.stats.total_duration_ms
            );
        }
    } else {
        let output_path = cli.output.clone().unwrap_or_else(|| default_output(&cli.input));
        let stats = convert_to_file(&cli.input, &output_path, &config)
            .await
            .context("Conversion failed")?;

        if !cli.quiet {
            eprintln!(
                "{}  {}/{} pages  {}ms  →  {}",
                if stats.failed_pages == 0 {
                    green("✔")
                } else {
                    cyan("⚠")
                },
                stats.processed_pages,
                stats.retained_pages,
                stats.total_duration_ms,
                bold(&output_path.display().to_string()),
            );
        }
    }

    Ok(())
}

/// `scan.pdf` → `scan_hinglish_converted.pdf`, matching the input's
/// directory.
fn default_output(input: &std::path::Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{stem}_hinglish_converted.pdf"))
}

/// Map CLI args to `ConversionConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let prompt = if let Some(ref path) = cli.prompt {
        Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read prompt from {:?}", path))?,
        )
    } else {
        None
    };

    let mut builder = ConversionConfig::builder()
        .dpi(cli.dpi)
        .pacing(PacingPolicy::fixed_secs(cli.delay));

    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider.clone());
    }
    if let Some(p) = prompt {
        builder = builder.prompt(p);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_keeps_directory_and_stem() {
        let out = default_output(std::path::Path::new("/data/scan.pdf"));
        assert_eq!(
            out,
            PathBuf::from("/data/scan_hinglish_converted.pdf")
        );
    }

    #[test]
    fn default_output_for_image_input() {
        let out = default_output(std::path::Path::new("photo.jpg"));
        assert_eq!(out, PathBuf::from("photo_hinglish_converted.pdf"));
    }

    #[test]
    fn cli_parses_minimal_invocation() {
        let cli = Cli::try_parse_from(["hindi2hinglish", "scan.pdf"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("scan.pdf"));
        assert_eq!(cli.delay, 10);
        assert_eq!(cli.dpi, 300);
        assert!(!cli.text_only);
    }

    #[test]
    fn cli_rejects_out_of_range_dpi() {
        assert!(Cli::try_parse_from(["hindi2hinglish", "scan.pdf", "--dpi", "50"]).is_err());
    }
}
