//! Configuration types for image/PDF-to-Hinglish conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`],
//! built via its [`ConversionConfigBuilder`]. Keeping every knob in one
//! struct makes it trivial to share a config across calls and to diff two
//! runs to understand why their outputs differ.
//!
//! The provider handle and API key live here too: they are resolved once
//! per process and passed in explicitly, never read from mutable global
//! state mid-batch.

use crate::error::HinglishError;
use crate::pacing::PacingPolicy;
use crate::progress::ProgressCallback;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;

/// Rendering resolution equivalent in DPI. 300/72 scale per axis.
pub const DEFAULT_DPI: u32 = 300;

/// Hard cap on pages processed per batch, enforced before any
/// recognition call is made.
pub const DEFAULT_PAGE_CAP: usize = 10;

/// Flat delay between successive recognition calls, in seconds.
pub const DEFAULT_PAGE_DELAY_SECS: u64 = 10;

/// Configuration for one conversion batch.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use hindi2hinglish::{ConversionConfig, PacingPolicy};
///
/// let config = ConversionConfig::builder()
///     .dpi(300)
///     .pacing(PacingPolicy::fixed_secs(10))
///     .model("gemini-2.0-flash")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Rendering DPI used when rasterising each PDF page. Range: 72–600. Default: 300.
    ///
    /// 300 DPI keeps Devanagari matras and conjuncts legible to the vision
    /// model; scanned handwriting loses diacritics below ~200 DPI. Lower it
    /// only when upload size matters more than accuracy.
    pub dpi: u32,

    /// Maximum pages retained from a PDF. Default: 10.
    ///
    /// The cap protects the rate-limited recognition service: at the
    /// default 10-second pacing, 10 pages already take ~90 seconds of
    /// waiting alone. Pages beyond the cap are skipped with an advisory,
    /// before any recognition call is made.
    pub page_cap: usize,

    /// Flat delay between successive recognition calls. Default: 10 s.
    ///
    /// Pacing exists solely to respect the service's rate limits. It is
    /// not adaptive and does not back off on error.
    pub pacing: PacingPolicy,

    /// Recognition model identifier, e.g. "gemini-2.0-flash".
    /// If None, uses the provider default.
    pub model: Option<String>,

    /// Provider name (e.g. "gemini", "openai").
    /// If None along with `provider`, the provider is auto-detected from
    /// environment API keys.
    pub provider_name: Option<String>,

    /// Pre-constructed provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature for the recognition call. Default: 0.1.
    ///
    /// Transliteration is transcription, not creative writing: low
    /// temperature keeps the model faithful to what is on the page.
    pub temperature: f32,

    /// Maximum tokens the model may generate per page. Default: 4096.
    pub max_tokens: usize,

    /// Custom instruction prompt. If None, uses
    /// [`crate::prompts::HINGLISH_PROMPT`].
    pub prompt: Option<String>,

    /// Progress callback invoked per page and around each pacing pause.
    /// Advisory only; no callback method affects control flow.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            page_cap: DEFAULT_PAGE_CAP,
            pacing: PacingPolicy::default(),
            model: None,
            provider_name: None,
            provider: None,
            temperature: 0.1,
            max_tokens: 4096,
            prompt: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("dpi", &self.dpi)
            .field("page_cap", &self.page_cap)
            .field("pacing", &self.pacing)
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("prompt", &self.prompt.as_ref().map(|_| "<custom>"))
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 600);
        self
    }

    pub fn page_cap(mut self, cap: usize) -> Self {
        self.config.page_cap = cap.max(1);
        self
    }

    pub fn pacing(mut self, pacing: PacingPolicy) -> Self {
        self.config.pacing = pacing;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.prompt = Some(prompt.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, HinglishError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 600 {
            return Err(HinglishError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        if c.page_cap == 0 {
            return Err(HinglishError::InvalidConfig(
                "Page cap must be ≥ 1".into(),
            ));
        }
        if c.max_tokens == 0 {
            return Err(HinglishError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
