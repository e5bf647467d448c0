//! Recognition client: one prompt + one image → cleaned Hinglish text.
//!
//! This module converts a single page image into a recognition API call
//! and returns the cleaned transliteration. It is intentionally thin —
//! prompt content lives in [`crate::prompts`] and response scrubbing in
//! [`crate::pipeline::postprocess`], so either can change without
//! touching the call plumbing here.
//!
//! There is no retry loop: the service is paced at the batch level with a
//! flat inter-call delay, and a failed call simply fails its page. The
//! client knows nothing about batching, pacing, or page numbers.

use crate::config::ConversionConfig;
use crate::error::PageError;
use crate::pipeline::postprocess;
use crate::prompts::HINGLISH_PROMPT;
use edgequake_llm::{ChatMessage, CompletionOptions, ImageData, LLMProvider};
use std::sync::Arc;
use tracing::debug;

/// Send one image through the recognition service and clean the response.
///
/// ## Message layout
///
/// 1. **System message** — the transliteration prompt (or user override)
/// 2. **User message** — the image as a base64 attachment (empty text)
///
/// The empty user text is intentional: the API requires at least one user
/// turn to respond to, but the image carries all the actual content.
///
/// ## Errors
///
/// Any provider failure (network, quota, malformed response) is returned
/// as [`PageError::RecognitionFailed`] carrying the underlying cause as
/// text. The caller decides what a failed page means for the batch.
pub async fn recognize(
    provider: &Arc<dyn LLMProvider>,
    page_num: usize,
    image: ImageData,
    config: &ConversionConfig,
) -> Result<String, PageError> {
    let prompt = config.prompt.as_deref().unwrap_or(HINGLISH_PROMPT);

    let messages = vec![
        ChatMessage::system(prompt),
        ChatMessage::user_with_images("", vec![image]),
    ];

    let options = build_options(config);

    match provider.chat(&messages, Some(&options)).await {
        Ok(response) => {
            let cleaned = postprocess::clean_response(&response.content);
            debug!(
                "Page {}: {} raw chars → {} cleaned chars",
                page_num,
                response.content.len(),
                cleaned.len()
            );
            Ok(cleaned)
        }
        Err(e) => Err(PageError::RecognitionFailed {
            page: page_num,
            detail: format!("{}", e),
        }),
    }
}

/// Build `CompletionOptions` from the conversion config.
fn build_options(config: &ConversionConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}
