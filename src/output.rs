//! Result types for a conversion batch.

use crate::error::{HinglishError, PageError};
use serde::{Deserialize, Serialize};

/// Outcome of one page's recognition call.
///
/// `text` is empty whenever `error` is `Some`; a failed page contributes
/// nothing to the combined output but stays in the list so callers can
/// report exactly which pages were lost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    /// 1-based page number from the original document's pagination
    /// (not renumbered after truncation).
    pub page_num: usize,
    /// Cleaned Hinglish text for this page. Empty on failure.
    pub text: String,
    /// Wall-clock duration of the recognition call in milliseconds.
    pub duration_ms: u64,
    /// Set when the page's recognition call failed.
    pub error: Option<PageError>,
}

impl PageResult {
    /// True when the page produced usable text.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Timing and page-count statistics for one batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages in the source document (1 for image input).
    pub total_pages: usize,
    /// Pages retained after applying the page cap.
    pub retained_pages: usize,
    /// Retained pages whose recognition succeeded.
    pub processed_pages: usize,
    /// Retained pages whose recognition failed.
    pub failed_pages: usize,
    /// End-to-end batch duration in milliseconds (includes pacing waits).
    pub total_duration_ms: u64,
    /// Rasterisation duration in milliseconds (0 for image input).
    pub render_duration_ms: u64,
    /// Cumulative recognition-call duration in milliseconds.
    pub recognition_duration_ms: u64,
}

/// Terminal artifact of one batch request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Combined Hinglish text: each successful page's text in page order,
    /// separated by one blank line, trimmed. Empty when every page failed.
    pub text: String,
    /// Per-page outcomes, sorted by page number.
    pub pages: Vec<PageResult>,
    /// Advisory: the source had more pages than the cap and the excess
    /// was skipped.
    pub truncated: bool,
    /// Batch statistics.
    pub stats: ConversionStats,
}

impl ConversionOutput {
    /// True when at least one page produced text.
    ///
    /// A batch where every page failed still returns `Ok`, with an empty
    /// combined output; callers that need an artifact must check this (or
    /// call [`Self::require_usable`]) rather than treating the empty
    /// string as success.
    pub fn has_usable_output(&self) -> bool {
        !self.text.is_empty()
    }

    /// Promote an all-pages-failed batch into the fatal
    /// [`HinglishError::NoUsableOutput`].
    pub fn require_usable(self) -> Result<Self, HinglishError> {
        if self.has_usable_output() {
            return Ok(self);
        }
        let first_error = self
            .pages
            .iter()
            .find_map(|p| p.error.as_ref())
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown error".to_string());
        Err(HinglishError::NoUsableOutput {
            total: self.pages.len(),
            first_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed_page(n: usize) -> PageResult {
        PageResult {
            page_num: n,
            text: String::new(),
            duration_ms: 5,
            error: Some(PageError::RecognitionFailed {
                page: n,
                detail: "quota".into(),
            }),
        }
    }

    #[test]
    fn empty_output_is_not_usable() {
        let out = ConversionOutput {
            text: String::new(),
            pages: vec![failed_page(1), failed_page(2)],
            truncated: false,
            stats: ConversionStats::default(),
        };
        assert!(!out.has_usable_output());
        let err = out.require_usable().unwrap_err();
        match err {
            HinglishError::NoUsableOutput { total, first_error } => {
                assert_eq!(total, 2);
                assert!(first_error.contains("quota"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn usable_output_passes_through() {
        let out = ConversionOutput {
            text: "Namaste".into(),
            pages: vec![PageResult {
                page_num: 1,
                text: "Namaste".into(),
                duration_ms: 10,
                error: None,
            }],
            truncated: false,
            stats: ConversionStats::default(),
        };
        assert!(out.has_usable_output());
        assert!(out.require_usable().is_ok());
    }

    #[test]
    fn output_serialises_to_json() {
        let out = ConversionOutput {
            text: "Namaste".into(),
            pages: vec![failed_page(2)],
            truncated: true,
            stats: ConversionStats {
                total_pages: 12,
                retained_pages: 10,
                ..Default::default()
            },
        };
        let json = serde_json::to_string(&out).unwrap();
        assert!(json.contains("\"truncated\":true"));
        assert!(json.contains("\"total_pages\":12"));
    }
}
