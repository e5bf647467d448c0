//! Progress-callback trait for per-page batch events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline processes each page and as it waits out each
//! pacing pause.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers
//! can forward events to a progress bar, a log, or a UI widget without the
//! library knowing anything about how the host application communicates.
//! Every event is strictly advisory — nothing a callback does can change
//! the batch outcome.

use std::sync::Arc;

/// Called by the batch orchestrator as it processes each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync`; the batch
/// itself is sequential, but the future driving it may migrate threads.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once after rasterisation, before any recognition call.
    ///
    /// # Arguments
    /// * `total_pages` — number of retained pages that will be processed
    fn on_batch_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called when the source document had more pages than the cap.
    ///
    /// # Arguments
    /// * `total_pages` — pages in the source document
    /// * `retained`    — pages that will actually be processed
    fn on_pages_truncated(&self, total_pages: usize, retained: usize) {
        let _ = (total_pages, retained);
    }

    /// Called just before the recognition request is sent for a page.
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called when a page is successfully converted.
    ///
    /// # Arguments
    /// * `text_len` — byte length of the cleaned Hinglish text
    fn on_page_complete(&self, page_num: usize, total_pages: usize, text_len: usize) {
        let _ = (page_num, total_pages, text_len);
    }

    /// Called when a page's recognition call fails.
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let _ = (page_num, total_pages, error);
    }

    /// Called immediately before the pacing pause that follows `page_num`.
    ///
    /// Not called after the final page — a single-page batch never pauses.
    fn on_pause_start(&self, page_num: usize, delay_secs: u64) {
        let _ = (page_num, delay_secs);
    }

    /// Called when the pacing pause after `page_num` has elapsed.
    fn on_pause_end(&self, page_num: usize) {
        let _ = page_num;
    }

    /// Called once after all retained pages have been attempted.
    fn on_batch_complete(&self, total_pages: usize, success_count: usize) {
        let _ = (total_pages, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in
/// [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
        pauses: AtomicUsize,
        pause_ends: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_page_start(&self, _page: usize, _total: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }
        fn on_page_complete(&self, _page: usize, _total: usize, _len: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }
        fn on_page_error(&self, _page: usize, _total: usize, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
        fn on_pause_start(&self, _page: usize, _secs: u64) {
            self.pauses.fetch_add(1, Ordering::SeqCst);
        }
        fn on_pause_end(&self, _page: usize) {
            self.pause_ends.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_batch_start(5);
        cb.on_pages_truncated(25, 10);
        cb.on_page_start(1, 5);
        cb.on_page_complete(1, 5, 42);
        cb.on_page_error(2, 5, "some error");
        cb.on_pause_start(2, 10);
        cb.on_pause_end(2);
        cb.on_batch_complete(5, 4);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let t = TrackingCallback {
            starts: AtomicUsize::new(0),
            completes: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            pauses: AtomicUsize::new(0),
            pause_ends: AtomicUsize::new(0),
        };

        t.on_page_start(1, 2);
        t.on_page_complete(1, 2, 100);
        t.on_pause_start(1, 10);
        t.on_pause_end(1);
        t.on_page_start(2, 2);
        t.on_page_error(2, 2, "quota");

        assert_eq!(t.starts.load(Ordering::SeqCst), 2);
        assert_eq!(t.completes.load(Ordering::SeqCst), 1);
        assert_eq!(t.errors.load(Ordering::SeqCst), 1);
        assert_eq!(t.pauses.load(Ordering::SeqCst), 1);
        assert_eq!(t.pause_ends.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_batch_start(10);
        cb.on_page_start(1, 10);
    }
}
