//! Inter-call pacing policy for the batch loop.
//!
//! The external recognition service is rate-limited, so the orchestrator
//! waits a fixed interval between successive page calls. The wait is a
//! plain policy value injected through
//! [`crate::config::ConversionConfig::pacing`] rather than a sleep call
//! buried in the loop, so tests can substitute [`PacingPolicy::none`]
//! without changing control flow. The delay is flat: it does not adapt and
//! does not back off on error.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed delay inserted between successive recognition calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingPolicy {
    /// The flat inter-call delay. Zero disables pacing entirely.
    pub delay: Duration,
}

impl PacingPolicy {
    /// A flat delay of `secs` seconds between pages.
    pub fn fixed_secs(secs: u64) -> Self {
        Self {
            delay: Duration::from_secs(secs),
        }
    }

    /// No pacing at all. Intended for tests and offline providers.
    pub fn none() -> Self {
        Self {
            delay: Duration::ZERO,
        }
    }

    /// The pause to take after processing page `index` (0-based) out of
    /// `total` pages.
    ///
    /// Returns `None` after the final page — a single-page batch never
    /// waits — and `None` when the configured delay is zero.
    pub fn delay_after(&self, index: usize, total: usize) -> Option<Duration> {
        if self.delay.is_zero() || index + 1 >= total {
            None
        } else {
            Some(self.delay)
        }
    }
}

impl Default for PacingPolicy {
    /// 10 seconds, the rate-limit headroom the recognition service needs.
    fn default() -> Self {
        Self::fixed_secs(crate::config::DEFAULT_PAGE_DELAY_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_delay_after_last_page() {
        let p = PacingPolicy::fixed_secs(10);
        assert_eq!(p.delay_after(2, 3), None);
    }

    #[test]
    fn single_page_never_waits() {
        let p = PacingPolicy::fixed_secs(10);
        assert_eq!(p.delay_after(0, 1), None);
    }

    #[test]
    fn delay_between_pages() {
        let p = PacingPolicy::fixed_secs(10);
        assert_eq!(p.delay_after(0, 3), Some(Duration::from_secs(10)));
        assert_eq!(p.delay_after(1, 3), Some(Duration::from_secs(10)));
    }

    #[test]
    fn none_policy_disables_pacing() {
        let p = PacingPolicy::none();
        assert_eq!(p.delay_after(0, 5), None);
        assert_eq!(p.delay_after(3, 5), None);
    }

    #[test]
    fn default_is_ten_seconds() {
        assert_eq!(PacingPolicy::default().delay, Duration::from_secs(10));
    }
}
