//! Monthly usage: a local counter per device and an optional shared
//! site-wide counter. The two are never reconciled.

pub mod remote;
pub mod tracker;
pub mod types;

pub use remote::{SiteWideCounter, display_line};
pub use tracker::{JsonFileUsageStore, MemoryUsageStore, UsageCounter, UsageStore};
pub use types::{UsageRecord, month_key};

use chrono::Utc;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Counts successful completions locally and forwards them to the shared
/// counter in the background.
///
/// Remote increments never block or fail the caller. They are tracked until
/// [`UsageTracker::flush`] waits for them, so a short-lived process can let
/// them land before its runtime shuts down.
pub struct UsageTracker {
    local: Mutex<UsageCounter>,
    remote: Option<Arc<SiteWideCounter>>,
    pending: Mutex<Vec<JoinHandle<Option<u64>>>>,
}

impl UsageTracker {
    pub fn new(local: UsageCounter) -> Self {
        Self {
            local: Mutex::new(local),
            remote: None,
            pending: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_remote(mut self, remote: SiteWideCounter) -> Self {
        self.remote = Some(Arc::new(remote));
        self
    }

    pub fn local_count(&self) -> u64 {
        self.local
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current()
            .count
    }

    /// Bump the local counter and spawn the remote increment.
    ///
    /// Returns `true` when a site-wide sync was scheduled.
    pub fn record_success(&self) -> bool {
        let month = {
            let mut local = self.local.lock().unwrap_or_else(PoisonError::into_inner);
            match local.increment(1) {
                Ok(record) => record.month,
                Err(e) => {
                    tracing::warn!("Failed to persist local usage: {e:#}");
                    types::month_key(Utc::now())
                }
            }
        };

        let Some(remote) = self.remote.as_ref().map(Arc::clone) else {
            return false;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("No async runtime; skipping site-wide usage sync");
            return false;
        };
        let handle = runtime.spawn(async move { remote.increment(&month, 1).await });

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
        true
    }

    /// Syncs spawned by `record_success` that have not been flushed yet.
    pub fn pending_syncs(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|h| !h.is_finished())
            .count()
    }

    /// Wait up to `timeout` for outstanding site-wide syncs.
    ///
    /// Returns how many finished. Syncs still running at the deadline are
    /// abandoned with a warning.
    pub async fn flush(&self, timeout: Duration) -> usize {
        let pending = std::mem::take(
            &mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner),
        );
        if pending.is_empty() {
            return 0;
        }

        let total = pending.len();
        let mut finished = 0;
        let wait = async {
            for handle in pending {
                if handle.await.is_ok() {
                    finished += 1;
                }
            }
        };
        if tokio::time::timeout(timeout, wait).await.is_err() {
            tracing::warn!(
                abandoned = total - finished,
                "Site-wide usage sync did not finish in time"
            );
        }
        finished
    }

    /// Shared count for this month, or `None` when unconfigured or unreachable.
    pub async fn site_wide(&self) -> Option<u64> {
        let remote = self.remote.as_ref()?;
        remote.fetch(&month_key(Utc::now())).await
    }

    pub async fn display_line(&self, quota: u64) -> String {
        let site_wide = self.site_wide().await;
        display_line(site_wide, self.local_count(), quota)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_only() -> UsageTracker {
        UsageTracker::new(UsageCounter::new(Box::new(MemoryUsageStore::new())))
    }

    #[test]
    fn record_success_without_remote_only_counts_locally() {
        let tracker = local_only();
        assert!(!tracker.record_success());
        assert!(!tracker.record_success());
        assert_eq!(tracker.local_count(), 2);
        assert_eq!(tracker.pending_syncs(), 0);
    }

    #[test]
    fn flush_without_pending_syncs_returns_immediately() {
        let tracker = local_only();
        let finished = tokio_test::block_on(tracker.flush(Duration::from_millis(10)));
        assert_eq!(finished, 0);
        assert_eq!(tokio_test::block_on(tracker.site_wide()), None);
    }

    #[tokio::test]
    async fn unreachable_remote_falls_back_to_local_display() {
        let tracker = local_only()
            .with_remote(SiteWideCounter::new("http://127.0.0.1:9/usage", "secret"));
        assert!(tracker.record_success());

        assert_eq!(tracker.flush(Duration::from_secs(10)).await, 1);
        assert_eq!(tracker.pending_syncs(), 0);
        assert_eq!(
            tracker.display_line(1500).await,
            "This month: 1/1500 (this device)"
        );
    }
}
