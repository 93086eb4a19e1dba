//! Progress reporting for sync and cleanup operations.
//!
//! Events are emitted from the coordinating task, never from spawned
//! workers, so callbacks observe them in a single sequence.

/// Progress events emitted during sync and cleanup.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum SyncProgress {
    /// Starting a full sync.
    SyncStarted {
        /// Whose stars are being synced.
        username: String,
    },

    /// A page was fetched and its records processed.
    FetchedPage {
        /// Page number (1-indexed).
        page: u32,
        /// Number of records on this page.
        count: usize,
        /// Last page index as reported by the remote.
        last_page: u32,
    },

    /// A page could not be fetched.
    PageFailed {
        /// Page number (1-indexed).
        page: u32,
        /// Error message.
        error: String,
    },

    /// A fetched record could not be saved.
    SaveFailed {
        /// URL of the record.
        url: String,
        /// Error message.
        error: String,
    },

    /// Full sync finished.
    SyncComplete {
        /// Records saved.
        saved: usize,
        /// Records or pages that failed.
        failures: usize,
    },

    /// Records selected for removal by a cleanup sweep.
    CleanupQueued {
        /// Number of records queued.
        count: usize,
    },

    /// A record was unstarred and deleted.
    Removed {
        /// URL of the record.
        url: String,
    },

    /// Removing a record failed.
    RemovalFailed {
        /// URL of the record.
        url: String,
        /// Error message.
        error: String,
    },

    /// Cleanup sweep finished.
    CleanupComplete {
        /// Records removed.
        removed: usize,
        /// Records that failed.
        failures: usize,
    },
}

/// Callback for progress updates during sync operations.
pub type ProgressCallback = Box<dyn Fn(SyncProgress) + Send + Sync>;

/// Emit a progress event if a callback is provided.
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, event: SyncProgress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_emit_with_callback() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);

        let callback: ProgressCallback = Box::new(move |_event| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        emit(
            Some(&callback),
            SyncProgress::FetchedPage {
                page: 1,
                count: 100,
                last_page: 3,
            },
        );
        emit(
            Some(&callback),
            SyncProgress::SyncComplete {
                saved: 100,
                failures: 0,
            },
        );

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_emit_without_callback() {
        emit(
            None,
            SyncProgress::Removed {
                url: "https://github.com/o/ignored".to_string(),
            },
        );
    }

    #[test]
    fn test_sync_progress_debug() {
        let event = SyncProgress::RemovalFailed {
            url: "https://github.com/rust-lang/rust".to_string(),
            error: "Not found".to_string(),
        };

        let debug_str = format!("{:?}", event);
        assert!(debug_str.contains("RemovalFailed"));
        assert!(debug_str.contains("rust-lang"));
    }
}
