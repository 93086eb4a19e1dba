use stars::SyncProgress;

/// Logging reporter using tracing for structured output.
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, event: SyncProgress) {
        match event {
            SyncProgress::SyncStarted { username } => {
                tracing::info!(username = %username, "Syncing starred repositories");
            }

            SyncProgress::FetchedPage {
                page,
                count,
                last_page,
            } => {
                tracing::debug!(page, count, last_page, "Fetched page");
            }

            SyncProgress::PageFailed { page, error } => {
                tracing::warn!(page, error = %error, "Failed to fetch page");
            }

            SyncProgress::SaveFailed { url, error } => {
                tracing::warn!(url = %url, error = %error, "Failed to save");
            }

            SyncProgress::SyncComplete { saved, failures } => {
                tracing::info!(saved, failures, "Sync complete");
            }

            SyncProgress::CleanupQueued { count } => {
                tracing::info!(count, "Queued stars for removal");
            }

            SyncProgress::Removed { url } => {
                tracing::info!(url = %url, "Removed");
            }

            SyncProgress::RemovalFailed { url, error } => {
                tracing::warn!(url = %url, error = %error, "Failed to remove");
            }

            SyncProgress::CleanupComplete { removed, failures } => {
                tracing::info!(removed, failures, "Cleanup complete");
            }

            _ => {}
        }
    }
}

impl Default for LoggingReporter {
    fn default() -> Self {
        Self::new()
    }
}
