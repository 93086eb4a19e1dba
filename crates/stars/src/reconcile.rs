//! Two-sided removal: unstar remotely, then delete locally.
//!
//! A local record is only deleted after the remote unstar succeeded. If the
//! local delete then fails the caller gets a [`StarsError::Consistency`]
//! warning; the remote side is not rolled back.

use std::sync::Arc;

use chrono::{DateTime, Months, Utc};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::{Result, StarsError};
use crate::gateway::{GatewayError, StarGateway, short_error_message};
use crate::repository::{self, Match, StarFilter};
use crate::sync::{
    DEFAULT_CLEANUP_AGE_MONTHS, DEFAULT_CONCURRENCY, ProgressCallback, SyncProgress, emit,
    or_cancel,
};

/// Split a repository URL into `(owner, name)`.
///
/// Accepts `https://github.com/owner/name` with an optional trailing slash
/// or `.git` suffix.
pub fn parse_repo_url(raw: &str) -> Result<(String, String)> {
    let invalid = || StarsError::InvalidUrl {
        url: raw.to_string(),
    };

    let parsed = Url::parse(raw).map_err(|_| invalid())?;
    let mut segments = parsed
        .path_segments()
        .ok_or_else(invalid)?
        .filter(|s| !s.is_empty());

    let owner = segments.next().ok_or_else(invalid)?;
    let name = segments.next().ok_or_else(invalid)?;
    let name = name.strip_suffix(".git").unwrap_or(name);
    if name.is_empty() || segments.next().is_some() {
        return Err(invalid());
    }

    Ok((owner.to_string(), name.to_string()))
}

/// Unstar `url` remotely and, on success, delete it from the store.
///
/// # Errors
/// - [`StarsError::InvalidUrl`] if the URL has no owner/name path.
/// - [`StarsError::Gateway`] or [`StarsError::Cancelled`] if the unstar
///   failed; the local record is untouched.
/// - [`StarsError::Consistency`] if the unstar succeeded but the delete failed.
#[tracing::instrument(skip(gateway, db, token))]
pub async fn remove_one<G: StarGateway + ?Sized>(
    gateway: &G,
    db: &DatabaseConnection,
    url: &str,
    token: &CancellationToken,
) -> Result<()> {
    let (owner, name) = parse_repo_url(url)?;

    if let Err(e) = or_cancel(token, gateway.unstar(&owner, &name)).await {
        tracing::warn!(error = %e, "Failed to unstar, keeping local record");
        return Err(e.into());
    }

    match repository::delete_by_url(db, url).await {
        Ok(0) => tracing::debug!("Unstarred; no local record to delete"),
        Ok(_) => tracing::info!("Removed"),
        Err(source) => {
            tracing::error!(error = %source, "Unstarred but failed to delete local record");
            return Err(StarsError::Consistency {
                url: url.to_string(),
                source,
            });
        }
    }

    Ok(())
}

/// Options for [`cleanup_sweep`].
#[derive(Debug, Clone)]
pub struct CleanupOptions {
    /// Stars last pushed more than this many months ago are removed.
    pub age_months: u32,
    /// Stars whose archived flag equals this value are removed.
    pub archived: bool,
    /// Maximum concurrent removals.
    pub concurrency: usize,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            age_months: DEFAULT_CLEANUP_AGE_MONTHS,
            archived: true,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl CleanupOptions {
    /// The store predicate for this sweep, evaluated at `now`.
    ///
    /// The two conditions are joined with OR. With `archived: false` this
    /// selects every non-archived star regardless of age.
    pub fn filter(&self, now: DateTime<Utc>) -> StarFilter {
        StarFilter {
            archived: Some(self.archived),
            pushed_before: now.checked_sub_months(Months::new(self.age_months)),
            mode: Match::Any,
            ..Default::default()
        }
    }
}

/// A star that a sweep failed to remove.
#[derive(Debug, Clone, Serialize)]
pub struct RemovalFailure {
    pub url: String,
    pub error: String,
    /// The remote star is gone but the local record remains.
    pub consistency: bool,
}

/// Outcome of a cleanup sweep.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanupReport {
    /// Stars selected by the predicate.
    pub queued: usize,
    /// URLs of stars removed on both sides.
    pub removed: Vec<String>,
    /// Stars that could not be removed.
    pub failures: Vec<RemovalFailure>,
}

impl CleanupReport {
    /// Whether every queued star was removed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.removed.len() == self.queued
    }
}

/// Remove every star matching `options` on both sides, concurrently.
///
/// Every matching star is handed to a task before any result is read, and
/// the sweep returns only after all of them finished. Individual failures
/// never stop the sweep; they are collected in the report.
///
/// # Errors
/// Fails only if the initial store query fails.
#[tracing::instrument(skip_all, fields(age_months = options.age_months, archived = options.archived))]
pub async fn cleanup_sweep<G: StarGateway + 'static>(
    gateway: Arc<G>,
    db: Arc<DatabaseConnection>,
    options: &CleanupOptions,
    token: &CancellationToken,
    on_progress: Option<&ProgressCallback>,
) -> Result<CleanupReport> {
    let candidates = repository::find_matching(&db, &options.filter(Utc::now())).await?;
    let mut report = CleanupReport {
        queued: candidates.len(),
        ..Default::default()
    };

    tracing::info!(queued = report.queued, "Queued stars for removal");
    emit(
        on_progress,
        SyncProgress::CleanupQueued {
            count: report.queued,
        },
    );

    let semaphore = Arc::new(Semaphore::new(options.concurrency.max(1)));
    let mut handles: Vec<(String, JoinHandle<Result<()>>)> = Vec::with_capacity(candidates.len());

    for star in candidates {
        tracing::debug!(
            url = %star.url,
            pushed_at = %star.pushed_at,
            archived = star.archived,
            "Queueing star for removal"
        );

        let gateway = Arc::clone(&gateway);
        let db = Arc::clone(&db);
        let semaphore = Arc::clone(&semaphore);
        let token = token.clone();
        let url = star.url.clone();

        let handle = tokio::spawn(async move {
            let _permit = semaphore.acquire().await.map_err(|_| {
                StarsError::Gateway(GatewayError::internal("Semaphore closed unexpectedly"))
            })?;
            remove_one(gateway.as_ref(), &db, &url, &token).await
        });

        handles.push((star.url, handle));
    }

    for (url, handle) in handles {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                report.failures.push(RemovalFailure {
                    url,
                    error: format!("Task panic: {e}"),
                    consistency: false,
                });
                continue;
            }
        };

        match outcome {
            Ok(()) => {
                emit(on_progress, SyncProgress::Removed { url: url.clone() });
                report.removed.push(url);
            }
            Err(e) => {
                let error = short_error_message(&e);
                emit(
                    on_progress,
                    SyncProgress::RemovalFailed {
                        url: url.clone(),
                        error: error.clone(),
                    },
                );
                report.failures.push(RemovalFailure {
                    url,
                    error,
                    consistency: e.is_consistency_warning(),
                });
            }
        }
    }

    emit(
        on_progress,
        SyncProgress::CleanupComplete {
            removed: report.removed.len(),
            failures: report.failures.len(),
        },
    );
    tracing::info!(
        removed = report.removed.len(),
        failures = report.failures.len(),
        "Cleanup complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_parse_repo_url() {
        assert_eq!(
            parse_repo_url("https://github.com/rust-lang/rust").expect("valid url"),
            ("rust-lang".to_string(), "rust".to_string())
        );
        assert_eq!(
            parse_repo_url("https://github.com/rust-lang/rust/").expect("valid url"),
            ("rust-lang".to_string(), "rust".to_string())
        );
        assert_eq!(
            parse_repo_url("https://github.com/o/r.git").expect("valid url"),
            ("o".to_string(), "r".to_string())
        );
    }

    #[test]
    fn test_parse_repo_url_rejects_malformed() {
        for raw in [
            "",
            "not a url",
            "https://github.com/",
            "https://github.com/only-owner",
            "https://github.com/o/r/tree/main",
        ] {
            assert!(
                matches!(parse_repo_url(raw), Err(StarsError::InvalidUrl { .. })),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_cleanup_filter_is_or_of_age_and_archived() {
        let now = Utc.with_ymd_and_hms(2025, 3, 31, 0, 0, 0).unwrap();
        let filter = CleanupOptions {
            age_months: 1,
            archived: false,
            ..Default::default()
        }
        .filter(now);

        assert_eq!(filter.mode, Match::Any);
        assert_eq!(filter.archived, Some(false));
        assert_eq!(
            filter.pushed_before,
            Some(Utc.with_ymd_and_hms(2025, 2, 28, 0, 0, 0).unwrap())
        );
        assert_eq!(filter.language, None);
    }

    #[test]
    fn test_cleanup_report_is_complete() {
        let mut report = CleanupReport {
            queued: 1,
            removed: vec!["https://github.com/o/r".to_string()],
            failures: vec![],
        };
        assert!(report.is_complete());

        report.queued = 2;
        report.failures.push(RemovalFailure {
            url: "https://github.com/o/s".to_string(),
            error: "Not found".to_string(),
            consistency: false,
        });
        assert!(!report.is_complete());
    }
}
