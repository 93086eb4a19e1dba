//! Full-sync orchestration.
//!
//! Page 1 is fetched first to learn the page count; pages 2..=last are then
//! fetched concurrently, bounded by a semaphore. Every spawned page is
//! awaited before the sync returns.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::gateway::{self, GatewayError, StarGateway, short_error_message};
use crate::repository;

use super::fetch::fetch_page;
use super::progress::{ProgressCallback, SyncProgress, emit};
use super::types::{PageFailure, PageReport, SyncOptions, SyncReport};

fn record_page(report: &mut SyncReport, page: PageReport, on_progress: Option<&ProgressCallback>) {
    emit(
        on_progress,
        SyncProgress::FetchedPage {
            page: page.page,
            count: page.fetched,
            last_page: page.meta.last_page,
        },
    );
    for failure in &page.failures {
        emit(
            on_progress,
            SyncProgress::SaveFailed {
                url: failure.url.clone(),
                error: failure.error.clone(),
            },
        );
    }
    report.absorb(page);
}

/// Fetch every page of `username`'s stars and upsert them.
///
/// Fails only if page 1 cannot be fetched. Failures on later pages and on
/// individual records are collected in the returned [`SyncReport`]. If
/// `token` is cancelled mid-sync the records already saved stay saved and
/// the report is marked `cancelled`.
#[tracing::instrument(skip_all, fields(username = %username))]
pub async fn sync_all<G: StarGateway + 'static>(
    gateway: Arc<G>,
    db: Arc<DatabaseConnection>,
    username: &str,
    options: &SyncOptions,
    token: &CancellationToken,
    on_progress: Option<&ProgressCallback>,
) -> Result<SyncReport> {
    emit(
        on_progress,
        SyncProgress::SyncStarted {
            username: username.to_string(),
        },
    );

    let per_page = options.per_page;
    let first = fetch_page(gateway.as_ref(), &db, username, 1, per_page, token).await?;
    let last_page = first.meta.last_page;
    tracing::info!(last_page, "Fetched first page");

    let mut report = SyncReport {
        pages: last_page,
        ..Default::default()
    };
    record_page(&mut report, first, on_progress);

    let semaphore = Arc::new(Semaphore::new(options.concurrency.max(1)));
    let mut handles: Vec<(u32, JoinHandle<gateway::Result<PageReport>>)> =
        Vec::with_capacity(last_page.saturating_sub(1) as usize);

    for page in 2..=last_page {
        let gateway = Arc::clone(&gateway);
        let db = Arc::clone(&db);
        let semaphore = Arc::clone(&semaphore);
        let token = token.clone();
        let username = username.to_string();

        let handle = tokio::spawn(async move {
            let _permit = match semaphore.acquire().await {
                Ok(permit) => permit,
                Err(_) => return Err(GatewayError::internal("Semaphore closed unexpectedly")),
            };
            fetch_page(gateway.as_ref(), &db, &username, page, per_page, &token).await
        });

        handles.push((page, handle));
    }

    for (page, handle) in handles {
        match handle.await {
            Ok(Ok(page_report)) => record_page(&mut report, page_report, on_progress),
            Ok(Err(GatewayError::Cancelled)) => report.cancelled = true,
            Ok(Err(e)) => {
                tracing::warn!(page, error = %e, "Failed to fetch page");
                let error = short_error_message(&e);
                emit(
                    on_progress,
                    SyncProgress::PageFailed {
                        page,
                        error: error.clone(),
                    },
                );
                report.failed_pages.push(PageFailure { page, error });
            }
            Err(e) => {
                report.failed_pages.push(PageFailure {
                    page,
                    error: format!("Task panic: {e}"),
                });
            }
        }
    }

    if report.cancelled {
        tracing::warn!(saved = report.saved, "Sync cancelled");
    }

    emit(
        on_progress,
        SyncProgress::SyncComplete {
            saved: report.saved,
            failures: report.failures.len() + report.failed_pages.len(),
        },
    );
    tracing::info!(
        pages = report.pages,
        saved = report.saved,
        failures = report.failures.len(),
        failed_pages = report.failed_pages.len(),
        "Sync complete"
    );

    Ok(report)
}

/// Run [`sync_all`] only when the store holds no stars.
///
/// Returns `None` when the store was already populated.
pub async fn sync_if_empty<G: StarGateway + 'static>(
    gateway: Arc<G>,
    db: Arc<DatabaseConnection>,
    username: &str,
    options: &SyncOptions,
    token: &CancellationToken,
    on_progress: Option<&ProgressCallback>,
) -> Result<Option<SyncReport>> {
    let existing = repository::count(&db).await?;
    if existing > 0 {
        tracing::debug!(existing, "Store already populated, skipping sync");
        return Ok(None);
    }

    sync_all(gateway, db, username, options, token, on_progress)
        .await
        .map(Some)
}
