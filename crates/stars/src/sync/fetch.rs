//! Single-page fetch and normalization.

use chrono::Utc;
use sea_orm::DatabaseConnection;
use tokio_util::sync::CancellationToken;

use crate::gateway::{self, RemoteRepo, StarGateway, short_error_message};
use crate::repository;

use super::cancel::or_cancel;
use super::types::{PageReport, RecordFailure};

/// Fetch one page and upsert every record on it.
///
/// A gateway failure is returned as-is, without retry. Store failures are
/// per record: they are collected in the report and the rest of the page
/// is still saved.
pub async fn fetch_page<G: StarGateway + ?Sized>(
    gateway: &G,
    db: &DatabaseConnection,
    username: &str,
    page: u32,
    per_page: u32,
    token: &CancellationToken,
) -> gateway::Result<PageReport> {
    let starred = or_cancel(token, gateway.list_starred(username, page, per_page)).await?;
    let fetched = starred.repos.len();
    let (saved, failures) = save_repos(db, &starred.repos).await;

    Ok(PageReport {
        page,
        meta: starred.meta,
        fetched,
        saved,
        failures,
    })
}

/// Upsert `repos` one by one, collecting failures.
pub async fn save_repos(
    db: &DatabaseConnection,
    repos: &[RemoteRepo],
) -> (usize, Vec<RecordFailure>) {
    let synced_at = Utc::now();
    let mut saved = 0;
    let mut failures = Vec::new();

    for repo in repos {
        match repository::upsert(db, repo.to_active_model(synced_at)).await {
            Ok(()) => saved += 1,
            Err(e) => {
                tracing::warn!(url = %repo.url, error = %e, "Failed to save star");
                failures.push(RecordFailure {
                    url: repo.url.clone(),
                    error: short_error_message(&e),
                });
            }
        }
    }

    (saved, failures)
}
