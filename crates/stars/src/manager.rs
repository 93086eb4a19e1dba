//! `StarManager`: one handle over the store, the gateway and the engine.

use std::sync::Arc;

use rand::Rng;
use sea_orm::DatabaseConnection;
use tokio_util::sync::CancellationToken;

use crate::entity::star::Model as Star;
use crate::error::Result;
use crate::gateway::StarGateway;
use crate::query::{self, SelectOptions, TopicFrequency};
use crate::reconcile::{self, CleanupOptions, CleanupReport};
use crate::repository;
use crate::sync::{self, ProgressCallback, SyncOptions, SyncReport};

/// Owns everything the engine operations need for one user.
///
/// Cloning is not supported; share it behind an `Arc` if needed.
pub struct StarManager<G: StarGateway + 'static> {
    db: Arc<DatabaseConnection>,
    gateway: Arc<G>,
    username: String,
    token: CancellationToken,
    sync_options: SyncOptions,
    on_progress: Option<ProgressCallback>,
}

impl<G: StarGateway + 'static> StarManager<G> {
    pub fn new(db: DatabaseConnection, gateway: G, username: impl Into<String>) -> Self {
        Self::from_shared(Arc::new(db), Arc::new(gateway), username)
    }

    /// Build a manager over already-shared handles.
    pub fn from_shared(
        db: Arc<DatabaseConnection>,
        gateway: Arc<G>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            db,
            gateway,
            username: username.into(),
            token: CancellationToken::new(),
            sync_options: SyncOptions::default(),
            on_progress: None,
        }
    }

    #[must_use]
    pub fn with_sync_options(mut self, options: SyncOptions) -> Self {
        self.sync_options = options;
        self
    }

    /// Use `token` for every gateway call made by this manager.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    /// Fetch every page of stars and upsert them.
    pub async fn sync_all(&self) -> Result<SyncReport> {
        sync::sync_all(
            Arc::clone(&self.gateway),
            Arc::clone(&self.db),
            &self.username,
            &self.sync_options,
            &self.token,
            self.on_progress.as_ref(),
        )
        .await
    }

    /// Sync only if the store is empty. `None` means it was skipped.
    pub async fn sync_if_empty(&self) -> Result<Option<SyncReport>> {
        sync::sync_if_empty(
            Arc::clone(&self.gateway),
            Arc::clone(&self.db),
            &self.username,
            &self.sync_options,
            &self.token,
            self.on_progress.as_ref(),
        )
        .await
    }

    /// Delete every record from the store. Returns the number deleted.
    pub async fn clear_cache(&self) -> Result<u64> {
        let deleted = repository::delete_all(&self.db).await?;
        tracing::info!(deleted, "Cleared local cache");
        Ok(deleted)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(repository::count(&self.db).await?)
    }

    pub async fn topic_frequencies(&self) -> Result<Vec<TopicFrequency>> {
        query::topic_frequencies(&self.db).await
    }

    pub async fn select_projects<R: Rng + ?Sized>(
        &self,
        options: &SelectOptions,
        rng: &mut R,
    ) -> Result<Vec<Star>> {
        query::select_projects(&self.db, options, rng).await
    }

    /// Unstar `url` remotely, then delete it locally.
    pub async fn remove_one(&self, url: &str) -> Result<()> {
        reconcile::remove_one(self.gateway.as_ref(), &self.db, url, &self.token).await
    }

    /// Remove every star pushed more than `age_months` ago or whose
    /// archived flag equals `archived`.
    pub async fn cleanup_sweep(&self, age_months: u32, archived: bool) -> Result<CleanupReport> {
        let options = CleanupOptions {
            age_months,
            archived,
            concurrency: self.sync_options.concurrency,
        };
        reconcile::cleanup_sweep(
            Arc::clone(&self.gateway),
            Arc::clone(&self.db),
            &options,
            &self.token,
            self.on_progress.as_ref(),
        )
        .await
    }
}
