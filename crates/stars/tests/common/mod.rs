//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, Set};
use stars::entity::star::ActiveModel;
use stars::gateway::Result as GatewayResult;
use stars::{GatewayError, PageMeta, RemoteRepo, StarGateway, StarredPage, connect_and_migrate};

/// Maximum time any engine operation should take in tests.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Create an in-memory SQLite database with migrations applied.
pub async fn setup_test_db() -> DatabaseConnection {
    connect_and_migrate("sqlite::memory:")
        .await
        .expect("Failed to create test database")
}

pub fn github_url(owner: &str, name: &str) -> String {
    format!("https://github.com/{owner}/{name}")
}

/// A remote repository with sensible defaults.
pub fn remote(owner: &str, name: &str) -> RemoteRepo {
    RemoteRepo {
        url: github_url(owner, name),
        language: Some("Rust".to_string()),
        description: Some(format!("{owner}/{name}")),
        stargazers: 10,
        archived: false,
        pushed_at: Some(Utc::now()),
        updated_at: None,
        created_at: None,
        topics: vec![],
    }
}

/// `pages` pages of `per_page` distinct repositories each.
pub fn remote_pages(pages: usize, per_page: usize) -> Vec<Vec<RemoteRepo>> {
    (1..=pages)
        .map(|page| {
            (0..per_page)
                .map(|i| remote(&format!("owner-{page}"), &format!("repo-{i}")))
                .collect()
        })
        .collect()
}

/// A store record for seeding query and cleanup tests.
pub fn stored(
    url: &str,
    language: &str,
    stargazers: i32,
    archived: bool,
    pushed_at: DateTime<Utc>,
    topics: &[&str],
) -> ActiveModel {
    ActiveModel {
        url: Set(url.to_string()),
        pushed_at: Set(pushed_at.fixed_offset()),
        language: Set(language.to_string()),
        stargazers: Set(stargazers),
        archived: Set(archived),
        description: Set(String::new()),
        topics: Set(serde_json::json!(topics)),
        synced_at: Set(Utc::now().fixed_offset()),
    }
}

/// Gateway double backed by in-memory pages.
///
/// Page `n` (1-based) serves `pages[n - 1]`; the reported last page is the
/// number of pages. Unstar succeeds unless a result was set for the repo.
#[derive(Clone, Default)]
pub struct TestGateway {
    pages: Arc<Mutex<Vec<Vec<RemoteRepo>>>>,
    page_errors: Arc<Mutex<HashMap<u32, GatewayError>>>,
    stalled_pages: Arc<Mutex<HashSet<u32>>>,
    unstar_results: Arc<Mutex<HashMap<String, GatewayResult<()>>>>,
    list_calls: Arc<Mutex<Vec<u32>>>,
    unstar_calls: Arc<Mutex<Vec<String>>>,
}

impl TestGateway {
    pub fn with_pages(pages: Vec<Vec<RemoteRepo>>) -> Self {
        let gateway = Self::default();
        *gateway.pages.lock().unwrap_or_else(|e| e.into_inner()) = pages;
        gateway
    }

    fn key(owner: &str, name: &str) -> String {
        format!("{owner}/{name}")
    }

    pub fn fail_page(&self, page: u32, error: GatewayError) {
        self.page_errors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(page, error);
    }

    /// Make `page` never complete.
    pub fn stall_page(&self, page: u32) {
        self.stalled_pages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(page);
    }

    pub fn set_unstar_result(&self, owner: &str, name: &str, value: GatewayResult<()>) {
        self.unstar_results
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(Self::key(owner, name), value);
    }

    pub fn list_calls(&self) -> Vec<u32> {
        self.list_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn unstar_calls(&self) -> Vec<String> {
        self.unstar_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl StarGateway for TestGateway {
    async fn list_starred(
        &self,
        _username: &str,
        page: u32,
        _per_page: u32,
    ) -> GatewayResult<StarredPage> {
        self.list_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(page);

        let stalled = self
            .stalled_pages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&page);
        if stalled {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }

        if let Some(err) = self
            .page_errors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&page)
        {
            return Err(err);
        }

        let pages = self.pages.lock().unwrap_or_else(|e| e.into_inner());
        let last_page = pages.len().max(1) as u32;
        let repos = pages
            .get(page as usize - 1)
            .cloned()
            .unwrap_or_default();

        Ok(StarredPage {
            repos,
            meta: PageMeta { last_page },
        })
    }

    async fn unstar(&self, owner: &str, name: &str) -> GatewayResult<()> {
        let key = Self::key(owner, name);
        self.unstar_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(key.clone());
        self.unstar_results
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&key)
            .unwrap_or(Ok(()))
    }
}
