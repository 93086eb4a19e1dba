use clap::ValueEnum;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use stars::github::GitHubClient;
use stars::{
    ChainedCredentials, CredentialProvider, NetrcCredentials, StarManager, StaticCredentials,
    SyncOptions, bootstrap, connect_and_migrate,
};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::progress;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Display as a formatted table (default)
    #[default]
    Table,
    /// Display as JSON
    Json,
}

pub(crate) type Manager = StarManager<GitHubClient>;

/// Print rows as a rounded table or as pretty JSON.
pub(crate) fn print_rows<T>(rows: &[T], format: OutputFormat) -> Result<(), serde_json::Error>
where
    T: Serialize + tabled::Tabled,
{
    match format {
        OutputFormat::Table => {
            let mut table = tabled::Table::new(rows);
            table.with(tabled::settings::Style::rounded());
            println!("{}", table);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(rows)?);
        }
    }
    Ok(())
}

/// Configured token first, then `~/.netrc`.
pub(crate) fn credential_provider(config: &Config) -> ChainedCredentials {
    let mut chain = ChainedCredentials::new().with(StaticCredentials::new(
        config.github_username().unwrap_or_default(),
        config.github_token().unwrap_or_default(),
    ));
    if let Some(path) = Config::default_netrc_path() {
        chain = chain.with(NetrcCredentials::new(path));
    }
    chain
}

/// Open the store, creating the cache file first if it is the default one.
pub(crate) async fn open_database(
    config: &Config,
) -> Result<DatabaseConnection, Box<dyn std::error::Error>> {
    if let Some(path) = config.sqlite_path() {
        bootstrap::ensure_cache_file(&path);
    }

    let database_url = config
        .database_url()
        .ok_or("Could not determine the database location; set STARS_DATABASE_URL")?;
    tracing::debug!(database_url = %database_url, "Opening database");
    Ok(connect_and_migrate(&database_url).await?)
}

/// Resolve credentials and build a manager for the configured account.
pub(crate) async fn open_manager(
    config: &Config,
    token: CancellationToken,
) -> Result<Manager, Box<dyn std::error::Error>> {
    let host = config.github_host();
    let credentials = credential_provider(config).credentials(&host)?;
    let client = GitHubClient::with_api_base(&credentials.token, &config.github_api_base())?;

    let username = match config.github_username() {
        Some(username) => username,
        None if !credentials.username.is_empty() => credentials.username.clone(),
        None => client.authenticated_username().await?,
    };
    tracing::debug!(username = %username, host = %host, "Resolved GitHub account");

    let db = open_database(config).await?;
    let options = SyncOptions {
        concurrency: config.sync.concurrency,
        ..Default::default()
    };

    Ok(StarManager::new(db, client, username)
        .with_sync_options(options)
        .with_cancellation(token)
        .with_progress(progress::callback()))
}

/// Populate an empty mirror before a read-only command.
pub(crate) async fn ensure_populated(manager: &Manager) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(report) = manager.sync_if_empty().await?
        && !report.is_complete()
    {
        tracing::warn!(
            saved = report.saved,
            failures = report.failures.len(),
            failed_pages = report.failed_pages.len(),
            "Initial sync was incomplete"
        );
    }
    Ok(())
}

/// Shorten `text` to at most `max` characters, marking the cut with an ellipsis.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly", 7), "exactly");
        assert_eq!(truncate("a longer sentence", 8), "a longe…");
        assert_eq!(truncate("ünïcödé", 4), "ünï…");
    }

    #[test]
    fn test_configured_token_wins() {
        let mut config = Config::default();
        config.github.username = Some("octocat".to_string());
        config.github.token = Some("ghp_configured".to_string());

        let credentials = credential_provider(&config)
            .credentials("api.github.com")
            .unwrap();
        assert_eq!(credentials.username, "octocat");
        assert_eq!(credentials.token, "ghp_configured");
    }
}
