//! Configuration file support for stars.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `STARS_`, e.g., `STARS_GITHUB_TOKEN`)
//! 3. Local config file (./stars.toml)
//! 4. XDG config file (~/.config/stars/config.toml)
//! 5. Built-in defaults
//!
//! The database defaults to `sqlite://~/.cache/stars.db?mode=rwc`.
//!
//! Example config file:
//! ```toml
//! [database]
//! url = "sqlite:///home/me/.cache/stars.db?mode=rwc"  # optional, this is the default
//!
//! [github]
//! username = "octocat"   # optional, looked up from the token otherwise
//! token = "ghp_..."      # or STARS_GITHUB_TOKEN, or ~/.netrc
//! host = "api.github.com"
//!
//! [sync]
//! concurrency = 8
//!
//! [cleanup]
//! age_months = 12
//! archived = true
//! ```

use std::path::PathBuf;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::{BaseDirs, ProjectDirs};
use serde::Deserialize;
use stars::bootstrap;
use stars::github::{DEFAULT_API_BASE, DEFAULT_API_HOST};
use stars::sync::{DEFAULT_CLEANUP_AGE_MONTHS, DEFAULT_CONCURRENCY};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub github: GitHubConfig,
    pub sync: SyncConfig,
    pub cleanup: CleanupConfig,
}

/// Database configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database connection URL.
    /// Defaults to the cache file under the home directory.
    pub url: Option<String>,
}

/// GitHub configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Account whose stars are mirrored.
    pub username: Option<String>,
    /// Personal access token.
    /// Can also be set via STARS_GITHUB_TOKEN or a netrc entry.
    pub token: Option<String>,
    /// API host, e.g. `api.github.com` or a GitHub Enterprise host.
    pub host: Option<String>,
}

/// Default sync options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Maximum concurrent API requests.
    pub concurrency: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Default cleanup criteria.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Remove stars not pushed to within this many months.
    pub age_months: u32,
    /// Remove stars whose archived flag equals this value.
    pub archived: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            age_months: DEFAULT_CLEANUP_AGE_MONTHS,
            archived: true,
        }
    }
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(xdg_config) = Self::default_config_path()
            && xdg_config.exists()
        {
            tracing::debug!("Loading config from {:?}", xdg_config);
            builder = builder.add_source(
                File::from(xdg_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let local_config = PathBuf::from("stars.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./stars.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // STARS_GITHUB_TOKEN -> github.token
        builder = builder.add_source(
            Environment::with_prefix("STARS")
                .prefix_separator("_")
                .separator("_")
                .try_parsing(true),
        );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Path of the cache file when no database URL is configured.
    pub fn default_cache_path() -> Option<PathBuf> {
        BaseDirs::new().map(|dirs| bootstrap::default_cache_path(dirs.home_dir()))
    }

    /// Path of the user's netrc file.
    pub fn default_netrc_path() -> Option<PathBuf> {
        BaseDirs::new().map(|dirs| dirs.home_dir().join(".netrc"))
    }

    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "stars").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// The configured database URL, or the default cache file.
    pub fn database_url(&self) -> Option<String> {
        self.database.url.clone().or_else(|| {
            Self::default_cache_path().map(|path| bootstrap::sqlite_url(&path))
        })
    }

    /// The configured SQLite file, if the database is one.
    pub fn sqlite_path(&self) -> Option<PathBuf> {
        match &self.database.url {
            Some(url) => url
                .strip_prefix("sqlite://")
                .map(|rest| rest.split('?').next().unwrap_or(rest))
                .filter(|path| !path.is_empty() && !path.starts_with(':'))
                .map(PathBuf::from),
            None => Self::default_cache_path(),
        }
    }

    /// Host used for credential lookup.
    pub fn github_host(&self) -> String {
        self.github
            .host
            .clone()
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| DEFAULT_API_HOST.to_string())
    }

    /// REST API base URL for the configured host.
    pub fn github_api_base(&self) -> String {
        let host = self.github_host();
        if host.starts_with("http://") || host.starts_with("https://") {
            host
        } else if host == DEFAULT_API_HOST {
            DEFAULT_API_BASE.to_string()
        } else {
            format!("https://{host}/api/v3")
        }
    }

    pub fn github_username(&self) -> Option<String> {
        self.github.username.clone().filter(|u| !u.is_empty())
    }

    pub fn github_token(&self) -> Option<String> {
        self.github.token.clone().filter(|t| !t.is_empty())
    }
}
