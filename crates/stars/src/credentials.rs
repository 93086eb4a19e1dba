//! Credential lookup for the remote service.
//!
//! Credentials come either from configuration ([`StaticCredentials`]) or from
//! a netrc file ([`NetrcCredentials`]). [`ChainedCredentials`] tries several
//! providers in order.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while resolving credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No provider had credentials for the host.
    #[error("No credentials configured for {host}")]
    NotConfigured { host: String },

    /// The netrc file exists but could not be understood.
    #[error("Malformed netrc file {path}: {message}")]
    Netrc { path: PathBuf, message: String },

    /// The netrc file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AuthError {
    /// Create a NotConfigured error for `host`.
    pub fn not_configured(host: impl Into<String>) -> Self {
        Self::NotConfigured { host: host.into() }
    }
}

/// A username and API token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Source of credentials for a service host.
pub trait CredentialProvider: Send + Sync {
    /// Credentials for `host` (e.g. `api.github.com`).
    fn credentials(&self, host: &str) -> Result<Credentials, AuthError>;
}

/// Credentials supplied directly, e.g. from configuration or environment.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    credentials: Credentials,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            credentials: Credentials {
                username: username.into(),
                token: token.into(),
            },
        }
    }
}

impl CredentialProvider for StaticCredentials {
    fn credentials(&self, host: &str) -> Result<Credentials, AuthError> {
        if self.credentials.token.is_empty() {
            return Err(AuthError::not_configured(host));
        }
        Ok(self.credentials.clone())
    }
}

/// Credentials read from a netrc file.
///
/// Uses the `login`/`password` pair of the `machine` entry matching the
/// host, falling back to a `default` entry.
#[derive(Debug, Clone)]
pub struct NetrcCredentials {
    path: PathBuf,
}

impl NetrcCredentials {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<home>/.netrc`.
    pub fn in_home(home: &Path) -> Self {
        Self::new(home.join(".netrc"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialProvider for NetrcCredentials {
    fn credentials(&self, host: &str) -> Result<Credentials, AuthError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AuthError::not_configured(host));
            }
            Err(source) => {
                return Err(AuthError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let entries = parse_netrc(&contents).map_err(|message| AuthError::Netrc {
            path: self.path.clone(),
            message,
        })?;

        let entry = entries
            .iter()
            .find(|e| e.machine.as_deref() == Some(host))
            .or_else(|| entries.iter().find(|e| e.machine.is_none()))
            .ok_or_else(|| AuthError::not_configured(host))?;

        match (&entry.login, &entry.password) {
            (Some(login), Some(password)) => Ok(Credentials {
                username: login.clone(),
                token: password.clone(),
            }),
            _ => Err(AuthError::Netrc {
                path: self.path.clone(),
                message: format!("entry for {host} lacks login or password"),
            }),
        }
    }
}

/// Tries each provider in order; the first success wins.
///
/// `NotConfigured` moves on to the next provider; any other error stops
/// the lookup.
#[derive(Default)]
pub struct ChainedCredentials {
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl ChainedCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, provider: impl CredentialProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }
}

impl CredentialProvider for ChainedCredentials {
    fn credentials(&self, host: &str) -> Result<Credentials, AuthError> {
        for provider in &self.providers {
            match provider.credentials(host) {
                Err(AuthError::NotConfigured { .. }) => continue,
                other => return other,
            }
        }
        Err(AuthError::not_configured(host))
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct NetrcEntry {
    /// `None` for the `default` entry.
    machine: Option<String>,
    login: Option<String>,
    password: Option<String>,
}

fn parse_netrc(contents: &str) -> Result<Vec<NetrcEntry>, String> {
    let mut tokens = contents
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default())
        .flat_map(str::split_whitespace);
    let mut entries = Vec::new();
    let mut current: Option<NetrcEntry> = None;

    while let Some(token) = tokens.next() {
        match token {
            "machine" => {
                let name = tokens.next().ok_or("`machine` without a name")?;
                entries.extend(current.take());
                current = Some(NetrcEntry {
                    machine: Some(name.to_string()),
                    ..Default::default()
                });
            }
            "default" => {
                entries.extend(current.take());
                current = Some(NetrcEntry::default());
            }
            "login" | "password" | "account" => {
                let value = tokens.next().ok_or(format!("`{token}` without a value"))?;
                let entry = current
                    .as_mut()
                    .ok_or(format!("`{token}` outside of a machine entry"))?;
                match token {
                    "login" => entry.login = Some(value.to_string()),
                    "password" => entry.password = Some(value.to_string()),
                    _ => {}
                }
            }
            "macdef" => {
                // Macro bodies run to the next blank line; they never hold credentials.
                entries.extend(current.take());
                break;
            }
            other => return Err(format!("unexpected token `{other}`")),
        }
    }
    entries.extend(current);

    Ok(entries)
}
