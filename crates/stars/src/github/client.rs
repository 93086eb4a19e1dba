//! GitHub API client for the starred-repositories endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use octocrab::models::Repository as GitHubRepo;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, LINK, USER_AGENT};

use super::convert::to_remote_repo;
use super::error::GitHubError;
use crate::gateway::{self, GatewayError, PageMeta, StarGateway, StarredPage};

/// Public GitHub REST API root.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Host used for credential lookups against the public API.
pub const DEFAULT_API_HOST: &str = "api.github.com";

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Pagination information extracted from GitHub's Link header.
#[derive(Debug, Clone, Default)]
pub struct LinkPagination {
    /// The last page number (from rel="last" link).
    pub last_page: Option<u32>,
}

impl LinkPagination {
    /// Convert to gateway page metadata for the page at `current`.
    ///
    /// GitHub omits `rel="last"` on the last page itself.
    pub fn to_page_meta(&self, current: u32) -> PageMeta {
        PageMeta {
            last_page: self.last_page.unwrap_or(current).max(current),
        }
    }
}

/// Parse the Link header to extract pagination info.
///
/// GitHub Link headers look like:
/// `<https://api.github.com/user/1/starred?per_page=100&page=2>; rel="next", <...&page=3>; rel="last"`
pub fn parse_link_header(link_header: &str) -> LinkPagination {
    let mut info = LinkPagination::default();

    for part in link_header.split(',') {
        let mut url = None;
        let mut rel = None;

        for segment in part.trim().split(';') {
            let segment = segment.trim();
            if let Some(inner) = segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
                url = Some(inner);
            } else if let Some(rel_value) = segment.strip_prefix("rel=") {
                rel = Some(rel_value.trim_matches('"'));
            }
        }

        if let (Some(url), Some("last")) = (url, rel)
            && let Some(page_num) = extract_page_from_url(url)
        {
            info.last_page = Some(page_num);
        }
    }

    info
}

/// Extract the `page` query parameter from a URL.
fn extract_page_from_url(link: &str) -> Option<u32> {
    let parsed = url::Url::parse(link).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}

/// Read the rate limit reset time from response headers.
fn rate_limit_reset(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    let remaining = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())?;
    if remaining > 0 {
        return None;
    }

    let reset_epoch = headers
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())?;
    DateTime::from_timestamp(reset_epoch, 0)
}

/// Map a non-success status onto a [`GitHubError`].
fn status_error(status: StatusCode, headers: &HeaderMap, route: &str) -> GitHubError {
    if status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN && rate_limit_reset(headers).is_some())
    {
        return GitHubError::RateLimited {
            reset_at: rate_limit_reset(headers).unwrap_or_else(Utc::now),
        };
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GitHubError::AuthRequired,
        StatusCode::NOT_FOUND => GitHubError::NotFound(route.to_string()),
        _ => GitHubError::UnexpectedStatus {
            status: status.as_u16(),
            route: route.to_string(),
        },
    }
}

/// Create an authenticated Octocrab instance rooted at `api_base`.
pub fn create_client(token: &str, api_base: &str) -> Result<Octocrab, GitHubError> {
    let mut builder = Octocrab::builder().base_uri(api_base)?;
    if !token.is_empty() {
        builder = builder.personal_token(token.to_string());
    }
    builder.build().map_err(GitHubError::Api)
}

/// GitHub implementation of [`StarGateway`].
///
/// Page listings go through a shared `reqwest::Client` so the `Link` header is
/// available; everything else goes through octocrab.
#[derive(Clone)]
pub struct GitHubClient {
    inner: Arc<Octocrab>,
    /// The authentication token, used for raw page requests.
    token: Arc<String>,
    /// Shared HTTP client for page requests.
    http_client: reqwest::Client,
    /// API root without a trailing slash.
    api_base: Arc<str>,
}

impl GitHubClient {
    /// Create a client for the public GitHub API.
    pub fn new(token: &str) -> Result<Self, GitHubError> {
        Self::with_api_base(token, DEFAULT_API_BASE)
    }

    /// Create a client for a GitHub Enterprise (or test) API root.
    pub fn with_api_base(token: &str, api_base: &str) -> Result<Self, GitHubError> {
        let api_base = api_base.trim_end_matches('/');
        let client = create_client(token, api_base)?;
        Ok(Self {
            inner: Arc::new(client),
            token: Arc::new(token.to_string()),
            http_client: reqwest::Client::new(),
            api_base: Arc::from(api_base),
        })
    }

    /// The API root this client talks to.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Look up the login of the authenticated user.
    pub async fn authenticated_username(&self) -> Result<String, GitHubError> {
        let user: serde_json::Value = self.inner.get("/user", None::<&()>).await?;
        user.get("login")
            .and_then(|v| v.as_str())
            .filter(|login| !login.is_empty())
            .map(String::from)
            .ok_or_else(|| GitHubError::Internal("GET /user returned no login".to_string()))
    }

    /// Fetch one page of a user's starred repositories.
    pub async fn fetch_starred_page(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<GitHubRepo>, PageMeta), GitHubError> {
        let route = format!("/users/{username}/starred");
        let url = format!("{}{}", self.api_base, route);

        let mut request = self
            .http_client
            .get(&url)
            .query(&[("per_page", per_page), ("page", page)])
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(USER_AGENT, "stars");
        if !self.token.is_empty() {
            request = request.header(AUTHORIZATION, format!("Bearer {}", self.token.as_str()));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, response.headers(), &route));
        }

        let meta = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(parse_link_header)
            .unwrap_or_default()
            .to_page_meta(page);

        let repos: Vec<GitHubRepo> = response
            .json()
            .await
            .map_err(|e| GitHubError::Internal(format!("JSON parse error: {e}")))?;

        tracing::debug!(
            page,
            count = repos.len(),
            last_page = meta.last_page,
            "Fetched starred page"
        );
        Ok((repos, meta))
    }

    /// Remove the authenticated user's star from `owner/name`.
    pub async fn unstar_repo(&self, owner: &str, name: &str) -> Result<(), GitHubError> {
        // DELETE /user/starred/{owner}/{repo}
        // _delete rather than delete: success is 204 with an empty body.
        let route = format!("/user/starred/{owner}/{name}");
        let response = self.inner._delete(&route, None::<&()>).await?;

        match response.status().as_u16() {
            200 | 204 => Ok(()),
            401 | 403 => Err(GitHubError::AuthRequired),
            404 => Err(GitHubError::NotFound(format!("{owner}/{name}"))),
            status => Err(GitHubError::UnexpectedStatus { status, route }),
        }
    }
}

#[async_trait]
impl StarGateway for GitHubClient {
    async fn list_starred(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> gateway::Result<StarredPage> {
        let (repos, meta) = self
            .fetch_starred_page(username, page, per_page)
            .await
            .map_err(GatewayError::from)?;

        Ok(StarredPage {
            repos: repos.iter().map(to_remote_repo).collect(),
            meta,
        })
    }

    async fn unstar(&self, owner: &str, name: &str) -> gateway::Result<()> {
        self.unstar_repo(owner, name)
            .await
            .map_err(GatewayError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_github_client_is_gateway() {
        fn assert_gateway<T: StarGateway>() {}
        assert_gateway::<GitHubClient>();
    }

    #[tokio::test]
    async fn test_api_base_trailing_slash_is_trimmed() {
        let client = GitHubClient::with_api_base("", "http://127.0.0.1:9/").unwrap();
        assert_eq!(client.api_base(), "http://127.0.0.1:9");

        let client = GitHubClient::new("token").unwrap();
        assert_eq!(client.api_base(), DEFAULT_API_BASE);
    }

    #[test]
    fn test_parse_link_header_full() {
        let header = r#"<https://api.github.com/user/583231/starred?per_page=100&page=2>; rel="next", <https://api.github.com/user/583231/starred?per_page=100&page=3>; rel="last""#;

        let info = parse_link_header(header);
        assert_eq!(info.last_page, Some(3));
        assert_eq!(info.to_page_meta(1), PageMeta { last_page: 3 });
    }

    #[test]
    fn test_parse_link_header_on_last_page() {
        let header = r#"<https://api.github.com/user/1/starred?per_page=100&page=2>; rel="prev", <https://api.github.com/user/1/starred?per_page=100&page=1>; rel="first""#;

        let info = parse_link_header(header);
        assert_eq!(info.last_page, None);
        assert_eq!(info.to_page_meta(3).last_page, 3);
    }

    #[test]
    fn test_parse_link_header_empty() {
        let info = parse_link_header("");
        assert_eq!(info.to_page_meta(1), PageMeta::single());
    }

    #[test]
    fn test_extract_page_from_url() {
        assert_eq!(
            extract_page_from_url("https://api.github.com/repos?page=5"),
            Some(5)
        );
        assert_eq!(
            extract_page_from_url("https://api.github.com/repos?per_page=100&page=3"),
            Some(3)
        );
        assert_eq!(
            extract_page_from_url("https://api.github.com/repos?per_page=100"),
            None
        );
        assert_eq!(extract_page_from_url("not a url"), None);
    }

    #[test]
    fn test_status_error_mapping() {
        let empty = HeaderMap::new();
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, &empty, "/r"),
            GitHubError::AuthRequired
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, &empty, "/r"),
            GitHubError::NotFound(_)
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, &empty, "/r"),
            GitHubError::RateLimited { .. }
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, &empty, "/r"),
            GitHubError::UnexpectedStatus { status: 502, .. }
        ));
    }

    #[test]
    fn test_forbidden_with_exhausted_quota_is_rate_limited() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
        headers.insert("x-ratelimit-reset", HeaderValue::from_static("1700000000"));

        match status_error(StatusCode::FORBIDDEN, &headers, "/r") {
            GitHubError::RateLimited { reset_at } => {
                assert_eq!(reset_at.timestamp(), 1_700_000_000)
            }
            other => panic!("expected rate limit, got {other:?}"),
        }
    }
}
