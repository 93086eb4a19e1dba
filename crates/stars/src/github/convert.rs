//! Model conversion from GitHub API types to gateway types.

use octocrab::models::Repository as GitHubRepo;

use crate::gateway::RemoteRepo;

/// Convert a GitHub repository to a platform-agnostic [`RemoteRepo`].
///
/// A repository without an `html_url` converts with an empty URL; the store
/// rejects it, so it shows up as a per-record failure instead of aborting
/// the page.
pub fn to_remote_repo(repo: &GitHubRepo) -> RemoteRepo {
    let language = repo
        .language
        .as_ref()
        .and_then(|v| v.as_str().map(String::from));

    RemoteRepo {
        url: repo
            .html_url
            .as_ref()
            .map(|u| u.as_str().trim_end_matches('/').to_string())
            .unwrap_or_default(),
        language,
        description: repo.description.clone(),
        stargazers: repo.stargazers_count.unwrap_or(0),
        archived: repo.archived.unwrap_or(false),
        pushed_at: repo.pushed_at,
        updated_at: repo.updated_at,
        created_at: repo.created_at,
        topics: repo.topics.clone().unwrap_or_default(),
    }
}
