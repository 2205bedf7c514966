use reqwest::blocking::{Client, ClientBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK};

use crate::config::{GitHubConfig, RepositoryConfig};
use crate::error::{ImageSyncError, Result};
use crate::github::link::parse_next_link;
use crate::github::{Branch, BranchPage, GitHubApi, NewPullRequest, PullRequest};

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "x-github-api-version";

/// User agent sent with every request; GitHub rejects requests without one.
pub fn user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Blocking HTTP client with only the user agent set, for unauthenticated downloads.
pub fn plain_client() -> Result<Client> {
    Ok(Client::builder().user_agent(user_agent()).build()?)
}

/// GitHub REST client for a single repository
pub struct HttpGitHub {
    client: Client,
    pulls_url: String,
}

impl HttpGitHub {
    /// Build a client that authenticates every request with `token`.
    pub fn new(github: &GitHubConfig, repository: &RepositoryConfig, token: &str) -> Result<Self> {
        Self::with_builder(Client::builder(), github, repository, token)
    }

    /// Like [HttpGitHub::new], starting from a preconfigured client builder
    /// (proxy or TLS settings).
    pub fn with_builder(
        builder: ClientBuilder,
        github: &GitHubConfig,
        repository: &RepositoryConfig,
        token: &str,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ImageSyncError::config("access token contains invalid characters"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let version = HeaderValue::from_str(&github.api_version)
            .map_err(|_| ImageSyncError::config("github.api_version is not a valid header"))?;
        headers.insert(API_VERSION_HEADER, version);

        let client = builder
            .user_agent(user_agent())
            .default_headers(headers)
            .build()?;

        Ok(HttpGitHub {
            client,
            pulls_url: github.pulls_url(repository),
        })
    }
}

/// Turn a non-success response into an `Api` error naming the operation.
fn ensure_success(operation: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let reason = status.canonical_reason().unwrap_or("Unknown").to_string();
    let body = response.text().unwrap_or_default();
    tracing::debug!(operation, status = status.as_u16(), body = %body, "GitHub API error");

    Err(ImageSyncError::api(operation, status.as_u16(), reason))
}

impl GitHubApi for HttpGitHub {
    fn list_branches(&self, url: &str) -> Result<BranchPage> {
        tracing::debug!(url, "GET branches");
        let response = ensure_success("List Branches", self.client.get(url).send()?)?;

        let next = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_next_link);
        let branches: Vec<Branch> = response.json()?;

        Ok(BranchPage { branches, next })
    }

    fn create_pull_request(&self, request: &NewPullRequest) -> Result<PullRequest> {
        tracing::debug!(url = %self.pulls_url, head = %request.head, base = %request.base, "POST pull request");
        let response = self.client.post(&self.pulls_url).json(request).send()?;
        let response = ensure_success("Create Pull Request", response)?;

        Ok(response.json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_names_crate() {
        assert!(user_agent().starts_with("image-pin-sync/"));
    }

    #[test]
    fn test_rejects_token_with_newline() {
        let result = HttpGitHub::new(
            &GitHubConfig::default(),
            &RepositoryConfig::default(),
            "bad\ntoken",
        );
        assert!(matches!(result, Err(ImageSyncError::Config(_))));
    }
}
