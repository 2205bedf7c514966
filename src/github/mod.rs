//! GitHub REST access
//!
//! The workflow only needs two calls: listing branches (paginated through the
//! `Link` header) and opening a pull request. Both sit behind the [GitHubApi]
//! trait so the workflow can run against [mock::MockGitHub] in tests.
//!
//! - [client::HttpGitHub]: Real implementation over blocking `reqwest`
//! - [mock::MockGitHub]: Canned pages and recorded pull requests

pub mod client;
pub mod link;
pub mod mock;

pub use client::HttpGitHub;
pub use link::parse_next_link;
pub use mock::MockGitHub;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::Result;

/// A branch as returned by the branch-listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Branch {
    pub name: String,
}

/// One page of the branch listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchPage {
    /// Branches in the order the API returned them
    pub branches: Vec<Branch>,
    /// URL of the following page, from the `rel="next"` link
    pub next: Option<String>,
}

/// Payload for opening a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPullRequest {
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
}

/// The fields of a created pull request the workflow reports
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub html_url: String,
}

/// Narrow GitHub interface used by the sync workflow
///
/// ## Error Handling
///
/// Non-success HTTP statuses are errors ([crate::error::ImageSyncError::Api]),
/// never empty results.
pub trait GitHubApi {
    /// Fetch one page of branches from `url`
    ///
    /// # Arguments
    /// * `url` - The first-page URL or a `next` URL returned by a previous page
    fn list_branches(&self, url: &str) -> Result<BranchPage>;

    /// Open a pull request
    fn create_pull_request(&self, request: &NewPullRequest) -> Result<PullRequest>;
}

/// Walks the branch listing until a branch starting with `prefix` is found.
///
/// Pages are requested one at a time, following `next` links. The first
/// matching branch in API order wins. The walk ends with `None` when a page has
/// no `next` link, or when a `next` link points at a page already visited.
pub fn find_automation_branch<G: GitHubApi + ?Sized>(
    api: &G,
    first_page_url: &str,
    prefix: &str,
) -> Result<Option<String>> {
    let mut visited = HashSet::new();
    let mut url = first_page_url.to_string();

    loop {
        visited.insert(url.clone());
        let page = api.list_branches(&url)?;
        tracing::debug!(url = %url, branches = page.branches.len(), "listed branches");

        if let Some(branch) = page.branches.iter().find(|b| b.name.starts_with(prefix)) {
            return Ok(Some(branch.name.clone()));
        }

        match page.next {
            Some(next) if !visited.contains(&next) => url = next,
            Some(next) => {
                tracing::warn!(url = %next, "branch listing links back to a visited page");
                return Ok(None);
            }
            None => return Ok(None),
        }
    }
}
