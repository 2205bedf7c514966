use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{ImageSyncError, Result};
use crate::github::{BranchPage, GitHubApi, NewPullRequest, PullRequest};

/// Mock GitHub API for testing without network access
///
/// Serves the given branch pages in order, one per `list_branches` call, and
/// records every request it receives.
pub struct MockGitHub {
    pages: Mutex<VecDeque<BranchPage>>,
    requested_urls: Mutex<Vec<String>>,
    pull_requests: Mutex<Vec<NewPullRequest>>,
    fail_pull_request: Option<u16>,
}

impl MockGitHub {
    /// Create a mock that serves `pages` in order
    pub fn new(pages: Vec<BranchPage>) -> Self {
        MockGitHub {
            pages: Mutex::new(pages.into()),
            requested_urls: Mutex::new(Vec::new()),
            pull_requests: Mutex::new(Vec::new()),
            fail_pull_request: None,
        }
    }

    /// Make `create_pull_request` fail with the given HTTP status
    pub fn failing_pull_requests(mut self, status: u16) -> Self {
        self.fail_pull_request = Some(status);
        self
    }

    /// URLs passed to `list_branches`, in call order
    pub fn requested_urls(&self) -> Vec<String> {
        self.requested_urls.lock().unwrap().clone()
    }

    /// Pull requests that were opened, in call order
    pub fn pull_requests(&self) -> Vec<NewPullRequest> {
        self.pull_requests.lock().unwrap().clone()
    }
}

impl Default for MockGitHub {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl GitHubApi for MockGitHub {
    fn list_branches(&self, url: &str) -> Result<BranchPage> {
        self.requested_urls.lock().unwrap().push(url.to_string());

        Ok(self
            .pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(BranchPage {
                branches: Vec::new(),
                next: None,
            }))
    }

    fn create_pull_request(&self, request: &NewPullRequest) -> Result<PullRequest> {
        if let Some(status) = self.fail_pull_request {
            return Err(ImageSyncError::api(
                "Create Pull Request",
                status,
                "Mock failure",
            ));
        }

        let mut opened = self.pull_requests.lock().unwrap();
        opened.push(request.clone());
        let number = opened.len() as u64;

        Ok(PullRequest {
            number,
            html_url: format!("https://github.test/pulls/{}", number),
        })
    }
}
