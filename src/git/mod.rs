//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the git operations the
//! sync workflow performs on its working copy, allowing the workflow to run
//! against a real clone or against a mock in tests.
//!
//! # Overview
//!
//! - [RepositoryCloner] produces a fresh working copy.
//! - [Workspace] is the working copy: branch checkout, status, commit, push.
//!
//! The concrete implementations are:
//!
//! - [workspace::GitCloner] / [workspace::GitWorkspace]: `git` subprocesses for
//!   clone, checkout, add, commit and push (so the credential embedded in the
//!   clone URL is used), and `git2` for status and local config
//! - [mock::MockCloner] / [mock::MockWorkspace]: a plain directory whose change
//!   detection compares file contents against a snapshot
//!
//! # Usage
//!
//! ```rust
//! # use image_pin_sync::git::Workspace;
//! # fn example<W: Workspace>(workspace: &W) -> image_pin_sync::Result<()> {
//! if !workspace.changed_paths()?.is_empty() {
//!     workspace.stage_all()?;
//!     workspace.commit("chore: update image versions")?;
//!     workspace.push()?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod workspace;

pub use mock::{MockCloner, MockWorkspace};
pub use workspace::{GitCloner, GitWorkspace};

use std::path::Path;

use crate::config::CloneUrl;
use crate::error::Result;

/// Author identity recorded on automation commits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

/// Creates working copies of the target repository
pub trait RepositoryCloner {
    type Workspace: Workspace;

    /// Clone `url` into `dest`, deleting anything already at `dest`
    ///
    /// # Arguments
    /// * `url` - Clone URL; only its redacted form may appear in errors or logs
    /// * `dest` - Directory to clone into
    fn clone_fresh(&self, url: &CloneUrl, dest: &Path) -> Result<Self::Workspace>;
}

/// A working copy of the target repository
///
/// ## Error Handling
///
/// Every method fails with [crate::error::ImageSyncError] when the underlying
/// git command or library call fails. There are no retries.
pub trait Workspace {
    /// Root directory of the working copy
    fn root(&self) -> &Path;

    /// Record `identity` as the committer in the repository's local config
    fn configure_identity(&self, identity: &CommitIdentity) -> Result<()>;

    /// Check out an existing branch (`git checkout <branch>`)
    fn checkout(&self, branch: &str) -> Result<()>;

    /// Create and check out a new branch (`git checkout -b <branch>`)
    fn create_branch(&self, branch: &str) -> Result<()>;

    /// Paths that differ from HEAD, including untracked files
    ///
    /// Equivalent to the path column of `git status --porcelain`; an empty
    /// list means the working tree is clean.
    fn changed_paths(&self) -> Result<Vec<String>>;

    /// Stage every change (`git add .`)
    fn stage_all(&self) -> Result<()>;

    /// Commit the staged changes (`git commit -m <message>`)
    fn commit(&self, message: &str) -> Result<()>;

    /// Push the current branch to its upstream (`git push`)
    fn push(&self) -> Result<()>;

    /// Push the current branch and set its upstream (`git push -u <remote> HEAD`)
    fn push_new_branch(&self, remote: &str) -> Result<()>;
}
