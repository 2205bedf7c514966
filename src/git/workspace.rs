use git2::{ConfigLevel, Repository, StatusOptions};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::CloneUrl;
use crate::error::{ImageSyncError, Result};
use crate::git::{CommitIdentity, RepositoryCloner, Workspace};

/// Runs `git` with `args` in `dir` and returns its stdout.
///
/// Prompts are disabled so a missing credential fails instead of hanging. In
/// error messages, every occurrence of `secret` is replaced with `redacted`.
fn run_git(dir: &Path, args: &[&str], secret: Option<&CloneUrl>) -> Result<String> {
    let redact = |text: &str| match secret {
        Some(url) => text.replace(&url.authenticated, &url.redacted),
        None => text.to_string(),
    };
    let command = redact(&format!("git {}", args.join(" ")));
    tracing::debug!(cwd = %dir.display(), command = %command, "running git");

    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .map_err(|e| ImageSyncError::command(&command, -1, format!("failed to execute: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ImageSyncError::command(
            command,
            output.status.code().unwrap_or(-1),
            redact(stderr.trim()),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Clones with the `git` command line
#[derive(Debug, Default, Clone, Copy)]
pub struct GitCloner;

impl RepositoryCloner for GitCloner {
    type Workspace = GitWorkspace;

    fn clone_fresh(&self, url: &CloneUrl, dest: &Path) -> Result<GitWorkspace> {
        if dest.exists() {
            tracing::debug!(path = %dest.display(), "removing previous clone");
            fs::remove_dir_all(dest)?;
        }

        let parent = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let name = dest.file_name().ok_or_else(|| {
            ImageSyncError::config(format!("invalid clone directory: {}", dest.display()))
        })?;
        fs::create_dir_all(&parent)?;

        let name = name.to_string_lossy();
        run_git(
            &parent,
            &["clone", &url.authenticated, name.as_ref()],
            Some(url),
        )?;

        GitWorkspace::open(dest)
    }
}

/// A clone on disk
///
/// Holds only the path; each operation opens the repository or spawns `git`
/// with the clone as its working directory.
#[derive(Debug, Clone)]
pub struct GitWorkspace {
    root: PathBuf,
}

impl GitWorkspace {
    /// Open an existing working copy
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path.as_ref())?;
        let root = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| ImageSyncError::config("cannot sync a bare repository"))?;

        Ok(GitWorkspace { root })
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        run_git(&self.root, args, None)
    }

    /// Name of the checked-out branch, if HEAD points at one
    pub fn current_branch(&self) -> Result<Option<String>> {
        let repo = Repository::open(&self.root)?;
        let head = match repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(if head.is_branch() {
            head.shorthand().map(String::from)
        } else {
            None
        })
    }
}

impl Workspace for GitWorkspace {
    fn root(&self) -> &Path {
        &self.root
    }

    fn configure_identity(&self, identity: &CommitIdentity) -> Result<()> {
        let repo = Repository::open(&self.root)?;
        let mut config = repo.config()?.open_level(ConfigLevel::Local)?;
        config.set_str("user.name", &identity.name)?;
        config.set_str("user.email", &identity.email)?;
        Ok(())
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.git(&["checkout", branch]).map(drop)
    }

    fn create_branch(&self, branch: &str) -> Result<()> {
        self.git(&["checkout", "-b", branch]).map(drop)
    }

    fn changed_paths(&self) -> Result<Vec<String>> {
        let repo = Repository::open(&self.root)?;

        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false)
            .include_unmodified(false);

        let statuses = repo.statuses(Some(&mut options))?;
        Ok(statuses
            .iter()
            .filter_map(|entry| entry.path().map(String::from))
            .collect())
    }

    fn stage_all(&self) -> Result<()> {
        self.git(&["add", "."]).map(drop)
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.git(&["commit", "-m", message]).map(drop)
    }

    fn push(&self) -> Result<()> {
        self.git(&["push"]).map(drop)
    }

    fn push_new_branch(&self, remote: &str) -> Result<()> {
        self.git(&["push", "-u", remote, "HEAD"]).map(drop)
    }
}
