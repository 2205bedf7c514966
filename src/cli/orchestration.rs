//! Main workflow orchestration logic
//!
//! This module contains the sync workflow, kept apart from CLI argument parsing
//! and from the concrete git/HTTP implementations so it can run against mocks.

use chrono::NaiveDate;
use std::path::PathBuf;

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::{build_pull_request, BranchReference};
use crate::error::Result;
use crate::git::{CommitIdentity, RepositoryCloner, Workspace};
use crate::github::{find_automation_branch, GitHubApi, PullRequest};
use crate::manifest::{parse_manifest, ManifestSource};
use crate::patch::apply_pins;
use crate::ui;

/// Arguments for the sync workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
/// This decoupling allows the workflow to be called programmatically
/// without depending on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncWorkflowArgs {
    /// Directory the clone directory is created in
    pub work_dir: PathBuf,

    /// Access token embedded in the clone URL
    pub token: String,

    /// UTC date used for new branch names and pull request titles
    pub today: NaiveDate,

    /// Stop after reporting changes - no commit, push or pull request
    pub dry_run: bool,
}

/// Outcome of a successful sync run
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowResult {
    /// The pinned images already match the manifest; nothing was published
    UpToDate { branch: BranchReference },

    /// Changes were found but `dry_run` was set
    DryRun {
        branch: BranchReference,
        changed: Vec<String>,
    },

    /// Changes were committed and pushed to the existing automation branch
    UpdatedExistingBranch {
        branch: String,
        changed: Vec<String>,
    },

    /// A new automation branch was pushed and a pull request opened for it
    OpenedPullRequest {
        branch: String,
        changed: Vec<String>,
        pull_request: PullRequest,
    },
}

/// Main sync workflow
///
/// Orchestrates the whole run:
/// 1. Fetch the manifest and extract the service images
/// 2. Clone a fresh working copy and configure the commit identity
/// 3. Look for an existing automation branch and check it out if found
/// 4. Pin every configured Dockerfile to its service's image
/// 5. Check the working tree status; stop if clean
/// 6. Commit and push to the existing branch, or push a new branch and open a pull request
///
/// # Arguments
///
/// * `args` - Workflow arguments (working directory, token, date, dry run)
/// * `config` - Sync configuration
/// * `manifest` - Source of the upstream manifest
/// * `github` - GitHub API used for branch discovery and pull requests
/// * `cloner` - Produces the working copy
///
/// # Returns
///
/// What the run did, or the first error encountered
pub fn run_sync_workflow<M, G, C>(
    args: &SyncWorkflowArgs,
    config: &Config,
    manifest: &M,
    github: &G,
    cloner: &C,
) -> Result<WorkflowResult>
where
    M: ManifestSource + ?Sized,
    G: GitHubApi + ?Sized,
    C: RepositoryCloner,
{
    ui::display_status(&format!("Fetching manifest from {}", manifest.describe()));
    let parsed = parse_manifest(&manifest.fetch_manifest()?)?;
    for service in &parsed.services_without_image {
        ui::display_boundary_warning(&BoundaryWarning::ServiceWithoutImage {
            service: service.clone(),
        });
    }
    ui::display_success(&format!(
        "Found images for {} services",
        parsed.images.len()
    ));

    let repository = &config.repository;
    let dest = args.work_dir.join(&repository.clone_dir);
    let url = repository.clone_url(&args.token);
    ui::display_status(&format!("Cloning {}", url.redacted));
    let workspace = cloner.clone_fresh(&url, &dest)?;
    workspace.configure_identity(&CommitIdentity {
        name: config.identity.name.clone(),
        email: config.identity.email.clone(),
    })?;

    ui::display_status("Checking whether a branch for image updates has already been published...");
    let prefix = &config.automation.branch_prefix;
    let existing = find_automation_branch(
        github,
        &config.github.branches_url(repository),
        prefix,
    )?;
    let branch = BranchReference::resolve(existing, prefix, args.today);

    if let BranchReference::Existing(name) = &branch {
        tracing::info!(branch = %name, "found existing automation branch");
        workspace.checkout(name)?;
    } else {
        tracing::info!("no automation branch published yet");
    }

    let patched = apply_pins(
        workspace.root(),
        &config.dockerfile_targets(),
        &parsed.images,
    )?;
    for file in patched.iter().filter(|f| f.single_line) {
        ui::display_boundary_warning(&BoundaryWarning::SingleLineDockerfile {
            path: file.target.path.clone(),
        });
    }

    ui::display_status("Checking if image versions have changed...");
    let changed = workspace.changed_paths()?;
    if changed.is_empty() {
        ui::display_success("No images have changed. Pins are up-to-date!");
        return Ok(WorkflowResult::UpToDate { branch });
    }
    ui::display_changed_paths(&changed);

    if args.dry_run {
        ui::display_status(&format!(
            "Dry run: would publish {} changed files to \"{}\"",
            changed.len(),
            branch.name()
        ));
        return Ok(WorkflowResult::DryRun { branch, changed });
    }

    let commit_message = &config.automation.commit_message;

    match branch {
        BranchReference::Existing(name) => {
            ui::display_status(&format!("Committing to existing branch \"{}\"...", name));
            workspace.stage_all()?;
            workspace.commit(commit_message)?;
            workspace.push()?;
            ui::display_success("Update complete!");

            Ok(WorkflowResult::UpdatedExistingBranch {
                branch: name,
                changed,
            })
        }
        BranchReference::New(name) => {
            ui::display_status(&format!("Publishing new branch \"{}\"...", name));
            workspace.stage_all()?;
            workspace.create_branch(&name)?;
            workspace.commit(commit_message)?;
            workspace.push_new_branch(&repository.remote)?;

            ui::display_status("Creating pull request...");
            let request = build_pull_request(
                &config.automation,
                &config.manifest,
                &name,
                &repository.base_branch,
                args.today,
            );
            let pull_request = github.create_pull_request(&request)?;
            ui::display_pull_request(&pull_request);
            ui::display_success("Update complete!");

            Ok(WorkflowResult::OpenedPullRequest {
                branch: name,
                changed,
                pull_request,
            })
        }
    }
}
