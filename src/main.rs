use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use image_pin_sync::cli::{run_sync_workflow, SyncWorkflowArgs, WorkflowResult};
use image_pin_sync::config;
use image_pin_sync::git::GitCloner;
use image_pin_sync::github::client::plain_client;
use image_pin_sync::github::HttpGitHub;
use image_pin_sync::manifest::{FileManifest, HttpManifest, ManifestSource};
use image_pin_sync::ui;

#[derive(clap::Parser)]
#[command(
    name = "image-pin-sync",
    about = "Sync Dockerfile image pins with an upstream compose manifest and open a pull request"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(
        short = 'C',
        long,
        default_value = ".",
        help = "Directory the target repository is cloned into"
    )]
    work_dir: PathBuf,

    #[arg(long, help = "Read the manifest from a local file instead of the configured URL")]
    manifest_file: Option<PathBuf>,

    #[arg(long, help = "Patch and report changes without committing, pushing or opening a pull request")]
    dry_run: bool,

    #[arg(long, help = "Show configured Dockerfile targets and exit")]
    show_targets: bool,

    #[arg(long, help = "Enable debug logging")]
    verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    json_logs: bool,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

fn init_tracing(verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() {
    let args = Args::parse();

    if args.version {
        println!("image-pin-sync {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    init_tracing(args.verbose, args.json_logs);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref(), &args.work_dir)
        .context("Error loading config")?;

    if args.show_targets {
        ui::display_targets(&config.dockerfile_targets());
        return Ok(());
    }

    let token = config.github.token()?;
    let github = HttpGitHub::new(&config.github, &config.repository, &token)?;

    let manifest: Box<dyn ManifestSource> = match args.manifest_file {
        Some(path) => Box::new(FileManifest::new(path)),
        None => Box::new(HttpManifest::new(plain_client()?, &config.manifest.url)),
    };

    let workflow_args = SyncWorkflowArgs {
        work_dir: args.work_dir,
        token,
        today: Utc::now().date_naive(),
        dry_run: args.dry_run,
    };

    let result = run_sync_workflow(
        &workflow_args,
        &config,
        manifest.as_ref(),
        &github,
        &GitCloner,
    )?;

    match &result {
        WorkflowResult::UpToDate { branch } => {
            tracing::info!(branch = branch.name(), "pins already up to date")
        }
        WorkflowResult::DryRun { branch, changed } => {
            tracing::info!(branch = branch.name(), changed = changed.len(), "dry run finished")
        }
        WorkflowResult::UpdatedExistingBranch { branch, changed } => {
            tracing::info!(branch = %branch, changed = changed.len(), "pushed to existing branch")
        }
        WorkflowResult::OpenedPullRequest {
            branch,
            pull_request,
            ..
        } => tracing::info!(
            branch = %branch,
            number = pull_request.number,
            url = %pull_request.html_url,
            "opened pull request"
        ),
    }

    Ok(())
}
