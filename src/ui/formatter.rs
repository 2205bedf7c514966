//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic for progress reporting.
//! Functions here have no side effects beyond printing.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::github::PullRequest;
use crate::patch::DockerfileTarget;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
///
/// Shows a yellow warning icon followed by the warning message.
///
/// # Arguments
/// * `warning` - The boundary warning to display
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display the paths reported as changed by the working tree status.
///
/// Shows up to 20 paths; if more changed, displays the count of remaining ones.
pub fn display_changed_paths(paths: &[String]) {
    println!("\n{}", style("Changed files:").bold());

    for path in paths.iter().take(20) {
        println!("  {} {}", style("M").yellow(), path);
    }

    if paths.len() > 20 {
        println!("  ... and {} more files", paths.len() - 20);
    }
}

/// Display the configured Dockerfile targets, grouped in configuration order.
pub fn display_targets(targets: &[DockerfileTarget]) {
    println!("{}", style("Pinned Dockerfiles:").bold());
    for target in targets {
        println!(
            "  - {} {}",
            style(&target.service).cyan(),
            target.path.display()
        );
    }
}

/// Display the pull request opened for a new automation branch.
pub fn display_pull_request(pull_request: &PullRequest) {
    println!(
        "\n{} #{}\n  {}",
        style("Pull request:").bold(),
        pull_request.number,
        style(&pull_request.html_url).cyan()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }

    #[test]
    fn test_display_success() {
        // Visual verification test - output is printed to stdout
        display_success("test success");
    }

    #[test]
    fn test_display_changed_paths_truncates() {
        let paths: Vec<String> = (0..25).map(|i| format!("svc{}/Dockerfile", i)).collect();
        display_changed_paths(&paths);
    }
}
