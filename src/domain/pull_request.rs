use chrono::NaiveDate;

use crate::config::{AutomationConfig, ManifestConfig};
use crate::github::NewPullRequest;

/// Human-readable date used in pull request titles, e.g. `Sun Oct 18 2026`
pub fn display_date(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// Builds the pull request for a freshly pushed automation branch.
///
/// `{date}` in the title template and `{source_link}` in the body template are
/// substituted; the pull request targets `base`.
pub fn build_pull_request(
    automation: &AutomationConfig,
    manifest: &ManifestConfig,
    head: &str,
    base: &str,
    date: NaiveDate,
) -> NewPullRequest {
    NewPullRequest {
        title: automation.pr_title.replace("{date}", &display_date(date)),
        body: automation
            .pr_body
            .replace("{source_link}", &manifest.source_link),
        head: head.to_string(),
        base: base.to_string(),
    }
}
