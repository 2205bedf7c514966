use chrono::{Datelike, NaiveDate};

/// The branch a run publishes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchReference {
    /// An automation branch found on the remote; it already has an open pull request
    Existing(String),
    /// A branch this run creates, named after the run date
    New(String),
}

impl BranchReference {
    /// Use the discovered branch if any, otherwise synthesize a dated one
    pub fn resolve(existing: Option<String>, prefix: &str, today: NaiveDate) -> Self {
        match existing {
            Some(name) => BranchReference::Existing(name),
            None => BranchReference::New(automation_branch_name(prefix, today)),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            BranchReference::Existing(name) | BranchReference::New(name) => name,
        }
    }

    pub fn is_existing(&self) -> bool {
        matches!(self, BranchReference::Existing(_))
    }
}

/// Automation branch name: `<prefix><year>-<month>-<day>`, month and day not zero-padded
pub fn automation_branch_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}{}-{}-{}", prefix, date.year(), date.month(), date.day())
}
