//! Domain logic - pure naming rules independent of git and HTTP

pub mod branch;
pub mod pull_request;

pub use branch::{automation_branch_name, BranchReference};
pub use pull_request::{build_pull_request, display_date};
