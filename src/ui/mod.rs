//! User interface module - progress reporting for unattended runs.
//!
//! The sync runs from a scheduler, so there are no prompts; every function
//! here only prints. See [formatter].

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_changed_paths, display_error, display_pull_request,
    display_status, display_success, display_targets,
};
