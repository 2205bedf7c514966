pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod github;
pub mod manifest;
pub mod patch;
pub mod ui;

pub use error::{ImageSyncError, Result};
