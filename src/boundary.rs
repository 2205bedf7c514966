use std::fmt;
use std::path::PathBuf;

/// Non-fatal conditions noticed during a sync run.
/// These are reported to the user but never stop the run.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// A manifest service declares no image (e.g. it is built locally)
    ServiceWithoutImage { service: String },
    /// A pinned Dockerfile had no line terminator, so its whole content was replaced
    SingleLineDockerfile { path: PathBuf },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::ServiceWithoutImage { service } => {
                write!(f, "Manifest service '{}' has no image; skipped", service)
            }
            BoundaryWarning::SingleLineDockerfile { path } => {
                write!(
                    f,
                    "{} has a single line; the whole file was replaced",
                    path.display()
                )
            }
        }
    }
}
