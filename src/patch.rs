//! Dockerfile first-line rewriting.
//!
//! Pins live on the first line of each Dockerfile (`FROM <image>`). Everything from the
//! first line terminator onward is kept byte-for-byte.

use regex::bytes::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::{ImageSyncError, Result};
use crate::manifest::ImageMap;

/// A Dockerfile whose first line pins the image of `service`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerfileTarget {
    pub service: String,
    /// Path relative to the repository root
    pub path: PathBuf,
}

impl DockerfileTarget {
    pub fn new(service: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        DockerfileTarget {
            service: service.into(),
            path: path.into(),
        }
    }
}

/// Result of pinning a single Dockerfile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchedFile {
    pub target: DockerfileTarget,
    pub image: String,
    pub changed: bool,
    /// The file had no line terminator, so its whole content was replaced
    pub single_line: bool,
}

fn line_terminator() -> &'static Regex {
    static TERMINATOR: OnceLock<Regex> = OnceLock::new();
    TERMINATOR.get_or_init(|| Regex::new(r"\r\n|\n").expect("line terminator pattern is valid"))
}

/// Builds the `FROM` line for an image reference.
pub fn from_line(image: &str) -> String {
    format!("FROM {}", image)
}

/// Offset of the first `\r\n` or `\n`, if any.
pub fn first_line_end(content: &[u8]) -> Option<usize> {
    line_terminator().find(content).map(|m| m.start())
}

/// Replaces everything before the first line terminator with `replacement`.
///
/// The terminator and all following bytes are preserved. Content without a
/// terminator is replaced entirely.
pub fn replace_first_line(content: &[u8], replacement: &str) -> Vec<u8> {
    let remainder = match first_line_end(content) {
        Some(index) => &content[index..],
        None => &[][..],
    };

    let mut patched = Vec::with_capacity(replacement.len() + remainder.len());
    patched.extend_from_slice(replacement.as_bytes());
    patched.extend_from_slice(remainder);
    patched
}

/// Rewrites the first line of the file at `path` in place.
///
/// # Returns
/// * `Ok(true)` - The file content changed
/// * `Ok(false)` - The first line already matched; the file was not rewritten
/// * `Err` - If the file cannot be read or written
pub fn overwrite_first_line(path: &Path, replacement: &str) -> Result<bool> {
    let original = fs::read(path).map_err(|source| ImageSyncError::Patch {
        path: path.to_path_buf(),
        source,
    })?;

    let patched = replace_first_line(&original, replacement);
    if patched == original {
        return Ok(false);
    }

    fs::write(path, &patched).map_err(|source| ImageSyncError::Patch {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(true)
}

/// Pins every target under `root` to the image its service maps to.
///
/// Fails on the first target whose service has no image or whose file cannot be patched.
pub fn apply_pins(
    root: &Path,
    targets: &[DockerfileTarget],
    images: &ImageMap,
) -> Result<Vec<PatchedFile>> {
    let mut patched = Vec::with_capacity(targets.len());

    for target in targets {
        let image = images.image_for(&target.service)?;
        let path = root.join(&target.path);

        let single_line = fs::read(&path)
            .map(|content| first_line_end(&content).is_none())
            .unwrap_or(false);
        let changed = overwrite_first_line(&path, &from_line(image))?;

        tracing::debug!(
            service = %target.service,
            path = %target.path.display(),
            image,
            changed,
            "pinned dockerfile"
        );

        patched.push(PatchedFile {
            target: target.clone(),
            image: image.to_string(),
            changed,
            single_line,
        });
    }

    Ok(patched)
}
