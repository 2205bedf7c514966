use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::config::CloneUrl;
use crate::error::Result;
use crate::git::{CommitIdentity, RepositoryCloner, Workspace};

type CallLog = Arc<Mutex<Vec<String>>>;

/// Mock cloner for testing without actual git operations
///
/// "Cloning" writes the seed files into the destination directory. Every
/// operation on the resulting [MockWorkspace] is appended to a log shared with
/// the cloner, written the way the equivalent git command would be spelled.
pub struct MockCloner {
    files: Vec<(String, Vec<u8>)>,
    calls: CallLog,
}

impl MockCloner {
    /// Create a cloner whose working copies contain `files` (path, content)
    pub fn with_files<P, C>(files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: Into<String>,
        C: Into<Vec<u8>>,
    {
        MockCloner {
            files: files
                .into_iter()
                .map(|(path, content)| (path.into(), content.into()))
                .collect(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every recorded operation, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded operations starting with `prefix`
    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.starts_with(prefix))
            .collect()
    }
}

impl RepositoryCloner for MockCloner {
    type Workspace = MockWorkspace;

    fn clone_fresh(&self, url: &CloneUrl, dest: &Path) -> Result<MockWorkspace> {
        if dest.exists() {
            fs::remove_dir_all(dest)?;
        }
        fs::create_dir_all(dest)?;

        for (path, content) in &self.files {
            let file = dest.join(path);
            if let Some(parent) = file.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(file, content)?;
        }

        self.calls
            .lock()
            .unwrap()
            .push(format!("clone {}", url.redacted));

        MockWorkspace::new(dest, Arc::clone(&self.calls))
    }
}

/// Mock working copy backed by a plain directory
///
/// `changed_paths` reports files whose content differs from the snapshot taken
/// at creation (or at the last commit), plus files added or removed since.
pub struct MockWorkspace {
    root: PathBuf,
    snapshot: Mutex<BTreeMap<String, Vec<u8>>>,
    calls: CallLog,
}

impl MockWorkspace {
    fn new(root: &Path, calls: CallLog) -> Result<Self> {
        let snapshot = read_tree(root)?;
        Ok(MockWorkspace {
            root: root.to_path_buf(),
            snapshot: Mutex::new(snapshot),
            calls,
        })
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

/// All files under `root`, keyed by `/`-separated relative path
fn read_tree(root: &Path) -> Result<BTreeMap<String, Vec<u8>>> {
    let mut files = BTreeMap::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if let Ok(relative) = path.strip_prefix(root) {
                let key = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/");
                files.insert(key, fs::read(&path)?);
            }
        }
    }

    Ok(files)
}

impl Workspace for MockWorkspace {
    fn root(&self) -> &Path {
        &self.root
    }

    fn configure_identity(&self, identity: &CommitIdentity) -> Result<()> {
        self.record(format!(
            "config user.name {} user.email {}",
            identity.name, identity.email
        ));
        Ok(())
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.record(format!("checkout {}", branch));
        Ok(())
    }

    fn create_branch(&self, branch: &str) -> Result<()> {
        self.record(format!("checkout -b {}", branch));
        Ok(())
    }

    fn changed_paths(&self) -> Result<Vec<String>> {
        let current = read_tree(&self.root)?;
        let snapshot = self.snapshot.lock().unwrap();

        let mut changed: Vec<String> = current
            .iter()
            .filter(|(path, content)| snapshot.get(*path) != Some(*content))
            .map(|(path, _)| path.clone())
            .collect();
        changed.extend(
            snapshot
                .keys()
                .filter(|path| !current.contains_key(*path))
                .cloned(),
        );
        changed.sort();

        Ok(changed)
    }

    fn stage_all(&self) -> Result<()> {
        self.record("add .".to_string());
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<()> {
        *self.snapshot.lock().unwrap() = read_tree(&self.root)?;
        self.record(format!("commit -m {}", message));
        Ok(())
    }

    fn push(&self) -> Result<()> {
        self.record("push".to_string());
        Ok(())
    }

    fn push_new_branch(&self, remote: &str) -> Result<()> {
        self.record(format!("push -u {} HEAD", remote));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mock_clone_writes_seed_files() {
        let dir = TempDir::new().unwrap();
        let cloner = MockCloner::with_files([("db/Dockerfile", "FROM postgres:15\n")]);

        let workspace = cloner
            .clone_fresh(&CloneUrl::plain("origin.git"), &dir.path().join("clone"))
            .unwrap();

        assert_eq!(
            fs::read_to_string(workspace.root().join("db/Dockerfile")).unwrap(),
            "FROM postgres:15\n"
        );
        assert!(workspace.changed_paths().unwrap().is_empty());
        assert_eq!(cloner.calls(), vec!["clone origin.git"]);
    }

    #[test]
    fn test_mock_clone_replaces_previous_directory() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("clone");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("stale.txt"), "left over").unwrap();

        let cloner = MockCloner::with_files([("a.txt", "a")]);
        let workspace = cloner.clone_fresh(&CloneUrl::plain("x"), &dest).unwrap();

        assert!(!workspace.root().join("stale.txt").exists());
    }

    #[test]
    fn test_mock_detects_modified_added_and_removed_files() {
        let dir = TempDir::new().unwrap();
        let cloner = MockCloner::with_files([("a/Dockerfile", "FROM a"), ("b/Dockerfile", "FROM b")]);
        let workspace = cloner
            .clone_fresh(&CloneUrl::plain("x"), &dir.path().join("c"))
            .unwrap();

        fs::write(workspace.root().join("a/Dockerfile"), "FROM a2").unwrap();
        fs::remove_file(workspace.root().join("b/Dockerfile")).unwrap();
        fs::write(workspace.root().join("new.txt"), "n").unwrap();

        assert_eq!(
            workspace.changed_paths().unwrap(),
            vec!["a/Dockerfile", "b/Dockerfile", "new.txt"]
        );
    }

    #[test]
    fn test_mock_commit_cleans_status() {
        let dir = TempDir::new().unwrap();
        let cloner = MockCloner::with_files([("Dockerfile", "FROM a")]);
        let workspace = cloner
            .clone_fresh(&CloneUrl::plain("x"), &dir.path().join("c"))
            .unwrap();

        fs::write(workspace.root().join("Dockerfile"), "FROM b").unwrap();
        workspace.stage_all().unwrap();
        workspace.commit("msg").unwrap();

        assert!(workspace.changed_paths().unwrap().is_empty());
        assert_eq!(cloner.calls_starting_with("commit"), vec!["commit -m msg"]);
    }
}
