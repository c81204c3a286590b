//! Content-hash-gated publication to a versioned store.
//!
//! The pipeline only ever talks to [`VersionedStore`]; the git plumbing
//! lives in [`GitStore`] so the core logic never depends on command syntax.

use crate::error::{MenuError, Result};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::process::Command;

/// Capability interface over the shared versioned store
pub trait VersionedStore {
    /// Current content of the published artifact, if one exists
    fn read_artifact(&self) -> Result<Option<Vec<u8>>>;
    /// Bring the local working copy up to date with the remote
    fn pull(&self) -> Result<()>;
    /// Write the new artifact content locally
    fn write(&self, content: &str) -> Result<()>;
    /// Record the written artifact in the store's history
    fn commit(&self, message: &str) -> Result<()>;
    /// Publish recorded changes to the remote
    fn push(&self) -> Result<()>;
}

/// Outcome of a publish attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Hashes matched; the store was not touched
    Unchanged,
    /// The artifact changed and was pushed
    Updated,
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Publish `json` unless it hashes identically to the currently published
/// artifact; a missing prior artifact always counts as changed.
///
/// On change the order is pull, write, commit, push. Pulling before the
/// write keeps concurrent edits to the store from being clobbered. Every
/// step is fatal on failure; a push failure after a successful write
/// leaves local and remote inconsistent until the next run's pull, which
/// is why it is surfaced rather than swallowed.
pub fn publish<S: VersionedStore>(store: &S, json: &str) -> Result<Outcome> {
    let new_hash = sha256_hex(json.as_bytes());
    let old_hash = store.read_artifact()?.map(|bytes| sha256_hex(&bytes));

    if old_hash.as_deref() == Some(new_hash.as_str()) {
        log::info!("No menu change ({}), skipping publish", new_hash);
        return Ok(Outcome::Unchanged);
    }

    log::info!("Menu changed, publishing update");
    store.pull()?;
    store.write(json)?;
    let message = format!(
        "Auto-update @ {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S")
    );
    store.commit(&message)?;
    store.push()?;
    Ok(Outcome::Updated)
}

/// Git-backed store: a local clone of the menu repository with an `origin`
/// remote, holding the artifact at a fixed file name.
pub struct GitStore {
    repo_dir: PathBuf,
    artifact_name: String,
}

impl GitStore {
    pub fn new(repo_dir: PathBuf, artifact_name: String) -> Self {
        Self {
            repo_dir,
            artifact_name,
        }
    }

    fn artifact_path(&self) -> PathBuf {
        self.repo_dir.join(&self.artifact_name)
    }

    fn git(&self, args: &[&str]) -> Result<()> {
        log::debug!("git {}", args.join(" "));
        let status = Command::new("git")
            .arg("-C")
            .arg(&self.repo_dir)
            .args(args)
            .status()?;
        if status.success() {
            Ok(())
        } else {
            Err(MenuError::Sync(format!(
                "git {} exited with {}",
                args.join(" "),
                status
            )))
        }
    }
}

impl VersionedStore for GitStore {
    fn read_artifact(&self) -> Result<Option<Vec<u8>>> {
        match std::fs::read(self.artifact_path()) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MenuError::Io(e)),
        }
    }

    fn pull(&self) -> Result<()> {
        self.git(&["pull", "--rebase", "origin", "main"])
    }

    fn write(&self, content: &str) -> Result<()> {
        std::fs::write(self.artifact_path(), content)?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.git(&["add", self.artifact_name.as_str()])?;
        self.git(&["commit", "-m", message])
    }

    fn push(&self) -> Result<()> {
        self.git(&["push", "origin", "main"])
    }
}

#[cfg(test)]
#[path = "publish_tests.rs"]
mod tests;
