use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::ActionError;

/// On-disk tool cache laid out as `<root>/<tool>/<version>/<arch>/`.
///
/// An entry is only trusted once its `<arch>.complete` marker exists next to
/// the directory, so an interrupted install is never picked up. Jobs are
/// single-occupant; there is no locking.
#[derive(Debug, Clone)]
pub struct ToolCache {
    root: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheKey<'a> {
    pub tool: &'a str,
    pub version: &'a str,
    pub arch: &'a str,
}

impl ToolCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn entry_dir(&self, key: CacheKey<'_>) -> PathBuf {
        self.root.join(key.tool).join(key.version).join(key.arch)
    }

    fn marker(&self, key: CacheKey<'_>) -> PathBuf {
        self.root
            .join(key.tool)
            .join(key.version)
            .join(format!("{}.complete", key.arch))
    }

    fn digest_file(&self, key: CacheKey<'_>) -> PathBuf {
        self.root
            .join(key.tool)
            .join(key.version)
            .join(format!("{}.sha256", key.arch))
    }

    /// Directory of a completed entry, if any.
    pub fn find(&self, key: CacheKey<'_>) -> Option<PathBuf> {
        let dir = self.entry_dir(key);
        let hit = dir.is_dir() && self.marker(key).is_file();
        debug!(dir = %dir.display(), hit, "tool cache lookup");
        hit.then_some(dir)
    }

    /// Empty directory to install an entry into, replacing any partial one.
    pub fn prepare(&self, key: CacheKey<'_>) -> Result<PathBuf, ActionError> {
        let dir = self.entry_dir(key);
        let marker = self.marker(key);
        if marker.exists() {
            fs::remove_file(&marker)?;
        }
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Seal an entry, recording the archive digest it was installed from.
    pub fn complete(&self, key: CacheKey<'_>, sha256: &str) -> Result<(), ActionError> {
        fs::write(self.digest_file(key), format!("{sha256}\n"))?;
        fs::write(self.marker(key), b"")?;
        Ok(())
    }

    /// Digest recorded by [`ToolCache::complete`].
    pub fn recorded_digest(&self, key: CacheKey<'_>) -> Option<String> {
        fs::read_to_string(self.digest_file(key))
            .ok()
            .map(|s| s.trim().to_string())
    }
}
