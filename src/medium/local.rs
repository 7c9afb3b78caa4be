//! # Local Filesystem Medium

use std::fs;
use std::path::PathBuf;

use super::backend::Medium;
use super::errors::{MediumError, MediumResult};

/// Filesystem-backed medium rooting every key under one directory.
///
/// Keys are relative paths with forward slashes. Saves go through a sibling
/// temporary file plus rename, so a concurrent reader sees either the old
/// blob or the new one, never a partial write.
#[derive(Debug)]
pub struct LocalMedium {
    root: PathBuf,
}

impl LocalMedium {
    /// Create a medium rooted at `root`.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn full_path(&self, key: &str) -> MediumResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

/// Reject keys that would escape the medium root.
fn validate_key(key: &str) -> MediumResult<()> {
    if key.is_empty() || key.starts_with('/') || key.split('/').any(|part| part == "..") {
        return Err(MediumError::InvalidKey(key.to_string()));
    }
    Ok(())
}

impl Medium for LocalMedium {
    fn retrieve(&self, key: &str) -> MediumResult<Option<Vec<u8>>> {
        let path = self.full_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MediumError::io(key, &e)),
        }
    }

    fn save(&self, key: &str, bytes: &[u8]) -> MediumResult<()> {
        let path = self.full_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| MediumError::io(key, &e))?;
        }

        // Write-then-rename keeps the blob atomic on the same filesystem.
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, bytes).map_err(|e| MediumError::io(key, &e))?;
        fs::rename(&tmp, &path).map_err(|e| MediumError::io(key, &e))
    }

    fn remove(&self, key: &str) -> MediumResult<()> {
        let path = self.full_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MediumError::io(key, &e)),
        }
    }

    fn rename(&self, key: &str, new_key: &str) -> MediumResult<()> {
        let from = self.full_path(key)?;
        let to = self.full_path(new_key)?;
        if !from.exists() {
            return Err(MediumError::NotFound(key.to_string()));
        }
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).map_err(|e| MediumError::io(new_key, &e))?;
        }
        fs::rename(&from, &to).map_err(|e| MediumError::io(key, &e))
    }
}
