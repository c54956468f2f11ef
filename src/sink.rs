//! Durable persistence of a recovered password.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::search::SearchResult;

/// Writes the recovered password to a plaintext file.
///
/// The file holds exactly the password bytes, nothing else. A pre-existing
/// file at the same path is fully overwritten, never appended to.
pub struct PasswordFile {
    path: PathBuf,
}

impl PasswordFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persists the password when the search found one; returns the path
    /// written. Exhausted and aborted runs leave the file system untouched.
    pub fn persist(&self, result: &SearchResult) -> Result<Option<&Path>> {
        match result.password() {
            Some(password) => {
                fs::write(&self.path, password)?;
                Ok(Some(&self.path))
            }
            None => Ok(None),
        }
    }
}
