//! A temporary path that is removed in `Drop` unless it was renamed
//! to its final destination, so that an interrupted save never
//! leaves a stale temporary file (nor a partially written target).

use std::path::{Path, PathBuf};

use crate::debug;

pub struct TemporaryFile {
    path: PathBuf,
    // Set once the file has been renamed away
    persisted: bool,
}

impl TemporaryFile {
    /// A hidden sibling of `target`: `dir/.name.tmp~pid`.
    pub fn sibling_of(target: &Path) -> Option<Self> {
        let file_name = target.file_name()?.to_string_lossy();
        let pid = std::process::id();
        let path = target.with_file_name(format!(".{file_name}.tmp~{pid}"));
        Some(Self {
            path,
            persisted: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Move the file to `target`, replacing whatever is there.
    pub fn persist(mut self, target: &Path) -> std::io::Result<()> {
        std::fs::rename(&self.path, target)?;
        self.persisted = true;
        Ok(())
    }
}

impl Drop for TemporaryFile {
    fn drop(&mut self) {
        if self.persisted {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("deleted temporary file {:?}", self.path),
            Err(e) => debug!("error deleting temporary file {:?}: {e:#}", self.path),
        }
    }
}
