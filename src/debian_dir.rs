//! Filesystem side of an update: locating, reading and writing the
//! packaging files.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::config::FilesConfig;
use crate::error::{Result, UpdateCommitError};

/// Paths of the packaging files inside a debian directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebianDir {
    pub root: PathBuf,
    pub changelog: PathBuf,
    pub rules: PathBuf,
    pub control: PathBuf,
}

impl DebianDir {
    pub fn new(root: impl AsRef<Path>, files: &FilesConfig) -> Self {
        let root = root.as_ref();
        DebianDir {
            root: root.to_path_buf(),
            changelog: root.join(&files.changelog),
            rules: root.join(&files.rules),
            control: root.join(&files.control),
        }
    }

    /// Ensure the directory and every packaging file exist.
    pub fn check(&self) -> Result<()> {
        if !self.root.is_dir() {
            return Err(UpdateCommitError::InvalidDirectory(self.root.clone()));
        }

        for file in [&self.changelog, &self.rules, &self.control] {
            if !file.is_file() {
                return Err(UpdateCommitError::MissingFile(file.clone()));
            }
        }

        Ok(())
    }
}

/// Read a packaging file to a string.
pub fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| UpdateCommitError::io(path, e))
}

/// New file contents written next to their targets, renamed into place
/// together by [`StagedWrites::commit`].
#[derive(Debug, Default)]
pub struct StagedWrites {
    staged: Vec<(NamedTempFile, PathBuf)>,
}

impl StagedWrites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `contents` to a temporary file beside `path`.
    ///
    /// The temporary file takes the permissions of the file it replaces, so
    /// an executable `rules` stays executable.
    pub fn stage(&mut self, path: &Path, contents: &str) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir).map_err(|e| UpdateCommitError::io(dir, e))?;
        file.write_all(contents.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| UpdateCommitError::io(file.path(), e))?;

        if let Ok(metadata) = fs::metadata(path) {
            fs::set_permissions(file.path(), metadata.permissions())
                .map_err(|e| UpdateCommitError::io(file.path(), e))?;
        }

        self.staged.push((file, path.to_path_buf()));
        Ok(())
    }

    /// Rename every staged file over its target, in staging order.
    pub fn commit(self) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.staged.len());
        for (file, path) in self.staged {
            file.persist(&path)
                .map_err(|e| UpdateCommitError::io(&path, e.error))?;
            written.push(path);
        }
        Ok(written)
    }
}
