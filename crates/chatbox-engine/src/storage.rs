//! Session-scoped scratch storage.
//!
//! Shared images are copied into a scratch directory and referred to by an
//! [`ImageRef`]. Teardown removes the staged copies and nothing else, so a
//! configured directory may be shared with other files.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;
use uuid::Uuid;

use crate::message::ImageRef;

/// Scratch directory owned by one session.
#[derive(Debug)]
pub struct SessionStorage {
    root: PathBuf,
    staged: RefCell<Vec<PathBuf>>,
    // Keeps a temporary directory alive; removed from disk on drop.
    _temp: Option<TempDir>,
}

impl SessionStorage {
    /// Use a fresh temporary directory.
    pub fn temporary() -> Result<Self, StorageError> {
        let temp = tempfile::Builder::new()
            .prefix("chatbox-")
            .tempdir()
            .map_err(StorageError::Io)?;
        Ok(Self {
            root: temp.path().to_path_buf(),
            staged: RefCell::default(),
            _temp: Some(temp),
        })
    }

    /// Use `dir`, creating it if needed. The directory itself outlives the session.
    pub fn at(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = dir.into();
        std::fs::create_dir_all(&root).map_err(StorageError::Io)?;
        Ok(Self {
            root,
            staged: RefCell::default(),
            _temp: None,
        })
    }

    /// Scratch directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Copy `source` into scratch storage and return a handle to the copy.
    pub fn stage_image(&self, source: &Path) -> Result<ImageRef, StorageError> {
        if !source.exists() {
            return Err(StorageError::NotFound(source.to_path_buf()));
        }
        if !source.is_file() {
            return Err(StorageError::NotAFile(source.to_path_buf()));
        }

        let id = Uuid::new_v4();
        let file_name = source
            .file_name()
            .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().to_string());
        let path = self.root.join(format!("{id}-{file_name}"));
        let bytes = std::fs::copy(source, &path).map_err(StorageError::Io)?;
        self.staged.borrow_mut().push(path.clone());

        debug!(%id, file = %file_name, bytes, "staged image");
        Ok(ImageRef {
            id,
            file_name,
            path,
            bytes,
        })
    }

    /// Remove the copies this storage staged. Returns how many were removed.
    ///
    /// Other files in the directory are left alone.
    pub fn clear(&self) -> Result<usize, StorageError> {
        let mut staged = self.staged.borrow_mut();
        let mut removed = 0;
        while let Some(path) = staged.pop() {
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    staged.push(path);
                    return Err(StorageError::Io(e));
                }
            }
        }
        Ok(removed)
    }
}

/// Errors that can occur in scratch storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The selected file does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The selected path is not a regular file.
    #[error("Not a file: {}", .0.display())]
    NotAFile(PathBuf),
}
