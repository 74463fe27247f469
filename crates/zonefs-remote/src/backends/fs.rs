use std::fs::FileType;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;
use tokio::io::AsyncReadExt;
use tracing::{debug, instrument};

use zonefs_core::{ObjectReader, ReadChunk, RemoteStore, StoreEntry, StoreError};

/// Store backed by a local directory tree.
///
/// Directories are collections and regular files are data objects. Symlinks
/// and other special files are reported as-is and never followed.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Create a new store rooted at an existing directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref();
        let root = root.canonicalize().map_err(|e| {
            StoreError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to canonicalize root path {}: {}", root.display(), e),
            ))
        })?;

        if !root.is_dir() {
            return Err(StoreError::Other(format!(
                "Store root is not a directory: {}",
                root.display()
            )));
        }

        Ok(FsStore { root })
    }

    /// Resolve a store path to a local path, preventing directory traversal.
    fn resolve_path(&self, path: &str) -> Result<PathBuf, StoreError> {
        let trimmed = path.trim_start_matches('/');
        let rel = Path::new(trimmed);

        for component in rel.components() {
            match component {
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(StoreError::PermissionDenied(format!(
                        "path escapes store root: {}",
                        trimmed
                    )));
                }
                _ => {}
            }
        }

        if rel.as_os_str().is_empty() {
            return Ok(self.root.clone());
        }

        let full_path = self.root.join(rel);

        // Check the nearest existing ancestor of the final component resolves
        // under root. The final component itself may be a link.
        let mut ancestor = match full_path.parent() {
            Some(parent) => parent,
            None => full_path.as_path(),
        };
        while !ancestor.exists() {
            match ancestor.parent() {
                Some(parent) => ancestor = parent,
                None => break,
            }
        }

        let canonical_ancestor = ancestor.canonicalize().map_err(StoreError::Io)?;
        if !canonical_ancestor.starts_with(&self.root) {
            return Err(StoreError::PermissionDenied(format!(
                "path escapes store root: {}",
                trimmed
            )));
        }

        Ok(full_path)
    }
}

fn map_io_error(path: &str, e: std::io::Error) -> StoreError {
    match e.kind() {
        std::io::ErrorKind::NotFound => StoreError::NotFound(path.to_string()),
        std::io::ErrorKind::PermissionDenied => StoreError::PermissionDenied(path.to_string()),
        _ => StoreError::Io(e),
    }
}

#[cfg(unix)]
fn describe_special(file_type: &FileType) -> &'static str {
    use std::os::unix::fs::FileTypeExt;

    if file_type.is_symlink() {
        "symlink"
    } else if file_type.is_fifo() {
        "fifo"
    } else if file_type.is_socket() {
        "socket"
    } else if file_type.is_block_device() || file_type.is_char_device() {
        "device"
    } else {
        "special"
    }
}

#[cfg(not(unix))]
fn describe_special(file_type: &FileType) -> &'static str {
    if file_type.is_symlink() {
        "symlink"
    } else {
        "special"
    }
}

#[async_trait]
impl RemoteStore for FsStore {
    #[instrument(skip(self), fields(backend = "fs", path = %path))]
    async fn stat(&self, path: &str) -> Result<StoreEntry, StoreError> {
        let full_path = self.resolve_path(path)?;
        debug!(full_path = ?full_path, "stat");

        // symlink_metadata so links are classified, not followed
        let metadata = fs::symlink_metadata(&full_path)
            .await
            .map_err(|e| map_io_error(path, e))?;

        let entry_path = path.trim_matches('/').to_string();
        let name = entry_path
            .rsplit('/')
            .next()
            .unwrap_or(&entry_path)
            .to_string();
        let modified = metadata.modified().ok().map(DateTime::<Utc>::from);
        let file_type = metadata.file_type();

        let entry = if file_type.is_file() {
            StoreEntry::data_object(entry_path, name, metadata.len(), modified)
        } else if file_type.is_dir() {
            StoreEntry::collection(entry_path, name, modified)
        } else {
            StoreEntry::other(entry_path, name, describe_special(&file_type))
        };

        Ok(entry)
    }

    #[instrument(skip(self), fields(backend = "fs", path = %path))]
    async fn open_read(&self, path: &str) -> Result<Box<dyn ObjectReader>, StoreError> {
        let full_path = self.resolve_path(path)?;
        debug!(full_path = ?full_path, "opening file");

        let file = fs::File::open(&full_path)
            .await
            .map_err(|e| map_io_error(path, e))?;

        Ok(Box::new(FsReader { file: Some(file) }))
    }
}

/// Sequential reader over an open local file.
struct FsReader {
    file: Option<fs::File>,
}

#[async_trait]
impl ObjectReader for FsReader {
    async fn read(&mut self, buf: &mut [u8]) -> Result<ReadChunk, StoreError> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| StoreError::Other("read after close".to_string()))?;

        let n = file.read(buf).await.map_err(StoreError::Io)?;
        if n == 0 {
            Ok(ReadChunk::eof())
        } else {
            Ok(ReadChunk::data(n))
        }
    }

    fn close(&mut self) -> Result<(), StoreError> {
        match self.file.take() {
            Some(file) => {
                drop(file);
                Ok(())
            }
            None => Err(StoreError::Other("stream already closed".to_string())),
        }
    }
}
