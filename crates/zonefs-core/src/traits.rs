use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;

/// Kind of entry as reported by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EntryKind {
    /// Content-bearing leaf.
    DataObject,
    /// Entry grouping other entries.
    Collection,
    /// Anything else the store knows about (links, devices, ...).
    Other(String),
}

/// Metadata about a remote entry.
#[derive(Debug, Clone)]
pub struct StoreEntry {
    /// Full path of the entry.
    pub path: String,
    /// Last path component.
    pub name: String,
    pub kind: EntryKind,
    /// Size in bytes (None for collections).
    pub size: Option<u64>,
    /// Last modification time.
    pub modified: Option<DateTime<Utc>>,
}

impl StoreEntry {
    /// Create a new data object entry.
    pub fn data_object(
        path: String,
        name: String,
        size: u64,
        modified: Option<DateTime<Utc>>,
    ) -> Self {
        StoreEntry {
            path,
            name,
            kind: EntryKind::DataObject,
            size: Some(size),
            modified,
        }
    }

    /// Create a new collection entry.
    pub fn collection(path: String, name: String, modified: Option<DateTime<Utc>>) -> Self {
        StoreEntry {
            path,
            name,
            kind: EntryKind::Collection,
            size: None,
            modified,
        }
    }

    /// Create an entry of a kind the store does not classify further.
    pub fn other(path: String, name: String, description: impl Into<String>) -> Self {
        StoreEntry {
            path,
            name,
            kind: EntryKind::Other(description.into()),
            size: None,
            modified: None,
        }
    }
}

/// Outcome of a single [`ObjectReader::read`] call.
///
/// A reader may hand back the final bytes and the end-of-stream signal in
/// the same call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadChunk {
    /// Number of bytes placed at the front of the caller's buffer.
    pub len: usize,
    pub end_of_stream: bool,
}

impl ReadChunk {
    /// `len` bytes, more to come.
    pub fn data(len: usize) -> Self {
        ReadChunk {
            len,
            end_of_stream: false,
        }
    }

    /// `len` bytes and nothing after them.
    pub fn last(len: usize) -> Self {
        ReadChunk {
            len,
            end_of_stream: true,
        }
    }

    /// No bytes, end of stream.
    pub fn eof() -> Self {
        Self::last(0)
    }
}

/// A read-only, sequential stream over one data object.
#[async_trait]
pub trait ObjectReader: Send {
    /// Read up to `buf.len()` bytes into the front of `buf`.
    async fn read(&mut self, buf: &mut [u8]) -> Result<ReadChunk, StoreError>;

    /// Release the stream. Called exactly once by the owner.
    fn close(&mut self) -> Result<(), StoreError>;
}

/// Trait for remote store implementations.
#[async_trait]
pub trait RemoteStore: Send + Sync + 'static {
    /// Get metadata for a path.
    async fn stat(&self, path: &str) -> Result<StoreEntry, StoreError>;

    /// Open a data object for sequential reading.
    async fn open_read(&self, path: &str) -> Result<Box<dyn ObjectReader>, StoreError>;
}
