use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use zonefs_core::{ObjectReader, ReadChunk, RemoteStore, StoreEntry, StoreError};

enum Node {
    Object(Arc<Vec<u8>>, DateTime<Utc>),
    Collection(DateTime<Utc>),
    Special(String),
}

/// In-memory store for testing and demos.
///
/// Parents of stored objects exist implicitly as collections.
pub struct MemoryStore {
    nodes: RwLock<HashMap<String, Node>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        MemoryStore {
            nodes: RwLock::new(HashMap::new()),
        }
    }

    /// Store a data object, replacing whatever was at `path`.
    pub fn put_object(&self, path: &str, content: impl Into<Vec<u8>>) {
        let mut nodes = self.nodes.write().unwrap_or_else(|e| e.into_inner());
        nodes.insert(
            normalize_path(path),
            Node::Object(Arc::new(content.into()), Utc::now()),
        );
    }

    /// Create an (empty) collection.
    pub fn put_collection(&self, path: &str) {
        let mut nodes = self.nodes.write().unwrap_or_else(|e| e.into_inner());
        nodes.insert(normalize_path(path), Node::Collection(Utc::now()));
    }

    /// Create an entry of a kind that is neither object nor collection.
    pub fn put_special(&self, path: &str, kind: &str) {
        let mut nodes = self.nodes.write().unwrap_or_else(|e| e.into_inner());
        nodes.insert(normalize_path(path), Node::Special(kind.to_string()));
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn stat(&self, path: &str) -> Result<StoreEntry, StoreError> {
        let nodes = self.nodes.read().unwrap_or_else(|e| e.into_inner());
        let normalized = normalize_path(path);
        let name = normalized
            .rsplit('/')
            .next()
            .unwrap_or(&normalized)
            .to_string();

        match nodes.get(&normalized) {
            Some(Node::Object(content, mtime)) => {
                return Ok(StoreEntry::data_object(
                    normalized.clone(),
                    name,
                    content.len() as u64,
                    Some(*mtime),
                ));
            }
            Some(Node::Collection(mtime)) => {
                return Ok(StoreEntry::collection(normalized.clone(), name, Some(*mtime)));
            }
            Some(Node::Special(kind)) => {
                return Ok(StoreEntry::other(normalized.clone(), name, kind.clone()));
            }
            None => {}
        }

        // Implicit collection: the root, or any prefix of a stored path
        let dir_prefix = format!("{}/", normalized);
        if normalized.is_empty() || nodes.keys().any(|k| k.starts_with(&dir_prefix)) {
            return Ok(StoreEntry::collection(normalized, name, None));
        }

        Err(StoreError::NotFound(path.to_string()))
    }

    async fn open_read(&self, path: &str) -> Result<Box<dyn ObjectReader>, StoreError> {
        let nodes = self.nodes.read().unwrap_or_else(|e| e.into_inner());
        match nodes.get(&normalize_path(path)) {
            Some(Node::Object(content, _)) => Ok(Box::new(MemoryReader {
                content: Arc::clone(content),
                pos: 0,
            })),
            Some(_) => Err(StoreError::Other(format!("not a data object: {}", path))),
            None => Err(StoreError::NotFound(path.to_string())),
        }
    }
}

/// Reader over a snapshot of an object; later writes do not affect it.
struct MemoryReader {
    content: Arc<Vec<u8>>,
    pos: usize,
}

#[async_trait]
impl ObjectReader for MemoryReader {
    async fn read(&mut self, buf: &mut [u8]) -> Result<ReadChunk, StoreError> {
        let remaining = &self.content[self.pos..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;

        if self.pos == self.content.len() {
            Ok(ReadChunk::last(n))
        } else {
            Ok(ReadChunk::data(n))
        }
    }

    fn close(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Normalize a path by removing leading/trailing slashes.
fn normalize_path(path: &str) -> String {
    path.trim_matches('/').to_string()
}
