//! Scripted store and recording sink shared by the unit tests.

use std::collections::HashMap;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use async_trait::async_trait;
use tokio::io::AsyncWrite;

use crate::error::StoreError;
use crate::traits::{ObjectReader, ReadChunk, RemoteStore, StoreEntry};

pub enum Scripted {
    Object(Vec<u8>),
    /// Like `Object`, but the final bytes arrive together with end-of-stream.
    ObjectWithTrailingEof(Vec<u8>),
    Collection,
    Other(&'static str),
    /// Stat works, open fails.
    Unopenable(Vec<u8>),
    /// Stream fails once this many bytes have been handed out.
    BrokenAfter(Vec<u8>, usize),
}

/// Store driven by a fixed table, logging every call.
#[derive(Default)]
pub struct ScriptedStore {
    entries: HashMap<String, Scripted>,
    denied: Vec<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedStore {
    pub fn with(mut self, path: &str, entry: Scripted) -> Self {
        self.entries.insert(path.to_string(), entry);
        self
    }

    pub fn deny(mut self, path: &str) -> Self {
        self.denied.push(path.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RemoteStore for ScriptedStore {
    async fn stat(&self, path: &str) -> Result<StoreEntry, StoreError> {
        self.record(format!("stat:{}", path));
        if self.denied.iter().any(|d| d == path) {
            return Err(StoreError::PermissionDenied(path.to_string()));
        }
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        match self.entries.get(path) {
            Some(Scripted::Object(data))
            | Some(Scripted::ObjectWithTrailingEof(data))
            | Some(Scripted::Unopenable(data))
            | Some(Scripted::BrokenAfter(data, _)) => Ok(StoreEntry::data_object(
                path.to_string(),
                name,
                data.len() as u64,
                None,
            )),
            Some(Scripted::Collection) => Ok(StoreEntry::collection(path.to_string(), name, None)),
            Some(Scripted::Other(kind)) => Ok(StoreEntry::other(path.to_string(), name, *kind)),
            None => Err(StoreError::NotFound(path.to_string())),
        }
    }

    async fn open_read(&self, path: &str) -> Result<Box<dyn ObjectReader>, StoreError> {
        self.record(format!("open:{}", path));
        let (data, fail_after, trailing_eof) = match self.entries.get(path) {
            Some(Scripted::Object(data)) => (data.clone(), None, false),
            Some(Scripted::ObjectWithTrailingEof(data)) => (data.clone(), None, true),
            Some(Scripted::BrokenAfter(data, n)) => (data.clone(), Some(*n), false),
            Some(Scripted::Unopenable(_)) => {
                return Err(StoreError::PermissionDenied(path.to_string()))
            }
            _ => return Err(StoreError::NotFound(path.to_string())),
        };
        Ok(Box::new(ScriptedReader {
            path: path.to_string(),
            data,
            pos: 0,
            fail_after,
            trailing_eof,
            calls: Arc::clone(&self.calls),
        }))
    }
}

struct ScriptedReader {
    path: String,
    data: Vec<u8>,
    pos: usize,
    fail_after: Option<usize>,
    trailing_eof: bool,
    calls: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl ObjectReader for ScriptedReader {
    async fn read(&mut self, buf: &mut [u8]) -> Result<ReadChunk, StoreError> {
        if let Some(limit) = self.fail_after {
            if self.pos >= limit {
                return Err(StoreError::Io(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "connection reset by peer",
                )));
            }
        }
        let end = match self.fail_after {
            Some(limit) => limit.min(self.data.len()),
            None => self.data.len(),
        };
        let n = buf.len().min(end - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        if n == 0 {
            Ok(ReadChunk::eof())
        } else if self.trailing_eof && self.pos == end {
            Ok(ReadChunk::last(n))
        } else {
            Ok(ReadChunk::data(n))
        }
    }

    fn close(&mut self) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(format!("close:{}", self.path));
        Ok(())
    }
}

/// Sink that keeps every write call separately.
#[derive(Default)]
pub struct RecordingSink {
    pub writes: Vec<Vec<u8>>,
    pub flushes: usize,
    /// Refuse writes once this many bytes were accepted.
    pub capacity: Option<usize>,
}

impl RecordingSink {
    pub fn bytes(&self) -> Vec<u8> {
        self.writes.concat()
    }

    fn accepted(&self) -> usize {
        self.writes.iter().map(Vec::len).sum()
    }
}

impl AsyncWrite for RecordingSink {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        if let Some(capacity) = self.capacity {
            if self.accepted() + buf.len() > capacity {
                return Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe")));
            }
        }
        self.writes.push(buf.to_vec());
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.flushes += 1;
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Deterministic, non-repeating-looking test payload.
pub fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}
