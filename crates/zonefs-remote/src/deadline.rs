use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use zonefs_core::{ObjectReader, ReadChunk, RemoteStore, StoreEntry, StoreError};

/// Applies a per-operation deadline to every call on the wrapped store.
///
/// Each stat, open and individual read gets its own deadline; a slow stream
/// of many fast reads never times out.
pub struct DeadlineStore {
    inner: Arc<dyn RemoteStore>,
    timeout: Duration,
}

impl DeadlineStore {
    pub fn new(inner: Arc<dyn RemoteStore>, timeout: Duration) -> Self {
        DeadlineStore { inner, timeout }
    }
}

async fn with_deadline<T>(
    timeout: Duration,
    operation: &str,
    path: &str,
    fut: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, StoreError> {
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(operation, path, ?timeout, "store operation exceeded deadline");
            Err(StoreError::Timeout {
                operation: operation.to_string(),
                path: path.to_string(),
            })
        }
    }
}

#[async_trait]
impl RemoteStore for DeadlineStore {
    async fn stat(&self, path: &str) -> Result<StoreEntry, StoreError> {
        with_deadline(self.timeout, "stat", path, self.inner.stat(path)).await
    }

    async fn open_read(&self, path: &str) -> Result<Box<dyn ObjectReader>, StoreError> {
        let inner = with_deadline(self.timeout, "open", path, self.inner.open_read(path)).await?;
        Ok(Box::new(DeadlineReader {
            inner,
            timeout: self.timeout,
            path: path.to_string(),
        }))
    }
}

struct DeadlineReader {
    inner: Box<dyn ObjectReader>,
    timeout: Duration,
    path: String,
}

#[async_trait]
impl ObjectReader for DeadlineReader {
    async fn read(&mut self, buf: &mut [u8]) -> Result<ReadChunk, StoreError> {
        with_deadline(self.timeout, "read", &self.path, self.inner.read(buf)).await
    }

    fn close(&mut self) -> Result<(), StoreError> {
        self.inner.close()
    }
}
