use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, instrument, warn};

use crate::classify::{EntryDescriptor, EntryType};
use crate::error::{CatError, StoreError};
use crate::traits::{ObjectReader, ReadChunk, RemoteStore};

/// Reference chunk size for streaming reads (10 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 10 * 1024;

/// Tunables for streaming content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatOptions {
    /// Bytes requested per read; also the peak buffer held in memory.
    pub buffer_size: usize,
}

impl Default for CatOptions {
    fn default() -> Self {
        CatOptions {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Open stream handle, closed when dropped.
struct OpenStream<'a> {
    path: &'a str,
    reader: Box<dyn ObjectReader>,
}

impl OpenStream<'_> {
    async fn read(&mut self, buf: &mut [u8]) -> Result<ReadChunk, StoreError> {
        let chunk = self.reader.read(buf).await?;
        if chunk.len > buf.len() {
            return Err(StoreError::Other(format!(
                "reader returned {} bytes for a {} byte buffer",
                chunk.len,
                buf.len()
            )));
        }
        Ok(chunk)
    }
}

impl Drop for OpenStream<'_> {
    fn drop(&mut self) {
        match self.reader.close() {
            Ok(()) => debug!(path = %self.path, "closed data object"),
            Err(e) => warn!(path = %self.path, error = %e, "failed to close data object"),
        }
    }
}

/// Stream a leaf entry to `sink` chunk by chunk. Returns the bytes written.
///
/// Collections are refused before anything is opened. Bytes already written
/// when a read fails stay written.
#[instrument(skip(store, entry, sink, options), fields(path = %entry.path))]
pub async fn stream_entry<W>(
    store: &dyn RemoteStore,
    entry: &EntryDescriptor,
    sink: &mut W,
    options: &CatOptions,
) -> Result<u64, CatError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    match entry.entry_type {
        EntryType::Leaf => {}
        EntryType::Container => {
            error!("cannot show the content of a collection");
            return Err(CatError::InvalidOperation(entry.path.to_string()));
        }
    }

    let path = entry.path.as_str();
    debug!(size = ?entry.size, modified = ?entry.modified, "showing the content of a data object");

    let reader = store.open_read(path).await.map_err(|source| {
        error!(error = %source, "failed to open data object");
        CatError::Open {
            path: path.to_string(),
            source,
        }
    })?;
    let mut stream = OpenStream { path, reader };

    let mut buf = vec![0u8; options.buffer_size.max(1)];
    let mut written = 0u64;

    loop {
        let chunk = stream.read(&mut buf).await.map_err(|source| {
            error!(error = %source, written, "read failed mid-stream");
            CatError::Read {
                path: path.to_string(),
                source,
            }
        })?;

        if chunk.len > 0 {
            sink.write_all(&buf[..chunk.len]).await.map_err(|e| {
                error!(error = %e, "failed to write output");
                CatError::Output(e)
            })?;
            written += chunk.len as u64;
        }

        if chunk.end_of_stream {
            break;
        }
    }

    sink.flush().await?;
    debug!(written, "finished data object");
    Ok(written)
}
