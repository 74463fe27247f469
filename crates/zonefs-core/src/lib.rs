mod cat;
mod classify;
mod error;
mod path;
mod stream;
mod traits;

#[cfg(test)]
mod testing;

pub use cat::{cat_one, display_contents, CatSummary};
pub use classify::{classify, EntryDescriptor, EntryType};
pub use error::{CatError, StoreError};
pub use path::{resolve, RemotePath, SessionContext};
pub use stream::{stream_entry, CatOptions, DEFAULT_BUFFER_SIZE};
pub use traits::{EntryKind, ObjectReader, ReadChunk, RemoteStore, StoreEntry};
