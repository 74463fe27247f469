use chrono::{DateTime, Utc};
use tracing::{debug, error, instrument, warn};

use crate::error::CatError;
use crate::path::RemotePath;
use crate::traits::{EntryKind, RemoteStore};

/// Whether an entry has streamable content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    Leaf,
    Container,
}

/// A classified entry, produced once per input path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDescriptor {
    pub path: RemotePath,
    pub entry_type: EntryType,
    /// Size in bytes, leaf only.
    pub size: Option<u64>,
    pub modified: Option<DateTime<Utc>>,
}

/// Query the store once and classify the entry at `path`.
#[instrument(skip(store), fields(path = %path))]
pub async fn classify(store: &dyn RemoteStore, path: &RemotePath) -> Result<EntryDescriptor, CatError> {
    let entry = store.stat(path.as_str()).await.map_err(|source| {
        error!(error = %source, "metadata query failed");
        if source.is_not_found() {
            CatError::NotFound(path.to_string())
        } else {
            CatError::Metadata {
                path: path.to_string(),
                source,
            }
        }
    })?;

    let entry_type = entry_type_for(path, &entry.kind);
    debug!(
        ?entry_type,
        stored_path = %entry.path,
        entry_name = %entry.name,
        size = ?entry.size,
        modified = ?entry.modified,
        "classified entry"
    );

    Ok(EntryDescriptor {
        path: path.clone(),
        entry_type,
        size: match entry_type {
            EntryType::Leaf => Some(entry.size.unwrap_or(0)),
            EntryType::Container => None,
        },
        modified: entry.modified,
    })
}

/// Policy: kinds other than data objects and collections are never
/// streamed and are reported as containers.
fn entry_type_for(path: &RemotePath, kind: &EntryKind) -> EntryType {
    match kind {
        EntryKind::DataObject => EntryType::Leaf,
        EntryKind::Collection => EntryType::Container,
        EntryKind::Other(description) => {
            warn!(path = %path, kind = %description, "unrecognized entry kind, treating as a collection");
            EntryType::Container
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::path::{resolve, SessionContext};
    use crate::testing::{Scripted, ScriptedStore};

    fn path(raw: &str) -> RemotePath {
        resolve(raw, &SessionContext::new("z", "/z/home/u", "/z/home/u"))
    }

    #[tokio::test]
    async fn test_data_object_is_leaf() {
        let store = ScriptedStore::default().with("/z/a.txt", Scripted::Object(b"abc".to_vec()));

        let entry = classify(&store, &path("/z/a.txt")).await.unwrap();
        assert_eq!(entry.entry_type, EntryType::Leaf);
        assert_eq!(entry.size, Some(3));
        assert_eq!(store.calls(), vec!["stat:/z/a.txt"]);
    }

    #[tokio::test]
    async fn test_collection_is_container() {
        let store = ScriptedStore::default().with("/z/home", Scripted::Collection);

        let entry = classify(&store, &path("/z/home")).await.unwrap();
        assert_eq!(entry.entry_type, EntryType::Container);
        assert_eq!(entry.size, None);
    }

    #[tokio::test]
    async fn test_unknown_kind_is_container() {
        let store = ScriptedStore::default().with("/z/link", Scripted::Other("symlink"));

        let entry = classify(&store, &path("/z/link")).await.unwrap();
        assert_eq!(entry.entry_type, EntryType::Container);
    }

    #[tokio::test]
    async fn test_missing_path_is_not_found() {
        let store = ScriptedStore::default();

        let err = classify(&store, &path("/z/missing")).await.unwrap_err();
        assert!(matches!(err, CatError::NotFound(p) if p == "/z/missing"));
    }

    #[tokio::test]
    async fn test_authorization_failure_propagates() {
        let store = ScriptedStore::default()
            .with("/z/secret", Scripted::Object(vec![1]))
            .deny("/z/secret");

        let err = classify(&store, &path("/z/secret")).await.unwrap_err();
        match err {
            CatError::Metadata { path, source } => {
                assert_eq!(path, "/z/secret");
                assert!(matches!(source, StoreError::PermissionDenied(_)));
            }
            other => panic!("Expected Metadata error, got {:?}", other),
        }
        assert_eq!(store.count("stat:/z/secret"), 1);
    }
}
