use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use zonefs_core::{ObjectReader, RemoteStore, StoreEntry, StoreError};

/// A remote path prefix served by one backend.
pub struct Mount {
    pub path: String,
    pub store: Arc<dyn RemoteStore>,
}

/// Dispatches remote paths to the backend of the longest matching mount.
pub struct ZoneRouter {
    /// Mounts sorted by path length (longest first) for longest-prefix matching.
    mounts: Vec<Mount>,
}

impl ZoneRouter {
    /// Create a new router with the given mounts.
    pub fn new(mut mounts: Vec<Mount>) -> Self {
        mounts.sort_by(|a, b| b.path.len().cmp(&a.path.len()));
        ZoneRouter { mounts }
    }

    /// Resolve a path to its backend and mount-relative path.
    pub fn resolve(&self, path: &str) -> Result<(&dyn RemoteStore, String), StoreError> {
        let normalized = normalize_path(path);

        for mount in &self.mounts {
            if let Some(relative) = strip_mount_prefix(&normalized, &mount.path) {
                return Ok((mount.store.as_ref(), relative));
            }
        }

        Err(StoreError::NoMount(path.to_string()))
    }

    /// Mount paths, longest first.
    pub fn mount_paths(&self) -> impl Iterator<Item = &str> {
        self.mounts.iter().map(|m| m.path.as_str())
    }
}

#[async_trait]
impl RemoteStore for ZoneRouter {
    #[instrument(skip(self), fields(path = %path))]
    async fn stat(&self, path: &str) -> Result<StoreEntry, StoreError> {
        let (store, relative) = self.resolve(path)?;
        debug!(relative = %relative, "resolved mount");

        let mut entry = store.stat(&relative).await?;
        // Report the full remote path rather than the backend-relative one
        entry.path = normalize_path(path);
        Ok(entry)
    }

    #[instrument(skip(self), fields(path = %path))]
    async fn open_read(&self, path: &str) -> Result<Box<dyn ObjectReader>, StoreError> {
        let (store, relative) = self.resolve(path)?;
        debug!(relative = %relative, "resolved mount");
        store.open_read(&relative).await
    }
}

/// Normalize a path by ensuring it starts with / and has no trailing slash.
fn normalize_path(path: &str) -> String {
    let mut normalized = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };

    // Remove trailing slash unless it's the root
    if normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }

    normalized
}

/// Strip the mount prefix from a path and return the relative path.
fn strip_mount_prefix(path: &str, mount_path: &str) -> Option<String> {
    let mount_normalized = mount_path.trim_end_matches('/');

    if path == mount_normalized {
        // Exact match - return empty path (root of mount)
        return Some(String::new());
    }

    if let Some(suffix) = path.strip_prefix(mount_normalized) {
        if let Some(relative) = suffix.strip_prefix('/') {
            return Some(relative.to_string());
        }
    }

    // Special case: root mount "/"
    if mount_normalized.is_empty() {
        return Some(path.trim_start_matches('/').to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::MemoryStore;
    use zonefs_core::EntryKind;

    fn store_with(path: &str, content: &str) -> Arc<dyn RemoteStore> {
        let store = MemoryStore::new();
        store.put_object(path, content);
        Arc::new(store)
    }

    #[test]
    fn test_longest_prefix_matching() {
        let router = ZoneRouter::new(vec![
            Mount {
                path: "/".to_string(),
                store: Arc::new(MemoryStore::new()),
            },
            Mount {
                path: "/tempZone".to_string(),
                store: Arc::new(MemoryStore::new()),
            },
        ]);

        let (_, relative) = router.resolve("/tempZone/home/alice/a.txt").unwrap();
        assert_eq!(relative, "home/alice/a.txt");

        let (_, relative) = router.resolve("/otherZone/a.txt").unwrap();
        assert_eq!(relative, "otherZone/a.txt");

        assert_eq!(router.mount_paths().collect::<Vec<_>>(), vec!["/tempZone", "/"]);
    }

    #[test]
    fn test_exact_mount_match() {
        let router = ZoneRouter::new(vec![Mount {
            path: "/tempZone".to_string(),
            store: Arc::new(MemoryStore::new()),
        }]);

        let (_, relative) = router.resolve("/tempZone").unwrap();
        assert_eq!(relative, "");
    }

    #[test]
    fn test_prefix_must_end_at_separator() {
        let router = ZoneRouter::new(vec![Mount {
            path: "/tempZone".to_string(),
            store: Arc::new(MemoryStore::new()),
        }]);

        let result = router.resolve("/tempZoneExtra/a.txt");
        assert!(matches!(result, Err(StoreError::NoMount(_))));
    }

    #[tokio::test]
    async fn test_stat_reports_full_path() {
        let router = ZoneRouter::new(vec![Mount {
            path: "/tempZone".to_string(),
            store: store_with("home/alice/a.txt", "abc"),
        }]);

        let entry = router.stat("/tempZone/home/alice/a.txt").await.unwrap();
        assert_eq!(entry.path, "/tempZone/home/alice/a.txt");
        assert_eq!(entry.kind, EntryKind::DataObject);

        let zone = router.stat("/tempZone").await.unwrap();
        assert_eq!(zone.kind, EntryKind::Collection);
    }

    #[tokio::test]
    async fn test_routes_to_matching_backend() {
        let router = ZoneRouter::new(vec![
            Mount {
                path: "/zoneA".to_string(),
                store: store_with("x", "from A"),
            },
            Mount {
                path: "/zoneB".to_string(),
                store: store_with("x", "from B!"),
            },
        ]);

        assert_eq!(router.stat("/zoneA/x").await.unwrap().size, Some(6));
        assert_eq!(router.stat("/zoneB/x").await.unwrap().size, Some(7));

        let mut reader = router.open_read("/zoneB/x").await.unwrap();
        let mut buf = [0u8; 16];
        let chunk = reader.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..chunk.len], b"from B!");
    }

    #[tokio::test]
    async fn test_unmounted_path_is_no_mount() {
        let router = ZoneRouter::new(vec![Mount {
            path: "/zoneA".to_string(),
            store: store_with("x", "a"),
        }]);

        let err = router.stat("/zoneC/x").await.unwrap_err();
        assert!(matches!(err, StoreError::NoMount(p) if p == "/zoneC/x"));
    }
}
