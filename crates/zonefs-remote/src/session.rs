use std::collections::HashMap;
use std::sync::Arc;

use tokio::io::AsyncWrite;
use tracing::{debug, info};

use zonefs_config::{BackendConfig, ConfigError, ZonefsConfig, DEFAULT_BUFFER_SIZE};
use zonefs_core::{
    display_contents, CatError, CatOptions, CatSummary, RemoteStore, SessionContext, StoreError,
};

use crate::backends::{FsStore, MemoryStore};
use crate::deadline::DeadlineStore;
use crate::router::{Mount, ZoneRouter};

/// Errors raised while setting up a session.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to create backend '{name}'")]
    Backend {
        name: String,
        #[source]
        source: StoreError,
    },

    #[error("Buffer size {0} does not fit in memory on this platform")]
    BufferTooLarge(u64),
}

/// Create a store instance from a BackendConfig.
fn create_store(
    name: &str,
    backend_config: &BackendConfig,
) -> Result<Arc<dyn RemoteStore>, SessionError> {
    match backend_config {
        BackendConfig::Fs(fs_config) => {
            let store = FsStore::new(&fs_config.root).map_err(|source| SessionError::Backend {
                name: name.to_string(),
                source,
            })?;
            Ok(Arc::new(store))
        }
        BackendConfig::Memory(memory_config) => {
            let store = MemoryStore::new();
            for collection in &memory_config.collections {
                store.put_collection(collection);
            }
            for (path, content) in &memory_config.objects {
                store.put_object(path, content.as_bytes());
            }
            Ok(Arc::new(store))
        }
    }
}

/// An authenticated view of the store plus the invocation's location context.
pub struct Session {
    config: ZonefsConfig,
    store: Arc<dyn RemoteStore>,
    context: SessionContext,
    options: CatOptions,
}

impl Session {
    /// Create a new session from a configuration.
    pub fn from_config(config: ZonefsConfig) -> Result<Self, SessionError> {
        let effective_config = config.effective();
        effective_config.validate_or_err()?;

        let mut stores: HashMap<String, Arc<dyn RemoteStore>> = HashMap::new();
        for (name, backend_config) in &effective_config.backends {
            stores.insert(name.clone(), create_store(name, backend_config)?);
        }

        let mut mounts = Vec::new();
        for mount_config in &effective_config.mounts {
            let store = mount_config
                .backend
                .as_ref()
                .and_then(|name| stores.get(name))
                .ok_or_else(|| {
                    ConfigError::InvalidMountPath(
                        mount_config.path.clone(),
                        "No backend available for mount".to_string(),
                    )
                })?;

            debug!(mount = %mount_config.path, backend = ?mount_config.backend, "mounting");
            mounts.push(Mount {
                path: mount_config.path.clone(),
                store: Arc::clone(store),
            });
        }

        let router = ZoneRouter::new(mounts);
        debug!(mounts = ?router.mount_paths().collect::<Vec<_>>(), "zone routing ready");
        let router: Arc<dyn RemoteStore> = Arc::new(router);
        let session_config = &effective_config.session;

        let store = match session_config.timeout {
            Some(ref timeout) if !timeout.as_duration().is_zero() => {
                debug!(%timeout, "applying store deadline");
                Arc::new(DeadlineStore::new(router, timeout.as_duration())) as Arc<dyn RemoteStore>
            }
            _ => router,
        };

        let buffer_bytes = session_config
            .buffer_size
            .as_ref()
            .map(|b| b.as_bytes())
            .unwrap_or(DEFAULT_BUFFER_SIZE);
        let buffer_size =
            usize::try_from(buffer_bytes).map_err(|_| SessionError::BufferTooLarge(buffer_bytes))?;

        // effective() fills home and cwd
        let home = session_config.home.clone().unwrap_or_default();
        let cwd = session_config.cwd.clone().unwrap_or_else(|| home.clone());
        let context = SessionContext::new(session_config.zone.clone(), home, cwd);

        info!(
            zone = %context.zone(),
            user = %session_config.user,
            cwd = %context.cwd(),
            "session ready"
        );

        Ok(Session {
            config: effective_config,
            store,
            context,
            options: CatOptions { buffer_size },
        })
    }

    /// The effective configuration, defaults applied.
    pub fn config(&self) -> &ZonefsConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn RemoteStore {
        self.store.as_ref()
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn options(&self) -> &CatOptions {
        &self.options
    }

    /// Stream every path in `paths` to `sink`, stopping at the first failure.
    pub async fn display_contents<S, W>(
        &self,
        paths: &[S],
        sink: &mut W,
    ) -> Result<CatSummary, CatError>
    where
        S: AsRef<str>,
        W: AsyncWrite + Unpin + ?Sized,
    {
        display_contents(self.store(), paths, &self.context, sink, &self.options).await
    }
}
