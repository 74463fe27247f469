/// Errors reported by a remote store.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// Path does not exist.
    #[error("Path not found: {0}")]
    NotFound(String),

    /// No zone is mounted for the path.
    #[error("No mount found for path '{0}'. Check the mounts section of zonefs.yaml.")]
    NoMount(String),

    /// Permission denied for the given path or operation.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Operation exceeded the session deadline.
    #[error("Operation '{operation}' timed out for path: {path}")]
    Timeout { operation: String, path: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other backend-specific error.
    #[error("Backend error: {0}")]
    Other(String),
}

impl StoreError {
    /// Returns true when the store says the path does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            StoreError::NotFound(_) | StoreError::NoMount(_) => true,
            StoreError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Errors surfaced by the `cat` pipeline.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CatError {
    /// No input paths were given.
    #[error("not enough input arguments")]
    InvalidArguments,

    /// The resolved path does not exist.
    #[error("Path not found: {0}")]
    NotFound(String),

    /// The metadata query failed for a reason other than a missing path.
    #[error("Failed to query metadata for {path}")]
    Metadata {
        path: String,
        #[source]
        source: StoreError,
    },

    /// The entry is a collection.
    #[error("cannot show the content of a collection: {0}")]
    InvalidOperation(String),

    /// The data object could not be opened.
    #[error("Failed to open data object {path}")]
    Open {
        path: String,
        #[source]
        source: StoreError,
    },

    /// The stream failed after it was opened.
    #[error("Failed to read data object {path}")]
    Read {
        path: String,
        #[source]
        source: StoreError,
    },

    /// The output sink refused bytes.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
