mod defaults;
mod env;
pub mod types;
mod validation;

use std::path::Path;

pub use types::*;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Missing environment variables: {0:?}")]
    MissingEnvVars(Vec<String>),

    #[error("Invalid zone name '{0}': must be non-empty and contain no '/'")]
    InvalidZone(String),

    #[error("session.{0} must be an absolute remote path, got '{1}'")]
    InvalidSessionPath(String, String),

    #[error("Zone '{0}' is not served by any mount")]
    UnmountedZone(String),

    #[error("Duplicate mount path: {0}")]
    DuplicateMountPath(String),

    #[error("Invalid mount path '{0}': {1}")]
    InvalidMountPath(String, String),

    #[error("Backend '{0}' referenced by mount '{1}' is not defined")]
    UndefinedBackend(String, String),

    #[error("Overlapping mount paths: '{0}' and '{1}'")]
    OverlappingMountPaths(String, String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ZonefsConfig {
    /// Parse a configuration from a YAML string.
    /// Environment variables in the format `${VAR_NAME}` will be interpolated.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let interpolated = env::interpolate_env(yaml)?;
        let config: ZonefsConfig = serde_yaml::from_str(&interpolated)?;
        Ok(config)
    }

    /// Load a configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Serialize back to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
