use std::collections::HashSet;

use crate::types::ZonefsConfig;
use crate::ConfigError;

impl ZonefsConfig {
    /// Validate the configuration and return a list of errors.
    ///
    /// Session paths are checked as given; call this on [`ZonefsConfig::effective`]
    /// to also cover the inferred home and working directory.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let session = &self.session;

        if session.zone.is_empty() || session.zone.contains('/') {
            errors.push(ConfigError::InvalidZone(session.zone.clone()));
        }

        if session.user.is_empty() {
            errors.push(ConfigError::InvalidConfig(
                "session.user must not be empty".to_string(),
            ));
        }

        for (field, value) in [("home", &session.home), ("cwd", &session.cwd)] {
            if let Some(path) = value {
                if !path.starts_with('/') {
                    errors.push(ConfigError::InvalidSessionPath(
                        field.to_string(),
                        path.clone(),
                    ));
                }
            }
        }

        if let Some(ref size) = session.buffer_size {
            if size.as_bytes() == 0 {
                errors.push(ConfigError::InvalidConfig(
                    "session.buffer_size must be greater than zero".to_string(),
                ));
            }
        }

        // Check for duplicate mount paths
        let mut seen_paths = HashSet::new();
        for mount in &self.mounts {
            if !seen_paths.insert(normalize_path(&mount.path)) {
                errors.push(ConfigError::DuplicateMountPath(mount.path.clone()));
            }
        }

        for mount in &self.mounts {
            if !mount.path.starts_with('/') {
                errors.push(ConfigError::InvalidMountPath(
                    mount.path.clone(),
                    "Mount path must start with '/'".to_string(),
                ));
            }
        }

        for mount in &self.mounts {
            match mount.backend {
                Some(ref backend_name) if !self.backends.contains_key(backend_name) => {
                    errors.push(ConfigError::UndefinedBackend(
                        backend_name.clone(),
                        mount.path.clone(),
                    ));
                }
                None => {
                    errors.push(ConfigError::InvalidMountPath(
                        mount.path.clone(),
                        "No backend given and none could be inferred".to_string(),
                    ));
                }
                _ => {}
            }
        }

        // Check that no mount path is a prefix of another
        let paths: Vec<_> = self.mounts.iter().map(|m| &m.path).collect();
        for (i, path_a) in paths.iter().enumerate() {
            for (j, path_b) in paths.iter().enumerate() {
                if i != j {
                    let a_normalized = normalize_path(path_a);
                    let b_normalized = normalize_path(path_b);
                    if b_normalized.starts_with(&format!("{}/", a_normalized)) {
                        errors.push(ConfigError::OverlappingMountPaths(
                            (*path_a).clone(),
                            (*path_b).clone(),
                        ));
                    }
                }
            }
        }

        let zone_root = session.zone_root();
        let zone_served = self.mounts.iter().any(|m| {
            let mount = normalize_path(&m.path);
            mount.is_empty() || zone_root == mount || zone_root.starts_with(&format!("{}/", mount))
        });
        if !zone_served {
            errors.push(ConfigError::UnmountedZone(session.zone.clone()));
        }

        errors
    }

    /// Validate and return Ok(()) if valid, or Err with the first error.
    pub fn validate_or_err(&self) -> Result<(), ConfigError> {
        match self.validate().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Drop the trailing slash; the root mount `/` becomes the empty string.
fn normalize_path(path: &str) -> String {
    path.trim_end_matches('/').to_string()
}
