use crate::types::{HumanBytes, ZonefsConfig, DEFAULT_BUFFER_SIZE};

impl ZonefsConfig {
    /// Apply default inference rules to the configuration.
    /// This mutates the config in place.
    pub fn apply_defaults(&mut self) {
        // Infer implicit backend if only one exists
        let single_backend = if self.backends.len() == 1 {
            self.backends.keys().next().cloned()
        } else {
            None
        };

        for mount in &mut self.mounts {
            if mount.backend.is_none() {
                if let Some(ref backend_name) = single_backend {
                    mount.backend = Some(backend_name.clone());
                }
            }
        }

        let session = &mut self.session;
        if session.home.is_none() {
            session.home = Some(default_home(&session.zone, &session.user));
        }
        if session.cwd.is_none() {
            session.cwd = session.home.clone();
        }
        if session.buffer_size.is_none() {
            session.buffer_size = Some(HumanBytes(DEFAULT_BUFFER_SIZE));
        }
    }

    /// Returns a new config with all defaults applied.
    pub fn effective(&self) -> ZonefsConfig {
        let mut config = self.clone();
        config.apply_defaults();
        config
    }
}

/// `tempZone` + `alice` -> `/tempZone/home/alice`
fn default_home(zone: &str, user: &str) -> String {
    format!("/{}/home/{}", zone, user)
}
