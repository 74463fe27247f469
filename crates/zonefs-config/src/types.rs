use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chunk size used for streaming reads when the config does not set one.
pub const DEFAULT_BUFFER_SIZE: u64 = 10 * 1024;

/// Human-readable duration (e.g., "200ms", "5m", "1h").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanDuration(pub std::time::Duration);

impl Default for HumanDuration {
    fn default() -> Self {
        HumanDuration(std::time::Duration::from_secs(0))
    }
}

impl HumanDuration {
    pub fn as_duration(&self) -> std::time::Duration {
        self.0
    }
}

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();

        let (num_str, unit) = if let Some(num) = s.strip_suffix("ms") {
            (num, "ms")
        } else if let Some(num) = s.strip_suffix('s') {
            (num, "s")
        } else if let Some(num) = s.strip_suffix('m') {
            (num, "m")
        } else if let Some(num) = s.strip_suffix('h') {
            (num, "h")
        } else {
            return Err(format!("Invalid duration format: {}", s));
        };

        let num: u64 = num_str
            .parse()
            .map_err(|_| format!("Invalid number in duration: {}", s))?;

        let secs = match unit {
            "ms" => return Ok(HumanDuration(std::time::Duration::from_millis(num))),
            "s" => Some(num),
            "m" => num.checked_mul(60),
            _ => num.checked_mul(3600),
        };

        secs.map(|secs| HumanDuration(std::time::Duration::from_secs(secs)))
            .ok_or_else(|| format!("Duration out of range: {}", s))
    }
}

impl fmt::Display for HumanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0.as_secs();
        let millis = self.0.as_millis();

        if millis < 1000 || millis % 1000 != 0 {
            write!(f, "{}ms", millis)
        } else if secs < 60 || secs % 60 != 0 {
            write!(f, "{}s", secs)
        } else if secs < 3600 || secs % 3600 != 0 {
            write!(f, "{}m", secs / 60)
        } else {
            write!(f, "{}h", secs / 3600)
        }
    }
}

impl Serialize for HumanDuration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for HumanDuration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        HumanDuration::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Human-readable bytes (e.g., "10kb", "1mb").
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HumanBytes(pub u64);

impl HumanBytes {
    pub fn as_bytes(&self) -> u64 {
        self.0
    }
}

impl FromStr for HumanBytes {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();

        let (num_str, multiplier) = if let Some(num) = s.strip_suffix("gb") {
            (num, 1024u64 * 1024 * 1024)
        } else if let Some(num) = s.strip_suffix("mb") {
            (num, 1024u64 * 1024)
        } else if let Some(num) = s.strip_suffix("kb") {
            (num, 1024u64)
        } else if let Some(num) = s.strip_suffix('b') {
            (num, 1u64)
        } else {
            // Assume bytes if no unit
            (s.as_str(), 1u64)
        };

        let num: u64 = num_str
            .trim()
            .parse()
            .map_err(|_| format!("Invalid number in bytes: {}", s))?;

        num.checked_mul(multiplier)
            .map(HumanBytes)
            .ok_or_else(|| format!("Byte size out of range: {}", s))
    }
}

impl fmt::Display for HumanBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0;
        const KB: u64 = 1024;
        const MB: u64 = 1024 * 1024;
        const GB: u64 = 1024 * 1024 * 1024;

        if bytes >= GB && bytes % GB == 0 {
            write!(f, "{}gb", bytes / GB)
        } else if bytes >= MB && bytes % MB == 0 {
            write!(f, "{}mb", bytes / MB)
        } else if bytes >= KB && bytes % KB == 0 {
            write!(f, "{}kb", bytes / KB)
        } else {
            write!(f, "{}b", bytes)
        }
    }
}

impl Serialize for HumanBytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for HumanBytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        HumanBytes::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Local directory backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FsBackendConfig {
    pub root: String,
}

/// In-memory backend configuration, optionally seeded with content.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MemoryBackendConfig {
    /// Data objects keyed by path relative to the mount.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub objects: IndexMap<String, String>,
    /// Empty collections relative to the mount.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collections: Vec<String>,
}

/// Tagged enum for backend configurations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendConfig {
    Fs(FsBackendConfig),
    Memory(MemoryBackendConfig),
}

/// Binding of a remote path prefix (normally a zone root) to a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MountConfig {
    pub path: String,
    #[serde(default)]
    pub backend: Option<String>,
}

/// Per-invocation session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub zone: String,
    pub user: String,
    #[serde(default)]
    pub home: Option<String>,
    #[serde(default)]
    pub cwd: Option<String>,
    /// Deadline applied to each store operation.
    #[serde(default)]
    pub timeout: Option<HumanDuration>,
    #[serde(default)]
    pub buffer_size: Option<HumanBytes>,
}

impl SessionConfig {
    /// Root collection of the session zone, e.g. `/tempZone`.
    pub fn zone_root(&self) -> String {
        format!("/{}", self.zone)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZonefsConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub session: SessionConfig,
    #[serde(default)]
    pub backends: IndexMap<String, BackendConfig>,
    #[serde(default)]
    pub mounts: Vec<MountConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_duration_parsing() {
        assert_eq!(
            HumanDuration::from_str("200ms").unwrap().as_duration(),
            std::time::Duration::from_millis(200)
        );
        assert_eq!(
            HumanDuration::from_str("5s").unwrap().as_duration(),
            std::time::Duration::from_secs(5)
        );
        assert_eq!(
            HumanDuration::from_str("5m").unwrap().as_duration(),
            std::time::Duration::from_secs(300)
        );
        assert_eq!(
            HumanDuration::from_str("1h").unwrap().as_duration(),
            std::time::Duration::from_secs(3600)
        );
        assert!(HumanDuration::from_str("forever").is_err());
    }

    #[test]
    fn test_human_duration_out_of_range() {
        let err = HumanDuration::from_str("9000000000000000h").unwrap_err();
        assert!(err.contains("out of range"));
        assert!(HumanDuration::from_str("307445734561825861m").is_err());
        assert!(HumanDuration::from_str("18446744073709551615s").is_ok());
    }

    #[test]
    fn test_human_duration_display() {
        assert_eq!(HumanDuration(std::time::Duration::from_millis(1500)).to_string(), "1500ms");
        assert_eq!(HumanDuration(std::time::Duration::from_secs(30)).to_string(), "30s");
        assert_eq!(HumanDuration(std::time::Duration::from_secs(120)).to_string(), "2m");
    }

    #[test]
    fn test_human_bytes_parsing() {
        assert_eq!(HumanBytes::from_str("512b").unwrap().as_bytes(), 512);
        assert_eq!(HumanBytes::from_str("10kb").unwrap().as_bytes(), 10240);
        assert_eq!(HumanBytes::from_str("4096").unwrap().as_bytes(), 4096);
        assert_eq!(
            HumanBytes::from_str("1mb").unwrap().as_bytes(),
            1024 * 1024
        );
        assert!(HumanBytes::from_str("lots").is_err());
    }

    #[test]
    fn test_human_bytes_display() {
        assert_eq!(HumanBytes(10240).to_string(), "10kb");
        assert_eq!(HumanBytes(1000).to_string(), "1000b");
        assert_eq!(HumanBytes(2 * 1024 * 1024).to_string(), "2mb");
    }

    #[test]
    fn test_zone_root() {
        let session = SessionConfig {
            zone: "tempZone".to_string(),
            user: "alice".to_string(),
            home: None,
            cwd: None,
            timeout: None,
            buffer_size: None,
        };
        assert_eq!(session.zone_root(), "/tempZone");
    }
}
