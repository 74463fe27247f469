use std::fmt;

/// Per-invocation location context used to resolve user-supplied paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    cwd: String,
    home: String,
    zone: String,
}

impl SessionContext {
    pub fn new(
        zone: impl Into<String>,
        home: impl Into<String>,
        cwd: impl Into<String>,
    ) -> Self {
        SessionContext {
            cwd: cwd.into(),
            home: home.into(),
            zone: zone.into(),
        }
    }

    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    pub fn home(&self) -> &str {
        &self.home
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }
}

/// An absolute, normalized remote path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemotePath(String);

impl RemotePath {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RemotePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolve a user-supplied path against the session.
///
/// * `/<zone>/~/x` and `~/x` are taken relative to the home collection.
/// * `/x` is absolute.
/// * anything else is relative to the working collection.
///
/// The result is always normalized. Resolution never fails; nonsense input
/// yields a path the store will reject.
pub fn resolve(raw: &str, ctx: &SessionContext) -> RemotePath {
    let zone_home = format!("/{}/~", ctx.zone);

    let joined = if let Some(rest) = raw.strip_prefix(zone_home.as_str()) {
        format!("{}/{}", ctx.home, rest)
    } else if raw.starts_with('/') {
        raw.to_string()
    } else if let Some(rest) = raw.strip_prefix('~') {
        format!("{}/{}", ctx.home, rest)
    } else {
        format!("{}/{}", ctx.cwd, raw)
    };

    RemotePath(normalize(&joined))
}

/// Collapse `.`, `..`, duplicate and trailing separators. `..` stops at the root.
fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }

    let mut normalized = String::with_capacity(path.len());
    for part in &parts {
        normalized.push('/');
        normalized.push_str(part);
    }
    if normalized.is_empty() {
        normalized.push('/');
    }
    normalized
}
