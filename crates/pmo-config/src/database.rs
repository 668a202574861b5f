//! Database configuration: a remote libSQL primary and a local fallback file.

use serde::{Deserialize, Serialize};

fn default_local_path() -> String {
    ".pmo/pmo.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Local database file. Always used as the fallback store.
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Remote database URL (e.g., `libsql://pmo-prod-acme.turso.io`).
    #[serde(default)]
    pub url: String,

    /// Auth token for the remote database.
    #[serde(default)]
    pub auth_token: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            local_path: default_local_path(),
            url: String::new(),
            auth_token: String::new(),
        }
    }
}

impl DatabaseConfig {
    /// Check if the remote primary has the minimum required fields.
    pub fn is_remote_configured(&self) -> bool {
        !self.url.is_empty() && !self.auth_token.is_empty()
    }

    /// Whether the URL uses a scheme the libSQL client accepts.
    pub fn has_valid_scheme(&self) -> bool {
        ["libsql://", "https://", "http://"]
            .iter()
            .any(|scheme| self.url.starts_with(scheme))
    }
}
