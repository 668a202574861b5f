//! # pmo-config
//!
//! Layered configuration loading for the PMO document pipeline using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`PMO_*` prefix, `__` as separator)
//! 2. Project-level `.pmo/config.toml`
//! 3. User-level `~/.config/pmo/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `PMO_REDACTION__MODE` -> `redaction.mode`,
//! `PMO_DATABASE__URL` -> `database.url`, etc. The `__` (double underscore)
//! separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use pmo_config::PmoConfig;
//!
//! let config = PmoConfig::load_with_dotenv().expect("config");
//! let policy = config.redaction.policy().expect("policy");
//!
//! if config.database.is_remote_configured() {
//!     println!("Primary: {}", config.database.url);
//! }
//! ```

mod database;
mod error;
mod ingest;
mod redaction;
mod retry;
mod search;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use ingest::IngestConfig;
pub use redaction::RedactionConfig;
pub use retry::RetrySettings;
pub use search::SearchConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PmoConfig {
    #[serde(default)]
    pub redaction: RedactionConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub search: SearchConfig,
}

impl PmoConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed, or
    /// [`ConfigError::InvalidValue`] if validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Extract and validate a config from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".pmo/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("PMO_").split("__"));

        figment
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, reason: String| ConfigError::InvalidValue {
            field: field.to_string(),
            reason,
        };

        if self.ingest.max_chunk_chars == 0 {
            return Err(invalid("ingest.max_chunk_chars", "must be positive".into()));
        }
        if self.ingest.overlap_chars >= self.ingest.max_chunk_chars {
            return Err(invalid(
                "ingest.overlap_chars",
                format!(
                    "must be smaller than ingest.max_chunk_chars ({})",
                    self.ingest.max_chunk_chars
                ),
            ));
        }
        if self.ingest.embed_batch_size == 0 {
            return Err(invalid("ingest.embed_batch_size", "must be positive".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(invalid("retry.max_attempts", "must be at least 1".into()));
        }
        if !self.database.url.is_empty() && !self.database.has_valid_scheme() {
            return Err(invalid(
                "database.url",
                format!("unsupported scheme in '{}'", self.database.url),
            ));
        }
        if !(-1.0..=1.0).contains(&self.search.min_score) {
            return Err(invalid(
                "search.min_score",
                "must be a cosine similarity in [-1, 1]".into(),
            ));
        }
        self.redaction.policy().map(|_| ())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pmo").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir looking
    /// for a `.env` file. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
