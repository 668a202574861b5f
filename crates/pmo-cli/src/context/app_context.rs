use anyhow::Context;
use pmo_config::PmoConfig;
use pmo_db::{FallbackStore, PmoDb, RetryConfig};

/// Document store used by the CLI: optional remote primary, local fallback.
pub type CliStore = FallbackStore<PmoDb, PmoDb>;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: PmoConfig,
    pub store: CliStore,
}

impl AppContext {
    /// Open the local database and, when configured, the remote primary.
    ///
    /// A remote primary that cannot be opened is logged and skipped; the
    /// local database is required.
    pub async fn init(config: PmoConfig) -> anyhow::Result<Self> {
        let local = PmoDb::open_local(&config.database.local_path)
            .await
            .with_context(|| {
                format!(
                    "failed to open local database at {}",
                    config.database.local_path
                )
            })?;

        let primary = if config.database.is_remote_configured() {
            match PmoDb::open_remote(&config.database.url, &config.database.auth_token).await {
                Ok(db) => Some(db),
                Err(error) => {
                    tracing::warn!(
                        %error,
                        "failed to open remote database; falling back to local"
                    );
                    None
                }
            }
        } else {
            None
        };

        let retry = RetryConfig::from(&config.retry);
        let store = FallbackStore::new(primary, local, retry);

        Ok(Self { config, store })
    }

    /// Database holding email bookkeeping: the remote primary when open,
    /// otherwise the local file.
    pub fn bookkeeping(&self) -> &PmoDb {
        self.store.primary().unwrap_or_else(|| self.store.fallback())
    }
}
