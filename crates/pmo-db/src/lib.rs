//! # pmo-db
//!
//! libSQL storage for the PMO document pipeline.
//!
//! Holds redacted documents, their embedded chunks, and the email-ingestion
//! bookkeeping tables (processed message IDs and the sender allow-list).
//! Storage is reached through the [`DocumentStore`] trait, implemented by
//! [`PmoDb`] (local file or remote Turso), [`MemoryStore`] (in-process), and
//! [`FallbackStore`] (remote primary with a local fallback).
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29), which speaks both the
//! local file format and the Turso remote protocol.

pub mod error;
pub mod fallback;
pub mod helpers;
pub mod memory;
mod migrations;
pub mod repos;
pub mod retry;
pub mod store;

pub use error::DatabaseError;
pub use fallback::FallbackStore;
pub use memory::MemoryStore;
pub use retry::RetryConfig;
pub use store::DocumentStore;

use libsql::Builder;

/// Central database handle.
///
/// Wraps a libSQL database and connection. Repository methods live in
/// [`repos`] as `impl PmoDb` blocks.
pub struct PmoDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    remote: bool,
}

impl PmoDb {
    /// Open a local database at the given path, or `":memory:"` for tests.
    ///
    /// Creates the parent directory if needed. Runs migrations automatically.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let parent = std::path::Path::new(path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty());
        if let Some(parent) = parent {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Other(anyhow::anyhow!(
                    "failed to create database directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let pmo_db = Self {
            db,
            conn,
            remote: false,
        };
        pmo_db.run_migrations().await?;
        tracing::debug!(path, "opened local database");
        Ok(pmo_db)
    }

    /// Open a remote libSQL database (Turso) over HTTP.
    ///
    /// Connection failures are reported as [`DatabaseError::Unavailable`] so
    /// a [`FallbackStore`] treats them as transient.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the remote cannot be reached or migrations fail.
    pub async fn open_remote(url: &str, auth_token: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await
            .map_err(|e| DatabaseError::Unavailable(format!("{url}: {e}")))?;
        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Unavailable(format!("{url}: {e}")))?;

        let pmo_db = Self {
            db,
            conn,
            remote: true,
        };
        pmo_db.run_migrations().await?;
        tracing::debug!(url, "opened remote database");
        Ok(pmo_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Whether this handle talks to a remote server.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        self.remote
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> PmoDb {
        PmoDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let tables = [
            "documents",
            "chunks",
            "processed_messages",
            "email_allowlist",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
        assert!(!db.is_remote());
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        // Migrations are idempotent
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn open_local_creates_parent_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("pmo.db");
        let db = PmoDb::open_local(path.to_str().unwrap()).await.unwrap();
        drop(db);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn chunk_index_unique_per_document() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO documents (id, project_id, file_name, format) VALUES ('doc-00000001', 'prj', 'a.md', 'markdown')",
                (),
            )
            .await
            .unwrap();
        db.conn()
            .execute(
                "INSERT INTO chunks (id, document_id, project_id, chunk_index, content) VALUES ('chk-00000001', 'doc-00000001', 'prj', 0, 'a')",
                (),
            )
            .await
            .unwrap();

        let result = db
            .conn()
            .execute(
                "INSERT INTO chunks (id, document_id, project_id, chunk_index, content) VALUES ('chk-00000002', 'doc-00000001', 'prj', 0, 'b')",
                (),
            )
            .await;
        assert!(result.is_err(), "duplicate chunk_index should be rejected");
    }
}
