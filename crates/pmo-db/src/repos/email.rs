//! Email-ingestion bookkeeping.
//!
//! Two persisted sets: message IDs that have already been ingested (so a
//! redelivered webhook is not processed twice) and the sender addresses whose
//! mail is accepted. Both survive restarts and are shared by every process
//! pointing at the same database.

use chrono::{DateTime, Utc};

use pmo_core::entities::{AllowedSender, normalize_address};

use crate::PmoDb;
use crate::error::DatabaseError;
use crate::helpers::{format_datetime, parse_datetime};

fn require_non_empty<'a>(value: &'a str, what: &str) -> Result<&'a str, DatabaseError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DatabaseError::InvalidInput(format!("{what} must not be empty")));
    }
    Ok(trimmed)
}

impl PmoDb {
    /// Record a message as processed now.
    ///
    /// Returns `true` if the ID was newly recorded, `false` if it was already
    /// present.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidInput` for an empty ID, or a query error.
    pub async fn mark_message_processed(&self, message_id: &str) -> Result<bool, DatabaseError> {
        self.mark_message_processed_at(message_id, Utc::now()).await
    }

    /// Record a message as processed at an explicit time.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidInput` for an empty ID, or a query error.
    pub async fn mark_message_processed_at(
        &self,
        message_id: &str,
        processed_at: DateTime<Utc>,
    ) -> Result<bool, DatabaseError> {
        let message_id = require_non_empty(message_id, "message id")?;
        let inserted = self
            .conn()
            .execute(
                "INSERT OR IGNORE INTO processed_messages (message_id, processed_at) VALUES (?1, ?2)",
                libsql::params![message_id, format_datetime(&processed_at)],
            )
            .await?;
        Ok(inserted > 0)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn is_message_processed(&self, message_id: &str) -> Result<bool, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT 1 FROM processed_messages WHERE message_id = ?1",
                [message_id.trim()],
            )
            .await?;
        Ok(rows.next().await?.is_some())
    }

    /// Forget processed messages recorded before `older_than`.
    ///
    /// Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the delete fails.
    pub async fn prune_processed_messages(
        &self,
        older_than: DateTime<Utc>,
    ) -> Result<u64, DatabaseError> {
        let removed = self
            .conn()
            .execute(
                "DELETE FROM processed_messages WHERE processed_at < ?1",
                [format_datetime(&older_than)],
            )
            .await?;
        tracing::info!(removed, "pruned processed messages");
        Ok(removed)
    }

    /// Add a sender to the allow-list. Adding an existing sender is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidInput` for an empty or malformed address.
    pub async fn allow_sender(&self, address: &str) -> Result<AllowedSender, DatabaseError> {
        let address = normalize_address(require_non_empty(address, "sender address")?);
        if !address.contains('@') {
            return Err(DatabaseError::InvalidInput(format!(
                "not an email address: {address}"
            )));
        }

        self.conn()
            .execute(
                "INSERT OR IGNORE INTO email_allowlist (address, added_at) VALUES (?1, ?2)",
                libsql::params![address.as_str(), format_datetime(&Utc::now())],
            )
            .await?;

        let mut rows = self
            .conn()
            .query(
                "SELECT address, added_at FROM email_allowlist WHERE address = ?1",
                [address.as_str()],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(AllowedSender {
            address: row.get::<String>(0)?,
            added_at: parse_datetime(&row.get::<String>(1)?)?,
        })
    }

    /// Remove a sender. Returns whether it was on the list.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the delete fails.
    pub async fn disallow_sender(&self, address: &str) -> Result<bool, DatabaseError> {
        let removed = self
            .conn()
            .execute(
                "DELETE FROM email_allowlist WHERE address = ?1",
                [normalize_address(address)],
            )
            .await?;
        Ok(removed > 0)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn is_sender_allowed(&self, address: &str) -> Result<bool, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT 1 FROM email_allowlist WHERE address = ?1",
                [normalize_address(address)],
            )
            .await?;
        Ok(rows.next().await?.is_some())
    }

    /// All allowed senders, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_allowed_senders(&self) -> Result<Vec<AllowedSender>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT address, added_at FROM email_allowlist ORDER BY address",
                (),
            )
            .await?;
        let mut senders = Vec::new();
        while let Some(row) = rows.next().await? {
            senders.push(AllowedSender {
                address: row.get::<String>(0)?,
                added_at: parse_datetime(&row.get::<String>(1)?)?,
            });
        }
        Ok(senders)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    use super::*;

    async fn test_db() -> PmoDb {
        PmoDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn mark_processed_is_idempotent() {
        let db = test_db().await;
        assert!(!db.is_message_processed("<m1@mail>").await.unwrap());
        assert!(db.mark_message_processed("<m1@mail>").await.unwrap());
        assert!(!db.mark_message_processed("<m1@mail>").await.unwrap());
        assert!(db.is_message_processed("<m1@mail>").await.unwrap());
    }

    #[tokio::test]
    async fn empty_message_id_rejected() {
        let db = test_db().await;
        let err = db.mark_message_processed("   ").await.unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn prune_removes_only_older_entries() {
        let db = test_db().await;
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
        db.mark_message_processed_at("old", now - Duration::days(40))
            .await
            .unwrap();
        db.mark_message_processed_at("recent", now - Duration::days(2))
            .await
            .unwrap();

        let removed = db
            .prune_processed_messages(now - Duration::days(30))
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(!db.is_message_processed("old").await.unwrap());
        assert!(db.is_message_processed("recent").await.unwrap());
    }

    #[tokio::test]
    async fn allowlist_normalizes_addresses() {
        let db = test_db().await;
        let sender = db.allow_sender("  PM.Lead@Client.COM ").await.unwrap();
        assert_eq!(sender.address, "pm.lead@client.com");

        assert!(db.is_sender_allowed("pm.lead@client.com").await.unwrap());
        assert!(db.is_sender_allowed("PM.LEAD@CLIENT.COM").await.unwrap());
        assert!(!db.is_sender_allowed("other@client.com").await.unwrap());
    }

    #[tokio::test]
    async fn allow_twice_keeps_first_timestamp() {
        let db = test_db().await;
        let first = db.allow_sender("a@x.com").await.unwrap();
        let second = db.allow_sender("A@X.com").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(db.list_allowed_senders().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn disallow_and_list() {
        let db = test_db().await;
        db.allow_sender("zed@x.com").await.unwrap();
        db.allow_sender("amy@x.com").await.unwrap();

        let listed: Vec<String> = db
            .list_allowed_senders()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.address)
            .collect();
        assert_eq!(listed, vec!["amy@x.com", "zed@x.com"]);

        assert!(db.disallow_sender("ZED@x.com").await.unwrap());
        assert!(!db.disallow_sender("zed@x.com").await.unwrap());
        assert!(!db.is_sender_allowed("zed@x.com").await.unwrap());
    }

    #[tokio::test]
    async fn malformed_sender_rejected() {
        let db = test_db().await;
        assert!(matches!(
            db.allow_sender("not-an-address").await,
            Err(DatabaseError::InvalidInput(_))
        ));
        assert!(matches!(
            db.allow_sender("").await,
            Err(DatabaseError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn bookkeeping_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("pmo.db");
        let path = path.to_str().unwrap();

        {
            let db = PmoDb::open_local(path).await.unwrap();
            db.mark_message_processed("m-1").await.unwrap();
            db.allow_sender("pm@client.com").await.unwrap();
        }

        let db = PmoDb::open_local(path).await.unwrap();
        assert!(db.is_message_processed("m-1").await.unwrap());
        assert!(db.is_sender_allowed("pm@client.com").await.unwrap());
    }
}
