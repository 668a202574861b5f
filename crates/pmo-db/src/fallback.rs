//! Primary + fallback composition of two [`DocumentStore`]s.
//!
//! Policy, applied to every operation:
//!
//! 1. No primary configured: the operation runs on the fallback only.
//! 2. Otherwise it runs on the primary. Errors classified transient
//!    ([`DatabaseError::is_transient`]) are retried up to
//!    [`RetryConfig::max_attempts`] attempts in total, sleeping `base_delay`
//!    before the first retry and doubling up to `max_delay`.
//! 3. If the primary still fails, with any error, a `warn!` is emitted and
//!    the same operation runs once on the fallback.
//! 4. Fallback errors propagate to the caller unchanged.
//!
//! The two backends are not reconciled: rows written to the fallback while
//! the primary was down stay there.

use pmo_core::entities::{Chunk, Document};

use crate::error::DatabaseError;
use crate::retry::{RetryConfig, with_retry};
use crate::store::DocumentStore;

/// A remote primary store backed by a local fallback.
///
/// Reads and writes only reach the fallback when the primary is absent or
/// gives up after retries, so rows written to the fallback during an outage
/// are not visible through this store once the primary recovers.
#[derive(Debug)]
pub struct FallbackStore<P, F> {
    primary: Option<P>,
    fallback: F,
    retry: RetryConfig,
}

impl<P, F> FallbackStore<P, F> {
    #[must_use]
    pub const fn new(primary: Option<P>, fallback: F, retry: RetryConfig) -> Self {
        Self {
            primary,
            fallback,
            retry,
        }
    }

    /// A store with no primary; every operation goes to `fallback`.
    #[must_use]
    pub const fn fallback_only(fallback: F, retry: RetryConfig) -> Self {
        Self::new(None, fallback, retry)
    }

    #[must_use]
    pub const fn primary(&self) -> Option<&P> {
        self.primary.as_ref()
    }

    #[must_use]
    pub const fn fallback(&self) -> &F {
        &self.fallback
    }

    #[must_use]
    pub const fn has_primary(&self) -> bool {
        self.primary.is_some()
    }
}

/// Run `$call` against the primary under the retry policy, then against the
/// fallback if the primary gave up. `$store` is bound to each backend in turn.
macro_rules! with_fallback {
    ($self:ident, $label:literal, |$store:ident| $call:expr) => {{
        if let Some($store) = $self.primary.as_ref() {
            match with_retry(&$self.retry, $label, move || $call).await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    tracing::warn!(op = $label, %error, "primary store failed, using fallback");
                }
            }
        }
        let $store = &$self.fallback;
        $call.await
    }};
}

impl<P: DocumentStore, F: DocumentStore> DocumentStore for FallbackStore<P, F> {
    async fn insert_document(&self, document: &Document) -> Result<(), DatabaseError> {
        with_fallback!(self, "insert_document", |store| store.insert_document(document))
    }

    async fn insert_chunks(&self, chunks: &[Chunk]) -> Result<(), DatabaseError> {
        with_fallback!(self, "insert_chunks", |store| store.insert_chunks(chunks))
    }

    async fn get_document(&self, id: &str) -> Result<Option<Document>, DatabaseError> {
        with_fallback!(self, "get_document", |store| store.get_document(id))
    }

    async fn list_documents(&self, project_id: &str) -> Result<Vec<Document>, DatabaseError> {
        with_fallback!(self, "list_documents", |store| store.list_documents(project_id))
    }

    async fn chunks_for_project(&self, project_id: &str) -> Result<Vec<Chunk>, DatabaseError> {
        with_fallback!(self, "chunks_for_project", |store| store
            .chunks_for_project(project_id))
    }

    async fn delete_document(&self, id: &str) -> Result<bool, DatabaseError> {
        with_fallback!(self, "delete_document", |store| store.delete_document(id))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use chrono::Utc;
    use pmo_core::enums::DocumentFormat;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::memory::MemoryStore;

    /// Wraps a `MemoryStore`, failing the first `fail_first` calls with `make_error`.
    struct FlakyStore {
        inner: MemoryStore,
        calls: AtomicU32,
        fail_first: u32,
        make_error: fn() -> DatabaseError,
    }

    impl FlakyStore {
        fn new(fail_first: u32, make_error: fn() -> DatabaseError) -> Self {
            Self {
                inner: MemoryStore::new(),
                calls: AtomicU32::new(0),
                fail_first,
                make_error,
            }
        }

        fn down() -> Self {
            Self::new(u32::MAX, || DatabaseError::Unavailable("connection refused".into()))
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }

        fn gate(&self) -> Result<(), DatabaseError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.fail_first {
                Err((self.make_error)())
            } else {
                Ok(())
            }
        }
    }

    impl DocumentStore for FlakyStore {
        async fn insert_document(&self, document: &Document) -> Result<(), DatabaseError> {
            self.gate()?;
            self.inner.insert_document(document).await
        }

        async fn insert_chunks(&self, chunks: &[Chunk]) -> Result<(), DatabaseError> {
            self.gate()?;
            self.inner.insert_chunks(chunks).await
        }

        async fn get_document(&self, id: &str) -> Result<Option<Document>, DatabaseError> {
            self.gate()?;
            self.inner.get_document(id).await
        }

        async fn list_documents(&self, project_id: &str) -> Result<Vec<Document>, DatabaseError> {
            self.gate()?;
            self.inner.list_documents(project_id).await
        }

        async fn chunks_for_project(&self, project_id: &str) -> Result<Vec<Chunk>, DatabaseError> {
            self.gate()?;
            self.inner.chunks_for_project(project_id).await
        }

        async fn delete_document(&self, id: &str) -> Result<bool, DatabaseError> {
            self.gate()?;
            self.inner.delete_document(id).await
        }
    }

    fn fast_retry() -> RetryConfig {
        RetryConfig {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    fn document(id: &str) -> Document {
        Document {
            id: id.to_string(),
            project_id: "prj".to_string(),
            file_name: "raid-log.csv".to_string(),
            format: DocumentFormat::Csv,
            char_len: 42,
            pii_summary: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn healthy_primary_serves_everything() {
        let store = FallbackStore::new(Some(MemoryStore::new()), MemoryStore::new(), fast_retry());
        store.insert_document(&document("doc-1")).await.unwrap();

        assert_eq!(store.primary().unwrap().document_count().await, 1);
        assert_eq!(store.fallback().document_count().await, 0);
    }

    #[tokio::test]
    async fn transient_failures_are_retried_on_primary() {
        let primary = FlakyStore::new(2, || DatabaseError::Unavailable("busy".into()));
        let store = FallbackStore::new(Some(primary), MemoryStore::new(), fast_retry());

        store.insert_document(&document("doc-1")).await.unwrap();

        assert_eq!(store.primary().unwrap().calls(), 3);
        assert!(store.primary().unwrap().inner.get_document("doc-1").await.unwrap().is_some());
        assert_eq!(store.fallback().document_count().await, 0);
    }

    #[tokio::test]
    async fn exhausted_primary_falls_back() {
        let store = FallbackStore::new(Some(FlakyStore::down()), MemoryStore::new(), fast_retry());

        store.insert_document(&document("doc-1")).await.unwrap();

        assert_eq!(store.primary().unwrap().calls(), 3);
        assert_eq!(store.fallback().document_count().await, 1);
        assert!(store.get_document("doc-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn permanent_primary_error_falls_back_without_retry() {
        let primary = FlakyStore::new(1, || DatabaseError::Query("no such table".into()));
        let store = FallbackStore::new(Some(primary), MemoryStore::new(), fast_retry());

        store.insert_document(&document("doc-1")).await.unwrap();

        assert_eq!(store.primary().unwrap().calls(), 1);
        assert_eq!(store.fallback().document_count().await, 1);
    }

    #[tokio::test]
    async fn fallback_errors_propagate() {
        let store = FallbackStore::new(Some(FlakyStore::down()), FlakyStore::down(), fast_retry());
        let err = store.list_documents("prj").await.unwrap_err();
        assert!(matches!(err, DatabaseError::Unavailable(_)));
        // Fallback is tried exactly once.
        assert_eq!(store.fallback().calls(), 1);
    }

    #[tokio::test]
    async fn no_primary_uses_fallback_only() {
        let store: FallbackStore<MemoryStore, MemoryStore> =
            FallbackStore::fallback_only(MemoryStore::new(), fast_retry());
        assert!(!store.has_primary());

        store.insert_document(&document("doc-1")).await.unwrap();
        assert_eq!(store.fallback().document_count().await, 1);
        assert!(store.delete_document("doc-1").await.unwrap());
    }
}
