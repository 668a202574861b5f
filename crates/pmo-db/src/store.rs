//! The storage seam used by ingestion and search.

use pmo_core::entities::{Chunk, Document};

use crate::error::DatabaseError;

/// Persistence for redacted documents and their chunks.
///
/// Every method returns an explicit `Result`; implementations never swallow
/// backend errors. Only redacted content is ever handed to a store.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Insert a document row. Fails if the ID already exists.
    async fn insert_document(&self, document: &Document) -> Result<(), DatabaseError>;

    /// Insert all chunks of one document atomically.
    async fn insert_chunks(&self, chunks: &[Chunk]) -> Result<(), DatabaseError>;

    /// Fetch a document by ID. `Ok(None)` when it does not exist.
    async fn get_document(&self, id: &str) -> Result<Option<Document>, DatabaseError>;

    /// All documents of a project, oldest first.
    async fn list_documents(&self, project_id: &str) -> Result<Vec<Document>, DatabaseError>;

    /// All chunks of a project, ordered by document then chunk index.
    async fn chunks_for_project(&self, project_id: &str) -> Result<Vec<Chunk>, DatabaseError>;

    /// Delete a document and its chunks. Returns whether it existed.
    async fn delete_document(&self, id: &str) -> Result<bool, DatabaseError>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for &T {
    async fn insert_document(&self, document: &Document) -> Result<(), DatabaseError> {
        (**self).insert_document(document).await
    }

    async fn insert_chunks(&self, chunks: &[Chunk]) -> Result<(), DatabaseError> {
        (**self).insert_chunks(chunks).await
    }

    async fn get_document(&self, id: &str) -> Result<Option<Document>, DatabaseError> {
        (**self).get_document(id).await
    }

    async fn list_documents(&self, project_id: &str) -> Result<Vec<Document>, DatabaseError> {
        (**self).list_documents(project_id).await
    }

    async fn chunks_for_project(&self, project_id: &str) -> Result<Vec<Chunk>, DatabaseError> {
        (**self).chunks_for_project(project_id).await
    }

    async fn delete_document(&self, id: &str) -> Result<bool, DatabaseError> {
        (**self).delete_document(id).await
    }
}
