//! Search error types for pmo-search.

/// Errors from vector search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Error from the document store.
    #[error("database error: {0}")]
    Database(#[from] pmo_db::DatabaseError),

    /// Error from the embedding engine (fastembed/ONNX).
    #[error("embedding error: {0}")]
    Embedding(#[from] pmo_embeddings::EmbeddingError),

    /// Invalid or empty search query.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}
