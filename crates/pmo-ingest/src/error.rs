use pmo_core::errors::CoreError;
use pmo_db::DatabaseError;
use pmo_embeddings::EmbeddingError;

/// Errors from extracting, chunking, embedding, or storing a document.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("unsupported file type: {file_name}")]
    UnsupportedType { file_name: String },

    #[error("file is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },

    #[error("{file_name} is not valid UTF-8")]
    InvalidUtf8 {
        file_name: String,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("{file_name} could not be parsed: {reason}")]
    Malformed { file_name: String, reason: String },

    #[error("{file_name} contains no text")]
    EmptyDocument { file_name: String },

    #[error("project id must not be empty")]
    MissingProject,

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Core(#[from] CoreError),
}
