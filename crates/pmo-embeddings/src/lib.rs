//! # pmo-embeddings
//!
//! Local embedding generation for redacted document chunks using fastembed
//! (ONNX runtime), plus the cosine similarity used at retrieval time.
//!
//! Generates 384-dimensional vectors without requiring any external API keys.
//!
//! ## Model
//!
//! Uses [`AllMiniLML6V2`](fastembed::EmbeddingModel::AllMiniLML6V2) (sentence-transformers/all-MiniLM-L6-v2):
//! - 384-dimensional output vectors
//! - Mean pooling (no query/passage prefix needed)
//! - ~80MB model size, cached at `~/.pmo/cache/fastembed/`
//!
//! ## Async usage
//!
//! The fastembed ONNX runtime is synchronous. When calling from async code,
//! wrap calls in `tokio::task::spawn_blocking`:
//!
//! ```ignore
//! let embeddings = tokio::task::spawn_blocking(move || {
//!     engine.embed_batch(texts)
//! }).await??;
//! ```

pub mod error;
pub mod similarity;

pub use error::EmbeddingError;
pub use similarity::cosine_similarity;

use fastembed::{EmbeddingModel, TextEmbedding, TextInitOptions};

/// Anything that turns text into fixed-size vectors.
///
/// The ingestion pipeline and search are generic over this so they can run
/// against the local model in production and a deterministic stub in tests.
pub trait Embedder {
    /// Embed a batch of texts. Returns one vector per input, in order.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError`] if inference fails.
    fn embed_batch(&mut self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Dimensionality of every returned vector.
    fn dimension(&self) -> usize;

    /// Embed a single text.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::EmptyResult`] if the model returns nothing.
    fn embed_single(&mut self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut results = self.embed_batch(vec![text.to_string()])?;
        results.pop().ok_or(EmbeddingError::EmptyResult)
    }
}

/// Embed `texts` in batches of at most `batch_size`, checking that the model
/// returned exactly one vector per input.
///
/// # Errors
///
/// Returns [`EmbeddingError::CountMismatch`] if a batch comes back short or
/// long, or any error from the embedder.
pub fn embed_in_batches<E: Embedder + ?Sized>(
    embedder: &mut E,
    texts: &[String],
    batch_size: usize,
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let batch_size = batch_size.max(1);
    let mut vectors = Vec::with_capacity(texts.len());

    for batch in texts.chunks(batch_size) {
        let embedded = embedder.embed_batch(batch.to_vec())?;
        if embedded.len() != batch.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: batch.len(),
                actual: embedded.len(),
            });
        }
        vectors.extend(embedded);
    }

    tracing::debug!(inputs = texts.len(), batch_size, "embedded texts");
    Ok(vectors)
}

/// Local embedding engine backed by fastembed (ONNX runtime).
///
/// Wraps the `AllMiniLML6V2` model to produce 384-dimensional float vectors.
/// Model files are downloaded on first use and cached at `~/.pmo/cache/fastembed/`.
///
/// # Thread safety
///
/// [`TextEmbedding::embed`] requires `&mut self`. To use from multiple threads,
/// wrap in a `Mutex` or create one engine per thread.
pub struct EmbeddingEngine {
    model: TextEmbedding,
}

impl EmbeddingEngine {
    /// Create a new embedding engine with the `AllMiniLML6V2` model.
    ///
    /// Downloads the model on first run (~80MB) to `~/.pmo/cache/fastembed/`.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::InitFailed`] if model download or ONNX initialization fails.
    pub fn new() -> Result<Self, EmbeddingError> {
        let cache_dir = dirs::home_dir().map_or_else(
            || std::path::PathBuf::from(".fastembed_cache"),
            |h| h.join(".pmo").join("cache").join("fastembed"),
        );

        let model = TextEmbedding::try_new(
            TextInitOptions::new(EmbeddingModel::AllMiniLML6V2)
                .with_cache_dir(cache_dir)
                .with_show_download_progress(false),
        )
        .map_err(|e| EmbeddingError::InitFailed(e.to_string()))?;

        tracing::info!("embedding model loaded");
        Ok(Self { model })
    }

    /// Embedding vector dimensionality (always 384 for `AllMiniLML6V2`).
    #[must_use]
    pub const fn model_dimension() -> usize {
        384
    }
}

impl Embedder for EmbeddingEngine {
    fn embed_batch(&mut self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.model
            .embed(texts, None)
            .map_err(|e| EmbeddingError::EmbedFailed(e.to_string()))
    }

    fn dimension(&self) -> usize {
        Self::model_dimension()
    }
}
