//! Vector similarity search over stored chunk embeddings.
//!
//! Brute-force scan: every chunk of the project is loaded from the
//! [`DocumentStore`] and scored with cosine similarity against the query
//! embedding. Project corpora are small enough that no index is needed.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use pmo_config::SearchConfig;
use pmo_core::entities::Chunk;
use pmo_db::DocumentStore;
use pmo_embeddings::{Embedder, cosine_similarity};

use crate::error::SearchError;

/// A scored chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub chunk_id: String,
    pub document_id: String,
    pub chunk_index: u32,
    /// Nearest heading of the chunk, if any.
    pub title: Option<String>,
    pub section_path: Vec<String>,
    /// Redacted chunk text.
    pub content: String,
    /// Cosine similarity score.
    pub score: f64,
}

/// Filters for vector search queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorSearchFilters {
    /// Maximum number of results to return.
    pub limit: u32,
    /// Minimum cosine similarity score (results below are excluded).
    pub min_score: f64,
}

impl Default for VectorSearchFilters {
    fn default() -> Self {
        Self {
            limit: 10,
            min_score: 0.0,
        }
    }
}

impl From<&SearchConfig> for VectorSearchFilters {
    fn from(config: &SearchConfig) -> Self {
        Self {
            limit: config.default_limit,
            min_score: config.min_score,
        }
    }
}

/// Score `chunks` against `query_embedding`.
///
/// Hits below `min_score` are dropped, the rest sorted by descending score
/// (ties broken by chunk index, then document ID) and truncated to `limit`.
#[must_use]
pub fn rank_chunks(
    query_embedding: &[f32],
    chunks: Vec<Chunk>,
    filters: &VectorSearchFilters,
) -> Vec<SearchHit> {
    let mut hits: Vec<SearchHit> = chunks
        .into_iter()
        .filter_map(|chunk| {
            let score = f64::from(cosine_similarity(query_embedding, &chunk.embedding));
            (score >= filters.min_score).then(|| SearchHit {
                chunk_id: chunk.id,
                document_id: chunk.document_id,
                chunk_index: chunk.chunk_index,
                title: chunk.title,
                section_path: chunk.section_path,
                content: chunk.content,
                score,
            })
        })
        .collect();

    hits.sort_by(compare_hits);
    hits.truncate(usize::try_from(filters.limit).unwrap_or(usize::MAX));
    hits
}

fn compare_hits(a: &SearchHit, b: &SearchHit) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.chunk_index.cmp(&b.chunk_index))
        .then_with(|| a.document_id.cmp(&b.document_id))
}

/// Embed `query` and rank every chunk of `project_id` against it.
///
/// # Errors
///
/// - [`SearchError::InvalidQuery`] for an empty query or project
/// - [`SearchError::Embedding`] if the query cannot be embedded
/// - [`SearchError::Database`] if chunks cannot be loaded
pub async fn vector_search<S, E>(
    store: &S,
    embedder: &mut E,
    project_id: &str,
    query: &str,
    filters: &VectorSearchFilters,
) -> Result<Vec<SearchHit>, SearchError>
where
    S: DocumentStore,
    E: Embedder + ?Sized,
{
    let query = query.trim();
    if query.is_empty() {
        return Err(SearchError::InvalidQuery("query must not be empty".to_string()));
    }
    if project_id.trim().is_empty() {
        return Err(SearchError::InvalidQuery("project must not be empty".to_string()));
    }

    let query_embedding = embedder.embed_single(query)?;
    let chunks = store.chunks_for_project(project_id.trim()).await?;
    let scanned = chunks.len();

    let hits = rank_chunks(&query_embedding, chunks, filters);
    tracing::debug!(project_id, scanned, hits = hits.len(), "vector search");
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn chunk(document_id: &str, index: u32, embedding: Vec<f32>) -> Chunk {
        Chunk {
            id: format!("chk-{document_id}-{index}"),
            document_id: document_id.to_string(),
            project_id: "prj".to_string(),
            chunk_index: index,
            title: None,
            section_path: Vec::new(),
            content: format!("chunk {index}"),
            byte_offset: 0,
            char_len: 7,
            embedding,
        }
    }

    #[test]
    fn sorted_by_descending_score() {
        let chunks = vec![
            chunk("doc-a", 0, vec![0.0, 1.0]),
            chunk("doc-a", 1, vec![1.0, 0.0]),
            chunk("doc-a", 2, vec![1.0, 1.0]),
        ];
        let hits = rank_chunks(&[1.0, 0.0], chunks, &VectorSearchFilters::default());
        let order: Vec<u32> = hits.iter().map(|h| h.chunk_index).collect();
        assert_eq!(order, vec![1, 2, 0]);
        assert!((hits[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn min_score_filters() {
        let chunks = vec![
            chunk("doc-a", 0, vec![1.0, 0.0]),
            chunk("doc-a", 1, vec![-1.0, 0.0]),
            chunk("doc-a", 2, vec![0.0, 1.0]),
        ];
        let filters = VectorSearchFilters {
            limit: 10,
            min_score: 0.5,
        };
        let hits = rank_chunks(&[1.0, 0.0], chunks, &filters);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].chunk_index, 0);
    }

    #[test]
    fn ties_break_by_chunk_index_then_document() {
        let chunks = vec![
            chunk("doc-b", 3, vec![1.0, 0.0]),
            chunk("doc-b", 1, vec![1.0, 0.0]),
            chunk("doc-a", 1, vec![2.0, 0.0]),
        ];
        let hits = rank_chunks(&[1.0, 0.0], chunks, &VectorSearchFilters::default());
        let order: Vec<(&str, u32)> = hits
            .iter()
            .map(|h| (h.document_id.as_str(), h.chunk_index))
            .collect();
        assert_eq!(order, vec![("doc-a", 1), ("doc-b", 1), ("doc-b", 3)]);
    }

    #[test]
    fn truncated_to_limit() {
        let chunks = (0..5).map(|i| chunk("doc-a", i, vec![1.0, 0.0])).collect();
        let filters = VectorSearchFilters {
            limit: 2,
            min_score: -1.0,
        };
        assert_eq!(rank_chunks(&[1.0, 0.0], chunks, &filters).len(), 2);
    }

    #[test]
    fn mismatched_dimensions_score_zero() {
        let chunks = vec![chunk("doc-a", 0, vec![1.0, 0.0, 0.0])];
        let hits = rank_chunks(&[1.0, 0.0], chunks, &VectorSearchFilters::default());
        assert_eq!(hits.len(), 1);
        assert!(hits[0].score.abs() < f64::EPSILON);

        let strict = VectorSearchFilters {
            limit: 10,
            min_score: 0.1,
        };
        let chunks = vec![chunk("doc-a", 0, vec![1.0, 0.0, 0.0])];
        assert!(rank_chunks(&[1.0, 0.0], chunks, &strict).is_empty());
    }

    #[test]
    fn filters_from_config() {
        let filters = VectorSearchFilters::from(&SearchConfig::default());
        assert_eq!(filters, VectorSearchFilters::default());
    }
}
