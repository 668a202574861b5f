//! # pmo-search
//!
//! Semantic retrieval over redacted document chunks: embed the query, score
//! every chunk of a project by cosine similarity, return the best hits.

pub mod error;
pub mod vector;

pub use error::SearchError;
pub use vector::{SearchHit, VectorSearchFilters, rank_chunks, vector_search};
