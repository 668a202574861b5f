//! Document ingestion configuration.

use serde::{Deserialize, Serialize};

/// Maximum chunk size in characters (~512 tokens).
const fn default_max_chunk_chars() -> usize {
    2048
}

/// Overlap carried between sub-chunks of an oversized section.
const fn default_overlap_chars() -> usize {
    200
}

/// Largest accepted upload: 20 MiB.
const fn default_max_file_bytes() -> u64 {
    20 * 1024 * 1024
}

const fn default_embed_batch_size() -> usize {
    32
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestConfig {
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,

    #[serde(default = "default_overlap_chars")]
    pub overlap_chars: usize,

    /// Files larger than this are rejected before extraction.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    /// Number of chunks sent to the embedding model per call.
    #[serde(default = "default_embed_batch_size")]
    pub embed_batch_size: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: default_max_chunk_chars(),
            overlap_chars: default_overlap_chars(),
            max_file_bytes: default_max_file_bytes(),
            embed_batch_size: default_embed_batch_size(),
        }
    }
}
