//! Retrieval configuration.

use serde::{Deserialize, Serialize};

/// Default result limit.
const fn default_limit() -> u32 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Default result limit for `pmo search`.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Minimum cosine similarity for a chunk to be returned.
    #[serde(default)]
    pub min_score: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            min_score: 0.0,
        }
    }
}
