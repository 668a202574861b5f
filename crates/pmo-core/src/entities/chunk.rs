use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A contiguous slice of a document's redacted text with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Chunk {
    pub id: String,
    pub document_id: String,
    pub project_id: String,
    /// Zero-based position of this chunk within its document.
    pub chunk_index: u32,
    /// Nearest heading, if the source had one.
    pub title: Option<String>,
    /// Heading breadcrumb, outermost first.
    pub section_path: Vec<String>,
    pub content: String,
    pub byte_offset: u64,
    pub char_len: u64,
    pub embedding: Vec<f32>,
}
