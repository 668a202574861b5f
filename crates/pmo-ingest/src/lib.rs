//! # pmo-ingest
//!
//! Turns uploaded project artifacts into searchable, PII-free chunks.
//!
//! - [`extract`]: file type detection and text extraction (text, markdown,
//!   CSV, JSON, HTML)
//! - [`parser`]: ast-grep trees for markdown and HTML
//! - [`chunker`]: heading-aware chunking with overlap
//! - [`pipeline`]: extract → redact → chunk → embed → store

pub mod chunker;
pub mod error;
pub mod extract;
pub mod parser;
pub mod pipeline;

pub use chunker::{ChunkOptions, TextChunk, chunk_document};
pub use error::IngestError;
pub use extract::{ExtractedText, extract_text};
pub use pipeline::{IngestOptions, IngestReport, IngestionPipeline};
