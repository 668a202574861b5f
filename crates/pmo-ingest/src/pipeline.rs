//! Ingestion pipeline: extract → redact → chunk → embed → store.
//!
//! Redaction runs on the full extracted text before anything else sees it.
//! Chunk content, chunk titles, embeddings and the stored document metadata
//! are all derived from the redacted text; the original bytes are dropped
//! once extraction finishes.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;

use pmo_config::IngestConfig;
use pmo_core::entities::{Chunk, Document};
use pmo_core::enums::DocumentFormat;
use pmo_core::ids::{PREFIX_CHUNK, PREFIX_DOCUMENT, new_id};
use pmo_db::DocumentStore;
use pmo_embeddings::{Embedder, embed_in_batches};
use pmo_redact::{PiiPolicy, redact};

use crate::chunker::{ChunkOptions, TextChunk, chunk_document};
use crate::error::IngestError;
use crate::extract::extract_text;

/// Limits applied to every ingested file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    pub chunk: ChunkOptions,
    pub max_file_bytes: u64,
    pub embed_batch_size: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self::from(&IngestConfig::default())
    }
}

impl From<&IngestConfig> for IngestOptions {
    fn from(config: &IngestConfig) -> Self {
        Self {
            chunk: ChunkOptions::from(config),
            max_file_bytes: config.max_file_bytes,
            embed_batch_size: config.embed_batch_size.max(1),
        }
    }
}

/// Result of ingesting one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub document_id: String,
    pub project_id: String,
    pub file_name: String,
    pub format: DocumentFormat,
    pub chunk_count: usize,
    pub pii_summary: BTreeMap<String, u32>,
    pub had_pii: bool,
}

/// Ingests files into a [`DocumentStore`] using an [`Embedder`].
pub struct IngestionPipeline<S, E> {
    store: S,
    embedder: E,
    policy: PiiPolicy,
    options: IngestOptions,
}

impl<S, E> IngestionPipeline<S, E> {
    pub const fn new(store: S, embedder: E, policy: PiiPolicy, options: IngestOptions) -> Self {
        Self {
            store,
            embedder,
            policy,
            options,
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn policy(&self) -> &PiiPolicy {
        &self.policy
    }

    /// Give back the store and embedder, e.g. to run a search afterwards.
    pub fn into_parts(self) -> (S, E) {
        (self.store, self.embedder)
    }
}

impl<S: DocumentStore, E: Embedder> IngestionPipeline<S, E> {
    /// Ingest one file for `project_id`.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError`] if the file is rejected by extraction, the
    /// embedder fails, or the store rejects the writes. A document whose
    /// chunks fail to store is deleted again before the error is returned.
    pub async fn ingest(
        &mut self,
        project_id: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<IngestReport, IngestError> {
        let project_id = project_id.trim();
        if project_id.is_empty() {
            return Err(IngestError::MissingProject);
        }

        let extracted = extract_text(file_name, bytes, self.options.max_file_bytes)?;
        let outcome = redact(&extracted.text, &self.policy);
        drop(extracted.text);

        let text_chunks = chunk_document(&outcome.text, file_name, &self.options.chunk);
        let inputs: Vec<String> = text_chunks.iter().map(embedding_input).collect();
        let embeddings = embed_in_batches(
            &mut self.embedder,
            &inputs,
            self.options.embed_batch_size,
        )?;

        let document = Document {
            id: new_id(PREFIX_DOCUMENT)?,
            project_id: project_id.to_string(),
            file_name: file_name.to_string(),
            format: extracted.format,
            char_len: u64::try_from(outcome.text.chars().count()).unwrap_or(u64::MAX),
            pii_summary: outcome.summary.to_string_map(),
            created_at: Utc::now(),
        };

        let chunks = text_chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| to_stored_chunk(&document, chunk, embedding))
            .collect::<Result<Vec<_>, IngestError>>()?;

        self.store.insert_document(&document).await?;
        if let Err(e) = self.store.insert_chunks(&chunks).await {
            tracing::warn!(document_id = %document.id, error = %e, "storing chunks failed, removing document");
            if let Err(cleanup) = self.store.delete_document(&document.id).await {
                tracing::warn!(document_id = %document.id, error = %cleanup, "cleanup failed");
            }
            return Err(e.into());
        }

        tracing::info!(
            document_id = %document.id,
            project_id,
            chunks = chunks.len(),
            pii_total = outcome.summary.total(),
            "ingested document"
        );

        Ok(IngestReport {
            had_pii: document.had_pii(),
            document_id: document.id,
            project_id: document.project_id,
            file_name: document.file_name,
            format: document.format,
            chunk_count: chunks.len(),
            pii_summary: document.pii_summary,
        })
    }
}

/// Text handed to the embedding model: the heading gives short chunks context.
fn embedding_input(chunk: &TextChunk) -> String {
    match &chunk.title {
        Some(title) if !title.is_empty() => format!("{title}: {}", chunk.content),
        _ => chunk.content.clone(),
    }
}

fn to_stored_chunk(
    document: &Document,
    chunk: TextChunk,
    embedding: Vec<f32>,
) -> Result<Chunk, IngestError> {
    Ok(Chunk {
        id: new_id(PREFIX_CHUNK)?,
        document_id: document.id.clone(),
        project_id: document.project_id.clone(),
        chunk_index: chunk.chunk_index,
        title: chunk.title,
        section_path: chunk.section_path,
        content: chunk.content,
        byte_offset: u64::try_from(chunk.byte_offset).unwrap_or(u64::MAX),
        char_len: u64::try_from(chunk.char_len).unwrap_or(u64::MAX),
        embedding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_input_prefixes_title() {
        let mut chunk = TextChunk {
            title: Some("Risks".to_string()),
            section_path: vec!["Risks".to_string()],
            content: "Data load slips".to_string(),
            chunk_index: 0,
            source_file: "status.md".to_string(),
            byte_offset: 0,
            char_len: 15,
        };
        assert_eq!(embedding_input(&chunk), "Risks: Data load slips");
        chunk.title = None;
        assert_eq!(embedding_input(&chunk), "Data load slips");
    }

    #[test]
    fn options_follow_config() {
        let config = IngestConfig {
            max_chunk_chars: 500,
            overlap_chars: 50,
            max_file_bytes: 1000,
            embed_batch_size: 0,
        };
        let options = IngestOptions::from(&config);
        assert_eq!(options.chunk, ChunkOptions::new(500, 50));
        assert_eq!(options.max_file_bytes, 1000);
        assert_eq!(options.embed_batch_size, 1);
    }
}
