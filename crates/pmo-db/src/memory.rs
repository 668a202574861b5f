//! In-process [`DocumentStore`].
//!
//! Holds everything in a `tokio::sync::RwLock`. Used by tests and as a
//! last-resort fallback when no database file can be opened.

use std::collections::BTreeMap;

use tokio::sync::RwLock;

use pmo_core::entities::{Chunk, Document};

use crate::error::DatabaseError;
use crate::store::DocumentStore;

#[derive(Debug, Default)]
struct Tables {
    documents: BTreeMap<String, Document>,
    /// Keyed by document ID; each list is sorted by chunk index.
    chunks: BTreeMap<String, Vec<Chunk>>,
}

/// A [`DocumentStore`] that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents across all projects.
    pub async fn document_count(&self) -> usize {
        self.tables.read().await.documents.len()
    }
}

impl DocumentStore for MemoryStore {
    async fn insert_document(&self, document: &Document) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.documents.contains_key(&document.id) {
            return Err(DatabaseError::InvalidInput(format!(
                "document {} already exists",
                document.id
            )));
        }
        tables
            .documents
            .insert(document.id.clone(), document.clone());
        Ok(())
    }

    async fn insert_chunks(&self, chunks: &[Chunk]) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;

        // Validate the whole batch before touching anything.
        for (i, chunk) in chunks.iter().enumerate() {
            if !tables.documents.contains_key(&chunk.document_id) {
                return Err(DatabaseError::InvalidInput(format!(
                    "chunk {} references unknown document {}",
                    chunk.id, chunk.document_id
                )));
            }
            let existing = tables.chunks.get(&chunk.document_id);
            let clashes_existing = existing
                .is_some_and(|list| list.iter().any(|c| c.chunk_index == chunk.chunk_index));
            let clashes_batch = chunks[..i].iter().any(|c| {
                c.document_id == chunk.document_id && c.chunk_index == chunk.chunk_index
            });
            if clashes_existing || clashes_batch {
                return Err(DatabaseError::InvalidInput(format!(
                    "duplicate chunk index {} for document {}",
                    chunk.chunk_index, chunk.document_id
                )));
            }
        }

        for chunk in chunks {
            let list = tables.chunks.entry(chunk.document_id.clone()).or_default();
            list.push(chunk.clone());
            list.sort_by_key(|c| c.chunk_index);
        }
        Ok(())
    }

    async fn get_document(&self, id: &str) -> Result<Option<Document>, DatabaseError> {
        Ok(self.tables.read().await.documents.get(id).cloned())
    }

    async fn list_documents(&self, project_id: &str) -> Result<Vec<Document>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut documents: Vec<Document> = tables
            .documents
            .values()
            .filter(|d| d.project_id == project_id)
            .cloned()
            .collect();
        documents.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(documents)
    }

    async fn chunks_for_project(&self, project_id: &str) -> Result<Vec<Chunk>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .chunks
            .values()
            .flatten()
            .filter(|c| c.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn delete_document(&self, id: &str) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.chunks.remove(id);
        Ok(tables.documents.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;
    use pmo_core::enums::DocumentFormat;
    use pretty_assertions::assert_eq;

    use super::*;

    fn document(id: &str, project: &str) -> Document {
        Document {
            id: id.to_string(),
            project_id: project.to_string(),
            file_name: "minutes.txt".to_string(),
            format: DocumentFormat::Text,
            char_len: 10,
            pii_summary: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    fn chunk(document_id: &str, project: &str, index: u32) -> Chunk {
        Chunk {
            id: format!("chk-{document_id}-{index}"),
            document_id: document_id.to_string(),
            project_id: project.to_string(),
            chunk_index: index,
            title: None,
            section_path: Vec::new(),
            content: format!("part {index}"),
            byte_offset: 0,
            char_len: 6,
            embedding: vec![1.0, 0.0],
        }
    }

    #[tokio::test]
    async fn insert_get_list_delete() {
        let store = MemoryStore::new();
        store.insert_document(&document("doc-1", "prj")).await.unwrap();
        store
            .insert_chunks(&[chunk("doc-1", "prj", 1), chunk("doc-1", "prj", 0)])
            .await
            .unwrap();

        assert!(store.get_document("doc-1").await.unwrap().is_some());
        assert_eq!(store.list_documents("prj").await.unwrap().len(), 1);
        let indexes: Vec<u32> = store
            .chunks_for_project("prj")
            .await
            .unwrap()
            .iter()
            .map(|c| c.chunk_index)
            .collect();
        assert_eq!(indexes, vec![0, 1]);

        assert!(store.delete_document("doc-1").await.unwrap());
        assert!(store.chunks_for_project("prj").await.unwrap().is_empty());
        assert_eq!(store.document_count().await, 0);
    }

    #[tokio::test]
    async fn rejects_duplicates_and_orphans() {
        let store = MemoryStore::new();
        store.insert_document(&document("doc-1", "prj")).await.unwrap();
        assert!(store.insert_document(&document("doc-1", "prj")).await.is_err());

        assert!(store.insert_chunks(&[chunk("doc-9", "prj", 0)]).await.is_err());
        assert!(
            store
                .insert_chunks(&[chunk("doc-1", "prj", 0), chunk("doc-1", "prj", 0)])
                .await
                .is_err()
        );
        assert!(store.chunks_for_project("prj").await.unwrap().is_empty());
    }
}
