//! Document and chunk repository: the libSQL [`DocumentStore`] implementation.

use pmo_core::entities::{Chunk, Document};

use crate::PmoDb;
use crate::error::DatabaseError;
use crate::helpers::{
    format_datetime, get_opt_string, get_u64, parse_datetime, parse_enum, parse_json, to_json,
    to_sql_int,
};
use crate::store::DocumentStore;

const DOCUMENT_COLUMNS: &str =
    "id, project_id, file_name, format, char_len, pii_summary, created_at";

const CHUNK_COLUMNS: &str = "id, document_id, project_id, chunk_index, title, section_path, \
     content, byte_offset, char_len, embedding";

fn row_to_document(row: &libsql::Row) -> Result<Document, DatabaseError> {
    Ok(Document {
        id: row.get::<String>(0)?,
        project_id: row.get::<String>(1)?,
        file_name: row.get::<String>(2)?,
        format: parse_enum(&row.get::<String>(3)?)?,
        char_len: get_u64(row, 4, "char_len")?,
        pii_summary: parse_json(&row.get::<String>(5)?, "pii_summary")?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

fn row_to_chunk(row: &libsql::Row) -> Result<Chunk, DatabaseError> {
    let raw_index = row.get::<i64>(3)?;
    let chunk_index = u32::try_from(raw_index)
        .map_err(|_| DatabaseError::InvalidState(format!("bad chunk_index: {raw_index}")))?;

    Ok(Chunk {
        id: row.get::<String>(0)?,
        document_id: row.get::<String>(1)?,
        project_id: row.get::<String>(2)?,
        chunk_index,
        title: get_opt_string(row, 4)?,
        section_path: parse_json(&row.get::<String>(5)?, "section_path")?,
        content: row.get::<String>(6)?,
        byte_offset: get_u64(row, 7, "byte_offset")?,
        char_len: get_u64(row, 8, "char_len")?,
        embedding: parse_json(&row.get::<String>(9)?, "embedding")?,
    })
}

async fn insert_chunk(
    conn: &libsql::Connection,
    sql: &str,
    chunk: &Chunk,
) -> Result<(), DatabaseError> {
    conn.execute(
        sql,
        libsql::params![
            chunk.id.as_str(),
            chunk.document_id.as_str(),
            chunk.project_id.as_str(),
            i64::from(chunk.chunk_index),
            chunk.title.as_deref(),
            to_json(&chunk.section_path)?,
            chunk.content.as_str(),
            to_sql_int(chunk.byte_offset, "byte_offset")?,
            to_sql_int(chunk.char_len, "char_len")?,
            to_json(&chunk.embedding)?
        ],
    )
    .await?;
    Ok(())
}

impl DocumentStore for PmoDb {
    async fn insert_document(&self, document: &Document) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                &format!("INSERT INTO documents ({DOCUMENT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
                libsql::params![
                    document.id.as_str(),
                    document.project_id.as_str(),
                    document.file_name.as_str(),
                    document.format.as_str(),
                    to_sql_int(document.char_len, "char_len")?,
                    to_json(&document.pii_summary)?,
                    format_datetime(&document.created_at)
                ],
            )
            .await?;
        tracing::debug!(document_id = %document.id, "inserted document");
        Ok(())
    }

    async fn insert_chunks(&self, chunks: &[Chunk]) -> Result<(), DatabaseError> {
        if chunks.is_empty() {
            return Ok(());
        }

        let sql = format!(
            "INSERT INTO chunks ({CHUNK_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        );
        let tx = self.conn().transaction().await?;
        for chunk in chunks {
            if let Err(e) = insert_chunk(&tx, &sql, chunk).await {
                tx.rollback().await?;
                return Err(e);
            }
        }
        tx.commit().await?;
        tracing::debug!(chunks = chunks.len(), "inserted chunks");
        Ok(())
    }

    async fn get_document(&self, id: &str) -> Result<Option<Document>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_document(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_documents(&self, project_id: &str) -> Result<Vec<Document>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE project_id = ?1 ORDER BY created_at, id"
                ),
                [project_id],
            )
            .await?;
        let mut documents = Vec::new();
        while let Some(row) = rows.next().await? {
            documents.push(row_to_document(&row)?);
        }
        Ok(documents)
    }

    async fn chunks_for_project(&self, project_id: &str) -> Result<Vec<Chunk>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {CHUNK_COLUMNS} FROM chunks WHERE project_id = ?1 ORDER BY document_id, chunk_index"
                ),
                [project_id],
            )
            .await?;
        let mut chunks = Vec::new();
        while let Some(row) = rows.next().await? {
            chunks.push(row_to_chunk(&row)?);
        }
        Ok(chunks)
    }

    async fn delete_document(&self, id: &str) -> Result<bool, DatabaseError> {
        // Remote connections do not honor the foreign_keys pragma, so chunks
        // are removed explicitly.
        let tx = self.conn().transaction().await?;
        tx.execute("DELETE FROM chunks WHERE document_id = ?1", [id])
            .await?;
        let deleted = tx
            .execute("DELETE FROM documents WHERE id = ?1", [id])
            .await?;
        tx.commit().await?;
        Ok(deleted > 0)
    }
}
