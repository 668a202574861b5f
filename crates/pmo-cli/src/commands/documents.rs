use pmo_core::entities::Document;
use pmo_core::errors::CoreError;
use pmo_core::ids::{PREFIX_DOCUMENT, validate_id};
use pmo_db::DocumentStore;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::DocumentCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct DocumentListResponse {
    project_id: String,
    documents: Vec<Document>,
}

#[derive(Debug, Serialize)]
struct DocumentDeleteResponse {
    id: String,
    deleted: bool,
}

const FALLBACK_READ_HINT: &str = "reads go to the remote database while it is reachable; \
documents ingested during a remote outage are only in the local database";

/// Not-found error for `documents get`. With a remote primary open, the
/// local fallback is not consulted, so the error says where the document
/// may still live.
fn missing_document(id: &str, remote_open: bool) -> anyhow::Error {
    let error = anyhow::Error::new(CoreError::NotFound {
        entity_type: "document".to_string(),
        id: id.to_string(),
    });
    if remote_open {
        error.context(FALLBACK_READ_HINT)
    } else {
        error
    }
}

/// Handle `pmo documents`.
pub async fn handle(
    action: &DocumentCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        DocumentCommands::List { project } => {
            let mut documents = ctx.store.list_documents(project).await?;
            if let Some(limit) = flags.limit {
                documents.truncate(usize::try_from(limit)?);
            }
            output(
                &DocumentListResponse {
                    project_id: project.clone(),
                    documents,
                },
                flags.format,
            )
        }
        DocumentCommands::Get { id } => {
            validate_id(id, PREFIX_DOCUMENT)?;
            let remote_open = ctx.store.has_primary();
            let document = ctx
                .store
                .get_document(id)
                .await?
                .ok_or_else(|| missing_document(id, remote_open))?;
            output(&document, flags.format)
        }
        DocumentCommands::Delete { id } => {
            validate_id(id, PREFIX_DOCUMENT)?;
            let deleted = ctx.store.delete_document(id).await?;
            output(
                &DocumentDeleteResponse {
                    id: id.clone(),
                    deleted,
                },
                flags.format,
            )
        }
    }
}
