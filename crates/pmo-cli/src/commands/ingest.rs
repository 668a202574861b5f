use anyhow::Context;
use pmo_embeddings::EmbeddingEngine;
use pmo_ingest::{IngestOptions, IngestionPipeline};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::IngestArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `pmo ingest`.
pub async fn handle(
    args: &IngestArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let file_name = args
        .path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("invalid file name: {}", args.path.display()))?;
    let bytes = std::fs::read(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;

    let policy = ctx.config.redaction.policy()?;
    let options = IngestOptions::from(&ctx.config.ingest);
    let embedder = EmbeddingEngine::new().context("failed to initialize embedding engine")?;

    let mut pipeline = IngestionPipeline::new(&ctx.store, embedder, policy, options);
    let report = pipeline
        .ingest(&args.project, file_name, &bytes)
        .await
        .with_context(|| format!("failed to ingest {}", args.path.display()))?;

    output(&report, flags.format)
}
