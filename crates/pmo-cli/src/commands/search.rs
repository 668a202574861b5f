use anyhow::Context;
use pmo_embeddings::EmbeddingEngine;
use pmo_search::{VectorSearchFilters, vector_search};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SearchArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `pmo search`.
pub async fn handle(
    args: &SearchArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let filters = filters_for(args, flags, &ctx.config.search);
    let mut embedder = EmbeddingEngine::new().context("failed to initialize embedding engine")?;

    let hits = vector_search(&ctx.store, &mut embedder, &args.project, &args.query, &filters)
        .await
        .context("search failed")?;

    output(&hits, flags.format)
}

fn filters_for(
    args: &SearchArgs,
    flags: &GlobalFlags,
    config: &pmo_config::SearchConfig,
) -> VectorSearchFilters {
    let mut filters = VectorSearchFilters::from(config);
    if let Some(limit) = flags.limit {
        filters.limit = limit;
    }
    if let Some(min_score) = args.min_score {
        filters.min_score = min_score;
    }
    filters
}
