use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::MessageCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct MessageStatusResponse {
    message_id: String,
    /// `mark`: whether this call recorded it. `check`: whether it is recorded.
    processed: bool,
}

#[derive(Debug, Serialize)]
struct PruneResponse {
    older_than: DateTime<Utc>,
    removed: u64,
}

/// Handle `pmo messages`.
pub async fn handle(
    action: &MessageCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let db = ctx.bookkeeping();
    match action {
        MessageCommands::Mark { id } => {
            let processed = db.mark_message_processed(id).await?;
            output(
                &MessageStatusResponse {
                    message_id: id.clone(),
                    processed,
                },
                flags.format,
            )
        }
        MessageCommands::Check { id } => {
            let processed = db.is_message_processed(id).await?;
            output(
                &MessageStatusResponse {
                    message_id: id.clone(),
                    processed,
                },
                flags.format,
            )
        }
        MessageCommands::Prune { days } => {
            let older_than = prune_cutoff(Utc::now(), *days);
            let removed = db.prune_processed_messages(older_than).await?;
            output(&PruneResponse { older_than, removed }, flags.format)
        }
    }
}

fn prune_cutoff(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now - Duration::days(i64::from(days))
}
