use pmo_core::entities::AllowedSender;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AllowlistCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct AllowlistResponse {
    senders: Vec<AllowedSender>,
}

#[derive(Debug, Serialize)]
struct SenderStatusResponse {
    address: String,
    allowed: bool,
}

#[derive(Debug, Serialize)]
struct SenderRemovedResponse {
    address: String,
    removed: bool,
}

/// Handle `pmo allowlist`.
pub async fn handle(
    action: &AllowlistCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let db = ctx.bookkeeping();
    match action {
        AllowlistCommands::Add { address } => {
            let sender = db.allow_sender(address).await?;
            output(&sender, flags.format)
        }
        AllowlistCommands::Remove { address } => {
            let removed = db.disallow_sender(address).await?;
            output(
                &SenderRemovedResponse {
                    address: address.clone(),
                    removed,
                },
                flags.format,
            )
        }
        AllowlistCommands::List => {
            let senders = db.list_allowed_senders().await?;
            output(&AllowlistResponse { senders }, flags.format)
        }
        AllowlistCommands::Check { address } => {
            let allowed = db.is_sender_allowed(address).await?;
            output(
                &SenderStatusResponse {
                    address: address.clone(),
                    allowed,
                },
                flags.format,
            )
        }
    }
}
