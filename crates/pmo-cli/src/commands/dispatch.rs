use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Redact(args) => commands::redact::handle(&args, &ctx.config, flags),
        Commands::Ingest(args) => commands::ingest::handle(&args, ctx, flags).await,
        Commands::Search(args) => commands::search::handle(&args, ctx, flags).await,
        Commands::Documents { action } => commands::documents::handle(&action, ctx, flags).await,
        Commands::Allowlist { action } => commands::allowlist::handle(&action, ctx, flags).await,
        Commands::Messages { action } => commands::messages::handle(&action, ctx, flags).await,
    }
}
