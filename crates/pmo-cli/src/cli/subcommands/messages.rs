use clap::Subcommand;

/// Processed-message bookkeeping commands.
#[derive(Clone, Debug, Subcommand)]
pub enum MessageCommands {
    /// Record a message ID as processed.
    Mark { id: String },
    /// Check whether a message ID was already processed.
    Check { id: String },
    /// Forget processed messages older than N days.
    Prune {
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
}
