use clap::Subcommand;

/// Sender allow-list commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AllowlistCommands {
    /// Accept mail from an address.
    Add { address: String },
    /// Stop accepting mail from an address.
    Remove { address: String },
    /// List allowed senders.
    List,
    /// Check whether an address is allowed.
    Check { address: String },
}
