use clap::Subcommand;

/// Stored document commands.
#[derive(Clone, Debug, Subcommand)]
pub enum DocumentCommands {
    /// List documents of a project.
    List {
        #[arg(long)]
        project: String,
    },
    /// Get a document by ID.
    Get { id: String },
    /// Delete a document and its chunks.
    Delete { id: String },
}
