use std::path::PathBuf;

use clap::{Args, Subcommand};
use pmo_redact::RedactionMode;

use crate::cli::subcommands::{AllowlistCommands, DocumentCommands, MessageCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Redact PII from a file or stdin.
    Redact(RedactArgs),
    /// Redact, chunk, embed and store a document.
    Ingest(IngestArgs),
    /// Semantic search over a project's stored chunks.
    Search(SearchArgs),
    /// Stored documents.
    Documents {
        #[command(subcommand)]
        action: DocumentCommands,
    },
    /// Email sender allow-list.
    Allowlist {
        #[command(subcommand)]
        action: AllowlistCommands,
    },
    /// Processed email messages.
    Messages {
        #[command(subcommand)]
        action: MessageCommands,
    },
}

/// Arguments for `pmo redact`.
#[derive(Clone, Debug, Args)]
pub struct RedactArgs {
    /// File to redact. Reads stdin when omitted.
    pub path: Option<PathBuf>,

    /// Override the configured mode: none, mask, strict.
    #[arg(long, value_parser = parse_mode)]
    pub mode: Option<RedactionMode>,

    /// Email domain exempt from redaction (repeatable, adds to config).
    #[arg(long = "allow-domain")]
    pub allow_domain: Vec<String>,

    /// Print the full outcome (text, summary, had_pii) instead of the text.
    #[arg(long)]
    pub summary: bool,
}

/// Arguments for `pmo ingest`.
#[derive(Clone, Debug, Args)]
pub struct IngestArgs {
    /// File to ingest.
    pub path: PathBuf,

    /// Project the document belongs to.
    #[arg(long)]
    pub project: String,
}

/// Arguments for `pmo search`.
#[derive(Clone, Debug, Args)]
pub struct SearchArgs {
    /// Natural-language query.
    pub query: String,

    /// Project to search in.
    #[arg(long)]
    pub project: String,

    /// Drop hits scoring below this cosine similarity.
    #[arg(long)]
    pub min_score: Option<f64>,
}

fn parse_mode(value: &str) -> Result<RedactionMode, String> {
    value.parse().map_err(|error: pmo_redact::RedactError| error.to_string())
}
