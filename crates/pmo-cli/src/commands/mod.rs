pub mod allowlist;
pub mod dispatch;
pub mod documents;
pub mod ingest;
pub mod messages;
pub mod redact;
pub mod search;
