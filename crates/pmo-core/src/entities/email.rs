use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An inbound email message that has already been ingested.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProcessedMessage {
    pub message_id: String,
    pub processed_at: DateTime<Utc>,
}

/// A sender address whose mail is accepted for ingestion.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AllowedSender {
    pub address: String,
    pub added_at: DateTime<Utc>,
}

/// Normalize an email address for allow-list storage and lookup.
#[must_use]
pub fn normalize_address(address: &str) -> String {
    address.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize_address("  PM.Lead@Example.COM "), "pm.lead@example.com");
    }
}
