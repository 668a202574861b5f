use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::DocumentFormat;

/// An ingested project artifact. Only redacted text is ever derived from it;
/// the original bytes are not stored.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub project_id: String,
    pub file_name: String,
    pub format: DocumentFormat,
    /// Character length of the redacted text.
    pub char_len: u64,
    /// Per-kind PII counts found during redaction (`"ssn" -> 2`).
    pub pii_summary: BTreeMap<String, u32>,
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Whether redaction found anything in this document.
    #[must_use]
    pub fn had_pii(&self) -> bool {
        !self.pii_summary.is_empty()
    }
}
