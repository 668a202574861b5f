//! Redaction results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::kind::PiiKind;

/// Per-kind match counts. Only kinds that were actually redacted appear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RedactionSummary(BTreeMap<PiiKind, usize>);

impl RedactionSummary {
    pub(crate) fn add(&mut self, kind: PiiKind, count: usize) {
        if count > 0 {
            *self.0.entry(kind).or_default() += count;
        }
    }

    /// Matches redacted for `kind` (0 if none).
    #[must_use]
    pub fn count(&self, kind: PiiKind) -> usize {
        self.0.get(&kind).copied().unwrap_or_default()
    }

    /// Total matches across all kinds.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PiiKind, usize)> + '_ {
        self.0.iter().map(|(kind, count)| (*kind, *count))
    }

    /// String-keyed copy, e.g. `{"phone": 1, "ssn": 1}`, for storage.
    #[must_use]
    pub fn to_string_map(&self) -> BTreeMap<String, u32> {
        self.0
            .iter()
            .map(|(kind, count)| {
                (
                    kind.as_str().to_string(),
                    u32::try_from(*count).unwrap_or(u32::MAX),
                )
            })
            .collect()
    }
}

/// Output of [`crate::redact`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionOutcome {
    /// Text with every detected match rewritten according to the policy.
    pub text: String,
    pub summary: RedactionSummary,
    /// `true` iff `summary` is non-empty.
    pub had_pii: bool,
}

impl RedactionOutcome {
    pub(crate) fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            summary: RedactionSummary::default(),
            had_pii: false,
        }
    }

    pub(crate) fn new(text: String, summary: RedactionSummary) -> Self {
        let had_pii = !summary.is_empty();
        Self {
            text,
            summary,
            had_pii,
        }
    }

    /// Split into `(redacted_text, summary, had_pii)`.
    #[must_use]
    pub fn into_parts(self) -> (String, RedactionSummary, bool) {
        (self.text, self.summary, self.had_pii)
    }
}
