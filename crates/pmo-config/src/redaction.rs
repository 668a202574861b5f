//! PII redaction policy configuration.

use pmo_redact::{PiiPolicy, RedactionMode};
use pmo_redact::policy::{DEFAULT_MASK_CHAR, DEFAULT_MASK_KEEP};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_mask_keep() -> usize {
    DEFAULT_MASK_KEEP
}

const fn default_mask_char() -> char {
    DEFAULT_MASK_CHAR
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedactionConfig {
    /// `none`, `mask`, or `strict`.
    #[serde(default)]
    pub mode: RedactionMode,

    /// Email domains exempt from redaction (subdomains included).
    #[serde(default)]
    pub allow_email_domains: Vec<String>,

    /// Characters left visible at the end of a masked match.
    #[serde(default = "default_mask_keep")]
    pub mask_keep: usize,

    /// Filler used for masked characters.
    #[serde(default = "default_mask_char")]
    pub mask_char: char,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            mode: RedactionMode::default(),
            allow_email_domains: Vec::new(),
            mask_keep: default_mask_keep(),
            mask_char: default_mask_char(),
        }
    }
}

impl RedactionConfig {
    /// Build the redaction policy described by this section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `mask_char` is whitespace or a
    /// control character.
    pub fn policy(&self) -> Result<PiiPolicy, ConfigError> {
        PiiPolicy::new(self.mode)
            .with_allowed_domains(&self.allow_email_domains)
            .with_mask(self.mask_keep, self.mask_char)
            .map_err(|e| ConfigError::InvalidValue {
                field: "redaction.mask_char".into(),
                reason: e.to_string(),
            })
    }
}
