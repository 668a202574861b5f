//! Redaction error types.
//!
//! Redaction itself never fails. These errors only come from building a
//! policy out of untrusted strings (CLI flags, config values).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RedactError {
    /// The mode string is not one of `none`, `mask`, `strict`.
    #[error("Unknown redaction mode '{0}' (expected none, mask, or strict)")]
    UnknownMode(String),

    /// The mask filler must be a single visible character.
    #[error("Invalid mask character {0:?}")]
    InvalidMaskChar(char),
}
