//! ID prefixes and generation.
//!
//! Every stored entity gets a short prefixed ID such as `"doc-a3f8b2c1"`:
//! a three-letter prefix, a dash, and 8 lowercase hex characters drawn from
//! the OS random source. IDs are minted in-process rather than by the
//! database because the ingestion pipeline assigns them before it knows
//! which store (remote, local or in-memory) will accept the rows.

use crate::errors::CoreError;

pub const PREFIX_DOCUMENT: &str = "doc";
pub const PREFIX_CHUNK: &str = "chk";

/// All known prefixes, in table order.
pub const ALL_PREFIXES: &[&str] = &[PREFIX_DOCUMENT, PREFIX_CHUNK];

/// Generate a new prefixed ID, e.g. `"chk-0f3a9b12"`.
///
/// # Errors
///
/// Returns [`CoreError::Other`] if the OS random source is unavailable.
pub fn new_id(prefix: &str) -> Result<String, CoreError> {
    let mut bytes = [0u8; 4];
    getrandom::fill(&mut bytes)
        .map_err(|e| CoreError::Other(anyhow::anyhow!("failed to generate id: {e}")))?;
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    Ok(format!("{prefix}-{hex}"))
}

/// Check that `id` has the shape `{prefix}-{8 hex}`.
#[must_use]
pub fn has_prefix(id: &str, prefix: &str) -> bool {
    id.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|hex| hex.len() == 8 && hex.bytes().all(|b| b.is_ascii_hexdigit()))
}

/// Like [`has_prefix`], as a `Result` for validating user-supplied IDs.
///
/// # Errors
///
/// Returns [`CoreError::Validation`] if `id` is not a `{prefix}-{8 hex}` ID.
pub fn validate_id(id: &str, prefix: &str) -> Result<(), CoreError> {
    if has_prefix(id, prefix) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "expected a '{prefix}-' id with 8 hex characters, got '{id}'"
        )))
    }
}
