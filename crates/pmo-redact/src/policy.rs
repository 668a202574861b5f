//! Redaction policy: how (and whether) detected PII is altered.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RedactError;

/// Default number of trailing characters left visible in mask mode.
pub const DEFAULT_MASK_KEEP: usize = 4;

/// Default filler character for mask mode.
pub const DEFAULT_MASK_CHAR: char = '*';

/// How matched PII is rewritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedactionMode {
    /// Leave the text untouched and report nothing.
    None,
    /// Partially mask matches, keeping a short suffix visible.
    #[default]
    Mask,
    /// Replace matches with `[REDACTED:<KIND>]`.
    Strict,
}

impl RedactionMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Mask => "mask",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for RedactionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RedactionMode {
    type Err = RedactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "mask" => Ok(Self::Mask),
            "strict" => Ok(Self::Strict),
            _ => Err(RedactError::UnknownMode(s.to_string())),
        }
    }
}

/// Redaction policy applied to a document before it is stored or embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PiiPolicy {
    pub mode: RedactionMode,
    /// Lowercase domains whose addresses (and subdomain addresses) are left as-is.
    allow_email_domains: BTreeSet<String>,
    /// Trailing characters kept visible in mask mode.
    pub mask_keep: usize,
    /// Filler for masked characters.
    pub mask_char: char,
}

impl Default for PiiPolicy {
    fn default() -> Self {
        Self::new(RedactionMode::default())
    }
}

impl PiiPolicy {
    #[must_use]
    pub const fn new(mode: RedactionMode) -> Self {
        Self {
            mode,
            allow_email_domains: BTreeSet::new(),
            mask_keep: DEFAULT_MASK_KEEP,
            mask_char: DEFAULT_MASK_CHAR,
        }
    }

    #[must_use]
    pub const fn none() -> Self {
        Self::new(RedactionMode::None)
    }

    #[must_use]
    pub const fn mask() -> Self {
        Self::new(RedactionMode::Mask)
    }

    #[must_use]
    pub const fn strict() -> Self {
        Self::new(RedactionMode::Strict)
    }

    /// Add domains to the email allow-list.
    ///
    /// Entries are trimmed, lowercased, and stripped of a leading `@` or `.`,
    /// so `"@Example.com"` and `".example.com"` both allow `example.com`.
    /// Blank entries are ignored.
    #[must_use]
    pub fn with_allowed_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for domain in domains {
            let normalized = normalize_domain(domain.as_ref());
            if !normalized.is_empty() {
                self.allow_email_domains.insert(normalized);
            }
        }
        self
    }

    /// Override the mask suffix length and filler.
    ///
    /// # Errors
    ///
    /// Returns [`RedactError::InvalidMaskChar`] if `filler` is whitespace or a
    /// control character, since such a mask would be invisible.
    pub fn with_mask(mut self, keep: usize, filler: char) -> Result<Self, RedactError> {
        if filler.is_whitespace() || filler.is_control() {
            return Err(RedactError::InvalidMaskChar(filler));
        }
        self.mask_keep = keep;
        self.mask_char = filler;
        Ok(self)
    }

    /// Allow-listed domains, sorted.
    pub fn allowed_domains(&self) -> impl Iterator<Item = &str> {
        self.allow_email_domains.iter().map(String::as_str)
    }

    /// Whether an email with this domain is exempt from redaction.
    ///
    /// Exempt when the domain equals an allow-listed domain or is a subdomain
    /// of one (`mail.example.com` under `example.com`). Comparison is
    /// case-insensitive; `notexample.com` does not match `example.com`.
    #[must_use]
    pub fn is_domain_allowed(&self, domain: &str) -> bool {
        if self.allow_email_domains.is_empty() {
            return false;
        }
        let domain = normalize_domain(domain);
        self.allow_email_domains.iter().any(|allowed| {
            domain == *allowed
                || domain
                    .strip_suffix(allowed.as_str())
                    .is_some_and(|head| head.ends_with('.'))
        })
    }
}

fn normalize_domain(domain: &str) -> String {
    domain
        .trim()
        .trim_start_matches(['@', '.'])
        .to_ascii_lowercase()
}
