//! Detector patterns.
//!
//! These patterns are heuristics and deliberately fixed: downstream consumers
//! depend on exactly what gets redacted, so changing one changes stored data.
//! Each regex is compiled once on first use.

use std::sync::LazyLock;

use regex::Regex;

use crate::kind::PiiKind;

/// Email address. Group 1 is the domain.
pub const EMAIL: &str = r"[A-Za-z0-9._%+-]+@([A-Za-z0-9.-]+\.[A-Za-z]{2,})";

/// US Social Security number, dashed form only.
pub const SSN: &str = r"\b\d{3}-\d{2}-\d{4}\b";

/// NANP phone number with optional `+1` / `1` prefix and optional `(area)`.
pub const PHONE: &str = r"(?:\+?\b1[-.\s]?)?(?:\(\d{3}\)|\b\d{3})[-.\s]?\d{3}[-.\s]?\d{4}\b";

/// ISO-style date of birth, `YYYY-MM-DD` or `YYYY/MM/DD` (separators must agree).
pub const DOB: &str =
    r"\b(?:19|20)\d{2}(?:-(?:0[1-9]|1[0-2])-|/(?:0[1-9]|1[0-2])/)(?:0[1-9]|[12]\d|3[01])\b";

/// 13 to 19 digits, optionally grouped by single spaces or dashes.
/// Candidates must also pass the Luhn check.
pub const CARD: &str = r"\b(?:\d[ -]?){12,18}\d\b";

/// ABA bank routing number: exactly nine digits.
pub const ROUTING: &str = r"\b\d{9}\b";

/// Passport number: one capital letter followed by eight digits.
pub const PASSPORT: &str = r"\b[A-Z]\d{8}\b";

/// Driver's license: one or two capital letters followed by six to eight digits.
pub const DRIVERS_LICENSE: &str = r"\b[A-Z]{1,2}\d{6,8}\b";

/// Street address: house number, one to four capitalized words, and a
/// street-type suffix (suffix matched case-insensitively).
pub const ADDRESS: &str = r"\b\d{1,6}\s+(?:[A-Z][A-Za-z0-9.'-]*\s+){1,4}(?i:street|st|avenue|ave|road|rd|boulevard|blvd|lane|ln|drive|dr|court|ct|way|place|pl|terrace|ter|circle|cir|parkway|pkwy|highway|hwy)\b\.?";

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("detector patterns are valid regex literals")
}

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| compile(EMAIL));
static SSN_RE: LazyLock<Regex> = LazyLock::new(|| compile(SSN));
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| compile(PHONE));
static DOB_RE: LazyLock<Regex> = LazyLock::new(|| compile(DOB));
static CARD_RE: LazyLock<Regex> = LazyLock::new(|| compile(CARD));
static ROUTING_RE: LazyLock<Regex> = LazyLock::new(|| compile(ROUTING));
static PASSPORT_RE: LazyLock<Regex> = LazyLock::new(|| compile(PASSPORT));
static DRIVERS_LICENSE_RE: LazyLock<Regex> = LazyLock::new(|| compile(DRIVERS_LICENSE));
static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| compile(ADDRESS));

/// The compiled detector for `kind`.
#[must_use]
pub fn regex_for(kind: PiiKind) -> &'static Regex {
    match kind {
        PiiKind::Email => &EMAIL_RE,
        PiiKind::Ssn => &SSN_RE,
        PiiKind::Phone => &PHONE_RE,
        PiiKind::Dob => &DOB_RE,
        PiiKind::Card => &CARD_RE,
        PiiKind::Routing => &ROUTING_RE,
        PiiKind::Passport => &PASSPORT_RE,
        PiiKind::DriversLicense => &DRIVERS_LICENSE_RE,
        PiiKind::Address => &ADDRESS_RE,
    }
}
