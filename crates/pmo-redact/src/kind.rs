//! PII categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A category of personally-identifiable information.
///
/// Declaration order is detection order: detectors run over the text in the
/// order of [`PiiKind::ALL`], each seeing the output of the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiKind {
    Email,
    Ssn,
    Phone,
    Dob,
    Card,
    Routing,
    Passport,
    DriversLicense,
    Address,
}

impl PiiKind {
    /// Every kind, in detection order.
    pub const ALL: [Self; 9] = [
        Self::Email,
        Self::Ssn,
        Self::Phone,
        Self::Dob,
        Self::Card,
        Self::Routing,
        Self::Passport,
        Self::DriversLicense,
        Self::Address,
    ];

    /// Summary key, e.g. `"drivers_license"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Ssn => "ssn",
            Self::Phone => "phone",
            Self::Dob => "dob",
            Self::Card => "card",
            Self::Routing => "routing",
            Self::Passport => "passport",
            Self::DriversLicense => "drivers_license",
            Self::Address => "address",
        }
    }

    /// Strict-mode replacement token, e.g. `"[REDACTED:SSN]"`.
    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Email => "[REDACTED:EMAIL]",
            Self::Ssn => "[REDACTED:SSN]",
            Self::Phone => "[REDACTED:PHONE]",
            Self::Dob => "[REDACTED:DOB]",
            Self::Card => "[REDACTED:CARD]",
            Self::Routing => "[REDACTED:ROUTING]",
            Self::Passport => "[REDACTED:PASSPORT]",
            Self::DriversLicense => "[REDACTED:DRIVERS_LICENSE]",
            Self::Address => "[REDACTED:ADDRESS]",
        }
    }
}

impl fmt::Display for PiiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_uppercased_key() {
        for kind in PiiKind::ALL {
            let expected = format!("[REDACTED:{}]", kind.as_str().to_ascii_uppercase());
            assert_eq!(kind.placeholder(), expected);
        }
    }

    #[test]
    fn serde_matches_as_str() {
        for kind in PiiKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }

    #[test]
    fn all_is_sorted_by_detection_order() {
        let mut sorted = PiiKind::ALL;
        sorted.sort();
        assert_eq!(sorted, PiiKind::ALL);
    }
}
