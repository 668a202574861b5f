//! # pmo-redact
//!
//! PII detection and redaction for document text, run after extraction and
//! before anything is chunked, embedded, or persisted.
//!
//! Nine regex detectors run in a fixed order over the running text (see
//! [`PiiKind::ALL`]). Each match is rewritten according to a [`PiiPolicy`]:
//!
//! | Mode     | Effect                                                       |
//! |----------|--------------------------------------------------------------|
//! | `none`   | Text returned unchanged, empty summary                        |
//! | `mask`   | All but the last `mask_keep` alphanumerics masked; email local part becomes `***` |
//! | `strict` | Match replaced with `[REDACTED:<KIND>]`                       |
//!
//! Card-number candidates must pass a Luhn check (see [`card`] for digits
//! that trail or lead a card) and emails on allow-listed domains are
//! skipped; neither is counted when skipped. Masking counts alphanumeric
//! characters only: separators stay in place and are not part of the kept
//! suffix, so the date `1984-07-19` masks to `****-07-19`.
//!
//! Redaction is total: it never fails and holds no state, so it can be called
//! from any thread.
//!
//! ```
//! use pmo_redact::{PiiKind, PiiPolicy, redact};
//!
//! let outcome = redact(
//!     "Contact John at 555-123-4567, SSN 123-45-6789.",
//!     &PiiPolicy::strict(),
//! );
//! assert_eq!(
//!     outcome.text,
//!     "Contact John at [REDACTED:PHONE], SSN [REDACTED:SSN]."
//! );
//! assert_eq!(outcome.summary.count(PiiKind::Phone), 1);
//! assert!(outcome.had_pii);
//! ```

pub mod card;
pub mod error;
pub mod kind;
pub mod luhn;
pub mod mask;
pub mod outcome;
pub mod patterns;
pub mod policy;

pub use card::card_span;
pub use error::RedactError;
pub use kind::PiiKind;
pub use luhn::luhn_valid;
pub use mask::partial_mask;
pub use outcome::{RedactionOutcome, RedactionSummary};
pub use policy::{PiiPolicy, RedactionMode};

use regex::Captures;

/// Redact PII from `text` according to `policy`.
#[must_use]
pub fn redact(text: &str, policy: &PiiPolicy) -> RedactionOutcome {
    if policy.mode == RedactionMode::None || text.is_empty() {
        return RedactionOutcome::unchanged(text);
    }

    let mut summary = RedactionSummary::default();
    let mut current = text.to_string();
    for kind in PiiKind::ALL {
        current = apply_detector(kind, &current, policy, &mut summary);
    }

    if !summary.is_empty() {
        tracing::debug!(
            mode = %policy.mode,
            total = summary.total(),
            kinds = ?summary.iter().collect::<Vec<_>>(),
            "redacted pii"
        );
    }

    RedactionOutcome::new(current, summary)
}

fn apply_detector(
    kind: PiiKind,
    text: &str,
    policy: &PiiPolicy,
    summary: &mut RedactionSummary,
) -> String {
    let mut count = 0usize;
    let replaced = patterns::regex_for(kind).replace_all(text, |caps: &Captures<'_>| {
        let matched = &caps[0];
        if kind == PiiKind::Card {
            return match card_span(matched) {
                Some(span) => {
                    count += 1;
                    format!(
                        "{}{}{}",
                        &matched[..span.start],
                        mask_or_placeholder(kind, &matched[span.clone()], policy),
                        &matched[span.end..]
                    )
                }
                None => matched.to_string(),
            };
        }
        if !should_redact(kind, caps, policy) {
            return matched.to_string();
        }
        count += 1;
        replacement(kind, caps, policy)
    });
    summary.add(kind, count);
    replaced.into_owned()
}

fn should_redact(kind: PiiKind, caps: &Captures<'_>, policy: &PiiPolicy) -> bool {
    if kind != PiiKind::Email {
        return true;
    }
    let domain = caps.get(1).map_or("", |m| m.as_str());
    !policy.is_domain_allowed(domain)
}

fn replacement(kind: PiiKind, caps: &Captures<'_>, policy: &PiiPolicy) -> String {
    match policy.mode {
        RedactionMode::Strict => kind.placeholder().to_string(),
        RedactionMode::Mask if kind == PiiKind::Email => {
            let domain = caps.get(1).map_or("", |m| m.as_str());
            format!("***@{domain}")
        }
        _ => mask_or_placeholder(kind, &caps[0], policy),
    }
}

fn mask_or_placeholder(kind: PiiKind, matched: &str, policy: &PiiPolicy) -> String {
    match policy.mode {
        RedactionMode::Strict => kind.placeholder().to_string(),
        RedactionMode::Mask => partial_mask(matched, policy.mask_keep, policy.mask_char),
        RedactionMode::None => matched.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_text_short_circuits() {
        let outcome = redact("", &PiiPolicy::strict());
        assert_eq!(outcome, RedactionOutcome::unchanged(""));
    }

    #[test]
    fn none_mode_is_identity() {
        let text = "SSN 123-45-6789, card 4111111111111111, jane@other.com";
        let (out, summary, had_pii) = redact(text, &PiiPolicy::none()).into_parts();
        assert_eq!(out, text);
        assert!(summary.is_empty());
        assert!(!had_pii);
    }

    #[test]
    fn strict_scenario() {
        let outcome = redact(
            "Contact John at 555-123-4567, SSN 123-45-6789.",
            &PiiPolicy::strict(),
        );
        assert_eq!(
            outcome.text,
            "Contact John at [REDACTED:PHONE], SSN [REDACTED:SSN]."
        );
        assert_eq!(
            outcome.summary.to_string_map(),
            std::collections::BTreeMap::from([("phone".to_string(), 1), ("ssn".to_string(), 1)])
        );
        assert!(outcome.had_pii);
    }

    #[test]
    fn mask_card_keeps_last_four() {
        let outcome = redact("card 4111111111111111 on file", &PiiPolicy::mask());
        assert_eq!(outcome.text, "card ************1111 on file");
        assert_eq!(outcome.summary.count(PiiKind::Card), 1);
    }

    #[test]
    fn card_with_trailing_cvv_keeps_cvv() {
        let outcome = redact("card 4111111111111111 123", &PiiPolicy::strict());
        assert_eq!(outcome.text, "card [REDACTED:CARD] 123");
        assert_eq!(outcome.summary.count(PiiKind::Card), 1);
    }

    #[test]
    fn luhn_failure_is_left_alone() {
        let text = "ref 4111111111111112 and 1234567812345678";
        let outcome = redact(text, &PiiPolicy::strict());
        assert_eq!(outcome.text, text);
        assert_eq!(outcome.summary.count(PiiKind::Card), 0);
        assert!(!outcome.had_pii);
    }

    #[test]
    fn mask_email_replaces_local_part() {
        let outcome = redact("mail jane.doe@other.com today", &PiiPolicy::mask());
        assert_eq!(outcome.text, "mail ***@other.com today");
        assert_eq!(outcome.summary.count(PiiKind::Email), 1);
    }

    #[test]
    fn allow_listed_email_is_not_counted() {
        let policy = PiiPolicy::strict().with_allowed_domains(["allowed.com"]);
        let outcome = redact("user@allowed.com and user@other.com", &policy);
        assert_eq!(outcome.text, "user@allowed.com and [REDACTED:EMAIL]");
        assert_eq!(outcome.summary.count(PiiKind::Email), 1);
    }

    #[test]
    fn custom_mask_settings_apply() {
        let policy = PiiPolicy::mask().with_mask(2, '#').unwrap();
        let outcome = redact("SSN 123-45-6789", &policy);
        assert_eq!(outcome.text, "SSN ###-##-##89");
    }
}
