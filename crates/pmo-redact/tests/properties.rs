//! Property tests for redaction invariants.

use pmo_redact::{PiiKind, PiiPolicy, luhn_valid, redact};
use proptest::prelude::*;

/// Append the Luhn check digit to `body`.
fn with_check_digit(body: &str) -> String {
    let sum: u32 = body
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, byte)| {
            let digit = u32::from(byte - b'0');
            if i % 2 == 0 {
                let doubled = digit * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                digit
            }
        })
        .sum();
    format!("{body}{}", (10 - sum % 10) % 10)
}

fn grouped(card: &str, sep: &str) -> String {
    card.as_bytes()
        .chunks(4)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join(sep)
}

proptest! {
    #[test]
    fn none_mode_returns_input_unchanged(text in any::<String>()) {
        let outcome = redact(&text, &PiiPolicy::none());
        prop_assert_eq!(&outcome.text, &text);
        prop_assert!(outcome.summary.is_empty());
        prop_assert!(!outcome.had_pii);
    }

    #[test]
    fn had_pii_iff_summary_non_empty(text in "[ -~]{0,200}") {
        for policy in [PiiPolicy::mask(), PiiPolicy::strict()] {
            let outcome = redact(&text, &policy);
            prop_assert_eq!(outcome.had_pii, !outcome.summary.is_empty());
        }
    }

    #[test]
    fn every_ssn_is_counted(ssns in prop::collection::vec("[0-9]{3}-[0-9]{2}-[0-9]{4}", 1..6)) {
        let text = ssns
            .iter()
            .map(|ssn| format!("employee ssn {ssn};"))
            .collect::<Vec<_>>()
            .join(" ");
        let outcome = redact(&text, &PiiPolicy::strict());
        prop_assert_eq!(outcome.summary.count(PiiKind::Ssn), ssns.len());
        for ssn in &ssns {
            prop_assert!(!outcome.text.contains(ssn.as_str()));
        }
    }

    #[test]
    fn luhn_failing_digit_runs_are_untouched(digits in "[1-9][0-9]{12,18}") {
        prop_assume!(!luhn_valid(&digits));
        let text = format!("invoice {digits} paid");
        let outcome = redact(&text, &PiiPolicy::mask());
        prop_assert_eq!(&outcome.text, &text);
        prop_assert_eq!(outcome.summary.count(PiiKind::Card), 0);
    }

    #[test]
    fn strict_reapplication_is_a_no_op(text in "[ -~]{0,200}") {
        let once = redact(&text, &PiiPolicy::strict());
        let twice = redact(&once.text, &PiiPolicy::strict());
        prop_assert_eq!(&twice.text, &once.text);
        prop_assert!(twice.summary.is_empty());
    }

    #[test]
    fn card_beside_other_digits_is_redacted(
        body in "[0-9]{15}",
        extra in "[0-9]{1,3}",
        sep in prop::sample::select(vec![" ", "-"]),
        group_card in any::<bool>(),
        extra_first in any::<bool>(),
    ) {
        let card = with_check_digit(&body);
        prop_assert!(luhn_valid(&card));
        let card = if group_card { grouped(&card, sep) } else { card };
        let number = if extra_first {
            format!("{extra}{sep}{card}")
        } else {
            format!("{card}{sep}{extra}")
        };
        let text = format!("card {number} on file");

        let outcome = redact(&text, &PiiPolicy::mask());
        prop_assert_eq!(outcome.summary.count(PiiKind::Card), 1);
        prop_assert!(!outcome.text.contains(card.as_str()));
    }
}
