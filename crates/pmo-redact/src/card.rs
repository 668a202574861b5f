//! Locating the card number inside a card-pattern match.
//!
//! The card pattern is greedy across single space/dash separators, so a card
//! followed by an expiry or CVV (`4111 1111 1111 1111 12/27`) matches as one
//! longer digit run that fails the Luhn check. When the whole match fails,
//! spans made of whole digit groups are tried instead, longest first and then
//! leftmost. A bare run without separators has no inner spans, so an
//! unseparated Luhn-failing run is never redacted.

use std::ops::Range;

use crate::luhn::luhn_valid;

/// Fewest digits a card number can have.
pub const MIN_CARD_DIGITS: usize = 13;

/// Most digits a card number can have.
pub const MAX_CARD_DIGITS: usize = 19;

/// Byte range of the Luhn-valid card number within `candidate`, if any.
#[must_use]
pub fn card_span(candidate: &str) -> Option<Range<usize>> {
    if luhn_valid(candidate) {
        return Some(0..candidate.len());
    }

    let groups = digit_groups(candidate);
    let last = groups.len().saturating_sub(1);
    let mut best: Option<(usize, Range<usize>)> = None;

    for start in 0..groups.len() {
        let mut digits = 0;
        for end in start..groups.len() {
            digits += groups[end].len();
            if digits > MAX_CARD_DIGITS {
                break;
            }
            if digits < MIN_CARD_DIGITS || (start == 0 && end == last) {
                continue;
            }
            if best.as_ref().is_some_and(|(found, _)| *found >= digits) {
                continue;
            }
            let span = groups[start].start..groups[end].end;
            if luhn_valid(&candidate[span.clone()]) {
                best = Some((digits, span));
            }
        }
    }

    best.map(|(_, span)| span)
}

/// Byte ranges of the ASCII digit runs in `candidate`.
fn digit_groups(candidate: &str) -> Vec<Range<usize>> {
    let mut groups = Vec::new();
    let mut open: Option<usize> = None;

    for (i, byte) in candidate.bytes().enumerate() {
        if byte.is_ascii_digit() {
            open.get_or_insert(i);
        } else if let Some(start) = open.take() {
            groups.push(start..i);
        }
    }
    if let Some(start) = open {
        groups.push(start..candidate.len());
    }
    groups
}
