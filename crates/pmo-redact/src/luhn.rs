//! Luhn checksum for card-number candidates.

/// Validate a digit run with the Luhn (mod 10) checksum.
///
/// Spaces and dashes are ignored as group separators. Any other non-digit
/// character, or fewer than two digits, fails the check.
#[must_use]
pub fn luhn_valid(candidate: &str) -> bool {
    let mut sum = 0u32;
    let mut digits = 0usize;

    for c in candidate.chars().rev() {
        if c == ' ' || c == '-' {
            continue;
        }
        let Some(mut d) = c.to_digit(10) else {
            return false;
        };
        if digits % 2 == 1 {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
        digits += 1;
    }

    digits >= 2 && sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("4111111111111111")]
    #[case("4111 1111 1111 1111")]
    #[case("4111-1111-1111-1111")]
    #[case("5500005555555559")]
    #[case("378282246310005")]
    #[case("79927398713")]
    fn valid_numbers(#[case] number: &str) {
        assert!(luhn_valid(number), "{number} should pass");
    }

    #[rstest]
    #[case("4111111111111112")]
    #[case("1234567812345678")]
    #[case("79927398710")]
    #[case("4111x111111111111")]
    #[case("0")]
    #[case("")]
    fn invalid_numbers(#[case] number: &str) {
        assert!(!luhn_valid(number), "{number} should fail");
    }
}
