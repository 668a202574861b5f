//! Partial masking.

/// Mask all but the last `keep` alphanumeric characters of `value`.
///
/// Separators (`-`, spaces, parentheses, dots) are left in place so the
/// masked value keeps its shape: `"123-45-6789"` becomes `"***-**-6789"`.
/// Values with `keep` or fewer alphanumerics are returned unchanged.
#[must_use]
pub fn partial_mask(value: &str, keep: usize, filler: char) -> String {
    let total = value.chars().filter(|c| c.is_alphanumeric()).count();
    let mut remaining = total.saturating_sub(keep);

    value
        .chars()
        .map(|c| {
            if remaining > 0 && c.is_alphanumeric() {
                remaining -= 1;
                filler
            } else {
                c
            }
        })
        .collect()
}
