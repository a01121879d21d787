//! Phone number normalization and formatting
//!
//! Numbers are stored normalized so the unique-phone constraint catches
//! `8 999 111-22-33` and `+7(999)1112233` as the same client.

/// Normalize a phone number: keep digits and a leading `+`, map a leading
/// `7`/`8` to the `+7` country prefix.
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect();

    if let Some(rest) = cleaned.strip_prefix('7').or_else(|| cleaned.strip_prefix('8')) {
        return format!("+7{rest}");
    }
    cleaned
}

/// Pretty-print a normalized `+7` number as `+7 (999) 111-22-33`;
/// anything else is returned normalized but unformatted.
#[must_use]
pub fn format_phone(raw: &str) -> String {
    let normalized = normalize_phone(raw);
    if normalized.len() == 12 && normalized.starts_with("+7") {
        format!(
            "+7 ({}) {}-{}-{}",
            &normalized[2..5],
            &normalized[5..8],
            &normalized[8..10],
            &normalized[10..]
        )
    } else {
        normalized
    }
}
