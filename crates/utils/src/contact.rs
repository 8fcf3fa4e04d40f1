//! Normalization helpers for contact fields, used by the duplicate checks.

/// Lowercase and trim an email address for comparison.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Strip every non-digit from a phone number, keeping a leading `+`.
pub fn normalize_phone(phone: &str) -> String {
    let trimmed = phone.trim();
    let mut out = String::with_capacity(trimmed.len());
    for (i, c) in trimmed.chars().enumerate() {
        if c.is_ascii_digit() || (i == 0 && c == '+') {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_case_and_space_insensitive() {
        assert_eq!(normalize_email("  Jane@Example.COM "), "jane@example.com");
    }

    #[test]
    fn phone_keeps_digits_and_leading_plus() {
        assert_eq!(normalize_phone("+237 6 77-88-99 00"), "+237677889900");
        assert_eq!(normalize_phone("677 88 99 00"), "677889900");
    }
}
