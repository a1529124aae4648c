//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// International phone number regex (E.164 format)
static INTERNATIONAL_PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+[1-9]\d{7,14}$").unwrap()
});

/// Normalize a phone number by removing common formatting characters
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Convert a phone number to E.164 using `default_country_code` when the
/// number carries no country code.
///
/// A leading trunk `0` is dropped before the prefix is applied, so
/// `09876543210` with `+91` becomes `+919876543210`.
pub fn to_e164(phone: &str, default_country_code: &str) -> String {
    let normalized = normalize_phone_number(phone);
    if normalized.starts_with('+') {
        return normalized;
    }

    let local = normalized.strip_prefix('0').unwrap_or(&normalized);
    let prefix = normalize_phone_number(default_country_code);
    if prefix.starts_with('+') {
        format!("{}{}", prefix, local)
    } else {
        format!("+{}{}", prefix, local)
    }
}

/// Check if a phone number is valid (international E.164 format)
pub fn is_valid_international_phone(phone: &str) -> bool {
    let normalized = normalize_phone_number(phone);
    INTERNATIONAL_PHONE_REGEX.is_match(&normalized)
}

/// Mask a phone number for logging, keeping only the last 4 digits
/// (e.g. `+91******3210`)
pub fn mask_phone_number(phone: &str) -> String {
    let normalized = normalize_phone_number(phone);
    let digits = normalized.trim_start_matches('+');
    if digits.len() <= 4 {
        return "*".repeat(digits.len().max(4));
    }

    let visible = &digits[digits.len() - 4..];
    if normalized.starts_with('+') && digits.len() > 6 {
        // keep the country code readable for support staff
        let country = &digits[..2];
        format!("+{}{}{}", country, "*".repeat(digits.len() - 6), visible)
    } else {
        format!("{}{}", "*".repeat(digits.len() - 4), visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone_number() {
        assert_eq!(normalize_phone_number("98765-43210"), "9876543210");
        assert_eq!(normalize_phone_number("+91 98765 43210"), "+919876543210");
        assert_eq!(normalize_phone_number("(987) 654-3210"), "9876543210");
    }

    #[test]
    fn test_to_e164_applies_default_country_code() {
        assert_eq!(to_e164("9876543210", "+91"), "+919876543210");
        assert_eq!(to_e164("09876543210", "+91"), "+919876543210");
        assert_eq!(to_e164("9876543210", "91"), "+919876543210");
        assert_eq!(to_e164("+14155552671", "+91"), "+14155552671");
    }

    #[test]
    fn test_is_valid_international_phone() {
        assert!(is_valid_international_phone("+919876543210"));
        assert!(is_valid_international_phone("+14155552671"));
        assert!(!is_valid_international_phone("9876543210")); // Missing +
        assert!(!is_valid_international_phone("+0123456789")); // Invalid country code
        assert!(!is_valid_international_phone("+1234")); // Too short
    }

    #[test]
    fn test_mask_phone_number() {
        assert_eq!(mask_phone_number("+919876543210"), "+91******3210");
        assert_eq!(mask_phone_number("9876543210"), "******3210");
        assert_eq!(mask_phone_number("123"), "****");
    }
}
