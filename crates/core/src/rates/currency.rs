use crate::constants::MAX_CURRENCY_CODE_LEN;
use crate::errors::{Result, ValidationError};

/// Case-normalizes a currency code.
///
/// Returns `None` when the trimmed code is empty, too long, or contains
/// anything other than ASCII letters and digits.
pub fn normalize_currency_code(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.len() > MAX_CURRENCY_CODE_LEN
        || !trimmed.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(trimmed.to_ascii_uppercase())
}

/// Validates a currency code supplied by a client.
pub fn parse_currency_code(raw: Option<&str>) -> Result<String> {
    let raw = match raw {
        Some(value) if !value.trim().is_empty() => value,
        _ => return Err(ValidationError::MissingField("currency".to_string()).into()),
    };
    normalize_currency_code(raw)
        .ok_or_else(|| ValidationError::InvalidCurrencyCode(raw.to_string()).into())
}
