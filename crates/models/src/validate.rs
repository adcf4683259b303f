//! Field validation shared by the entity modules.
//!
//! Every helper returns the normalized value so callers can store it directly.

use crate::errors::ModelError;

/// Trimmed, non-empty text no longer than `max_len` characters.
pub fn required_text(field: &str, value: &str, max_len: usize) -> Result<String, ModelError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ModelError::validation(format!("{field} required")));
    }
    if v.chars().count() > max_len {
        return Err(ModelError::validation(format!("{field} longer than {max_len} characters")));
    }
    Ok(v.to_string())
}

/// Optional text: blank collapses to `None`.
pub fn optional_text(field: &str, value: Option<&str>, max_len: usize) -> Result<Option<String>, ModelError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => required_text(field, v, max_len).map(Some),
    }
}

/// Phone numbers: 10 to 15 digits, optional leading `+`; spaces and dashes are dropped.
pub fn phone(value: &str) -> Result<String, ModelError> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
    let digits = compact.strip_prefix('+').unwrap_or(&compact);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ModelError::validation("phone must contain digits only"));
    }
    if !(10..=15).contains(&digits.len()) {
        return Err(ModelError::validation("phone must have 10 to 15 digits"));
    }
    Ok(compact)
}

pub fn email(value: &str) -> Result<String, ModelError> {
    let v = value.trim().to_lowercase();
    match v.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => Ok(v),
        _ => Err(ModelError::validation("invalid email")),
    }
}

/// Registration plates: uppercased, inner spaces removed, ASCII alphanumerics and `-` only.
pub fn vehicle_number(value: &str) -> Result<String, ModelError> {
    let v: String = value.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_uppercase();
    if v.is_empty() {
        return Err(ModelError::validation("vehicle_number required"));
    }
    if v.len() > 32 || !v.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ModelError::validation("vehicle_number has invalid characters"));
    }
    Ok(v)
}

pub fn positive(field: &str, value: i64) -> Result<i64, ModelError> {
    if value <= 0 {
        return Err(ModelError::validation(format!("{field} must be positive")));
    }
    Ok(value)
}

pub fn non_negative(field: &str, value: i64) -> Result<i64, ModelError> {
    if value < 0 {
        return Err(ModelError::validation(format!("{field} must not be negative")));
    }
    Ok(value)
}
