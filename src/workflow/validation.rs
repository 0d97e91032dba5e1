use crate::error::{ClientError, ClientResult};

/// Minimum digit count of a full phone number (country code included)
pub const PHONE_MIN_DIGITS: usize = 12;

/// Strip formatting from a phone number and return it as `+<digits>`
pub fn normalize_phone(raw: &str) -> ClientResult<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < PHONE_MIN_DIGITS {
        return Err(ClientError::field("phone", "Enter the full phone number"));
    }
    Ok(format!("+{}", digits))
}

pub fn require_password(password: &str) -> ClientResult<()> {
    if password.is_empty() {
        return Err(ClientError::field("password", "Password is required"));
    }
    Ok(())
}

/// Trimmed value of a required text field
pub fn require_non_empty(field: &str, value: &str) -> ClientResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClientError::field(field, format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}
