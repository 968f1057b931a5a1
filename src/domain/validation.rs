// src/domain/validation.rs
use crate::errors::ServerError;

/// Minimum password length accepted by the credential store.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Trim + lowercase, minimal sanity check.
pub fn normalize_email(email: &str) -> Result<String, ServerError> {
    let e = email.trim().to_lowercase();
    let valid = match e.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains('@')
                && !e.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(ServerError::BadRequest("invalid email".into()));
    }
    Ok(e)
}

/// Trimmed value, or BadRequest naming the field.
pub fn required(field: &str, value: &str) -> Result<String, ServerError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ServerError::BadRequest(format!("{field} is required")));
    }
    Ok(v.to_string())
}

pub fn check_password(password: &str) -> Result<(), ServerError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ServerError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Digits, spaces, dashes, parentheses and an optional leading '+'.
pub fn check_phone(phone: &str) -> Result<(), ServerError> {
    let p = phone.trim();
    if p.is_empty() {
        return Ok(());
    }
    let body = p.strip_prefix('+').unwrap_or(p);
    let digits = body.chars().filter(char::is_ascii_digit).count();
    let allowed = body
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')'));
    if !allowed || !(7..=15).contains(&digits) {
        return Err(ServerError::BadRequest("invalid phone number".into()));
    }
    Ok(())
}

/// Shape checks for the card form; no card is ever charged.
pub fn check_card(number: &str, expiry: &str, cvv: &str) -> Result<(), ServerError> {
    let number: String = number.chars().filter(|c| !c.is_whitespace()).collect();
    let number_ok = number.len() == 16 && number.chars().all(|c| c.is_ascii_digit());
    let expiry_ok = match expiry.trim().split_once('/') {
        Some((mm, yy)) => {
            mm.len() == 2
                && yy.len() == 2
                && yy.chars().all(|c| c.is_ascii_digit())
                && matches!(mm.parse::<u32>(), Ok(1..=12))
        }
        None => false,
    };
    let cvv_ok = cvv.trim().len() == 3 && cvv.trim().chars().all(|c| c.is_ascii_digit());

    if !(number_ok && expiry_ok && cvv_ok) {
        return Err(ServerError::BadRequest("invalid card details".into()));
    }
    Ok(())
}
