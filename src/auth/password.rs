//! Temporary password generation and Argon2id hashing.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;
use rand::{Rng, RngCore};

use crate::domain::validation::MIN_PASSWORD_LEN;
use crate::errors::ServerError;

/// Stem used when a first name gives too little to build on.
const FALLBACK_STEM: &str = "tenant";

/// First name, lower-cased and stripped to ASCII alphanumerics, followed by
/// a four digit number. Always at least [`MIN_PASSWORD_LEN`] characters.
pub fn generate_temp_password<R: Rng>(rng: &mut R, first_name: &str) -> String {
    let mut stem: String = first_name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if stem.len() + 4 < MIN_PASSWORD_LEN {
        stem = FALLBACK_STEM.to_string();
    }

    let digits: u32 = rng.gen_range(1000..=9999);
    format!("{stem}{digits}")
}

pub fn hash_password(password: &str) -> Result<String, ServerError> {
    let mut salt_bytes = [0u8; 16];
    OsRng.fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| ServerError::PasswordHashError(format!("salt encoding failed: {e}")))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ServerError::PasswordHashError(format!("password hashing failed: {e}")))
}

/// `Ok(false)` on mismatch, `Err` only when the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ServerError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| ServerError::PasswordHashError(format!("invalid stored hash: {e}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(ServerError::PasswordHashError(format!("verify error: {e}"))),
    }
}
