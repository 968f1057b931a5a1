// src/auth/reset.rs
use rusqlite::{Connection, TransactionBehavior};

use crate::auth::password::hash_password;
use crate::auth::sessions::revoke_all_for_user;
use crate::auth::token::{generate_token_default, hash_token};
use crate::db::auth as db_auth;
use crate::db::users;
use crate::domain::validation::{check_password, normalize_email};
use crate::errors::ServerError;

#[derive(Debug, Clone)]
pub struct ResetConfig {
    /// TTL for reset links in seconds.
    pub ttl_secs: i64,
    /// Absolute URL the emailed link points at; the token is appended as `?token=`.
    pub reset_url: String,
}

#[derive(Debug, Clone)]
pub struct IssuedReset {
    pub email: String,
    pub first_name: String,
    pub user_id: i64,
    pub expires_at: i64,
    pub link: String,
}

pub struct PasswordResetService {
    cfg: ResetConfig,
}

impl PasswordResetService {
    pub fn new(cfg: ResetConfig) -> Self {
        Self { cfg }
    }

    fn build_link(&self, token: &str) -> String {
        format!("{}?token={}", self.cfg.reset_url, token)
    }

    /// `Ok(None)` for unknown emails, so callers can answer identically
    /// whether or not the account exists.
    pub fn request_reset(
        &self,
        conn: &Connection,
        email: &str,
        now: i64,
    ) -> Result<Option<IssuedReset>, ServerError> {
        let email = normalize_email(email)?;
        let Some(user) = users::find_user_by_email(conn, &email)? else {
            return Ok(None);
        };

        let token = generate_token_default();
        let expires_at = now + self.cfg.ttl_secs;
        db_auth::insert_password_reset(conn, user.id, &hash_token(&token), now, expires_at)?;

        Ok(Some(IssuedReset {
            email,
            first_name: user.first_name,
            user_id: user.id,
            link: self.build_link(&token),
            expires_at,
        }))
    }

    /// Single-use: consumes the token, sets the new password and signs out
    /// every existing session, all in one transaction.
    pub fn redeem(
        &self,
        conn: &mut Connection,
        token: &str,
        new_password: &str,
        now: i64,
    ) -> Result<i64, ServerError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ServerError::BadRequest("missing token".into()));
        }
        check_password(new_password)?;
        let hash = hash_password(new_password)?;

        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let Some(user_id) = db_auth::consume_password_reset(&tx, &hash_token(token), now)? else {
            return Err(ServerError::Unauthorized("invalid or expired link".into()));
        };
        users::set_password(&tx, user_id, &hash, false)?;
        revoke_all_for_user(&tx, user_id, None, now)?;
        tx.commit()?;

        Ok(user_id)
    }
}
