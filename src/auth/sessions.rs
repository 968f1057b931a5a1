// src/auth/sessions.rs
use rusqlite::{params, Connection, OptionalExtension};

use crate::auth::token::{generate_token_default, hash_token};
use crate::domain::models::Role;
use crate::errors::ServerError;

/// The signed-in caller, resolved from the bearer token on every request
/// and handed to handlers explicitly.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub role: Role,
    pub email: String,
}

impl Session {
    pub fn require_landlord(&self) -> Result<(), ServerError> {
        match self.role {
            Role::Landlord => Ok(()),
            Role::Tenant => Err(ServerError::Forbidden("landlord account required".into())),
        }
    }

    pub fn require_tenant(&self) -> Result<(), ServerError> {
        match self.role {
            Role::Tenant => Ok(()),
            Role::Landlord => Err(ServerError::Forbidden("tenant account required".into())),
        }
    }
}

/// Returns the raw token; only its hash is stored.
pub fn create_session(
    conn: &Connection,
    user_id: i64,
    now: i64,
    ttl_secs: i64,
) -> Result<String, ServerError> {
    let raw_token = generate_token_default();
    let hash = hash_token(&raw_token);

    conn.execute(
        r#"
        insert into sessions (user_id, token_hash, created_at, expires_at)
        values (?, ?, ?, ?)
        "#,
        params![user_id, hash.as_slice(), now, now + ttl_secs],
    )
    .map_err(|e| ServerError::DbError(format!("create session failed: {e}")))?;

    Ok(raw_token)
}

pub fn load_session(
    conn: &Connection,
    raw_token: &str,
    now: i64,
) -> Result<Option<Session>, ServerError> {
    let hash = hash_token(raw_token);

    conn.query_row(
        r#"
        select u.id, u.role, u.email
        from sessions s
        join users u on u.id = s.user_id
        where s.token_hash = ?
          and s.expires_at > ?
          and s.revoked_at is null
        "#,
        params![hash.as_slice(), now],
        |row| {
            Ok(Session {
                user_id: row.get(0)?,
                role: row.get(1)?,
                email: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("session lookup failed: {e}")))
}

pub fn revoke_session(conn: &Connection, raw_token: &str, now: i64) -> Result<(), ServerError> {
    let hash = hash_token(raw_token);
    conn.execute(
        "update sessions set revoked_at = ? where token_hash = ? and revoked_at is null",
        params![now, hash.as_slice()],
    )
    .map_err(|e| ServerError::DbError(format!("revoke session failed: {e}")))?;
    Ok(())
}

/// Used after a password change/reset: every other device signs in again.
pub fn revoke_all_for_user(
    conn: &Connection,
    user_id: i64,
    keep_token: Option<&str>,
    now: i64,
) -> Result<(), ServerError> {
    let keep = keep_token.map(hash_token);
    conn.execute(
        r#"
        update sessions set revoked_at = ?1
        where user_id = ?2
          and revoked_at is null
          and (?3 is null or token_hash != ?3)
        "#,
        params![now, user_id, keep.as_ref().map(|h| h.as_slice())],
    )
    .map_err(|e| ServerError::DbError(format!("revoke sessions failed: {e}")))?;
    Ok(())
}
