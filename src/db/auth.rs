// src/db/auth.rs
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::ServerError;

#[derive(Debug, Clone)]
pub struct ResetRow {
    pub id: i64,
    pub user_id: i64,
    pub expires_at: i64,
    pub used_at: Option<i64>,
}

/// Insert a reset row (token_hash should be SHA-256 bytes).
pub fn insert_password_reset(
    conn: &Connection,
    user_id: i64,
    token_hash: &[u8],
    created_at: i64,
    expires_at: i64,
) -> Result<(), ServerError> {
    conn.execute(
        "insert into password_resets (user_id, token_hash, created_at, expires_at) values (?, ?, ?, ?)",
        params![user_id, token_hash, created_at, expires_at],
    )
    .map_err(|e| ServerError::DbError(format!("insert password reset failed: {e}")))?;
    Ok(())
}

/// Consume a reset token hash:
/// - must exist
/// - must be unexpired (expires_at > now)
/// - must be unused (used_at is null)
/// If valid, sets used_at=now and returns Some(user_id). Otherwise returns Ok(None).
///
/// Run it inside the caller's transaction so the token is only spent when the
/// rest of the redemption commits.
pub fn consume_password_reset(
    conn: &Connection,
    token_hash: &[u8],
    now: i64,
) -> Result<Option<i64>, ServerError> {
    let row: Option<ResetRow> = conn
        .query_row(
            "select id, user_id, expires_at, used_at
             from password_resets
             where token_hash = ?",
            params![token_hash],
            |r| {
                Ok(ResetRow {
                    id: r.get(0)?,
                    user_id: r.get(1)?,
                    expires_at: r.get(2)?,
                    used_at: r.get(3)?,
                })
            },
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("select password reset failed: {e}")))?;

    let Some(reset) = row else {
        return Ok(None);
    };

    if reset.used_at.is_some() || reset.expires_at <= now {
        return Ok(None);
    }

    // Guard used_at IS NULL so only one consumer wins.
    let updated = conn
        .execute(
            "update password_resets set used_at = ? where id = ? and used_at is null",
            params![now, reset.id],
        )
        .map_err(|e| ServerError::DbError(format!("mark reset used failed: {e}")))?;

    Ok((updated == 1).then_some(reset.user_id))
}
