// src/db/reminders.rs
use chrono::NaiveDate;
use rusqlite::{params, Connection};

use crate::errors::ServerError;

/// Reserves the reminder for (tenant, due date, days before). Only the caller that
/// gets `true` may send it; everyone else sees the slot already taken.
pub fn claim(
    conn: &Connection,
    tenant_id: i64,
    due_date: NaiveDate,
    days_before: i64,
    now: i64,
) -> Result<bool, ServerError> {
    let n = conn.execute(
        r#"
        insert or ignore into reminder_log (tenant_id, due_date, days_before, sent_at)
        values (?, ?, ?, ?)
        "#,
        params![tenant_id, due_date, days_before, now],
    )?;
    Ok(n == 1)
}

/// Gives a claim back after a failed send so a later sweep retries it.
pub fn release(
    conn: &Connection,
    tenant_id: i64,
    due_date: NaiveDate,
    days_before: i64,
) -> Result<(), ServerError> {
    conn.execute(
        "delete from reminder_log where tenant_id = ? and due_date = ? and days_before = ?",
        params![tenant_id, due_date, days_before],
    )?;
    Ok(())
}
