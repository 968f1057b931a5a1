// src/db/messages.rs
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::models::Message;
use crate::errors::ServerError;

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: row.get(0)?,
        sender_id: row.get(1)?,
        recipient_id: row.get(2)?,
        content: row.get(3)?,
        sent_at: row.get(4)?,
        read_at: row.get(5)?,
    })
}

pub fn insert_message(
    conn: &Connection,
    sender_id: i64,
    recipient_id: i64,
    content: &str,
    now: i64,
) -> Result<i64, ServerError> {
    conn.execute(
        "insert into messages (sender_id, recipient_id, content, sent_at) values (?, ?, ?, ?)",
        params![sender_id, recipient_id, content, now],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_message(conn: &Connection, id: i64) -> Result<Option<Message>, ServerError> {
    Ok(conn
        .query_row(
            "select id, sender_id, recipient_id, content, sent_at, read_at from messages where id = ?",
            params![id],
            message_from_row,
        )
        .optional()?)
}

/// Both directions between two users, oldest first.
pub fn conversation(conn: &Connection, a: i64, b: i64) -> Result<Vec<Message>, ServerError> {
    let mut stmt = conn.prepare(
        r#"
        select id, sender_id, recipient_id, content, sent_at, read_at
        from messages
        where (sender_id = ?1 and recipient_id = ?2)
           or (sender_id = ?2 and recipient_id = ?1)
        order by sent_at, id
        "#,
    )?;
    let rows = stmt.query_map(params![a, b], message_from_row)?;

    let mut messages = Vec::new();
    for row in rows {
        messages.push(row?);
    }
    Ok(messages)
}

/// Only the recipient can mark a message read. Returns false when nothing matched.
pub fn mark_read(
    conn: &Connection,
    id: i64,
    recipient_id: i64,
    now: i64,
) -> Result<bool, ServerError> {
    let n = conn.execute(
        "update messages set read_at = coalesce(read_at, ?) where id = ? and recipient_id = ?",
        params![now, id, recipient_id],
    )?;
    Ok(n == 1)
}

pub fn unread_count(conn: &Connection, recipient_id: i64) -> Result<i64, ServerError> {
    Ok(conn.query_row(
        "select count(*) from messages where recipient_id = ? and read_at is null",
        params![recipient_id],
        |r| r.get(0),
    )?)
}
