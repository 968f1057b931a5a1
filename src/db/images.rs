// src/db/images.rs
use rusqlite::{params, Connection};

use crate::errors::ServerError;

/// Ordered image lists hang off properties and maintenance requests.
#[derive(Debug, Clone, Copy)]
pub enum ImageOwner {
    Property,
    Request,
}

impl ImageOwner {
    fn table(self) -> &'static str {
        match self {
            ImageOwner::Property => "property_images",
            ImageOwner::Request => "request_images",
        }
    }

    fn key(self) -> &'static str {
        match self {
            ImageOwner::Property => "property_id",
            ImageOwner::Request => "request_id",
        }
    }
}

pub fn load_images(conn: &Connection, owner: ImageOwner, id: i64) -> Result<Vec<String>, ServerError> {
    let sql = format!(
        "select path from {} where {} = ? order by position",
        owner.table(),
        owner.key()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![id], |r| r.get(0))?;

    let mut paths = Vec::new();
    for row in rows {
        paths.push(row?);
    }
    Ok(paths)
}

/// Replace the whole list; call inside the owner's write transaction.
pub fn replace_images(
    conn: &Connection,
    owner: ImageOwner,
    id: i64,
    paths: &[String],
) -> Result<(), ServerError> {
    conn.execute(
        &format!("delete from {} where {} = ?", owner.table(), owner.key()),
        params![id],
    )?;

    let mut stmt = conn.prepare(&format!(
        "insert into {} ({}, path, position) values (?, ?, ?)",
        owner.table(),
        owner.key()
    ))?;
    for (position, path) in paths.iter().enumerate() {
        stmt.execute(params![id, path, position as i64])?;
    }
    Ok(())
}
