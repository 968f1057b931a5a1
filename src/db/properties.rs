// src/db/properties.rs
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::images::{load_images, replace_images, ImageOwner};
use crate::domain::models::Property;
use crate::domain::money::Pence;
use crate::errors::ServerError;

#[derive(Debug, Clone)]
pub struct PropertyInput {
    pub name: String,
    pub location: String,
    pub price: Pence,
    pub description: String,
    pub images: Vec<String>,
}

fn property_from_row(row: &Row<'_>) -> rusqlite::Result<Property> {
    Ok(Property {
        id: row.get(0)?,
        landlord_id: row.get(1)?,
        name: row.get(2)?,
        location: row.get(3)?,
        price: row.get(4)?,
        description: row.get(5)?,
        images: Vec::new(),
        created_at: row.get(6)?,
    })
}

const PROPERTY_COLUMNS: &str =
    "id, landlord_id, name, location, price_pence, description, created_at";

pub fn insert_property(
    conn: &mut Connection,
    landlord_id: i64,
    input: &PropertyInput,
    now: i64,
) -> Result<i64, ServerError> {
    let tx = conn.transaction()?;
    tx.execute(
        r#"
        insert into properties (landlord_id, name, location, price_pence, description, created_at)
        values (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            landlord_id,
            input.name,
            input.location,
            input.price,
            input.description,
            now
        ],
    )?;
    let id = tx.last_insert_rowid();
    replace_images(&tx, ImageOwner::Property, id, &input.images)?;
    tx.commit()?;
    Ok(id)
}

pub fn find_property(conn: &Connection, id: i64) -> Result<Option<Property>, ServerError> {
    let property = conn
        .query_row(
            &format!("select {PROPERTY_COLUMNS} from properties where id = ?"),
            params![id],
            property_from_row,
        )
        .optional()?;

    match property {
        Some(mut p) => {
            p.images = load_images(conn, ImageOwner::Property, p.id)?;
            Ok(Some(p))
        }
        None => Ok(None),
    }
}

/// Ownership check folded into the lookup: someone else's property reads as missing.
pub fn find_owned_property(
    conn: &Connection,
    landlord_id: i64,
    id: i64,
) -> Result<Property, ServerError> {
    match find_property(conn, id)? {
        Some(p) if p.landlord_id == landlord_id => Ok(p),
        _ => Err(ServerError::NotFound),
    }
}

pub fn list_properties(conn: &Connection, landlord_id: i64) -> Result<Vec<Property>, ServerError> {
    let mut stmt = conn.prepare(&format!(
        "select {PROPERTY_COLUMNS} from properties where landlord_id = ? order by created_at desc, id desc"
    ))?;
    let rows = stmt.query_map(params![landlord_id], property_from_row)?;

    let mut properties = Vec::new();
    for row in rows {
        let mut p = row?;
        p.images = load_images(conn, ImageOwner::Property, p.id)?;
        properties.push(p);
    }
    Ok(properties)
}

pub fn update_property(
    conn: &mut Connection,
    id: i64,
    input: &PropertyInput,
) -> Result<(), ServerError> {
    let tx = conn.transaction()?;
    tx.execute(
        r#"
        update properties
        set name = ?1, location = ?2, price_pence = ?3, description = ?4
        where id = ?5
        "#,
        params![input.name, input.location, input.price, input.description, id],
    )?;
    replace_images(&tx, ImageOwner::Property, id, &input.images)?;
    tx.commit()?;
    Ok(())
}

/// Tenants keep their rows; their property reference is cleared.
pub fn delete_property(conn: &Connection, id: i64) -> Result<(), ServerError> {
    conn.execute("delete from properties where id = ?", params![id])?;
    Ok(())
}

pub fn count_properties(conn: &Connection, landlord_id: i64) -> Result<i64, ServerError> {
    Ok(conn.query_row(
        "select count(*) from properties where landlord_id = ?",
        params![landlord_id],
        |r| r.get(0),
    )?)
}
