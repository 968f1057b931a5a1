// src/db/requests.rs
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::images::{load_images, replace_images, ImageOwner};
use crate::domain::models::{MaintenanceRequest, RequestStatus};
use crate::errors::ServerError;

const REQUEST_SELECT: &str = r#"
    select
        r.id, r.tenant_id, trim(u.first_name || ' ' || u.last_name),
        r.title, r.description, r.status, r.created_at, r.updated_at
    from maintenance_requests r
    join users u on u.id = r.tenant_id
"#;

fn request_from_row(row: &Row<'_>) -> rusqlite::Result<MaintenanceRequest> {
    Ok(MaintenanceRequest {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        tenant_name: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        status: row.get(5)?,
        images: Vec::new(),
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

#[derive(Debug, Clone)]
pub struct RequestInput {
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
}

pub fn insert_request(
    conn: &mut Connection,
    tenant_id: i64,
    input: &RequestInput,
    now: i64,
) -> Result<i64, ServerError> {
    let tx = conn.transaction()?;
    tx.execute(
        r#"
        insert into maintenance_requests (tenant_id, title, description, status, created_at, updated_at)
        values (?1, ?2, ?3, ?4, ?5, ?5)
        "#,
        params![
            tenant_id,
            input.title,
            input.description,
            RequestStatus::Pending,
            now
        ],
    )?;
    let id = tx.last_insert_rowid();
    replace_images(&tx, ImageOwner::Request, id, &input.images)?;
    tx.commit()?;
    Ok(id)
}

pub fn find_request(conn: &Connection, id: i64) -> Result<Option<MaintenanceRequest>, ServerError> {
    let request = conn
        .query_row(
            &format!("{REQUEST_SELECT} where r.id = ?"),
            params![id],
            request_from_row,
        )
        .optional()?;

    match request {
        Some(mut r) => {
            r.images = load_images(conn, ImageOwner::Request, r.id)?;
            Ok(Some(r))
        }
        None => Ok(None),
    }
}

pub fn list_for_tenant(
    conn: &Connection,
    tenant_id: i64,
) -> Result<Vec<MaintenanceRequest>, ServerError> {
    let mut stmt = conn.prepare(&format!(
        "{REQUEST_SELECT} where r.tenant_id = ? order by r.created_at desc, r.id desc"
    ))?;
    let rows = stmt.query_map(params![tenant_id], request_from_row)?;
    collect_with_images(conn, rows)
}

/// Requests raised by any of the landlord's tenants, optionally by status.
pub fn list_for_landlord(
    conn: &Connection,
    landlord_id: i64,
    status: Option<RequestStatus>,
) -> Result<Vec<MaintenanceRequest>, ServerError> {
    let mut stmt = conn.prepare(&format!(
        r#"{REQUEST_SELECT}
        join tenants t on t.user_id = r.tenant_id
        where t.landlord_id = ?1 and (?2 is null or r.status = ?2)
        order by r.created_at desc, r.id desc"#
    ))?;
    let rows = stmt.query_map(params![landlord_id, status], request_from_row)?;
    collect_with_images(conn, rows)
}

fn collect_with_images<I>(conn: &Connection, rows: I) -> Result<Vec<MaintenanceRequest>, ServerError>
where
    I: Iterator<Item = rusqlite::Result<MaintenanceRequest>>,
{
    let mut requests = Vec::new();
    for row in rows {
        let mut r = row?;
        r.images = load_images(conn, ImageOwner::Request, r.id)?;
        requests.push(r);
    }
    Ok(requests)
}

pub fn update_request(
    conn: &mut Connection,
    id: i64,
    input: &RequestInput,
    now: i64,
) -> Result<(), ServerError> {
    let tx = conn.transaction()?;
    tx.execute(
        "update maintenance_requests set title = ?1, description = ?2, updated_at = ?3 where id = ?4",
        params![input.title, input.description, now, id],
    )?;
    replace_images(&tx, ImageOwner::Request, id, &input.images)?;
    tx.commit()?;
    Ok(())
}

pub fn set_status(
    conn: &Connection,
    id: i64,
    status: RequestStatus,
    now: i64,
) -> Result<(), ServerError> {
    conn.execute(
        "update maintenance_requests set status = ?, updated_at = ? where id = ?",
        params![status, now, id],
    )?;
    Ok(())
}

pub fn delete_request(conn: &Connection, id: i64) -> Result<(), ServerError> {
    conn.execute("delete from maintenance_requests where id = ?", params![id])?;
    Ok(())
}

pub fn count_for_landlord(
    conn: &Connection,
    landlord_id: i64,
    status: RequestStatus,
) -> Result<i64, ServerError> {
    Ok(conn.query_row(
        r#"
        select count(*)
        from maintenance_requests r
        join tenants t on t.user_id = r.tenant_id
        where t.landlord_id = ? and r.status = ?
        "#,
        params![landlord_id, status],
        |r| r.get(0),
    )?)
}
