// src/db/tenants.rs
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::dates::parse_rent_date;
use crate::domain::models::Tenant;
use crate::domain::money::Pence;
use crate::errors::ServerError;

const TENANT_SELECT: &str = r#"
    select
        t.user_id, t.landlord_id, t.property_id, p.name,
        t.rent_pence, t.rent_start_date, t.next_rent_date,
        u.first_name, u.last_name, u.email, u.phone, t.created_at
    from tenants t
    join users u on u.id = t.user_id
    left join properties p on p.id = t.property_id
"#;

/// Date columns are text. Rows written by older clients may hold other formats or
/// junk; anything unparsable reads as no date.
fn stored_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let raw: Option<String> = row.get(idx)?;
    Ok(raw.as_deref().and_then(parse_rent_date))
}

fn tenant_from_row(row: &Row<'_>) -> rusqlite::Result<Tenant> {
    Ok(Tenant {
        user_id: row.get(0)?,
        landlord_id: row.get(1)?,
        property_id: row.get(2)?,
        property_name: row.get(3)?,
        rent: row.get(4)?,
        rent_start_date: stored_date(row, 5)?,
        next_rent_date: stored_date(row, 6)?,
        first_name: row.get(7)?,
        last_name: row.get(8)?,
        email: row.get(9)?,
        phone: row.get(10)?,
        created_at: row.get(11)?,
    })
}

#[derive(Debug, Clone)]
pub struct TenantTerms {
    pub property_id: Option<i64>,
    pub rent: Pence,
    pub rent_start_date: Option<NaiveDate>,
    pub next_rent_date: Option<NaiveDate>,
}

pub fn insert_tenant(
    conn: &Connection,
    user_id: i64,
    landlord_id: i64,
    terms: &TenantTerms,
    now: i64,
) -> Result<(), ServerError> {
    conn.execute(
        r#"
        insert into tenants (user_id, landlord_id, property_id, rent_pence, rent_start_date, next_rent_date, created_at)
        values (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
            user_id,
            landlord_id,
            terms.property_id,
            terms.rent,
            terms.rent_start_date,
            terms.next_rent_date,
            now
        ],
    )?;
    Ok(())
}

pub fn find_tenant(conn: &Connection, user_id: i64) -> Result<Option<Tenant>, ServerError> {
    Ok(conn
        .query_row(
            &format!("{TENANT_SELECT} where t.user_id = ?"),
            params![user_id],
            tenant_from_row,
        )
        .optional()?)
}

/// Someone else's tenant reads as missing.
pub fn find_owned_tenant(
    conn: &Connection,
    landlord_id: i64,
    user_id: i64,
) -> Result<Tenant, ServerError> {
    match find_tenant(conn, user_id)? {
        Some(t) if t.landlord_id == landlord_id => Ok(t),
        _ => Err(ServerError::NotFound),
    }
}

pub fn list_tenants(conn: &Connection, landlord_id: i64) -> Result<Vec<Tenant>, ServerError> {
    query_tenants(
        conn,
        &format!("{TENANT_SELECT} where t.landlord_id = ? order by u.last_name, u.first_name"),
        Some(landlord_id),
    )
}

/// Every tenant in the system, for the reminder sweep.
pub fn list_all_tenants(conn: &Connection) -> Result<Vec<Tenant>, ServerError> {
    query_tenants(conn, &format!("{TENANT_SELECT} order by t.user_id"), None)
}

fn query_tenants(
    conn: &Connection,
    sql: &str,
    landlord_id: Option<i64>,
) -> Result<Vec<Tenant>, ServerError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = match landlord_id {
        Some(id) => stmt.query_map(params![id], tenant_from_row)?,
        None => stmt.query_map([], tenant_from_row)?,
    };

    let mut tenants = Vec::new();
    for row in rows {
        tenants.push(row?);
    }
    Ok(tenants)
}

pub fn update_terms(conn: &Connection, user_id: i64, terms: &TenantTerms) -> Result<(), ServerError> {
    conn.execute(
        r#"
        update tenants
        set property_id = ?1, rent_pence = ?2, rent_start_date = ?3, next_rent_date = ?4
        where user_id = ?5
        "#,
        params![
            terms.property_id,
            terms.rent,
            terms.rent_start_date,
            terms.next_rent_date,
            user_id
        ],
    )?;
    Ok(())
}

pub fn set_next_rent_date(
    conn: &Connection,
    user_id: i64,
    next: NaiveDate,
) -> Result<(), ServerError> {
    conn.execute(
        "update tenants set next_rent_date = ? where user_id = ?",
        params![next, user_id],
    )?;
    Ok(())
}
