// src/db/payments.rs
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::models::{Payment, PaymentStatus};
use crate::domain::money::Pence;
use crate::errors::ServerError;

const PAYMENT_SELECT: &str = r#"
    select
        pm.id, pm.tenant_id, trim(u.first_name || ' ' || u.last_name), pm.landlord_id,
        pm.property_id, pm.amount_pence, pm.paid_at, pm.status, pm.receipt_url
    from payments pm
    join users u on u.id = pm.tenant_id
"#;

fn payment_from_row(row: &Row<'_>) -> rusqlite::Result<Payment> {
    Ok(Payment {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        tenant_name: row.get(2)?,
        landlord_id: row.get(3)?,
        property_id: row.get(4)?,
        amount: row.get(5)?,
        paid_at: row.get(6)?,
        status: row.get(7)?,
        receipt_url: row.get(8)?,
    })
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub tenant_id: i64,
    pub landlord_id: i64,
    pub property_id: Option<i64>,
    pub amount: Pence,
    pub paid_at: i64,
    pub status: PaymentStatus,
}

pub fn insert_payment(conn: &Connection, p: &NewPayment) -> Result<i64, ServerError> {
    conn.execute(
        r#"
        insert into payments (tenant_id, landlord_id, property_id, amount_pence, paid_at, status)
        values (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            p.tenant_id,
            p.landlord_id,
            p.property_id,
            p.amount,
            p.paid_at,
            p.status
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_payment(conn: &Connection, id: i64) -> Result<Option<Payment>, ServerError> {
    Ok(conn
        .query_row(
            &format!("{PAYMENT_SELECT} where pm.id = ?"),
            params![id],
            payment_from_row,
        )
        .optional()?)
}

pub fn list_for_tenant(conn: &Connection, tenant_id: i64) -> Result<Vec<Payment>, ServerError> {
    list(
        conn,
        &format!("{PAYMENT_SELECT} where pm.tenant_id = ? order by pm.paid_at desc, pm.id desc"),
        tenant_id,
    )
}

pub fn list_for_landlord(conn: &Connection, landlord_id: i64) -> Result<Vec<Payment>, ServerError> {
    list(
        conn,
        &format!("{PAYMENT_SELECT} where pm.landlord_id = ? order by pm.paid_at desc, pm.id desc"),
        landlord_id,
    )
}

fn list(conn: &Connection, sql: &str, id: i64) -> Result<Vec<Payment>, ServerError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params![id], payment_from_row)?;

    let mut payments = Vec::new();
    for row in rows {
        payments.push(row?);
    }
    Ok(payments)
}

pub fn set_receipt(
    conn: &Connection,
    id: i64,
    receipt_path: &str,
    receipt_url: &str,
) -> Result<(), ServerError> {
    conn.execute(
        "update payments set receipt_path = ?, receipt_url = ? where id = ?",
        params![receipt_path, receipt_url, id],
    )?;
    Ok(())
}

/// Sum of Paid payments for a landlord with `from <= paid_at < to`.
pub fn collected_between(
    conn: &Connection,
    landlord_id: i64,
    from: i64,
    to: i64,
) -> Result<Pence, ServerError> {
    Ok(conn.query_row(
        r#"
        select coalesce(sum(amount_pence), 0)
        from payments
        where landlord_id = ? and status = 'Paid' and paid_at >= ? and paid_at < ?
        "#,
        params![landlord_id, from, to],
        |r| r.get(0),
    )?)
}
