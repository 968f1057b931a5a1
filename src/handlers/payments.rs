// src/handlers/payments.rs
use astra::Request;
use rusqlite::TransactionBehavior;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::app::{now_unix, today, App};
use crate::auth::Session;
use crate::db::payments::{self, NewPayment};
use crate::db::tenants;
use crate::domain::models::{Payment, PaymentStatus, Role};
use crate::domain::rent::advance_due_date;
use crate::domain::validation::check_card;
use crate::errors::ServerError;
use crate::functions::receipts::send_payment_receipt;
use crate::handlers::read_json;
use crate::responses::{json_response, ok_json, xlsx_response, ResultResp};
use crate::spreadsheets::payments_workbook;

/// Tenants see their own payments, landlords those made to them. Anything
/// else reads as missing.
fn find_visible(app: &App, session: &Session, id: i64) -> Result<Payment, ServerError> {
    let payment = app
        .db
        .with_conn(|conn| payments::find_payment(conn, id))?
        .ok_or(ServerError::NotFound)?;

    let visible = match session.role {
        Role::Tenant => payment.tenant_id == session.user_id,
        Role::Landlord => payment.landlord_id == session.user_id,
    };
    if !visible {
        return Err(ServerError::NotFound);
    }
    Ok(payment)
}

pub fn list(app: &App, session: &Session) -> ResultResp {
    let list = app.db.with_conn(|conn| match session.role {
        Role::Tenant => payments::list_for_tenant(conn, session.user_id),
        Role::Landlord => payments::list_for_landlord(conn, session.user_id),
    })?;
    ok_json(&list)
}

pub fn get(app: &App, session: &Session, id: i64) -> ResultResp {
    ok_json(&find_visible(app, session, id)?)
}

#[derive(Debug, Deserialize)]
struct CardBody {
    #[serde(default)]
    card_number: String,
    #[serde(default)]
    expiry: String,
    #[serde(default)]
    cvv: String,
}

#[derive(Serialize)]
struct PaymentOutcome {
    payment: Payment,
    next_rent_date: chrono::NaiveDate,
    receipt_sent: bool,
}

/// Records a Paid payment of the tenant's rent and moves the due date on a
/// month. No processor is involved; the card is only shape-checked.
pub fn pay_rent(app: &App, mut req: Request, session: &Session) -> ResultResp {
    session.require_tenant()?;
    let card: CardBody = read_json(&mut req)?;
    check_card(&card.card_number, &card.expiry, &card.cvv)?;

    let now = now_unix();
    let today = today();

    // The due date is read and advanced under one write lock, so concurrent
    // submissions each move it on by a month.
    let (payment_id, next) = app.db.with_conn(|conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let tenancy = tenants::find_tenant(&tx, session.user_id)?
            .ok_or_else(|| ServerError::BadRequest("no tenancy on record".into()))?;
        if tenancy.rent.0 <= 0 {
            return Err(ServerError::BadRequest("no rent amount set".into()));
        }

        let next = advance_due_date(tenancy.next_rent_date, today);
        let id = payments::insert_payment(
            &tx,
            &NewPayment {
                tenant_id: session.user_id,
                landlord_id: tenancy.landlord_id,
                property_id: tenancy.property_id,
                amount: tenancy.rent,
                paid_at: now,
                status: PaymentStatus::Paid,
            },
        )?;
        tenants::set_next_rent_date(&tx, session.user_id, next)?;
        tx.commit()?;
        Ok((id, next))
    })?;

    info!(payment_id, tenant_id = session.user_id, "rent paid");

    let receipt_sent = match send_payment_receipt(app, payment_id, now) {
        Ok(_) => true,
        Err(e) => {
            warn!(payment_id, error = %e, "payment recorded but receipt failed");
            false
        }
    };

    let payment = find_visible(app, session, payment_id)?;
    json_response(
        201,
        &PaymentOutcome {
            payment,
            next_rent_date: next,
            receipt_sent,
        },
    )
}

/// The `sendPaymentReceipt` callable.
pub fn send_receipt(app: &App, session: &Session, id: i64) -> ResultResp {
    find_visible(app, session, id)?;
    let outcome = send_payment_receipt(app, id, now_unix())?;
    ok_json(&outcome)
}

pub fn export(app: &App, session: &Session) -> ResultResp {
    session.require_landlord()?;
    let list = app
        .db
        .with_conn(|conn| payments::list_for_landlord(conn, session.user_id))?;
    let buffer = payments_workbook(&list)?;
    xlsx_response(buffer, &format!("payments_{}.xlsx", today()))
}
