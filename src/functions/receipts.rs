// src/functions/receipts.rs
use serde::Serialize;
use tracing::info;

use crate::app::App;
use crate::db::{payments, tenants, users};
use crate::documents::{render_receipt_pdf, ReceiptData};
use crate::domain::dates::{format_display, format_timestamp};
use crate::errors::ServerError;
use crate::mailer::Email;
use crate::templates::emails::{receipt_email, RECEIPT_SUBJECT};

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptOutcome {
    pub success: bool,
    pub receipt_url: String,
}

pub fn receipt_path(payment_id: i64) -> String {
    format!("receipts/{payment_id}.pdf")
}

/// Renders, stores and emails the receipt for one payment. Any failed step
/// fails the whole call. Callers check access to the payment first.
pub fn send_payment_receipt(
    app: &App,
    payment_id: i64,
    now: i64,
) -> Result<ReceiptOutcome, ServerError> {
    let (data, to) = app.db.with_conn(|conn| {
        let payment = payments::find_payment(conn, payment_id)?.ok_or(ServerError::NotFound)?;
        let tenant_user = users::find_user(conn, payment.tenant_id)?.ok_or(ServerError::NotFound)?;
        let tenancy = tenants::find_tenant(conn, payment.tenant_id)?;
        let landlord_name = users::find_user(conn, payment.landlord_id)?
            .map(|u| u.full_name())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        let property_name = tenancy
            .as_ref()
            .and_then(|t| t.property_name.clone())
            .unwrap_or_else(|| "Not Assigned".to_string());
        let show = |d: Option<chrono::NaiveDate>| d.map(format_display).unwrap_or_default();

        let data = ReceiptData {
            receipt_no: payment.id.to_string(),
            issued: format_timestamp(payment.paid_at),
            tenant_name: tenant_user.full_name(),
            landlord_name,
            property_name,
            rent_start_date: show(tenancy.as_ref().and_then(|t| t.rent_start_date)),
            next_rent_date: show(tenancy.as_ref().and_then(|t| t.next_rent_date)),
            amount: payment.amount.to_string(),
        };
        Ok((data, tenant_user.email))
    })?;

    let pdf = render_receipt_pdf(&data)?;
    let path = receipt_path(payment_id);
    app.files.save(&path, &pdf)?;
    let url = app.files.signed_url(&path, now)?;

    app.db
        .with_conn(|conn| payments::set_receipt(conn, payment_id, &path, &url))?;

    let html = receipt_email(&data.tenant_name, &data.amount, &url);
    let email = Email::new(to, RECEIPT_SUBJECT, html.into_string())
        .with_attachment(format!("rent-receipt-{payment_id}.pdf"), pdf);
    app.mailer.send(&email)?;

    info!(payment_id, "receipt sent");
    Ok(ReceiptOutcome {
        success: true,
        receipt_url: url,
    })
}
