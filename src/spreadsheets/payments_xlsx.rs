use crate::domain::dates::format_timestamp;
use crate::domain::models::Payment;
use crate::errors::ServerError;
use rust_xlsxwriter::Workbook;

const HEADERS: [&str; 6] = ["Payment ID", "Tenant", "Property ID", "Amount (£)", "Paid At", "Status"];

/// Landlord payment ledger as an XLSX workbook, one row per payment.
pub fn payments_workbook(payments: &[Payment]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| ServerError::DocumentError(format!("header '{header}': {e}")))?;
    }

    for (i, p) in payments.iter().enumerate() {
        let r = (i + 1) as u32;

        worksheet
            .write_number(r, 0, p.id as f64)
            .map_err(|e| ServerError::DocumentError(format!("payment id: {e}")))?;
        worksheet
            .write_string(r, 1, &p.tenant_name)
            .map_err(|e| ServerError::DocumentError(format!("tenant: {e}")))?;

        let property = p.property_id.map(|id| id.to_string()).unwrap_or_default();
        worksheet
            .write_string(r, 2, &property)
            .map_err(|e| ServerError::DocumentError(format!("property: {e}")))?;

        worksheet
            .write_number(r, 3, p.amount.0 as f64 / 100.0)
            .map_err(|e| ServerError::DocumentError(format!("amount: {e}")))?;
        worksheet
            .write_string(r, 4, &format_timestamp(p.paid_at))
            .map_err(|e| ServerError::DocumentError(format!("paid at: {e}")))?;
        worksheet
            .write_string(r, 5, p.status.as_str())
            .map_err(|e| ServerError::DocumentError(format!("status: {e}")))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::DocumentError(format!("Failed to save workbook: {e}")))
}
