pub mod receipt_pdf;

pub use receipt_pdf::{render_receipt_pdf, ReceiptData};
