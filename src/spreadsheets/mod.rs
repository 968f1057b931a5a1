pub mod payments_xlsx;

pub use payments_xlsx::payments_workbook;
