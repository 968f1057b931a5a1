pub mod errors;
pub mod file;
pub mod json;
pub mod xlsx;

pub use errors::{error_to_response, ResultResp};

pub use file::file_response;
pub use json::{json_response, no_content, ok_json};
pub use xlsx::xlsx_response;
