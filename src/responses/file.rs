// responses/file.rs
use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};

/// Raw bytes served inline with the given content type.
pub fn file_response(bytes: Vec<u8>, content_type: &str) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", content_type)
        .header("Cache-Control", "private, max-age=300")
        .body(Body::from(bytes))
        .map_err(|_| ServerError::InternalError)
}
