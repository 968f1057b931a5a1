use crate::errors::ServerError;
use astra::{Body, Response, ResponseBuilder};
use tracing::{debug, error};

pub use crate::errors::ResultResp;

/// Convert a ServerError into a JSON error response: `{"error": "..."}`.
pub fn error_to_response(err: ServerError) -> Response {
    let status = err.status();
    if status >= 500 {
        error!(%err, "request failed");
    } else {
        debug!(%err, "request rejected");
    }

    json_error_response(status, &err.public_message())
}

pub fn json_error_response(status: u16, message: &str) -> Response {
    let body = serde_json::json!({ "error": message }).to_string();

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .unwrap_or_else(|_| Response::new(Body::empty()))
}
