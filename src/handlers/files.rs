// src/handlers/files.rs
use astra::Request;
use serde_json::json;
use tracing::info;

use crate::app::{now_unix, App};
use crate::auth::Session;
use crate::errors::ServerError;
use crate::files::content_type_for;
use crate::handlers::{header, parse_query, read_bytes};
use crate::responses::{file_response, json_response, ResultResp};

/// Raw request body stored under `uploads/<kind>/`. Returns the path to put
/// on records and a signed URL for immediate display.
pub fn upload(app: &App, mut req: Request, session: &Session, kind: &str) -> ResultResp {
    let content_type = header(&req, "Content-Type")
        .ok_or_else(|| ServerError::BadRequest("missing Content-Type".into()))?
        .to_string();
    let bytes = read_bytes(&mut req, app.config.max_upload_bytes)?;

    let path = app.files.save_upload(kind, &content_type, &bytes)?;
    let url = app.files.signed_url(&path, now_unix())?;

    info!(user_id = session.user_id, path = %path, bytes = bytes.len(), "file uploaded");
    json_response(201, &json!({ "path": path, "url": url }))
}

/// `GET /files/<path>?expires=<unix>&sig=<signature>`
pub fn download(app: &App, req: &Request, rel: &str) -> ResultResp {
    let query = parse_query(req);
    let expires = query
        .get("expires")
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or_else(|| ServerError::Forbidden("missing or bad expiry".into()))?;
    let sig = query
        .get("sig")
        .ok_or_else(|| ServerError::Forbidden("missing signature".into()))?;

    app.files.verify(rel, expires, sig, now_unix())?;
    let bytes = app.files.read(rel)?;
    file_response(bytes, &content_type_for(rel))
}
