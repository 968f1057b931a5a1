// src/handlers/mod.rs
//! Request handlers plus the small helpers they share for reading bodies,
//! query strings and the caller's session.

use std::collections::HashMap;
use std::io::Read;

use astra::Request;
use serde::de::DeserializeOwned;

use crate::app::{now_unix, App};
use crate::auth::sessions::load_session;
use crate::auth::token::parse_bearer;
use crate::auth::Session;
use crate::errors::ServerError;

pub mod auth;
pub mod dashboard;
pub mod files;
pub mod jobs;
pub mod messages;
pub mod payments;
pub mod profile;
pub mod properties;
pub mod requests;
pub mod tenants;

/// JSON bodies are small; uploads have their own limit.
const MAX_JSON_BYTES: usize = 256 * 1024;

pub fn header<'a>(req: &'a Request, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

pub fn read_bytes(req: &mut Request, limit: usize) -> Result<Vec<u8>, ServerError> {
    let mut buf = Vec::new();
    req.body_mut()
        .reader()
        .take(limit as u64 + 1)
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("failed to read body: {e}")))?;

    if buf.len() > limit {
        return Err(ServerError::BadRequest(format!(
            "body exceeds {limit} bytes"
        )));
    }
    Ok(buf)
}

pub fn read_json<T: DeserializeOwned>(req: &mut Request) -> Result<T, ServerError> {
    let bytes = read_bytes(req, MAX_JSON_BYTES)?;
    serde_json::from_slice(&bytes).map_err(|e| ServerError::BadRequest(format!("invalid JSON: {e}")))
}

pub fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

/// Path ids that don't parse can't name anything.
pub fn parse_id(raw: &str) -> Result<i64, ServerError> {
    raw.parse().map_err(|_| ServerError::NotFound)
}

pub fn bearer_token(req: &Request) -> Option<&str> {
    header(req, "Authorization").and_then(parse_bearer)
}

/// Resolve the caller from the bearer token, or 401.
pub fn require_session(app: &App, req: &Request) -> Result<Session, ServerError> {
    let token = bearer_token(req)
        .ok_or_else(|| ServerError::Unauthorized("missing bearer token".into()))?;
    app.db
        .with_conn(|conn| load_session(conn, token, now_unix()))?
        .ok_or_else(|| ServerError::Unauthorized("session expired or invalid".into()))
}
