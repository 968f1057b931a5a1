use std::time::Instant;

use astra::{Request, Response};
use serde_json::json;
use tracing::info;

use crate::app::App;
use crate::errors::ServerError;
use crate::handlers::{self, parse_id, require_session};
use crate::responses::{error_to_response, ok_json, ResultResp};

/// Entry point for every request: dispatch, turn errors into JSON, log one line.
pub fn route(req: Request, app: &App) -> Response {
    let started = Instant::now();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    let resp = match handle(req, app) {
        Ok(resp) => resp,
        Err(err) => error_to_response(err),
    };

    info!(
        %method,
        %path,
        status = resp.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    resp
}

pub fn handle(req: Request, app: &App) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();

    if let Some(rel) = path.strip_prefix("/files/") {
        if method != "GET" {
            return Err(ServerError::NotFound);
        }
        return handlers::files::download(app, &req, rel);
    }

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match (method.as_str(), segments.as_slice()) {
        ("GET", ["health"]) => ok_json(&json!({ "status": "ok" })),

        // Auth
        ("POST", ["api", "auth", "signup"]) => handlers::auth::signup(app, req),
        ("POST", ["api", "auth", "login"]) => handlers::auth::login(app, req),
        ("POST", ["api", "auth", "logout"]) => handlers::auth::logout(app, &req),
        ("POST", ["api", "auth", "password"]) => {
            let s = require_session(app, &req)?;
            handlers::auth::change_password(app, req, &s)
        }
        ("POST", ["api", "auth", "password-reset"]) => {
            handlers::auth::request_password_reset(app, req)
        }
        ("POST", ["api", "auth", "password-reset", "confirm"]) => {
            handlers::auth::confirm_password_reset(app, req)
        }

        // Profile
        ("GET", ["api", "me"]) => {
            let s = require_session(app, &req)?;
            handlers::profile::get_profile(app, &s)
        }
        ("PUT", ["api", "me"]) => {
            let s = require_session(app, &req)?;
            handlers::profile::update_profile(app, req, &s)
        }

        // Properties
        ("GET", ["api", "properties"]) => {
            let s = require_session(app, &req)?;
            handlers::properties::list(app, &s)
        }
        ("POST", ["api", "properties"]) => {
            let s = require_session(app, &req)?;
            handlers::properties::create(app, req, &s)
        }
        ("GET", ["api", "properties", id]) => {
            let s = require_session(app, &req)?;
            handlers::properties::get(app, &s, parse_id(id)?)
        }
        ("PUT", ["api", "properties", id]) => {
            let s = require_session(app, &req)?;
            let id = parse_id(id)?;
            handlers::properties::update(app, req, &s, id)
        }
        ("DELETE", ["api", "properties", id]) => {
            let s = require_session(app, &req)?;
            handlers::properties::delete(app, &s, parse_id(id)?)
        }

        // Tenants
        ("GET", ["api", "tenants"]) => {
            let s = require_session(app, &req)?;
            handlers::tenants::list(app, &s)
        }
        ("POST", ["api", "tenants"]) => {
            let s = require_session(app, &req)?;
            handlers::tenants::create(app, req, &s)
        }
        ("GET", ["api", "tenants", id]) => {
            let s = require_session(app, &req)?;
            handlers::tenants::get(app, &s, parse_id(id)?)
        }
        ("PUT", ["api", "tenants", id]) => {
            let s = require_session(app, &req)?;
            let id = parse_id(id)?;
            handlers::tenants::update(app, req, &s, id)
        }
        ("DELETE", ["api", "tenants", id]) => {
            let s = require_session(app, &req)?;
            handlers::tenants::delete(app, &s, parse_id(id)?)
        }

        // Rent + dashboards
        ("GET", ["api", "rent"]) => {
            let s = require_session(app, &req)?;
            handlers::dashboard::rent(app, &s)
        }
        ("GET", ["api", "dashboard"]) => {
            let s = require_session(app, &req)?;
            handlers::dashboard::dashboard(app, &s)
        }

        // Payments
        ("GET", ["api", "payments"]) => {
            let s = require_session(app, &req)?;
            handlers::payments::list(app, &s)
        }
        ("POST", ["api", "payments"]) => {
            let s = require_session(app, &req)?;
            handlers::payments::pay_rent(app, req, &s)
        }
        ("GET", ["api", "payments", "export"]) => {
            let s = require_session(app, &req)?;
            handlers::payments::export(app, &s)
        }
        ("GET", ["api", "payments", id]) => {
            let s = require_session(app, &req)?;
            handlers::payments::get(app, &s, parse_id(id)?)
        }
        ("POST", ["api", "payments", id, "receipt"]) => {
            let s = require_session(app, &req)?;
            handlers::payments::send_receipt(app, &s, parse_id(id)?)
        }

        // Maintenance requests
        ("GET", ["api", "requests"]) => {
            let s = require_session(app, &req)?;
            handlers::requests::list(app, &req, &s)
        }
        ("POST", ["api", "requests"]) => {
            let s = require_session(app, &req)?;
            handlers::requests::create(app, req, &s)
        }
        ("GET", ["api", "requests", id]) => {
            let s = require_session(app, &req)?;
            handlers::requests::get(app, &s, parse_id(id)?)
        }
        ("PUT", ["api", "requests", id]) => {
            let s = require_session(app, &req)?;
            let id = parse_id(id)?;
            handlers::requests::update(app, req, &s, id)
        }
        ("DELETE", ["api", "requests", id]) => {
            let s = require_session(app, &req)?;
            handlers::requests::delete(app, &s, parse_id(id)?)
        }
        ("PUT", ["api", "requests", id, "status"]) => {
            let s = require_session(app, &req)?;
            let id = parse_id(id)?;
            handlers::requests::set_status(app, req, &s, id)
        }

        // Messages
        ("GET", ["api", "messages"]) => {
            let s = require_session(app, &req)?;
            handlers::messages::conversation(app, &req, &s)
        }
        ("POST", ["api", "messages"]) => {
            let s = require_session(app, &req)?;
            handlers::messages::send(app, req, &s)
        }
        ("POST", ["api", "messages", id, "read"]) => {
            let s = require_session(app, &req)?;
            handlers::messages::mark_read(app, &s, parse_id(id)?)
        }

        // Uploads
        ("POST", ["api", "uploads", kind]) => {
            let s = require_session(app, &req)?;
            let kind = kind.to_string();
            handlers::files::upload(app, req, &s, &kind)
        }

        // Scheduled jobs
        ("POST", ["api", "jobs", "rent-reminders"]) => handlers::jobs::rent_reminders(app, &req),

        _ => Err(ServerError::NotFound),
    }
}
