// src/handlers/requests.rs
use astra::Request;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::app::{now_unix, App};
use crate::auth::Session;
use crate::db::requests::{self, RequestInput};
use crate::db::tenants;
use crate::domain::models::{MaintenanceRequest, RequestStatus, Role};
use crate::domain::validation::required;
use crate::errors::ServerError;
use crate::handlers::{parse_query, read_json};
use crate::responses::{json_response, no_content, ok_json, ResultResp};

#[derive(Serialize)]
struct RequestView {
    #[serde(flatten)]
    request: MaintenanceRequest,
    image_urls: Vec<String>,
}

fn view(app: &App, request: MaintenanceRequest, now: i64) -> Result<RequestView, ServerError> {
    let image_urls = app.files.signed_urls(&request.images, now)?;
    Ok(RequestView {
        request,
        image_urls,
    })
}

fn views(app: &App, list: Vec<MaintenanceRequest>) -> Result<Vec<RequestView>, ServerError> {
    let now = now_unix();
    list.into_iter().map(|r| view(app, r, now)).collect()
}

/// The raising tenant and that tenant's landlord may see a request.
fn find_visible(
    conn: &Connection,
    session: &Session,
    id: i64,
) -> Result<MaintenanceRequest, ServerError> {
    let request = requests::find_request(conn, id)?.ok_or(ServerError::NotFound)?;
    match session.role {
        Role::Tenant if request.tenant_id == session.user_id => Ok(request),
        Role::Landlord => {
            tenants::find_owned_tenant(conn, session.user_id, request.tenant_id)?;
            Ok(request)
        }
        Role::Tenant => Err(ServerError::NotFound),
    }
}

fn find_own(conn: &Connection, session: &Session, id: i64) -> Result<MaintenanceRequest, ServerError> {
    session.require_tenant()?;
    find_visible(conn, session, id)
}

#[derive(Debug, Deserialize)]
struct RequestBody {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    images: Vec<String>,
}

impl RequestBody {
    fn validate(self, app: &App) -> Result<RequestInput, ServerError> {
        for path in &self.images {
            app.files.check_upload_path(path)?;
        }
        Ok(RequestInput {
            title: required("title", &self.title)?,
            description: self.description.trim().to_string(),
            images: self.images,
        })
    }
}

pub fn list(app: &App, req: &Request, session: &Session) -> ResultResp {
    let list = match session.role {
        Role::Tenant => app
            .db
            .with_conn(|conn| requests::list_for_tenant(conn, session.user_id))?,
        Role::Landlord => {
            let status = match parse_query(req).get("status") {
                Some(raw) => Some(RequestStatus::parse(raw).ok_or_else(|| {
                    ServerError::BadRequest(format!("unknown status: {raw}"))
                })?),
                None => None,
            };
            app.db
                .with_conn(|conn| requests::list_for_landlord(conn, session.user_id, status))?
        }
    };
    ok_json(&views(app, list)?)
}

pub fn create(app: &App, mut req: Request, session: &Session) -> ResultResp {
    session.require_tenant()?;
    let input = read_json::<RequestBody>(&mut req)?.validate(app)?;
    let now = now_unix();

    let request = app.db.with_conn(|conn| {
        let id = requests::insert_request(conn, session.user_id, &input, now)?;
        requests::find_request(conn, id)?.ok_or(ServerError::InternalError)
    })?;

    info!(request_id = request.id, tenant_id = session.user_id, "maintenance request raised");
    json_response(201, &view(app, request, now)?)
}

pub fn get(app: &App, session: &Session, id: i64) -> ResultResp {
    let request = app.db.with_conn(|conn| find_visible(conn, session, id))?;
    ok_json(&view(app, request, now_unix())?)
}

/// Tenants can edit until the landlord resolves the request.
pub fn update(app: &App, mut req: Request, session: &Session, id: i64) -> ResultResp {
    let input = read_json::<RequestBody>(&mut req)?.validate(app)?;
    let now = now_unix();

    let request = app.db.with_conn(|conn| {
        let current = find_own(conn, session, id)?;
        if current.status == RequestStatus::Resolved {
            return Err(ServerError::Conflict("request is already resolved".into()));
        }
        requests::update_request(conn, id, &input, now)?;
        requests::find_request(conn, id)?.ok_or(ServerError::NotFound)
    })?;

    ok_json(&view(app, request, now)?)
}

pub fn delete(app: &App, session: &Session, id: i64) -> ResultResp {
    app.db.with_conn(|conn| {
        find_own(conn, session, id)?;
        requests::delete_request(conn, id)
    })?;
    no_content()
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    #[serde(default)]
    status: String,
}

pub fn set_status(app: &App, mut req: Request, session: &Session, id: i64) -> ResultResp {
    session.require_landlord()?;
    let body: StatusBody = read_json(&mut req)?;
    let status = RequestStatus::parse(body.status.trim())
        .ok_or_else(|| ServerError::BadRequest(format!("unknown status: {}", body.status)))?;
    let now = now_unix();

    let request = app.db.with_conn(|conn| {
        find_visible(conn, session, id)?;
        requests::set_status(conn, id, status, now)?;
        requests::find_request(conn, id)?.ok_or(ServerError::NotFound)
    })?;

    info!(request_id = id, status = status.as_str(), "request status changed");
    ok_json(&view(app, request, now)?)
}
