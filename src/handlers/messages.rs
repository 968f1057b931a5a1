// src/handlers/messages.rs
use astra::Request;
use rusqlite::Connection;
use serde::Deserialize;

use crate::app::{now_unix, App};
use crate::auth::Session;
use crate::db::{messages, tenants};
use crate::domain::models::Role;
use crate::domain::validation::required;
use crate::errors::ServerError;
use crate::handlers::{parse_query, read_json};
use crate::responses::{json_response, no_content, ok_json, ResultResp};

const MAX_MESSAGE_CHARS: usize = 2000;

/// Tenants talk to their own landlord; landlords to their own tenants.
/// A tenant may leave the counterpart out, it defaults to their landlord.
fn counterpart(
    conn: &Connection,
    session: &Session,
    requested: Option<i64>,
) -> Result<i64, ServerError> {
    match session.role {
        Role::Tenant => {
            let tenancy = tenants::find_tenant(conn, session.user_id)?
                .ok_or_else(|| ServerError::Forbidden("no landlord on record".into()))?;
            match requested {
                Some(id) if id != tenancy.landlord_id => Err(ServerError::Forbidden(
                    "tenants can only message their landlord".into(),
                )),
                _ => Ok(tenancy.landlord_id),
            }
        }
        Role::Landlord => {
            let id = requested
                .ok_or_else(|| ServerError::BadRequest("recipient is required".into()))?;
            match tenants::find_owned_tenant(conn, session.user_id, id) {
                Ok(_) => Ok(id),
                Err(ServerError::NotFound) => Err(ServerError::Forbidden(
                    "landlords can only message their own tenants".into(),
                )),
                Err(e) => Err(e),
            }
        }
    }
}

pub fn conversation(app: &App, req: &Request, session: &Session) -> ResultResp {
    let with = match parse_query(req).get("with") {
        Some(raw) => Some(
            raw.parse::<i64>()
                .map_err(|_| ServerError::BadRequest(format!("invalid user id: {raw}")))?,
        ),
        None => None,
    };

    let list = app.db.with_conn(|conn| {
        let other = counterpart(conn, session, with)?;
        messages::conversation(conn, session.user_id, other)
    })?;
    ok_json(&list)
}

#[derive(Debug, Deserialize)]
struct SendBody {
    recipient_id: Option<i64>,
    #[serde(default)]
    content: String,
}

pub fn send(app: &App, mut req: Request, session: &Session) -> ResultResp {
    let body: SendBody = read_json(&mut req)?;
    let content = required("content", &body.content)?;
    if content.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ServerError::BadRequest(format!(
            "message is longer than {MAX_MESSAGE_CHARS} characters"
        )));
    }
    let now = now_unix();

    let message = app.db.with_conn(|conn| {
        let recipient = counterpart(conn, session, body.recipient_id)?;
        let id = messages::insert_message(conn, session.user_id, recipient, &content, now)?;
        messages::find_message(conn, id)?.ok_or(ServerError::InternalError)
    })?;

    json_response(201, &message)
}

pub fn mark_read(app: &App, session: &Session, id: i64) -> ResultResp {
    let updated = app
        .db
        .with_conn(|conn| messages::mark_read(conn, id, session.user_id, now_unix()))?;
    if !updated {
        return Err(ServerError::NotFound);
    }
    no_content()
}
