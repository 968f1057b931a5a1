// src/handlers/auth.rs
use astra::Request;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::app::{now_unix, App};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::sessions::{create_session, revoke_all_for_user, revoke_session};
use crate::auth::Session;
use crate::db::users::{self, NewUser};
use crate::domain::models::Role;
use crate::domain::validation::{check_password, check_phone, normalize_email, required};
use crate::errors::ServerError;
use crate::handlers::{bearer_token, read_json};
use crate::mailer::Email;
use crate::responses::{json_response, no_content, ok_json, ResultResp};
use crate::templates::emails::{password_reset_email, PASSWORD_RESET_SUBJECT};

#[derive(Debug, Deserialize)]
struct SignupInput {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone: String,
    sex: Option<String>,
    dob: Option<String>,
    address: Option<String>,
    #[serde(default)]
    password: String,
}

/// Sign-up is for landlords; tenants are created by their landlord.
pub fn signup(app: &App, mut req: Request) -> ResultResp {
    let input: SignupInput = read_json(&mut req)?;

    let first_name = required("first name", &input.first_name)?;
    let email = normalize_email(&input.email)?;
    check_password(&input.password)?;
    check_phone(&input.phone)?;

    let new_user = NewUser {
        email,
        first_name,
        last_name: input.last_name.trim().to_string(),
        phone: input.phone.trim().to_string(),
        role: Role::Landlord,
        sex: input.sex,
        dob: input.dob,
        address: input.address,
        must_change_password: false,
    };
    let hash = hash_password(&input.password)?;
    let now = now_unix();

    let (token, user) = app.db.with_conn(|conn| {
        let id = users::insert_user(conn, &new_user, &hash, now)?;
        let token = create_session(conn, id, now, app.config.session_ttl_secs)?;
        let user = users::find_user(conn, id)?.ok_or(ServerError::InternalError)?;
        Ok((token, user))
    })?;

    info!(user_id = user.id, "landlord signed up");
    json_response(201, &json!({ "token": token, "user": user }))
}

#[derive(Debug, Deserialize)]
struct LoginInput {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

pub fn login(app: &App, mut req: Request) -> ResultResp {
    let input: LoginInput = read_json(&mut req)?;
    let invalid = || ServerError::Unauthorized("invalid email or password".into());

    let email = normalize_email(&input.email).map_err(|_| invalid())?;
    let now = now_unix();

    let (token, user) = app.db.with_conn(|conn| {
        let (user, hash) = users::find_credentials(conn, &email)?.ok_or_else(invalid)?;
        if !verify_password(&input.password, &hash)? {
            return Err(invalid());
        }
        users::touch_login(conn, user.id, now)?;
        let token = create_session(conn, user.id, now, app.config.session_ttl_secs)?;
        Ok((token, user))
    })?;

    info!(user_id = user.id, role = user.role.as_str(), "login");
    ok_json(&json!({
        "token": token,
        "must_change_password": user.must_change_password,
        "user": user,
    }))
}

pub fn logout(app: &App, req: &Request) -> ResultResp {
    let token = bearer_token(req)
        .ok_or_else(|| ServerError::Unauthorized("missing bearer token".into()))?;
    app.db
        .with_conn(|conn| revoke_session(conn, token, now_unix()))?;
    no_content()
}

#[derive(Debug, Deserialize)]
struct ChangePasswordInput {
    #[serde(default)]
    current_password: String,
    #[serde(default)]
    new_password: String,
}

/// Also clears the first-login flag. Other sessions are signed out; this one stays.
pub fn change_password(app: &App, mut req: Request, session: &Session) -> ResultResp {
    let input: ChangePasswordInput = read_json(&mut req)?;
    check_password(&input.new_password)?;
    let keep = bearer_token(&req).map(str::to_string);
    let new_hash = hash_password(&input.new_password)?;
    let now = now_unix();

    app.db.with_conn(|conn| {
        let current = users::password_hash(conn, session.user_id)?;
        if !verify_password(&input.current_password, &current)? {
            return Err(ServerError::Unauthorized("current password is incorrect".into()));
        }
        users::set_password(conn, session.user_id, &new_hash, false)?;
        revoke_all_for_user(conn, session.user_id, keep.as_deref(), now)
    })?;

    info!(user_id = session.user_id, email = %session.email, "password changed");
    ok_json(&json!({ "success": true }))
}

#[derive(Debug, Deserialize)]
struct ResetRequestInput {
    #[serde(default)]
    email: String,
}

/// Answers the same whether or not the address has an account.
pub fn request_password_reset(app: &App, mut req: Request) -> ResultResp {
    let input: ResetRequestInput = read_json(&mut req)?;
    let now = now_unix();

    let issued = app
        .db
        .with_conn(|conn| app.resets.request_reset(conn, &input.email, now))?;

    if let Some(issued) = issued {
        let html = password_reset_email(
            &issued.first_name,
            &issued.link,
            (issued.expires_at - now) / 60,
        );
        let email = Email::new(&issued.email, PASSWORD_RESET_SUBJECT, html.into_string());
        if let Err(e) = app.mailer.send(&email) {
            warn!(user_id = issued.user_id, error = %e, "password reset email not sent");
        }
    }

    ok_json(&json!({
        "success": true,
        "message": "If that email is registered, a reset link is on its way."
    }))
}

#[derive(Debug, Deserialize)]
struct ResetConfirmInput {
    #[serde(default)]
    token: String,
    #[serde(default)]
    new_password: String,
}

pub fn confirm_password_reset(app: &App, mut req: Request) -> ResultResp {
    let input: ResetConfirmInput = read_json(&mut req)?;
    let user_id = app.db.with_conn(|conn| {
        app.resets
            .redeem(conn, &input.token, &input.new_password, now_unix())
    })?;

    info!(user_id, "password reset");
    ok_json(&json!({ "success": true }))
}
