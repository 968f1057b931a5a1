// src/handlers/profile.rs
use astra::Request;
use serde::{Deserialize, Serialize};

use crate::app::{now_unix, App};
use crate::auth::Session;
use crate::db::users::{self, ProfileUpdate};
use crate::domain::models::User;
use crate::domain::validation::check_phone;
use crate::errors::ServerError;
use crate::handlers::read_json;
use crate::responses::{ok_json, ResultResp};

#[derive(Serialize)]
struct ProfileView {
    #[serde(flatten)]
    user: User,
    profile_image_url: Option<String>,
}

fn view(app: &App, user: User) -> Result<ProfileView, ServerError> {
    let profile_image_url = match &user.profile_image {
        Some(path) => Some(app.files.signed_url(path, now_unix())?),
        None => None,
    };
    Ok(ProfileView {
        user,
        profile_image_url,
    })
}

fn load(app: &App, session: &Session) -> Result<User, ServerError> {
    app.db
        .with_conn(|conn| users::find_user(conn, session.user_id))?
        .ok_or(ServerError::NotFound)
}

pub fn get_profile(app: &App, session: &Session) -> ResultResp {
    let user = load(app, session)?;
    ok_json(&view(app, user)?)
}

#[derive(Debug, Deserialize)]
struct ProfileInput {
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,
    sex: Option<String>,
    dob: Option<String>,
    address: Option<String>,
    profile_image: Option<String>,
}

fn trimmed(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string())
}

pub fn update_profile(app: &App, mut req: Request, session: &Session) -> ResultResp {
    let input: ProfileInput = read_json(&mut req)?;

    if let Some(first) = &input.first_name {
        if first.trim().is_empty() {
            return Err(ServerError::BadRequest("first name cannot be empty".into()));
        }
    }
    if let Some(phone) = &input.phone {
        check_phone(phone)?;
    }
    if let Some(path) = &input.profile_image {
        app.files.check_upload_path(path)?;
    }

    let update = ProfileUpdate {
        first_name: trimmed(input.first_name),
        last_name: trimmed(input.last_name),
        phone: trimmed(input.phone),
        sex: trimmed(input.sex),
        dob: trimmed(input.dob),
        address: trimmed(input.address),
        profile_image: input.profile_image,
    };
    app.db
        .with_conn(|conn| users::update_profile(conn, session.user_id, &update))?;

    let user = load(app, session)?;
    ok_json(&view(app, user)?)
}
