// src/handlers/properties.rs
use astra::Request;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::app::{now_unix, App};
use crate::auth::Session;
use crate::db::properties::{self, PropertyInput};
use crate::domain::models::Property;
use crate::domain::money::Pence;
use crate::domain::validation::required;
use crate::errors::ServerError;
use crate::handlers::read_json;
use crate::responses::{json_response, no_content, ok_json, ResultResp};

#[derive(Serialize)]
pub struct PropertyView {
    #[serde(flatten)]
    pub property: Property,
    pub image_urls: Vec<String>,
}

fn view(app: &App, property: Property, now: i64) -> Result<PropertyView, ServerError> {
    let image_urls = app.files.signed_urls(&property.images, now)?;
    Ok(PropertyView {
        property,
        image_urls,
    })
}

#[derive(Debug, Deserialize)]
struct PropertyBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    location: String,
    price: Option<Pence>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    images: Vec<String>,
}

impl PropertyBody {
    fn validate(self, app: &App) -> Result<PropertyInput, ServerError> {
        for path in &self.images {
            app.files.check_upload_path(path)?;
        }
        Ok(PropertyInput {
            name: required("name", &self.name)?,
            location: required("location", &self.location)?,
            price: self
                .price
                .ok_or_else(|| ServerError::BadRequest("price is required".into()))?,
            description: self.description.trim().to_string(),
            images: self.images,
        })
    }
}

pub fn list(app: &App, session: &Session) -> ResultResp {
    session.require_landlord()?;
    let now = now_unix();
    let list = app
        .db
        .with_conn(|conn| properties::list_properties(conn, session.user_id))?;

    let views = list
        .into_iter()
        .map(|p| view(app, p, now))
        .collect::<Result<Vec<_>, _>>()?;
    ok_json(&views)
}

pub fn create(app: &App, mut req: Request, session: &Session) -> ResultResp {
    session.require_landlord()?;
    let input = read_json::<PropertyBody>(&mut req)?.validate(app)?;
    let now = now_unix();

    let property = app.db.with_conn(|conn| {
        let id = properties::insert_property(conn, session.user_id, &input, now)?;
        properties::find_owned_property(conn, session.user_id, id)
    })?;

    info!(property_id = property.id, landlord_id = session.user_id, "property created");
    json_response(201, &view(app, property, now)?)
}

pub fn get(app: &App, session: &Session, id: i64) -> ResultResp {
    session.require_landlord()?;
    let property = app
        .db
        .with_conn(|conn| properties::find_owned_property(conn, session.user_id, id))?;
    ok_json(&view(app, property, now_unix())?)
}

pub fn update(app: &App, mut req: Request, session: &Session, id: i64) -> ResultResp {
    session.require_landlord()?;
    let input = read_json::<PropertyBody>(&mut req)?.validate(app)?;

    let property = app.db.with_conn(|conn| {
        properties::find_owned_property(conn, session.user_id, id)?;
        properties::update_property(conn, id, &input)?;
        properties::find_owned_property(conn, session.user_id, id)
    })?;

    ok_json(&view(app, property, now_unix())?)
}

pub fn delete(app: &App, session: &Session, id: i64) -> ResultResp {
    session.require_landlord()?;
    app.db.with_conn(|conn| {
        properties::find_owned_property(conn, session.user_id, id)?;
        properties::delete_property(conn, id)
    })?;

    info!(property_id = id, "property deleted");
    no_content()
}
