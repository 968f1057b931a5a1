// src/handlers/tenants.rs
use astra::Request;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::app::{now_unix, today, App};
use crate::auth::Session;
use crate::db::properties::find_owned_property;
use crate::db::tenants::{self, TenantTerms};
use crate::db::users;
use crate::domain::dates::parse_date_field;
use crate::domain::models::Tenant;
use crate::domain::money::Pence;
use crate::domain::rent::{RentStatus, RentStatusView};
use crate::functions::onboarding::{create_tenant, CreateTenantInput};
use crate::handlers::read_json;
use crate::responses::{json_response, no_content, ok_json, ResultResp};

#[derive(Serialize)]
pub struct TenantView {
    #[serde(flatten)]
    pub tenant: Tenant,
    pub rent_status: RentStatusView,
}

impl TenantView {
    pub fn new(tenant: Tenant, today: NaiveDate) -> Self {
        let rent_status = RentStatus::classify(tenant.next_rent_date, today).view();
        Self {
            tenant,
            rent_status,
        }
    }
}

pub fn list(app: &App, session: &Session) -> ResultResp {
    session.require_landlord()?;
    let today = today();
    let list = app
        .db
        .with_conn(|conn| tenants::list_tenants(conn, session.user_id))?;

    let views: Vec<TenantView> = list.into_iter().map(|t| TenantView::new(t, today)).collect();
    ok_json(&views)
}

/// The `createTenant` callable.
pub fn create(app: &App, mut req: Request, session: &Session) -> ResultResp {
    let input: CreateTenantInput = read_json(&mut req)?;
    let outcome = create_tenant(app, session, &input, today(), now_unix())?;
    json_response(201, &outcome)
}

pub fn get(app: &App, session: &Session, id: i64) -> ResultResp {
    session.require_landlord()?;
    let tenant = app
        .db
        .with_conn(|conn| tenants::find_owned_tenant(conn, session.user_id, id))?;
    ok_json(&TenantView::new(tenant, today()))
}

#[derive(Debug, Deserialize)]
struct TermsBody {
    property_id: Option<i64>,
    rent_amount: Option<Pence>,
    rent_start_date: Option<String>,
    next_rent_date: Option<String>,
}

/// Fields left out keep their current value.
pub fn update(app: &App, mut req: Request, session: &Session, id: i64) -> ResultResp {
    session.require_landlord()?;
    let body: TermsBody = read_json(&mut req)?;
    let start = parse_date_field("rent start date", body.rent_start_date.as_deref())?;
    let next = parse_date_field("next rent date", body.next_rent_date.as_deref())?;

    let tenant = app.db.with_conn(|conn| {
        let current = tenants::find_owned_tenant(conn, session.user_id, id)?;
        if let Some(pid) = body.property_id {
            find_owned_property(conn, session.user_id, pid)?;
        }

        let terms = TenantTerms {
            property_id: body.property_id.or(current.property_id),
            rent: body.rent_amount.unwrap_or(current.rent),
            rent_start_date: start.or(current.rent_start_date),
            next_rent_date: next.or(current.next_rent_date),
        };
        tenants::update_terms(conn, id, &terms)?;
        tenants::find_owned_tenant(conn, session.user_id, id)
    })?;

    info!(tenant_id = id, "tenant terms updated");
    ok_json(&TenantView::new(tenant, today()))
}

/// Removes the tenant's account along with their rental record.
pub fn delete(app: &App, session: &Session, id: i64) -> ResultResp {
    session.require_landlord()?;
    app.db.with_conn(|conn| {
        tenants::find_owned_tenant(conn, session.user_id, id)?;
        users::delete_user(conn, id)
    })?;

    info!(tenant_id = id, landlord_id = session.user_id, "tenant removed");
    no_content()
}
