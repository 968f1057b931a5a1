// src/handlers/dashboard.rs
use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;
use serde::Serialize;

use crate::app::{today, App};
use crate::auth::Session;
use crate::db::{messages, payments, properties, requests, tenants, users};
use crate::domain::models::{RequestStatus, Role};
use crate::domain::money::Pence;
use crate::domain::rent::{RentStatus, RentStatusView};
use crate::errors::ServerError;
use crate::responses::{ok_json, ResultResp};

#[derive(Serialize)]
struct PropertySummary {
    id: i64,
    name: String,
    location: String,
}

#[derive(Serialize)]
struct LandlordContact {
    id: i64,
    name: String,
    email: String,
    phone: String,
}

/// The tenant's "My Rent" screen.
#[derive(Serialize)]
struct MyRent {
    property: Option<PropertySummary>,
    rent: Pence,
    rent_start_date: Option<NaiveDate>,
    next_rent_date: Option<NaiveDate>,
    rent_status: RentStatusView,
    landlord: Option<LandlordContact>,
}

fn my_rent(conn: &Connection, tenant_id: i64, today: NaiveDate) -> Result<MyRent, ServerError> {
    let tenancy = tenants::find_tenant(conn, tenant_id)?.ok_or(ServerError::NotFound)?;

    let property = match tenancy.property_id {
        Some(pid) => properties::find_property(conn, pid)?.map(|p| PropertySummary {
            id: p.id,
            name: p.name,
            location: p.location,
        }),
        None => None,
    };
    let landlord = users::find_user(conn, tenancy.landlord_id)?.map(|u| LandlordContact {
        id: u.id,
        name: u.full_name(),
        email: u.email,
        phone: u.phone,
    });

    Ok(MyRent {
        property,
        rent: tenancy.rent,
        rent_start_date: tenancy.rent_start_date,
        next_rent_date: tenancy.next_rent_date,
        rent_status: RentStatus::classify(tenancy.next_rent_date, today).view(),
        landlord,
    })
}

pub fn rent(app: &App, session: &Session) -> ResultResp {
    session.require_tenant()?;
    let today = today();
    let rent = app
        .db
        .with_conn(|conn| my_rent(conn, session.user_id, today))?;
    ok_json(&rent)
}

/// Unix bounds of the calendar month containing `day`, taken at UTC midnight.
pub fn month_bounds(day: NaiveDate) -> (i64, i64) {
    let start = NaiveDate::from_ymd_opt(day.year(), day.month(), 1).unwrap_or(day);
    let end = start
        .checked_add_months(chrono::Months::new(1))
        .unwrap_or(start);
    let ts = |d: NaiveDate| d.and_hms_opt(0, 0, 0).map_or(0, |dt| dt.and_utc().timestamp());
    (ts(start), ts(end))
}

#[derive(Serialize)]
struct LandlordDashboard {
    role: Role,
    properties: i64,
    tenants: usize,
    pending_requests: i64,
    overdue_tenants: usize,
    collected_this_month: Pence,
    unread_messages: i64,
}

#[derive(Serialize)]
struct TenantDashboard {
    role: Role,
    rent: MyRent,
    open_requests: usize,
    unread_messages: i64,
}

pub fn dashboard(app: &App, session: &Session) -> ResultResp {
    let today = today();

    match session.role {
        Role::Landlord => {
            let (from, to) = month_bounds(today);
            let view = app.db.with_conn(|conn| {
                let all = tenants::list_tenants(conn, session.user_id)?;
                let overdue = all
                    .iter()
                    .filter(|t| {
                        matches!(
                            RentStatus::classify(t.next_rent_date, today),
                            RentStatus::Overdue { .. }
                        )
                    })
                    .count();

                Ok(LandlordDashboard {
                    role: Role::Landlord,
                    properties: properties::count_properties(conn, session.user_id)?,
                    tenants: all.len(),
                    pending_requests: requests::count_for_landlord(
                        conn,
                        session.user_id,
                        RequestStatus::Pending,
                    )?,
                    overdue_tenants: overdue,
                    collected_this_month: payments::collected_between(
                        conn,
                        session.user_id,
                        from,
                        to,
                    )?,
                    unread_messages: messages::unread_count(conn, session.user_id)?,
                })
            })?;
            ok_json(&view)
        }
        Role::Tenant => {
            let view = app.db.with_conn(|conn| {
                let open = requests::list_for_tenant(conn, session.user_id)?
                    .iter()
                    .filter(|r| r.status != RequestStatus::Resolved)
                    .count();
                Ok(TenantDashboard {
                    role: Role::Tenant,
                    rent: my_rent(conn, session.user_id, today)?,
                    open_requests: open,
                    unread_messages: messages::unread_count(conn, session.user_id)?,
                })
            })?;
            ok_json(&view)
        }
    }
}
