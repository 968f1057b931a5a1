// src/functions/onboarding.rs
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::app::App;
use crate::auth::password::{generate_temp_password, hash_password};
use crate::auth::Session;
use crate::db::properties::find_owned_property;
use crate::db::tenants::{insert_tenant, TenantTerms};
use crate::db::users::{insert_user, NewUser};
use crate::domain::dates::{add_one_month, parse_date_field};
use crate::domain::models::Role;
use crate::domain::money::Pence;
use crate::domain::validation::{check_phone, normalize_email};
use crate::errors::ServerError;
use crate::mailer::Email;
use crate::templates::emails::{onboarding_email, OnboardingEmail, ONBOARDING_SUBJECT};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTenantInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    pub property_id: Option<i64>,
    /// Falls back to the property's listed price.
    pub rent_amount: Option<Pence>,
    pub rent_start_date: Option<String>,
    pub next_rent_date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateTenantOutcome {
    pub success: bool,
    pub tenant_id: i64,
    pub email_sent: bool,
}

/// Creates the tenant's login and rental record, then emails them a
/// temporary password. The email is best effort; the account stands either way.
pub fn create_tenant(
    app: &App,
    landlord: &Session,
    input: &CreateTenantInput,
    today: NaiveDate,
    now: i64,
) -> Result<CreateTenantOutcome, ServerError> {
    landlord.require_landlord()?;

    if input.email.trim().is_empty() {
        return Err(ServerError::BadRequest("email is required".into()));
    }
    let email = normalize_email(&input.email)?;
    let property_id = input
        .property_id
        .ok_or_else(|| ServerError::BadRequest("property id is required".into()))?;
    check_phone(&input.phone)?;

    let start = parse_date_field("rent start date", input.rent_start_date.as_deref())?
        .unwrap_or(today);
    let next = parse_date_field("next rent date", input.next_rent_date.as_deref())?
        .unwrap_or_else(|| add_one_month(start));

    let first_name = input.first_name.trim().to_string();
    let last_name = input.last_name.trim().to_string();

    let temp_password = generate_temp_password(&mut rand::thread_rng(), &first_name);
    let hash = hash_password(&temp_password)?;

    let new_user = NewUser {
        email: email.clone(),
        first_name: first_name.clone(),
        last_name: last_name.clone(),
        phone: input.phone.trim().to_string(),
        role: Role::Tenant,
        sex: None,
        dob: None,
        address: None,
        must_change_password: true,
    };

    let tenant_id = app.db.with_conn(|conn| {
        let property = find_owned_property(conn, landlord.user_id, property_id)?;
        let terms = TenantTerms {
            property_id: Some(property.id),
            rent: input.rent_amount.unwrap_or(property.price),
            rent_start_date: Some(start),
            next_rent_date: Some(next),
        };

        let tx = conn.transaction()?;
        let user_id = insert_user(&tx, &new_user, &hash, now)?;
        insert_tenant(&tx, user_id, landlord.user_id, &terms, now)?;
        tx.commit()?;
        Ok(user_id)
    })?;

    info!(tenant_id, landlord_id = landlord.user_id, "tenant onboarded");

    let html = onboarding_email(&OnboardingEmail {
        first_name: &first_name,
        last_name: &last_name,
        email: &email,
        temp_password: &temp_password,
        year: today.year(),
    });

    let email_sent = match app
        .mailer
        .send(&Email::new(&email, ONBOARDING_SUBJECT, html.into_string()))
    {
        Ok(()) => true,
        Err(e) => {
            warn!(tenant_id, error = %e, "onboarding email not sent");
            false
        }
    };

    Ok(CreateTenantOutcome {
        success: true,
        tenant_id,
        email_sent,
    })
}
