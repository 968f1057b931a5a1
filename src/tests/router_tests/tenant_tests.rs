use http::Method;
use serde_json::json;

use crate::auth::password::verify_password;
use crate::db::users;
use crate::tests::utils::TestApp;

fn user_count(t: &TestApp) -> i64 {
    t.app
        .db
        .with_conn(|conn| Ok(conn.query_row("select count(*) from users", [], |r| r.get(0))?))
        .unwrap()
}

#[test]
fn onboarding_creates_tenant_and_emails_temp_password() {
    let t = TestApp::new();
    let landlord = t.signup_landlord("lana@example.com");
    let property = t.add_property(&landlord, "Flat 2");

    let (status, body) = t.call(
        Method::POST,
        "/api/tenants",
        Some(&landlord),
        Some(json!({
            "email": " Olivia@Example.com ",
            "first_name": "Olivia",
            "last_name": "Smith",
            "phone": "07700 900123",
            "property_id": property,
            "rent_amount": "850",
            "rent_start_date": "31 Jan 2025",
        })),
    );
    assert_eq!(status, 201, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["email_sent"], true);
    let tenant_id = body["tenant_id"].as_i64().unwrap();

    let email = t.mailer.last();
    assert_eq!(email.to, "olivia@example.com");
    assert_eq!(email.subject, "RentWave Tenant Login Details");

    // The emailed password is the one stored (hashed) on the account.
    let marker = "Password: </strong>";
    let at = email.html.find(marker).unwrap() + marker.len();
    let temp: String = email.html[at..]
        .chars()
        .take_while(char::is_ascii_alphanumeric)
        .collect();
    assert!(temp.starts_with("olivia"));
    assert!(temp.len() >= 6);
    let hash = t
        .app
        .db
        .with_conn(|conn| users::password_hash(conn, tenant_id))
        .unwrap();
    assert!(verify_password(&temp, &hash).unwrap());

    let (status, tenant) = t.call(Method::GET, &format!("/api/tenants/{tenant_id}"), Some(&landlord), None);
    assert_eq!(status, 200);
    assert_eq!(tenant["rent"], "850.00");
    assert_eq!(tenant["rent_start_date"], "2025-01-31");
    // Start date plus one month, clamped to February's end.
    assert_eq!(tenant["next_rent_date"], "2025-02-28");
    assert_eq!(tenant["property_name"], "Flat 2");
    assert_eq!(tenant["rent_status"]["kind"], "overdue");
}

#[test]
fn duplicate_email_is_conflict_and_writes_nothing() {
    let t = TestApp::new();
    let (landlord, property, _, _) = t.landlord_with_tenant();
    let users_before = user_count(&t);
    let emails_before = t.mailer.emails().len();

    let (status, body) = t.call(
        Method::POST,
        "/api/tenants",
        Some(&landlord),
        Some(json!({ "email": "olivia@example.com", "property_id": property })),
    );
    assert_eq!(status, 409);
    assert_eq!(body["error"], "email already registered");
    assert_eq!(user_count(&t), users_before);
    assert_eq!(t.mailer.emails().len(), emails_before);

    let (_, list) = t.call(Method::GET, "/api/tenants", Some(&landlord), None);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[test]
fn email_outage_still_creates_the_tenant() {
    let t = TestApp::new();
    let landlord = t.signup_landlord("lana@example.com");
    let property = t.add_property(&landlord, "Flat 2");
    t.mailer.set_failing(true);

    let (status, body) = t.call(
        Method::POST,
        "/api/tenants",
        Some(&landlord),
        Some(json!({ "email": "olivia@example.com", "first_name": "Olivia", "property_id": property })),
    );
    assert_eq!(status, 201);
    assert_eq!(body["email_sent"], false);

    let tenant_id = body["tenant_id"].as_i64().unwrap();
    let (status, tenant) = t.call(Method::GET, &format!("/api/tenants/{tenant_id}"), Some(&landlord), None);
    assert_eq!(status, 200);
    // No rent given: the property's price is used.
    assert_eq!(tenant["rent"], "950.00");
}

#[test]
fn onboarding_requires_email_and_own_property() {
    let t = TestApp::new();
    let landlord = t.signup_landlord("lana@example.com");
    let property = t.add_property(&landlord, "Flat 2");
    let other = t.signup_landlord("other@example.com");

    let (status, body) = t.call(
        Method::POST,
        "/api/tenants",
        Some(&landlord),
        Some(json!({ "property_id": property })),
    );
    assert_eq!(status, 400);
    assert_eq!(body["error"], "email is required");

    let (status, body) = t.call(
        Method::POST,
        "/api/tenants",
        Some(&landlord),
        Some(json!({ "email": "x@example.com" })),
    );
    assert_eq!(status, 400);
    assert_eq!(body["error"], "property id is required");

    let (status, _) = t.call(
        Method::POST,
        "/api/tenants",
        Some(&other),
        Some(json!({ "email": "x@example.com", "property_id": property })),
    );
    assert_eq!(status, 404);

    let (status, _) = t.call(
        Method::POST,
        "/api/tenants",
        Some(&landlord),
        Some(json!({ "email": "x@example.com", "property_id": property, "next_rent_date": "someday" })),
    );
    assert_eq!(status, 400);
    assert_eq!(user_count(&t), 2);
}

#[test]
fn landlord_updates_and_removes_tenant() {
    let t = TestApp::new();
    let (landlord, _, tenant, tenant_token) = t.landlord_with_tenant();

    let (status, body) = t.call(
        Method::PUT,
        &format!("/api/tenants/{tenant}"),
        Some(&landlord),
        Some(json!({ "rent_amount": "1000", "next_rent_date": "Fri Jan 31 00:00:00 GMT 2025" })),
    );
    assert_eq!(status, 200);
    assert_eq!(body["rent"], "1000.00");
    assert_eq!(body["next_rent_date"], "2025-01-31");
    assert_eq!(body["rent_start_date"], "2025-01-01");

    let other = t.signup_landlord("other@example.com");
    let (status, _) = t.call(Method::DELETE, &format!("/api/tenants/{tenant}"), Some(&other), None);
    assert_eq!(status, 404);

    let (status, _) = t.call(Method::DELETE, &format!("/api/tenants/{tenant}"), Some(&landlord), None);
    assert_eq!(status, 204);
    let (status, _) = t.call(Method::GET, "/api/rent", Some(&tenant_token), None);
    assert_eq!(status, 401);
}

#[test]
fn tenant_sees_my_rent() {
    let t = TestApp::new();
    let (_, _, _, tenant_token) = t.landlord_with_tenant();

    let (status, rent) = t.call(Method::GET, "/api/rent", Some(&tenant_token), None);
    assert_eq!(status, 200);
    assert_eq!(rent["property"]["name"], "Flat 2");
    assert_eq!(rent["rent"], "950.00");
    assert_eq!(rent["next_rent_date"], "2025-03-01");
    assert_eq!(rent["landlord"]["email"], "landlord@example.com");
    assert!(rent["rent_status"]["label"].is_string());
}
