use http::Method;
use serde_json::json;

use crate::tests::utils::TestApp;

#[test]
fn landlord_manages_own_properties() {
    let t = TestApp::new();
    let token = t.signup_landlord("lana@example.com");
    let id = t.add_property(&token, "Flat 2");

    let (status, list) = t.call(Method::GET, "/api/properties", Some(&token), None);
    assert_eq!(status, 200);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["price"], "950.00");

    let (status, updated) = t.call(
        Method::PUT,
        &format!("/api/properties/{id}"),
        Some(&token),
        Some(json!({ "name": "Flat 2B", "location": "Stockton", "price": "£1,025.5" })),
    );
    assert_eq!(status, 200);
    assert_eq!(updated["name"], "Flat 2B");
    assert_eq!(updated["price"], "1025.50");

    let (status, _) = t.call(Method::DELETE, &format!("/api/properties/{id}"), Some(&token), None);
    assert_eq!(status, 204);
    let (status, _) = t.call(Method::GET, &format!("/api/properties/{id}"), Some(&token), None);
    assert_eq!(status, 404);
}

#[test]
fn other_landlords_property_reads_as_missing() {
    let t = TestApp::new();
    let owner = t.signup_landlord("owner@example.com");
    let id = t.add_property(&owner, "Flat 2");
    let other = t.signup_landlord("other@example.com");

    let (status, _) = t.call(Method::GET, &format!("/api/properties/{id}"), Some(&other), None);
    assert_eq!(status, 404);
    let (status, _) = t.call(Method::DELETE, &format!("/api/properties/{id}"), Some(&other), None);
    assert_eq!(status, 404);

    let (_, list) = t.call(Method::GET, "/api/properties", Some(&other), None);
    assert!(list.as_array().unwrap().is_empty());
}

#[test]
fn property_input_is_validated() {
    let t = TestApp::new();
    let token = t.signup_landlord("lana@example.com");

    let (status, body) = t.call(
        Method::POST,
        "/api/properties",
        Some(&token),
        Some(json!({ "name": "Flat", "location": "Town" })),
    );
    assert_eq!(status, 400);
    assert_eq!(body["error"], "price is required");

    let (status, _) = t.call(
        Method::POST,
        "/api/properties",
        Some(&token),
        Some(json!({ "name": "Flat", "location": "Town", "price": "-5" })),
    );
    assert_eq!(status, 400);

    let (status, _) = t.call(
        Method::POST,
        "/api/properties",
        Some(&token),
        Some(json!({ "name": "Flat", "location": "Town", "price": 500, "images": ["/etc/passwd"] })),
    );
    assert_eq!(status, 400);
}

#[test]
fn tenants_cannot_manage_properties() {
    let t = TestApp::new();
    let (_, property, _, tenant_token) = t.landlord_with_tenant();

    let (status, _) = t.call(Method::GET, "/api/properties", Some(&tenant_token), None);
    assert_eq!(status, 403);
    let (status, _) = t.call(
        Method::DELETE,
        &format!("/api/properties/{property}"),
        Some(&tenant_token),
        None,
    );
    assert_eq!(status, 403);
}

#[test]
fn deleting_a_property_unassigns_its_tenants() {
    let t = TestApp::new();
    let (landlord, property, tenant, _) = t.landlord_with_tenant();

    let (status, _) = t.call(
        Method::DELETE,
        &format!("/api/properties/{property}"),
        Some(&landlord),
        None,
    );
    assert_eq!(status, 204);

    let (status, body) = t.call(Method::GET, &format!("/api/tenants/{tenant}"), Some(&landlord), None);
    assert_eq!(status, 200);
    assert!(body["property_id"].is_null());
}
