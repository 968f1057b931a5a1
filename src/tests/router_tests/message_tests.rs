use http::Method;
use serde_json::json;

use crate::tests::utils::TestApp;

#[test]
fn tenant_and_landlord_exchange_messages() {
    let t = TestApp::new();
    let (landlord, _, tenant, tenant_token) = t.landlord_with_tenant();

    // Tenants can leave the recipient out.
    let (status, sent) = t.call(
        Method::POST,
        "/api/messages",
        Some(&tenant_token),
        Some(json!({ "content": "The tap is leaking again" })),
    );
    assert_eq!(status, 201, "{sent}");
    assert_eq!(sent["sender_id"], tenant);
    assert!(sent["read_at"].is_null());
    let first = sent["id"].as_i64().unwrap();

    let (status, _) = t.call(
        Method::POST,
        "/api/messages",
        Some(&landlord),
        Some(json!({ "recipient_id": tenant, "content": "A plumber is booked for Friday" })),
    );
    assert_eq!(status, 201);

    let (status, thread) = t.call(
        Method::GET,
        &format!("/api/messages?with={tenant}"),
        Some(&landlord),
        None,
    );
    assert_eq!(status, 200);
    let thread = thread.as_array().unwrap().clone();
    assert_eq!(thread.len(), 2);
    assert_eq!(thread[0]["content"], "The tap is leaking again");

    let (_, same) = t.call(Method::GET, "/api/messages", Some(&tenant_token), None);
    assert_eq!(same.as_array().unwrap().len(), 2);

    // Only the recipient can mark a message read.
    let (status, _) = t.call(Method::POST, &format!("/api/messages/{first}/read"), Some(&tenant_token), None);
    assert_eq!(status, 404);
    let (status, _) = t.call(Method::POST, &format!("/api/messages/{first}/read"), Some(&landlord), None);
    assert_eq!(status, 204);

    let (_, thread) = t.call(
        Method::GET,
        &format!("/api/messages?with={tenant}"),
        Some(&landlord),
        None,
    );
    assert!(thread[0]["read_at"].is_i64());
}

#[test]
fn messages_stay_within_a_tenancy() {
    let t = TestApp::new();
    let (landlord, _, tenant, tenant_token) = t.landlord_with_tenant();
    let stranger = t.signup_landlord("stranger@example.com");

    let (status, _) = t.call(
        Method::POST,
        "/api/messages",
        Some(&stranger),
        Some(json!({ "recipient_id": tenant, "content": "Hello" })),
    );
    assert_eq!(status, 403);

    let (status, _) = t.call(
        Method::GET,
        &format!("/api/messages?with={tenant}"),
        Some(&stranger),
        None,
    );
    assert_eq!(status, 403);

    let (status, _) = t.call(
        Method::POST,
        "/api/messages",
        Some(&tenant_token),
        Some(json!({ "recipient_id": tenant + 100, "content": "Hello" })),
    );
    assert_eq!(status, 403);

    let (status, body) = t.call(
        Method::POST,
        "/api/messages",
        Some(&landlord),
        Some(json!({ "content": "Who is this for?" })),
    );
    assert_eq!(status, 400);
    assert_eq!(body["error"], "recipient is required");
}

#[test]
fn message_content_is_required_and_bounded() {
    let t = TestApp::new();
    let (_, _, _, tenant_token) = t.landlord_with_tenant();

    let (status, _) = t.call(
        Method::POST,
        "/api/messages",
        Some(&tenant_token),
        Some(json!({ "content": "   " })),
    );
    assert_eq!(status, 400);

    let (status, _) = t.call(
        Method::POST,
        "/api/messages",
        Some(&tenant_token),
        Some(json!({ "content": "x".repeat(2001) })),
    );
    assert_eq!(status, 400);
}
