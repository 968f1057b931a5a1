use http::Method;
use serde_json::json;

use crate::tests::utils::{TestApp, LANDLORD_PASSWORD};

#[test]
fn health_is_public() {
    let t = TestApp::new();
    let (status, body) = t.call(Method::GET, "/health", None, None);
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
}

#[test]
fn unknown_route_is_json_404() {
    let t = TestApp::new();
    let (status, body) = t.call(Method::GET, "/api/nope", None, None);
    assert_eq!(status, 404);
    assert_eq!(body["error"], "not found");
}

#[test]
fn signup_then_login_then_me() {
    let t = TestApp::new();
    t.signup_landlord("Lana@Example.com");

    let (status, body) = t.call(
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "lana@example.com", "password": LANDLORD_PASSWORD })),
    );
    assert_eq!(status, 200);
    assert_eq!(body["user"]["role"], "landlord");
    assert_eq!(body["must_change_password"], false);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, me) = t.call(Method::GET, "/api/me", Some(&token), None);
    assert_eq!(status, 200);
    assert_eq!(me["email"], "lana@example.com");
    assert_eq!(me["first_name"], "Lana");
}

#[test]
fn signup_rejects_duplicates_and_short_passwords() {
    let t = TestApp::new();
    t.signup_landlord("lana@example.com");

    let (status, _) = t.call(
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({ "first_name": "L", "email": "lana@example.com", "password": "secret1" })),
    );
    assert_eq!(status, 409);

    let (status, body) = t.call(
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({ "first_name": "L", "email": "new@example.com", "password": "12345" })),
    );
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("at least 6"));
}

#[test]
fn wrong_password_and_missing_token_are_401() {
    let t = TestApp::new();
    t.signup_landlord("lana@example.com");

    let (status, body) = t.call(
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "lana@example.com", "password": "wrong-password" })),
    );
    assert_eq!(status, 401);
    assert_eq!(body["error"], "invalid email or password");

    let (status, _) = t.call(Method::GET, "/api/me", None, None);
    assert_eq!(status, 401);
    let (status, _) = t.call(Method::GET, "/api/me", Some("garbage"), None);
    assert_eq!(status, 401);
}

#[test]
fn logout_revokes_the_session() {
    let t = TestApp::new();
    let token = t.signup_landlord("lana@example.com");

    let (status, _) = t.call(Method::POST, "/api/auth/logout", Some(&token), None);
    assert_eq!(status, 204);

    let (status, _) = t.call(Method::GET, "/api/me", Some(&token), None);
    assert_eq!(status, 401);
}

#[test]
fn tenant_first_login_then_change_password() {
    let t = TestApp::new();
    let (_, _, tenant_id, _) = t.landlord_with_tenant();
    t.set_password(tenant_id, "olivia1234");

    let login = |pw: &str| {
        t.call(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "olivia@example.com", "password": pw })),
        )
    };

    let (status, body) = login("olivia1234");
    assert_eq!(status, 200);
    assert_eq!(body["must_change_password"], true);
    let token = body["token"].as_str().unwrap().to_string();
    let (_, other) = login("olivia1234");
    let other_token = other["token"].as_str().unwrap().to_string();

    let (status, _) = t.call(
        Method::POST,
        "/api/auth/password",
        Some(&token),
        Some(json!({ "current_password": "nope-nope", "new_password": "brand-new-pw" })),
    );
    assert_eq!(status, 401);

    let (status, _) = t.call(
        Method::POST,
        "/api/auth/password",
        Some(&token),
        Some(json!({ "current_password": "olivia1234", "new_password": "brand-new-pw" })),
    );
    assert_eq!(status, 200);

    // This device stays signed in, the other one is signed out.
    let (status, me) = t.call(Method::GET, "/api/me", Some(&token), None);
    assert_eq!(status, 200);
    assert_eq!(me["must_change_password"], false);
    let (status, _) = t.call(Method::GET, "/api/me", Some(&other_token), None);
    assert_eq!(status, 401);

    let (status, _) = login("brand-new-pw");
    assert_eq!(status, 200);
}

#[test]
fn password_reset_by_email_link() {
    let t = TestApp::new();
    let token = t.signup_landlord("lana@example.com");

    let (status, body) = t.call(
        Method::POST,
        "/api/auth/password-reset",
        None,
        Some(json!({ "email": "lana@example.com" })),
    );
    assert_eq!(status, 200);
    let message = body["message"].clone();

    let email = t.mailer.last();
    assert_eq!(email.to, "lana@example.com");
    assert!(email.html.contains("This link expires in 30 minutes"));
    let link_start = email.html.find("/reset-password?token=").unwrap();
    let reset_token: String = email.html[link_start + "/reset-password?token=".len()..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    let (status, _) = t.call(
        Method::POST,
        "/api/auth/password-reset/confirm",
        None,
        Some(json!({ "token": reset_token, "new_password": "reset-pass-1" })),
    );
    assert_eq!(status, 200);

    // Old sessions are gone, the new password works, the link is spent.
    let (status, _) = t.call(Method::GET, "/api/me", Some(&token), None);
    assert_eq!(status, 401);
    let (status, _) = t.call(
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "lana@example.com", "password": "reset-pass-1" })),
    );
    assert_eq!(status, 200);
    let (status, _) = t.call(
        Method::POST,
        "/api/auth/password-reset/confirm",
        None,
        Some(json!({ "token": reset_token, "new_password": "reset-pass-2" })),
    );
    assert_eq!(status, 401);

    // Unknown addresses get the same answer and no email.
    let before = t.mailer.emails().len();
    let (status, body) = t.call(
        Method::POST,
        "/api/auth/password-reset",
        None,
        Some(json!({ "email": "nobody@example.com" })),
    );
    assert_eq!(status, 200);
    assert_eq!(body["message"], message);
    assert_eq!(t.mailer.emails().len(), before);
}

#[test]
fn profile_update_keeps_unset_fields() {
    let t = TestApp::new();
    let token = t.signup_landlord("lana@example.com");

    let (status, me) = t.call(
        Method::PUT,
        "/api/me",
        Some(&token),
        Some(json!({ "address": "1 High St", "phone": "01642 123456" })),
    );
    assert_eq!(status, 200);
    assert_eq!(me["address"], "1 High St");
    assert_eq!(me["phone"], "01642 123456");
    assert_eq!(me["first_name"], "Lana");

    let (status, _) = t.call(
        Method::PUT,
        "/api/me",
        Some(&token),
        Some(json!({ "profile_image": "../../etc/passwd" })),
    );
    assert_eq!(status, 400);
}
