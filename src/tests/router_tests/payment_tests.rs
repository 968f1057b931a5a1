use http::{Method, Request};
use serde_json::json;

use crate::tests::utils::{local_uri, read_body, TestApp};

fn card() -> serde_json::Value {
    json!({ "card_number": "4242 4242 4242 4242", "expiry": "12/29", "cvv": "123" })
}

#[test]
fn paying_rent_advances_due_date_and_emails_receipt() {
    let t = TestApp::new();
    let (_, _, tenant, tenant_token) = t.landlord_with_tenant();

    let (status, body) = t.call(Method::POST, "/api/payments", Some(&tenant_token), Some(card()));
    assert_eq!(status, 201, "{body}");
    assert_eq!(body["next_rent_date"], "2025-04-01");
    assert_eq!(body["receipt_sent"], true);
    assert_eq!(body["payment"]["status"], "Paid");
    assert_eq!(body["payment"]["amount"], "950.00");
    assert_eq!(body["payment"]["tenant_id"], tenant);
    let payment_id = body["payment"]["id"].as_i64().unwrap();

    let email = t.mailer.last();
    assert_eq!(email.to, "olivia@example.com");
    assert_eq!(email.subject, "RentWave Payment Receipt");
    assert_eq!(email.attachments.len(), 1);
    assert_eq!(email.attachments[0].filename, format!("rent-receipt-{payment_id}.pdf"));
    assert!(email.attachments[0].content.starts_with(b"%PDF"));

    // The stored receipt is reachable through its signed link.
    let url = body["payment"]["receipt_url"].as_str().unwrap();
    assert!(email.html.contains(&url.replace('&', "&amp;")));
    let resp = t.send(
        Request::builder()
            .uri(local_uri(url))
            .body(astra::Body::empty())
            .unwrap(),
    );
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["Content-Type"], "application/pdf");
    assert!(read_body(resp).starts_with(b"%PDF"));

    let (_, rent) = t.call(Method::GET, "/api/rent", Some(&tenant_token), None);
    assert_eq!(rent["next_rent_date"], "2025-04-01");
}

#[test]
fn bad_card_records_nothing() {
    let t = TestApp::new();
    let (landlord, _, _, tenant_token) = t.landlord_with_tenant();

    let (status, body) = t.call(
        Method::POST,
        "/api/payments",
        Some(&tenant_token),
        Some(json!({ "card_number": "4242", "expiry": "13/29", "cvv": "12" })),
    );
    assert_eq!(status, 400);
    assert_eq!(body["error"], "invalid card details");

    let (_, list) = t.call(Method::GET, "/api/payments", Some(&landlord), None);
    assert!(list.as_array().unwrap().is_empty());
    let (_, rent) = t.call(Method::GET, "/api/rent", Some(&tenant_token), None);
    assert_eq!(rent["next_rent_date"], "2025-03-01");
}

#[test]
fn landlords_cannot_pay_rent() {
    let t = TestApp::new();
    let (landlord, _, _, _) = t.landlord_with_tenant();
    let (status, _) = t.call(Method::POST, "/api/payments", Some(&landlord), Some(card()));
    assert_eq!(status, 403);
}

#[test]
fn receipt_failure_keeps_the_payment() {
    let t = TestApp::new();
    let (landlord, _, _, tenant_token) = t.landlord_with_tenant();
    t.mailer.set_failing(true);

    let (status, body) = t.call(Method::POST, "/api/payments", Some(&tenant_token), Some(card()));
    assert_eq!(status, 201);
    assert_eq!(body["receipt_sent"], false);
    let payment_id = body["payment"]["id"].as_i64().unwrap();

    // Resending through the explicit endpoint reports the outage.
    let (status, _) = t.call(
        Method::POST,
        &format!("/api/payments/{payment_id}/receipt"),
        Some(&landlord),
        None,
    );
    assert_eq!(status, 500);

    t.mailer.set_failing(false);
    let (status, body) = t.call(
        Method::POST,
        &format!("/api/payments/{payment_id}/receipt"),
        Some(&landlord),
        None,
    );
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert!(body["receipt_url"].as_str().unwrap().contains("/files/receipts/"));
}

#[test]
fn payments_are_scoped_to_their_parties() {
    let t = TestApp::new();
    let (landlord, property, _, tenant_token) = t.landlord_with_tenant();
    let (_, body) = t.call(Method::POST, "/api/payments", Some(&tenant_token), Some(card()));
    let payment_id = body["payment"]["id"].as_i64().unwrap();

    let second = t.onboard_tenant(&landlord, "second@example.com", property);
    let second_token = t.session_for(second);
    let other_landlord = t.signup_landlord("other@example.com");

    for token in [&second_token, &other_landlord] {
        let (status, _) = t.call(Method::GET, &format!("/api/payments/{payment_id}"), Some(token), None);
        assert_eq!(status, 404);
        let (status, _) = t.call(
            Method::POST,
            &format!("/api/payments/{payment_id}/receipt"),
            Some(token),
            None,
        );
        assert_eq!(status, 404);
    }

    let (_, mine) = t.call(Method::GET, "/api/payments", Some(&second_token), None);
    assert!(mine.as_array().unwrap().is_empty());

    let (status, list) = t.call(Method::GET, "/api/payments", Some(&landlord), None);
    assert_eq!(status, 200);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["tenant_name"], "Olivia Smith");
}

#[test]
fn landlord_exports_payments_as_xlsx() {
    let t = TestApp::new();
    let (landlord, _, _, tenant_token) = t.landlord_with_tenant();
    t.call(Method::POST, "/api/payments", Some(&tenant_token), Some(card()));

    let resp = t.send(
        Request::builder()
            .uri("/api/payments/export")
            .header("Authorization", format!("Bearer {landlord}"))
            .body(astra::Body::empty())
            .unwrap(),
    );
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()["Content-Type"],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert!(resp.headers()["Content-Disposition"]
        .to_str()
        .unwrap()
        .contains("payments_"));
    assert!(read_body(resp).starts_with(b"PK"));

    let (status, _) = t.call(Method::GET, "/api/payments/export", Some(&tenant_token), None);
    assert_eq!(status, 403);
}

#[test]
fn landlord_dashboard_counts_collected_rent() {
    let t = TestApp::new();
    let (landlord, _, _, tenant_token) = t.landlord_with_tenant();
    t.call(Method::POST, "/api/payments", Some(&tenant_token), Some(card()));

    let (status, dash) = t.call(Method::GET, "/api/dashboard", Some(&landlord), None);
    assert_eq!(status, 200);
    assert_eq!(dash["role"], "landlord");
    assert_eq!(dash["properties"], 1);
    assert_eq!(dash["tenants"], 1);
    assert_eq!(dash["collected_this_month"], "950.00");

    let (status, dash) = t.call(Method::GET, "/api/dashboard", Some(&tenant_token), None);
    assert_eq!(status, 200);
    assert_eq!(dash["role"], "tenant");
    assert_eq!(dash["rent"]["next_rent_date"], "2025-04-01");
}

#[test]
fn concurrent_payments_each_advance_the_due_date() {
    let t = TestApp::new();
    let (landlord, _, _, tenant_token) = t.landlord_with_tenant();

    let statuses: Vec<u16> = std::thread::scope(|s| {
        let submits: Vec<_> = (0..2)
            .map(|_| {
                s.spawn(|| {
                    t.call(Method::POST, "/api/payments", Some(&tenant_token), Some(card()))
                        .0
                })
            })
            .collect();
        submits.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(statuses, vec![201, 201]);

    let (_, list) = t.call(Method::GET, "/api/payments", Some(&landlord), None);
    assert_eq!(list.as_array().unwrap().len(), 2);
    let (_, rent) = t.call(Method::GET, "/api/rent", Some(&tenant_token), None);
    assert_eq!(rent["next_rent_date"], "2025-05-01");
}
