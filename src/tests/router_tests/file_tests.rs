use astra::Body;
use http::Request;
use serde_json::Value;

use crate::app::now_unix;
use crate::tests::utils::{local_uri, read_body, TestApp};

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nnot really an image";

fn upload(t: &TestApp, token: &str, content_type: &str, bytes: &[u8]) -> (u16, Value) {
    let resp = t.send(
        Request::builder()
            .method("POST")
            .uri("/api/uploads/property")
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", content_type)
            .body(Body::from(bytes.to_vec()))
            .unwrap(),
    );
    let status = resp.status().as_u16();
    (status, serde_json::from_slice(&read_body(resp)).unwrap())
}

fn get(t: &TestApp, uri: &str) -> (u16, Vec<u8>) {
    let resp = t.send(Request::builder().uri(uri).body(Body::empty()).unwrap());
    (resp.status().as_u16(), read_body(resp))
}

#[test]
fn upload_then_download_through_signed_link() {
    let t = TestApp::new();
    let token = t.signup_landlord("lana@example.com");

    let (status, body) = upload(&t, &token, "image/png", PNG);
    assert_eq!(status, 201, "{body}");
    let path = body["path"].as_str().unwrap();
    assert!(path.starts_with("uploads/property/"));
    assert!(path.ends_with(".png"));

    let (status, bytes) = get(&t, &local_uri(body["url"].as_str().unwrap()));
    assert_eq!(status, 200);
    assert_eq!(bytes, PNG);
}

#[test]
fn uploaded_images_show_up_on_the_property() {
    let t = TestApp::new();
    let token = t.signup_landlord("lana@example.com");
    let (_, body) = upload(&t, &token, "image/png", PNG);
    let path = body["path"].as_str().unwrap().to_string();

    let (status, property) = t.call(
        http::Method::POST,
        "/api/properties",
        Some(&token),
        Some(serde_json::json!({
            "name": "Flat 3", "location": "Leeds", "price": 700, "images": [path.clone()],
        })),
    );
    assert_eq!(status, 201);
    assert_eq!(property["images"][0], path.as_str());
    let url = property["image_urls"][0].as_str().unwrap();
    let (status, bytes) = get(&t, &local_uri(url));
    assert_eq!(status, 200);
    assert_eq!(bytes, PNG);
}

#[test]
fn tampered_or_expired_links_are_refused() {
    let t = TestApp::new();
    let token = t.signup_landlord("lana@example.com");
    let (_, body) = upload(&t, &token, "image/png", PNG);
    let path = body["path"].as_str().unwrap();
    let url = local_uri(body["url"].as_str().unwrap());

    let (_, sig) = url.split_once("&sig=").unwrap();
    let forged = url.replace(sig, "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");
    assert_eq!(get(&t, &forged).0, 403);

    let other_file = url.replace(".png", ".jpg");
    assert_eq!(get(&t, &other_file).0, 403);

    let stale = t.app.files.signed_url(path, now_unix() - 7200).unwrap();
    assert_eq!(get(&t, &local_uri(&stale)).0, 403);

    assert_eq!(get(&t, &format!("/files/{path}")).0, 403);
}

#[test]
fn uploads_are_checked_for_type_and_size() {
    let t = TestApp::new();
    let token = t.signup_landlord("lana@example.com");

    let (status, _) = upload(&t, &token, "text/html", b"<script></script>");
    assert_eq!(status, 400);

    let (status, body) = upload(&t, &token, "image/png", &[0u8; 1025]);
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("1024"));

    let (status, _) = upload(&t, &token, "application/pdf", b"%PDF-1.4 tiny");
    assert_eq!(status, 201);

    let resp = t.send(
        Request::builder()
            .method("POST")
            .uri("/api/uploads/property")
            .header("Content-Type", "image/png")
            .body(Body::from(PNG.to_vec()))
            .unwrap(),
    );
    assert_eq!(resp.status(), 401);
}
