//! Router tests against in-memory services.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use designo_core::{Category, MediaAsset, MediaKind};
use designo_media::{
    EmailMessage, IdentityProvider, Mailer, MediaResult, MemoryStore, SiteConfig, User,
};
use designo_site::{router, AppState};

// =============================================================================
// Fakes
// =============================================================================

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> MediaResult<String> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(message.clone());
        Ok(format!("msg-{}", sent.len()))
    }
}

/// Accepts exactly one token.
struct StaticIdentity;

const TOKEN: &str = "owner-token";

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_user(&self, token: Option<&str>) -> Option<User> {
        (token == Some(TOKEN)).then(|| User {
            id: "user_1".into(),
            first_name: Some("Ana".into()),
            email: Some("ana@example.com".into()),
        })
    }
}

fn asset(n: i64) -> MediaAsset {
    MediaAsset {
        public_id: format!("weddings/{n:03}"),
        secure_url: format!("https://res.example.com/weddings/{n:03}.jpg"),
        format: "jpg".into(),
        width: 1200,
        height: 800,
        kind: MediaKind::Image,
        created_at: Utc::now() - Duration::minutes(n),
    }
}

struct Harness {
    app: Router,
    mailer: Arc<RecordingMailer>,
}

fn harness_with(config: SiteConfig, with_mailer: bool) -> Harness {
    let store = Arc::new(MemoryStore::with_assets(
        (0..5).map(|n| (Category::Weddings, asset(n))),
    ));
    let mailer = Arc::new(RecordingMailer::default());
    let state = AppState::new(
        config,
        store,
        with_mailer.then(|| mailer.clone() as Arc<dyn Mailer>),
        Arc::new(StaticIdentity),
    );
    Harness {
        app: router(state),
        mailer,
    }
}

fn harness() -> Harness {
    harness_with(SiteConfig::default(), true)
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn get(app: &Router, uri: &str) -> Response {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// =============================================================================
// Health / locale
// =============================================================================

#[tokio::test]
async fn test_health() {
    let h = harness();
    let response = get(&h.app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_root_redirects_to_negotiated_locale() {
    let h = harness();
    let request = Request::get("/")
        .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .body(Body::empty())
        .unwrap();
    let response = send(&h.app, request).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/en/");

    let response = get(&h.app, "/gallery?x=1").await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/hr/gallery?x=1");
}

#[tokio::test]
async fn test_localized_and_api_paths_are_not_redirected() {
    let h = harness();
    assert_eq!(get(&h.app, "/hr/unknown").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(&h.app, "/api/unknown").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_translations_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("en")).unwrap();
    std::fs::write(
        dir.path().join("en").join("common.json"),
        r#"{"home":{"title":"Photo studio"}}"#,
    )
    .unwrap();

    let mut config = SiteConfig::default();
    config.locales.directory = dir.path().to_path_buf();
    let h = harness_with(config, true);

    let response = get(&h.app, "/en/translations").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["home"]["title"], "Photo studio");

    // Missing bundle and unsupported locale both fall back.
    let response = get(&h.app, "/hr/translations").await;
    assert_eq!(body_json(response).await["home"]["title"], "Welcome");
    let response = get(&h.app, "/de/translations").await;
    assert_eq!(body_json(response).await["home"]["title"], "Welcome");
}

// =============================================================================
// Gallery
// =============================================================================

#[tokio::test]
async fn test_categories() {
    let h = harness();
    let response = get(&h.app, "/api/categories").await;
    assert_eq!(response.status(), StatusCode::OK);
    let folders = body_json(response).await;
    assert!(folders.as_array().unwrap().contains(&json!("weddings")));
}

#[tokio::test]
async fn test_gallery_unknown_category() {
    let h = harness();
    let response = get(&h.app, "/api/gallery?category=portraits").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["status"], 400);
}

#[tokio::test]
async fn test_gallery_pages() {
    let h = harness();
    let response = get(&h.app, "/api/gallery?category=weddings&limit=2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert_eq!(page["assets"].as_array().unwrap().len(), 2);
    assert_eq!(page["assets"][0]["public_id"], "weddings/000");
    assert_eq!(page["total_count"], 5);

    let cursor = page["next_cursor"].as_str().unwrap().to_string();
    let uri = format!("/api/gallery?category=weddings&limit=10&cursor={cursor}");
    let page = body_json(get(&h.app, &uri).await).await;
    assert_eq!(page["assets"].as_array().unwrap().len(), 3);
    assert!(page["next_cursor"].is_null());
}

#[tokio::test]
async fn test_delete_requires_sign_in() {
    let h = harness();
    let request = Request::delete("/api/gallery/weddings/001")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&h.app, request).await.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_removes_asset() {
    let h = harness();
    let request = Request::delete("/api/gallery/weddings/001?kind=image")
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap();
    let response = send(&h.app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "success": true, "public_id": "weddings/001" })
    );

    let page = body_json(get(&h.app, "/api/gallery?category=weddings").await).await;
    assert_eq!(page["total_count"], 4);

    // A second delete of the same id is reported upstream.
    let request = Request::delete("/api/gallery/weddings/001")
        .header(header::COOKIE, format!("__session={TOKEN}"))
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&h.app, request).await.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_upload() {
    let h = harness();
    let upload = |content_type: &str, auth: bool| {
        let mut builder = Request::post("/api/upload?category=newborn")
            .header(header::CONTENT_TYPE, content_type)
            .header("x-file-name", "baby.jpg");
        if auth {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {TOKEN}"));
        }
        builder.body(Body::from(vec![1u8; 64])).unwrap()
    };

    assert_eq!(
        send(&h.app, upload("image/jpeg", false)).await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        send(&h.app, upload("application/pdf", true)).await.status(),
        StatusCode::BAD_REQUEST
    );

    let response = send(&h.app, upload("image/jpeg", true)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let asset = body_json(response).await;
    assert!(asset["public_id"].as_str().unwrap().starts_with("newborn/"));

    let page = body_json(get(&h.app, "/api/gallery?category=newborn").await).await;
    assert_eq!(page["total_count"], 1);
}

// =============================================================================
// Contact / session
// =============================================================================

#[tokio::test]
async fn test_contact_rejects_invalid_form() {
    let h = harness();
    let response = send(
        &h.app,
        post_json(
            "/api/contact",
            json!({ "name": "A", "email": "nope", "message": "short" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["fields"].as_array().unwrap().len(), 3);
    assert!(h.mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_contact_sends_email() {
    let h = harness();
    let response = send(
        &h.app,
        post_json(
            "/api/contact",
            json!({
                "name": "Ivana",
                "email": "ivana@example.com",
                "message": "We are getting married in June."
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "success": true }));

    let sent = h.mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Nova prijava obrasca od Ivana");
    assert_eq!(sent[0].to, vec!["fotovideo.designo@gmail.com".to_string()]);
}

#[tokio::test]
async fn test_contact_without_mailer() {
    let h = harness_with(SiteConfig::default(), false);
    let response = send(
        &h.app,
        post_json(
            "/api/contact",
            json!({
                "name": "Ivana",
                "email": "ivana@example.com",
                "message": "We are getting married in June."
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_me() {
    let h = harness();
    let body = body_json(get(&h.app, "/api/me").await).await;
    assert_eq!(body["signed_in"], false);
    assert!(body.get("first_name").is_none());

    let request = Request::get("/api/me")
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap();
    let body = body_json(send(&h.app, request).await).await;
    assert_eq!(body["signed_in"], true);
    assert_eq!(body["first_name"], "Ana");
    assert!(body["greeting_key"]
        .as_str()
        .unwrap()
        .starts_with("dashboard."));
}

// =============================================================================
// SEO
// =============================================================================

#[tokio::test]
async fn test_robots_and_sitemap() {
    let h = harness();
    let response = get(&h.app, "/robots.txt").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert!(body_text(response)
        .await
        .contains("Sitemap: https://foto-designo.com/sitemap.xml"));

    let response = get(&h.app, "/sitemap.xml").await;
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/xml");
    assert!(body_text(response)
        .await
        .contains("<loc>https://foto-designo.com/en</loc>"));
}

#[tokio::test]
async fn test_manifest() {
    let h = harness();
    let response = get(&h.app, "/manifest.webmanifest").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "FOTO&VIDEO DESIGNO");
}
