use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use cyclery::config::Config;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

/// Admin user seeded by the initial migration.
const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "change-me";

async fn spawn_app() -> (Router, Arc<cyclery::api::AppState>) {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // A single pooled connection keeps every query on the same in-memory
    // database.
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;
    config.server.secure_cookies = false;

    let state = cyclery::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    let app = cyclery::api::router(state.clone()).await;
    (app, state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Logs in and returns the session cookie to replay on later requests.
async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "username": username, "password": password }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK, "login failed");

    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login did not set a session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

async fn register(app: &Router, username: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "username": username,
                        "password": "password1",
                        "email": format!("{username}@example.com"),
                        "city": "Mumbai"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK, "register failed");

    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("register did not set a session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

fn listing_payload(brand: &str, price: i64) -> serde_json::Value {
    serde_json::json!({
        "category": "Adult",
        "brand": brand,
        "model": "Test Model",
        "purchaseYear": 2023,
        "price": price,
        "gearTransmission": "Multi-Speed",
        "frameMaterial": "Aluminum",
        "suspension": "Front",
        "condition": "Good",
        "cycleType": "Mountain",
        "wheelSize": "29",
        "hasReceipt": true,
        "images": []
    })
}

async fn create_listing(app: &Router, cookie: &str, payload: serde_json::Value) -> i64 {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/listings")
                .header("Content-Type", "application/json")
                .header(header::COOKIE, cookie)
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK, "create listing failed");
    let body = body_json(response).await;
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health() {
    let (app, _state) = spawn_app().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_listings_require_auth_to_create() {
    let (app, _state) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/listings")
                .header("Content-Type", "application/json")
                .body(Body::from(listing_payload("Trek", 85000).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Browsing needs no session.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/listings")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_listing_filters_and_sorting() {
    let (app, _state) = spawn_app().await;
    let cookie = register(&app, "filter_seller").await;

    create_listing(&app, &cookie, listing_payload("Trek", 85000)).await;
    create_listing(&app, &cookie, listing_payload("Giant", 40000)).await;

    // Brand equality
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/listings?brand=Trek")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["brand"], "Trek");

    // Inclusive minimum price
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/listings?minPrice=50000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["brand"], "Trek");

    // Price ascending with no filter returns everything, cheapest first
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/listings?sortBy=price_asc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["brand"], "Giant");
    assert_eq!(data[1]["brand"], "Trek");

    // Conjunctive filters: brand matches but price range excludes it
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/listings?brand=Trek&maxPrice=50000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    // Empty filter values impose no constraint
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/listings?brand=&minPrice=")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_malformed_filters_are_rejected() {
    let (app, _state) = spawn_app().await;

    for uri in [
        "/api/listings?condition=Excellent",
        "/api/listings?minPrice=-5",
        "/api/listings?minPrice=500&maxPrice=100",
        "/api/listings?purchaseYear=1890",
        "/api/listings?sortBy=cheapest",
        "/api/listings?ids=1,x",
    ] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[tokio::test]
async fn test_listing_detail_and_view_counter() {
    let (app, state) = spawn_app().await;
    let cookie = register(&app, "view_seller").await;
    let id = create_listing(&app, &cookie, listing_payload("Trek", 85000)).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/listings/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    #[allow(clippy::cast_possible_truncation)]
    let listing = state
        .store()
        .get_listing(id as i32)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(listing.views, 1);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/listings/999999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_update_requires_owner_or_admin() {
    let (app, _state) = spawn_app().await;
    let owner_cookie = register(&app, "owner").await;
    let other_cookie = register(&app, "stranger").await;
    let id = create_listing(&app, &owner_cookie, listing_payload("Trek", 85000)).await;

    let status_body = serde_json::json!({ "status": "sold" }).to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/listings/{id}/status"))
                .header("Content-Type", "application/json")
                .header(header::COOKIE, &other_cookie)
                .body(Body::from(status_body.clone()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/listings/{id}/status"))
                .header("Content-Type", "application/json")
                .header(header::COOKIE, &owner_cookie)
                .body(Body::from(status_body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "sold");
}

#[tokio::test]
async fn test_faq_admin_crud_and_soft_delete() {
    let (app, state) = spawn_app().await;
    let user_cookie = register(&app, "regular_user").await;
    let admin_cookie = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let faq_body = serde_json::json!({
        "question": "How do I sell?",
        "answer": "Create a listing from the sell page.",
        "category": "selling",
        "displayOrder": 1
    })
    .to_string();

    // Non-admins cannot manage FAQs.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/faqs")
                .header("Content-Type", "application/json")
                .header(header::COOKIE, &user_cookie)
                .body(Body::from(faq_body.clone()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/faqs")
                .header("Content-Type", "application/json")
                .header(header::COOKIE, &admin_cookie)
                .body(Body::from(faq_body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let faq_id = body["data"]["id"].as_i64().unwrap();

    // Visible publicly while active.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/faqs")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Soft delete removes it from the public list but keeps the row.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/admin/faqs/{faq_id}"))
                .header(header::COOKIE, &admin_cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/faqs")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    #[allow(clippy::cast_possible_truncation)]
    let row = state.store().get_faq(faq_id as i32).await.unwrap().unwrap();
    assert!(!row.is_active);
}

#[tokio::test]
async fn test_visit_analytics_endpoint() {
    let (app, state) = spawn_app().await;
    let admin_cookie = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    for (device, platform) in [
        (Some("Mobile"), Some("iOS")),
        (Some("Mobile"), Some("Android")),
        (Some("Desktop"), Some("Windows")),
        (None, None),
    ] {
        state
            .store()
            .record_visit(&cyclery::models::visit::NewVisit {
                path: "/".to_string(),
                device_type: device.map(str::to_string),
                platform: platform.map(str::to_string),
                browser: None,
                user_id: None,
                session_id: "test-session".to_string(),
            })
            .await
            .unwrap();
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/analytics/visits?groupBy=device")
                .header(header::COOKIE, &admin_cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let buckets = body["data"].as_array().unwrap();

    let total: i64 = buckets.iter().map(|b| b["count"].as_i64().unwrap()).sum();
    assert_eq!(total, 4);

    let mobile = buckets
        .iter()
        .find(|b| b["dimension"] == "Mobile")
        .expect("Mobile bucket missing");
    assert_eq!(mobile["count"], 2);

    assert!(buckets.iter().any(|b| b["dimension"] == "Unknown"));

    // Unauthenticated and non-admin callers are rejected.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/analytics/visits")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/analytics/visits?groupBy=country")
                .header(header::COOKIE, &admin_cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_page_views_are_recorded() {
    let (app, state) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/listings")
                .header(
                    "User-Agent",
                    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                     (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The visit insert happens off the request path; give it a moment.
    let mut recorded = 0;
    for _ in 0..50 {
        recorded = state.store().count_visits(None, None).await.unwrap();
        if recorded > 0 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(recorded, 1);

    let buckets = state
        .store()
        .aggregate_visits(None, None, cyclery::models::visit::VisitDimension::Browser)
        .await
        .unwrap();
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].label, "Chrome");
}

#[tokio::test]
async fn test_sitemap() {
    let (app, _state) = spawn_app().await;
    let cookie = register(&app, "sitemap_seller").await;
    let id = create_listing(&app, &cookie, listing_payload("Trek", 85000)).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/sitemap.xml")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/xml"
    );

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let xml = String::from_utf8(body.to_vec()).unwrap();
    assert!(xml.contains("<urlset"));
    assert!(xml.contains(&format!("/listings/{id}-trek-test-model")));
}
