use axum::{
    Json,
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, patch, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use time;

use crate::state::SharedState;

mod analytics;
pub mod auth;
mod error;
mod faqs;
mod listings;
mod observability;
mod sitemap;
mod system;
mod types;
mod uploads;
mod validation;

pub use error::ApiError;
pub use types::*;

use crate::services::{ImageService, UserAgentClassifier};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<tokio::sync::RwLock<crate::config::Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn image_service(&self) -> &Arc<ImageService> {
        &self.shared.image_service
    }

    #[must_use]
    pub fn classifier(&self) -> &Arc<UserAgentClassifier> {
        &self.shared.classifier
    }

    #[must_use]
    pub fn mailer(&self) -> &Option<Arc<crate::clients::sendgrid::SendGridClient>> {
        &self.shared.mailer
    }
}

pub async fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    Ok(Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    }))
}

pub async fn create_app_state_from_config(
    config: crate::config::Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    create_app_state(shared, prometheus_handle).await
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (images_path, cors_origins, secure_cookies, session_minutes, max_upload_mb) = {
        let config = state.config().read().await;
        (
            config.general.images_path.clone(),
            config.server.cors_allowed_origins.clone(),
            config.server.secure_cookies,
            config.server.session_minutes,
            config.general.max_upload_mb,
        )
    };

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            session_minutes,
        )));

    let admin_routes = Router::new()
        .route("/faqs", get(faqs::list_all_faqs))
        .route("/faqs", post(faqs::create_faq))
        .route("/faqs/{id}", patch(faqs::update_faq))
        .route("/faqs/{id}", delete(faqs::delete_faq))
        .route("/analytics/visits", get(analytics::get_visit_analytics))
        .route_layer(middleware::from_fn(auth::require_admin));

    let system_routes = Router::new()
        .route("/system/status", get(system::get_status))
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn(auth::require_auth));

    // The storefront reads come first so the page-view layer wraps exactly
    // them; everything added afterwards is untracked.
    let api_router = Router::new()
        .route(
            "/listings",
            get(listings::list_listings).post(listings::create_listing),
        )
        .route("/listings/{id}", get(listings::get_listing))
        .route("/faqs", get(faqs::list_faqs))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            analytics::track_page_views,
        ))
        .route("/listings/{id}/status", put(listings::update_listing_status))
        .route("/listings/{id}/inquiries", post(listings::record_inquiry))
        .route(
            "/uploads/images",
            post(uploads::upload_image).layer(axum::extract::DefaultBodyLimit::max(
                usize::try_from(max_upload_mb * 1024 * 1024).unwrap_or(usize::MAX),
            )),
        )
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::get_current_user))
        .merge(system_routes)
        .nest("/admin", admin_routes)
        .layer(session_layer);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .route("/sitemap.xml", get(sitemap::get_sitemap))
        .route("/health", get(health))
        .with_state(state)
        .nest_service("/images", tower_http::services::ServeDir::new(images_path))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(middleware::from_fn(
            observability::security_headers_middleware,
        ))
}
