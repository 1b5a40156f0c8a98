use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::AppState;
use crate::models::listing::{ListingFilter, ListingStatus, SortKey};
use crate::services::SitemapService;

/// GET /sitemap.xml
///
/// Lists the static storefront pages plus every available listing.
pub async fn get_sitemap(State(state): State<Arc<AppState>>) -> Response {
    let filter = ListingFilter {
        status: Some(ListingStatus::Available),
        ..Default::default()
    };

    let listings = match state.store().search_listings(&filter, SortKey::Newest).await {
        Ok(listings) => listings,
        Err(e) => {
            tracing::error!("Failed to load listings for sitemap: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error generating sitemap")
                .into_response();
        }
    };

    let base_url = state.shared.public_base_url.clone();

    match SitemapService::build(&base_url, &listings) {
        Ok(xml) => ([(header::CONTENT_TYPE, "application/xml")], xml).into_response(),
        Err(e) => {
            tracing::error!("Failed to generate sitemap: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error generating sitemap").into_response()
        }
    }
}
