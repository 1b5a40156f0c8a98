use axum::{
    Json,
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{AnalyticsBucketDto, ApiError, ApiResponse, AppState};
use crate::api::auth::session_user_id_opt;
use crate::api::validation::parse_date_bound;
use crate::models::visit::{NewVisit, VisitDimension};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    pub group_by: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// GET /api/admin/analytics/visits
pub async fn get_visit_analytics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalyticsQuery>,
) -> Result<Json<ApiResponse<Vec<AnalyticsBucketDto>>>, ApiError> {
    let dimension = match params.group_by.filter(|g| !g.trim().is_empty()) {
        Some(value) => value
            .parse::<VisitDimension>()
            .map_err(|e| ApiError::validation(e.to_string()))?,
        None => VisitDimension::default(),
    };

    let start = params
        .start_date
        .filter(|d| !d.trim().is_empty())
        .map(|d| parse_date_bound(&d, false))
        .transpose()?;

    let end = params
        .end_date
        .filter(|d| !d.trim().is_empty())
        .map(|d| parse_date_bound(&d, true))
        .transpose()?;

    let buckets = state
        .store()
        .aggregate_visits(start.as_deref(), end.as_deref(), dimension)
        .await?;

    Ok(Json(ApiResponse::success(
        buckets.into_iter().map(AnalyticsBucketDto::from).collect(),
    )))
}

/// Records one visit per page-view request passing through this layer.
/// The write happens off the request path; a failed insert never fails the
/// page.
pub async fn track_page_views(
    State(state): State<Arc<AppState>>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    // Only reads are page views; writes routed through this layer are not.
    if request.method() != axum::http::Method::GET {
        return next.run(request).await;
    }

    let path = request.uri().path().to_string();

    let user_agent = request
        .headers()
        .get("user-agent")
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);

    let session_id = session
        .id()
        .map_or_else(|| "anonymous".to_string(), |id| id.to_string());

    let user_id = session_user_id_opt(&session).await;

    let store = state.store().clone();
    let info = state.classifier().classify(user_agent.as_deref());

    tokio::spawn(async move {
        let visit = NewVisit {
            path,
            device_type: info.device_type,
            platform: info.platform,
            browser: info.browser,
            user_id,
            session_id,
        };

        if let Err(e) = store.record_visit(&visit).await {
            tracing::warn!("Failed to record visit: {e}");
        }
    });

    next.run(request).await
}
