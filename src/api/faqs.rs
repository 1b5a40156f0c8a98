use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, FaqDto};
use crate::api::validation::validate_non_empty;
use crate::db::FaqUpdate;

#[derive(Deserialize)]
pub struct FaqListQuery {
    pub category: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFaqRequest {
    pub question: String,
    pub answer: String,
    pub category: String,
    #[serde(default)]
    pub display_order: i32,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFaqRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// GET /api/faqs
///
/// Public view: only active FAQs, in display order.
pub async fn list_faqs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FaqListQuery>,
) -> Result<Json<ApiResponse<Vec<FaqDto>>>, ApiError> {
    let category = params.category.filter(|c| !c.trim().is_empty());

    let faqs = state.store().list_faqs(category.as_deref()).await?;

    Ok(Json(ApiResponse::success(
        faqs.into_iter().map(FaqDto::from).collect(),
    )))
}

/// GET /api/admin/faqs
///
/// Admin view includes soft-deleted rows.
pub async fn list_all_faqs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<FaqDto>>>, ApiError> {
    let faqs = state.store().list_all_faqs().await?;

    Ok(Json(ApiResponse::success(
        faqs.into_iter().map(FaqDto::from).collect(),
    )))
}

/// POST /api/admin/faqs
pub async fn create_faq(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateFaqRequest>,
) -> Result<Json<ApiResponse<FaqDto>>, ApiError> {
    validate_non_empty(&payload.question, "Question")?;
    validate_non_empty(&payload.answer, "Answer")?;
    validate_non_empty(&payload.category, "Category")?;

    let faq = state
        .store()
        .create_faq(
            payload.question.trim(),
            payload.answer.trim(),
            payload.category.trim(),
            payload.display_order,
        )
        .await?;

    Ok(Json(ApiResponse::success(FaqDto::from(faq))))
}

/// PATCH /api/admin/faqs/{id}
pub async fn update_faq(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateFaqRequest>,
) -> Result<Json<ApiResponse<FaqDto>>, ApiError> {
    let updates = FaqUpdate {
        question: payload.question,
        answer: payload.answer,
        category: payload.category,
        display_order: payload.display_order,
        is_active: payload.is_active,
    };

    let faq = state
        .store()
        .update_faq(id, updates)
        .await?
        .ok_or_else(|| ApiError::faq_not_found(id))?;

    Ok(Json(ApiResponse::success(FaqDto::from(faq))))
}

/// DELETE /api/admin/faqs/{id}
///
/// Soft delete: the row stays, flagged inactive.
pub async fn delete_faq(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.store().soft_delete_faq(id).await?;

    if !deleted {
        return Err(ApiError::faq_not_found(id));
    }

    Ok(StatusCode::OK)
}
