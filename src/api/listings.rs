use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState};
use crate::api::auth::{session_is_admin, session_user_id};
use crate::api::validation::{
    parse_id_list, validate_images, validate_listing_id, validate_non_empty, validate_price,
    validate_price_range, validate_purchase_year,
};
use crate::clients::sendgrid::EmailMessage;
use crate::models::listing::{
    Category, Condition, CycleType, FrameMaterial, Listing, ListingFilter, ListingStatus,
    NewListing, SortKey, Suspension, Transmission, WheelSize,
};

/// Raw query-string shape of a listing search. Every field is optional and
/// arrives as text; `into_filter` validates and types them.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingsQuery {
    pub brand: Option<String>,
    pub purchase_year: Option<String>,
    pub condition: Option<String>,
    pub gear_transmission: Option<String>,
    pub frame_material: Option<String>,
    pub suspension: Option<String>,
    pub wheel_size: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub category: Option<String>,
    pub is_premium: Option<String>,
    pub seller_id: Option<String>,
    pub ids: Option<String>,
    pub status: Option<String>,
    pub sort_by: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_field<T>(value: Option<String>, field: &str) -> Result<Option<T>, ApiError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    non_empty(value)
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|e| ApiError::validation(format!("Invalid {field}: {e}")))
        })
        .transpose()
}

impl ListingsQuery {
    /// Validates the raw query and produces the typed filter and sort key.
    /// Malformed values are rejected here, before any query is built.
    pub fn into_filter(self) -> Result<(ListingFilter, SortKey), ApiError> {
        let sort = match non_empty(self.sort_by) {
            Some(value) => value
                .parse::<SortKey>()
                .map_err(|e| ApiError::validation(e.to_string()))?,
            None => SortKey::default(),
        };

        let filter = ListingFilter {
            brand: non_empty(self.brand),
            purchase_year: parse_field::<i32>(self.purchase_year, "purchaseYear")?,
            condition: parse_field::<Condition>(self.condition, "condition")?,
            gear_transmission: parse_field::<Transmission>(
                self.gear_transmission,
                "gearTransmission",
            )?,
            frame_material: parse_field::<FrameMaterial>(self.frame_material, "frameMaterial")?,
            suspension: parse_field::<Suspension>(self.suspension, "suspension")?,
            wheel_size: parse_field::<WheelSize>(self.wheel_size, "wheelSize")?,
            min_price: parse_field::<i64>(self.min_price, "minPrice")?,
            max_price: parse_field::<i64>(self.max_price, "maxPrice")?,
            category: parse_field::<Category>(self.category, "category")?,
            is_premium: parse_field::<bool>(self.is_premium, "isPremium")?,
            seller_id: parse_field::<i32>(self.seller_id, "sellerId")?,
            ids: non_empty(self.ids).map(|v| parse_id_list(&v)).transpose()?,
            status: parse_field::<ListingStatus>(self.status, "status")?,
        };

        if let Some(year) = filter.purchase_year {
            validate_purchase_year(year)?;
        }
        validate_price_range(filter.min_price, filter.max_price)?;

        Ok((filter, sort))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    pub category: Category,
    pub brand: String,
    pub model: String,
    pub purchase_year: i32,
    pub price: i64,
    pub gear_transmission: Transmission,
    pub frame_material: FrameMaterial,
    pub suspension: Suspension,
    pub condition: Condition,
    pub cycle_type: CycleType,
    pub wheel_size: WheelSize,
    pub has_receipt: bool,
    pub additional_details: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub is_premium: bool,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ListingStatus,
}

/// GET /api/listings
pub async fn list_listings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListingsQuery>,
) -> Result<Json<ApiResponse<Vec<Listing>>>, ApiError> {
    let (filter, sort) = params.into_filter()?;

    let listings = state.store().search_listings(&filter, sort).await?;

    Ok(Json(ApiResponse::success(listings)))
}

/// GET /api/listings/{id}
///
/// Fetching a listing counts as one view.
pub async fn get_listing(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Listing>>, ApiError> {
    validate_listing_id(id)?;

    let listing = state
        .store()
        .get_listing(id)
        .await?
        .ok_or_else(|| ApiError::listing_not_found(id))?;

    state.store().increment_listing_views(id).await?;

    Ok(Json(ApiResponse::success(listing)))
}

/// POST /api/listings
pub async fn create_listing(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<CreateListingRequest>,
) -> Result<Json<ApiResponse<Listing>>, ApiError> {
    let seller_id = session_user_id(&session).await?;

    validate_non_empty(&payload.brand, "Brand")?;
    validate_non_empty(&payload.model, "Model")?;
    validate_price(payload.price)?;
    validate_purchase_year(payload.purchase_year)?;
    validate_images(&payload.images)?;

    let new_listing = NewListing {
        seller_id,
        category: payload.category,
        brand: payload.brand.trim().to_string(),
        model: payload.model.trim().to_string(),
        purchase_year: payload.purchase_year,
        price: payload.price,
        gear_transmission: payload.gear_transmission,
        frame_material: payload.frame_material,
        suspension: payload.suspension,
        condition: payload.condition,
        cycle_type: payload.cycle_type,
        wheel_size: payload.wheel_size,
        has_receipt: payload.has_receipt,
        additional_details: payload.additional_details,
        images: payload.images,
        is_premium: payload.is_premium,
    };

    let listing = state.store().create_listing(&new_listing).await?;

    Ok(Json(ApiResponse::success(listing)))
}

/// PUT /api/listings/{id}/status
///
/// Only the seller who owns the listing (or an admin) may change its status.
pub async fn update_listing_status(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<Listing>>, ApiError> {
    validate_listing_id(id)?;
    let user_id = session_user_id(&session).await?;

    let listing = state
        .store()
        .get_listing(id)
        .await?
        .ok_or_else(|| ApiError::listing_not_found(id))?;

    if listing.seller_id != user_id && !session_is_admin(&session).await {
        return Err(ApiError::forbidden(
            "Only the seller or an admin can change a listing's status",
        ));
    }

    state.store().update_listing_status(id, payload.status).await?;

    let updated = state
        .store()
        .get_listing(id)
        .await?
        .ok_or_else(|| ApiError::listing_not_found(id))?;

    Ok(Json(ApiResponse::success(updated)))
}

/// POST /api/listings/{id}/inquiries
pub async fn record_inquiry(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Listing>>, ApiError> {
    validate_listing_id(id)?;
    let user_id = session_user_id(&session).await?;

    let found = state.store().increment_listing_inquiries(id).await?;
    if !found {
        return Err(ApiError::listing_not_found(id));
    }

    let listing = state
        .store()
        .get_listing(id)
        .await?
        .ok_or_else(|| ApiError::listing_not_found(id))?;

    notify_inquiry(&state, &listing, user_id);

    Ok(Json(ApiResponse::success(listing)))
}

/// Sends the inquiry notification without delaying the response. Failures
/// are logged and otherwise ignored.
fn notify_inquiry(state: &Arc<AppState>, listing: &Listing, user_id: i32) {
    let Some(mailer) = state.mailer().clone() else {
        return;
    };

    let admin_address = state.shared.admin_address.clone();
    let listing_label = format!("{} {} (#{})", listing.brand, listing.model, listing.id);
    let price = listing.price;

    tokio::spawn(async move {
        let message = EmailMessage {
            to: admin_address,
            subject: format!("New inquiry for {listing_label}"),
            text: format!(
                "User {user_id} inquired about {listing_label}, listed at {price}.",
            ),
            html: None,
        };

        if let Err(e) = mailer.send(&message).await {
            tracing::warn!("Failed to send inquiry notification: {e}");
        }
    });
}
