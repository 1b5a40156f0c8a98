use chrono::{Datelike, NaiveDate, TimeZone, Utc};

use super::ApiError;

/// Earliest purchase year the marketplace accepts.
pub const MIN_PURCHASE_YEAR: i32 = 2000;

/// Most images one listing may carry.
pub const MAX_LISTING_IMAGES: usize = 10;

pub fn validate_listing_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid listing ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_price(price: i64) -> Result<i64, ApiError> {
    if price < 0 {
        return Err(ApiError::validation(format!(
            "Invalid price: {}. Price must not be negative",
            price
        )));
    }
    Ok(price)
}

pub fn validate_price_range(min: Option<i64>, max: Option<i64>) -> Result<(), ApiError> {
    if let Some(min) = min {
        validate_price(min)?;
    }
    if let Some(max) = max {
        validate_price(max)?;
    }
    if let (Some(min), Some(max)) = (min, max)
        && min > max
    {
        return Err(ApiError::validation(format!(
            "minPrice ({min}) cannot exceed maxPrice ({max})"
        )));
    }
    Ok(())
}

pub fn validate_purchase_year(year: i32) -> Result<i32, ApiError> {
    let current_year = Utc::now().year();
    if !(MIN_PURCHASE_YEAR..=current_year).contains(&year) {
        return Err(ApiError::validation(format!(
            "Invalid purchase year: {}. Year must be between {} and {}",
            year, MIN_PURCHASE_YEAR, current_year
        )));
    }
    Ok(year)
}

pub fn validate_images(images: &[String]) -> Result<(), ApiError> {
    if images.len() > MAX_LISTING_IMAGES {
        return Err(ApiError::validation(format!(
            "Too many images: {}. A listing may carry at most {}",
            images.len(),
            MAX_LISTING_IMAGES
        )));
    }
    Ok(())
}

pub fn validate_non_empty(value: &str, field: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Parses a time-bound query value. Accepts a full RFC3339 timestamp or a
/// bare date; a bare date maps to the start of that day (or its last second
/// when it closes the window, keeping the bound inclusive).
pub fn parse_date_bound(value: &str, end_of_day: bool) -> Result<String, ApiError> {
    if let Ok(timestamp) = chrono::DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc).to_rfc3339());
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ApiError::validation(format!("Invalid date: {value:?}")))?;

    let time = if end_of_day {
        date.and_hms_opt(23, 59, 59)
    } else {
        date.and_hms_opt(0, 0, 0)
    };

    let time = time.ok_or_else(|| ApiError::validation(format!("Invalid date: {value:?}")))?;

    Ok(Utc.from_utc_datetime(&time).to_rfc3339())
}

/// Parses the comma-separated `ids` query value.
pub fn parse_id_list(value: &str) -> Result<Vec<i32>, ApiError> {
    value
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            part.trim()
                .parse::<i32>()
                .map_err(|_| ApiError::validation(format!("Invalid listing ID: {part:?}")))
        })
        .collect()
}
