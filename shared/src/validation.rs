//! Validation utilities for the Rice Inspection platform

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{RawGrainBatch, SamplingPoint};

/// Upper bound accepted for a sample price
pub const MAX_PRICE: i64 = 100_000;

/// Longest accepted inspection name
pub const MAX_NAME_LENGTH: usize = 200;

// ============================================================================
// Inspection Form Validations
// ============================================================================

/// Validate the inspection name (required)
pub fn validate_inspection_name(name: &str) -> Result<(), &'static str> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Name is required");
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err("Name must be at most 200 characters");
    }
    Ok(())
}

/// Validate price is within 0 - 100,000 with at most two decimals
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO || price > Decimal::from(MAX_PRICE) {
        return Err("Price must be between 0 and 100,000");
    }
    if price.normalize().scale() > 2 {
        return Err("Price must have at most two decimal places");
    }
    Ok(())
}

/// Validate sampling points contain no duplicates
pub fn validate_sampling_points(points: &[SamplingPoint]) -> Result<(), &'static str> {
    for (i, point) in points.iter().enumerate() {
        if points[..i].contains(point) {
            return Err("Sampling points must not repeat");
        }
    }
    Ok(())
}

/// Validate an uploaded measurement batch before aggregation
pub fn validate_grain_batch(batch: &RawGrainBatch) -> Result<(), &'static str> {
    if batch.request_id.trim().is_empty() {
        return Err("Uploaded file has no requestID");
    }
    if batch.is_empty() {
        return Err("Uploaded file contains no grains");
    }
    if batch.total_weight() <= 0.0 {
        return Err("Uploaded grains have zero total weight");
    }
    Ok(())
}

// ============================================================================
// Query Validations
// ============================================================================

/// Validate a history date filter
pub fn validate_date_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<(), &'static str> {
    match (from, to) {
        (Some(f), Some(t)) if f > t => Err("fromDate must not be after toDate"),
        _ => Ok(()),
    }
}
