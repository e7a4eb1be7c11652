//! WebAssembly module for the Rice Inspection Platform
//!
//! Provides client-side computation for the inspection form:
//! - Reading an uploaded measurement file before submission
//! - Previewing the composition against a standard
//! - Field validation matching the server

use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("rice-inspection-wasm loaded"));
}

fn to_js_error(message: String) -> JsValue {
    js_sys::Error::new(&message).into()
}

/// Summary shown once a measurement file has been picked
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadSummary {
    #[serde(rename = "requestID")]
    request_id: String,
    grain_count: usize,
    total_weight: f64,
}

fn parse_batch(file_json: &str) -> Result<RawGrainBatch, String> {
    serde_json::from_str(file_json).map_err(|e| format!("Not a valid measurement file: {}", e))
}

fn summarize_upload(file_json: &str) -> Result<String, String> {
    let batch = parse_batch(file_json)?;
    validate_grain_batch(&batch).map_err(str::to_string)?;

    let summary = UploadSummary {
        request_id: batch.request_id.clone(),
        grain_count: batch.grains.len(),
        total_weight: batch.total_weight(),
    };
    serde_json::to_string(&summary).map_err(|e| e.to_string())
}

fn preview(file_json: &str, standard_json: &str) -> Result<String, String> {
    let batch = parse_batch(file_json)?;
    let standard: Standard =
        serde_json::from_str(standard_json).map_err(|e| format!("Invalid standard JSON: {}", e))?;

    let result = shared::classify_and_aggregate(&batch.grains, &standard.standard_data)
        .map_err(|e| e.to_string())?;
    serde_json::to_string(&result).map_err(|e| e.to_string())
}

fn check_price(price: &str) -> Result<(), String> {
    let price = price.trim();
    if price.is_empty() {
        return Ok(());
    }
    let value: Decimal = price.parse().map_err(|_| "Price must be a number".to_string())?;
    validate_price(value).map_err(str::to_string)
}

fn check_sampling_points(points_json: &str) -> Result<(), String> {
    let points: Vec<SamplingPoint> =
        serde_json::from_str(points_json).map_err(|e| format!("Unknown sampling point: {}", e))?;
    validate_sampling_points(&points).map_err(str::to_string)
}

/// Read an uploaded measurement file; returns `{requestID, grainCount, totalWeight}` as JSON
#[wasm_bindgen]
pub fn read_measurement_file(file_json: &str) -> Result<String, JsValue> {
    summarize_upload(file_json).map_err(to_js_error)
}

/// Compute the aggregation result a submission would produce
#[wasm_bindgen]
pub fn preview_inspection(file_json: &str, standard_json: &str) -> Result<String, JsValue> {
    preview(file_json, standard_json).map_err(|e| {
        web_sys::console::warn_1(&JsValue::from_str(&e));
        to_js_error(e)
    })
}

/// Validate a price field; blank is allowed
#[wasm_bindgen]
pub fn validate_price_field(price: &str) -> Result<(), JsValue> {
    check_price(price).map_err(to_js_error)
}

/// Validate the chosen sampling points, given as a JSON array of labels
#[wasm_bindgen]
pub fn validate_sampling_points_field(points_json: &str) -> Result<(), JsValue> {
    check_sampling_points(points_json).map_err(to_js_error)
}

/// Validate the inspection name field
#[wasm_bindgen]
pub fn validate_name_field(name: &str) -> Result<(), JsValue> {
    validate_inspection_name(name).map_err(|m| to_js_error(m.to_string()))
}

/// Sampling point labels in display order
#[wasm_bindgen]
pub fn sampling_point_options() -> Vec<JsValue> {
    SamplingPoint::ALL
        .iter()
        .map(|p| JsValue::from_str(p.as_str()))
        .collect()
}
