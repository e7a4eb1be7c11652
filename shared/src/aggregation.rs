//! Grain classification and weight aggregation
//!
//! Turns a batch of raw grain measurements into the percentage breakdowns
//! shown on an inspection report:
//! - share of total weight per grain type
//! - share of total weight matching each rule of a standard
//!
//! Percentages are rounded to two decimals and carried as strings so the
//! stored record renders exactly as computed.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{GrainMeasurement, StandardRule};

/// Grain type that is not counted as a defect
pub const SOUND_GRAIN_TYPE: &str = "white";

/// Aggregation failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregationError {
    #[error("Total grain weight is zero; nothing to aggregate")]
    ZeroTotalWeight,

    #[error("Invalid measurement at index {index}: {reason}")]
    InvalidMeasurement { index: usize, reason: String },

    #[error("Duplicate rule name in standard: {0}")]
    DuplicateRuleName(String),
}

/// Weight breakdown of one sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    pub type_weight_percent: BTreeMap<String, String>,
    pub shape_weight_percent: BTreeMap<String, String>,
    pub total_grain_count: usize,
}

impl AggregationResult {
    /// Type rows other than sound white grain
    pub fn defect_types(&self) -> impl Iterator<Item = (&String, &String)> {
        self.type_weight_percent
            .iter()
            .filter(|(t, _)| t.as_str() != SOUND_GRAIN_TYPE)
    }

    /// Sum of every defect type's percentage
    pub fn defect_total_percent(&self) -> String {
        let total: f64 = self
            .defect_types()
            .filter_map(|(_, pct)| pct.parse::<f64>().ok())
            .sum();
        format!("{:.2}", total)
    }
}

/// Classify a batch against a standard's rules and aggregate weights.
///
/// Every rule is evaluated independently, so a grain can count toward
/// several overlapping rules or toward none.
pub fn classify_and_aggregate(
    measurements: &[GrainMeasurement],
    rules: &[StandardRule],
) -> Result<AggregationResult, AggregationError> {
    for (index, grain) in measurements.iter().enumerate() {
        validate_measurement(index, grain)?;
    }

    let mut seen = HashSet::with_capacity(rules.len());
    for rule in rules {
        if !seen.insert(rule.name.as_str()) {
            return Err(AggregationError::DuplicateRuleName(rule.name.clone()));
        }
    }

    let total_weight: f64 = measurements.iter().map(|g| g.weight).sum();
    if measurements.is_empty() || total_weight <= 0.0 {
        return Err(AggregationError::ZeroTotalWeight);
    }

    let mut type_weights: BTreeMap<&str, f64> = BTreeMap::new();
    for grain in measurements {
        *type_weights.entry(grain.grain_type.as_str()).or_insert(0.0) += grain.weight;
    }

    let type_weight_percent = type_weights
        .into_iter()
        .map(|(grain_type, weight)| (grain_type.to_string(), percent_of(weight, total_weight)))
        .collect();

    let shape_weight_percent = rules
        .iter()
        .map(|rule| {
            let matched: f64 = measurements
                .iter()
                .filter(|g| rule.matches(g))
                .map(|g| g.weight)
                .sum();
            (rule.name.clone(), percent_of(matched, total_weight))
        })
        .collect();

    Ok(AggregationResult {
        type_weight_percent,
        shape_weight_percent,
        total_grain_count: measurements.len(),
    })
}

fn validate_measurement(index: usize, grain: &GrainMeasurement) -> Result<(), AggregationError> {
    let reason = if !grain.weight.is_finite() || grain.weight < 0.0 {
        "weight must be a non-negative number"
    } else if !grain.length.is_finite() || grain.length < 0.0 {
        "length must be a non-negative number"
    } else if grain.grain_type.trim().is_empty() {
        "type is required"
    } else {
        return Ok(());
    };

    Err(AggregationError::InvalidMeasurement {
        index,
        reason: reason.to_string(),
    })
}

fn percent_of(part: f64, total: f64) -> String {
    format!("{:.2}", 100.0 * part / total)
}
