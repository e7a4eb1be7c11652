//! Raw grain measurement models

use serde::{Deserialize, Serialize};

/// One row of vision output for a single grain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrainMeasurement {
    /// Weight in grams
    pub weight: f64,
    /// Length in millimeters
    pub length: f64,
    /// Defect/color class, e.g. `white`, `chalky`, `yellow`
    #[serde(rename = "type", alias = "riceType")]
    pub grain_type: String,
    /// Shape class, e.g. `wholegrain`, `broken`
    pub shape: String,
}

impl GrainMeasurement {
    pub fn new(
        weight: f64,
        length: f64,
        grain_type: impl Into<String>,
        shape: impl Into<String>,
    ) -> Self {
        Self {
            weight,
            length,
            grain_type: grain_type.into(),
            shape: shape.into(),
        }
    }
}

/// Uploaded measurement file for one rice sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawGrainBatch {
    /// Identifier assigned by the scanning device; becomes the inspection ID
    #[serde(rename = "requestID")]
    pub request_id: String,
    #[serde(rename = "imageURL", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub grains: Vec<GrainMeasurement>,
}

impl RawGrainBatch {
    pub fn total_weight(&self) -> f64 {
        self.grains.iter().map(|g| g.weight).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.grains.is_empty()
    }
}
