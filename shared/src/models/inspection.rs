//! Inspection record models

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StandardRule;
use crate::aggregation::AggregationResult;

/// Schema version written with every new record
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

/// Where on the line a sample was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SamplingPoint {
    #[serde(rename = "Front End")]
    FrontEnd,
    #[serde(rename = "Back End")]
    BackEnd,
    #[serde(rename = "Other")]
    Other,
}

impl SamplingPoint {
    pub const ALL: [SamplingPoint; 3] = [
        SamplingPoint::FrontEnd,
        SamplingPoint::BackEnd,
        SamplingPoint::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SamplingPoint::FrontEnd => "Front End",
            SamplingPoint::BackEnd => "Back End",
            SamplingPoint::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == s.trim())
    }
}

impl std::fmt::Display for SamplingPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted inspection of one rice sample
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionRecord {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub id: Uuid,
    /// `requestID` of the uploaded batch
    pub inspection_id: String,
    pub name: String,
    pub standard_id: String,
    pub standard_name: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub sampling_points: Vec<SamplingPoint>,
    #[serde(default, with = "crate::types::local_datetime")]
    pub sampling_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub upload_file_name: Option<String>,
    /// Rules the result was computed against
    pub standard_data: Vec<StandardRule>,
    pub result: AggregationResult,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InspectionRecord {
    /// Applies the editable fields. The aggregation result is left untouched.
    pub fn apply_edit(&mut self, edit: InspectionEdit, now: DateTime<Utc>) {
        self.note = edit.note;
        self.price = edit.price;
        self.sampling_date = edit.sampling_date;
        self.sampling_points = edit.sampling_points;
        self.updated_at = now;
    }
}

/// Fields a user may change after submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionEdit {
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default, with = "crate::types::local_datetime")]
    pub sampling_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub sampling_points: Vec<SamplingPoint>,
}
