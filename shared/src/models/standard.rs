//! Reference standard models
//!
//! A standard is a named set of rules, each describing a length/shape bucket
//! that grains are graded against.

use serde::{Deserialize, Serialize};

use super::GrainMeasurement;

/// Lower bound operator of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MinCondition {
    /// length > minLength
    Gt,
    /// length >= minLength
    Ge,
}

impl MinCondition {
    pub fn admits(&self, length: f64, bound: f64) -> bool {
        match self {
            MinCondition::Gt => length > bound,
            MinCondition::Ge => length >= bound,
        }
    }
}

/// Upper bound operator of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MaxCondition {
    /// length < maxLength
    Lt,
    /// length <= maxLength
    Le,
}

impl MaxCondition {
    pub fn admits(&self, length: f64, bound: f64) -> bool {
        match self {
            MaxCondition::Lt => length < bound,
            MaxCondition::Le => length <= bound,
        }
    }
}

/// One classification bucket of a standard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub name: String,
    pub shape: Vec<String>,
    pub min_length: f64,
    pub max_length: f64,
    pub condition_min: MinCondition,
    pub condition_max: MaxCondition,
}

impl StandardRule {
    /// Whether a grain falls into this bucket
    pub fn matches(&self, grain: &GrainMeasurement) -> bool {
        self.shape.iter().any(|s| *s == grain.shape)
            && self.condition_min.admits(grain.length, self.min_length)
            && self.condition_max.admits(grain.length, self.max_length)
    }

    /// Length range as shown in reports, e.g. `4 - 6`
    pub fn length_range(&self) -> String {
        format!("{} - {}", self.min_length, self.max_length)
    }
}

/// A reference standard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standard {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_date: Option<String>,
    pub standard_data: Vec<StandardRule>,
}

impl Standard {
    /// Match by ID first, then by display name
    pub fn is_named(&self, id_or_name: &str) -> bool {
        self.id == id_or_name || self.name == id_or_name
    }
}
