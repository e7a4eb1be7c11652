//! Rice inspection service
//!
//! Grades an uploaded grain batch against a reference standard, stores the
//! resulting record, and serves history listings and report views.

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::StandardsClient;
use crate::storage::InspectionStore;
use shared::{
    classify_and_aggregate, validate_grain_batch, validate_inspection_name, validate_price,
    validate_sampling_points, DateRange, InspectionEdit, InspectionRecord, PaginatedResponse,
    Pagination, RawGrainBatch, SamplingPoint, CURRENT_SCHEMA_VERSION,
};

/// Inspection service for recording and querying rice inspections
#[derive(Clone)]
pub struct InspectionService {
    store: Arc<dyn InspectionStore>,
    standards: StandardsClient,
}

/// Input for creating an inspection
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInspectionInput {
    pub name: String,
    /// Standard ID or display name
    pub standard: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub sampling_points: Vec<SamplingPoint>,
    #[serde(default, with = "shared::types::local_datetime")]
    pub sampling_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub upload_file_name: Option<String>,
    /// Parsed content of the uploaded measurement file
    pub raw_data: RawGrainBatch,
}

/// History listing filter
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    /// Prefix of the inspection ID
    pub id_prefix: Option<String>,
    /// Creation date window
    pub created: DateRange,
    pub pagination: Pagination,
}

/// Row of the history table
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionSummary {
    pub id: Uuid,
    pub inspection_id: String,
    pub name: String,
    pub standard_name: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&InspectionRecord> for InspectionSummary {
    fn from(record: &InspectionRecord) -> Self {
        Self {
            id: record.id,
            inspection_id: record.inspection_id.clone(),
            name: record.name.clone(),
            standard_name: record.standard_name.clone(),
            note: record.note.clone(),
            created_at: record.created_at,
        }
    }
}

/// Report view of one inspection
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionReport {
    pub inspection: InspectionRecord,
    pub composition: Vec<CompositionRow>,
    pub defects: Vec<DefectRow>,
    /// Sum of every defect type, excluding white grain
    pub defect_total_percent: String,
}

/// Share of weight matching one rule of the standard
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionRow {
    pub name: String,
    pub length_range: String,
    pub actual_percent: Option<String>,
}

/// Share of weight of one defect type
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectRow {
    #[serde(rename = "type")]
    pub grain_type: String,
    pub percent: String,
}

/// Outcome of a bulk delete
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteResult {
    pub deleted: Vec<Uuid>,
    pub not_found: Vec<Uuid>,
}

impl InspectionService {
    /// Create a new InspectionService instance
    pub fn new(store: Arc<dyn InspectionStore>, standards: StandardsClient) -> Self {
        Self { store, standards }
    }

    /// Grade an uploaded batch and store the inspection
    pub async fn create_inspection(
        &self,
        input: CreateInspectionInput,
    ) -> AppResult<InspectionRecord> {
        self.validate_create_input(&input)?;

        let standard_key = input.standard.trim();
        let standard = self
            .standards
            .find(standard_key)
            .await?
            .ok_or_else(|| {
                AppError::validation("standard", format!("Unknown standard: {}", standard_key))
            })?;

        // Computed once here; edits never recompute
        let result = classify_and_aggregate(&input.raw_data.grains, &standard.standard_data)?;

        let now = Utc::now();
        let record = InspectionRecord {
            schema_version: CURRENT_SCHEMA_VERSION,
            id: Uuid::new_v4(),
            inspection_id: input.raw_data.request_id.trim().to_string(),
            name: input.name.trim().to_string(),
            standard_id: standard.id,
            standard_name: standard.name,
            note: non_blank(input.note),
            price: input.price,
            sampling_points: input.sampling_points,
            sampling_date: input.sampling_date,
            image_url: input.raw_data.image_url,
            upload_file_name: non_blank(input.upload_file_name),
            standard_data: standard.standard_data,
            result,
            created_at: now,
            updated_at: now,
        };

        self.store.insert(record.clone()).await?;

        tracing::info!(
            "Created inspection {} ({}) with {} grain(s)",
            record.id,
            record.inspection_id,
            record.result.total_grain_count
        );

        Ok(record)
    }

    /// List inspections filtered by ID prefix and creation date, one page at a time
    pub async fn list_history(
        &self,
        filter: HistoryFilter,
    ) -> AppResult<PaginatedResponse<InspectionSummary>> {
        let records = self.store.list().await?;
        let prefix = filter
            .id_prefix
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());

        let matching: Vec<InspectionSummary> = records
            .iter()
            .filter(|r| prefix.map_or(true, |p| r.inspection_id.starts_with(p)))
            .filter(|r| filter.created.contains(r.created_at))
            .map(InspectionSummary::from)
            .collect();

        Ok(PaginatedResponse::paginate(matching, filter.pagination))
    }

    /// Get inspection record by ID
    pub async fn get_inspection(&self, id: Uuid) -> AppResult<InspectionRecord> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Inspection".to_string()))
    }

    /// Get the report view of an inspection
    pub async fn get_report(&self, id: Uuid) -> AppResult<InspectionReport> {
        let inspection = self.get_inspection(id).await?;

        let composition = inspection
            .standard_data
            .iter()
            .map(|rule| CompositionRow {
                name: rule.name.clone(),
                length_range: rule.length_range(),
                actual_percent: inspection.result.shape_weight_percent.get(&rule.name).cloned(),
            })
            .collect();

        let defects = inspection
            .result
            .defect_types()
            .map(|(grain_type, percent)| DefectRow {
                grain_type: grain_type.clone(),
                percent: percent.clone(),
            })
            .collect();

        let defect_total_percent = inspection.result.defect_total_percent();

        Ok(InspectionReport {
            inspection,
            composition,
            defects,
            defect_total_percent,
        })
    }

    /// Edit note, price, sampling date and sampling points
    pub async fn update_inspection(
        &self,
        id: Uuid,
        mut edit: InspectionEdit,
    ) -> AppResult<InspectionRecord> {
        self.validate_optional_fields(edit.price, &edit.sampling_points)?;
        edit.note = non_blank(edit.note);

        let mut record = self.get_inspection(id).await?;
        record.apply_edit(edit, Utc::now());

        if !self.store.update(record.clone()).await? {
            return Err(AppError::NotFound("Inspection".to_string()));
        }

        tracing::info!("Updated inspection {}", id);
        Ok(record)
    }

    /// Delete one inspection
    pub async fn delete_inspection(&self, id: Uuid) -> AppResult<()> {
        if !self.store.delete(id).await? {
            return Err(AppError::NotFound("Inspection".to_string()));
        }
        tracing::info!("Deleted inspection {}", id);
        Ok(())
    }

    /// Delete several inspections, reporting IDs that did not exist
    pub async fn delete_inspections(&self, ids: Vec<Uuid>) -> AppResult<BulkDeleteResult> {
        if ids.is_empty() {
            return Err(AppError::validation("ids", "At least one ID is required"));
        }

        let mut result = BulkDeleteResult {
            deleted: Vec::new(),
            not_found: Vec::new(),
        };
        for id in ids {
            if self.store.delete(id).await? {
                result.deleted.push(id);
            } else {
                result.not_found.push(id);
            }
        }

        tracing::info!(
            "Bulk delete removed {} inspection(s), {} not found",
            result.deleted.len(),
            result.not_found.len()
        );
        Ok(result)
    }

    /// Number of stored inspections
    pub async fn count(&self) -> AppResult<usize> {
        self.store.count().await
    }

    /// Validate create input fields
    fn validate_create_input(&self, input: &CreateInspectionInput) -> AppResult<()> {
        validate_inspection_name(&input.name).map_err(|m| AppError::validation("name", m))?;

        if input.standard.trim().is_empty() {
            return Err(AppError::validation("standard", "Standard is required"));
        }

        validate_grain_batch(&input.raw_data).map_err(|m| AppError::validation("upload", m))?;

        self.validate_optional_fields(input.price, &input.sampling_points)
    }

    fn validate_optional_fields(
        &self,
        price: Option<Decimal>,
        sampling_points: &[SamplingPoint],
    ) -> AppResult<()> {
        if let Some(price) = price {
            validate_price(price).map_err(|m| AppError::validation("price", m))?;
        }
        validate_sampling_points(sampling_points)
            .map_err(|m| AppError::validation("samplingPoints", m))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
