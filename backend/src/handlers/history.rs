//! HTTP handlers for inspection history endpoints

use std::str::FromStr;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::inspection::{
    BulkDeleteResult, CreateInspectionInput, HistoryFilter, InspectionReport, InspectionService,
    InspectionSummary,
};
use crate::AppState;
use shared::{
    types::local_datetime, validate_date_range, DateRange, InspectionEdit, InspectionRecord,
    PaginatedResponse, Pagination, RawGrainBatch, SamplingPoint,
};

fn service(state: &AppState) -> InspectionService {
    InspectionService::new(state.store.clone(), state.standards.clone())
}

/// Record an inspection from a JSON body
pub async fn create_inspection(
    State(state): State<AppState>,
    Json(input): Json<CreateInspectionInput>,
) -> AppResult<(StatusCode, Json<InspectionRecord>)> {
    let record = service(&state).create_inspection(input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Record an inspection from a multipart form with the measurement file attached
pub async fn upload_inspection(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<InspectionRecord>)> {
    let input = read_upload_form(&mut multipart).await?;
    let record = service(&state).create_inspection(input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Query parameters for listing history
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListHistoryQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    /// Inspection ID prefix
    pub id: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

impl ListHistoryQuery {
    fn into_filter(self) -> AppResult<HistoryFilter> {
        let page = parse_param::<u32>("page", self.page.as_deref())?;
        let limit = parse_param::<u32>("limit", self.limit.as_deref())?;
        let from = parse_param::<NaiveDate>("fromDate", self.from_date.as_deref())?;
        let to = parse_param::<NaiveDate>("toDate", self.to_date.as_deref())?;
        validate_date_range(from, to).map_err(|m| AppError::validation("fromDate", m))?;

        Ok(HistoryFilter {
            id_prefix: self.id,
            created: DateRange::new(from, to),
            pagination: Pagination::normalized(page, limit),
        })
    }
}

/// List inspection history
pub async fn list_history(
    State(state): State<AppState>,
    Query(query): Query<ListHistoryQuery>,
) -> AppResult<Json<PaginatedResponse<InspectionSummary>>> {
    let filter = query.into_filter()?;
    let page = service(&state).list_history(filter).await?;
    Ok(Json(page))
}

/// Get inspection record by ID
pub async fn get_inspection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<InspectionRecord>> {
    let record = service(&state).get_inspection(id).await?;
    Ok(Json(record))
}

/// Get the report view of an inspection
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<InspectionReport>> {
    let report = service(&state).get_report(id).await?;
    Ok(Json(report))
}

/// Edit an inspection's note, price and sampling details
pub async fn update_inspection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<InspectionEdit>,
) -> AppResult<Json<InspectionRecord>> {
    let record = service(&state).update_inspection(id, input).await?;
    Ok(Json(record))
}

/// Delete one inspection
pub async fn delete_inspection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    service(&state).delete_inspection(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Input for bulk deletion
#[derive(Debug, Deserialize)]
pub struct DeleteInspectionsInput {
    pub ids: Vec<Uuid>,
}

/// Delete several inspections at once
pub async fn delete_inspections(
    State(state): State<AppState>,
    Json(input): Json<DeleteInspectionsInput>,
) -> AppResult<Json<BulkDeleteResult>> {
    let result = service(&state).delete_inspections(input.ids).await?;
    Ok(Json(result))
}

/// Empty or missing values count as absent
fn parse_param<T: FromStr>(field: &str, raw: Option<&str>) -> AppResult<Option<T>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| AppError::validation(field, format!("Invalid {}: {}", field, s))),
    }
}

async fn read_upload_form(multipart: &mut Multipart) -> AppResult<CreateInspectionInput> {
    let mut name = None;
    let mut standard = None;
    let mut note = None;
    let mut price = None;
    let mut sampling_points = Vec::new();
    let mut sampling_date = None;
    let mut upload_file_name = None;
    let mut raw_data = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation("upload", format!("Malformed form data: {}", e)))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        if field_name == "upload" {
            upload_file_name = field.file_name().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::validation("upload", format!("Upload failed: {}", e)))?;
            let batch: RawGrainBatch = serde_json::from_slice(&bytes).map_err(|e| {
                AppError::validation("upload", format!("Not a valid measurement file: {}", e))
            })?;
            raw_data = Some(batch);
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::validation(&field_name, format!("Unreadable field: {}", e)))?;

        match field_name.as_str() {
            "name" => name = Some(value),
            "standard" => standard = Some(value),
            "note" => note = Some(value),
            "price" => price = parse_param("price", Some(&value))?,
            "samplingPoints" => {
                for part in value.split(',').filter(|p| !p.trim().is_empty()) {
                    let point = SamplingPoint::parse(part).ok_or_else(|| {
                        AppError::validation(
                            "samplingPoints",
                            format!("Unknown sampling point: {}", part.trim()),
                        )
                    })?;
                    sampling_points.push(point);
                }
            }
            "samplingDate" if !value.trim().is_empty() => {
                sampling_date = Some(local_datetime::parse(&value).ok_or_else(|| {
                    AppError::validation("samplingDate", format!("Invalid date-time: {}", value))
                })?);
            }
            other => tracing::debug!("Ignoring form field {}", other),
        }
    }

    let raw_data = raw_data
        .ok_or_else(|| AppError::validation("upload", "A measurement file is required"))?;

    Ok(CreateInspectionInput {
        name: name.unwrap_or_default(),
        standard: standard.unwrap_or_default(),
        note,
        price,
        sampling_points,
        sampling_date,
        upload_file_name,
        raw_data,
    })
}
