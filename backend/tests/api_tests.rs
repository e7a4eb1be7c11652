//! HTTP API tests
//!
//! Drives the full router with an in-memory store and fixed standards:
//! - Create, fetch and report an inspection
//! - History search, date filter and pagination
//! - Edits keep the computed result
//! - Single and bulk delete
//! - Error statuses and bodies

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use rice_inspection_backend::{
    create_app, external::StandardsClient, storage::MemoryStore, AppState, Config,
};
use shared::{MaxCondition, MinCondition, Standard, StandardRule};

// ============================================================================
// Harness
// ============================================================================

fn standard() -> Standard {
    Standard {
        id: "1".to_string(),
        name: "Standard 1".to_string(),
        create_date: None,
        standard_data: vec![
            StandardRule {
                key: Some("wholegrain".to_string()),
                name: "Class A".to_string(),
                shape: vec!["whole".to_string()],
                min_length: 4.0,
                max_length: 6.0,
                condition_min: MinCondition::Ge,
                condition_max: MaxCondition::Le,
            },
            StandardRule {
                key: Some("broken".to_string()),
                name: "Broken".to_string(),
                shape: vec!["broken".to_string()],
                min_length: 0.0,
                max_length: 4.0,
                condition_min: MinCondition::Ge,
                condition_max: MaxCondition::Lt,
            },
        ],
    }
}

fn app() -> Router {
    create_app(AppState::new(
        Arc::new(MemoryStore::new()),
        StandardsClient::fixed(vec![standard()]),
        Config::default(),
    ))
}

fn raw_data(request_id: &str) -> Value {
    json!({
        "requestID": request_id,
        "imageURL": "https://example.com/sample.jpg",
        "grains": [
            {"length": 5.0, "weight": 1.0, "shape": "whole", "riceType": "white"},
            {"length": 2.0, "weight": 1.0, "shape": "broken", "riceType": "chalky"}
        ]
    })
}

fn create_body(request_id: &str) -> Value {
    json!({
        "name": "Lot 7",
        "standard": "1",
        "note": "first pass",
        "price": "1500.50",
        "samplingPoints": ["Front End"],
        "samplingDate": "2024-10-10T09:30",
        "uploadFileName": "raw.json",
        "rawData": raw_data(request_id)
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

async fn create(app: &Router, request_id: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/history",
        Some(create_body(request_id)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

// ============================================================================
// Create and read
// ============================================================================

mod create_and_read {
    use super::*;

    #[tokio::test]
    async fn test_create_returns_graded_record() {
        let app = app();
        let record = create(&app, "EX01").await;

        assert_eq!(record["inspectionId"], "EX01");
        assert_eq!(record["standardName"], "Standard 1");
        assert_eq!(record["imageUrl"], "https://example.com/sample.jpg");
        assert_eq!(record["samplingDate"], "2024-10-10T09:30:00");
        assert_eq!(record["result"]["typeWeightPercent"]["white"], "50.00");
        assert_eq!(record["result"]["typeWeightPercent"]["chalky"], "50.00");
        assert_eq!(record["result"]["shapeWeightPercent"]["Class A"], "50.00");
        assert_eq!(record["result"]["shapeWeightPercent"]["Broken"], "50.00");
        assert_eq!(record["standardData"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let app = app();
        let record = create(&app, "EX01").await;
        let id = record["id"].as_str().unwrap();

        let uri = format!("/api/v1/history/{}", id);
        let (status, fetched) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, record);
    }

    #[tokio::test]
    async fn test_report_view() {
        let app = app();
        let record = create(&app, "EX01").await;
        let id = record["id"].as_str().unwrap();

        let uri = format!("/api/v1/result/{}", id);
        let (status, report) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);

        let composition = report["composition"].as_array().unwrap();
        assert_eq!(composition.len(), 2);
        assert_eq!(composition[0]["name"], "Class A");
        assert_eq!(composition[0]["lengthRange"], "4 - 6");
        assert_eq!(composition[0]["actualPercent"], "50.00");

        let defects = report["defects"].as_array().unwrap();
        assert_eq!(defects.len(), 1);
        assert_eq!(defects[0]["type"], "chalky");
        assert_eq!(report["defectTotalPercent"], "50.00");
    }

    #[tokio::test]
    async fn test_unknown_id_is_404() {
        let app = app();
        let uri = format!("/api/v1/history/{}", uuid::Uuid::new_v4());
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_standards_listed() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/api/v1/standards", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["name"], "Standard 1");
        assert_eq!(body[0]["standardData"][1]["conditionMax"], "LT");
    }

    #[tokio::test]
    async fn test_health_reports_count() {
        let app = app();
        create(&app, "EX01").await;
        let (status, body) = send(&app, Method::GET, "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["storage"], "available");
        assert_eq!(body["inspections"], 1);
    }
}

// ============================================================================
// Create validation
// ============================================================================

mod create_validation {
    use super::*;

    #[tokio::test]
    async fn test_zero_weight_batch_is_400() {
        let app = app();
        let mut body = create_body("EX01");
        body["rawData"]["grains"] = json!([
            {"length": 5.0, "weight": 0.0, "shape": "whole", "riceType": "white"}
        ]);

        let (status, body) = send(&app, Method::POST, "/api/v1/history", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "upload");
    }

    #[tokio::test]
    async fn test_negative_weight_is_422() {
        let app = app();
        let mut body = create_body("EX01");
        body["rawData"]["grains"][0]["weight"] = json!(-1.0);
        body["rawData"]["grains"][1]["weight"] = json!(3.0);

        let (status, body) = send(&app, Method::POST, "/api/v1/history", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "INVALID_MEASUREMENT");
    }

    #[tokio::test]
    async fn test_unknown_standard_is_400() {
        let app = app();
        let mut body = create_body("EX01");
        body["standard"] = json!("Standard 9");

        let (status, body) = send(&app, Method::POST, "/api/v1/history", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "standard");
    }

    #[tokio::test]
    async fn test_price_with_three_decimals_is_400() {
        let app = app();
        let mut body = create_body("EX01");
        body["price"] = json!("10.125");

        let (status, body) = send(&app, Method::POST, "/api/v1/history", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "price");
    }

    #[tokio::test]
    async fn test_blank_name_is_400() {
        let app = app();
        let mut body = create_body("EX01");
        body["name"] = json!("   ");

        let (status, body) = send(&app, Method::POST, "/api/v1/history", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "name");
    }
}

// ============================================================================
// History listing
// ============================================================================

mod history {
    use super::*;

    #[tokio::test]
    async fn test_prefix_search() {
        let app = app();
        create(&app, "AB-1").await;
        create(&app, "AB-2").await;
        create(&app, "CD-1").await;

        let (status, body) = send(&app, Method::GET, "/api/v1/history?id=AB", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["total_items"], 2);
        let ids: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["inspectionId"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["AB-1", "AB-2"]);
    }

    #[tokio::test]
    async fn test_pagination() {
        let app = app();
        for i in 0..3 {
            create(&app, &format!("EX{:02}", i)).await;
        }

        let (status, body) = send(&app, Method::GET, "/api/v1/history?page=2&limit=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["inspectionId"], "EX02");
        assert_eq!(body["pagination"]["page"], 2);
        assert_eq!(body["pagination"]["total_pages"], 2);
    }

    #[tokio::test]
    async fn test_blank_filters_list_everything() {
        let app = app();
        create(&app, "EX01").await;

        let (status, body) = send(
            &app,
            Method::GET,
            "/api/v1/history?id=&fromDate=&toDate=&page=",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["total_items"], 1);
    }

    #[tokio::test]
    async fn test_date_window_excludes_other_days() {
        let app = app();
        create(&app, "EX01").await;

        let (status, body) = send(
            &app,
            Method::GET,
            "/api/v1/history?fromDate=2000-01-01&toDate=2000-01-31",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["total_items"], 0);
    }

    #[tokio::test]
    async fn test_malformed_date_is_400() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::GET,
            "/api/v1/history?fromDate=10-10-2024",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "fromDate");
    }
}

// ============================================================================
// Edit and delete
// ============================================================================

mod edit_and_delete {
    use super::*;

    #[tokio::test]
    async fn test_update_keeps_result() {
        let app = app();
        let record = create(&app, "EX01").await;
        let uri = format!("/api/v1/history/{}", record["id"].as_str().unwrap());

        let edit = json!({
            "note": "re-sampled",
            "price": "2000",
            "samplingDate": "2024-10-11T08:00:00",
            "samplingPoints": ["Back End", "Other"]
        });
        let (status, updated) = send(&app, Method::PUT, &uri, Some(edit)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["note"], "re-sampled");
        assert_eq!(updated["samplingPoints"], json!(["Back End", "Other"]));
        assert_eq!(updated["result"], record["result"]);
        assert_eq!(updated["createdAt"], record["createdAt"]);

        let (_, fetched) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(fetched["note"], "re-sampled");
    }

    #[tokio::test]
    async fn test_update_rejects_duplicate_sampling_points() {
        let app = app();
        let record = create(&app, "EX01").await;
        let uri = format!("/api/v1/history/{}", record["id"].as_str().unwrap());

        let edit = json!({"samplingPoints": ["Other", "Other"]});
        let (status, _) = send(&app, Method::PUT, &uri, Some(edit)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_one() {
        let app = app();
        let record = create(&app, "EX01").await;
        let uri = format!("/api/v1/history/{}", record["id"].as_str().unwrap());

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bulk_delete() {
        let app = app();
        let a = create(&app, "EX01").await;
        let b = create(&app, "EX02").await;
        create(&app, "EX03").await;
        let missing = uuid::Uuid::new_v4().to_string();

        let (status, body) = send(
            &app,
            Method::DELETE,
            "/api/v1/history",
            Some(json!({"ids": [a["id"], b["id"], missing]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleted"].as_array().unwrap().len(), 2);
        assert_eq!(body["notFound"], json!([missing]));

        let (_, list) = send(&app, Method::GET, "/api/v1/history", None).await;
        assert_eq!(list["pagination"]["total_items"], 1);
        assert_eq!(list["data"][0]["inspectionId"], "EX03");
    }

    #[tokio::test]
    async fn test_bulk_delete_requires_ids() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::DELETE,
            "/api/v1/history",
            Some(json!({"ids": []})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "ids");
    }
}

// ============================================================================
// Multipart upload
// ============================================================================

mod upload {
    use super::*;

    const BOUNDARY: &str = "rice-boundary";

    fn form(fields: &[(&str, &str)], file: Option<&str>) -> String {
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            ));
        }
        if let Some(content) = file {
            body.push_str(&format!(
                "--{}\r\n\
                 Content-Disposition: form-data; name=\"upload\"; filename=\"raw.json\"\r\n\
                 Content-Type: application/json\r\n\r\n{}\r\n",
                BOUNDARY, content
            ));
        }
        body.push_str(&format!("--{}--\r\n", BOUNDARY));
        body
    }

    async fn post_form(app: &Router, body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/history/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_upload_creates_inspection() {
        let app = app();
        let file = raw_data("UP01").to_string();
        let body = form(
            &[
                ("name", "Lot 9"),
                ("standard", "Standard 1"),
                ("price", "99.5"),
                ("samplingPoints", "Front End,Back End"),
                ("samplingDate", "2024-10-10T09:30"),
            ],
            Some(&file),
        );

        let (status, record) = post_form(&app, body).await;
        assert_eq!(status, StatusCode::CREATED, "{}", record);
        assert_eq!(record["inspectionId"], "UP01");
        assert_eq!(record["uploadFileName"], "raw.json");
        assert_eq!(record["samplingPoints"], json!(["Front End", "Back End"]));
        assert_eq!(record["result"]["shapeWeightPercent"]["Class A"], "50.00");
    }

    #[tokio::test]
    async fn test_upload_without_file_is_400() {
        let app = app();
        let body = form(&[("name", "Lot 9"), ("standard", "1")], None);
        let (status, body) = post_form(&app, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "upload");
    }

    #[tokio::test]
    async fn test_upload_with_unreadable_file_is_400() {
        let app = app();
        let body = form(&[("name", "Lot 9"), ("standard", "1")], Some("not json"));
        let (status, body) = post_form(&app, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "upload");
    }
}
