use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use pv_forecast_services::{config::ForecastConfig, forecast_routes, ForecastState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let today = NaiveDate::from_ymd_opt(2025, 7, 15).unwrap();
    forecast_routes(ForecastState::new(&ForecastConfig::default()).with_clock(move || today))
}

async fn post_raw(app: Router, body: &str, content_type: Option<&str>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method("POST").uri("/forecast/material");
    if let Some(ct) = content_type {
        builder = builder.header(header::CONTENT_TYPE, ct);
    }
    let response = app.oneshot(builder.body(Body::from(body.to_string())).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn post_json(body: Value) -> (StatusCode, Value) {
    let (status, bytes) = post_raw(app(), &body.to_string(), Some("application/json")).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let response = app()
        .oneshot(Request::builder().method("GET").uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_forecast_two_samples() {
    let (status, json) = post_json(json!({
        "materialId": "PANEL-400W",
        "history": [
            {"date": "2025-03-01", "quantityUsed": 10},
            {"date": "2025-03-02T09:15:00Z", "quantityUsed": 20}
        ],
        "horizonDays": 3
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["materialId"], "PANEL-400W");
    assert_eq!(json["horizonDays"], 3);
    assert_eq!(
        json["forecast"],
        json!([
            {"date": "2025-03-03", "quantityForecast": 15.0},
            {"date": "2025-03-04", "quantityForecast": 15.0},
            {"date": "2025-03-05", "quantityForecast": 15.0}
        ])
    );
}

#[tokio::test]
async fn test_forecast_default_horizon_on_empty_history() {
    let (status, json) = post_json(json!({"materialId": "INV-5K", "history": []})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["horizonDays"], 90);
    let points = json["forecast"].as_array().unwrap();
    assert_eq!(points.len(), 90);
    assert_eq!(points[0]["date"], "2025-07-16");
    assert_eq!(points[89]["date"], "2025-10-13");
    assert!(points.iter().all(|p| p["quantityForecast"] == 0.0));
}

#[tokio::test]
async fn test_forecast_window_is_trailing_thirty() {
    let history: Vec<Value> = (0..45)
        .map(|i| {
            let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Days::new(i);
            let q = if i < 15 { 1000.0 } else { 3.0 };
            json!({"date": date.to_string(), "quantityUsed": q})
        })
        .collect();

    let (status, json) =
        post_json(json!({"materialId": "RAIL", "history": history, "horizonDays": 5})).await;

    assert_eq!(status, StatusCode::OK);
    let points = json["forecast"].as_array().unwrap();
    assert_eq!(points.len(), 5);
    assert_eq!(points[0]["date"], "2025-02-15");
    assert!(points.iter().all(|p| p["quantityForecast"] == 3.0));
}

#[tokio::test]
async fn test_missing_material_id_is_422() {
    let (status, json) = post_json(json!({"history": []})).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let detail = json["detail"].as_array().unwrap();
    assert_eq!(detail[0]["loc"], json!(["body", "materialId"]));
    assert_eq!(detail[0]["type"], "missing");
}

#[tokio::test]
async fn test_bad_history_date_is_located() {
    let (status, json) = post_json(json!({
        "materialId": "M",
        "history": [
            {"date": "2025-03-01", "quantityUsed": 1},
            {"date": "yesterday", "quantityUsed": 1}
        ]
    }))
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["detail"][0]["loc"], json!(["body", "history", 1, "date"]));
}

#[tokio::test]
async fn test_wrong_type_is_422() {
    let (status, json) =
        post_json(json!({"materialId": "M", "history": [], "horizonDays": "ninety"})).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["detail"][0]["loc"], json!(["body", "horizonDays"]));
    assert_eq!(json["detail"][0]["type"], "invalid_type");
}

#[tokio::test]
async fn test_malformed_json_is_422() {
    let (status, bytes) = post_raw(app(), "{\"materialId\": ", Some("application/json")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["detail"][0]["type"], "json_invalid");
}

#[tokio::test]
async fn test_missing_content_type_is_422() {
    let (status, _) = post_raw(app(), r#"{"materialId": "M", "history": []}"#, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_identical_requests_give_identical_bytes() {
    let body = r#"{"materialId":"M","history":[{"date":"2025-01-01","quantityUsed":2.5}],"horizonDays":10}"#;
    let first = post_raw(app(), body, Some("application/json")).await;
    let second = post_raw(app(), body, Some("application/json")).await;
    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let response = app()
        .oneshot(Request::builder().uri("/simulate").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let response = app()
        .oneshot(Request::builder().uri("/openapi.json").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert!(json["paths"]["/forecast/material"]["post"].is_object());
}

#[tokio::test]
async fn test_huge_quantities_give_a_finite_forecast() {
    let (status, json) = post_json(json!({
        "materialId": "M",
        "history": [
            {"date": "2025-03-01", "quantityUsed": 1e308},
            {"date": "2025-03-02", "quantityUsed": 1e308}
        ],
        "horizonDays": 2
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    let points = json["forecast"].as_array().unwrap();
    assert_eq!(points.len(), 2);
    assert!(points.iter().all(|p| p["quantityForecast"] == 1e308));
}

#[tokio::test]
async fn test_date_beyond_year_9999_is_422() {
    for date in ["+262142-12-25", "10000-01-01"] {
        let (status, json) = post_json(json!({
            "materialId": "M",
            "history": [{"date": date, "quantityUsed": 1}],
            "horizonDays": 30
        }))
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{date}");
        assert_eq!(json["detail"][0]["loc"], json!(["body", "history", 0, "date"]));
    }
}

#[tokio::test]
async fn test_horizon_running_past_year_9999_is_422() {
    let (status, json) = post_json(json!({
        "materialId": "M",
        "history": [{"date": "9999-12-25", "quantityUsed": 1}],
        "horizonDays": 30
    }))
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["detail"].as_array().unwrap().len(), 1);
    assert_eq!(json["detail"][0]["loc"], json!(["body", "horizonDays"]));
    assert_eq!(json["detail"][0]["type"], "value_error");

    let (status, json) = post_json(json!({
        "materialId": "M",
        "history": [{"date": "9999-12-25", "quantityUsed": 1}],
        "horizonDays": 6
    }))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["forecast"][5]["date"], "9999-12-31");
}

#[tokio::test]
async fn test_integral_float_horizon_is_accepted() {
    let (status, json) =
        post_json(json!({"materialId": "M", "history": [], "horizonDays": 3.0})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["horizonDays"], 3);
    assert_eq!(json["forecast"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_fractional_horizon_is_422() {
    let (status, json) =
        post_json(json!({"materialId": "M", "history": [], "horizonDays": 3.5})).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["detail"][0]["loc"], json!(["body", "horizonDays"]));
    assert_eq!(json["detail"][0]["type"], "value_error");
}

#[tokio::test]
async fn test_only_first_invalid_field_is_reported() {
    let (status, json) = post_json(json!({
        "materialId": 42,
        "history": [{"date": "yesterday", "quantityUsed": "lots"}],
        "horizonDays": "ninety"
    }))
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let detail = json["detail"].as_array().unwrap();
    assert_eq!(detail.len(), 1);
    assert_eq!(detail[0]["loc"], json!(["body", "materialId"]));
}
