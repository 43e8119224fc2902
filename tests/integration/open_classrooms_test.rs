//! Integration tests for the open classrooms API
//!
//! Drives the full router against a dataset file with a fixed clock (10:00).

use anyhow::Result;
use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::NaiveTime;
use http_body_util::BodyExt;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use std::io::Write;
use std::net::SocketAddr;
use tempfile::NamedTempFile;
use tower::ServiceExt;

use study_space_api::config::{Config, RateLimitConfig};
use study_space_api::router::build_router;
use study_space_api::services::SpaceDataset;
use study_space_api::AppState;

// User location for POST requests. FAR is ~2 km north of it, NEAR ~1 km.
const USER_LAT: f64 = 42.35;
const USER_LNG: f64 = -71.10;

fn dataset_json() -> Value {
    json!([
        {
            "name": "Far Hall",
            "code": "FAR",
            "coordinates": [-71.10, 42.367986],
            "rooms": [
                {"roomNumber": "1", "schedule": [{"Slots": [{"StartTime": "09:00:00", "EndTime": "17:00:00"}]}]}
            ]
        },
        {
            "name": "Near Hall",
            "code": "NEAR",
            "coordinates": [-71.10, 42.358993],
            "rooms": [
                {"roomNumber": "1", "schedule": [{"Slots": [{"StartTime": "10:10:00", "EndTime": "11:00:00"}]}]},
                {"roomNumber": "2", "schedule": [{"Slots": [{"StartTime": "07:00:00", "EndTime": "08:00:00"}]}]}
            ]
        },
        {
            "name": "Closed Hall",
            "code": "CLS",
            "coordinates": [-71.10, 42.35],
            "rooms": [
                {"roomNumber": "1", "schedule": [{"Slots": [
                    {"StartTime": "07:00:00", "EndTime": "08:00:00"},
                    {"StartTime": "08:00:00", "EndTime": "09:30:00"}
                ]}]}
            ]
        }
    ])
}

fn write_dataset(value: &Value) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    write!(file, "{}", value)?;
    Ok(file)
}

fn app_with(dataset: &Value, rate_limit: RateLimitConfig) -> Result<Router> {
    app_from(
        dataset,
        Config {
            rate_limit,
            ..Config::default()
        },
    )
}

fn app_from(dataset: &Value, base: Config) -> Result<Router> {
    let file = write_dataset(dataset)?;
    let config = Config {
        data_path: file.path().display().to_string(),
        current_time_override: NaiveTime::from_hms_opt(10, 0, 0),
        ..base
    };

    let dataset = SpaceDataset::load(&config.data_path)?;
    let handle = PrometheusBuilder::new().build_recorder().handle();
    Ok(build_router(AppState::new(config, dataset, handle)))
}

fn app() -> Result<Router> {
    app_with(&dataset_json(), RateLimitConfig::default())
}

async fn send(app: Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = app.oneshot(request).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Ok((status, body))
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/open-classrooms")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

fn codes(body: &Value) -> Vec<&str> {
    body.as_array()
        .expect("array body")
        .iter()
        .map(|building| building["building_code"].as_str().expect("code"))
        .collect()
}

#[tokio::test]
async fn test_get_keeps_dataset_order_with_zero_distance() -> Result<()> {
    let (status, body) = send(app()?, get("/api/open-classrooms")).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(codes(&body), vec!["FAR", "NEAR"]);
    for building in body.as_array().expect("array") {
        assert_eq!(building["distance"].as_f64(), Some(0.0));
    }

    let far = &body[0];
    assert_eq!(far["building"], "Far Hall");
    assert_eq!(far["building_status"], "available");
    assert_eq!(far["coords"], json!([-71.10, 42.367986]));
    assert_eq!(
        far["rooms"]["1"]["slots"],
        json!([{"StartTime": "09:00:00", "EndTime": "17:00:00", "Status": "available"}])
    );
    Ok(())
}

#[tokio::test]
async fn test_passed_slots_rooms_and_buildings_are_dropped() -> Result<()> {
    let (_, body) = send(app()?, get("/api/open-classrooms")).await?;

    // Closed Hall has only passed slots
    assert!(!codes(&body).contains(&"CLS"));

    let near = &body[1];
    assert_eq!(near["building_status"], "upcoming");
    let rooms = near["rooms"].as_object().expect("rooms object");
    assert_eq!(rooms.keys().collect::<Vec<_>>(), vec!["1"]);
    assert_eq!(near["rooms"]["1"]["slots"][0]["Status"], "upcoming");
    Ok(())
}

#[tokio::test]
async fn test_post_sorts_by_distance() -> Result<()> {
    let request = post_json(&json!({"lat": USER_LAT, "lng": USER_LNG}).to_string());
    let (status, body) = send(app()?, request).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(codes(&body), vec!["NEAR", "FAR"]);

    let near = body[0]["distance"].as_f64().expect("distance");
    let far = body[1]["distance"].as_f64().expect("distance");
    assert!((near - 1.0).abs() < 0.01, "near was {near}");
    assert!((far - 2.0).abs() < 0.01, "far was {far}");
    Ok(())
}

#[tokio::test]
async fn test_post_accepts_numeric_strings() -> Result<()> {
    let request = post_json(r#"{"lat": "42.35", "lng": "-71.10"}"#);
    let (status, body) = send(app()?, request).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(codes(&body), vec!["NEAR", "FAR"]);
    Ok(())
}

#[tokio::test]
async fn test_post_invalid_latitude() -> Result<()> {
    let request = post_json(r#"{"lat": "invalid", "lng": -71.1}"#);
    let (status, body) = send(app()?, request).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = body["error"].as_str().expect("error string");
    assert!(error.contains("Invalid location data"));
    assert!(error.contains("must be numbers"));
    Ok(())
}

#[tokio::test]
async fn test_post_out_of_range() -> Result<()> {
    let request = post_json(r#"{"lat": 100, "lng": -71.1}"#);
    let (status, body) = send(app()?, request).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().expect("error string").contains("out of range"));
    assert_eq!(body["code"], "VAL_3004");
    Ok(())
}

#[tokio::test]
async fn test_post_missing_coordinates() -> Result<()> {
    let (status, body) = send(app()?, post_json(r#"{"lat": 42.35}"#)).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Invalid location data. 'lat' and 'lng' are required."
    );
    Ok(())
}

#[tokio::test]
async fn test_post_without_data() -> Result<()> {
    for payload in ["", "null", "{not json"] {
        let (status, body) = send(app()?, post_json(payload)).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload:?}");
        assert_eq!(body["error"], "No data provided", "payload {payload:?}");
    }

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/open-classrooms")
        .body(Body::from(r#"{"lat": 42.35, "lng": -71.1}"#))?;
    let (status, body) = send(app()?, request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No data provided");
    Ok(())
}

#[tokio::test]
async fn test_malformed_slot_time_is_internal_error() -> Result<()> {
    let dataset = json!([
        {
            "name": "Broken Hall",
            "code": "BRK",
            "coordinates": [-71.1, 42.35],
            "rooms": [
                {"roomNumber": "1", "schedule": [{"Slots": [{"StartTime": "9 o'clock", "EndTime": "17:00:00"}]}]}
            ]
        }
    ]);
    let app = app_with(&dataset, RateLimitConfig::default())?;

    let (status, body) = send(app, get("/api/open-classrooms")).await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
    Ok(())
}

#[tokio::test]
async fn test_health() -> Result<()> {
    let (status, body) = send(app()?, get("/api/health")).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["buildings_loaded"], 3);
    assert!(body["timestamp"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_unknown_route() -> Result<()> {
    let (status, body) = send(app()?, get("/api/nothing-here")).await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
    Ok(())
}

#[tokio::test]
async fn test_error_body_carries_response_request_id() -> Result<()> {
    let response = app()?.oneshot(post_json(r#"{"lat": 100, "lng": 0}"#)).await?;

    let header_id = response
        .headers()
        .get("x-request-id")
        .expect("request id header")
        .to_str()?
        .to_string();
    let bytes = response.into_body().collect().await?.to_bytes();
    let body: Value = serde_json::from_slice(&bytes)?;

    assert_eq!(body["request_id"], header_id);
    Ok(())
}

fn from_peer(peer: [u8; 4], forwarded_for: &str) -> Request<Body> {
    Request::builder()
        .uri("/api/open-classrooms")
        .header("x-forwarded-for", forwarded_for)
        .extension(ConnectInfo(SocketAddr::from((peer, 40_000))))
        .body(Body::empty())
        .expect("valid request")
}

fn two_per_minute() -> RateLimitConfig {
    RateLimitConfig {
        max_requests: 2,
        window_secs: 60,
    }
}

#[tokio::test]
async fn test_rate_limit_exceeded() -> Result<()> {
    let app = app_with(&dataset_json(), two_per_minute())?;

    for _ in 0..2 {
        let response = app.clone().oneshot(from_peer([198, 51, 100, 7], "203.0.113.1")).await?;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.clone().oneshot(from_peer([198, 51, 100, 7], "203.0.113.1")).await?;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = response
        .headers()
        .get(header::RETRY_AFTER)
        .expect("Retry-After header")
        .to_str()?
        .parse()?;
    assert!(retry_after >= 1 && retry_after <= 60);

    // Another client still has its own budget
    let response = app.oneshot(from_peer([198, 51, 100, 8], "203.0.113.1")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_rotating_forwarded_for_does_not_reset_limit() -> Result<()> {
    let app = app_with(&dataset_json(), two_per_minute())?;

    let mut statuses = Vec::new();
    for last_octet in 1..=5 {
        let forwarded = format!("203.0.113.{last_octet}");
        let response = app.clone().oneshot(from_peer([198, 51, 100, 7], &forwarded)).await?;
        statuses.push(response.status());
    }

    assert_eq!(
        statuses,
        vec![
            StatusCode::OK,
            StatusCode::OK,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::TOO_MANY_REQUESTS,
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_trusted_proxy_headers_identify_clients() -> Result<()> {
    let app = app_from(
        &dataset_json(),
        Config {
            rate_limit: two_per_minute(),
            trust_proxy_headers: true,
            ..Config::default()
        },
    )?;

    // Same proxy address, distinct forwarded clients
    for _ in 0..2 {
        let response = app.clone().oneshot(from_peer([10, 0, 0, 1], "203.0.113.1")).await?;
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = app.clone().oneshot(from_peer([10, 0, 0, 1], "203.0.113.1")).await?;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let response = app.oneshot(from_peer([10, 0, 0, 1], "203.0.113.2")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}
