use std::sync::Arc;

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::Value;
use tower::util::ServiceExt;

use yardwatch_api::{routes, state::AppState};
use yardwatch_domain::LivePosition;
use yardwatch_service::{CancelToken, FleetEngine, PollerStats};
use yardwatch_testkit::{TEN_KM_OUT, YARD_CENTER, test_config};

fn test_app() -> (Router, Arc<FleetEngine>) {
	let engine = Arc::new(FleetEngine::from_config(&test_config()));
	let state = AppState::new(engine.clone(), Arc::new(PollerStats::default()));

	(routes::router(state), engine)
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
	let response = app.clone().oneshot(request).await.expect("Failed to call router.");
	let status = response.status();
	let body = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json = if body.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&body).expect("Failed to parse response.")
	};

	(status, json)
}

fn get(uri: &str) -> Request<Body> {
	Request::builder().uri(uri).body(Body::empty()).expect("Failed to build request.")
}

fn post_json(uri: &str, payload: Value) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri(uri)
		.header("content-type", "application/json")
		.body(Body::from(payload.to_string()))
		.expect("Failed to build request.")
}

#[tokio::test]
async fn health_ok() {
	let (app, _) = test_app();
	let (status, _) = call(&app, get("/health")).await;

	assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn upload_returns_classified_records() {
	let (app, _) = test_app();
	let payload = serde_json::json!({
		"rows": [
			{ "id": "T-1", "lastService": "2024-05-01", "lat": "-33.870", "lng": "151.200" },
			{ "lat": "abc", "lng": 151.2 }
		]
	});
	let (status, json) = call(&app, post_json("/v1/trailers/upload", payload)).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["trailers"][0]["id"], "T-1");
	assert_eq!(json["trailers"][0]["lastService"], "2024-05-01");
	assert!(json["trailers"][0].get("last_service").is_none());
	assert_eq!(json["trailers"][0]["status"], "in_yard");
	assert_eq!(json["trailers"][1]["id"], "TRAILER-1");
	assert_eq!(json["trailers"][1]["lastService"], "Unknown");
	assert_eq!(json["trailers"][1]["status"], "out_for_job");
	assert_eq!(json["trailers"][1]["location"]["lat"], Value::Null);
}

#[tokio::test]
async fn upload_rejects_malformed_body() {
	let (app, _) = test_app();
	let (status, json) =
		call(&app, post_json("/v1/trailers/upload", serde_json::json!({ "rows": 7 }))).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "INVALID_REQUEST");
	assert_eq!(json["fields"][0], "$.rows");
}

#[tokio::test]
async fn trailers_view_merges_live_positions() {
	let (app, engine) = test_app();
	let payload = serde_json::json!({
		"rows": [{ "id": "T-1", "lastService": "2024-05-01", "lat": -33.870, "lng": 151.200 }]
	});

	call(&app, post_json("/v1/trailers/upload", payload)).await;
	engine.apply_cycle(
		&CancelToken::new(),
		vec![
			LivePosition::new(engine.yard(), "T-1", TEN_KM_OUT),
			LivePosition::new(engine.yard(), "GPS-1", YARD_CENTER),
		],
		|_| {},
	);

	let (status, json) = call(&app, get("/v1/trailers")).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["trailers"].as_array().map(Vec::len), Some(1));
	assert_eq!(json["trailers"][0]["status"], "out_for_job");
	assert_eq!(json["trailers"][0]["lastService"], "2024-05-01");

	let (status, json) = call(&app, get("/v1/live")).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["cycle"], 1);
	assert_eq!(json["positions"][1]["id"], "GPS-1");
	assert_eq!(json["positions"][1]["status"], "in_yard");
}

#[tokio::test]
async fn poller_status_starts_idle() {
	let (app, _) = test_app();
	let (status, json) = call(&app, get("/v1/poller")).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["running"], false);
	assert_eq!(json["cycles_applied"], 0);
	assert_eq!(json["last_success_at"], Value::Null);
}
