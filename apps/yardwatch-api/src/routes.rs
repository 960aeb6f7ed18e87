use axum::{
	Json, Router,
	extract::{State, rejection::JsonRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use yardwatch_domain::{BatchRow, LivePosition, TrailerRecord};
use yardwatch_service::PollerStatus;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
	pub rows: Vec<BatchRow>,
}

#[derive(Debug, Serialize)]
pub struct TrailersResponse {
	pub trailers: Vec<TrailerRecord>,
}

#[derive(Debug, Serialize)]
pub struct LiveResponse {
	pub cycle: u64,
	pub positions: Vec<LivePosition>,
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/trailers", get(trailers))
		.route("/v1/trailers/upload", post(upload))
		.route("/v1/live", get(live))
		.route("/v1/poller", get(poller))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn upload(
	State(state): State<AppState>,
	payload: Result<Json<UploadRequest>, JsonRejection>,
) -> Result<Json<TrailersResponse>, ApiError> {
	let Json(payload) = payload.map_err(|err| {
		let fields = matches!(err, JsonRejection::JsonDataError(_))
			.then(|| vec!["$.rows".to_string()]);

		json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", err.body_text(), fields)
	})?;
	let records = state.engine.upload(&payload.rows);

	Ok(Json(TrailersResponse { trailers: records.as_ref().clone() }))
}

async fn trailers(State(state): State<AppState>) -> Json<TrailersResponse> {
	Json(TrailersResponse { trailers: state.engine.merged_view() })
}

async fn live(State(state): State<AppState>) -> Json<LiveResponse> {
	let snapshot = state.engine.live_snapshot();

	Json(LiveResponse { cycle: snapshot.cycle(), positions: snapshot.iter().cloned().collect() })
}

async fn poller(State(state): State<AppState>) -> Json<PollerStatus> {
	Json(state.poller.status())
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}
