use axum::{
	Json, Router,
	extract::{Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use ais_service::{
	CollectOutcome, CollectRequest, Error, FeedbackReceipt, FeedbackSubmission, RankOutcome,
	RankRequest, RankingSettings,
};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/rank", post(rank))
		.route("/v1/feedback", post(feedback))
		.route("/v1/collect", post(collect))
		.route("/v1/settings", get(current_settings).post(update_settings))
		.route("/v1/blacklist", get(blacklist))
		.with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthBody {
	status: &'static str,
	scorer: String,
	version: &'static str,
}

#[derive(Debug, Deserialize)]
struct BlacklistQuery {
	query: String,
}

#[derive(Debug, Serialize)]
struct BlacklistBody {
	query: String,
	titles: Vec<String>,
}

async fn health(State(state): State<AppState>) -> Json<HealthBody> {
	Json(HealthBody {
		status: "ok",
		scorer: state.engine.cfg.providers.scorer.provider_id.clone(),
		version: ais_cli::VERSION,
	})
}

async fn rank(
	State(state): State<AppState>,
	Json(payload): Json<RankRequest>,
) -> Result<Json<RankOutcome>, ApiError> {
	let outcome = state.engine.rank(payload).await?;

	Ok(Json(outcome))
}

async fn feedback(
	State(state): State<AppState>,
	Json(payload): Json<FeedbackSubmission>,
) -> Result<Json<FeedbackReceipt>, ApiError> {
	let receipt = state.engine.submit_feedback(payload)?;

	state.persist_feedback().await;

	Ok(Json(receipt))
}

async fn collect(
	State(state): State<AppState>,
	Json(payload): Json<CollectRequest>,
) -> Result<Json<CollectOutcome>, ApiError> {
	let outcome = state.engine.collect_matches(payload).await?;

	Ok(Json(outcome))
}

async fn current_settings(State(state): State<AppState>) -> Json<RankingSettings> {
	Json(state.engine.settings())
}

async fn update_settings(
	State(state): State<AppState>,
	Json(payload): Json<RankingSettings>,
) -> Result<StatusCode, ApiError> {
	state.engine.apply_settings(payload)?;

	Ok(StatusCode::NO_CONTENT)
}

async fn blacklist(
	State(state): State<AppState>,
	Query(params): Query<BlacklistQuery>,
) -> Json<BlacklistBody> {
	let titles = state.engine.blacklist_for(&params.query);

	Json(BlacklistBody { query: params.query, titles })
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: &'static str,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: &'static str,
	message: String,
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		let (status, error_code) = match &err {
			Error::ScorerUnavailable { .. } => (StatusCode::BAD_GATEWAY, "scorer_unavailable"),
			Error::Provider { .. } => (StatusCode::BAD_GATEWAY, "provider_error"),
			Error::InvalidRequest { .. } => (StatusCode::BAD_REQUEST, "invalid_request"),
			Error::MalformedRequest { .. } => (StatusCode::BAD_REQUEST, "malformed_request"),
			Error::InsufficientFeedback { .. } =>
				(StatusCode::UNPROCESSABLE_ENTITY, "insufficient_feedback"),
		};

		if status.is_server_error() {
			tracing::warn!(error = %err, error_code, "Request failed.");
		}

		Self { status, error_code, message: err.to_string() }
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
