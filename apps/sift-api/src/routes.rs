use axum::{
	Json, Router,
	extract::{Request, State},
	http::{HeaderMap, StatusCode, header},
	middleware::{self, Next},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use sift_engine::{Distribution, Error, Limits, RecommendRequest, Recommendation};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	let v1 = Router::new()
		.route("/v1/recommend", post(recommend))
		.route("/v1/recommend/url", post(recommend_from_url))
		.route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

	Router::new().route("/health", get(health)).merge(v1).with_state(state)
}

#[derive(Debug, Serialize)]
pub struct RecommendBody {
	pub recommended_assessments: Vec<AssessmentView>,
	pub distribution: Option<Distribution>,
}

#[derive(Debug, Deserialize)]
pub struct UrlRecommendRequest {
	pub url: String,
	#[serde(default)]
	pub min_total: Option<usize>,
	#[serde(default)]
	pub max_total: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct UrlRecommendBody {
	pub source_url: String,
	pub extracted_job_title: Option<String>,
	pub extracted_query: String,
	pub recommended_assessments: Vec<AssessmentView>,
	pub distribution: Option<Distribution>,
}

#[derive(Debug, Serialize)]
pub struct AssessmentView {
	pub url: String,
	pub name: String,
	pub description: String,
	pub duration: Option<u32>,
	pub remote_support: &'static str,
	pub adaptive_support: &'static str,
	pub test_type: Vec<&'static str>,
	pub similarity_score: f32,
}
impl From<Recommendation> for AssessmentView {
	fn from(item: Recommendation) -> Self {
		Self {
			url: item.url,
			name: item.name,
			description: item.description,
			duration: item.duration_minutes,
			remote_support: item.remote_ready.label(),
			adaptive_support: if item.adaptive_support { "Yes" } else { "No" },
			test_type: vec![item.category.display_name()],
			similarity_score: item.similarity_score,
		}
	}
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn recommend(
	State(state): State<AppState>,
	Json(payload): Json<RecommendRequest>,
) -> Result<Json<RecommendBody>, ApiError> {
	if payload.query.trim().is_empty() {
		return Err(invalid_request("query must not be empty.", "$.query"));
	}

	check_limits(&state, payload.min_total, payload.max_total)?;

	let (recommended_assessments, distribution) = run_recommend(&state, payload).await?;

	Ok(Json(RecommendBody { recommended_assessments, distribution }))
}

async fn recommend_from_url(
	State(state): State<AppState>,
	Json(payload): Json<UrlRecommendRequest>,
) -> Result<Json<UrlRecommendBody>, ApiError> {
	if payload.url.trim().is_empty() {
		return Err(invalid_request("url must not be empty.", "$.url"));
	}

	check_limits(&state, payload.min_total, payload.max_total)?;

	let posting = state.posting.read(&payload.url).await.map_err(|err| match err {
		Error::InvalidRequest { message } => invalid_request(message, "$.url"),
		Error::Fetch { message } =>
			json_error(StatusCode::BAD_REQUEST, "POSTING_FETCH_FAILED", message, None),
		Error::UnreadablePosting { message } =>
			json_error(StatusCode::UNPROCESSABLE_ENTITY, "POSTING_UNREADABLE", message, None),
		other => {
			let message = other.to_string();

			json_error(StatusCode::INTERNAL_SERVER_ERROR, "POSTING_FAILED", message, None)
		},
	})?;
	let request = RecommendRequest {
		query: posting.query.clone(),
		min_total: payload.min_total,
		max_total: payload.max_total,
	};
	let (recommended_assessments, distribution) = run_recommend(&state, request).await?;

	Ok(Json(UrlRecommendBody {
		source_url: posting.source_url,
		extracted_job_title: posting.title,
		extracted_query: posting.query,
		recommended_assessments,
		distribution,
	}))
}

fn check_limits(
	state: &AppState,
	min_total: Option<usize>,
	max_total: Option<usize>,
) -> Result<Limits, ApiError> {
	state.recommender.limits_for(min_total, max_total).map_err(|err| {
		json_error(
			StatusCode::BAD_REQUEST,
			"INVALID_REQUEST",
			err.to_string(),
			Some(vec!["$.min_total".to_string(), "$.max_total".to_string()]),
		)
	})
}

async fn run_recommend(
	state: &AppState,
	request: RecommendRequest,
) -> Result<(Vec<AssessmentView>, Option<Distribution>), ApiError> {
	let response = state.recommender.recommend(request).await;

	if !response.is_success() {
		return Err(json_error(
			StatusCode::INTERNAL_SERVER_ERROR,
			"RECOMMENDATION_FAILED",
			response.error_message.unwrap_or_else(|| "Recommendation failed.".to_string()),
			None,
		));
	}

	let views = response.recommendations.into_iter().map(AssessmentView::from).collect();

	Ok((views, response.distribution))
}

async fn require_bearer(
	State(state): State<AppState>,
	req: Request,
	next: Next,
) -> Result<Response, ApiError> {
	if let Some(expected) = state.auth_token.as_deref()
		&& read_bearer_token(req.headers()) != Some(expected)
	{
		return Err(json_error(
			StatusCode::UNAUTHORIZED,
			"UNAUTHORIZED",
			"A valid Bearer token is required.",
			None,
		));
	}

	Ok(next.run(req).await)
}

fn read_bearer_token(headers: &HeaderMap) -> Option<&str> {
	let raw = headers.get(header::AUTHORIZATION)?;
	let value = raw.to_str().ok()?.trim();
	let token = value.strip_prefix("Bearer ")?.trim();

	if token.is_empty() { None } else { Some(token) }
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
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

fn invalid_request(message: impl Into<String>, field: &str) -> ApiError {
	json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message, Some(vec![field.to_string()]))
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError { status, error_code: code.to_string(), message: message.into(), fields }
}
