use std::sync::Arc;

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::Value;
use tower::util::ServiceExt;

use sift_api::{routes, state::AppState};
use sift_domain::{Category, PrimaryFocus, QueryIntent, Specificity};
use sift_engine::{PostingReader, Recommender};
use sift_testkit::{FixedIntent, StaticCompletion, StaticIndex, StaticPage, hit};

const POSTING_HTML: &str = "<html><head><title>Careers</title></head><body>\
<h1>Data Analyst</h1><div class=\"mt4\">Analyse sales data in Python and SQL, then present \
findings to regional managers every week.</div></body></html>";

fn intent() -> QueryIntent {
	QueryIntent {
		primary_focus: PrimaryFocus::Balanced,
		specificity: Specificity::Moderate,
		technical_phrase: "python, sql".to_string(),
		soft_skill_phrase: "collaboration".to_string(),
		job_level: None,
		duration_ceiling: None,
	}
}

fn app_with(index: StaticIndex, auth_token: Option<&str>) -> Router {
	app_with_page(index, StaticPage::new(POSTING_HTML), auth_token)
}

fn app_with_page(index: StaticIndex, page: StaticPage, auth_token: Option<&str>) -> Router {
	let recommender = Recommender::new(
		sift_config::Recommend::default(),
		Arc::new(index),
		Arc::new(FixedIntent(intent())),
	);
	let skills = serde_json::json!({ "title": "Data Analyst", "skills": ["Python", "SQL"] });
	let posting = PostingReader::new(
		sift_config::Posting::default(),
		sift_testkit::llm_config(),
		Arc::new(StaticCompletion::new(skills.to_string())),
		Arc::new(page),
	);

	routes::router(AppState::from_parts(recommender, posting, auth_token.map(str::to_string)))
}

fn populated_index() -> StaticIndex {
	let ladder = |prefix: &str, category: Category, top: f32| {
		(0..8)
			.map(|idx| hit(&format!("{prefix} {idx}"), category, top - idx as f32 * 0.01))
			.collect::<Vec<_>>()
	};

	StaticIndex::new(
		ladder("Python", Category::Knowledge, 0.95),
		ladder("Team Fit", Category::Personality, 0.93),
	)
}

fn health_request() -> Request<Body> {
	Request::builder().uri("/health").body(Body::empty()).expect("Failed to build request.")
}

fn recommend_request(payload: Value, token: Option<&str>) -> Request<Body> {
	post_request("/v1/recommend", payload, token)
}

fn post_request(uri: &str, payload: Value, token: Option<&str>) -> Request<Body> {
	let mut builder = Request::builder()
		.method("POST")
		.uri(uri)
		.header("content-type", "application/json");

	if let Some(token) = token {
		builder = builder.header("authorization", format!("Bearer {token}"));
	}

	builder.body(Body::from(payload.to_string())).expect("Failed to build request.")
}

async fn read_json(response: axum::response::Response) -> Value {
	let body = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");

	serde_json::from_slice(&body).expect("Failed to parse response.")
}

#[tokio::test]
async fn health_ok() {
	let response = app_with(populated_index(), None)
		.oneshot(health_request())
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn recommend_returns_labelled_assessments() {
	let response = app_with(populated_index(), None)
		.oneshot(recommend_request(serde_json::json!({ "query": "data engineer" }), None))
		.await
		.expect("Failed to call /v1/recommend.");

	assert_eq!(response.status(), StatusCode::OK);

	let json = read_json(response).await;
	let items = json["recommended_assessments"].as_array().expect("Expected assessment list.");

	assert!((5..=10).contains(&items.len()));
	assert_eq!(items[0]["name"], "Python 0");
	assert_eq!(items[0]["remote_support"], "Yes");
	assert_eq!(items[0]["adaptive_support"], "No");
	assert_eq!(items[0]["test_type"][0], "Knowledge & Skills");
	assert!(items[0]["duration"].is_null());
	assert!(items.iter().any(|item| item["test_type"][0] == "Personality & Behaviour"));
	assert_eq!(json["distribution"]["primary_focus"], "BALANCED");
	assert_eq!(json["distribution"]["total"], items.len());
}

#[tokio::test]
async fn blank_query_is_rejected() {
	let response = app_with(populated_index(), None)
		.oneshot(recommend_request(serde_json::json!({ "query": "   " }), None))
		.await
		.expect("Failed to call /v1/recommend.");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let json = read_json(response).await;

	assert_eq!(json["error_code"], "INVALID_REQUEST");
	assert_eq!(json["fields"][0], "$.query");
}

#[tokio::test]
async fn inverted_limits_are_rejected() {
	let payload = serde_json::json!({ "query": "analyst", "min_total": 9, "max_total": 3 });
	let response = app_with(populated_index(), None)
		.oneshot(recommend_request(payload, None))
		.await
		.expect("Failed to call /v1/recommend.");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn retrieval_failure_is_a_server_error() {
	let response = app_with(StaticIndex::unreachable(), None)
		.oneshot(recommend_request(serde_json::json!({ "query": "analyst" }), None))
		.await
		.expect("Failed to call /v1/recommend.");

	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

	let json = read_json(response).await;

	assert_eq!(json["error_code"], "RECOMMENDATION_FAILED");
}

#[tokio::test]
async fn configured_token_guards_v1_routes() {
	let app = app_with(populated_index(), Some("secret"));
	let payload = serde_json::json!({ "query": "analyst" });
	let missing = app
		.clone()
		.oneshot(recommend_request(payload.clone(), None))
		.await
		.expect("Failed to call /v1/recommend.");
	let wrong = app
		.clone()
		.oneshot(recommend_request(payload.clone(), Some("guess")))
		.await
		.expect("Failed to call /v1/recommend.");
	let accepted = app
		.clone()
		.oneshot(recommend_request(payload, Some("secret")))
		.await
		.expect("Failed to call /v1/recommend.");
	let health = app
		.oneshot(health_request())
		.await
		.expect("Failed to call /health.");

	assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
	assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
	assert_eq!(accepted.status(), StatusCode::OK);
	assert_eq!(health.status(), StatusCode::OK);
}

#[tokio::test]
async fn posting_url_is_recommended_from_extracted_skills() {
	let payload = serde_json::json!({ "url": "https://jobs.example.com/analyst" });
	let response = app_with(populated_index(), None)
		.oneshot(post_request("/v1/recommend/url", payload, None))
		.await
		.expect("Failed to call /v1/recommend/url.");

	assert_eq!(response.status(), StatusCode::OK);

	let json = read_json(response).await;
	let items = json["recommended_assessments"].as_array().expect("Expected assessment list.");

	assert_eq!(json["source_url"], "https://jobs.example.com/analyst");
	assert_eq!(json["extracted_job_title"], "Data Analyst");
	assert_eq!(json["extracted_query"], "Python, SQL");
	assert!((5..=10).contains(&items.len()));
}

#[tokio::test]
async fn posting_without_readable_text_is_unprocessable() {
	let page = StaticPage::new("<html><body><div id=\"root\"></div></body></html>");
	let payload = serde_json::json!({ "url": "https://jobs.example.com/spa" });
	let response = app_with_page(populated_index(), page, None)
		.oneshot(post_request("/v1/recommend/url", payload, None))
		.await
		.expect("Failed to call /v1/recommend/url.");

	assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

	let json = read_json(response).await;

	assert_eq!(json["error_code"], "POSTING_UNREADABLE");
}

#[tokio::test]
async fn blank_or_unreachable_posting_url_is_a_bad_request() {
	let app = app_with_page(populated_index(), StaticPage::unreachable(), None);
	let blank = app
		.clone()
		.oneshot(post_request("/v1/recommend/url", serde_json::json!({ "url": " " }), None))
		.await
		.expect("Failed to call /v1/recommend/url.");
	let payload = serde_json::json!({ "url": "https://jobs.example.com/gone" });
	let unreachable = app
		.oneshot(post_request("/v1/recommend/url", payload, None))
		.await
		.expect("Failed to call /v1/recommend/url.");

	assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
	assert_eq!(read_json(blank).await["fields"][0], "$.url");
	assert_eq!(unreachable.status(), StatusCode::BAD_REQUEST);
	assert_eq!(read_json(unreachable).await["error_code"], "POSTING_FETCH_FAILED");
}
