use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
};

use toml::Value;

use sift_config::{Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_value() -> Value {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.")
}

fn render(value: &Value) -> String {
	toml::to_string(value).expect("Failed to render template config.")
}

fn with_section(section: &[&str], key: &str, new_value: Value) -> String {
	let mut value = sample_value();
	let mut table = value.as_table_mut().expect("Template config must be a table.");

	for name in section {
		table = table
			.get_mut(*name)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Template config must include [{name}]."));
	}

	table.insert(key.to_string(), new_value);

	render(&value)
}

fn without_section(name: &str) -> String {
	let mut value = sample_value();

	value.as_table_mut().expect("Template config must be a table.").remove(name);

	render(&value)
}

fn validation_field(raw: &str) -> &'static str {
	let err = sift_config::from_toml_str(raw).expect_err("Expected validation error.");

	match err {
		Error::Validation { field, .. } => field,
		other => panic!("Unexpected error: {other:?}"),
	}
}

fn write_temp_config(payload: &str) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let mut path = env::temp_dir();
	let id = COUNTER.fetch_add(1, Ordering::Relaxed);

	path.push(format!("sift_config_test_{}_{id}.toml", std::process::id()));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

#[test]
fn sample_config_loads() {
	let path = write_temp_config(SAMPLE_CONFIG_TEMPLATE_TOML);
	let cfg: Config = sift_config::load(&path).expect("Failed to load sample config.");

	fs::remove_file(&path).expect("Failed to remove test config.");

	assert_eq!(cfg.recommend.min_total, 5);
	assert_eq!(cfg.recommend.max_total, 10);
	assert_eq!(cfg.recommend.candidate_limit, 50);
	assert_eq!(cfg.storage.qdrant.vector_dim, 768);
}

#[test]
fn blank_auth_token_normalizes_to_none() {
	let cfg = sift_config::from_toml_str(SAMPLE_CONFIG_TEMPLATE_TOML)
		.expect("Failed to parse sample config.");

	assert!(cfg.security.api_auth_token.is_none());
}

#[test]
fn trailing_slash_is_trimmed_from_api_base() {
	let cfg = sift_config::from_toml_str(SAMPLE_CONFIG_TEMPLATE_TOML)
		.expect("Failed to parse sample config.");

	assert_eq!(cfg.providers.embedding.api_base, "http://127.0.0.1:9000");
}

#[test]
fn recommend_section_is_optional() {
	let cfg = sift_config::from_toml_str(&without_section("recommend"))
		.expect("Failed to parse config without [recommend].");

	assert_eq!(cfg.recommend.min_total, 5);
	assert_eq!(cfg.recommend.max_total, 10);
	assert!((cfg.recommend.threshold.start - 0.90).abs() < f32::EPSILON);
	assert!((cfg.recommend.threshold.floor - 0.45).abs() < f32::EPSILON);
}

#[test]
fn posting_section_is_optional() {
	let cfg = sift_config::from_toml_str(&without_section("posting"))
		.expect("Failed to parse config without [posting].");

	assert_eq!(cfg.posting.fetch_timeout_ms, 10_000);
	assert_eq!(cfg.posting.min_text_chars, 50);
	assert_eq!(cfg.posting.max_skills, 20);
}

#[test]
fn zero_posting_fetch_timeout_is_rejected() {
	let raw = with_section(&["posting"], "fetch_timeout_ms", Value::Integer(0));

	assert_eq!(validation_field(&raw), "posting.fetch_timeout_ms");
}

#[test]
fn missing_file_reports_path() {
	let path = env::temp_dir().join("sift_config_does_not_exist.toml");
	let err = sift_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }));
}

#[test]
fn dimension_mismatch_is_rejected() {
	let raw = with_section(&["storage", "qdrant"], "vector_dim", Value::Integer(1_024));

	assert_eq!(validation_field(&raw), "providers.embedding.dimensions");
}

#[test]
fn empty_api_key_is_rejected() {
	let raw = with_section(&["providers", "intent"], "api_key", Value::String(" ".to_string()));

	assert_eq!(validation_field(&raw), "providers.intent.api_key");
}

#[test]
fn min_total_above_max_total_is_rejected() {
	let raw = with_section(&["recommend"], "min_total", Value::Integer(11));

	assert_eq!(validation_field(&raw), "recommend.min_total");
}

#[test]
fn max_total_must_fit_both_categories() {
	let mut value = sample_value();
	let recommend = value
		.get_mut("recommend")
		.and_then(Value::as_table_mut)
		.expect("Template config must include [recommend].");

	recommend.insert("min_total".to_string(), Value::Integer(1));
	recommend.insert("max_total".to_string(), Value::Integer(1));

	assert_eq!(validation_field(&render(&value)), "recommend.max_total");
}

#[test]
fn threshold_floor_above_start_is_rejected() {
	let raw = with_section(&["recommend", "threshold"], "floor", Value::Float(0.95));

	assert_eq!(validation_field(&raw), "recommend.threshold.floor");
}

#[test]
fn threshold_outside_unit_range_is_rejected() {
	let raw = with_section(&["recommend", "threshold"], "start", Value::Float(1.5));

	assert_eq!(validation_field(&raw), "recommend.threshold.start");
}

#[test]
fn zero_step_is_rejected() {
	let raw = with_section(&["recommend", "threshold"], "step", Value::Float(0.0));

	assert_eq!(validation_field(&raw), "recommend.threshold.step");
}

#[test]
fn validation_error_message_names_field() {
	let raw = with_section(&["recommend"], "candidate_limit", Value::Integer(0));
	let err = sift_config::from_toml_str(&raw).expect_err("Expected validation error.");

	assert_eq!(err.to_string(), "recommend.candidate_limit must be greater than zero.");
	assert_eq!(err.field(), Some("recommend.candidate_limit"));
}
