use std::collections::HashMap;

use qdrant_client::{
	Payload,
	qdrant::{Value, value::Kind},
};
use uuid::Uuid;

use sift_domain::{Assessment, Category, RemoteTesting, duration};

use crate::{Error, Result};

pub const NAME: &str = "name";
pub const URL: &str = "url";
pub const CATEGORY: &str = "category";
pub const DESCRIPTION: &str = "description";
pub const JOB_LEVELS: &str = "job_levels";
pub const DURATION_MINUTES: &str = "duration_minutes";
pub const REMOTE_TESTING: &str = "remote_testing";
pub const ADAPTIVE_SUPPORT: &str = "adaptive_support";

/// Deterministic point id: re-indexing the same name overwrites instead of duplicating.
pub fn point_id(name: &str) -> String {
	Uuid::new_v5(&Uuid::NAMESPACE_OID, name.trim().as_bytes()).to_string()
}

pub fn encode(assessment: &Assessment) -> Payload {
	let mut payload = Payload::new();

	payload.insert(NAME, assessment.name.clone());
	payload.insert(URL, assessment.url.clone());
	payload.insert(CATEGORY, assessment.category.code());
	payload.insert(DESCRIPTION, assessment.description.clone());
	payload.insert(JOB_LEVELS, assessment.job_levels.clone());

	let duration = match assessment.duration_minutes {
		Some(minutes) => serde_json::Value::from(minutes),
		None => serde_json::Value::Null,
	};

	payload.insert(DURATION_MINUTES, duration);
	payload.insert(REMOTE_TESTING, assessment.remote_testing.label());
	payload.insert(ADAPTIVE_SUPPORT, assessment.adaptive_support);

	payload
}

pub fn decode(payload: &HashMap<String, Value>) -> Result<Assessment> {
	let name = payload_str(payload, NAME)
		.filter(|name| !name.trim().is_empty())
		.ok_or_else(|| Error::InvalidPayload("point is missing a name.".to_string()))?;
	let category = payload_str(payload, CATEGORY).and_then(Category::from_label).ok_or_else(|| {
		Error::InvalidPayload(format!("point {name:?} has no K or P category."))
	})?;

	Ok(Assessment {
		name: name.to_string(),
		url: payload_str(payload, URL).unwrap_or_default().to_string(),
		category,
		description: payload_str(payload, DESCRIPTION).unwrap_or_default().to_string(),
		job_levels: payload_str(payload, JOB_LEVELS).unwrap_or_default().to_string(),
		duration_minutes: payload_minutes(payload, DURATION_MINUTES),
		remote_testing: payload_str(payload, REMOTE_TESTING)
			.map(RemoteTesting::from_label)
			.unwrap_or_default(),
		adaptive_support: payload_bool(payload, ADAPTIVE_SUPPORT),
	})
}

fn payload_str<'a>(payload: &'a HashMap<String, Value>, key: &str) -> Option<&'a str> {
	match &payload.get(key)?.kind {
		Some(Kind::StringValue(text)) => Some(text.as_str()),
		_ => None,
	}
}

// Points written before the flag existed carry no value and read as `false`.
fn payload_bool(payload: &HashMap<String, Value>, key: &str) -> bool {
	matches!(payload.get(key).and_then(|value| value.kind.as_ref()), Some(Kind::BoolValue(true)))
}

// Older catalogs stored the raw cell text; anything unparseable reads as unconstrained.
fn payload_minutes(payload: &HashMap<String, Value>, key: &str) -> Option<f64> {
	match &payload.get(key)?.kind {
		Some(Kind::DoubleValue(value)) => (value.is_finite() && *value >= 0.0).then_some(*value),
		Some(Kind::IntegerValue(value)) => (*value >= 0).then_some(*value as f64),
		Some(Kind::StringValue(text)) => duration::parse_minutes(text),
		_ => None,
	}
}
