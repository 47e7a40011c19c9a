use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

const MAX_ATTEMPTS: usize = 2;

/// Sends a chat completion and returns the first choice's text.
///
/// A reply without usable content is retried once; transport and HTTP status errors are not.
pub async fn complete(cfg: &sift_config::LlmProviderConfig, messages: &[Value]) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = crate::endpoint(&cfg.api_base, &cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": messages,
	});
	let mut last_err = None;

	for attempt in 1..=MAX_ATTEMPTS {
		let res = client
			.post(&url)
			.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
			.json(&body)
			.send()
			.await?;
		let json: Value = res.error_for_status()?.json().await?;

		match parse_completion_text(&json) {
			Ok(text) => return Ok(text),
			Err(err) => {
				tracing::debug!(attempt, error = %err, "Intent completion had no usable content.");

				last_err = Some(err);
			},
		}
	}

	Err(last_err.unwrap_or_else(|| Error::response("Intent completion returned nothing.")))
}

fn parse_completion_text(json: &Value) -> Result<String> {
	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.ok_or_else(|| Error::response("Intent completion is missing message content."))?;
	let trimmed = content.trim();

	if trimmed.is_empty() {
		return Err(Error::response("Intent completion content is empty."));
	}

	Ok(trimmed.to_string())
}
