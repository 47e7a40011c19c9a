use std::time::Duration;

use reqwest::{Client, header::USER_AGENT};

use crate::Result;

// Job boards serve an empty shell or a bot wall to clients without a browser agent.
const BROWSER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, \
like Gecko) Chrome/120.0 Safari/537.36";

/// Fetches a web page and returns its body as text. Non-success statuses are errors.
pub async fn fetch(url: &str, timeout_ms: u64) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(timeout_ms)).build()?;
	let res = client.get(url).header(USER_AGENT, BROWSER_AGENT).send().await?;
	let body = res.error_for_status()?.text().await?;

	tracing::debug!(url, bytes = body.len(), "Fetched page.");

	Ok(body)
}
