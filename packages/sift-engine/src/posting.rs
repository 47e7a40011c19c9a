use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use sift_config::LlmProviderConfig;
use sift_domain::posting::{self, ExtractedPosting};

use crate::{CompletionProvider, Error, PageFetcher, Result};

// Page text handed to the extractor.
const MAX_PROMPT_CHARS: usize = 7_000;
// Page text searched directly when no skills could be extracted.
const FALLBACK_QUERY_CHARS: usize = 1_000;

const SYSTEM_PROMPT: &str = "You read job postings for an assessment recommender. \
Answer with a single JSON object and nothing else.";

/// A job posting reduced to the query the recommender runs on.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PostingQuery {
	pub source_url: String,
	pub title: Option<String>,
	pub skills: Vec<String>,
	/// The joined skills, or the start of the page text when extraction produced none.
	pub query: String,
}

/// Turns a job-posting URL into a recommendation query.
pub struct PostingReader {
	settings: sift_config::Posting,
	cfg: LlmProviderConfig,
	completion: Arc<dyn CompletionProvider>,
	pages: Arc<dyn PageFetcher>,
}
impl PostingReader {
	pub fn new(
		settings: sift_config::Posting,
		cfg: LlmProviderConfig,
		completion: Arc<dyn CompletionProvider>,
		pages: Arc<dyn PageFetcher>,
	) -> Self {
		Self { settings, cfg, completion, pages }
	}

	/// Fetches the posting and extracts its skills.
	///
	/// Fetch failures and pages with too little text are errors. A failed extraction is not: the
	/// page text itself becomes the query.
	pub async fn read(&self, url: &str) -> Result<PostingQuery> {
		let url = url.trim();

		if !(url.starts_with("http://") || url.starts_with("https://")) {
			return Err(Error::InvalidRequest {
				message: "url must be an absolute http or https URL.".to_string(),
			});
		}

		let html = self
			.pages
			.fetch(url, self.settings.fetch_timeout_ms)
			.await
			.map_err(|err| Error::Fetch { message: format!("Failed to fetch {url}: {err}") })?;
		let text = posting::visible_text(&html);
		let chars = text.chars().count();

		if chars < self.settings.min_text_chars as usize {
			return Err(Error::UnreadablePosting {
				message: format!(
					"Page has {chars} characters of visible text; at least {} are required.",
					self.settings.min_text_chars
				),
			});
		}

		let page_title = posting::page_title(&html);
		let extracted = match self
			.extract(page_title.as_deref(), posting::truncate_chars(&text, MAX_PROMPT_CHARS))
			.await
		{
			Ok(extracted) => extracted,
			Err(err) => {
				tracing::warn!(
					url,
					error = %err,
					"Skill extraction failed. Searching the page text."
				);

				ExtractedPosting::default()
			},
		};
		let query = if extracted.skills.is_empty() {
			posting::truncate_chars(&text, FALLBACK_QUERY_CHARS).to_string()
		} else {
			extracted.skills.join(", ")
		};

		tracing::info!(url, skills = extracted.skills.len(), "Read job posting.");

		Ok(PostingQuery {
			source_url: url.to_string(),
			title: extracted.title.or(page_title),
			skills: extracted.skills,
			query,
		})
	}

	async fn extract(&self, title: Option<&str>, text: &str) -> Result<ExtractedPosting> {
		let max_skills = self.settings.max_skills as usize;
		let messages = build_posting_messages(title, text, max_skills);
		let reply = self.completion.complete(&self.cfg, &messages).await?;

		posting::parse_posting_reply(&reply, max_skills).ok_or_else(|| Error::Provider {
			message: "Posting reply was not a JSON object.".to_string(),
		})
	}
}

pub fn build_posting_messages(title: Option<&str>, text: &str, max_skills: usize) -> Vec<Value> {
	let user_prompt = format!(
		"Extract the job title and the {max_skills} most important skills from this job posting.\n\
Cover technical skills, soft skills such as communication or leadership, and domain expertise.\n\n\
Page title: {}\n\
Posting text:\n{text}\n\n\
Return strictly valid JSON:\n\
{{\"title\": \"job title\", \"skills\": [\"skill 1\", \"skill 2\"]}}",
		title.unwrap_or("Unknown")
	);

	vec![
		serde_json::json!({ "role": "system", "content": SYSTEM_PROMPT }),
		serde_json::json!({ "role": "user", "content": user_prompt }),
	]
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn prompt_carries_title_text_and_skill_cap() {
		let messages = build_posting_messages(None, "We need SQL.", 12);
		let user = messages[1]["content"].as_str().expect("Expected prompt text.");

		assert_eq!(messages[0]["role"], "system");
		assert!(user.contains("12 most important skills"));
		assert!(user.contains("Page title: Unknown"));
		assert!(user.contains("We need SQL."));
		assert!(user.contains("{\"title\""));
	}
}
