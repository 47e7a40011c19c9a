use std::sync::Arc;

use serde_json::Value;

use sift_config::LlmProviderConfig;
use sift_domain::{QueryIntent, intent};

use crate::{BoxFuture, CompletionProvider, Error, IntentAnalyzer, Result};

const SYSTEM_PROMPT: &str = "You classify hiring queries for an assessment recommender. \
Answer with exactly the requested KEY: value lines and nothing else. \
Do not add explanations, numbering, or markdown.";

/// Intent analysis backed by the `[providers.intent]` chat model.
pub struct LlmIntentAnalyzer {
	cfg: LlmProviderConfig,
	provider: Arc<dyn CompletionProvider>,
}
impl LlmIntentAnalyzer {
	pub fn new(cfg: LlmProviderConfig, provider: Arc<dyn CompletionProvider>) -> Self {
		Self { cfg, provider }
	}

	async fn analyze_query(&self, query: &str) -> Result<QueryIntent> {
		let messages = build_intent_messages(query);
		let reply = self.provider.complete(&self.cfg, &messages).await?;

		intent::parse_intent_response(&reply, query).ok_or_else(|| Error::Provider {
			message: "Intent reply contained none of the expected keys.".to_string(),
		})
	}
}
impl IntentAnalyzer for LlmIntentAnalyzer {
	fn analyze<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<QueryIntent>> {
		Box::pin(self.analyze_query(query))
	}
}

pub fn build_intent_messages(query: &str) -> Vec<Value> {
	let user_prompt = format!(
		"Analyze this hiring query.\n\
Query:\n{query}\n\n\
PRIMARY_FOCUS is TECHNICAL for programming, tools, or specific technical knowledge; \
BEHAVIORAL for personality, culture fit, leadership, or communication; \
BALANCED when both carry equal weight.\n\
SPECIFICITY is HIGHLY_SPECIFIC when exact technologies or traits are named, \
MODERATE for general role requirements, BROAD for a bare role title.\n\n\
Format exactly as:\n\
PRIMARY_FOCUS: TECHNICAL or BEHAVIORAL or BALANCED\n\
SPECIFICITY: HIGHLY_SPECIFIC or MODERATE or BROAD\n\
TECHNICAL_SKILLS: comma-separated technical skills, or None\n\
SOFT_SKILLS: comma-separated soft skills, or None\n\
JOB_LEVEL: Entry, Junior, Mid-level, Senior, Executive, Manager, or Not specified\n\
DURATION_MAX: maximum minutes as a number, or Not specified"
	);

	vec![
		serde_json::json!({ "role": "system", "content": SYSTEM_PROMPT }),
		serde_json::json!({ "role": "user", "content": user_prompt }),
	]
}
