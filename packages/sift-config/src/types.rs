use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub recommend: Recommend,
	#[serde(default)]
	pub posting: Posting,
	pub security: Security,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub qdrant: Qdrant,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	/// Chat-completion model used to classify the focus of a hiring query.
	pub intent: LlmProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Recommend {
	/// Lower bound on the result count when the filtered pools can supply it.
	pub min_total: u32,
	pub max_total: u32,
	/// Over-fetch size for each per-category similarity search.
	pub candidate_limit: u32,
	pub threshold: RecommendThreshold,
}
impl Default for Recommend {
	fn default() -> Self {
		Self {
			min_total: 5,
			max_total: 10,
			candidate_limit: 50,
			threshold: RecommendThreshold::default(),
		}
	}
}

/// Similarity cutoffs scanned by the adaptive selector, from `start` down to `floor`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RecommendThreshold {
	pub start: f32,
	pub floor: f32,
	pub step: f32,
}
impl Default for RecommendThreshold {
	fn default() -> Self {
		Self { start: 0.90, floor: 0.45, step: 0.05 }
	}
}

/// Job-posting intake behind `/v1/recommend/url`. Skills are extracted with the
/// `[providers.intent]` model.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Posting {
	pub fetch_timeout_ms: u64,
	/// Pages with less visible text than this are rejected as unreadable.
	pub min_text_chars: u32,
	pub max_skills: u32,
}
impl Default for Posting {
	fn default() -> Self {
		Self { fetch_timeout_ms: 10_000, min_text_chars: 50, max_skills: 20 }
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
	pub api_auth_token: Option<String>,
}
