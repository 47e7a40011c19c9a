use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Value;

use sift_config::{EmbeddingProviderConfig, LlmProviderConfig};
use sift_domain::{Assessment, Category, QueryIntent, RemoteTesting};
use sift_engine::{
	BoxFuture, CandidateIndex, CompletionProvider, EmbeddingProvider, Error, IntentAnalyzer,
	PageFetcher,
};
use sift_storage::qdrant::StoredHit;

pub fn embedding_config(dimensions: u32) -> EmbeddingProviderConfig {
	EmbeddingProviderConfig {
		provider_id: "test".to_string(),
		api_base: "http://127.0.0.1:9".to_string(),
		api_key: "test-key".to_string(),
		path: "/embeddings".to_string(),
		model: "test-embedding".to_string(),
		dimensions,
		timeout_ms: 1_000,
		default_headers: Default::default(),
	}
}

pub fn llm_config() -> LlmProviderConfig {
	LlmProviderConfig {
		provider_id: "test".to_string(),
		api_base: "http://127.0.0.1:9".to_string(),
		api_key: "test-key".to_string(),
		path: "/chat/completions".to_string(),
		model: "test-chat".to_string(),
		temperature: 0.0,
		timeout_ms: 1_000,
		default_headers: Default::default(),
	}
}

pub fn assessment(name: &str, category: Category) -> Assessment {
	let slug = name.to_ascii_lowercase().replace(' ', "-");

	Assessment {
		name: name.to_string(),
		url: format!("https://catalog.example.com/{slug}"),
		category,
		description: format!("{name} assessment."),
		job_levels: "Professional".to_string(),
		duration_minutes: None,
		remote_testing: RemoteTesting::Yes,
		adaptive_support: false,
	}
}

/// A hit whose distance maps back to exactly `similarity`.
pub fn hit(name: &str, category: Category, similarity: f32) -> StoredHit {
	hit_with_duration(name, category, similarity, None)
}

pub fn hit_with_duration(
	name: &str,
	category: Category,
	similarity: f32,
	duration_minutes: Option<f64>,
) -> StoredHit {
	let mut assessment = assessment(name, category);

	assessment.duration_minutes = duration_minutes;

	StoredHit { assessment, distance: 2.0 * (1.0 - similarity) }
}

/// In-memory [`CandidateIndex`] serving fixed hits per category, closest first.
#[derive(Debug, Default)]
pub struct StaticIndex {
	knowledge: Vec<StoredHit>,
	personality: Vec<StoredHit>,
	fail: bool,
	calls: AtomicUsize,
}
impl StaticIndex {
	pub fn new(mut knowledge: Vec<StoredHit>, mut personality: Vec<StoredHit>) -> Self {
		knowledge.sort_by(|lhs, rhs| lhs.distance.total_cmp(&rhs.distance));
		personality.sort_by(|lhs, rhs| lhs.distance.total_cmp(&rhs.distance));

		Self { knowledge, personality, fail: false, calls: AtomicUsize::new(0) }
	}

	/// Every search fails as if the index were unreachable.
	pub fn unreachable() -> Self {
		Self { fail: true, ..Default::default() }
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl CandidateIndex for StaticIndex {
	fn search<'a>(
		&'a self,
		_phrase: &'a str,
		category: Category,
		limit: u32,
	) -> BoxFuture<'a, sift_engine::Result<Vec<StoredHit>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let result: sift_engine::Result<Vec<StoredHit>> = if self.fail {
			Err(Error::Retrieval { message: "Vector index is unreachable.".to_string() })
		} else {
			let hits = match category {
				Category::Knowledge => &self.knowledge,
				Category::Personality => &self.personality,
			};

			Ok(hits.iter().take(limit as usize).cloned().collect())
		};

		Box::pin(async move { result })
	}
}

/// Always answers with the same intent.
pub struct FixedIntent(pub QueryIntent);
impl IntentAnalyzer for FixedIntent {
	fn analyze<'a>(&'a self, _query: &'a str) -> BoxFuture<'a, sift_engine::Result<QueryIntent>> {
		let result: sift_engine::Result<QueryIntent> = Ok(self.0.clone());

		Box::pin(async move { result })
	}
}

/// Always fails, as an unreachable classifier would.
pub struct FailingIntent;
impl IntentAnalyzer for FailingIntent {
	fn analyze<'a>(&'a self, _query: &'a str) -> BoxFuture<'a, sift_engine::Result<QueryIntent>> {
		let result: sift_engine::Result<QueryIntent> =
			Err(Error::Provider { message: "Intent classifier is unreachable.".to_string() });

		Box::pin(async move { result })
	}
}

/// Replies to every completion with the same text.
pub struct StaticCompletion {
	pub reply: String,
}
impl StaticCompletion {
	pub fn new(reply: impl Into<String>) -> Self {
		Self { reply: reply.into() }
	}
}
impl CompletionProvider for StaticCompletion {
	fn complete<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_messages: &'a [Value],
	) -> BoxFuture<'a, sift_providers::Result<String>> {
		let result: sift_providers::Result<String> = Ok(self.reply.clone());

		Box::pin(async move { result })
	}
}

/// Serves the same page body for every URL, or fails every fetch.
#[derive(Debug, Default)]
pub struct StaticPage {
	body: Option<String>,
	calls: AtomicUsize,
}
impl StaticPage {
	pub fn new(body: impl Into<String>) -> Self {
		Self { body: Some(body.into()), calls: AtomicUsize::new(0) }
	}

	/// Every fetch fails as if the host were unreachable.
	pub fn unreachable() -> Self {
		Self::default()
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl PageFetcher for StaticPage {
	fn fetch<'a>(
		&'a self,
		_url: &'a str,
		_timeout_ms: u64,
	) -> BoxFuture<'a, sift_providers::Result<String>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let result: sift_providers::Result<String> = match &self.body {
			Some(body) => Ok(body.clone()),
			None => Err(sift_providers::Error::InvalidResponse {
				message: "Host is unreachable.".to_string(),
			}),
		};

		Box::pin(async move { result })
	}
}

/// Deterministic bag-of-bytes embedding: texts sharing characters land close together.
pub struct HashEmbedding {
	pub dim: usize,
}
impl HashEmbedding {
	pub fn new(dim: usize) -> Self {
		Self { dim: dim.max(1) }
	}

	pub fn vector(&self, text: &str) -> Vec<f32> {
		let mut vector = vec![0.0; self.dim];

		for byte in text.to_ascii_lowercase().bytes() {
			vector[byte as usize % self.dim] += 1.0;
		}

		if vector.iter().all(|value| *value == 0.0) {
			vector[0] = 1.0;
		}

		vector
	}
}
impl EmbeddingProvider for HashEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, sift_providers::Result<Vec<Vec<f32>>>> {
		let result: sift_providers::Result<Vec<Vec<f32>>> =
			Ok(texts.iter().map(|text| self.vector(text)).collect());

		Box::pin(async move { result })
	}
}
