pub mod catalog;
pub mod filter;
pub mod index;
pub mod intent;
pub mod merge;
pub mod posting;
pub mod recommend;
pub mod retrieval;
pub mod threshold;

mod error;

pub use catalog::{CatalogEntry, CatalogIndexer, IndexReport};
pub use error::{Error, Result};
pub use index::QdrantIndex;
pub use intent::LlmIntentAnalyzer;
pub use merge::{Distribution, Limits};
pub use posting::{PostingQuery, PostingReader};
pub use recommend::{
	RecommendRequest, RecommendResponse, Recommendation, Recommender, Selection, Status,
};
pub use retrieval::Pools;
pub use threshold::{Cutoff, ThresholdScan};

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use sift_config::{EmbeddingProviderConfig, LlmProviderConfig};
use sift_domain::{Category, QueryIntent};
use sift_providers::{embedding, intent as intent_provider, page};
use sift_storage::qdrant::StoredHit;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, sift_providers::Result<Vec<Vec<f32>>>>;
}

pub trait CompletionProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, sift_providers::Result<String>>;
}

/// Fetches the raw body of a web page.
pub trait PageFetcher
where
	Self: Send + Sync,
{
	fn fetch<'a>(
		&'a self,
		url: &'a str,
		timeout_ms: u64,
	) -> BoxFuture<'a, sift_providers::Result<String>>;
}

/// Turns a free-text hiring query into a structured intent.
///
/// Failures are recovered by the caller with [`QueryIntent::fallback`].
pub trait IntentAnalyzer
where
	Self: Send + Sync,
{
	fn analyze<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<QueryIntent>>;
}

/// Nearest-neighbour search over a catalog partitioned by category.
///
/// Hits come back closest first; the order is the tie-breaker for equal similarities.
pub trait CandidateIndex
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		phrase: &'a str,
		category: Category,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<StoredHit>>>;
}

/// The HTTP-backed providers configured in `[providers]`.
#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub completion: Arc<dyn CompletionProvider>,
	pub pages: Arc<dyn PageFetcher>,
}
impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		completion: Arc<dyn CompletionProvider>,
		pages: Arc<dyn PageFetcher>,
	) -> Self {
		Self { embedding, completion, pages }
	}
}
impl Default for Providers {
	fn default() -> Self {
		Self {
			embedding: Arc::new(DefaultProviders),
			completion: Arc::new(DefaultProviders),
			pages: Arc::new(DefaultProviders),
		}
	}
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, sift_providers::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}
impl CompletionProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, sift_providers::Result<String>> {
		Box::pin(intent_provider::complete(cfg, messages))
	}
}
impl PageFetcher for DefaultProviders {
	fn fetch<'a>(
		&'a self,
		url: &'a str,
		timeout_ms: u64,
	) -> BoxFuture<'a, sift_providers::Result<String>> {
		Box::pin(page::fetch(url, timeout_ms))
	}
}
