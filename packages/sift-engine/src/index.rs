use std::sync::Arc;

use sift_config::EmbeddingProviderConfig;
use sift_domain::Category;
use sift_storage::qdrant::{QdrantStore, StoredHit};

use crate::{BoxFuture, CandidateIndex, EmbeddingProvider, Error, Result};

/// [`CandidateIndex`] over a Qdrant collection, embedding each phrase on the fly.
pub struct QdrantIndex {
	store: QdrantStore,
	cfg: EmbeddingProviderConfig,
	embedding: Arc<dyn EmbeddingProvider>,
}
impl QdrantIndex {
	pub fn new(
		store: QdrantStore,
		cfg: EmbeddingProviderConfig,
		embedding: Arc<dyn EmbeddingProvider>,
	) -> Self {
		Self { store, cfg, embedding }
	}

	async fn search_phrase(
		&self,
		phrase: &str,
		category: Category,
		limit: u32,
	) -> Result<Vec<StoredHit>> {
		let texts = [phrase.to_string()];
		let vector = self
			.embedding
			.embed(&self.cfg, &texts)
			.await
			.map_err(|err| Error::Retrieval {
				message: format!("Embedding the {category} phrase failed: {err}"),
			})?
			.into_iter()
			.next()
			.ok_or_else(|| Error::Retrieval {
				message: "Embedding provider returned no vector.".to_string(),
			})?;
		let hits = self.store.search(vector, category, limit).await.map_err(|err| {
			Error::Retrieval { message: format!("{category} partition search failed: {err}") }
		})?;

		tracing::debug!(category = %category, hits = hits.len(), "Searched category partition.");

		Ok(hits)
	}
}
impl CandidateIndex for QdrantIndex {
	fn search<'a>(
		&'a self,
		phrase: &'a str,
		category: Category,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<StoredHit>>> {
		Box::pin(self.search_phrase(phrase, category, limit))
	}
}
