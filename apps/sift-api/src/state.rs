use std::sync::Arc;

use sift_engine::{LlmIntentAnalyzer, PostingReader, Providers, QdrantIndex, Recommender};
use sift_storage::qdrant::QdrantStore;

#[derive(Clone)]
pub struct AppState {
	pub recommender: Arc<Recommender>,
	pub posting: Arc<PostingReader>,
	/// Bearer token required on `/v1/*`. `None` leaves the routes open.
	pub auth_token: Option<String>,
}
impl AppState {
	pub fn new(config: sift_config::Config) -> color_eyre::Result<Self> {
		let providers = Providers::default();
		let store = QdrantStore::new(&config.storage.qdrant)?;
		let index = QdrantIndex::new(store, config.providers.embedding, providers.embedding);
		let intent =
			LlmIntentAnalyzer::new(config.providers.intent.clone(), providers.completion.clone());
		let recommender = Recommender::new(config.recommend, Arc::new(index), Arc::new(intent));
		let posting = PostingReader::new(
			config.posting,
			config.providers.intent,
			providers.completion,
			providers.pages,
		);

		Ok(Self::from_parts(recommender, posting, config.security.api_auth_token))
	}

	pub fn from_parts(
		recommender: Recommender,
		posting: PostingReader,
		auth_token: Option<String>,
	) -> Self {
		Self { recommender: Arc::new(recommender), posting: Arc::new(posting), auth_token }
	}
}
