mod error;
mod fakes;

pub use error::{Error, Result};
pub use fakes::{
	FailingIntent, FixedIntent, HashEmbedding, StaticCompletion, StaticIndex, StaticPage,
	assessment, embedding_config, hit, hit_with_duration, llm_config,
};

use std::{env, thread, time::Duration};

use qdrant_client::Qdrant;
use tokio::{runtime::Builder, time};
use uuid::Uuid;

/// A uniquely named Qdrant collection that is deleted on cleanup or drop.
pub struct TestCollection {
	url: String,
	name: String,
	cleaned: bool,
}
impl TestCollection {
	pub fn new(url: &str) -> Self {
		Self {
			url: url.to_string(),
			name: format!("sift_test_{}", Uuid::new_v4().simple()),
			cleaned: false,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn qdrant_config(&self, vector_dim: u32) -> sift_config::Qdrant {
		sift_config::Qdrant { url: self.url.clone(), collection: self.name.clone(), vector_dim }
	}

	pub async fn cleanup(mut self) -> Result<()> {
		delete_collection(&self.url, &self.name).await?;

		self.cleaned = true;

		Ok(())
	}
}
impl Drop for TestCollection {
	fn drop(&mut self) {
		if self.cleaned {
			return;
		}

		let url = self.url.clone();
		let name = self.name.clone();
		let cleanup_thread = thread::spawn(move || {
			let runtime = match Builder::new_current_thread().enable_all().build() {
				Ok(runtime) => runtime,
				Err(err) => {
					eprintln!("Test collection cleanup failed: {err}.");

					return;
				},
			};

			if let Err(err) = runtime.block_on(delete_collection(&url, &name)) {
				eprintln!("Test Qdrant cleanup failed: {err}.");
			}
		});
		let _ = cleanup_thread.join();
	}
}

pub fn env_qdrant_url() -> Option<String> {
	env::var("SIFT_QDRANT_URL").ok().filter(|url| !url.trim().is_empty())
}

async fn delete_collection(url: &str, collection: &str) -> Result<()> {
	let client = Qdrant::from_url(url)
		.build()
		.map_err(|err| Error::Message(format!("Failed to build Qdrant client: {err}.")))?;
	let max_attempts = 6;
	let mut backoff = Duration::from_millis(100);

	for attempt in 1..=max_attempts {
		let exists = client.collection_exists(collection.to_string());
		let exists = time::timeout(Duration::from_secs(10), exists)
			.await
			.map_err(|_| Error::Message("Qdrant collection_exists timed out.".to_string()))??;

		if !exists {
			return Ok(());
		}

		let delete = client.delete_collection(collection.to_string());

		match time::timeout(Duration::from_secs(10), delete).await {
			Ok(Ok(_)) => return Ok(()),
			Ok(Err(err)) =>
				if attempt == max_attempts {
					return Err(Error::Message(format!(
						"Failed to delete Qdrant collection {collection:?} after {attempt} attempts: {err}."
					)));
				},
			Err(_) =>
				if attempt == max_attempts {
					return Err(Error::Message(format!(
						"Timed out deleting Qdrant collection {collection:?} after {attempt} attempts."
					)));
				},
		}

		time::sleep(backoff).await;

		backoff = backoff.saturating_mul(2).min(Duration::from_secs(2));
	}

	Ok(())
}
