use std::collections::HashMap;

use qdrant_client::qdrant::{
	Condition, CreateCollectionBuilder, CreateFieldIndexCollectionBuilder, Distance, FieldType,
	Filter, PointStruct, Query, QueryPointsBuilder, UpsertPointsBuilder, Vector,
	VectorParamsBuilder, VectorsConfigBuilder,
};

use sift_domain::{Assessment, Category};

use crate::{Error, Result, payload};

pub const DENSE_VECTOR_NAME: &str = "dense";

/// A nearest-neighbour hit. `distance` is squared L2 between unit vectors, in `[0, 4]`.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredHit {
	pub assessment: Assessment,
	pub distance: f32,
}

/// Converts a Qdrant cosine score into the squared L2 distance between the normalized vectors.
///
/// `|a - b|^2 = 2 - 2cos` for unit vectors, so `1 - distance / 2` reads back the cosine itself.
pub fn distance_from_cosine(score: f32) -> f32 {
	(2.0 * (1.0 - score)).max(0.0)
}

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &sift_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	/// Creates the collection and its category index unless the collection already exists.
	pub async fn ensure_collection(&self) -> Result<bool> {
		if self.client.collection_exists(self.collection.clone()).await? {
			return Ok(false);
		}

		let mut vectors_config = VectorsConfigBuilder::default();

		vectors_config.add_named_vector_params(
			DENSE_VECTOR_NAME,
			VectorParamsBuilder::new(self.vector_dim.into(), Distance::Cosine),
		);

		self.client
			.create_collection(
				CreateCollectionBuilder::new(self.collection.clone()).vectors_config(vectors_config),
			)
			.await?;
		self.client
			.create_field_index(
				CreateFieldIndexCollectionBuilder::new(
					self.collection.clone(),
					payload::CATEGORY,
					FieldType::Keyword,
				)
				.wait(true),
			)
			.await?;

		tracing::info!(collection = %self.collection, "Created assessment collection.");

		Ok(true)
	}

	pub async fn upsert_assessments(&self, items: Vec<(Assessment, Vec<f32>)>) -> Result<usize> {
		if items.is_empty() {
			return Ok(0);
		}

		let mut points = Vec::with_capacity(items.len());

		for (assessment, vector) in items {
			self.check_dim(&vector)?;

			let mut vectors = HashMap::new();

			vectors.insert(DENSE_VECTOR_NAME.to_string(), Vector::from(vector));
			points.push(PointStruct::new(
				payload::point_id(&assessment.name),
				vectors,
				payload::encode(&assessment),
			));
		}

		let count = points.len();

		self.client
			.upsert_points(UpsertPointsBuilder::new(self.collection.clone(), points).wait(true))
			.await?;

		Ok(count)
	}

	/// Nearest neighbours within one category partition, closest first.
	///
	/// Points whose payload cannot be decoded are skipped with a warning rather than failing the
	/// search.
	pub async fn search(
		&self,
		vector: Vec<f32>,
		category: Category,
		limit: u32,
	) -> Result<Vec<StoredHit>> {
		self.check_dim(&vector)?;

		let search = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(vector))
			.using(DENSE_VECTOR_NAME)
			.filter(Filter::must([Condition::matches(
				payload::CATEGORY,
				category.code().to_string(),
			)]))
			.limit(u64::from(limit))
			.with_payload(true);
		let response = self.client.query(search).await?;
		let mut hits = Vec::with_capacity(response.result.len());

		for point in response.result {
			match payload::decode(&point.payload) {
				Ok(assessment) if assessment.category == category => {
					let distance = distance_from_cosine(point.score);

					hits.push(StoredHit { assessment, distance });
				},
				Ok(assessment) => tracing::warn!(
					name = %assessment.name,
					expected = %category,
					"Skipping point filed under the wrong category."
				),
				Err(err) => tracing::warn!(error = %err, "Skipping undecodable point."),
			}
		}

		Ok(hits)
	}

	fn check_dim(&self, vector: &[f32]) -> Result<()> {
		if vector.len() != self.vector_dim as usize {
			return Err(Error::InvalidArgument(format!(
				"vector has {} dimensions, collection {} expects {}.",
				vector.len(),
				self.collection,
				self.vector_dim
			)));
		}

		Ok(())
	}
}
