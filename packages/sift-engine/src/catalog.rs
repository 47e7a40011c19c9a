use std::{collections::HashSet, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use sift_config::EmbeddingProviderConfig;
use sift_domain::{Assessment, Category, RemoteTesting, duration};
use sift_storage::qdrant::QdrantStore;

use crate::{EmbeddingProvider, Result};

pub const DEFAULT_BATCH_SIZE: usize = 32;

/// One row of the cleaned catalog export.
///
/// Cells keep their raw JSON form because exports disagree on whether durations and the
/// remote-testing flag are numbers, booleans, or text.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CatalogEntry {
	#[serde(default, alias = "assessment_name")]
	pub name: String,
	#[serde(default)]
	pub url: String,
	/// Raw category label. Only a lone `K` or `P` is indexed.
	#[serde(default, alias = "category")]
	pub test_type: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub job_levels: String,
	#[serde(default, alias = "assessment_length_(mins)", alias = "duration_minutes")]
	pub length_minutes: Value,
	#[serde(default)]
	pub remote_testing: Value,
	#[serde(default, alias = "adaptive/irt_support", alias = "adaptive_irt")]
	pub adaptive_support: Value,
}
impl CatalogEntry {
	pub fn to_assessment(&self) -> Option<Assessment> {
		let name = self.name.trim();

		if name.is_empty() {
			return None;
		}

		let category = Category::from_label(&self.test_type)?;

		Some(Assessment {
			name: name.to_string(),
			url: self.url.trim().to_string(),
			category,
			description: self.description.trim().to_string(),
			job_levels: self.job_levels.trim().to_string(),
			duration_minutes: raw_minutes(&self.length_minutes),
			remote_testing: raw_remote_testing(&self.remote_testing),
			adaptive_support: raw_remote_testing(&self.adaptive_support) == RemoteTesting::Yes,
		})
	}
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct IndexReport {
	pub indexed_count: usize,
	pub skipped_count: usize,
	pub error_count: usize,
}

#[derive(Debug, Default)]
pub struct PreparedCatalog {
	pub assessments: Vec<Assessment>,
	pub skipped: usize,
}

/// Normalizes entries, dropping unnamed rows, rows outside the two pools, and repeated names.
pub fn prepare_catalog(entries: &[CatalogEntry]) -> PreparedCatalog {
	let mut prepared = PreparedCatalog::default();
	let mut seen = HashSet::new();

	for entry in entries {
		match entry.to_assessment() {
			Some(assessment) if seen.insert(assessment.name.clone()) =>
				prepared.assessments.push(assessment),
			Some(assessment) => {
				tracing::debug!(name = %assessment.name, "Skipping repeated catalog name.");

				prepared.skipped += 1;
			},
			None => {
				tracing::debug!(
					name = %entry.name,
					label = %entry.test_type,
					"Skipping entry without a name or a K/P label."
				);

				prepared.skipped += 1;
			},
		}
	}

	prepared
}

pub fn embedding_text(assessment: &Assessment) -> String {
	format!(
		"Assessment Name: {} | Description: {} | Job Levels: {} | Test Type: {}",
		assessment.name,
		assessment.description,
		assessment.job_levels,
		assessment.category.code()
	)
}

/// Embeds catalog entries and writes them to the assessment collection.
pub struct CatalogIndexer {
	store: QdrantStore,
	cfg: EmbeddingProviderConfig,
	embedding: Arc<dyn EmbeddingProvider>,
	batch_size: usize,
}
impl CatalogIndexer {
	pub fn new(
		store: QdrantStore,
		cfg: EmbeddingProviderConfig,
		embedding: Arc<dyn EmbeddingProvider>,
	) -> Self {
		Self { store, cfg, embedding, batch_size: DEFAULT_BATCH_SIZE }
	}

	pub fn with_batch_size(mut self, batch_size: usize) -> Self {
		self.batch_size = batch_size.max(1);

		self
	}

	pub fn store(&self) -> &QdrantStore {
		&self.store
	}

	/// Indexes every usable entry. A failed batch is counted in `error_count` and the remaining
	/// batches still run.
	pub async fn index(&self, entries: &[CatalogEntry]) -> IndexReport {
		let prepared = prepare_catalog(entries);
		let mut report = IndexReport { skipped_count: prepared.skipped, ..Default::default() };

		for (batch_idx, batch) in prepared.assessments.chunks(self.batch_size).enumerate() {
			match self.index_batch(batch).await {
				Ok(count) => report.indexed_count += count,
				Err(err) => {
					tracing::warn!(
						batch = batch_idx,
						size = batch.len(),
						error = %err,
						"Catalog batch failed."
					);

					report.error_count += batch.len();
				},
			}
		}

		tracing::info!(
			indexed = report.indexed_count,
			skipped = report.skipped_count,
			errors = report.error_count,
			collection = %self.store.collection,
			"Catalog indexing finished."
		);

		report
	}

	async fn index_batch(&self, batch: &[Assessment]) -> Result<usize> {
		let texts: Vec<String> = batch.iter().map(embedding_text).collect();
		let vectors = self.embedding.embed(&self.cfg, &texts).await?;
		let items = batch.iter().cloned().zip(vectors).collect();

		Ok(self.store.upsert_assessments(items).await?)
	}
}

fn raw_minutes(value: &Value) -> Option<f64> {
	match value {
		Value::Number(number) =>
			number.as_f64().filter(|minutes| minutes.is_finite() && *minutes >= 0.0),
		Value::String(text) => duration::parse_minutes(text),
		_ => None,
	}
}

fn raw_remote_testing(value: &Value) -> RemoteTesting {
	match value {
		Value::Bool(true) => RemoteTesting::Yes,
		Value::Bool(false) => RemoteTesting::No,
		Value::String(text) => RemoteTesting::from_label(text),
		_ => RemoteTesting::Unknown,
	}
}
