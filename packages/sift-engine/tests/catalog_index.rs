use std::sync::Arc;

use sift_domain::{Category, PrimaryFocus, QueryIntent, Specificity};
use sift_engine::{
	CandidateIndex, CatalogEntry, CatalogIndexer, Limits, QdrantIndex, Recommender,
};
use sift_storage::qdrant::QdrantStore;
use sift_testkit::{FixedIntent, HashEmbedding, TestCollection};

const DIM: u32 = 32;

fn catalog() -> Vec<CatalogEntry> {
	serde_json::from_value(serde_json::json!([
		{ "assessment_name": "Java 8", "test_type": "K", "assessment_length_(mins)": "18" },
		{ "assessment_name": "Core Java Advanced", "test_type": "K", "assessment_length_(mins)": 40 },
		{ "assessment_name": "Spring Framework", "test_type": "K" },
		{ "assessment_name": "SQL Server", "test_type": "K", "assessment_length_(mins)": "N/A" },
		{ "assessment_name": "Teamwork Survey", "test_type": "P", "remote_testing": "Yes" },
		{ "assessment_name": "Leadership Report", "test_type": "P" },
		{ "assessment_name": "Coding Simulation", "test_type": "S" },
		{ "assessment_name": "Mixed Battery", "test_type": "K,P" }
	]))
	.expect("Failed to build catalog.")
}

#[tokio::test]
#[ignore = "Requires external Qdrant. Set SIFT_QDRANT_URL to run."]
async fn indexed_catalog_serves_both_partitions() {
	let Some(url) = sift_testkit::env_qdrant_url() else {
		eprintln!("Skipping indexed_catalog_serves_both_partitions; set SIFT_QDRANT_URL.");

		return;
	};
	let collection = TestCollection::new(&url);
	let qdrant = collection.qdrant_config(DIM);
	let embedding = Arc::new(HashEmbedding::new(DIM as usize));
	let indexer = CatalogIndexer::new(
		QdrantStore::new(&qdrant).expect("Failed to build store."),
		sift_testkit::embedding_config(DIM),
		embedding.clone(),
	)
	.with_batch_size(3);

	indexer.store().ensure_collection().await.expect("Failed to create collection.");

	let report = indexer.index(&catalog()).await;

	assert_eq!(report.indexed_count, 6);
	assert_eq!(report.skipped_count, 2);
	assert_eq!(report.error_count, 0);

	let index = Arc::new(QdrantIndex::new(
		QdrantStore::new(&qdrant).expect("Failed to build store."),
		sift_testkit::embedding_config(DIM),
		embedding,
	));
	let personality =
		index.search("teamwork", Category::Personality, 10).await.expect("Failed to search.");

	assert_eq!(personality.len(), 2);

	let intent = QueryIntent {
		primary_focus: PrimaryFocus::Technical,
		specificity: Specificity::Moderate,
		technical_phrase: "java".to_string(),
		soft_skill_phrase: "teamwork".to_string(),
		job_level: None,
		duration_ceiling: Some(30),
	};
	let recommender = Recommender::new(
		sift_config::Recommend::default(),
		index,
		Arc::new(FixedIntent(intent.clone())),
	);
	let selection = recommender
		.select(&intent, Limits::new(5, 10).expect("limits failed"))
		.await
		.expect("Failed to select.");
	let names: Vec<&str> = selection.items.iter().map(|item| item.name()).collect();

	assert!(!names.contains(&"Core Java Advanced"));
	assert_eq!(selection.distribution.total, 5);
	assert_eq!(selection.distribution.p_count, 2);

	collection.cleanup().await.expect("Failed to clean up collection.");
}
