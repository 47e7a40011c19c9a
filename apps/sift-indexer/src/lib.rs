use std::{
	fs,
	path::{Path, PathBuf},
};

use clap::Parser;
use color_eyre::eyre::{self, WrapErr};
use tracing_subscriber::EnvFilter;

use sift_engine::{CatalogEntry, CatalogIndexer, Providers, catalog::DEFAULT_BATCH_SIZE};
use sift_storage::qdrant::QdrantStore;

#[derive(Debug, Parser)]
#[command(
	version = sift_cli::VERSION,
	rename_all = "kebab",
	styles = sift_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// JSON array of catalog rows.
	#[arg(long, value_name = "FILE")]
	pub catalog: PathBuf,
	#[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
	pub batch_size: usize,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = sift_config::load(&args.config)?;

	init_tracing(&config);

	let entries = read_catalog(&args.catalog)?;
	let store = QdrantStore::new(&config.storage.qdrant)?;
	let indexer =
		CatalogIndexer::new(store, config.providers.embedding, Providers::default().embedding)
			.with_batch_size(args.batch_size);

	if indexer.store().ensure_collection().await? {
		tracing::info!(collection = %config.storage.qdrant.collection, "Collection created.");
	}

	let report = indexer.index(&entries).await;

	if report.error_count > 0 {
		return Err(eyre::eyre!(
			"{} of {} catalog entries failed to index.",
			report.error_count,
			report.error_count + report.indexed_count
		));
	}

	Ok(())
}

pub fn read_catalog(path: &Path) -> color_eyre::Result<Vec<CatalogEntry>> {
	let raw = fs::read_to_string(path)
		.wrap_err_with(|| format!("Failed to read catalog at {}.", path.display()))?;
	let entries: Vec<CatalogEntry> = serde_json::from_str(&raw)
		.wrap_err_with(|| format!("Failed to parse catalog at {}.", path.display()))?;

	tracing::info!(entries = entries.len(), path = %path.display(), "Loaded catalog.");

	Ok(entries)
}

fn init_tracing(config: &sift_config::Config) {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();
}
