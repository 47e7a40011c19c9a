use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = sift_indexer::Args::parse();

	sift_indexer::run(args).await
}
