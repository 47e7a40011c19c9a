mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, LlmProviderConfig, Posting, Providers, Qdrant, Recommend,
	RecommendThreshold, Security, Service, Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse(&raw).map_err(|err| match err {
		ParseOrValidate::Parse(source) => Error::ParseConfig { path: path.to_path_buf(), source },
		ParseOrValidate::Validate(err) => err,
	})
}

pub fn from_toml_str(raw: &str) -> Result<Config> {
	parse(raw).map_err(|err| match err {
		ParseOrValidate::Parse(source) =>
			Error::ParseConfig { path: "<inline>".into(), source },
		ParseOrValidate::Validate(err) => err,
	})
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::invalid("service.http_bind", "must be non-empty."));
	}
	if cfg.storage.qdrant.collection.trim().is_empty() {
		return Err(Error::invalid("storage.qdrant.collection", "must be non-empty."));
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::invalid("providers.embedding.dimensions", "must be greater than zero."));
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::invalid(
			"providers.embedding.dimensions",
			"must match storage.qdrant.vector_dim.",
		));
	}

	for (field, key) in [
		("providers.embedding.api_key", &cfg.providers.embedding.api_key),
		("providers.intent.api_key", &cfg.providers.intent.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::invalid(field, "must be non-empty."));
		}
	}

	if !cfg.providers.intent.temperature.is_finite() || cfg.providers.intent.temperature < 0.0 {
		return Err(Error::invalid(
			"providers.intent.temperature",
			"must be a finite number, zero or greater.",
		));
	}

	if cfg.posting.fetch_timeout_ms == 0 {
		return Err(Error::invalid("posting.fetch_timeout_ms", "must be greater than zero."));
	}
	if cfg.posting.max_skills == 0 {
		return Err(Error::invalid("posting.max_skills", "must be greater than zero."));
	}

	validate_recommend(&cfg.recommend)
}

pub fn validate_recommend(recommend: &Recommend) -> Result<()> {
	if recommend.min_total == 0 {
		return Err(Error::invalid("recommend.min_total", "must be greater than zero."));
	}
	// One slot per category has to fit under the cap.
	if recommend.max_total < 2 {
		return Err(Error::invalid("recommend.max_total", "must be at least 2."));
	}
	if recommend.min_total > recommend.max_total {
		return Err(Error::invalid(
			"recommend.min_total",
			"must be less than or equal to recommend.max_total.",
		));
	}
	if recommend.candidate_limit == 0 {
		return Err(Error::invalid("recommend.candidate_limit", "must be greater than zero."));
	}

	let threshold = &recommend.threshold;

	for (field, value) in [
		("recommend.threshold.start", threshold.start),
		("recommend.threshold.floor", threshold.floor),
		("recommend.threshold.step", threshold.step),
	] {
		if !value.is_finite() {
			return Err(Error::invalid(field, "must be a finite number."));
		}
		if !(0.0..=1.0).contains(&value) {
			return Err(Error::invalid(field, "must be in the range 0.0-1.0."));
		}
	}

	if threshold.floor > threshold.start {
		return Err(Error::invalid(
			"recommend.threshold.floor",
			"must be less than or equal to recommend.threshold.start.",
		));
	}
	if threshold.step <= 0.0 {
		return Err(Error::invalid("recommend.threshold.step", "must be greater than zero."));
	}

	Ok(())
}

enum ParseOrValidate {
	Parse(toml::de::Error),
	Validate(Error),
}

fn parse(raw: &str) -> Result<Config, ParseOrValidate> {
	let mut cfg: Config = toml::from_str(raw).map_err(ParseOrValidate::Parse)?;

	normalize(&mut cfg);

	validate(&cfg).map_err(ParseOrValidate::Validate)?;

	Ok(cfg)
}

fn normalize(cfg: &mut Config) {
	if cfg.security.api_auth_token.as_deref().map(|token| token.trim().is_empty()).unwrap_or(false)
	{
		cfg.security.api_auth_token = None;
	}

	cfg.providers.embedding.api_base =
		cfg.providers.embedding.api_base.trim_end_matches('/').to_string();
	cfg.providers.intent.api_base = cfg.providers.intent.api_base.trim_end_matches('/').to_string();
}
