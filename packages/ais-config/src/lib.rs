mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	AmbiguousTerm, Cache, Config, DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_TTL_SECS,
	DEFAULT_FEEDBACK_MAX_ENTRIES, DEFAULT_IMAGE_WEIGHT, DEFAULT_MIN_SCORE,
	DEFAULT_MIN_TRAINING_SAMPLES, DEFAULT_TEXT_WEIGHT, DEFAULT_TRAIN_EVERY, Feedback, Filters,
	ImageThresholds, LOCAL_PROVIDER_ID, ModeThresholds, OffTopic, ProviderConfig, Providers,
	Ranking, RankingBoosts, RankingMode, Service,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse(path, &raw)
}

pub fn parse(path: &Path, raw: &str) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: Box::new(err) })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::validation("service.http_bind must be non-empty."));
	}

	for (label, provider) in [
		("scorer", &cfg.providers.scorer),
		("tag_match", &cfg.providers.tag_match),
		("trainer", &cfg.providers.trainer),
	] {
		if provider.provider_id.trim().is_empty() {
			return Err(Error::validation(format!(
				"providers.{label}.provider_id must be non-empty."
			)));
		}
		if provider.is_local() {
			continue;
		}
		if provider.api_base.trim().is_empty() || provider.path.trim().is_empty() {
			return Err(Error::validation(format!(
				"providers.{label}.api_base and providers.{label}.path must be non-empty."
			)));
		}
		if provider.timeout_ms == 0 {
			return Err(Error::validation(format!(
				"providers.{label}.timeout_ms must be greater than zero."
			)));
		}
	}

	validate_ranking(&cfg.ranking)?;

	for (index, entry) in cfg.filters.disambiguation.iter().enumerate() {
		if entry.term.trim().is_empty() {
			return Err(Error::validation(format!(
				"filters.disambiguation[{index}].term must be non-empty."
			)));
		}
		if entry.disallowed.is_empty() {
			return Err(Error::validation(format!(
				"filters.disambiguation[{index}].disallowed must be non-empty."
			)));
		}
	}

	if cfg.cache.ttl_secs == 0 {
		return Err(Error::validation("cache.ttl_secs must be greater than zero."));
	}
	if cfg.cache.max_entries == 0 {
		return Err(Error::validation("cache.max_entries must be greater than zero."));
	}
	if cfg.feedback.max_entries == 0 {
		return Err(Error::validation("feedback.max_entries must be greater than zero."));
	}
	if cfg.feedback.train_every == 0 {
		return Err(Error::validation("feedback.train_every must be greater than zero."));
	}

	for (label, value) in [
		("feedback.classifier_weight", cfg.feedback.classifier_weight),
		("feedback.creator_penalty", cfg.feedback.creator_penalty),
	] {
		if !value.is_finite() || !(0.0..=1.0).contains(&value) {
			return Err(Error::validation(format!("{label} must be in the range 0.0-1.0.")));
		}
	}

	Ok(())
}

fn validate_ranking(ranking: &Ranking) -> Result<()> {
	if !ranking.min_score.is_finite() || !(0.0..=1.0).contains(&ranking.min_score) {
		return Err(Error::validation("ranking.min_score must be in the range 0.0-1.0."));
	}

	for (label, weight) in
		[("ranking.text_weight", ranking.text_weight), ("ranking.image_weight", ranking.image_weight)]
	{
		if !weight.is_finite() {
			return Err(Error::validation(format!("{label} must be a finite number.")));
		}
		if weight < 0.0 {
			return Err(Error::validation(format!("{label} must be zero or greater.")));
		}
	}

	if ranking.text_weight + ranking.image_weight <= 0.0 {
		return Err(Error::validation(
			"ranking.text_weight and ranking.image_weight must not both be zero.",
		));
	}

	for (mode, thresholds) in ranking.thresholds.iter() {
		let label = mode.as_str();

		for value in [thresholds.min, thresholds.strong, thresholds.top] {
			if !value.is_finite() || !(0.0..=1.0).contains(&value) {
				return Err(Error::validation(format!(
					"ranking.thresholds.{label} values must be in the range 0.0-1.0."
				)));
			}
		}

		if thresholds.min > thresholds.strong || thresholds.strong > thresholds.top {
			return Err(Error::validation(format!(
				"ranking.thresholds.{label} must satisfy min <= strong <= top."
			)));
		}
	}

	let boosts = &ranking.boosts;

	if !boosts.temporal_weight.is_finite() || !(0.0..=1.0).contains(&boosts.temporal_weight) {
		return Err(Error::validation(
			"ranking.boosts.temporal_weight must be in the range 0.0-1.0.",
		));
	}
	if !boosts.temporal_half_life_days.is_finite() || boosts.temporal_half_life_days <= 0.0 {
		return Err(Error::validation(
			"ranking.boosts.temporal_half_life_days must be greater than zero.",
		));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for provider in
		[&mut cfg.providers.scorer, &mut cfg.providers.tag_match, &mut cfg.providers.trainer]
	{
		if provider.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
			provider.api_key = None;
		}
	}

	if cfg.feedback.snapshot_path.as_deref().map(|path| path.trim().is_empty()).unwrap_or(false) {
		cfg.feedback.snapshot_path = None;
	}

	normalize_keywords(&mut cfg.ranking.boosts.temporal_terms);
	normalize_keywords(&mut cfg.filters.off_topic.markers);
	normalize_keywords(&mut cfg.filters.off_topic.exempt_query_terms);

	for entry in &mut cfg.filters.disambiguation {
		entry.term = entry.term.trim().to_lowercase();

		normalize_keywords(&mut entry.disallowed);
		normalize_keywords(&mut entry.allowed);
	}
}

fn normalize_keywords(keywords: &mut Vec<String>) {
	for keyword in keywords.iter_mut() {
		*keyword = keyword.trim().to_lowercase();
	}

	keywords.retain(|keyword| !keyword.is_empty());
	keywords.dedup();
}
