use serde::{Deserialize, Serialize};

use crate::{Error, Result};
use ais_config::{Config, ImageThresholds, RankingMode};

/// User-adjustable knobs. Changing them invalidates every cached ranking.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RankingSettings {
	pub mode: RankingMode,
	pub min_score: f32,
	pub text_weight: f32,
	pub image_weight: f32,
	pub disambiguation_enabled: bool,
	pub off_topic_enabled: bool,
	pub thresholds: ImageThresholds,
}
impl RankingSettings {
	pub fn from_config(cfg: &Config) -> Self {
		let mode = cfg.ranking.mode;

		Self {
			mode,
			min_score: cfg.ranking.min_score,
			text_weight: cfg.ranking.text_weight,
			image_weight: cfg.ranking.image_weight,
			disambiguation_enabled: cfg.filters.disambiguation_enabled,
			off_topic_enabled: cfg.filters.off_topic.enabled,
			thresholds: cfg.ranking.thresholds.for_mode(mode),
		}
	}

	/// Settings for another mode, picking that mode's thresholds from `cfg`.
	pub fn with_mode(mut self, cfg: &Config, mode: RankingMode) -> Self {
		self.mode = mode;
		self.thresholds = cfg.ranking.thresholds.for_mode(mode);

		self
	}

	pub fn validate(&self) -> Result<()> {
		let unit = |value: f32| value.is_finite() && (0.0..=1.0).contains(&value);

		if !unit(self.min_score) {
			return Err(invalid("min_score must be in the range 0.0-1.0."));
		}
		if !self.text_weight.is_finite()
			|| !self.image_weight.is_finite()
			|| self.text_weight < 0.0
			|| self.image_weight < 0.0
			|| self.text_weight + self.image_weight <= 0.0
		{
			return Err(invalid("text_weight and image_weight must be non-negative and not both zero."));
		}

		let t = self.thresholds;

		if !(unit(t.min) && unit(t.strong) && unit(t.top)) || t.min > t.strong || t.strong > t.top {
			return Err(invalid("thresholds must be in 0.0-1.0 and satisfy min <= strong <= top."));
		}

		Ok(())
	}
}

fn invalid(message: &str) -> Error {
	Error::InvalidRequest { message: message.to_string() }
}
