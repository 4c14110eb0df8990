use std::collections::HashMap;

use ais_domain::item::{CandidateItem, ScoredItem};
use ais_providers::scorer::ItemScore;

use crate::settings::RankingSettings;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FusionWeights {
	text: f32,
	image: f32,
}
impl FusionWeights {
	/// Rescales the pair to sum to one so the blend of two unit scores stays in [0, 1].
	pub fn new(text: f32, image: f32) -> Self {
		let text = if text.is_finite() { text.max(0.0) } else { 0.0 };
		let image = if image.is_finite() { image.max(0.0) } else { 0.0 };
		let total = text + image;

		if total <= 0.0 {
			return Self::new(ais_config::DEFAULT_TEXT_WEIGHT, ais_config::DEFAULT_IMAGE_WEIGHT);
		}

		Self { text: text / total, image: image / total }
	}

	pub fn from_settings(settings: &RankingSettings) -> Self {
		Self::new(settings.text_weight, settings.image_weight)
	}
}
impl Default for FusionWeights {
	fn default() -> Self {
		Self::new(ais_config::DEFAULT_TEXT_WEIGHT, ais_config::DEFAULT_IMAGE_WEIGHT)
	}
}

pub fn unit(value: f32) -> f32 {
	if value.is_nan() {
		return 0.0;
	}

	value.clamp(0.0, 1.0)
}

/// Blends text and image similarity. Without an image signal the text score passes through.
pub fn fuse(text_score: f32, image_score: Option<f32>, weights: FusionWeights) -> f32 {
	let text = unit(text_score);

	match image_score {
		Some(image) => unit(weights.text * text + weights.image * unit(image)),
		None => text,
	}
}

/// Folds post-fusion boosts and penalties into the fused score.
pub fn finalize(fused: f32, adjustment: f32) -> f32 {
	let adjustment = if adjustment.is_finite() { adjustment } else { 0.0 };

	unit(fused + adjustment)
}

/// Joins scorer rows onto the request's candidates. Candidates the scorer skipped are absent
/// from the result; rows for unknown ids were already dropped by the provider layer.
pub fn score_items<F>(
	items: &[CandidateItem],
	scores: Vec<ItemScore>,
	weights: FusionWeights,
	mut adjust: F,
) -> HashMap<String, ScoredItem>
where
	F: FnMut(&CandidateItem) -> f32,
{
	let by_id: HashMap<&str, &CandidateItem> =
		items.iter().map(|item| (item.id.as_str(), item)).collect();
	let mut out = HashMap::with_capacity(scores.len());

	for row in scores {
		let Some(item) = by_id.get(row.id.as_str()) else {
			continue;
		};
		let text_score = unit(row.text_score);
		let image_score = row.image_score.map(unit);
		let adjustment = adjust(item);
		let final_score = finalize(fuse(text_score, image_score, weights), adjustment);

		out.insert(row.id, ScoredItem {
			item: (*item).clone(),
			text_score,
			image_score,
			adjustment,
			final_score,
		});
	}

	out
}
