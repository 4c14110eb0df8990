use std::cmp::Ordering;

use ais_config::ImageThresholds;
use ais_domain::item::{ScoredItem, Tier};

use crate::rank::RankedItem;

const SCORE_BANDS: [(f32, u8); 4] = [(0.8, 5), (0.5, 4), (0.2, 3), (0.01, 2)];

pub fn assign(scored: Option<&ScoredItem>, passes: bool, thresholds: ImageThresholds) -> Tier {
	let Some(scored) = scored else { return Tier::NO_SCORE };

	if !passes {
		return Tier::REJECTED;
	}

	if let Some(image) = scored.image_score {
		if image >= thresholds.top {
			return Tier::TOP_IMAGE;
		}
		if image >= thresholds.strong {
			return Tier::STRONG_IMAGE;
		}
	}

	SCORE_BANDS
		.iter()
		.find(|(floor, _)| scored.final_score >= *floor)
		.map(|(_, tier)| Tier(*tier))
		.unwrap_or(Tier::REJECTED)
}

/// Tier first, then final score, then the order the caller supplied.
pub fn reorder(items: &mut [RankedItem]) {
	items.sort_by(|left, right| {
		right
			.decision
			.tier
			.cmp(&left.decision.tier)
			.then_with(|| cmp_f32_desc(final_score(left), final_score(right)))
			.then_with(|| left.original_index.cmp(&right.original_index))
	});
}

/// Stable digest of the presented order, used to tell whether a surface actually changed.
pub fn order_signature(items: &[RankedItem]) -> String {
	let mut hasher = blake3::Hasher::new();

	hasher.update(b"ais:order:v1");

	for item in items {
		hasher.update(&[0]);
		hasher.update(item.item_id.as_bytes());
	}

	hasher.finalize().to_hex().to_string()
}

fn final_score(item: &RankedItem) -> f32 {
	item.scored.as_ref().map(|scored| scored.final_score).unwrap_or(0.0)
}

fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
