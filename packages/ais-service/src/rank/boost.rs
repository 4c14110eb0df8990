use std::collections::HashSet;

use ais_config::Config;
use ais_domain::{age, item::CandidateItem, text::PhraseText};

use crate::feedback::trainer::ClassifierModel;

/// Post-fusion adjustments for one request: temporal intent, learned keywords and creator
/// hints from the user's wrong judgments.
pub struct Adjuster<'a> {
	temporal_weight: f32,
	half_life_days: f32,
	classifier: &'a ClassifierModel,
	classifier_weight: f32,
	creators: Option<&'a HashSet<String>>,
	creator_penalty: f32,
}
impl<'a> Adjuster<'a> {
	pub fn new(
		cfg: &Config,
		query: &PhraseText,
		classifier: &'a ClassifierModel,
		creators: Option<&'a HashSet<String>>,
	) -> Self {
		let boosts = &cfg.ranking.boosts;
		let temporal_weight = if query.contains_any(&boosts.temporal_terms) {
			boosts.temporal_weight
		} else {
			0.0
		};

		Self {
			temporal_weight,
			half_life_days: boosts.temporal_half_life_days,
			classifier,
			classifier_weight: cfg.feedback.classifier_weight,
			creators: creators.filter(|creators| !creators.is_empty()),
			creator_penalty: cfg.feedback.creator_penalty,
		}
	}

	pub fn adjustment(&self, item: &CandidateItem) -> f32 {
		self.temporal_boost(item) + self.keyword_adjustment(item) - self.creator_penalty(item)
	}

	fn temporal_boost(&self, item: &CandidateItem) -> f32 {
		if self.temporal_weight <= 0.0 || self.half_life_days <= 0.0 {
			return 0.0;
		}

		let Some(age_days) = age::parse_relative_age_days(&item.metadata) else { return 0.0 };

		self.temporal_weight * 0.5_f32.powf(age_days.max(0.0) / self.half_life_days)
	}

	fn keyword_adjustment(&self, item: &CandidateItem) -> f32 {
		if self.classifier_weight <= 0.0 || self.classifier.is_empty() {
			return 0.0;
		}

		self.classifier_weight * self.classifier.adjustment(&item.title)
	}

	fn creator_penalty(&self, item: &CandidateItem) -> f32 {
		if self.creator_penalty <= 0.0 {
			return 0.0;
		}

		let Some(creators) = self.creators else { return 0.0 };
		let title = PhraseText::new(&item.title);

		if title.contains_any(creators) { self.creator_penalty } else { 0.0 }
	}
}
