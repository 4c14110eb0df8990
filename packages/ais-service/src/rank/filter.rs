use std::collections::HashSet;

use ais_config::{AmbiguousTerm, Filters, ImageThresholds, OffTopic};
use ais_domain::{
	item::{RejectReason, ScoredItem},
	text::{self, PhraseText},
};

use crate::{feedback::blacklist::BlacklistIndex, settings::RankingSettings};

/// Items with a weak visual match are only kept when the fused score reaches this.
pub const IMAGE_FLOOR_FINAL_SCORE: f32 = 0.35;

/// The query as the filters see it.
#[derive(Clone, Debug)]
pub struct QueryContext {
	pub tokens: Vec<String>,
	pub token_set: HashSet<String>,
	pub normalized: String,
	pub phrase: PhraseText,
}
impl QueryContext {
	pub fn new(query: &str) -> Self {
		let tokens = text::tokenize(query);
		let token_set = tokens.iter().cloned().collect();

		Self { tokens, token_set, normalized: text::normalize_title(query), phrase: PhraseText::new(query) }
	}

	fn any_token_in(&self, tokens: &HashSet<String>) -> bool {
		self.tokens.is_empty() || self.tokens.iter().any(|token| tokens.contains(token))
	}
}

/// Pass/reject stages evaluated in a fixed order; the first rejection wins.
pub struct FilterChain<'a> {
	min_score: f32,
	thresholds: ImageThresholds,
	disambiguation: &'a [AmbiguousTerm],
	off_topic: Option<&'a OffTopic>,
	blacklist: &'a BlacklistIndex,
}
impl<'a> FilterChain<'a> {
	pub fn new(settings: &RankingSettings, filters: &'a Filters, blacklist: &'a BlacklistIndex) -> Self {
		let disambiguation: &[AmbiguousTerm] =
			if settings.disambiguation_enabled { &filters.disambiguation } else { &[] };
		let off_topic = (settings.off_topic_enabled && filters.off_topic.enabled)
			.then_some(&filters.off_topic);

		Self {
			min_score: settings.min_score,
			thresholds: settings.thresholds,
			disambiguation,
			off_topic,
			blacklist,
		}
	}

	pub fn evaluate(&self, query: &QueryContext, scored: &ScoredItem) -> Result<(), RejectReason> {
		if scored.final_score < self.min_score {
			return Err(RejectReason::BelowMinScore);
		}

		if let Some(image) = scored.image_score
			&& image < self.thresholds.min
			&& scored.final_score < IMAGE_FLOOR_FINAL_SCORE
		{
			return Err(RejectReason::WeakImage);
		}

		let combined = scored.item.combined_text();
		let phrase = PhraseText::new(&combined);

		if self.conflicts_with_query_sense(query, &phrase) {
			return Err(RejectReason::AmbiguousSense);
		}

		let strong_image =
			scored.image_score.map(|image| image >= self.thresholds.strong).unwrap_or(false);

		if !strong_image && !query.any_token_in(&text::token_set(&combined)) {
			return Err(RejectReason::NoQueryToken);
		}
		if self.is_off_topic(query, &phrase, &scored.item.description) {
			return Err(RejectReason::OffTopic);
		}
		if self.blacklist.contains(&query.normalized, &text::normalize_title(&scored.item.title)) {
			return Err(RejectReason::Blacklisted);
		}

		Ok(())
	}

	fn conflicts_with_query_sense(&self, query: &QueryContext, item: &PhraseText) -> bool {
		self.disambiguation.iter().any(|entry| {
			query.phrase.contains(&entry.term)
				&& item.contains_any(&entry.disallowed)
				&& !item.contains_any(&entry.allowed)
		})
	}

	fn is_off_topic(&self, query: &QueryContext, item: &PhraseText, description: &str) -> bool {
		let Some(off_topic) = self.off_topic else { return false };

		if query.phrase.contains_any(&off_topic.exempt_query_terms) {
			return false;
		}

		item.contains_any(&off_topic.markers) && !query.any_token_in(&text::token_set(description))
	}
}
