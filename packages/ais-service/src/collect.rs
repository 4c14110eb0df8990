use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{Error, RankingEngine, Result};
use ais_domain::{item::CandidateItem, text};
use ais_providers::tag_match::{TagMatch, TagMatchRequest};

#[derive(Clone, Debug, Deserialize)]
pub struct CollectRequest {
	pub tags: Vec<String>,
	pub videos: Vec<CandidateItem>,
	#[serde(default, alias = "minScore")]
	pub min_score: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct CollectOutcome {
	pub matches: Vec<TagMatch>,
}

impl RankingEngine {
	/// Bulk collection: candidates matching any of `tags`, best first. Titles the user marked
	/// wrong under one of the tags are left out.
	pub async fn collect_matches(&self, request: CollectRequest) -> Result<CollectOutcome> {
		let tags: Vec<String> = request
			.tags
			.iter()
			.map(|tag| tag.trim().to_string())
			.filter(|tag| !tag.is_empty())
			.collect();

		if tags.is_empty() || request.videos.is_empty() {
			return Ok(CollectOutcome { matches: Vec::new() });
		}
		if !request.min_score.is_finite() || !(0.0..=1.0).contains(&request.min_score) {
			return Err(Error::InvalidRequest {
				message: "min_score must be in the range 0.0-1.0.".to_string(),
			});
		}

		let min_score = request.min_score;
		let blacklist = self.feedback_state().blacklist.clone();
		let normalized_tags: Vec<String> = tags.iter().map(|tag| text::normalize_title(tag)).collect();
		let provider_request = TagMatchRequest { tags, videos: request.videos, min_score };
		let found = self
			.providers
			.tag_match
			.match_tags(&self.cfg.providers.tag_match, &provider_request)
			.await?;
		let total = found.len();
		let mut matches: Vec<TagMatch> = found
			.into_iter()
			.filter(|found| found.score.is_finite() && found.score >= min_score)
			.filter(|found| {
				let title = text::normalize_title(&found.item.title);

				!normalized_tags.iter().any(|tag| blacklist.contains(tag, &title))
			})
			.collect();

		matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

		tracing::info!(total, kept = matches.len(), "Tag collection completed.");

		Ok(CollectOutcome { matches })
	}
}
