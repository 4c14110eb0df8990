//! Offline stand-ins for the three collaborators, selected with `provider_id = "local"`.

use std::collections::{HashMap, HashSet};

use crate::{
	scorer::{ItemScore, ScoreRequest},
	tag_match::{TagMatch, TagMatchRequest},
	trainer::{TrainingReport, TrainingSample},
};
use ais_domain::{feedback::Vote, text};

const MIN_KEYWORD_OBSERVATIONS: usize = 2;
const MIN_KEYWORD_WEIGHT: f32 = 0.25;

/// Jaccard overlap of whitespace tokens between the query and each item's text. Never produces
/// an image score.
pub fn score(request: &ScoreRequest) -> Vec<ItemScore> {
	let query = whitespace_tokens(&request.query);

	request
		.items
		.iter()
		.filter(|item| !item.text.trim().is_empty())
		.map(|item| {
			let value = jaccard(&query, &whitespace_tokens(&item.text));

			ItemScore { id: item.id.clone(), score: value, text_score: value, image_score: None }
		})
		.collect()
}

/// Fraction of requested tags found as whole phrases in each video's text.
pub fn match_tags(request: &TagMatchRequest) -> Vec<TagMatch> {
	let tags: Vec<&String> = request.tags.iter().filter(|tag| !tag.trim().is_empty()).collect();

	if tags.is_empty() {
		return Vec::new();
	}

	let mut out = Vec::new();

	for video in &request.videos {
		let haystack = text::PhraseText::new(&format!(
			"{} {}",
			video.combined_text(),
			video.metadata
		));
		let matched_tags: Vec<String> =
			tags.iter().filter(|tag| haystack.contains(tag)).map(|tag| tag.to_string()).collect();
		let score = matched_tags.len() as f32 / tags.len() as f32;

		if matched_tags.is_empty() || score < request.min_score {
			continue;
		}

		out.push(TagMatch { item: video.clone(), score, matched_tags });
	}

	out
}

/// Per-token vote balance over title and description tokens. Tokens seen fewer than twice or
/// with a weak balance are dropped.
pub fn train(samples: &[TrainingSample]) -> TrainingReport {
	let mut counts: HashMap<String, (usize, usize)> = HashMap::new();

	for sample in samples {
		let tokens = text::token_set(&format!("{} {}", sample.title, sample.description));

		for token in tokens {
			let entry = counts.entry(token).or_default();

			match sample.feedback {
				Vote::Up => entry.0 += 1,
				Vote::Down => entry.1 += 1,
			}
		}
	}

	let mut keywords: Vec<(String, f32)> = counts
		.into_iter()
		.filter(|(_, (up, down))| up + down >= MIN_KEYWORD_OBSERVATIONS)
		.map(|(token, (up, down))| {
			let weight = (up as f32 - down as f32) / (up + down + 1) as f32;

			(token, weight)
		})
		.filter(|(_, weight)| weight.abs() >= MIN_KEYWORD_WEIGHT)
		.collect();

	keywords.sort_by(|a, b| a.0.cmp(&b.0));

	TrainingReport { samples: samples.len(), keywords }
}

fn whitespace_tokens(text: &str) -> HashSet<String> {
	text.to_lowercase().split_whitespace().map(str::to_string).collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
	if a.is_empty() || b.is_empty() {
		return 0.0;
	}

	let inter = a.intersection(b).count();
	let union = a.union(b).count();

	inter as f32 / union as f32
}
