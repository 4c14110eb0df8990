use serde::Serialize;
use serde_json::Value;

use crate::{Error, Result};
use ais_config::ProviderConfig;
use ais_domain::item::CandidateItem;

#[derive(Clone, Debug, Serialize)]
pub struct TagMatchRequest {
	pub tags: Vec<String>,
	pub videos: Vec<CandidateItem>,
	#[serde(rename = "minScore")]
	pub min_score: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TagMatch {
	#[serde(flatten)]
	pub item: CandidateItem,
	pub score: f32,
	#[serde(rename = "matchedTags")]
	pub matched_tags: Vec<String>,
}

pub async fn match_tags(cfg: &ProviderConfig, request: &TagMatchRequest) -> Result<Vec<TagMatch>> {
	let json = crate::post_json(cfg, request).await?;

	parse_tag_match_response(json)
}

pub fn parse_tag_match_response(json: Value) -> Result<Vec<TagMatch>> {
	let matches = json
		.get("matches")
		.and_then(Value::as_array)
		.ok_or_else(|| Error::invalid_response("Tag match response is missing matches array."))?;
	let mut out = Vec::with_capacity(matches.len());

	for row in matches {
		let item: CandidateItem = serde_json::from_value(row.clone())?;
		let score = row
			.get("score")
			.and_then(Value::as_f64)
			.ok_or_else(|| Error::invalid_response("Tag match is missing score."))?;
		let matched_tags = row
			.get("matchedTags")
			.and_then(Value::as_array)
			.map(|tags| tags.iter().filter_map(Value::as_str).map(str::to_string).collect())
			.unwrap_or_default();

		out.push(TagMatch { item, score: crate::clamp_unit(score), matched_tags });
	}

	Ok(out)
}
