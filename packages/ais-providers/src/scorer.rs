use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

use crate::{Error, Result};
use ais_config::ProviderConfig;

#[derive(Clone, Debug, Serialize)]
pub struct ScoreRequest {
	pub query: String,
	pub items: Vec<ScoreRequestItem>,
	pub feedback: FeedbackHints,
}

#[derive(Clone, Debug, Serialize)]
pub struct ScoreRequestItem {
	pub id: String,
	pub text: String,
	pub title: String,
	pub description: String,
	#[serde(rename = "thumbnail")]
	pub thumbnail_ref: Option<String>,
}

/// Titles the user already judged for this query.
#[derive(Clone, Debug, Default, Serialize)]
pub struct FeedbackHints {
	pub positive: Vec<String>,
	pub negative: Vec<String>,
}

/// A validated per-item score. Every value is already clamped into [0, 1].
#[derive(Clone, Debug, PartialEq)]
pub struct ItemScore {
	pub id: String,
	pub score: f32,
	pub text_score: f32,
	/// `None` when the scorer computed no visual signal for the item.
	pub image_score: Option<f32>,
}

pub async fn score(cfg: &ProviderConfig, request: &ScoreRequest) -> Result<Vec<ItemScore>> {
	let json = crate::post_json(cfg, request).await?;
	let known: HashSet<&str> = request.items.iter().map(|item| item.id.as_str()).collect();

	parse_score_response(json, &known)
}

pub fn parse_score_response(json: Value, known_ids: &HashSet<&str>) -> Result<Vec<ItemScore>> {
	let ranked = json
		.get("ranked")
		.and_then(Value::as_array)
		.ok_or_else(|| Error::invalid_response("Scorer response is missing ranked array."))?;
	let mut seen = HashSet::new();
	let mut out = Vec::with_capacity(ranked.len());

	for row in ranked {
		let Some(id) = row.get("id").and_then(wire_id) else {
			tracing::warn!("Dropping scorer row without an id.");

			continue;
		};

		if !known_ids.contains(id.as_str()) {
			tracing::warn!(%id, "Dropping scorer row for an unknown item.");

			continue;
		}
		if !seen.insert(id.clone()) {
			continue;
		}

		let score = row.get("score").and_then(Value::as_f64);
		let text_score = row.get("text_score").and_then(Value::as_f64).or(score);
		let Some(text_score) = text_score else {
			tracing::warn!(%id, "Dropping scorer row without a score.");

			continue;
		};
		let image_score = row.get("image_score").and_then(Value::as_f64).map(crate::clamp_unit);

		out.push(ItemScore {
			id,
			score: crate::clamp_unit(score.unwrap_or(text_score)),
			text_score: crate::clamp_unit(text_score),
			image_score,
		});
	}

	Ok(out)
}

fn wire_id(value: &Value) -> Option<String> {
	match value {
		Value::String(id) if !id.is_empty() => Some(id.clone()),
		Value::Number(id) => Some(id.to_string()),
		_ => None,
	}
}
