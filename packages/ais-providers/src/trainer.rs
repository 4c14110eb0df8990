use serde::Serialize;
use serde_json::Value;

use crate::{Error, Result};
use ais_config::ProviderConfig;
use ais_domain::feedback::Vote;

#[derive(Clone, Debug, Serialize)]
pub struct TrainingRequest {
	pub feedback_data: Vec<TrainingSample>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrainingSample {
	pub title: String,
	pub description: String,
	pub feedback: Vote,
}

/// Signed weight applied to a bare keyword in a trainer response. Bare keywords are the ones the
/// trainer associates with wrong results.
pub const BARE_KEYWORD_WEIGHT: f32 = -1.0;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrainingReport {
	pub samples: usize,
	/// Positive weights lean helpful, negative weights lean wrong.
	pub keywords: Vec<(String, f32)>,
}

pub async fn train(cfg: &ProviderConfig, request: &TrainingRequest) -> Result<TrainingReport> {
	let json = crate::post_json(cfg, request).await?;

	parse_training_response(json)
}

pub fn parse_training_response(json: Value) -> Result<TrainingReport> {
	let samples = json
		.get("samples")
		.and_then(Value::as_u64)
		.ok_or_else(|| Error::invalid_response("Training response is missing samples."))?
		as usize;
	let learned = json
		.get("learned_keywords")
		.and_then(Value::as_array)
		.ok_or_else(|| Error::invalid_response("Training response is missing learned_keywords."))?;
	let mut keywords = Vec::with_capacity(learned.len());

	for entry in learned {
		let parsed = match entry {
			Value::String(keyword) => Some((keyword.clone(), BARE_KEYWORD_WEIGHT)),
			Value::Object(obj) => obj.get("keyword").and_then(Value::as_str).map(|keyword| {
				let weight = obj.get("weight").and_then(Value::as_f64).unwrap_or(-1.0);

				(keyword.to_string(), weight.clamp(-1.0, 1.0) as f32)
			}),
			_ => None,
		};
		let Some((keyword, weight)) = parsed else {
			continue;
		};
		let keyword = keyword.trim().to_lowercase();

		if keyword.is_empty() || !weight.is_finite() {
			continue;
		}

		keywords.push((keyword, weight));
	}

	Ok(TrainingReport { samples, keywords })
}
