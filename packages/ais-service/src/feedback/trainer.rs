use std::collections::HashMap;

use ais_domain::{feedback::FeedbackEntry, text};
use ais_providers::trainer::{TrainingRequest, TrainingSample};

/// Learned keyword weights. Negative weights mark words seen on titles the user rejected.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassifierModel {
	weights: HashMap<String, f32>,
	generation: u64,
}
impl ClassifierModel {
	/// A new model with `keywords` layered over the current weights; later values win.
	pub fn merge<I>(&self, keywords: I) -> Self
	where
		I: IntoIterator<Item = (String, f32)>,
	{
		let mut weights = self.weights.clone();

		for (keyword, weight) in keywords {
			let keyword = keyword.trim().to_lowercase();

			if keyword.is_empty() || !weight.is_finite() {
				continue;
			}

			weights.insert(keyword, weight.clamp(-1.0, 1.0));
		}

		Self { weights, generation: self.generation + 1 }
	}

	/// Sum of the weights of distinct title tokens, clamped to [-1, 1].
	pub fn adjustment(&self, title: &str) -> f32 {
		let total: f32 =
			text::token_set(title).iter().filter_map(|token| self.weights.get(token)).sum();

		total.clamp(-1.0, 1.0)
	}

	pub fn weight(&self, keyword: &str) -> Option<f32> {
		self.weights.get(keyword).copied()
	}

	pub fn generation(&self) -> u64 {
		self.generation
	}

	pub fn len(&self) -> usize {
		self.weights.len()
	}

	pub fn is_empty(&self) -> bool {
		self.weights.is_empty()
	}
}

/// True when the `appended_total`-th append lands on a training boundary.
pub fn should_train(appended_total: u64, every: usize) -> bool {
	every > 0 && appended_total > 0 && appended_total % every as u64 == 0
}

/// Qualifying entries mapped to up/down votes; clicks are left out.
pub fn training_request<'a, I>(entries: I) -> TrainingRequest
where
	I: IntoIterator<Item = &'a FeedbackEntry>,
{
	let feedback_data = entries
		.into_iter()
		.filter_map(|entry| {
			entry.judgment.vote().map(|feedback| TrainingSample {
				title: entry.title.clone(),
				description: entry.description.clone().unwrap_or_default(),
				feedback,
			})
		})
		.collect();

	TrainingRequest { feedback_data }
}
