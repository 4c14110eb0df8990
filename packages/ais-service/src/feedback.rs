pub mod blacklist;
pub mod store;
pub mod trainer;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::{runtime::Handle, task::JoinHandle};

use crate::{
	Error, RankingEngine, Result,
	feedback::{blacklist::BlacklistIndex, store::FeedbackStore},
};
use ais_domain::{
	feedback::{FeedbackEntry, Judgment},
	text,
};
use ais_providers::trainer::TrainingRequest;

/// The log and the blacklist derived from it, swapped together under one lock.
pub(crate) struct FeedbackState {
	pub(crate) store: FeedbackStore,
	pub(crate) blacklist: Arc<BlacklistIndex>,
	/// Bumped on every blacklist rebuild. Rankings computed under an older generation are not
	/// cached.
	pub(crate) generation: u64,
}
impl FeedbackState {
	pub(crate) fn new(store: FeedbackStore) -> Self {
		let blacklist = Arc::new(BlacklistIndex::build(store.entries()));

		Self { store, blacklist, generation: 0 }
	}

	fn rebuild_blacklist(&mut self) {
		self.blacklist = Arc::new(BlacklistIndex::build(self.store.entries()));
		self.generation += 1;
	}
}

/// A judgment as submitted by a caller; the engine stamps the time.
#[derive(Clone, Debug, Deserialize)]
pub struct FeedbackSubmission {
	pub query: String,
	pub item_id: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub description: Option<String>,
	pub judgment: Judgment,
}

#[derive(Debug, Serialize)]
pub struct FeedbackReceipt {
	pub total: usize,
	pub qualifying: usize,
	pub training_triggered: bool,
	/// Background training task, when one was started.
	#[serde(skip)]
	pub training: Option<JoinHandle<()>>,
}

impl RankingEngine {
	/// Appends a judgment, rebuilds the blacklist and, on every `train_every`-th append, starts
	/// keyword training in the background.
	pub fn submit_feedback(&self, submission: FeedbackSubmission) -> Result<FeedbackReceipt> {
		if submission.query.trim().is_empty() || submission.item_id.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: "query and item_id must be non-empty.".to_string(),
			});
		}

		let judgment = submission.judgment;
		let normalized_query = text::normalize_title(&submission.query);
		let entry = FeedbackEntry {
			query: submission.query,
			item_id: submission.item_id,
			title: submission.title,
			description: submission.description,
			judgment,
			timestamp: unix_millis(OffsetDateTime::now_utc()),
		};
		let feedback_cfg = &self.cfg.feedback;
		let (total, qualifying, triggered) = {
			let mut state = self.feedback.write().unwrap_or_else(|err| err.into_inner());
			let appended = state.store.append(entry);

			state.rebuild_blacklist();

			(
				state.store.len(),
				state.store.qualifying_count(),
				trainer::should_train(appended, feedback_cfg.train_every),
			)
		};

		if judgment == Judgment::Wrong {
			let invalidated = self.cache().invalidate_query(&normalized_query);

			tracing::debug!(query = %normalized_query, invalidated, "Blacklist changed; cached rankings dropped.");
		}

		let training = if !triggered {
			None
		} else if qualifying < feedback_cfg.min_training_samples {
			let err = Error::InsufficientFeedback {
				qualifying,
				required: feedback_cfg.min_training_samples,
			};

			tracing::debug!(error = %err, "Skipping keyword training.");

			None
		} else {
			let request = trainer::training_request(self.feedback_state().store.entries());

			self.spawn_training(request)
		};

		Ok(FeedbackReceipt { total, qualifying, training_triggered: training.is_some(), training })
	}

	/// Replaces the log with a previously exported one. Cached rankings are dropped because the
	/// blacklist may have changed.
	pub fn restore_feedback(&self, entries: Vec<FeedbackEntry>) {
		let count = {
			let mut state = self.feedback.write().unwrap_or_else(|err| err.into_inner());

			state.store = FeedbackStore::from_entries(self.cfg.feedback.max_entries, entries);
			state.rebuild_blacklist();

			state.store.len()
		};

		self.cache().clear();

		tracing::info!(entries = count, "Feedback log restored.");
	}

	pub fn feedback_entries(&self) -> Vec<FeedbackEntry> {
		self.feedback_state().store.entries().cloned().collect()
	}

	/// Normalized titles blacklisted for `query`, sorted.
	pub fn blacklist_for(&self, query: &str) -> Vec<String> {
		let normalized = text::normalize_title(query);
		let blacklist = self.feedback_state().blacklist.clone();
		let mut titles: Vec<String> = blacklist
			.titles_for(&normalized)
			.map(|titles| titles.iter().cloned().collect())
			.unwrap_or_default();

		titles.sort();

		titles
	}

	fn spawn_training(&self, request: TrainingRequest) -> Option<JoinHandle<()>> {
		let Ok(handle) = Handle::try_current() else {
			tracing::warn!("No async runtime available; keyword training skipped.");

			return None;
		};
		let provider = self.providers.trainer.clone();
		let cfg = self.cfg.providers.trainer.clone();
		let classifier = self.classifier.clone();

		Some(handle.spawn(async move {
			let samples = request.feedback_data.len();

			match provider.train(&cfg, &request).await {
				Ok(report) => {
					let keywords = report.keywords.len();
					let mut current = classifier.write().unwrap_or_else(|err| err.into_inner());
					let merged = Arc::new(current.merge(report.keywords));
					let generation = merged.generation();

					*current = merged;

					drop(current);

					tracing::info!(samples, keywords, generation, "Keyword training completed.");
				},
				Err(err) => {
					tracing::warn!(error = %err, samples, "Keyword training failed.");
				},
			}
		}))
	}
}

fn unix_millis(now: OffsetDateTime) -> i64 {
	(now.unix_timestamp_nanos() / 1_000_000) as i64
}
