use std::collections::VecDeque;

use ais_domain::{
	feedback::{FeedbackEntry, Judgment},
	text,
};
use ais_providers::scorer::FeedbackHints;

/// Append-only judgment log holding the most recent `capacity` entries.
#[derive(Clone, Debug)]
pub struct FeedbackStore {
	entries: VecDeque<FeedbackEntry>,
	capacity: usize,
	appended_total: u64,
}
impl FeedbackStore {
	pub fn new(capacity: usize) -> Self {
		let capacity = capacity.max(1);

		Self { entries: VecDeque::with_capacity(capacity), capacity, appended_total: 0 }
	}

	/// Restores a log exported by [`FeedbackStore::entries`], keeping the newest entries. The
	/// append counter resumes from the restored length.
	pub fn from_entries(capacity: usize, entries: impl IntoIterator<Item = FeedbackEntry>) -> Self {
		let mut store = Self::new(capacity);

		for entry in entries {
			store.push(entry);
		}

		store.appended_total = store.entries.len() as u64;

		store
	}

	/// Appends `entry`, evicting the oldest entry when full. Timestamps never go backwards.
	pub fn append(&mut self, entry: FeedbackEntry) -> u64 {
		self.push(entry);

		self.appended_total += 1;

		self.appended_total
	}

	pub fn entries(&self) -> impl ExactSizeIterator<Item = &FeedbackEntry> {
		self.entries.iter()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn appended_total(&self) -> u64 {
		self.appended_total
	}

	pub fn qualifying_count(&self) -> usize {
		self.entries.iter().filter(|entry| entry.judgment.is_qualifying()).count()
	}

	/// Titles judged helpful or wrong under the same normalized query.
	pub fn hints_for(&self, normalized_query: &str) -> FeedbackHints {
		let mut hints = FeedbackHints::default();

		if normalized_query.is_empty() {
			return hints;
		}

		for entry in &self.entries {
			if text::normalize_title(&entry.query) != normalized_query {
				continue;
			}

			let bucket = match entry.judgment {
				Judgment::Helpful => &mut hints.positive,
				Judgment::Wrong => &mut hints.negative,
				Judgment::Clicked => continue,
			};

			if !bucket.contains(&entry.title) {
				bucket.push(entry.title.clone());
			}
		}

		hints
	}

	fn push(&mut self, mut entry: FeedbackEntry) {
		if let Some(last) = self.entries.back() {
			entry.timestamp = entry.timestamp.max(last.timestamp);
		}
		if self.entries.len() == self.capacity {
			self.entries.pop_front();
		}

		self.entries.push_back(entry);
	}
}
