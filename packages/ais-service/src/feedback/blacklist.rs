use std::collections::{HashMap, HashSet};

use ais_domain::{
	feedback::{FeedbackEntry, Judgment},
	text,
};

/// Per-query titles (and creator hints) the user marked wrong. Derived from the feedback log
/// and rebuilt after every append; never persisted on its own.
#[derive(Clone, Debug, Default)]
pub struct BlacklistIndex {
	titles: HashMap<String, HashSet<String>>,
	creators: HashMap<String, HashSet<String>>,
}
impl BlacklistIndex {
	pub fn build<'a, I>(entries: I) -> Self
	where
		I: IntoIterator<Item = &'a FeedbackEntry>,
	{
		let mut index = Self::default();

		for entry in entries {
			if entry.judgment != Judgment::Wrong {
				continue;
			}

			let query = text::normalize_title(&entry.query);
			let title = text::normalize_title(&entry.title);

			if query.is_empty() || title.is_empty() {
				continue;
			}

			let creators = text::extract_creator_hints(&entry.title);

			if !creators.is_empty() {
				index.creators.entry(query.clone()).or_default().extend(creators);
			}

			index.titles.entry(query).or_default().insert(title);
		}

		index
	}

	/// Both arguments must already be normalized.
	pub fn contains(&self, normalized_query: &str, normalized_title: &str) -> bool {
		self.titles.get(normalized_query).is_some_and(|titles| titles.contains(normalized_title))
	}

	pub fn titles_for(&self, normalized_query: &str) -> Option<&HashSet<String>> {
		self.titles.get(normalized_query)
	}

	pub fn creators_for(&self, normalized_query: &str) -> Option<&HashSet<String>> {
		self.creators.get(normalized_query)
	}

	pub fn query_count(&self) -> usize {
		self.titles.len()
	}
}
