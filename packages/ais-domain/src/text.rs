use std::{collections::HashSet, sync::LazyLock};

use regex::Regex;

/// Tokens shorter than this carry too little signal to compare queries against items.
pub const MIN_TOKEN_LEN: usize = 3;

static HASHTAG: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"#([A-Za-z0-9_]+)").ok());
static CREATOR_RUN: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+\b").ok());

/// Lowercases, splits on any run of non-`[a-z0-9]` characters and drops short tokens.
pub fn tokenize(text: &str) -> Vec<String> {
	let lowered = text.to_lowercase();
	let mut out = Vec::new();

	for token in lowered.split(|ch: char| !(ch.is_ascii_lowercase() || ch.is_ascii_digit())) {
		if token.len() < MIN_TOKEN_LEN {
			continue;
		}

		out.push(token.to_string());
	}

	out
}

pub fn token_set(text: &str) -> HashSet<String> {
	tokenize(text).into_iter().collect()
}

/// Canonical form used for blacklist membership: lowercase, every non-alphanumeric run
/// collapsed to one space, trimmed.
pub fn normalize_title(title: &str) -> String {
	let mut out = String::with_capacity(title.len());
	let mut pending_space = false;

	for ch in title.chars().flat_map(char::to_lowercase) {
		if ch.is_alphanumeric() {
			if pending_space && !out.is_empty() {
				out.push(' ');
			}

			pending_space = false;

			out.push(ch);
		} else {
			pending_space = true;
		}
	}

	out
}

/// Text prepared for whole-word phrase lookups.
#[derive(Clone, Debug)]
pub struct PhraseText {
	padded: String,
}
impl PhraseText {
	pub fn new(text: &str) -> Self {
		let normalized = normalize_title(text);

		Self { padded: format!(" {normalized} ") }
	}

	/// True when `phrase` appears as a run of whole words. Multi-word phrases such as
	/// `tim cook` match across any separator.
	pub fn contains(&self, phrase: &str) -> bool {
		let needle = normalize_title(phrase);

		if needle.is_empty() {
			return false;
		}

		self.padded.contains(&format!(" {needle} "))
	}

	pub fn contains_any<'a, I>(&self, phrases: I) -> bool
	where
		I: IntoIterator<Item = &'a String>,
	{
		phrases.into_iter().any(|phrase| self.contains(phrase))
	}
}

pub fn extract_hashtags(text: &str) -> Vec<String> {
	let Some(re) = HASHTAG.as_ref() else { return Vec::new() };

	re.captures_iter(text).map(|caps| caps[1].to_lowercase()).collect()
}

/// Capitalised multi-word runs such as `Tim Cook`. Generic title-cased phrases match too, so
/// callers must treat the result as a hint.
pub fn extract_creator_hints(title: &str) -> Vec<String> {
	let Some(re) = CREATOR_RUN.as_ref() else { return Vec::new() };

	re.find_iter(title).map(|m| normalize_title(m.as_str())).collect()
}
