use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Judgment {
	Helpful,
	Wrong,
	Clicked,
}
impl Judgment {
	/// Helpful and wrong judgments train the classifier; clicks do not.
	pub fn is_qualifying(self) -> bool {
		matches!(self, Self::Helpful | Self::Wrong)
	}

	pub fn vote(self) -> Option<Vote> {
		match self {
			Self::Helpful => Some(Vote::Up),
			Self::Wrong => Some(Vote::Down),
			Self::Clicked => None,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
	Up,
	Down,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct FeedbackEntry {
	pub query: String,
	pub item_id: String,
	pub title: String,
	#[serde(default)]
	pub description: Option<String>,
	pub judgment: Judgment,
	/// Unix milliseconds.
	pub timestamp: i64,
}
