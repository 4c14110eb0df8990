use serde::{Deserialize, Serialize};

use crate::text;

/// One piece of content collected from a result page. Immutable for the lifetime of a request.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct CandidateItem {
	pub id: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub description: String,
	#[serde(default, alias = "thumbnail", alias = "thumbnailRef")]
	pub thumbnail_ref: Option<String>,
	#[serde(default)]
	pub metadata: String,
}
impl CandidateItem {
	/// Title, description and hashtags, the surface the heuristic filters inspect.
	pub fn combined_text(&self) -> String {
		let mut out = format!("{} {}", self.title, self.description);

		for tag in text::extract_hashtags(&self.description)
			.into_iter()
			.chain(text::extract_hashtags(&self.metadata))
		{
			out.push(' ');
			out.push_str(&tag);
		}

		out
	}

	/// Text submitted to the embedding scorer.
	pub fn scoring_text(&self) -> String {
		[self.title.trim(), self.description.trim(), self.metadata.trim()]
			.into_iter()
			.filter(|part| !part.is_empty())
			.collect::<Vec<_>>()
			.join(" ")
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ScoredItem {
	#[serde(flatten)]
	pub item: CandidateItem,
	pub text_score: f32,
	pub image_score: Option<f32>,
	/// Sum of post-fusion boosts and penalties, already folded into `final_score`.
	#[serde(default)]
	pub adjustment: f32,
	pub final_score: f32,
}

/// Ordering bucket; higher tiers sort first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Tier(pub u8);
impl Tier {
	pub const NO_SCORE: Self = Self(0);
	pub const REJECTED: Self = Self(1);
	pub const STRONG_IMAGE: Self = Self(6);
	pub const TOP_IMAGE: Self = Self(7);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
	BelowMinScore,
	WeakImage,
	AmbiguousSense,
	NoQueryToken,
	OffTopic,
	Blacklisted,
}
impl RejectReason {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::BelowMinScore => "below_min_score",
			Self::WeakImage => "weak_image",
			Self::AmbiguousSense => "ambiguous_sense",
			Self::NoQueryToken => "no_query_token",
			Self::OffTopic => "off_topic",
			Self::Blacklisted => "blacklisted",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct FilterDecision {
	pub item_id: String,
	pub passes: bool,
	pub tier: Tier,
	pub reason: Option<RejectReason>,
}
