use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_MIN_SCORE: f32 = 0.25;
pub const DEFAULT_TEXT_WEIGHT: f32 = 0.6;
pub const DEFAULT_IMAGE_WEIGHT: f32 = 0.4;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 512;
pub const DEFAULT_FEEDBACK_MAX_ENTRIES: usize = 500;
pub const DEFAULT_TRAIN_EVERY: usize = 20;
pub const DEFAULT_MIN_TRAINING_SAMPLES: usize = 10;

/// Provider id that selects the built-in token-overlap scorer instead of an HTTP backend.
pub const LOCAL_PROVIDER_ID: &str = "local";

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub providers: Providers,
	#[serde(default)]
	pub ranking: Ranking,
	#[serde(default)]
	pub filters: Filters,
	#[serde(default)]
	pub cache: Cache,
	#[serde(default)]
	pub feedback: Feedback,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Providers {
	pub scorer: ProviderConfig,
	pub tag_match: ProviderConfig,
	pub trainer: ProviderConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProviderConfig {
	pub provider_id: String,
	#[serde(default)]
	pub api_base: String,
	#[serde(default)]
	pub path: String,
	/// Optional. Sent as a bearer token when present.
	#[serde(default)]
	pub api_key: Option<String>,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}
impl ProviderConfig {
	pub fn is_local(&self) -> bool {
		self.provider_id == LOCAL_PROVIDER_ID
	}

	pub fn url(&self) -> String {
		format!("{}{}", self.api_base.trim_end_matches('/'), self.path)
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingMode {
	#[default]
	Balanced,
	Boosted,
	Strict,
}
impl RankingMode {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Balanced => "balanced",
			Self::Boosted => "boosted",
			Self::Strict => "strict",
		}
	}
}

/// Image-similarity cut points. `min` gates weak visual matches, `strong` and `top` promote
/// items into the visual tiers.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct ImageThresholds {
	pub min: f32,
	pub strong: f32,
	pub top: f32,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ModeThresholds {
	pub balanced: ImageThresholds,
	pub boosted: ImageThresholds,
	pub strict: ImageThresholds,
}
impl ModeThresholds {
	pub fn for_mode(&self, mode: RankingMode) -> ImageThresholds {
		match mode {
			RankingMode::Balanced => self.balanced,
			RankingMode::Boosted => self.boosted,
			RankingMode::Strict => self.strict,
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = (RankingMode, ImageThresholds)> {
		[
			(RankingMode::Balanced, self.balanced),
			(RankingMode::Boosted, self.boosted),
			(RankingMode::Strict, self.strict),
		]
		.into_iter()
	}
}
impl Default for ModeThresholds {
	fn default() -> Self {
		Self {
			balanced: ImageThresholds { min: 0.20, strong: 0.45, top: 0.65 },
			boosted: ImageThresholds { min: 0.18, strong: 0.40, top: 0.60 },
			strict: ImageThresholds { min: 0.35, strong: 0.55, top: 0.75 },
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Ranking {
	pub mode: RankingMode,
	pub min_score: f32,
	pub text_weight: f32,
	pub image_weight: f32,
	pub thresholds: ModeThresholds,
	pub boosts: RankingBoosts,
}
impl Default for Ranking {
	fn default() -> Self {
		Self {
			mode: RankingMode::default(),
			min_score: DEFAULT_MIN_SCORE,
			text_weight: DEFAULT_TEXT_WEIGHT,
			image_weight: DEFAULT_IMAGE_WEIGHT,
			thresholds: ModeThresholds::default(),
			boosts: RankingBoosts::default(),
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RankingBoosts {
	/// Additive boost ceiling for fresh items when the query asks for recent content.
	pub temporal_weight: f32,
	pub temporal_half_life_days: f32,
	pub temporal_terms: Vec<String>,
}
impl Default for RankingBoosts {
	fn default() -> Self {
		Self {
			temporal_weight: 0.1,
			temporal_half_life_days: 30.0,
			temporal_terms: strings(&[
				"latest",
				"newest",
				"new",
				"today",
				"recent",
				"recently",
				"this week",
				"this month",
				"this year",
				"breaking",
				"news",
			]),
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Filters {
	pub disambiguation_enabled: bool,
	pub disambiguation: Vec<AmbiguousTerm>,
	pub off_topic: OffTopic,
}
impl Default for Filters {
	fn default() -> Self {
		Self {
			disambiguation_enabled: true,
			disambiguation: default_disambiguation(),
			off_topic: OffTopic::default(),
		}
	}
}

/// Two senses of one query word. Items mentioning a `disallowed` keyword without any
/// `allowed` keyword are rejected when the query contains `term`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AmbiguousTerm {
	pub term: String,
	pub disallowed: Vec<String>,
	pub allowed: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct OffTopic {
	pub enabled: bool,
	pub markers: Vec<String>,
	/// Query words that signal the user wants the marked content, disabling the check.
	pub exempt_query_terms: Vec<String>,
}
impl Default for OffTopic {
	fn default() -> Self {
		Self {
			enabled: true,
			markers: strings(&[
				"official music video",
				"music video",
				"official audio",
				"official video",
				"lyric video",
				"lyrics",
				"remix",
				"album",
				"song",
				"karaoke",
				"instrumental",
				"feat",
				"ft",
				"soundtrack",
				"playlist",
			]),
			exempt_query_terms: strings(&[
				"song",
				"songs",
				"music",
				"lyrics",
				"album",
				"remix",
				"karaoke",
				"instrumental",
				"soundtrack",
				"playlist",
				"concert",
				"band",
				"singer",
			]),
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Cache {
	pub ttl_secs: u64,
	pub max_entries: usize,
}
impl Default for Cache {
	fn default() -> Self {
		Self { ttl_secs: DEFAULT_CACHE_TTL_SECS, max_entries: DEFAULT_CACHE_MAX_ENTRIES }
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Feedback {
	pub max_entries: usize,
	pub train_every: usize,
	pub min_training_samples: usize,
	/// Scale applied to learned keyword weights before they adjust a final score.
	pub classifier_weight: f32,
	/// Penalty for items whose title names a creator the user marked wrong. Zero disables it.
	pub creator_penalty: f32,
	pub snapshot_path: Option<String>,
}
impl Default for Feedback {
	fn default() -> Self {
		Self {
			max_entries: DEFAULT_FEEDBACK_MAX_ENTRIES,
			train_every: DEFAULT_TRAIN_EVERY,
			min_training_samples: DEFAULT_MIN_TRAINING_SAMPLES,
			classifier_weight: 0.1,
			creator_penalty: 0.0,
			snapshot_path: None,
		}
	}
}

fn default_disambiguation() -> Vec<AmbiguousTerm> {
	vec![
		AmbiguousTerm {
			term: "apple".to_string(),
			disallowed: strings(&[
				"iphone",
				"ipad",
				"macbook",
				"mac",
				"ios",
				"macos",
				"app store",
				"tim cook",
				"steve jobs",
				"cupertino",
				"wozniak",
				"event",
				"keynote",
				"airpods",
				"watch",
				"airplay",
				"siri",
				"icloud",
				"battery",
				"charge",
				"upgrade",
			]),
			allowed: strings(&[
				"fruit",
				"orchard",
				"tree",
				"picking",
				"harvest",
				"recipe",
				"cooking",
				"pie",
				"juice",
				"cider",
				"farmer",
				"garden",
				"organic",
				"crisp",
				"sweet",
				"health",
				"nutrition",
				"vitamin",
			]),
		},
		AmbiguousTerm {
			term: "orange".to_string(),
			disallowed: strings(&[
				"orange county",
				"orange is the new black",
				"theory",
			]),
			allowed: strings(&[
				"fruit",
				"citrus",
				"tree",
				"orchard",
				"vitamin c",
				"juice",
				"peel",
				"zest",
				"sweet",
				"taste",
				"recipe",
				"health",
			]),
		},
		AmbiguousTerm {
			term: "cherry".to_string(),
			disallowed: strings(&["cherry picking", "festival"]),
			allowed: strings(&["fruit", "tree", "orchard", "recipe", "pie", "sweet", "tart"]),
		},
	]
}

fn strings(values: &[&str]) -> Vec<String> {
	values.iter().map(|value| value.to_string()).collect()
}
