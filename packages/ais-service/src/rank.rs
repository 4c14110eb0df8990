pub mod boost;
pub mod filter;
pub mod fusion;
pub mod tier;

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
	Error, RankingEngine, Result,
	cache::{self, CacheEntry, CacheLookup},
	rank::{
		boost::Adjuster,
		filter::{FilterChain, QueryContext},
		fusion::FusionWeights,
	},
};
use ais_domain::item::{CandidateItem, FilterDecision, ScoredItem};
use ais_providers::scorer::{ScoreRequest, ScoreRequestItem};

pub const DEFAULT_SURFACE: &str = "default";

#[derive(Clone, Debug, Deserialize)]
pub struct RankRequest {
	/// Logical surface the result is presented on. A newer request for the same surface makes
	/// older in-flight results stale.
	#[serde(default)]
	pub surface: Option<String>,
	pub query: String,
	#[serde(default)]
	pub items: Vec<CandidateItem>,
}
impl RankRequest {
	pub fn new(query: impl Into<String>, items: Vec<CandidateItem>) -> Self {
		Self { surface: None, query: query.into(), items }
	}

	pub fn on_surface(mut self, surface: impl Into<String>) -> Self {
		self.surface = Some(surface.into());

		self
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RankedItem {
	pub original_index: usize,
	pub item_id: String,
	/// `None` when the scorer returned nothing for the item.
	pub scored: Option<ScoredItem>,
	pub decision: FilterDecision,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankStatus {
	Ranked,
	/// Missing query or candidates; nothing was computed.
	Skipped,
	/// A newer request for the same surface superseded this one.
	Stale,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RankOutcome {
	pub status: RankStatus,
	pub fingerprint: Option<String>,
	pub signature: Option<String>,
	/// False when the order matches what the surface already shows.
	pub reordered: bool,
	pub cache_hit: bool,
	pub items: Vec<RankedItem>,
	pub dropped: BTreeMap<String, usize>,
}
impl RankOutcome {
	fn empty(status: RankStatus, fingerprint: Option<String>) -> Self {
		Self {
			status,
			fingerprint,
			signature: None,
			reordered: false,
			cache_hit: false,
			items: Vec::new(),
			dropped: BTreeMap::new(),
		}
	}

	pub fn passing(&self) -> impl Iterator<Item = &RankedItem> {
		self.items.iter().filter(|item| item.decision.passes)
	}
}

impl RankingEngine {
	/// Scores, filters and orders `request.items` for `request.query`.
	///
	/// A missing query or an empty candidate list yields a `Skipped` outcome. Scorer failures
	/// surface as [`Error::ScorerUnavailable`] and clear the surface's last presented order.
	pub async fn rank(&self, request: RankRequest) -> Result<RankOutcome> {
		let query = request.query.trim();

		if query.is_empty() || request.items.is_empty() {
			let err = Error::MalformedRequest { message: "Missing query or items.".to_string() };

			tracing::debug!(error = %err, "Skipping ranking request.");

			return Ok(RankOutcome::empty(RankStatus::Skipped, None));
		}

		let surface = request.surface.as_deref().unwrap_or(DEFAULT_SURFACE).to_string();
		let items = dedup_items(request.items);
		let fingerprint = cache::fingerprint(query, items.iter().map(|item| item.id.as_str()));
		let token = self.surfaces().begin(&surface, &fingerprint);
		let context = QueryContext::new(query);
		let settings = self.settings();
		let (blacklist, hints, feedback_generation) = {
			let feedback = self.feedback_state();

			(
				feedback.blacklist.clone(),
				feedback.store.hints_for(&context.normalized),
				feedback.generation,
			)
		};
		let classifier = self.classifier();
		let lookup = self.cache().get(&fingerprint, OffsetDateTime::now_utc());
		let (ranked_items, cache_hit) = match lookup {
			CacheLookup::Hit(entry) => {
				tracing::debug!(%fingerprint, "Ranking cache hit.");

				(entry.ranked_items.clone(), true)
			},
			lookup => {
				if matches!(lookup, CacheLookup::Expired) {
					tracing::debug!(%fingerprint, "Ranking cache entry expired.");
				} else {
					tracing::debug!(%fingerprint, "Ranking cache miss.");
				}

				let score_request = ScoreRequest {
					query: query.to_string(),
					items: items.iter().map(score_request_item).collect(),
					feedback: hints,
				};
				let scores = match self
					.providers
					.scorer
					.score(&self.cfg.providers.scorer, &score_request)
					.await
				{
					Ok(scores) => scores,
					Err(err) => {
						self.surfaces().clear(&surface);

						tracing::warn!(error = %err, %fingerprint, "Scorer failed; ranking abandoned.");

						return Err(Error::scorer(err));
					},
				};
				let creators = blacklist.creators_for(&context.normalized);
				let adjuster = Adjuster::new(&self.cfg, &context.phrase, &classifier, creators);
				let mut scored = fusion::score_items(
					&items,
					scores,
					FusionWeights::from_settings(&settings),
					|item| adjuster.adjustment(item),
				);
				let chain = FilterChain::new(&settings, &self.cfg.filters, &blacklist);
				let mut ranked_items: Vec<RankedItem> = items
					.iter()
					.enumerate()
					.map(|(index, item)| {
						let scored = scored.remove(&item.id);
						let verdict = scored.as_ref().map(|scored| chain.evaluate(&context, scored));
						let passes = matches!(verdict, Some(Ok(())));
						let reason = verdict.and_then(|verdict| verdict.err());
						let tier = tier::assign(scored.as_ref(), passes, settings.thresholds);

						RankedItem {
							original_index: index,
							item_id: item.id.clone(),
							scored,
							decision: FilterDecision { item_id: item.id.clone(), passes, tier, reason },
						}
					})
					.collect();

				tier::reorder(&mut ranked_items);

				// Feedback bumps the generation before it invalidates, so compare under the cache lock.
				let mut cache = self.cache();

				if self.feedback_state().generation == feedback_generation {
					cache.put(CacheEntry {
						fingerprint: fingerprint.clone(),
						normalized_query: context.normalized.clone(),
						ranked_items: ranked_items.clone(),
						created_at: OffsetDateTime::now_utc(),
					});
				} else {
					tracing::debug!(%fingerprint, "Feedback changed while scoring; result not cached.");
				}

				drop(cache);

				(ranked_items, false)
			},
		};
		let mut surfaces = self.surfaces();

		if !surfaces.is_current(&token) {
			tracing::info!(%fingerprint, surface = %token.surface, "Discarding stale ranking result.");

			return Ok(RankOutcome::empty(RankStatus::Stale, Some(fingerprint)));
		}

		let signature = tier::order_signature(&ranked_items);
		let reordered = surfaces.record_signature(&token, &signature);

		drop(surfaces);

		let dropped = drop_counts(&ranked_items);

		tracing::info!(
			%fingerprint,
			items = ranked_items.len(),
			passing = ranked_items.iter().filter(|item| item.decision.passes).count(),
			cache_hit,
			reordered,
			"Ranking completed."
		);

		Ok(RankOutcome {
			status: RankStatus::Ranked,
			fingerprint: Some(fingerprint),
			signature: Some(signature),
			reordered,
			cache_hit,
			items: ranked_items,
			dropped,
		})
	}
}

fn dedup_items(items: Vec<CandidateItem>) -> Vec<CandidateItem> {
	let mut seen = HashSet::with_capacity(items.len());
	let mut out = Vec::with_capacity(items.len());

	for item in items {
		if seen.insert(item.id.clone()) {
			out.push(item);
		} else {
			tracing::warn!(id = %item.id, "Ignoring duplicate candidate id.");
		}
	}

	out
}

fn score_request_item(item: &CandidateItem) -> ScoreRequestItem {
	ScoreRequestItem {
		id: item.id.clone(),
		text: item.scoring_text(),
		title: item.title.clone(),
		description: item.description.clone(),
		thumbnail_ref: item.thumbnail_ref.clone(),
	}
}

fn drop_counts(items: &[RankedItem]) -> BTreeMap<String, usize> {
	let mut out = BTreeMap::new();

	for reason in items.iter().filter_map(|item| item.decision.reason) {
		*out.entry(reason.as_str().to_string()).or_insert(0) += 1;
	}

	out
}
