pub mod cache;
pub mod collect;
pub mod feedback;
pub mod rank;
pub mod settings;
pub mod surface;

mod error;

pub use error::{Error, Result};

pub use cache::{CacheEntry, CacheLookup, ResultCache};
pub use collect::{CollectOutcome, CollectRequest};
pub use feedback::{
	FeedbackReceipt, FeedbackSubmission,
	blacklist::BlacklistIndex,
	store::FeedbackStore,
	trainer::ClassifierModel,
};
pub use rank::{RankOutcome, RankRequest, RankStatus, RankedItem};
pub use settings::RankingSettings;

use std::{
	future::Future,
	pin::Pin,
	sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard},
};

use ais_config::{Config, ProviderConfig};
use ais_providers::{
	local,
	scorer::{self, ItemScore, ScoreRequest},
	tag_match::{self, TagMatch, TagMatchRequest},
	trainer::{self, TrainingReport, TrainingRequest},
};

use crate::{feedback::FeedbackState, surface::SurfaceTracker};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait ScorerProvider
where
	Self: Send + Sync,
{
	fn score<'a>(
		&'a self,
		cfg: &'a ProviderConfig,
		request: &'a ScoreRequest,
	) -> BoxFuture<'a, ais_providers::Result<Vec<ItemScore>>>;
}

pub trait TagMatchProvider
where
	Self: Send + Sync,
{
	fn match_tags<'a>(
		&'a self,
		cfg: &'a ProviderConfig,
		request: &'a TagMatchRequest,
	) -> BoxFuture<'a, ais_providers::Result<Vec<TagMatch>>>;
}

pub trait TrainerProvider
where
	Self: Send + Sync,
{
	fn train<'a>(
		&'a self,
		cfg: &'a ProviderConfig,
		request: &'a TrainingRequest,
	) -> BoxFuture<'a, ais_providers::Result<TrainingReport>>;
}

#[derive(Clone)]
pub struct Providers {
	pub scorer: Arc<dyn ScorerProvider>,
	pub tag_match: Arc<dyn TagMatchProvider>,
	pub trainer: Arc<dyn TrainerProvider>,
}
impl Providers {
	pub fn new(
		scorer: Arc<dyn ScorerProvider>,
		tag_match: Arc<dyn TagMatchProvider>,
		trainer: Arc<dyn TrainerProvider>,
	) -> Self {
		Self { scorer, tag_match, trainer }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { scorer: provider.clone(), tag_match: provider.clone(), trainer: provider }
	}
}

/// Dispatches to the HTTP collaborators, or to the offline implementations when a provider is
/// configured as `local`.
struct DefaultProviders;
impl ScorerProvider for DefaultProviders {
	fn score<'a>(
		&'a self,
		cfg: &'a ProviderConfig,
		request: &'a ScoreRequest,
	) -> BoxFuture<'a, ais_providers::Result<Vec<ItemScore>>> {
		if cfg.is_local() {
			return Box::pin(async move { Ok(local::score(request)) });
		}

		Box::pin(scorer::score(cfg, request))
	}
}
impl TagMatchProvider for DefaultProviders {
	fn match_tags<'a>(
		&'a self,
		cfg: &'a ProviderConfig,
		request: &'a TagMatchRequest,
	) -> BoxFuture<'a, ais_providers::Result<Vec<TagMatch>>> {
		if cfg.is_local() {
			return Box::pin(async move { Ok(local::match_tags(request)) });
		}

		Box::pin(tag_match::match_tags(cfg, request))
	}
}
impl TrainerProvider for DefaultProviders {
	fn train<'a>(
		&'a self,
		cfg: &'a ProviderConfig,
		request: &'a TrainingRequest,
	) -> BoxFuture<'a, ais_providers::Result<TrainingReport>> {
		if cfg.is_local() {
			return Box::pin(async move { Ok(local::train(&request.feedback_data)) });
		}

		Box::pin(trainer::train(cfg, request))
	}
}

/// Owns everything a ranking surface needs: configuration, runtime settings, the result cache,
/// the feedback log with its derived blacklist, and the learned keyword model.
pub struct RankingEngine {
	pub cfg: Config,
	pub providers: Providers,
	settings: RwLock<RankingSettings>,
	cache: Mutex<ResultCache>,
	feedback: RwLock<FeedbackState>,
	classifier: Arc<RwLock<Arc<ClassifierModel>>>,
	surfaces: Mutex<SurfaceTracker>,
}
impl RankingEngine {
	pub fn new(cfg: Config) -> Self {
		Self::with_providers(cfg, Providers::default())
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Self {
		let settings = RankingSettings::from_config(&cfg);
		let cache = ResultCache::new(&cfg.cache);
		let feedback = FeedbackState::new(FeedbackStore::new(cfg.feedback.max_entries));

		Self {
			cfg,
			providers,
			settings: RwLock::new(settings),
			cache: Mutex::new(cache),
			feedback: RwLock::new(feedback),
			classifier: Arc::new(RwLock::new(Arc::new(ClassifierModel::default()))),
			surfaces: Mutex::new(SurfaceTracker::default()),
		}
	}

	pub fn settings(&self) -> RankingSettings {
		self.settings.read().unwrap_or_else(|err| err.into_inner()).clone()
	}

	/// Replaces the runtime settings and drops every cached ranking computed under the old ones.
	pub fn apply_settings(&self, settings: RankingSettings) -> Result<()> {
		settings.validate()?;

		*self.settings.write().unwrap_or_else(|err| err.into_inner()) = settings;

		let dropped = self.cache().clear();

		tracing::info!(dropped, "Ranking settings changed; result cache cleared.");

		Ok(())
	}

	pub fn classifier(&self) -> Arc<ClassifierModel> {
		self.classifier.read().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn cached_entries(&self) -> usize {
		self.cache().len()
	}

	fn cache(&self) -> MutexGuard<'_, ResultCache> {
		self.cache.lock().unwrap_or_else(|err| err.into_inner())
	}

	fn surfaces(&self) -> MutexGuard<'_, SurfaceTracker> {
		self.surfaces.lock().unwrap_or_else(|err| err.into_inner())
	}

	fn feedback_state(&self) -> RwLockReadGuard<'_, FeedbackState> {
		self.feedback.read().unwrap_or_else(|err| err.into_inner())
	}
}
