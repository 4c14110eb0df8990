//! Provider doubles and configuration shared by the engine and HTTP tests.

use std::{
	collections::HashMap,
	sync::{
		Arc, Mutex,
		atomic::{AtomicUsize, Ordering},
	},
};

use serde_json::Map;
use tokio::sync::{Semaphore, mpsc};

use ais_config::{Cache, Config, Feedback, Filters, ProviderConfig, Providers, Ranking, Service};
use ais_domain::item::CandidateItem;
use ais_providers::{
	scorer::{ItemScore, ScoreRequest},
	tag_match::{TagMatch, TagMatchRequest},
	trainer::{TrainingReport, TrainingRequest},
};
use ais_service::{BoxFuture, ScorerProvider, TagMatchProvider, TrainerProvider};

/// Defaults everywhere, with every collaborator pointed at the built-in local implementation.
pub fn test_config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		providers: Providers {
			scorer: local_provider(),
			tag_match: local_provider(),
			trainer: local_provider(),
		},
		ranking: Ranking::default(),
		filters: Filters::default(),
		cache: Cache::default(),
		feedback: Feedback::default(),
	}
}

pub fn local_provider() -> ProviderConfig {
	ProviderConfig {
		provider_id: ais_config::LOCAL_PROVIDER_ID.to_string(),
		api_base: String::new(),
		path: String::new(),
		api_key: None,
		timeout_ms: 1_000,
		default_headers: Map::new(),
	}
}

pub fn item(id: &str, title: &str) -> CandidateItem {
	CandidateItem { id: id.to_string(), title: title.to_string(), ..Default::default() }
}

/// Returns fixed scores for known ids and nothing for the rest.
#[derive(Clone, Default)]
pub struct StubScorer {
	scores: HashMap<String, (f32, Option<f32>)>,
	calls: Arc<AtomicUsize>,
	requests: Arc<Mutex<Vec<ScoreRequest>>>,
}
impl StubScorer {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn text(mut self, id: &str, text_score: f32) -> Self {
		self.scores.insert(id.to_string(), (text_score, None));

		self
	}

	pub fn text_and_image(mut self, id: &str, text_score: f32, image_score: f32) -> Self {
		self.scores.insert(id.to_string(), (text_score, Some(image_score)));

		self
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn last_request(&self) -> Option<ScoreRequest> {
		self.requests.lock().unwrap_or_else(|err| err.into_inner()).last().cloned()
	}

	fn respond(&self, request: &ScoreRequest) -> Vec<ItemScore> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		self.requests.lock().unwrap_or_else(|err| err.into_inner()).push(request.clone());

		request
			.items
			.iter()
			.filter_map(|item| {
				self.scores.get(&item.id).map(|(text_score, image_score)| ItemScore {
					id: item.id.clone(),
					score: *text_score,
					text_score: *text_score,
					image_score: *image_score,
				})
			})
			.collect()
	}
}
impl ScorerProvider for StubScorer {
	fn score<'a>(
		&'a self,
		_cfg: &'a ProviderConfig,
		request: &'a ScoreRequest,
	) -> BoxFuture<'a, ais_providers::Result<Vec<ItemScore>>> {
		let scores = self.respond(request);

		Box::pin(async move { Ok(scores) })
	}
}

/// Fails every call the way an unreachable backend would.
pub struct FailingScorer {
	pub status: u16,
}
impl ScorerProvider for FailingScorer {
	fn score<'a>(
		&'a self,
		_cfg: &'a ProviderConfig,
		_request: &'a ScoreRequest,
	) -> BoxFuture<'a, ais_providers::Result<Vec<ItemScore>>> {
		let status = self.status;

		Box::pin(async move {
			Err(ais_providers::Error::Status { status, message: "Scorer is down.".to_string() })
		})
	}
}

/// A [`StubScorer`] that parks every call until the paired [`Gate`] releases it.
pub struct GatedScorer {
	inner: StubScorer,
	permits: Arc<Semaphore>,
	entered: mpsc::UnboundedSender<String>,
}
impl GatedScorer {
	pub fn new(inner: StubScorer) -> (Self, Gate) {
		let permits = Arc::new(Semaphore::new(0));
		let (entered, entered_rx) = mpsc::unbounded_channel();

		(Self { inner, permits: permits.clone(), entered }, Gate { permits, entered: entered_rx })
	}
}
impl ScorerProvider for GatedScorer {
	fn score<'a>(
		&'a self,
		_cfg: &'a ProviderConfig,
		request: &'a ScoreRequest,
	) -> BoxFuture<'a, ais_providers::Result<Vec<ItemScore>>> {
		Box::pin(async move {
			let _ = self.entered.send(request.query.clone());
			let _permit = self.permits.acquire().await;

			Ok(self.inner.respond(request))
		})
	}
}

pub struct Gate {
	permits: Arc<Semaphore>,
	entered: mpsc::UnboundedReceiver<String>,
}
impl Gate {
	/// Waits until a scorer call is parked and returns its query.
	pub async fn entered(&mut self) -> Option<String> {
		self.entered.recv().await
	}

	pub fn release(&self, calls: usize) {
		self.permits.add_permits(calls);
	}
}

#[derive(Clone, Default)]
pub struct StubTagMatch {
	pub matches: Vec<TagMatch>,
}
impl TagMatchProvider for StubTagMatch {
	fn match_tags<'a>(
		&'a self,
		_cfg: &'a ProviderConfig,
		_request: &'a TagMatchRequest,
	) -> BoxFuture<'a, ais_providers::Result<Vec<TagMatch>>> {
		let matches = self.matches.clone();

		Box::pin(async move { Ok(matches) })
	}
}

/// Answers every training call with `keywords` and keeps the requests it saw.
#[derive(Clone, Default)]
pub struct RecordingTrainer {
	pub keywords: Vec<(String, f32)>,
	requests: Arc<Mutex<Vec<TrainingRequest>>>,
}
impl RecordingTrainer {
	pub fn with_keywords(keywords: &[(&str, f32)]) -> Self {
		Self {
			keywords: keywords.iter().map(|(keyword, weight)| (keyword.to_string(), *weight)).collect(),
			requests: Arc::default(),
		}
	}

	pub fn requests(&self) -> Vec<TrainingRequest> {
		self.requests.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}
impl TrainerProvider for RecordingTrainer {
	fn train<'a>(
		&'a self,
		_cfg: &'a ProviderConfig,
		request: &'a TrainingRequest,
	) -> BoxFuture<'a, ais_providers::Result<TrainingReport>> {
		self.requests.lock().unwrap_or_else(|err| err.into_inner()).push(request.clone());

		let report =
			TrainingReport { samples: request.feedback_data.len(), keywords: self.keywords.clone() };

		Box::pin(async move { Ok(report) })
	}
}
