mod acceptance {
	mod collect;
	mod concurrency;
	mod feedback;
	mod ranking;
	mod settings;

	use std::sync::Arc;

	use ais_config::Config;
	use ais_domain::item::Tier;
	use ais_service::{
		Providers, RankOutcome, RankingEngine, ScorerProvider, TagMatchProvider, TrainerProvider,
	};
	use ais_testkit::{RecordingTrainer, StubTagMatch};

	pub fn engine<S>(scorer: S) -> RankingEngine
	where
		S: ScorerProvider + 'static,
	{
		engine_with(ais_testkit::test_config(), scorer, StubTagMatch::default(), RecordingTrainer::default())
	}

	pub fn engine_with<S, M, T>(cfg: Config, scorer: S, tag_match: M, trainer: T) -> RankingEngine
	where
		S: ScorerProvider + 'static,
		M: TagMatchProvider + 'static,
		T: TrainerProvider + 'static,
	{
		let providers = Providers::new(Arc::new(scorer), Arc::new(tag_match), Arc::new(trainer));

		RankingEngine::with_providers(cfg, providers)
	}

	pub fn ids(outcome: &RankOutcome) -> Vec<&str> {
		outcome.items.iter().map(|item| item.item_id.as_str()).collect()
	}

	pub fn tier_of(outcome: &RankOutcome, id: &str) -> Tier {
		outcome
			.items
			.iter()
			.find(|item| item.item_id == id)
			.map(|item| item.decision.tier)
			.expect("Item missing from outcome.")
	}

	pub fn final_score_of(outcome: &RankOutcome, id: &str) -> f32 {
		outcome
			.items
			.iter()
			.find(|item| item.item_id == id)
			.and_then(|item| item.scored.as_ref())
			.map(|scored| scored.final_score)
			.expect("Scored item missing from outcome.")
	}
}
