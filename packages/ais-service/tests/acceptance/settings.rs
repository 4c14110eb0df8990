use ais_config::RankingMode;
use ais_domain::item::Tier;
use ais_service::{Error, RankRequest, RankingSettings};
use ais_testkit::{StubScorer, item};

use super::{engine, tier_of};

#[tokio::test]
async fn changing_settings_clears_cache_and_applies_new_thresholds() {
	let scorer = StubScorer::new().text_and_image("a", 0.6, 0.5);
	let engine = engine(scorer.clone());
	let request = RankRequest::new("garden shed", vec![item("a", "Garden shed build")]);
	let balanced = engine.rank(request.clone()).await.expect("Ranking failed.");

	assert_eq!(tier_of(&balanced, "a"), Tier::STRONG_IMAGE);
	assert_eq!(engine.cached_entries(), 1);

	let strict = engine.settings().with_mode(&engine.cfg, RankingMode::Strict);

	engine.apply_settings(strict).expect("Settings rejected.");

	assert_eq!(engine.cached_entries(), 0);

	let outcome = engine.rank(request).await.expect("Ranking failed.");

	assert!(!outcome.cache_hit);
	assert_eq!(scorer.calls(), 2);
	assert_eq!(tier_of(&outcome, "a"), Tier(4));
}

#[test]
fn invalid_settings_are_rejected_and_kept_out() {
	let engine = engine(StubScorer::new());
	let before = engine.settings();
	let broken = RankingSettings { min_score: 1.5, ..before.clone() };

	assert!(matches!(engine.apply_settings(broken), Err(Error::InvalidRequest { .. })));

	let zero_weights = RankingSettings { text_weight: 0.0, image_weight: 0.0, ..before.clone() };

	assert!(engine.apply_settings(zero_weights).is_err());
	assert_eq!(engine.settings(), before);
}

#[tokio::test]
async fn disabling_disambiguation_lets_brand_items_through() {
	let scorer = StubScorer::new().text("phone", 0.75);
	let engine = engine(scorer);
	let settings = RankingSettings { disambiguation_enabled: false, ..engine.settings() };

	engine.apply_settings(settings).expect("Settings rejected.");

	let outcome = engine
		.rank(RankRequest::new("apple pie", vec![item("phone", "Apple iPhone 16 Review")]))
		.await
		.expect("Ranking failed.");

	assert_eq!(tier_of(&outcome, "phone"), Tier(4));
}
