use ais_domain::item::{RejectReason, Tier};
use ais_service::{Error, RankRequest, RankStatus};
use ais_testkit::{FailingScorer, StubScorer, item};

use super::{engine, final_score_of, ids, tier_of};

#[tokio::test]
async fn fruit_query_rejects_brand_sense() {
	let scorer = StubScorer::new().text("phone", 0.75).text("pie", 0.8);
	let engine = engine(scorer);
	let request = RankRequest::new(
		"apple pie",
		vec![item("phone", "Apple iPhone 16 Review"), item("pie", "Best Apple Pie Recipe")],
	);
	let outcome = engine.rank(request).await.expect("Ranking failed.");

	assert_eq!(outcome.status, RankStatus::Ranked);
	assert_eq!(ids(&outcome), vec!["pie", "phone"]);
	assert_eq!(tier_of(&outcome, "pie"), Tier(5));
	assert_eq!(tier_of(&outcome, "phone"), Tier::REJECTED);
	assert_eq!(outcome.items[1].decision.reason, Some(RejectReason::AmbiguousSense));
	assert_eq!(outcome.dropped.get("ambiguous_sense"), Some(&1));
	assert!(outcome.reordered);
}

#[tokio::test]
async fn image_signal_lifts_items_into_visual_tiers() {
	let scorer = StubScorer::new()
		.text("text-only", 0.5)
		.text_and_image("top", 0.5, 0.7)
		.text_and_image("strong", 0.6, 0.5);
	let engine = engine(scorer);
	let request = RankRequest::new(
		"garden tools",
		vec![
			item("text-only", "Garden tools for beginners"),
			item("strong", "Garden tools compared"),
			item("top", "Garden tools guide"),
		],
	);
	let outcome = engine.rank(request).await.expect("Ranking failed.");

	assert_eq!(ids(&outcome), vec!["top", "strong", "text-only"]);
	assert_eq!(tier_of(&outcome, "top"), Tier::TOP_IMAGE);
	assert_eq!(tier_of(&outcome, "strong"), Tier::STRONG_IMAGE);
	assert_eq!(tier_of(&outcome, "text-only"), Tier(4));
	assert!((final_score_of(&outcome, "top") - 0.58).abs() < 1e-5);
	assert_eq!(final_score_of(&outcome, "text-only"), 0.5);
}

#[tokio::test]
async fn equal_tier_and_score_keep_input_order() {
	let scorer = StubScorer::new().text("x", 0.6).text("y", 0.6).text("z", 0.6);
	let engine = engine(scorer);
	let forward = RankRequest::new(
		"garden hose",
		vec![item("x", "Garden hose x"), item("y", "Garden hose y"), item("z", "Garden hose z")],
	);
	let backward = RankRequest::new(
		"garden hose",
		vec![item("z", "Garden hose z"), item("y", "Garden hose y"), item("x", "Garden hose x")],
	);

	assert_eq!(ids(&engine.rank(forward).await.expect("Ranking failed.")), vec!["x", "y", "z"]);
	assert_eq!(ids(&engine.rank(backward).await.expect("Ranking failed.")), vec!["z", "y", "x"]);
}

#[tokio::test]
async fn repeated_request_is_served_from_cache_without_reorder() {
	let scorer = StubScorer::new().text("a", 0.4).text("b", 0.9);
	let engine = engine(scorer.clone());
	let request = RankRequest::new(
		"pumpkin soup",
		vec![item("a", "Pumpkin soup basics"), item("b", "Creamy pumpkin soup")],
	);
	let first = engine.rank(request.clone()).await.expect("Ranking failed.");
	let second = engine.rank(request).await.expect("Ranking failed.");

	assert!(!first.cache_hit);
	assert!(second.cache_hit);
	assert_eq!(first.signature, second.signature);
	assert_eq!(first.items, second.items);
	assert!(first.reordered);
	assert!(!second.reordered);
	assert_eq!(scorer.calls(), 1);
}

#[tokio::test]
async fn recomputed_ranking_matches_previous_signature() {
	let scorer = StubScorer::new().text("a", 0.4).text("b", 0.9).text("c", 0.75);
	let engine = engine(scorer.clone());
	let request = RankRequest::new(
		"apple pie",
		vec![
			item("a", "Apple pie basics"),
			item("b", "Apple iPhone 16 Review"),
			item("c", "Best apple pie recipe"),
		],
	);
	let first = engine.rank(request.clone()).await.expect("Ranking failed.");

	engine.apply_settings(engine.settings()).expect("Settings rejected.");

	assert_eq!(engine.cached_entries(), 0);

	let second = engine.rank(request).await.expect("Ranking failed.");

	assert!(!first.cache_hit);
	assert!(!second.cache_hit);
	assert_eq!(scorer.calls(), 2);
	assert_eq!(first.signature, second.signature);
	assert_eq!(first.items, second.items);
	assert!(!second.reordered);
}

#[tokio::test]
async fn unscored_items_sink_to_tier_zero() {
	let scorer = StubScorer::new().text("scored", 0.3);
	let engine = engine(scorer);
	let request = RankRequest::new(
		"pumpkin soup",
		vec![item("missing", "Pumpkin soup"), item("scored", "Pumpkin soup at home")],
	);
	let outcome = engine.rank(request).await.expect("Ranking failed.");

	assert_eq!(ids(&outcome), vec!["scored", "missing"]);
	assert_eq!(tier_of(&outcome, "missing"), Tier::NO_SCORE);
	assert!(outcome.items[1].scored.is_none());
	assert!(!outcome.items[1].decision.passes);
}

#[tokio::test]
async fn missing_query_or_items_is_a_no_op() {
	let scorer = StubScorer::new().text("a", 0.9);
	let engine = engine(scorer.clone());
	let blank = engine
		.rank(RankRequest::new("   ", vec![item("a", "Anything")]))
		.await
		.expect("Ranking failed.");
	let empty = engine.rank(RankRequest::new("apple", Vec::new())).await.expect("Ranking failed.");

	assert_eq!(blank.status, RankStatus::Skipped);
	assert_eq!(empty.status, RankStatus::Skipped);
	assert!(blank.items.is_empty());
	assert_eq!(scorer.calls(), 0);
}

#[tokio::test]
async fn duplicate_ids_keep_the_first_candidate() {
	let scorer = StubScorer::new().text("a", 0.6);
	let engine = engine(scorer);
	let request = RankRequest::new(
		"pumpkin soup",
		vec![item("a", "Pumpkin soup"), item("a", "Something else entirely")],
	);
	let outcome = engine.rank(request).await.expect("Ranking failed.");

	assert_eq!(outcome.items.len(), 1);
	assert_eq!(
		outcome.items[0].scored.as_ref().map(|scored| scored.item.title.as_str()),
		Some("Pumpkin soup")
	);
}

#[tokio::test]
async fn scorer_failure_surfaces_as_unavailable() {
	let engine = engine(FailingScorer { status: 503 });
	let result = engine.rank(RankRequest::new("apple pie", vec![item("a", "Apple pie")])).await;

	match result {
		Err(Error::ScorerUnavailable { status, .. }) => assert_eq!(status, Some(503)),
		other => panic!("Expected ScorerUnavailable, got {other:?}."),
	}

	assert_eq!(engine.cached_entries(), 0);
}

#[tokio::test]
async fn temporal_queries_prefer_fresh_items() {
	let scorer = StubScorer::new().text("old", 0.5).text("fresh", 0.5);
	let engine = engine(scorer);
	let mut old = item("old", "Garden tools classic");
	let mut fresh = item("fresh", "Garden tools review");

	old.metadata = "12K views 3 years ago".to_string();
	fresh.metadata = "800 views 2 days ago".to_string();

	let plain = engine
		.rank(RankRequest::new("garden tools", vec![old.clone(), fresh.clone()]))
		.await
		.expect("Ranking failed.");
	let latest = engine
		.rank(RankRequest::new("latest garden tools", vec![old, fresh]))
		.await
		.expect("Ranking failed.");

	assert_eq!(ids(&plain), vec!["old", "fresh"]);
	assert_eq!(ids(&latest), vec!["fresh", "old"]);
	assert!(final_score_of(&latest, "fresh") > 0.59);
	assert!(final_score_of(&latest, "old") < 0.501);
}
