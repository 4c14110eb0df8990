use std::sync::Arc;

use ais_domain::{feedback::Judgment, item::RejectReason};
use ais_service::{FeedbackSubmission, RankRequest, RankStatus};
use ais_testkit::{GatedScorer, StubScorer, item};

use super::{engine, ids};

#[tokio::test]
async fn superseded_result_is_discarded_but_cached() {
	let (scorer, mut gate) = GatedScorer::new(StubScorer::new().text("a", 0.7).text("b", 0.6));
	let engine = Arc::new(engine(scorer));
	let older = RankRequest::new("pumpkin soup", vec![item("a", "Pumpkin soup")]).on_surface("grid");
	let newer = RankRequest::new(
		"pumpkin soup",
		vec![item("a", "Pumpkin soup"), item("b", "Pumpkin soup again")],
	)
	.on_surface("grid");
	let first = tokio::spawn({
		let engine = engine.clone();

		async move { engine.rank(older).await }
	});

	gate.entered().await.expect("Scorer was never called.");

	let second = tokio::spawn({
		let engine = engine.clone();

		async move { engine.rank(newer).await }
	});

	gate.entered().await.expect("Scorer was never called.");
	gate.release(2);

	let first = first.await.expect("Task panicked.").expect("Ranking failed.");
	let second = second.await.expect("Task panicked.").expect("Ranking failed.");

	assert_eq!(first.status, RankStatus::Stale);
	assert!(first.items.is_empty());
	assert_eq!(second.status, RankStatus::Ranked);
	assert_eq!(ids(&second), vec!["a", "b"]);
	assert_eq!(engine.cached_entries(), 2);
}

#[tokio::test]
async fn other_surfaces_are_not_affected() {
	let (scorer, mut gate) = GatedScorer::new(StubScorer::new().text("a", 0.7).text("b", 0.6));
	let engine = Arc::new(engine(scorer));
	let grid = RankRequest::new("pumpkin soup", vec![item("a", "Pumpkin soup")]).on_surface("grid");
	let sidebar =
		RankRequest::new("pumpkin soup", vec![item("b", "Pumpkin soup again")]).on_surface("sidebar");
	let first = tokio::spawn({
		let engine = engine.clone();

		async move { engine.rank(grid).await }
	});

	gate.entered().await.expect("Scorer was never called.");

	let second = tokio::spawn({
		let engine = engine.clone();

		async move { engine.rank(sidebar).await }
	});

	gate.entered().await.expect("Scorer was never called.");
	gate.release(2);

	let first = first.await.expect("Task panicked.").expect("Ranking failed.");
	let second = second.await.expect("Task panicked.").expect("Ranking failed.");

	assert_eq!(first.status, RankStatus::Ranked);
	assert_eq!(second.status, RankStatus::Ranked);
}

#[tokio::test]
async fn feedback_during_scoring_keeps_result_out_of_cache() {
	let scorer = StubScorer::new().text("x", 0.9).text("y", 0.7);
	let (gated, mut gate) = GatedScorer::new(scorer.clone());
	let engine = Arc::new(engine(gated));
	let request = RankRequest::new(
		"pumpkin soup",
		vec![item("x", "Pumpkin soup X"), item("y", "Pumpkin soup Y")],
	);
	let in_flight = tokio::spawn({
		let engine = engine.clone();
		let request = request.clone();

		async move { engine.rank(request).await }
	});

	gate.entered().await.expect("Scorer was never called.");

	engine
		.submit_feedback(FeedbackSubmission {
			query: "pumpkin soup".to_string(),
			item_id: "x".to_string(),
			title: "Pumpkin soup X".to_string(),
			description: None,
			judgment: Judgment::Wrong,
		})
		.expect("Feedback rejected.");
	gate.release(2);

	let first = in_flight.await.expect("Task panicked.").expect("Ranking failed.");

	assert_eq!(first.status, RankStatus::Ranked);
	assert_eq!(engine.cached_entries(), 0);

	let next = engine.rank(request).await.expect("Ranking failed.");

	assert!(!next.cache_hit);
	assert_eq!(scorer.calls(), 2);
	assert_eq!(next.passing().map(|item| item.item_id.as_str()).collect::<Vec<_>>(), vec!["y"]);
	assert_eq!(next.items[1].decision.reason, Some(RejectReason::Blacklisted));
	assert_eq!(engine.cached_entries(), 1);
}
