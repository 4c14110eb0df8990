use ais_domain::{
	feedback::{FeedbackEntry, Judgment},
	item::{RejectReason, Tier},
};
use ais_service::{FeedbackSubmission, RankRequest};
use ais_testkit::{RecordingTrainer, StubScorer, StubTagMatch, item};

use super::{engine, engine_with, tier_of};

fn submission(query: &str, title: &str, judgment: Judgment) -> FeedbackSubmission {
	FeedbackSubmission {
		query: query.to_string(),
		item_id: title.to_lowercase().replace(' ', "-"),
		title: title.to_string(),
		description: None,
		judgment,
	}
}

#[tokio::test]
async fn wrong_judgment_blacklists_title_for_that_query() {
	let scorer = StubScorer::new().text("lazy", 0.95).text("proper", 0.6);
	let engine = engine(scorer.clone());
	let request = RankRequest::new(
		"lazy pie",
		vec![item("lazy", "Apple pie, the lazy way!"), item("proper", "Lazy pie done properly")],
	);
	let before = engine.rank(request.clone()).await.expect("Ranking failed.");

	assert_eq!(tier_of(&before, "lazy"), Tier(5));

	engine
		.submit_feedback(submission("Lazy Pie", "Apple Pie - The LAZY Way", Judgment::Wrong))
		.expect("Feedback rejected.");

	let after = engine.rank(request).await.expect("Ranking failed.");

	assert!(!after.cache_hit);
	assert_eq!(scorer.calls(), 2);
	assert_eq!(tier_of(&after, "lazy"), Tier::REJECTED);
	assert_eq!(after.items[0].item_id, "proper");
	assert_eq!(after.items[1].decision.reason, Some(RejectReason::Blacklisted));
	assert_eq!(engine.blacklist_for("lazy pie"), vec!["apple pie the lazy way".to_string()]);
	assert!(engine.blacklist_for("apple").is_empty());
}

#[tokio::test]
async fn twentieth_append_triggers_training() {
	let trainer = RecordingTrainer::with_keywords(&[("unboxing", -0.8)]);
	let engine = engine_with(
		ais_testkit::test_config(),
		StubScorer::new().text("a", 0.6),
		StubTagMatch::default(),
		trainer.clone(),
	);

	for i in 0..19 {
		let judgment = if i % 2 == 0 { Judgment::Helpful } else { Judgment::Wrong };
		let receipt = engine
			.submit_feedback(submission("garden", &format!("Garden video {i}"), judgment))
			.expect("Feedback rejected.");

		assert!(!receipt.training_triggered);
	}

	let receipt = engine
		.submit_feedback(submission("garden", "Garden unboxing", Judgment::Wrong))
		.expect("Feedback rejected.");

	assert_eq!(receipt.total, 20);
	assert_eq!(receipt.qualifying, 20);
	assert!(receipt.training_triggered);

	receipt.training.expect("Training was not started.").await.expect("Training task panicked.");

	let requests = trainer.requests();

	assert_eq!(requests.len(), 1);
	assert_eq!(requests[0].feedback_data.len(), 20);
	assert_eq!(engine.classifier().weight("unboxing"), Some(-0.8));

	let outcome = engine
		.rank(RankRequest::new("garden", vec![item("a", "Garden unboxing day")]))
		.await
		.expect("Ranking failed.");
	let scored = outcome.items[0].scored.as_ref().expect("Item was not scored.");

	assert!((scored.adjustment + 0.08).abs() < 1e-5);
	assert!((scored.final_score - 0.52).abs() < 1e-5);
}

#[tokio::test]
async fn training_needs_enough_qualifying_entries() {
	let trainer = RecordingTrainer::with_keywords(&[("unboxing", -0.8)]);
	let engine = engine_with(
		ais_testkit::test_config(),
		StubScorer::new(),
		StubTagMatch::default(),
		trainer.clone(),
	);
	let mut last = None;

	for i in 0..20 {
		let judgment = if i < 5 { Judgment::Helpful } else { Judgment::Clicked };

		last = Some(
			engine
				.submit_feedback(submission("garden", &format!("Garden video {i}"), judgment))
				.expect("Feedback rejected."),
		);
	}

	let last = last.expect("No feedback submitted.");

	assert_eq!(last.qualifying, 5);
	assert!(!last.training_triggered);
	assert!(trainer.requests().is_empty());
	assert!(engine.classifier().is_empty());
}

#[tokio::test]
async fn judged_titles_are_sent_to_the_scorer() {
	let scorer = StubScorer::new().text("a", 0.6);
	let engine = engine(scorer.clone());

	engine
		.submit_feedback(submission("apple pie", "Grandma pie", Judgment::Helpful))
		.expect("Feedback rejected.");
	engine
		.submit_feedback(submission("APPLE PIE", "iPhone teardown", Judgment::Wrong))
		.expect("Feedback rejected.");
	engine
		.submit_feedback(submission("cherry", "Festival recap", Judgment::Wrong))
		.expect("Feedback rejected.");
	engine
		.rank(RankRequest::new("Apple Pie", vec![item("a", "Apple pie")]))
		.await
		.expect("Ranking failed.");

	let request = scorer.last_request().expect("Scorer was not called.");

	assert_eq!(request.feedback.positive, vec!["Grandma pie".to_string()]);
	assert_eq!(request.feedback.negative, vec!["iPhone teardown".to_string()]);
}

#[test]
fn feedback_requires_query_and_item() {
	let engine = engine(StubScorer::new());
	let mut blank = submission("  ", "Title", Judgment::Wrong);

	assert!(engine.submit_feedback(blank.clone()).is_err());

	blank.query = "garden".to_string();
	blank.item_id = String::new();

	assert!(engine.submit_feedback(blank).is_err());
	assert!(engine.feedback_entries().is_empty());
}

#[test]
fn restored_log_rebuilds_blacklist() {
	let engine = engine(StubScorer::new());
	let entries = vec![
		FeedbackEntry {
			query: "orange".to_string(),
			item_id: "1".to_string(),
			title: "Orange County tour".to_string(),
			description: None,
			judgment: Judgment::Wrong,
			timestamp: 10,
		},
		FeedbackEntry {
			query: "orange".to_string(),
			item_id: "2".to_string(),
			title: "Orange juice".to_string(),
			description: Some("Fresh".to_string()),
			judgment: Judgment::Helpful,
			timestamp: 5,
		},
	];

	engine.restore_feedback(entries);

	let restored = engine.feedback_entries();

	assert_eq!(restored.len(), 2);
	assert_eq!(restored[1].timestamp, 10);
	assert_eq!(engine.blacklist_for("Orange"), vec!["orange county tour".to_string()]);
}

#[tokio::test]
async fn training_cadence_follows_restored_log_length() {
	let trainer = RecordingTrainer::default();
	let engine = engine_with(
		ais_testkit::test_config(),
		StubScorer::new(),
		StubTagMatch::default(),
		trainer.clone(),
	);
	let entries = (0..15)
		.map(|i| FeedbackEntry {
			query: "garden".to_string(),
			item_id: format!("restored-{i}"),
			title: format!("Garden restored {i}"),
			description: None,
			judgment: Judgment::Helpful,
			timestamp: i,
		})
		.collect();

	engine.restore_feedback(entries);

	for i in 0..4 {
		let receipt = engine
			.submit_feedback(submission("garden", &format!("Garden fresh {i}"), Judgment::Wrong))
			.expect("Feedback rejected.");

		assert!(!receipt.training_triggered);
	}

	let receipt = engine
		.submit_feedback(submission("garden", "Garden fresh last", Judgment::Wrong))
		.expect("Feedback rejected.");

	assert_eq!(receipt.total, 20);
	assert_eq!(receipt.qualifying, 20);
	assert!(receipt.training_triggered);

	receipt.training.expect("Training was not started.").await.expect("Training task panicked.");

	assert_eq!(trainer.requests()[0].feedback_data.len(), 20);
}
