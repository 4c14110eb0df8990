use ais_domain::feedback::Judgment;
use ais_providers::tag_match::TagMatch;
use ais_service::{CollectRequest, FeedbackSubmission};
use ais_testkit::{RecordingTrainer, StubScorer, StubTagMatch, item};

use super::engine_with;

fn found(id: &str, title: &str, score: f32) -> TagMatch {
	TagMatch { item: item(id, title), score, matched_tags: vec!["pie".to_string()] }
}

#[tokio::test]
async fn collects_best_matches_and_skips_blacklisted_titles() {
	let tag_match = StubTagMatch {
		matches: vec![
			found("a", "Pie crust tips", 0.4),
			found("b", "Cherry pie", 0.9),
			found("c", "Pie chart tutorial", 0.2),
			found("d", "Pie eating contest", 0.95),
			found("e", "Pumpkin pie", 0.4),
		],
	};
	let engine =
		engine_with(ais_testkit::test_config(), StubScorer::new(), tag_match, RecordingTrainer::default());

	engine
		.submit_feedback(FeedbackSubmission {
			query: "Pie".to_string(),
			item_id: "d".to_string(),
			title: "Pie eating contest".to_string(),
			description: None,
			judgment: Judgment::Wrong,
		})
		.expect("Feedback rejected.");

	let request = CollectRequest {
		tags: vec!["pie".to_string(), "  ".to_string()],
		videos: vec![item("a", "Pie crust tips")],
		min_score: 0.3,
	};
	let outcome = engine.collect_matches(request).await.expect("Collection failed.");
	let ids: Vec<&str> = outcome.matches.iter().map(|m| m.item.id.as_str()).collect();

	assert_eq!(ids, vec!["b", "a", "e"]);
}

#[tokio::test]
async fn empty_collection_request_skips_the_provider() {
	let tag_match = StubTagMatch { matches: vec![found("a", "Pie crust tips", 0.9)] };
	let engine =
		engine_with(ais_testkit::test_config(), StubScorer::new(), tag_match, RecordingTrainer::default());
	let request = CollectRequest { tags: Vec::new(), videos: vec![item("a", "Pie")], min_score: 0.0 };
	let outcome = engine.collect_matches(request).await.expect("Collection failed.");

	assert!(outcome.matches.is_empty());
}
