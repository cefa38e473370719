mod common;

use common::{init_logging, ScriptedLlm};
use geoprompt_core::classifier::RemoteIntentClassifier;
use geoprompt_core::history::HistoryManager;
use geoprompt_core::{ConversationContext, QueryProcessor};
use geoprompt_nlp::intent::{CONFIDENCE_CLEAR, CONFIDENCE_UNCLEAR};
use geoprompt_nlp::{ClarificationKind, IntentSource, IntentType, TravelMode, VisualizationType};
use std::sync::Arc;
use std::time::Duration;

const SILK_ROAD: &str = "Which ancient cities did the Silk Road connect, like Samarkand and Bukhara?";
const SILK_ROAD_REPLY: &str = r#"Here you go:
```json
{"intentType": "locations",
 "locations": [{"name": "Samarkand", "timeContext": ""}, {"name": "Bukhara", "timeContext": ""}],
 "visualizationType": "markers",
 "confidence": 0.9,
 "message": "Silk Road cities"}
```"#;

fn with_llm(llm: Arc<ScriptedLlm>, timeout: Duration) -> QueryProcessor {
    QueryProcessor::offline().with_classifier(RemoteIntentClassifier::new(llm, timeout))
}

#[tokio::test]
async fn test_complex_query_uses_remote_classifier() {
    init_logging();
    let llm = ScriptedLlm::replying(SILK_ROAD_REPLY);
    let processor = with_llm(llm.clone(), Duration::from_secs(2));

    let r = processor.process(SILK_ROAD).await;
    assert_eq!(llm.calls(), 1);
    assert_eq!(r.source, IntentSource::Remote);
    assert_eq!(r.location_names(), vec!["Samarkand", "Bukhara"]);
    assert_eq!(r.visualization_type, VisualizationType::Markers);
    assert!(!r.needs_clarification);
}

#[tokio::test]
async fn test_remote_timeout_matches_pattern_fallback() {
    init_logging();
    let llm = ScriptedLlm::slow(SILK_ROAD_REPLY, Duration::from_millis(500));
    let slow = with_llm(llm.clone(), Duration::from_millis(50));
    let offline = QueryProcessor::offline();

    let remote_attempted = slow.process(SILK_ROAD).await;
    let fallback = offline.process(SILK_ROAD).await;
    assert_eq!(llm.calls(), 1);
    assert_eq!(remote_attempted, fallback);
    assert_ne!(remote_attempted.source, IntentSource::Remote);
}

#[tokio::test]
async fn test_implausible_reply_falls_back() {
    init_logging();
    let echo = r#"{"intentType":"route","locations":[{"name":"Lyon"},{"name":"Geneva"}],"visualizationType":"route"}"#;
    let llm = ScriptedLlm::replying(echo);
    let processor = with_llm(llm.clone(), Duration::from_secs(2));

    let r = processor.process(SILK_ROAD).await;
    assert_eq!(llm.calls(), 1);
    assert_ne!(r.source, IntentSource::Remote);
    assert!(!r.location_names().contains(&"Geneva"));
}

#[tokio::test]
async fn test_simple_queries_never_reach_the_classifier() {
    let llm = ScriptedLlm::replying(SILK_ROAD_REPLY);
    let processor = with_llm(llm.clone(), Duration::from_secs(2));

    for query in ["Paris to Lyon", "Route from Paris to London", "Lyon", "hello there"] {
        let r = processor.process(query).await;
        assert!(!r.locations.is_empty(), "query: {:?}", query);
    }
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_unknown_text_gets_flagged_default() {
    let r = QueryProcessor::offline().process("hello there").await;
    assert_eq!(r.source, IntentSource::Default);
    assert_eq!(r.locations.len(), 3);
    assert!(!r.message.is_empty());
}

#[tokio::test]
async fn test_follow_ups_build_on_previous_turn() {
    let processor = QueryProcessor::offline();
    let mut ctx = ConversationContext::new();

    let first = processor
        .process_in_context("Route from Paris to Lyon", &mut ctx)
        .await;
    assert_eq!(first.location_names(), vec!["Paris", "Lyon"]);

    let second = processor.process_in_context("add Marseille", &mut ctx).await;
    assert_eq!(second.source, IntentSource::Context);
    assert_eq!(second.intent_type, IntentType::Route);
    assert_eq!(second.location_names(), vec!["Paris", "Lyon", "Marseille"]);

    let third = processor
        .process_in_context("same but by bike", &mut ctx)
        .await;
    assert_eq!(third.travel_mode, Some(TravelMode::Cycling));
    assert_eq!(third.location_names(), vec!["Paris", "Lyon", "Marseille"]);
    assert_eq!(ctx.turn_count, 3);

    ctx.reset();
    let fresh = processor.process_in_context("add Marseille", &mut ctx).await;
    assert_ne!(fresh.source, IntentSource::Context);
    assert_eq!(fresh.location_names(), vec!["Marseille"]);
}

#[tokio::test]
async fn test_follow_ups_are_clarified_like_fresh_queries() {
    let processor = QueryProcessor::offline();

    let mut ctx = ConversationContext::new();
    let first = processor
        .process_in_context("Route from Seattle to Boise", &mut ctx)
        .await;
    assert!(!first.needs_clarification);
    let added = processor.process_in_context("add Portland", &mut ctx).await;
    assert_eq!(added.location_names(), vec!["Seattle", "Boise", "Portland"]);
    assert!(added.needs_clarification);
    assert_eq!(added.confidence, CONFIDENCE_UNCLEAR);
    assert_eq!(
        added.clarification.expect("clarification attached").kind,
        ClarificationKind::Location
    );

    let mut ctx = ConversationContext::new();
    let flagged = processor
        .process_in_context("Route from Portland to Boise", &mut ctx)
        .await;
    assert!(flagged.needs_clarification);
    let by_bike = processor
        .process_in_context("same but by bike", &mut ctx)
        .await;
    assert_eq!(by_bike.travel_mode, Some(TravelMode::Cycling));
    assert!(by_bike.needs_clarification);
    assert_eq!(by_bike.confidence, CONFIDENCE_UNCLEAR);

    // A "show me" list never asks, and neither do its follow-ups.
    let mut ctx = ConversationContext::new();
    processor
        .process_in_context("show me Portland, Springfield and York", &mut ctx)
        .await;
    let extended = processor.process_in_context("add Lyon", &mut ctx).await;
    assert_eq!(extended.locations.len(), 4);
    assert!(!extended.needs_clarification);
    assert_eq!(extended.confidence, CONFIDENCE_CLEAR);
}

#[tokio::test]
async fn test_follow_up_after_default_starts_fresh() {
    let processor = QueryProcessor::offline();
    let mut ctx = ConversationContext::new();

    let fallback = processor.process_in_context("hello there", &mut ctx).await;
    assert_eq!(fallback.source, IntentSource::Default);

    let r = processor.process_in_context("add Lyon", &mut ctx).await;
    assert_ne!(r.source, IntentSource::Context);
    assert_eq!(r.location_names(), vec!["Lyon"]);
}

#[tokio::test]
async fn test_processed_queries_are_remembered() {
    let dir = tempfile::tempdir().unwrap();
    let history = HistoryManager::at_path(dir.path().join("search_history.json"));
    let processor = QueryProcessor::offline().with_history(history.clone());

    processor.process("Paris to Lyon").await;
    processor.process("Paris to Lyon").await;
    processor.process("show me Rome").await;
    assert_eq!(
        history.load().unwrap(),
        vec!["show me Rome".to_string(), "Paris to Lyon".to_string()]
    );
}
