//! Tests for story assembly against the in-memory store.

use huntcraft_core::{GenerationLocation, Hunt, LocationStop, NewLocationStop};
use huntcraft_error::{HuntcraftError, Severity, StoryErrorKind};
use huntcraft_interface::{HuntRepository, StoryRepository};
use huntcraft_story::{AssemblyContext, AssemblyWarning, InMemoryHuntStore, StoryAssembler};
use serde_json::{Value, json};
use std::sync::Arc;

async fn create_test_hunt(store: &InMemoryHuntStore, stops: usize) -> (Hunt, Vec<LocationStop>) {
    let hunt = store
        .create_hunt(
            Hunt::builder()
                .title("Haunted Crawl")
                .theme(Some("haunted".to_string()))
                .tone(Some("spooky".to_string()))
                .build()
                .unwrap(),
        )
        .await
        .unwrap();

    let mut locations = Vec::new();
    for i in 0..stops {
        let stop = store
            .add_location(*hunt.id(), NewLocationStop::named(format!("Bar {}", i + 1)))
            .await
            .unwrap();
        locations.push(stop);
    }
    (hunt, locations)
}

fn context_for(hunt: &Hunt, stops: &[LocationStop]) -> AssemblyContext {
    AssemblyContext::builder()
        .hunt_id(*hunt.id())
        .locations(stops.iter().map(GenerationLocation::from).collect::<Vec<_>>())
        .theme(Some("haunted".to_string()))
        .tone(Some("spooky".to_string()))
        .build()
        .unwrap()
}

fn option_json(answer: &str) -> Value {
    json!({
        "storyText": format!("The trail leads to the {}.", answer),
        "riddleText": "What am I?",
        "riddleAnswer": answer,
        "hint1": "Look around.",
        "hint2": "Look closer.",
        "hint3": "Ask the bartender."
    })
}

fn template_for(count: usize) -> String {
    (1..=count)
        .map(|i| format!("{{{{BLANK_{}}}}}", i))
        .collect::<Vec<_>>()
        .join(" and ")
}

fn payload_for(stops: &[LocationStop], template: &str, prefix: &str) -> String {
    let locations: Vec<Value> = stops
        .iter()
        .map(|stop| {
            json!({
                "locationId": stop.id().to_string(),
                "locationName": stop.name(),
                "options": [
                    option_json(&format!("{} {} one", prefix, stop.name())),
                    option_json(&format!("{} {} two", prefix, stop.name())),
                    option_json(&format!("{} {} three", prefix, stop.name())),
                ]
            })
        })
        .collect();

    json!({
        "introScenes": ["Fog rolls in.", "A bell tolls.", "The door creaks."],
        "finalTemplate": template,
        "locations": locations,
    })
    .to_string()
}

fn story_kind(err: &HuntcraftError) -> &StoryErrorKind {
    &err.as_story().expect("expected a story error").kind
}

#[tokio::test]
async fn test_assemble_persists_story_and_options() {
    let store = Arc::new(InMemoryHuntStore::new());
    let (hunt, stops) = create_test_hunt(&store, 2).await;
    let assembler = StoryAssembler::new(Arc::clone(&store));

    let raw = format!(
        "Here is your story:\n```json\n{}\n```",
        payload_for(&stops, &template_for(2), "first")
    );
    let outcome = assembler
        .assemble(&context_for(&hunt, &stops), &raw)
        .await
        .unwrap();

    assert_eq!(outcome.options().len(), 6);
    assert!(outcome.warnings().is_empty());
    assert_eq!(outcome.story().intro_scenes()[1], "A bell tolls.");
    assert_eq!(outcome.story().theme().as_deref(), Some("haunted"));

    let stored = store.get_story(*hunt.id()).await.unwrap().unwrap();
    assert_eq!(stored.final_madlib_template(), &template_for(2));

    let ids: Vec<_> = stops.iter().map(|s| *s.id()).collect();
    let options = store.list_options(&ids).await.unwrap();
    assert_eq!(options.len(), 6);
    for (i, option) in options.iter().take(3).enumerate() {
        assert_eq!(*option.option_number(), i as i32 + 1);
        assert_eq!(option.location_stop_id(), stops[0].id());
        assert!(!option.is_selected());
    }
}

#[tokio::test]
async fn test_madlib_word_always_equals_answer() {
    let store = Arc::new(InMemoryHuntStore::new());
    let (hunt, stops) = create_test_hunt(&store, 1).await;
    let assembler = StoryAssembler::new(Arc::clone(&store));

    let raw = json!({
        "intro_scenes": ["a", "b", "c"],
        "final_madlib_template": "The ____ glows.",
        "locations": [{
            "location_id": stops[0].id().to_string(),
            "options": [{
                "story_text": "s", "riddle_text": "r", "riddle_answer": "lantern",
                "hint_1": "h1", "hint_2": "h2", "madlib_word": "candle"
            }]
        }]
    })
    .to_string();

    let outcome = assembler
        .assemble(&context_for(&hunt, &stops), &raw)
        .await
        .unwrap();

    for option in outcome.options() {
        assert_eq!(option.madlib_word(), option.riddle_answer());
    }
    assert_eq!(outcome.options()[0].madlib_word(), "lantern");
}

#[tokio::test]
async fn test_blank_count_mismatch_rejected() {
    let store = Arc::new(InMemoryHuntStore::new());
    let (hunt, stops) = create_test_hunt(&store, 3).await;
    let assembler = StoryAssembler::new(Arc::clone(&store));

    let raw = payload_for(&stops, &template_for(2), "x");
    let err = assembler
        .assemble(&context_for(&hunt, &stops), &raw)
        .await
        .unwrap_err();

    assert_eq!(
        story_kind(&err),
        &StoryErrorKind::BlankCountMismatch {
            expected: 3,
            found: 2
        }
    );
    assert!(store.get_story(*hunt.id()).await.unwrap().is_none());
    assert_eq!(store.option_count().await, 0);
}

#[tokio::test]
async fn test_unmapped_location_rejected_without_writes() {
    let store = Arc::new(InMemoryHuntStore::new());
    let (hunt, stops) = create_test_hunt(&store, 3).await;
    let assembler = StoryAssembler::new(Arc::clone(&store));

    let raw = payload_for(&stops[..2], &template_for(3), "x");
    let err = assembler
        .assemble(&context_for(&hunt, &stops), &raw)
        .await
        .unwrap_err();

    match story_kind(&err) {
        StoryErrorKind::UnmappedLocation {
            missing,
            unexpected,
        } => {
            assert_eq!(missing, &vec![stops[2].id().to_string()]);
            assert!(unexpected.is_empty());
        }
        other => panic!("Expected UnmappedLocation, got {:?}", other),
    }
    assert!(store.get_story(*hunt.id()).await.unwrap().is_none());
    assert_eq!(store.option_count().await, 0);
}

#[tokio::test]
async fn test_malformed_payloads_rejected() {
    let store = Arc::new(InMemoryHuntStore::new());
    let (hunt, stops) = create_test_hunt(&store, 1).await;
    let assembler = StoryAssembler::new(Arc::clone(&store));
    let context = context_for(&hunt, &stops);

    let two_scenes = json!({
        "introScenes": ["a", "b"],
        "finalTemplate": "{{BLANK_1}}",
        "locations": []
    })
    .to_string();
    let empty_answer = json!({
        "introScenes": ["a", "b", "c"],
        "finalTemplate": "{{BLANK_1}}",
        "locations": [{ "locationId": stops[0].id().to_string(), "options": [option_json("  ")] }]
    })
    .to_string();

    for raw in [
        "The model declined.",
        "{ not json",
        two_scenes.as_str(),
        empty_answer.as_str(),
    ] {
        let err = assembler.assemble(&context, raw).await.unwrap_err();
        assert!(
            matches!(story_kind(&err), StoryErrorKind::MalformedPayload(_)),
            "Expected MalformedPayload for {:?}, got {:?}",
            raw,
            err
        );
    }
    assert_eq!(store.option_count().await, 0);
}

#[tokio::test]
async fn test_undefined_blank_key_rejected() {
    let store = Arc::new(InMemoryHuntStore::new());
    let (hunt, stops) = create_test_hunt(&store, 1).await;
    let assembler = StoryAssembler::new(Arc::clone(&store));

    let mut option = option_json("lamp");
    option["blankKey"] = json!("BLANK_9");
    let raw = json!({
        "introScenes": ["a", "b", "c"],
        "finalTemplate": "The {{BLANK_1}}.",
        "blankDefinitions": [{ "key": "BLANK_1", "description": "an object" }],
        "locations": [{ "locationId": stops[0].id().to_string(), "options": [option] }]
    })
    .to_string();

    let err = assembler
        .assemble(&context_for(&hunt, &stops), &raw)
        .await
        .unwrap_err();
    assert!(matches!(story_kind(&err), StoryErrorKind::MalformedPayload(_)));
}

#[tokio::test]
async fn test_regeneration_replaces_options_and_reports_lost_selections() {
    let store = Arc::new(InMemoryHuntStore::new());
    let (hunt, stops) = create_test_hunt(&store, 2).await;
    let assembler = StoryAssembler::new(Arc::clone(&store));
    let context = context_for(&hunt, &stops);

    let first = assembler
        .assemble(&context, &payload_for(&stops, &template_for(2), "old"))
        .await
        .unwrap();
    for stop in &stops {
        store.select_option(*stop.id(), 2).await.unwrap();
    }

    let second = assembler
        .assemble(&context, &payload_for(&stops, &template_for(2), "new"))
        .await
        .unwrap();

    assert_eq!(second.story().id(), first.story().id());
    assert_eq!(second.discarded_selections().len(), 2);
    assert!(matches!(
        second.warnings().as_slice(),
        [AssemblyWarning::SelectionsDiscarded(ids)] if ids.len() == 2
    ));

    let ids: Vec<_> = stops.iter().map(|s| *s.id()).collect();
    let options = store.list_options(&ids).await.unwrap();
    let old_ids: Vec<_> = first.options().iter().map(|o| *o.id()).collect();
    assert_eq!(options.len(), 6);
    assert!(options.iter().all(|o| !old_ids.contains(o.id())));
    assert!(options.iter().all(|o| !o.is_selected()));
    assert!(options.iter().all(|o| o.riddle_answer().starts_with("new")));
}

#[tokio::test]
async fn test_failed_insert_rolls_back_everything() {
    let store = Arc::new(InMemoryHuntStore::new());
    let (hunt, stops) = create_test_hunt(&store, 2).await;
    let assembler = StoryAssembler::new(Arc::clone(&store));
    let context = context_for(&hunt, &stops);

    let first = assembler
        .assemble(&context, &payload_for(&stops, &template_for(2), "old"))
        .await
        .unwrap();
    store.select_option(*stops[0].id(), 1).await.unwrap();

    store.fail_inserts_after(Some(4)).await;
    let err = assembler
        .assemble(&context, &payload_for(&stops, &template_for(2), "new"))
        .await
        .unwrap_err();

    match story_kind(&err) {
        StoryErrorKind::PartialPersistenceFailure {
            location_id,
            option_number,
            rolled_back,
            ..
        } => {
            assert_eq!(location_id.as_deref(), Some(stops[1].id().to_string().as_str()));
            assert_eq!(*option_number, Some(2));
            assert!(*rolled_back);
        }
        other => panic!("Expected PartialPersistenceFailure, got {:?}", other),
    }
    assert_eq!(err.severity(), Severity::Error);

    let ids: Vec<_> = stops.iter().map(|s| *s.id()).collect();
    let options = store.list_options(&ids).await.unwrap();
    assert_eq!(options.len(), 6);
    assert!(options.iter().all(|o| o.riddle_answer().starts_with("old")));
    assert_eq!(options.iter().filter(|o| o.is_selected()).count(), 1);
    let story = store.get_story(*hunt.id()).await.unwrap().unwrap();
    assert_eq!(&story, first.story());
}
