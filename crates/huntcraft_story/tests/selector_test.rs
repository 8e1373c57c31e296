//! Tests for option selection and the end-to-end mad-lib flow.

use huntcraft_core::{GenerationLocation, Hunt, HuntId, LocationStop, NewLocationStop};
use huntcraft_error::StoryErrorKind;
use huntcraft_interface::{HuntRepository, StoryRepository};
use huntcraft_story::{
    AssemblyContext, InMemoryHuntStore, OptionSelector, RenderStyle, StoryAssembler, StoryBoard,
    render, words_for,
};
use serde_json::json;
use std::sync::Arc;

async fn create_story(store: &Arc<InMemoryHuntStore>, template: &str, stops: usize) -> (HuntId, Vec<LocationStop>) {
    let hunt = store
        .create_hunt(Hunt::builder().title("Treasure Trail").build().unwrap())
        .await
        .unwrap();

    let mut locations = Vec::new();
    for i in 0..stops {
        locations.push(
            store
                .add_location(*hunt.id(), NewLocationStop::named(format!("L{}", i + 1)))
                .await
                .unwrap(),
        );
    }

    let answers = ["silver coin", "brass key", "old map"];
    let payload = json!({
        "introScenes": ["one", "two", "three"],
        "finalTemplate": template,
        "locations": locations.iter().map(|l| json!({
            "locationId": l.id().to_string(),
            "options": answers.iter().map(|a| json!({
                "storyText": "s", "riddleText": "r", "riddleAnswer": a,
                "hint1": "h1", "hint2": "h2"
            })).collect::<Vec<_>>()
        })).collect::<Vec<_>>()
    })
    .to_string();

    let context = AssemblyContext::builder()
        .hunt_id(*hunt.id())
        .locations(locations.iter().map(GenerationLocation::from).collect::<Vec<_>>())
        .build()
        .unwrap();
    StoryAssembler::new(Arc::clone(store))
        .assemble(&context, &payload)
        .await
        .unwrap();

    (*hunt.id(), locations)
}

fn selector(store: &Arc<InMemoryHuntStore>) -> OptionSelector<InMemoryHuntStore, InMemoryHuntStore> {
    OptionSelector::new(Arc::clone(store), Arc::clone(store))
}

async fn selected_count(store: &InMemoryHuntStore, location: &LocationStop) -> usize {
    store
        .list_options(&[*location.id()])
        .await
        .unwrap()
        .iter()
        .filter(|o| o.is_selected())
        .count()
}

#[tokio::test]
async fn test_at_most_one_selection_per_location() {
    let store = Arc::new(InMemoryHuntStore::new());
    let (_, stops) = create_story(&store, "{{A}} {{B}}", 2).await;
    let selector = selector(&store);

    for number in [1, 3, 2, 2, 1, 3] {
        selector.select_option(*stops[0].id(), number).await.unwrap();
        assert_eq!(selected_count(&store, &stops[0]).await, 1);
        assert_eq!(selected_count(&store, &stops[1]).await, 0);
    }

    let options = store.list_options(&[*stops[0].id()]).await.unwrap();
    let selected: Vec<i32> = options
        .iter()
        .filter(|o| o.is_selected())
        .map(|o| *o.option_number())
        .collect();
    assert_eq!(selected, vec![3]);
}

#[tokio::test]
async fn test_reselecting_is_idempotent() {
    let store = Arc::new(InMemoryHuntStore::new());
    let (_, stops) = create_story(&store, "{{A}}", 1).await;
    let selector = selector(&store);

    let first = selector.select_option(*stops[0].id(), 2).await.unwrap();
    let after_once = store.list_options(&[*stops[0].id()]).await.unwrap();
    let second = selector.select_option(*stops[0].id(), 2).await.unwrap();
    let after_twice = store.list_options(&[*stops[0].id()]).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(after_once, after_twice);
}

#[tokio::test]
async fn test_unknown_option_changes_nothing() {
    let store = Arc::new(InMemoryHuntStore::new());
    let (_, stops) = create_story(&store, "{{A}}", 1).await;
    let selector = selector(&store);

    selector.select_option(*stops[0].id(), 1).await.unwrap();
    let before = store.list_options(&[*stops[0].id()]).await.unwrap();

    for number in [0, 4, 7] {
        let err = selector
            .select_option(*stops[0].id(), number)
            .await
            .unwrap_err();
        assert!(matches!(
            &err.as_story().unwrap().kind,
            StoryErrorKind::UnknownOption { option_number, .. } if *option_number == number
        ));
    }

    assert_eq!(store.list_options(&[*stops[0].id()]).await.unwrap(), before);
}

#[tokio::test]
async fn test_unknown_option_with_fewer_generated() {
    let store = Arc::new(InMemoryHuntStore::new());
    let hunt = store
        .create_hunt(Hunt::builder().title("Short").build().unwrap())
        .await
        .unwrap();
    let stop = store
        .add_location(*hunt.id(), NewLocationStop::named("Only"))
        .await
        .unwrap();

    // No story yet: every option number is unknown
    let err = selector(&store)
        .select_option(*stop.id(), 1)
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_story().unwrap().kind,
        StoryErrorKind::UnknownOption { .. }
    ));
}

#[tokio::test]
async fn test_clear_selection() {
    let store = Arc::new(InMemoryHuntStore::new());
    let (_, stops) = create_story(&store, "{{A}}", 1).await;
    let selector = selector(&store);

    selector.select_option(*stops[0].id(), 3).await.unwrap();
    selector.clear_selection(*stops[0].id()).await.unwrap();
    assert_eq!(selected_count(&store, &stops[0]).await, 0);
}

#[tokio::test]
async fn test_end_to_end_partial_render() {
    let store = Arc::new(InMemoryHuntStore::new());
    let template = "The {{BLANK_1}} was hidden near the {{BLANK_2}}.";
    let (hunt_id, stops) = create_story(&store, template, 2).await;
    let selector = selector(&store);

    let chosen = selector.select_option(*stops[0].id(), 2).await.unwrap();
    assert_eq!(chosen.madlib_word(), "brass key");

    let selections = selector.selections(hunt_id).await.unwrap();
    assert_eq!(selections.len(), 2);
    assert!(selections[1].selected().is_none());

    let words = words_for(&selections);
    assert_eq!(words, vec!["brass key"]);
    let rendered = render(template, &words);
    assert_eq!(
        rendered.text(),
        "The brass key was hidden near the {{BLANK_2}}."
    );

    let board = StoryBoard::load(store.as_ref(), store.as_ref(), hunt_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(board.selected_count(), 1);
    assert_eq!(
        board.render(RenderStyle::default()).text(),
        "The brass key was hidden near the {{BLANK_2}}."
    );
    assert_eq!(
        store.get_story(hunt_id).await.unwrap().unwrap().final_madlib_template(),
        template
    );
}

#[tokio::test]
async fn test_rendering_is_pure() {
    let store = Arc::new(InMemoryHuntStore::new());
    let template = "{{X}} met {{Y}} at the {{Z}}.";
    let (hunt_id, stops) = create_story(&store, template, 3).await;
    let selector = selector(&store);
    selector.select_option(*stops[0].id(), 1).await.unwrap();
    selector.select_option(*stops[2].id(), 3).await.unwrap();

    let board = StoryBoard::load(store.as_ref(), store.as_ref(), hunt_id)
        .await
        .unwrap()
        .unwrap();
    let before = store.list_options(&stops.iter().map(|s| *s.id()).collect::<Vec<_>>()).await.unwrap();

    let first = board.render(RenderStyle::host_preview());
    let second = board.render(RenderStyle::host_preview());
    assert_eq!(first, second);
    assert_eq!(first.text(), "**silver coin** met **old map** at the [____].");

    let after = store.list_options(&stops.iter().map(|s| *s.id()).collect::<Vec<_>>()).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_board_without_story() {
    let store = Arc::new(InMemoryHuntStore::new());
    let hunt = store
        .create_hunt(Hunt::builder().title("Empty").build().unwrap())
        .await
        .unwrap();
    let board = StoryBoard::load(store.as_ref(), store.as_ref(), *hunt.id())
        .await
        .unwrap();
    assert!(board.is_none());
}
