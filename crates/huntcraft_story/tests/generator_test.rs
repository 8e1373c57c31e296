//! Tests for the generation flow with a scripted gateway.

use async_trait::async_trait;
use huntcraft_core::{AgeRating, GenerationRequest, Hunt, HuntId, NewLocationStop};
use huntcraft_error::{GatewayError, GatewayErrorKind, StoryErrorKind};
use huntcraft_interface::{HuntRepository, StoryGateway, StoryRepository};
use huntcraft_story::{GenerationSettings, InMemoryHuntStore, StoryGenerator};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Gateway that answers from a script and records every request.
struct ScriptedGateway {
    reply: Box<dyn Fn(&GenerationRequest) -> Result<String, GatewayError> + Send + Sync>,
    calls: AtomicUsize,
    last_request: Mutex<Option<GenerationRequest>>,
}

impl ScriptedGateway {
    fn new(
        reply: impl Fn(&GenerationRequest) -> Result<String, GatewayError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            reply: Box::new(reply),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoryGateway for ScriptedGateway {
    async fn generate_story(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        (self.reply)(request)
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}

/// Answers with a well-formed story for whatever locations were requested.
fn well_formed(request: &GenerationRequest) -> Result<String, GatewayError> {
    let template = request
        .locations()
        .iter()
        .enumerate()
        .map(|(i, _)| format!("{{{{BLANK_{}}}}}", i + 1))
        .collect::<Vec<_>>()
        .join(", then ");
    let locations: Vec<_> = request
        .locations()
        .iter()
        .map(|l| {
            let options: Vec<_> = (1..=3)
                .map(|n| {
                    json!({
                        "storyText": format!("At {} things happen.", l.name()),
                        "riddleText": "Riddle?",
                        "riddleAnswer": format!("{} answer {}", l.name(), n),
                        "hint1": "one",
                        "hint2": "two"
                    })
                })
                .collect();
            json!({
                "locationId": l.id().to_string(),
                "locationName": l.name(),
                "options": options
            })
        })
        .collect();
    let body = json!({
        "introScenes": ["Once", "upon", "a time"],
        "finalTemplate": template,
        "locations": locations
    });
    Ok(format!("```json\n{}\n```", body))
}

async fn create_hunt(store: &InMemoryHuntStore, stops: &[&str]) -> HuntId {
    let hunt = store
        .create_hunt(
            Hunt::builder()
                .title("Christmas Heist")
                .theme(Some("heist".to_string()))
                .tone(Some("festive".to_string()))
                .build()
                .unwrap(),
        )
        .await
        .unwrap();
    for name in stops {
        store
            .add_location(*hunt.id(), NewLocationStop::named(*name))
            .await
            .unwrap();
    }
    *hunt.id()
}

#[tokio::test]
async fn test_generate_end_to_end() {
    let store = Arc::new(InMemoryHuntStore::new());
    let gateway = Arc::new(ScriptedGateway::new(well_formed));
    let hunt_id = create_hunt(&store, &["The Anchor", "Red Lion", "Crown"]).await;
    let generator = StoryGenerator::new(Arc::clone(&store), Arc::clone(&store), Arc::clone(&gateway));

    let settings = GenerationSettings::builder()
        .age_rating(AgeRating::R)
        .custom_notes("Mention snow")
        .build()
        .unwrap();
    let outcome = generator.generate(hunt_id, &settings).await.unwrap();

    assert_eq!(gateway.calls(), 1);
    assert_eq!(outcome.options().len(), 9);
    assert!(!outcome.discarded_any());

    let request = gateway.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(request.theme(), "heist");
    assert_eq!(request.tone(), "festive");
    assert_eq!(*request.age_rating(), AgeRating::R);
    assert_eq!(request.custom_notes().as_deref(), Some("Mention snow"));
    let names: Vec<&str> = request.locations().iter().map(|l| l.name().as_str()).collect();
    assert_eq!(names, vec!["The Anchor", "Red Lion", "Crown"]);

    assert!(store.get_story(hunt_id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_no_locations_skips_gateway() {
    let store = Arc::new(InMemoryHuntStore::new());
    let gateway = Arc::new(ScriptedGateway::new(well_formed));
    let hunt_id = create_hunt(&store, &[]).await;
    let generator = StoryGenerator::new(Arc::clone(&store), Arc::clone(&store), Arc::clone(&gateway));

    let err = generator
        .generate(hunt_id, &GenerationSettings::default())
        .await
        .unwrap_err();

    assert!(matches!(err.as_story().unwrap().kind, StoryErrorKind::NoLocations));
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn test_blank_theme_rejected_before_gateway() {
    let store = Arc::new(InMemoryHuntStore::new());
    let gateway = Arc::new(ScriptedGateway::new(well_formed));
    let hunt = store
        .create_hunt(Hunt::builder().title("No theme").build().unwrap())
        .await
        .unwrap();
    store
        .add_location(*hunt.id(), NewLocationStop::named("Bar"))
        .await
        .unwrap();
    let generator = StoryGenerator::new(Arc::clone(&store), Arc::clone(&store), Arc::clone(&gateway));

    let settings = GenerationSettings::builder()
        .theme("  ")
        .tone("dry")
        .build()
        .unwrap();
    let err = generator.generate(*hunt.id(), &settings).await.unwrap_err();

    assert!(matches!(
        err.as_story().unwrap().kind,
        StoryErrorKind::MissingThemeOrTone
    ));
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn test_gateway_errors_pass_through_once() {
    let store = Arc::new(InMemoryHuntStore::new());
    let hunt_id = create_hunt(&store, &["Bar"]).await;

    for (kind, rate_limited, quota) in [
        (GatewayErrorKind::RateLimited("slow down".into()), true, false),
        (GatewayErrorKind::QuotaExhausted("add credits".into()), false, true),
        (
            GatewayErrorKind::Request {
                status: 500,
                message: "boom".into(),
            },
            false,
            false,
        ),
    ] {
        let reply_kind = kind.clone();
        let gateway = Arc::new(ScriptedGateway::new(move |_| {
            Err(GatewayError::new(reply_kind.clone()))
        }));
        let generator =
            StoryGenerator::new(Arc::clone(&store), Arc::clone(&store), Arc::clone(&gateway));

        let err = generator
            .generate(hunt_id, &GenerationSettings::default())
            .await
            .unwrap_err();
        let gateway_err = err.as_gateway().expect("gateway error");
        assert_eq!(gateway_err.kind, kind);
        assert_eq!(gateway_err.is_rate_limited(), rate_limited);
        assert_eq!(gateway_err.is_quota_exhausted(), quota);
        assert_eq!(gateway.calls(), 1);
    }

    assert!(store.get_story(hunt_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_malformed_reply_leaves_previous_story() {
    let store = Arc::new(InMemoryHuntStore::new());
    let hunt_id = create_hunt(&store, &["Bar", "Pub"]).await;

    let good = Arc::new(ScriptedGateway::new(well_formed));
    StoryGenerator::new(Arc::clone(&store), Arc::clone(&store), good)
        .generate(hunt_id, &GenerationSettings::default())
        .await
        .unwrap();
    let before = store.get_story(hunt_id).await.unwrap();

    let bad = Arc::new(ScriptedGateway::new(|_| Ok("Sorry, I can't do that.".to_string())));
    let err = StoryGenerator::new(Arc::clone(&store), Arc::clone(&store), bad)
        .generate(hunt_id, &GenerationSettings::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_story().unwrap().kind,
        StoryErrorKind::MalformedPayload(_)
    ));
    assert_eq!(store.get_story(hunt_id).await.unwrap(), before);
    assert_eq!(store.option_count().await, 6);
}
