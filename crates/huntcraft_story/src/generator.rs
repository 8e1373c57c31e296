//! Generation flow: load the hunt, call the gateway once, assemble.

use crate::{AssemblyContext, AssemblyOutcome, StoryAssembler};
use huntcraft_core::{AgeRating, GenerationLocation, GenerationRequest, HuntId};
use huntcraft_error::{BackendError, HuntcraftResult, StoryError, StoryErrorKind};
use huntcraft_interface::{HuntRepository, StoryGateway, StoryRepository};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Host choices for one generation run.
///
/// Theme and tone fall back to the hunt's own values when unset.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, derive_getters::Getters, derive_builder::Builder,
)]
#[builder(default, setter(into))]
pub struct GenerationSettings {
    /// Overrides the hunt's theme
    #[builder(setter(into, strip_option))]
    theme: Option<String>,
    /// Overrides the hunt's tone
    #[builder(setter(into, strip_option))]
    tone: Option<String>,
    /// Content rating passed to the model
    age_rating: AgeRating,
    /// Free-form instructions appended to the prompt
    #[builder(setter(into, strip_option))]
    custom_notes: Option<String>,
}

impl GenerationSettings {
    /// Returns a builder for constructing GenerationSettings.
    pub fn builder() -> GenerationSettingsBuilder {
        GenerationSettingsBuilder::default()
    }
}

/// Produces and stores a hunt's story.
pub struct StoryGenerator<H: ?Sized, S: ?Sized, G: ?Sized> {
    hunts: Arc<H>,
    gateway: Arc<G>,
    assembler: StoryAssembler<S>,
}

impl<H, S, G> StoryGenerator<H, S, G>
where
    H: HuntRepository + ?Sized,
    S: StoryRepository + ?Sized,
    G: StoryGateway + ?Sized,
{
    /// Creates a generator.
    pub fn new(hunts: Arc<H>, stories: Arc<S>, gateway: Arc<G>) -> Self {
        Self {
            hunts,
            gateway,
            assembler: StoryAssembler::new(stories),
        }
    }

    /// Builds the gateway request for a hunt without calling the gateway.
    ///
    /// Fails with `NoLocations` when the hunt has no stops and with
    /// `MissingThemeOrTone` when either is blank after fallback.
    #[instrument(skip(self, settings), fields(hunt_id = %hunt_id))]
    pub async fn prepare_request(
        &self,
        hunt_id: HuntId,
        settings: &GenerationSettings,
    ) -> HuntcraftResult<GenerationRequest> {
        let hunt = self.hunts.get_hunt(hunt_id).await?;
        let locations = self.hunts.list_locations(hunt_id).await?;
        if locations.is_empty() {
            error!("Hunt has no locations");
            return Err(StoryError::new(StoryErrorKind::NoLocations).into());
        }

        let theme = non_blank(settings.theme()).or_else(|| non_blank(hunt.theme()));
        let tone = non_blank(settings.tone()).or_else(|| non_blank(hunt.tone()));
        let (Some(theme), Some(tone)) = (theme, tone) else {
            error!("Theme or tone missing");
            return Err(StoryError::new(StoryErrorKind::MissingThemeOrTone).into());
        };

        GenerationRequest::builder()
            .hunt_id(hunt_id)
            .theme(theme)
            .tone(tone)
            .age_rating(*settings.age_rating())
            .custom_notes(settings.custom_notes().clone())
            .locations(
                locations
                    .iter()
                    .map(GenerationLocation::from)
                    .collect::<Vec<_>>(),
            )
            .play_order(*hunt.play_order())
            .final_stop_mode(*hunt.final_stop_mode())
            .build()
            .map_err(|e| BackendError::new(format!("generation request: {}", e)).into())
    }

    /// Generates the hunt's story and replaces any previous one.
    ///
    /// The gateway is called exactly once. Its errors are returned as-is.
    #[instrument(skip(self, settings), fields(hunt_id = %hunt_id, provider = self.gateway.provider_name()))]
    pub async fn generate(
        &self,
        hunt_id: HuntId,
        settings: &GenerationSettings,
    ) -> HuntcraftResult<AssemblyOutcome> {
        let request = self.prepare_request(hunt_id, settings).await?;
        debug!(
            locations = request.locations().len(),
            theme = %request.theme(),
            "Calling story gateway"
        );

        let raw = self
            .gateway
            .generate_story(&request)
            .await
            .inspect_err(|e| error!(error = %e, "Story gateway failed"))?;
        debug!(response_len = raw.len(), "Gateway responded");

        let outcome = self
            .assembler
            .assemble(&AssemblyContext::from_request(&request), &raw)
            .await?;
        info!(options = outcome.options().len(), "Story generated");
        Ok(outcome)
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
