//! Story generation request sent to the gateway.

use crate::{AgeRating, FinalStopMode, HuntId, LocationId, LocationStop, PlayOrder};
use serde::{Deserialize, Serialize};

/// A stop as the generator sees it: id and display name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct GenerationLocation {
    id: LocationId,
    name: String,
}

impl GenerationLocation {
    /// Creates a generation location.
    pub fn new(id: LocationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl From<&LocationStop> for GenerationLocation {
    fn from(stop: &LocationStop) -> Self {
        Self::new(*stop.id(), stop.name().clone())
    }
}

/// Everything the gateway needs to write a hunt's story.
///
/// Serialises with the camelCase field names of the generation wire format.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct GenerationRequest {
    hunt_id: HuntId,
    theme: String,
    tone: String,
    #[builder(default)]
    age_rating: AgeRating,
    #[builder(default)]
    custom_notes: Option<String>,
    /// Stops in play order
    locations: Vec<GenerationLocation>,
    #[builder(default)]
    play_order: PlayOrder,
    #[builder(default)]
    final_stop_mode: FinalStopMode,
}

impl GenerationRequest {
    /// Returns a builder for constructing a GenerationRequest.
    pub fn builder() -> GenerationRequestBuilder {
        GenerationRequestBuilder::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let request = GenerationRequest::builder()
            .hunt_id(HuntId::new())
            .theme("Christmas Heist")
            .tone("festive")
            .locations(vec![GenerationLocation::new(LocationId::new(), "The Anchor")])
            .build()
            .unwrap();

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("huntId").is_some());
        assert!(json.get("finalStopMode").is_some());
        assert_eq!(json["ageRating"], "PG-13");
        assert_eq!(json["playOrder"], "FLEXIBLE");
        assert_eq!(json["locations"][0]["name"], "The Anchor");
    }
}
