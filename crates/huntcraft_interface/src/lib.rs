//! Trait definitions for the Huntcraft story engine.
//!
//! The record store and the text-generation backend are external
//! collaborators; the story protocol only talks to them through these traits.

mod gateway;
mod repository;

pub use gateway::StoryGateway;
pub use repository::{HuntRepository, ReplacementReceipt, StoryReplacement, StoryRepository};
