//! Mad-lib story protocol for Huntcraft.
//!
//! Generated story text is extracted, validated and stored by the
//! [`StoryAssembler`]; hosts pick one option per stop through the
//! [`OptionSelector`]; [`render`] fills the final template with the
//! selected answer words.
//!
//! # Example
//!
//! ```
//! use huntcraft_story::{RenderStyle, render_with};
//!
//! let rendered = render_with(
//!     "The {{BLANK_1}} was hidden near the {{BLANK_2}}.",
//!     &["brass key"],
//!     RenderStyle::host_preview(),
//! );
//! assert_eq!(rendered.text(), "The **brass key** was hidden near the [____].");
//! ```

#![warn(missing_docs)]

mod assembler;
mod blanks;
mod board;
mod extraction;
mod generator;
mod in_memory_repository;
mod payload;
mod renderer;
mod selector;

pub use assembler::{
    AssemblyContext, AssemblyContextBuilder, AssemblyOutcome, AssemblyWarning, StoryAssembler,
    ValidatedStory, validate_payload,
};
pub use blanks::{BlankMarker, distinct_blank_count, scan_markers, template_keys};
pub use board::StoryBoard;
pub use extraction::{extract_json, parse_payload};
pub use generator::{GenerationSettings, GenerationSettingsBuilder, StoryGenerator};
pub use in_memory_repository::InMemoryHuntStore;
pub use payload::{BlankDefinition, PayloadLocation, PayloadOption, StoryPayload};
pub use renderer::{
    FillStyle, RenderStyle, RenderedMadlib, UNFILLED_MARKER, UnfilledStyle, render, render_with,
    words_for,
};
pub use selector::{LocationOptions, OptionSelector, group_options};
