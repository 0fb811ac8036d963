//! Silent Story Engine — deterministic generation of wordless animal
//! story scripts.
//!
//! Turns a story type and a few setting hints into a structured scene
//! document for a downstream prompt pipeline: a locked problem/helper
//! triad, a beat sequence grown to the type's scene range, one-action
//! scene lines, and a validator that re-rolls content until the story
//! reads right. All randomness comes from a caller-supplied source.

pub mod core;
pub mod schema;

pub use crate::core::pipeline::{
    generate_story_frame, EngineConfig, StoryEngine, StoryEngineBuilder, StoryError,
};
pub use crate::core::random::{RandomSource, SeededSource};
pub use crate::schema::options::StoryOptions;
