pub mod options;
pub mod story_type;
pub mod triad;
