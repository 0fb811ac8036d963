use serde::{Deserialize, Serialize};

use super::story_type::{ParseStoryTypeError, StoryType};

/// Caller-supplied generation options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryOptions {
    /// One of the five story type names. Defaults to `"Adventure"`.
    pub story_type: Option<String>,
    /// Advisory only. The scene count is always resolved from the story
    /// type's range.
    pub scene_count: Option<usize>,
    pub location: Option<String>,
    pub weather: Option<String>,
    /// An explicit friends list replaces random selection entirely.
    pub friends: Option<Vec<String>>,
}

impl StoryOptions {
    pub fn new(story_type: &str) -> Self {
        Self {
            story_type: Some(story_type.to_string()),
            ..Self::default()
        }
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    pub fn with_weather(mut self, weather: &str) -> Self {
        self.weather = Some(weather.to_string());
        self
    }

    pub fn with_friends(mut self, friends: &[&str]) -> Self {
        self.friends = Some(friends.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Resolve the requested story type, defaulting to Adventure when none
    /// (or an empty name) was given.
    pub fn resolve_story_type(&self) -> Result<StoryType, ParseStoryTypeError> {
        match self.story_type.as_deref().map(str::trim) {
            None | Some("") => Ok(StoryType::default()),
            Some(name) => name.parse(),
        }
    }
}

/// Returns the trimmed value when it is present and non-empty.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
