use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Returned when a story type name is not one of the five known types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown story type \"{0}\"")]
pub struct ParseStoryTypeError(pub String);

/// The fixed catalog of story types.
///
/// Each type carries its allowed scene range, the key of its base beat
/// template, and whether secondary characters may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoryType {
    Emotional,
    Funny,
    Brave,
    Friendship,
    Adventure,
}

impl Default for StoryType {
    fn default() -> Self {
        Self::Adventure
    }
}

impl StoryType {
    pub const ALL: [StoryType; 5] = [
        Self::Emotional,
        Self::Funny,
        Self::Brave,
        Self::Friendship,
        Self::Adventure,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Emotional => "Emotional",
            Self::Funny => "Funny",
            Self::Brave => "Brave",
            Self::Friendship => "Friendship",
            Self::Adventure => "Adventure",
        }
    }

    /// Smallest number of scenes a story of this type may have.
    pub fn min_scenes(&self) -> usize {
        match self {
            Self::Emotional | Self::Funny | Self::Friendship => 15,
            Self::Brave => 16,
            Self::Adventure => 18,
        }
    }

    /// Largest number of scenes a story of this type may have.
    pub fn max_scenes(&self) -> usize {
        match self {
            Self::Emotional => 17,
            Self::Funny | Self::Friendship => 18,
            Self::Brave => 20,
            Self::Adventure => 25,
        }
    }

    /// Key of the base beat template in the registry.
    pub fn base_template_key(&self) -> &'static str {
        match self {
            Self::Emotional => "emotional",
            Self::Funny => "funny",
            Self::Brave => "brave",
            Self::Friendship => "friendship",
            Self::Adventure => "adventure",
        }
    }

    /// Template key for the given ending mode. Bittersweet stories use the
    /// `<base>_bittersweet` variant.
    pub fn template_key(&self, ending: EndingMode) -> String {
        match ending {
            EndingMode::Positive => self.base_template_key().to_string(),
            EndingMode::Bittersweet => format!("{}_bittersweet", self.base_template_key()),
        }
    }

    pub fn allows_friends(&self) -> bool {
        matches!(self, Self::Funny | Self::Friendship | Self::Adventure)
    }

    /// Short noun used in generated titles.
    pub fn title_noun(&self) -> &'static str {
        match self {
            Self::Adventure => "Little Adventure",
            Self::Friendship => "Happy Teamwork",
            Self::Funny => "Silly Rescue",
            Self::Brave => "Brave Moment",
            Self::Emotional => "Gentle Care",
        }
    }
}

impl fmt::Display for StoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StoryType {
    type Err = ParseStoryTypeError;

    /// Names match exactly, e.g. `"Brave"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| ParseStoryTypeError(s.to_string()))
    }
}

/// How a story resolves. Chosen once per generation and constant for the
/// whole story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndingMode {
    Positive,
    Bittersweet,
}

impl EndingMode {
    /// Keywords the closing scenes must mention for this mode.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Positive => &[
                "success",
                "resolved",
                "works",
                "completed",
                "fixed",
                "delivered",
                "safe",
            ],
            Self::Bittersweet => &["comfort", "accept", "calm", "relax", "beside", "close"],
        }
    }
}
