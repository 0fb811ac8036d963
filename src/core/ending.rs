/// Ending mode policy.
use serde::{Deserialize, Serialize};

use crate::core::random::RandomSource;
use crate::schema::story_type::{EndingMode, StoryType};

/// Controls when a story may end bittersweet instead of positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndingPolicy {
    pub allow_bittersweet: bool,
    /// Probability in `[0, 1]` of a bittersweet ending for eligible types.
    pub bittersweet_chance: f64,
    pub allowed_types: Vec<StoryType>,
}

impl Default for EndingPolicy {
    fn default() -> Self {
        Self {
            allow_bittersweet: true,
            bittersweet_chance: 0.06,
            allowed_types: vec![StoryType::Emotional, StoryType::Brave],
        }
    }
}

impl EndingPolicy {
    /// A policy that always yields positive endings.
    pub fn positive_only() -> Self {
        Self {
            allow_bittersweet: false,
            ..Self::default()
        }
    }

    pub fn is_eligible(&self, story_type: StoryType) -> bool {
        self.allow_bittersweet && self.allowed_types.contains(&story_type)
    }

    /// Choose the ending mode. Draws exactly once for eligible types and
    /// not at all otherwise.
    pub fn decide(&self, story_type: StoryType, rng: &mut dyn RandomSource) -> EndingMode {
        if !self.is_eligible(story_type) {
            return EndingMode::Positive;
        }
        if rng.next_f64() < self.bittersweet_chance {
            EndingMode::Bittersweet
        } else {
            EndingMode::Positive
        }
    }
}
