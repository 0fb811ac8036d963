/// Beat templates — registry, filler expansion, and ordering repair.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::core::random::{pick, RandomSource};
use crate::schema::story_type::StoryType;

#[derive(Debug, Error)]
pub enum BeatError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("template '{0}' has no beats")]
    EmptyTemplate(String),
}

/// An abstract scene intent. The renderer turns each beat into exactly one
/// scene line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Beat {
    Opening,
    GoalFocus,
    CauseStart,
    ProblemReveal,
    LowReaction,
    HelperArrival,
    HelperIntent,
    ToolsEnter,
    PrepStation,
    BuildStep,
    Travel,
    Obstacle,
    Adjust,
    TryGently,
    TryStep,
    Progress,
    ShowWork,
    Test,
    SillyMishap,
    GiggleFreeze,
    FriendJoin,
    TeamCarry,
    BraveBreath,
    Attempt1,
    ReactionPause,
    Attempt2,
    Success,
    Resolution,
    Joy,
    Accept,
    ComfortGift,
    SoftReframe,
    CalmEcho,
    ExtraCute,
    /// A tag the engine has no dedicated rendering for.
    Custom(String),
}

const KNOWN_BEATS: [Beat; 34] = [
    Beat::Opening,
    Beat::GoalFocus,
    Beat::CauseStart,
    Beat::ProblemReveal,
    Beat::LowReaction,
    Beat::HelperArrival,
    Beat::HelperIntent,
    Beat::ToolsEnter,
    Beat::PrepStation,
    Beat::BuildStep,
    Beat::Travel,
    Beat::Obstacle,
    Beat::Adjust,
    Beat::TryGently,
    Beat::TryStep,
    Beat::Progress,
    Beat::ShowWork,
    Beat::Test,
    Beat::SillyMishap,
    Beat::GiggleFreeze,
    Beat::FriendJoin,
    Beat::TeamCarry,
    Beat::BraveBreath,
    Beat::Attempt1,
    Beat::ReactionPause,
    Beat::Attempt2,
    Beat::Success,
    Beat::Resolution,
    Beat::Joy,
    Beat::Accept,
    Beat::ComfortGift,
    Beat::SoftReframe,
    Beat::CalmEcho,
    Beat::ExtraCute,
];

/// Structural beats that mark the working middle of a story. Filler is
/// inserted right after the first of these.
const MIDDLE_BEATS: [Beat; 7] = [
    Beat::PrepStation,
    Beat::BuildStep,
    Beat::Travel,
    Beat::Obstacle,
    Beat::Adjust,
    Beat::TryGently,
    Beat::TryStep,
];

impl Beat {
    pub fn tag(&self) -> &str {
        match self {
            Self::Opening => "opening",
            Self::GoalFocus => "goal_focus",
            Self::CauseStart => "cause_start",
            Self::ProblemReveal => "problem_reveal",
            Self::LowReaction => "low_reaction",
            Self::HelperArrival => "helper_arrival",
            Self::HelperIntent => "helper_intent",
            Self::ToolsEnter => "tools_enter",
            Self::PrepStation => "prep_station",
            Self::BuildStep => "build_step",
            Self::Travel => "travel",
            Self::Obstacle => "obstacle",
            Self::Adjust => "adjust",
            Self::TryGently => "try_gently",
            Self::TryStep => "try_step",
            Self::Progress => "progress",
            Self::ShowWork => "show_work",
            Self::Test => "test",
            Self::SillyMishap => "silly_mishap",
            Self::GiggleFreeze => "giggle_freeze",
            Self::FriendJoin => "friend_join",
            Self::TeamCarry => "team_carry",
            Self::BraveBreath => "brave_breath",
            Self::Attempt1 => "attempt_1",
            Self::ReactionPause => "reaction_pause",
            Self::Attempt2 => "attempt_2",
            Self::Success => "success",
            Self::Resolution => "resolution",
            Self::Joy => "joy",
            Self::Accept => "accept",
            Self::ComfortGift => "comfort_gift",
            Self::SoftReframe => "soft_reframe",
            Self::CalmEcho => "calm_echo",
            Self::ExtraCute => "extra_cute",
            Self::Custom(tag) => tag,
        }
    }

    /// Parse a tag case-insensitively. Unrecognized tags become `Custom`.
    pub fn from_tag(tag: &str) -> Beat {
        let normalized = tag.trim().to_ascii_lowercase();
        KNOWN_BEATS
            .iter()
            .find(|b| b.tag() == normalized)
            .cloned()
            .unwrap_or_else(|| Beat::Custom(tag.trim().to_string()))
    }

    pub fn is_middle(&self) -> bool {
        MIDDLE_BEATS.contains(self)
    }
}

impl From<String> for Beat {
    fn from(tag: String) -> Self {
        Beat::from_tag(&tag)
    }
}

impl From<Beat> for String {
    fn from(beat: Beat) -> Self {
        beat.tag().to_string()
    }
}

impl fmt::Display for Beat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Beats that may be inserted during expansion for a story type.
pub fn filler_beats(story_type: StoryType) -> &'static [Beat] {
    match story_type {
        StoryType::Adventure => &[Beat::Travel, Beat::Obstacle, Beat::Adjust, Beat::Progress],
        StoryType::Funny => &[
            Beat::SillyMishap,
            Beat::GiggleFreeze,
            Beat::TryGently,
            Beat::Adjust,
        ],
        StoryType::Brave => &[Beat::BraveBreath, Beat::TryStep, Beat::Obstacle, Beat::Adjust],
        StoryType::Friendship => &[
            Beat::TeamCarry,
            Beat::FriendJoin,
            Beat::BuildStep,
            Beat::Progress,
        ],
        StoryType::Emotional => &[Beat::BuildStep, Beat::Test, Beat::TryGently, Beat::ShowWork],
    }
}

/// Named base beat sequences, one per template key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BeatRegistry {
    pub templates: HashMap<String, Vec<Beat>>,
}

impl BeatRegistry {
    /// The built-in templates: one per story type plus bittersweet variants
    /// for Emotional and Brave.
    pub fn builtin() -> Self {
        use Beat::*;

        let mut templates = HashMap::new();
        templates.insert(
            "emotional".to_string(),
            vec![
                Opening, GoalFocus, ProblemReveal, LowReaction, HelperArrival, HelperIntent,
                ToolsEnter, BuildStep, Attempt1, ReactionPause, Attempt2, Success, Joy, CalmEcho,
                ExtraCute,
            ],
        );
        templates.insert(
            "emotional_bittersweet".to_string(),
            vec![
                Opening, GoalFocus, ProblemReveal, LowReaction, HelperArrival, HelperIntent,
                ToolsEnter, BuildStep, Attempt1, Attempt2, Accept, ComfortGift, SoftReframe, Joy,
                CalmEcho,
            ],
        );
        templates.insert(
            "funny".to_string(),
            vec![
                Opening, GoalFocus, CauseStart, ProblemReveal, LowReaction, HelperArrival,
                HelperIntent, ToolsEnter, TryGently, SillyMishap, Attempt1, Attempt2, Success, Joy,
                CalmEcho,
            ],
        );
        templates.insert(
            "brave".to_string(),
            vec![
                Opening, GoalFocus, CauseStart, ProblemReveal, LowReaction, BraveBreath,
                HelperArrival, HelperIntent, TryStep, Attempt1, Attempt2, Success, Joy, CalmEcho,
            ],
        );
        templates.insert(
            "brave_bittersweet".to_string(),
            vec![
                Opening, GoalFocus, CauseStart, ProblemReveal, LowReaction, BraveBreath,
                HelperArrival, HelperIntent, TryStep, Attempt1, Attempt2, Accept, ComfortGift, Joy,
                CalmEcho,
            ],
        );
        templates.insert(
            "friendship".to_string(),
            vec![
                Opening, GoalFocus, ProblemReveal, LowReaction, FriendJoin, HelperArrival,
                HelperIntent, ToolsEnter, BuildStep, TeamCarry, Attempt1, Attempt2, Success, Joy,
                CalmEcho,
            ],
        );
        templates.insert(
            "adventure".to_string(),
            vec![
                Opening, GoalFocus, CauseStart, ProblemReveal, LowReaction, HelperArrival,
                HelperIntent, ToolsEnter, Travel, Obstacle, Attempt1, Attempt2, Success, Joy,
                CalmEcho,
            ],
        );

        Self { templates }
    }

    /// Load templates from a RON map of `key: [tags]`.
    pub fn load_from_ron(path: &Path) -> Result<BeatRegistry, BeatError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<BeatRegistry, BeatError> {
        let templates: HashMap<String, Vec<Beat>> = ron::from_str(input)?;
        if let Some((key, _)) = templates.iter().find(|(_, beats)| beats.is_empty()) {
            return Err(BeatError::EmptyTemplate(key.clone()));
        }
        Ok(BeatRegistry { templates })
    }

    /// Merge another registry into this one. Templates from `other`
    /// replace templates with the same key.
    pub fn merge(&mut self, other: BeatRegistry) {
        for (key, beats) in other.templates {
            self.templates.insert(key, beats);
        }
    }

    pub fn template(&self, key: &str) -> Option<&[Beat]> {
        self.templates.get(key).map(Vec::as_slice)
    }
}

/// Grow (or truncate) `base` to exactly `target` beats.
///
/// Filler beats for the story type are inserted one at a time directly
/// after the first middle beat (or the midpoint when there is none), so the
/// last insertion ends up closest to that beat. The precedence repair pass
/// runs on the result either way, truncated or grown.
pub fn expand_beats(
    base: &[Beat],
    target: usize,
    story_type: StoryType,
    rng: &mut dyn RandomSource,
) -> Vec<Beat> {
    let mut beats = if target <= base.len() {
        base[..target].to_vec()
    } else {
        grow_beats(base, target, story_type, rng)
    };

    enforce_precedence(&mut beats);
    beats
}

fn grow_beats(
    base: &[Beat],
    target: usize,
    story_type: StoryType,
    rng: &mut dyn RandomSource,
) -> Vec<Beat> {
    let mut beats = base.to_vec();
    let middle = beats
        .iter()
        .position(Beat::is_middle)
        .unwrap_or(beats.len() / 2);
    let insert_at = (middle + 1).min(beats.len());
    let fillers = filler_beats(story_type);

    for _ in base.len()..target {
        if let Some(filler) = pick(rng, fillers) {
            beats.insert(insert_at, filler.clone());
        }
    }
    beats
}

/// Swap-if-inverted over the required precedence pairs, in order. Each
/// check performs at most one swap of first occurrences; this is a repair
/// pass, not a sort.
pub fn enforce_precedence(beats: &mut [Beat]) {
    let resolved = if beats.contains(&Beat::Success) {
        Beat::Success
    } else {
        Beat::Resolution
    };

    enforce_order(beats, &Beat::ProblemReveal, &Beat::LowReaction);
    enforce_order(beats, &Beat::LowReaction, &Beat::HelperArrival);
    enforce_order(beats, &Beat::HelperArrival, &Beat::Attempt1);
    enforce_order(beats, &Beat::Attempt1, &Beat::Attempt2);
    enforce_order(beats, &Beat::Attempt2, &resolved);
    enforce_order(beats, &resolved, &Beat::Joy);
    enforce_order(beats, &Beat::Joy, &Beat::CalmEcho);
}

/// Ensure the first `before` precedes the first `after`, swapping the two
/// positions if not. Missing beats are ignored.
pub fn enforce_order(beats: &mut [Beat], before: &Beat, after: &Beat) {
    let first = beats.iter().position(|b| b == before);
    let second = beats.iter().position(|b| b == after);
    if let (Some(ia), Some(ib)) = (first, second) {
        if ia > ib {
            beats.swap(ia, ib);
        }
    }
}
