/// Story validator — structural gate over rendered scenes.
use std::fmt;

use crate::core::context::GenerationContext;

/// Scenes searched for the problem text.
const PROBLEM_WINDOW: usize = 6;
/// Closing scenes searched for ending keywords.
const ENDING_WINDOW: usize = 5;
/// Minimum percentage of scenes that must name the helper.
const HELPER_DENSITY_PERCENT: usize = 35;
/// A scene with this many "and"s is crammed with actions.
const MAX_AND: usize = 3;

/// The first check a story failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    ProblemNotEarly,
    EndingMismatch,
    HelperTooRare { found: usize, required: usize },
    CrowdedScene { scene: usize },
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProblemNotEarly => write!(f, "problem does not surface in the first {PROBLEM_WINDOW} scenes"),
            Self::EndingMismatch => write!(f, "closing scenes do not match the ending mode"),
            Self::HelperTooRare { found, required } => {
                write!(f, "helper appears in {found} scenes, {required} required")
            }
            Self::CrowdedScene { scene } => write!(f, "scene {scene} crams too many actions"),
        }
    }
}

/// Whole-word, case-insensitive count of "and".
pub fn count_and(text: &str) -> usize {
    text.split(|c: char| !c.is_alphabetic())
        .filter(|word| word.eq_ignore_ascii_case("and"))
        .count()
}

/// First four words of the problem, or its first 18 characters.
fn problem_markers(problem: &str) -> (String, String) {
    let words: Vec<&str> = problem.split_whitespace().take(4).collect();
    let head: String = problem.chars().take(18).collect();
    (words.join(" ").to_lowercase(), head.to_lowercase())
}

/// Run every check in order, stopping at the first failure.
///
/// The problem is matched case-insensitively. The helper check is a plain
/// case-insensitive substring match per scene, so a short name also counts
/// inside longer words ("Ant" in "distant").
pub fn check_story(scenes: &[String], ctx: &GenerationContext<'_>) -> Result<(), ValidationFailure> {
    let early = scenes
        .iter()
        .take(PROBLEM_WINDOW)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let (first_words, first_chars) = problem_markers(ctx.problem());
    if !early.contains(&first_words) && !early.contains(&first_chars) {
        return Err(ValidationFailure::ProblemNotEarly);
    }

    let closing_start = scenes.len().saturating_sub(ENDING_WINDOW);
    let closing = scenes[closing_start..].join(" ").to_lowercase();
    if !ctx
        .ending_mode
        .keywords()
        .iter()
        .any(|k| closing.contains(k))
    {
        return Err(ValidationFailure::EndingMismatch);
    }

    let helper = ctx.helper_animal().to_lowercase();
    let found = scenes
        .iter()
        .filter(|s| s.to_lowercase().contains(&helper))
        .count();
    let required = ctx.scene_count * HELPER_DENSITY_PERCENT / 100;
    if found < required {
        return Err(ValidationFailure::HelperTooRare { found, required });
    }

    if let Some(index) = scenes.iter().position(|s| count_and(s) >= MAX_AND) {
        return Err(ValidationFailure::CrowdedScene { scene: index + 1 });
    }

    Ok(())
}

/// Boolean form of [`check_story`].
pub fn validate_story(scenes: &[String], ctx: &GenerationContext<'_>) -> bool {
    check_story(scenes, ctx).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::fixtures::{bridge_catalog, context};
    use crate::schema::story_type::{EndingMode, StoryType};

    fn scenes(lines: &[&str]) -> Vec<String> {
        lines
            .iter()
            .enumerate()
            .map(|(i, l)| format!("Scene {}: {}", i + 1, l))
            .collect()
    }

    fn passing_lines() -> Vec<&'static str> {
        vec![
            "Willy sits in the park.",
            "Effect: the bridge is too narrow to cross.",
            "Beaver arrives.",
            "Beaver measures the gap.",
            "Beaver sets a plank.",
            "Willy waits.",
            "Success: the plank holds.",
        ]
    }

    #[test]
    fn count_and_is_whole_word() {
        assert_eq!(count_and("sand and stand AND band"), 2);
        assert_eq!(count_and("candy android"), 0);
        assert_eq!(count_and("and,and;and"), 3);
    }

    #[test]
    fn passing_story() {
        let catalog = bridge_catalog();
        let ctx = context(&catalog, StoryType::Brave, EndingMode::Positive, 7);
        assert_eq!(check_story(&scenes(&passing_lines()), &ctx), Ok(()));
    }

    #[test]
    fn positive_ending_keywords_required() {
        let catalog = bridge_catalog();
        let ctx = context(&catalog, StoryType::Brave, EndingMode::Positive, 7);
        let mut lines = passing_lines();
        lines[6] = "The plank holds.";
        assert_eq!(
            check_story(&scenes(&lines), &ctx),
            Err(ValidationFailure::EndingMismatch)
        );
        assert!(!validate_story(&scenes(&lines), &ctx));
    }

    #[test]
    fn bittersweet_ending_keywords() {
        let catalog = bridge_catalog();
        let ctx = context(&catalog, StoryType::Brave, EndingMode::Bittersweet, 7);
        let mut lines = passing_lines();
        assert!(!validate_story(&scenes(&lines), &ctx));
        lines[6] = "Willy rests beside Beaver.";
        assert!(validate_story(&scenes(&lines), &ctx));
    }

    #[test]
    fn problem_must_surface_early() {
        let catalog = bridge_catalog();
        let ctx = context(&catalog, StoryType::Brave, EndingMode::Positive, 7);
        let mut lines = passing_lines();
        lines[1] = "Willy looks around.";
        lines[6] = "Success: the bridge is too narrow no more.";
        assert_eq!(
            check_story(&scenes(&lines), &ctx),
            Err(ValidationFailure::ProblemNotEarly)
        );
    }

    #[test]
    fn problem_matches_by_leading_characters() {
        let mut catalog = bridge_catalog();
        catalog.triads[0].problem = "the wooden footbridge sways in the wind".to_string();
        let ctx = context(&catalog, StoryType::Brave, EndingMode::Positive, 7);
        let mut lines = passing_lines();
        // Only the 18-character head "the wooden footbri" is present.
        lines[1] = "The wooden footbridge creaks.";
        assert_eq!(check_story(&scenes(&lines), &ctx), Ok(()));
    }

    #[test]
    fn problem_match_ignores_case() {
        let mut catalog = bridge_catalog();
        catalog.triads[0].problem = "The Bridge is too narrow".to_string();
        let ctx = context(&catalog, StoryType::Brave, EndingMode::Positive, 7);
        assert_eq!(check_story(&scenes(&passing_lines()), &ctx), Ok(()));
    }

    #[test]
    fn helper_counts_inside_longer_words() {
        let mut catalog = bridge_catalog();
        catalog.triads[0].allowed_helpers = vec!["Ant".to_string()];
        let ctx = context(&catalog, StoryType::Brave, EndingMode::Positive, 7);
        let mut lines = vec![
            "Willy sits in the park.",
            "Effect: the bridge is too narrow to cross.",
            "Willy watches the distant hills.",
            "Ant arrives.",
            "Willy waits.",
            "Willy waits again.",
            "Success: the plank holds.",
        ];
        assert_eq!(check_story(&scenes(&lines), &ctx), Ok(()));

        lines[2] = "Willy watches the far hills.";
        assert_eq!(
            check_story(&scenes(&lines), &ctx),
            Err(ValidationFailure::HelperTooRare {
                found: 1,
                required: 2
            })
        );
    }

    #[test]
    fn helper_density() {
        let catalog = bridge_catalog();
        let ctx = context(&catalog, StoryType::Brave, EndingMode::Positive, 16);
        assert_eq!(
            check_story(&scenes(&passing_lines()), &ctx),
            Err(ValidationFailure::HelperTooRare {
                found: 3,
                required: 5
            })
        );
    }

    #[test]
    fn crowded_scene_fails() {
        let catalog = bridge_catalog();
        let ctx = context(&catalog, StoryType::Brave, EndingMode::Positive, 7);
        let mut lines = passing_lines();
        lines[3] = "Beaver digs and pushes and pulls and rests.";
        assert_eq!(
            check_story(&scenes(&lines), &ctx),
            Err(ValidationFailure::CrowdedScene { scene: 4 })
        );
    }

    #[test]
    fn failure_messages() {
        assert!(ValidationFailure::HelperTooRare {
            found: 1,
            required: 5
        }
        .to_string()
        .contains("5 required"));
    }
}
