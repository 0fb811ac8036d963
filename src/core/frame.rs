/// Story frame — title, prop DNA, and the final output document.
use serde::{Deserialize, Serialize};

use crate::core::context::GenerationContext;
use crate::core::random::{pick, RandomSource};
use crate::schema::story_type::{EndingMode, StoryType};
use crate::schema::triad::Props;

const TITLE_HOOKS: &[&str] = &[
    "and the Little Problem That Became a Big Smile",
    "and the Tiny Fix That Felt Like a Hug",
    "and the Brave Step on a Small Day",
    "and the Helpful Friend Who Came Quietly",
    "and the Silly Mishap That Turned Sweet",
];

const LESSONS: &[&str] = &[
    "asking for help is brave",
    "patience makes things work",
    "being careful matters",
    "friends make hard things easier",
    "trying again is okay",
];

/// Production rules appended to every document.
pub const PRODUCTION_CHECKLIST: [&str; 6] = [
    "- No dialogue, no text, no subtitles, no logos",
    "- One action per scene (still/slow for detailed interaction)",
    "- Visible cause → effect in every scene",
    "- Physics: weight, gravity, scale are believable",
    "- Animals only (photoreal anatomy, natural fur, no human limbs)",
    "- Calm closing echo of opening",
];

const TITLE_PROBLEM_LIMIT: usize = 52;
const TITLE_PROBLEM_KEEP: usize = 49;

/// Build the title for the current binding. Draws once for the hook.
pub fn build_title(series: &str, ctx: &GenerationContext<'_>, rng: &mut dyn RandomSource) -> String {
    let hook = pick(rng, TITLE_HOOKS).copied().unwrap_or(TITLE_HOOKS[0]);
    let problem = ctx.problem().to_lowercase();
    let short_problem = if problem.chars().count() > TITLE_PROBLEM_LIMIT {
        let kept: String = problem.chars().take(TITLE_PROBLEM_KEEP).collect();
        format!("{kept}…")
    } else {
        problem
    };
    format!(
        "{series}: {} — {hook} — {short_problem}",
        ctx.story_type.title_noun()
    )
}

/// Fixed-format descriptions of the recurring props.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropDna {
    pub object: String,
    pub tool: String,
    pub vehicle: String,
}

impl PropDna {
    pub fn from_props(props: &Props) -> Self {
        let object = match props.object_of_affection() {
            Some(obj) => format!(
                "OBJECT DNA: {obj}; same size, color, texture in every scene; rests on the ground with real weight"
            ),
            None => "OBJECT DNA: none".to_string(),
        };
        let tool = if props.tools.is_empty() {
            "TOOL DNA: none".to_string()
        } else {
            format!(
                "TOOL DNA: {}; toy-scale, matte natural materials, identical in every scene",
                props.tools.join(", ")
            )
        };
        let vehicle = match props.vehicle.as_deref() {
            Some(vehicle) => format!(
                "VEHICLE DNA: {vehicle}; small wooden build, four round wheels, realistic rolling"
            ),
            None => "VEHICLE DNA: none".to_string(),
        };
        Self {
            object,
            tool,
            vehicle,
        }
    }
}

/// Story-level intent derived from the emitted attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryContract {
    pub goal: String,
    pub lesson: String,
    pub location: String,
    pub weather: String,
    pub time_flow: String,
    pub stakes: String,
    pub object_of_focus: Option<String>,
}

impl StoryContract {
    /// Derive the contract. Draws once for the lesson.
    pub fn derive(ctx: &GenerationContext<'_>, rng: &mut dyn RandomSource) -> Self {
        let lesson = pick(rng, LESSONS).copied().unwrap_or(LESSONS[0]);
        Self {
            goal: ctx.problem().to_string(),
            lesson: lesson.to_string(),
            location: ctx.location.clone(),
            weather: ctx.weather.clone(),
            time_flow: "continuous".to_string(),
            stakes: "problem remains unresolved if actions fail".to_string(),
            object_of_focus: ctx.object_of_affection().map(str::to_string),
        }
    }
}

/// The emitted story: settings, prop DNA, numbered scenes, plus attempt
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryFrame {
    pub title: String,
    pub story_type: StoryType,
    pub ending_mode: EndingMode,
    pub hero: String,
    pub friends: Vec<String>,
    pub location: String,
    pub weather: String,
    pub helper_animal: String,
    pub helper_role: String,
    pub problem: String,
    pub object_of_affection: Option<String>,
    pub prop_dna: PropDna,
    pub scenes: Vec<String>,
    pub contract: StoryContract,
    /// Attempts made, including the first.
    pub attempts: u32,
    /// Whether the emitted attempt passed validation.
    pub validated: bool,
}

impl StoryFrame {
    pub fn assemble(
        ctx: &GenerationContext<'_>,
        scenes: Vec<String>,
        contract: StoryContract,
        attempts: u32,
        validated: bool,
    ) -> Self {
        Self {
            title: ctx.title.clone(),
            story_type: ctx.story_type,
            ending_mode: ctx.ending_mode,
            hero: ctx.hero.clone(),
            friends: ctx.friends.clone(),
            location: ctx.location.clone(),
            weather: ctx.weather.clone(),
            helper_animal: ctx.helper_animal().to_string(),
            helper_role: ctx.helper_role().to_string(),
            problem: ctx.problem().to_string(),
            object_of_affection: ctx.object_of_affection().map(str::to_string),
            prop_dna: PropDna::from_props(ctx.props()),
            scenes,
            contract,
            attempts,
            validated,
        }
    }

    /// Render the output document.
    pub fn render(&self) -> String {
        let friends = if self.friends.is_empty() {
            "None".to_string()
        } else {
            self.friends.join(", ")
        };
        let object = self.object_of_affection.as_deref().unwrap_or("None");

        let mut out: Vec<String> = Vec::with_capacity(self.scenes.len() + 30);
        out.push("STORY TITLE".to_string());
        out.push(self.title.clone());
        out.push(String::new());
        out.push("STORY SETTINGS".to_string());
        out.push(format!("- Type: {}", self.story_type));
        out.push(format!("- Hero: {}", self.hero));
        out.push(format!("- Friends (optional): {friends}"));
        out.push(format!("- Location: {}", self.location));
        out.push(format!("- Weather/Time: {}", self.weather));
        out.push(format!("- Helper (animal-only): {}", self.helper_animal));
        out.push(format!("- Primary helper role: {}", self.helper_role));
        out.push(format!("- Problem: {}", self.problem));
        out.push(format!("- Object of affection: {object}"));
        out.push(String::new());
        out.push("PROP DNA (must be repeated verbatim in prompts)".to_string());
        out.push(self.prop_dna.object.clone());
        out.push(self.prop_dna.tool.clone());
        out.push(self.prop_dna.vehicle.clone());
        out.push(String::new());
        out.push(format!("SCENES ({})", self.scenes.len()));
        out.extend(self.scenes.iter().cloned());
        out.push(String::new());
        out.push("SOP CHECK".to_string());
        out.extend(PRODUCTION_CHECKLIST.iter().map(|line| line.to_string()));

        out.join("\n")
    }
}
