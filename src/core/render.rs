/// Scene renderer — beat + bound context → one scene line.
///
/// Every phrase describes a single physical action or a held stillness,
/// uses animal actors only, and never contains dialogue or written text.
use crate::core::beats::Beat;
use crate::core::context::GenerationContext;
use crate::core::random::{pick, RandomSource};
use crate::schema::story_type::EndingMode;

/// Helper role family, matched by keyword against the role text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelperCategory {
    Caregiver,
    Builder,
    Mechanic,
    Delivery,
    Mediator,
    General,
}

impl HelperCategory {
    const MATCHERS: [(HelperCategory, &'static [&'static str]); 5] = [
        (
            HelperCategory::Caregiver,
            &["caregiver", "care", "nurse", "medic", "doctor", "vet", "healer"],
        ),
        (
            HelperCategory::Builder,
            &["builder", "build", "carpenter", "construct", "engineer", "mason"],
        ),
        (
            HelperCategory::Mechanic,
            &["mechanic", "repair", "fixer", "tinker", "wheel"],
        ),
        (
            HelperCategory::Delivery,
            &["delivery", "deliver", "courier", "carrier", "mail", "postal", "porter"],
        ),
        (
            HelperCategory::Mediator,
            &["mediator", "peacemaker", "peace", "referee", "counsel"],
        ),
    ];

    /// First category whose keywords appear in `role`, else `General`.
    pub fn classify(role: &str) -> HelperCategory {
        let lower = role.to_lowercase();
        Self::MATCHERS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(category, _)| *category)
            .unwrap_or(HelperCategory::General)
    }

    /// Grounded one-action phrases for this kind of helper.
    pub fn actions(&self) -> &'static [&'static str] {
        match self {
            Self::Caregiver => &[
                "gives the problem one gentle sniff",
                "lays a soft paw on the sore spot",
                "tucks a soft leaf under one corner",
                "warms the spot with a steady nuzzle",
                "checks the fix with one slow look",
            ],
            Self::Builder => &[
                "measures the gap with one long stretch",
                "sets a plank edge flush with the ground",
                "presses a twig brace into the soft earth",
                "checks the level with one careful look",
                "taps a peg down with one firm push",
            ],
            Self::Mechanic => &[
                "turns the loose part a quarter turn",
                "wiggles the axle to find the slack",
                "fits the wheel back onto its peg",
                "tightens one joint with a careful twist",
                "oils the stiff hinge with one drip",
            ],
            Self::Delivery => &[
                "lifts the parcel strap over one shoulder",
                "nudges the load onto a steady spot",
                "checks the route ahead with one look",
                "balances the load across its back",
                "sets the bundle down gently at the spot",
            ],
            Self::Mediator => &[
                "steps calmly between the two sides",
                "offers each side one equal turn",
                "lowers its head to slow everyone down",
                "draws a fair line in the mud with one claw",
                "waits quietly until everyone settles",
            ],
            Self::General => &[
                "places the tool down carefully",
                "aligns the object once",
                "tests the fit gently",
                "adjusts the angle once",
                "secures one point firmly",
            ],
        }
    }
}

const SMALL_OBSTACLES: &[&str] = &[
    "a tiny wobble makes the setup drift (safe)",
    "the surface is slightly slippery (safe)",
    "a breeze nudges it off-line (safe)",
    "a small gap is just a bit too wide (safe)",
    "a strap is a little too short (safe)",
];

const ONE_MOVES: &[&str] = &[
    "takes one small step forward",
    "turns its head once",
    "leans closer once",
    "backs up slightly",
    "pads forward slowly",
];

fn pick_phrase(rng: &mut dyn RandomSource, pool: &[&'static str]) -> &'static str {
    pick(rng, pool).copied().unwrap_or("")
}

/// Render one beat. Never fails: unknown beats get a generic one-action line.
pub fn render_beat(beat: &Beat, ctx: &GenerationContext<'_>, rng: &mut dyn RandomSource) -> String {
    let hero = ctx.hero.as_str();
    let helper = ctx.helper_animal();
    let role = ctx.helper_role();
    let problem = ctx.problem();
    let location = ctx.location.as_str();
    let weather = ctx.weather.as_str();
    let object = ctx.object_of_affection();
    let props = ctx.props();
    let tool = props.primary_tool().unwrap_or("small plank");
    let friend = ctx.friends.first().map(String::as_str);
    let category = HelperCategory::classify(role);
    let bittersweet = ctx.ending_mode == EndingMode::Bittersweet;

    match beat {
        Beat::Opening => match object {
            Some(obj) => format!(
                "Calm opening in {location} under {weather}. {hero} sits near the {obj}, tiny blep visible (still)."
            ),
            None => format!(
                "Calm opening in {location} under {weather}. {hero} sits quietly, tiny blep visible (still)."
            ),
        },
        Beat::GoalFocus => match object {
            Some(obj) => format!(
                "{hero} looks from the surroundings back to the {obj}, showing a clear wish without words (still/slow)."
            ),
            None => format!(
                "{hero} looks toward the goal area, showing a clear wish without words (still/slow)."
            ),
        },
        Beat::CauseStart => format!(
            "Cause: {hero} starts moving with purpose toward the goal area (one clear motion)."
        ),
        Beat::ProblemReveal => format!(
            "Effect: {problem} becomes clearly visible with believable physics (safe)."
        ),
        Beat::LowReaction => match object {
            Some(obj) => format!(
                "{hero} pauses; ears droop while staring at the {obj} (one still beat)."
            ),
            None => format!("{hero} pauses; ears droop, tail low (one still beat)."),
        },
        Beat::HelperArrival => format!(
            "{helper} arrives, stopping at a respectful distance to look at {hero} (never the camera)."
        ),
        Beat::HelperIntent => format!(
            "{helper}, the {role}, {} (one action).",
            pick_phrase(rng, category.actions())
        ),
        Beat::ToolsEnter => match props.vehicle.as_deref() {
            Some(vehicle) => format!(
                "{helper} rolls the {vehicle} into frame, parking it neatly (one action, realistic rolling)."
            ),
            None => format!("{helper} sets the {tool} down near the problem (one action)."),
        },
        Beat::PrepStation => format!(
            "{helper} lines up the {tool} at a small work spot (one action)."
        ),
        Beat::BuildStep | Beat::ShowWork => format!(
            "Close work beat: {helper} {} with realistic weight (still/slow).",
            pick_phrase(rng, category.actions())
        ),
        Beat::Travel => format!(
            "Movement shot: {helper} leads the route while {hero} follows slower (one motion, slow tracking)."
        ),
        Beat::Obstacle => format!(
            "Small complication: {}; {helper} freezes for readability (still).",
            pick_phrase(rng, SMALL_OBSTACLES)
        ),
        Beat::Adjust => format!(
            "Micro-adjustment: {helper} {} (one action).",
            pick_phrase(rng, category.actions())
        ),
        Beat::TryGently => format!(
            "{hero} tries gently with one paw while {helper} watches (one motion)."
        ),
        Beat::TryStep => format!(
            "{hero} takes one brave step toward the problem as {helper} steadies the way (one motion)."
        ),
        Beat::Progress => format!(
            "Progress beat: the fix looks closer to working; {hero} watches {helper}, tail giving one tiny wag (still/slow)."
        ),
        Beat::Test => format!(
            "{helper} tests the fix with one light press, watching for any wobble (one action)."
        ),
        Beat::SillyMishap => format!(
            "Silly mishap: {hero} hops too fast, bumping softly into {helper} (safe, one motion)."
        ),
        Beat::GiggleFreeze => format!(
            "{hero} freezes mid-wiggle, ears flopping, as {helper} blinks once (still)."
        ),
        Beat::FriendJoin => match friend {
            Some(friend) => format!("{friend} trots in to stand beside {hero} (one motion)."),
            None => format!("{hero} scoots a little closer to the problem (one motion)."),
        },
        Beat::TeamCarry => match friend {
            Some(friend) => format!(
                "{friend} helps {helper} carry the {tool} while {hero} walks alongside (one shared motion)."
            ),
            None => format!(
                "{hero} helps {helper} carry the {tool} across the frame (one shared motion)."
            ),
        },
        Beat::BraveBreath => format!(
            "{hero} takes one slow breath near {helper}, gathering courage (still)."
        ),
        Beat::Attempt1 => format!(
            "Attempt 1: {helper} {}; it fails visibly but safely (one action).",
            pick_phrase(rng, category.actions())
        ),
        Beat::ReactionPause => format!(
            "Reaction pause: {hero} stares at the result next to {helper} (still/slow), body language shows quiet puzzlement."
        ),
        Beat::Attempt2 => format!(
            "Attempt 2: {helper} changes one key variable, then {} (one action).",
            pick_phrase(rng, category.actions())
        ),
        Beat::Success if bittersweet => format!(
            "The fix only half holds; {hero} leans close to {helper}, calm (still)."
        ),
        Beat::Success => format!(
            "Success: {helper}'s adjustment works, {problem} is resolved cleanly (one readable action)."
        ),
        Beat::Resolution if bittersweet => format!(
            "{helper} settles close beside {hero}, the problem still there but calm (still)."
        ),
        Beat::Resolution => format!(
            "Resolution: {helper} {}, leaving everything safe (one action).",
            pick_phrase(rng, category.actions())
        ),
        Beat::Joy if bittersweet => format!(
            "{hero} rests close beside {helper}, soft eyes, accepting the moment (still)."
        ),
        Beat::Joy => match object {
            Some(obj) => format!(
                "{hero} reacts with visible joy (tail wag, soft eyes, tiny blep), stepping closer to the {obj} (one motion)."
            ),
            None => format!(
                "{hero} reacts with visible joy (tail wag, soft eyes, tiny blep), stepping closer to {helper} (one motion)."
            ),
        },
        Beat::Accept => format!(
            "{hero} looks at the unfinished problem once, then lowers its head to accept it calmly (one motion)."
        ),
        Beat::ComfortGift => match object {
            Some(obj) => format!(
                "{helper} nudges the {obj} toward {hero} as a small comfort (one action)."
            ),
            None => format!(
                "{helper} places a soft leaf beside {hero} as a small comfort (one action)."
            ),
        },
        Beat::SoftReframe => format!(
            "{hero} turns toward a new small joy nearby, tail relaxing (one motion)."
        ),
        Beat::CalmEcho if bittersweet => format!(
            "Calm closing echo in {location} under {weather}. {hero} rests close beside {helper}, comforted (still)."
        ),
        Beat::CalmEcho => format!(
            "Calm closing echo in {location} under {weather}. {hero} stays near {helper}, both safe, relaxed (still)."
        ),
        Beat::ExtraCute => match object {
            Some(obj) => format!(
                "Extra cute beat: {hero} gently taps the {obj} once, then settles (one motion)."
            ),
            None => format!(
                "Extra cute beat: {hero} gives {helper} one soft nose boop, then settles (one motion)."
            ),
        },
        Beat::Custom(_) => format!(
            "{hero} {} while staying focused on the goal (one motion).",
            pick_phrase(rng, ONE_MOVES)
        ),
    }
}

/// Render a beat sequence into numbered scene lines.
pub fn render_scenes(
    beats: &[Beat],
    ctx: &GenerationContext<'_>,
    rng: &mut dyn RandomSource,
) -> Vec<String> {
    beats
        .iter()
        .enumerate()
        .map(|(i, beat)| format!("Scene {}: {}", i + 1, render_beat(beat, ctx, rng)))
        .collect()
}
