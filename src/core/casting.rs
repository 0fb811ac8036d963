/// Casting — triad binding, friends, and scene count.
use crate::core::random::{pick, pick_index, rand_int_inclusive, RandomSource};
use crate::schema::story_type::StoryType;
use crate::schema::triad::{Props, Triad, TriadCatalog};

/// A selected triad plus the helper animal drawn from it.
///
/// Problem, role, props, and helper always come from the same triad; a
/// retry replaces the whole binding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriadBinding<'a> {
    triad: &'a Triad,
    helper_animal: &'a str,
}

impl<'a> TriadBinding<'a> {
    pub fn triad(&self) -> &'a Triad {
        self.triad
    }

    pub fn helper_animal(&self) -> &'a str {
        self.helper_animal
    }

    pub fn helper_role(&self) -> &'a str {
        &self.triad.helper_role
    }

    pub fn problem(&self) -> &'a str {
        &self.triad.problem
    }

    pub fn props(&self) -> &'a Props {
        &self.triad.props
    }
}

/// Bind a triad for `story_type`: one draw for the triad, one for the helper.
///
/// When `previous` is given and another candidate exists, the previous
/// triad is excluded so a retry lands on different content. Returns `None`
/// when no triad supports the type (or the chosen triad has no helpers).
pub fn bind_triad<'a>(
    story_type: StoryType,
    catalog: &'a TriadCatalog,
    previous: Option<&Triad>,
    rng: &mut dyn RandomSource,
) -> Option<TriadBinding<'a>> {
    let mut candidates = catalog.matching(story_type);
    if let Some(previous) = previous {
        if candidates.len() > 1 {
            candidates.retain(|t| !std::ptr::eq(*t, previous));
        }
    }

    let triad = *pick(rng, &candidates)?;
    let helper_animal = pick(rng, &triad.allowed_helpers)?.as_str();
    Some(TriadBinding {
        triad,
        helper_animal,
    })
}

/// Random friends for a story type, drawn from `companions`.
///
/// Types that disallow friends always get an empty list without drawing.
/// Friendship leans toward company: half the time both companions, else
/// one. Other types: 35% none, 40% one, 25% both.
pub fn pick_friends(
    story_type: StoryType,
    companions: &[String],
    rng: &mut dyn RandomSource,
) -> Vec<String> {
    if !story_type.allows_friends() || companions.is_empty() {
        return Vec::new();
    }

    let both: Vec<String> = companions.iter().take(2).cloned().collect();
    let r = rng.next_f64();

    let count = if story_type == StoryType::Friendship {
        if r < 0.5 {
            2
        } else {
            1
        }
    } else if r < 0.35 {
        0
    } else if r < 0.75 {
        1
    } else {
        2
    };

    match count {
        0 => Vec::new(),
        1 => {
            let index = pick_index(rng, both.len());
            vec![both[index].clone()]
        }
        _ => both,
    }
}

/// Uniform scene count within the story type's range.
pub fn resolve_scene_count(story_type: StoryType, rng: &mut dyn RandomSource) -> usize {
    rand_int_inclusive(rng, story_type.min_scenes(), story_type.max_scenes())
}
