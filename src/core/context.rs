/// Generation context — the working record of one generation attempt.
use crate::core::casting::TriadBinding;
use crate::schema::story_type::{EndingMode, StoryType};
use crate::schema::triad::{Props, Triad};

/// Everything the renderer and validator need for one attempt.
///
/// The context is owned by a single generation call. On retry only the
/// triad binding and the title are replaced; ending mode, scene count,
/// friends, and setting stay fixed.
#[derive(Debug, Clone)]
pub struct GenerationContext<'a> {
    pub story_type: StoryType,
    pub ending_mode: EndingMode,
    pub scene_count: usize,
    pub binding: TriadBinding<'a>,
    pub hero: String,
    pub friends: Vec<String>,
    pub location: String,
    pub weather: String,
    pub title: String,
}

impl<'a> GenerationContext<'a> {
    pub fn triad(&self) -> &'a Triad {
        self.binding.triad()
    }

    pub fn problem(&self) -> &'a str {
        self.binding.problem()
    }

    pub fn helper_animal(&self) -> &'a str {
        self.binding.helper_animal()
    }

    pub fn helper_role(&self) -> &'a str {
        self.binding.helper_role()
    }

    pub fn props(&self) -> &'a Props {
        self.binding.props()
    }

    pub fn object_of_affection(&self) -> Option<&'a str> {
        self.props().object_of_affection()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn accessors_follow_binding() {
        let catalog = bridge_catalog();
        let ctx = context(&catalog, StoryType::Brave, EndingMode::Positive, 16);
        assert_eq!(ctx.problem(), "the bridge is too narrow");
        assert_eq!(ctx.helper_animal(), "Beaver");
        assert_eq!(ctx.helper_role(), "builder");
        assert_eq!(ctx.object_of_affection(), Some("red rubber ball"));
        assert!(std::ptr::eq(ctx.triad(), &catalog.triads[0]));
    }
}
