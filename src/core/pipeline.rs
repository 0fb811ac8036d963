/// The story pipeline: options → context → beats → scenes → document.
///
/// Wires together ending selection, triad binding, beat expansion, scene
/// rendering, validation, and the bounded retry loop.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::beats::{expand_beats, BeatError, BeatRegistry};
use crate::core::casting::{bind_triad, pick_friends, resolve_scene_count};
use crate::core::context::GenerationContext;
use crate::core::ending::EndingPolicy;
use crate::core::frame::{build_title, StoryContract, StoryFrame};
use crate::core::random::RandomSource;
use crate::core::render::render_scenes;
use crate::core::setting::sanitize_weather;
use crate::core::validate::check_story;
use crate::schema::options::{non_blank, StoryOptions};
use crate::schema::story_type::{ParseStoryTypeError, StoryType};
use crate::schema::triad::{CatalogError, TriadCatalog};

#[derive(Debug, Error)]
pub enum StoryError {
    #[error("{0}")]
    UnknownStoryType(#[from] ParseStoryTypeError),
    #[error("no triad in the catalog supports story type {0}")]
    NoTriadForType(StoryType),
    #[error("beat template not found: {0}")]
    MissingTemplate(String),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("beat template error: {0}")]
    Beats(#[from] BeatError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Engine-wide settings, loadable from RON. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub hero: String,
    pub series_title: String,
    /// Pool that random friends are drawn from (first two entries).
    pub companions: Vec<String>,
    pub default_location: String,
    pub default_weather: String,
    /// Re-rolls allowed after the initial attempt.
    pub max_retries: u32,
    pub ending: EndingPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hero: "Willy".to_string(),
            series_title: "Willy & Friends".to_string(),
            companions: vec!["Pip the kitten".to_string(), "Bun the bunny".to_string()],
            default_location: "Park meadow — soft grass, big tree, distant hills".to_string(),
            default_weather: "Spring morning, soft sunlight, mild breeze".to_string(),
            max_retries: 3,
            ending: EndingPolicy::default(),
        }
    }
}

impl EngineConfig {
    pub fn load_from_ron(path: &Path) -> Result<EngineConfig, StoryError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&contents)?)
    }
}

/// The story engine. Built via `StoryEngine::builder()`.
///
/// The engine holds only immutable data; every call to [`generate`]
/// owns its own context and draws only from the source it is handed.
///
/// [`generate`]: StoryEngine::generate
#[derive(Debug, Clone)]
pub struct StoryEngine {
    catalog: TriadCatalog,
    templates: BeatRegistry,
    config: EngineConfig,
}

/// Builder for constructing a `StoryEngine`.
#[derive(Debug, Default)]
pub struct StoryEngineBuilder {
    catalog_paths: Vec<PathBuf>,
    templates_paths: Vec<PathBuf>,
    config_path: Option<PathBuf>,
    /// Directly provided catalog (for testing without files).
    catalog: Option<TriadCatalog>,
    /// Directly provided templates, merged over the built-ins.
    templates: Option<BeatRegistry>,
    /// Directly provided config (for testing without files).
    config: Option<EngineConfig>,
}

impl StoryEngine {
    pub fn builder() -> StoryEngineBuilder {
        StoryEngineBuilder::default()
    }

    pub fn catalog(&self) -> &TriadCatalog {
        &self.catalog
    }

    pub fn templates(&self) -> &BeatRegistry {
        &self.templates
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generate a story and return the rendered document.
    pub fn generate_story_frame(
        &self,
        options: &StoryOptions,
        rng: &mut dyn RandomSource,
    ) -> Result<String, StoryError> {
        Ok(self.generate(options, rng)?.render())
    }

    /// Generate a story.
    ///
    /// Configuration problems (unknown type, no matching triad, missing
    /// template) abort with an error. Validation failures re-roll the triad
    /// up to `max_retries` times; if every attempt fails the last one is
    /// returned with `validated == false`.
    pub fn generate(
        &self,
        options: &StoryOptions,
        rng: &mut dyn RandomSource,
    ) -> Result<StoryFrame, StoryError> {
        let story_type = options.resolve_story_type()?;
        let ending_mode = self.config.ending.decide(story_type, rng);

        let binding = bind_triad(story_type, &self.catalog, None, rng)
            .ok_or(StoryError::NoTriadForType(story_type))?;

        let friends = match &options.friends {
            Some(friends) => friends.clone(),
            None => pick_friends(story_type, &self.config.companions, rng),
        };
        let scene_count = resolve_scene_count(story_type, rng);

        let location = non_blank(options.location.as_deref())
            .unwrap_or(self.config.default_location.as_str())
            .to_string();
        let requested_weather =
            non_blank(options.weather.as_deref()).unwrap_or(self.config.default_weather.as_str());
        let weather = sanitize_weather(&location, requested_weather, rng);

        let key = story_type.template_key(ending_mode);
        let base = self
            .templates
            .template(&key)
            .ok_or_else(|| StoryError::MissingTemplate(key.clone()))?;
        let beats = expand_beats(base, scene_count, story_type, rng);

        let mut ctx = GenerationContext {
            story_type,
            ending_mode,
            scene_count,
            binding,
            hero: self.config.hero.clone(),
            friends,
            location,
            weather,
            title: String::new(),
        };
        ctx.title = build_title(&self.config.series_title, &ctx, rng);
        let mut scenes = render_scenes(&beats, &ctx, rng);

        let mut attempts: u32 = 1;
        let validated = loop {
            match check_story(&scenes, &ctx) {
                Ok(()) => break true,
                Err(failure) => {
                    debug!(
                        attempt = attempts,
                        helper = ctx.helper_animal(),
                        %failure,
                        "story attempt failed validation"
                    );
                    if attempts > self.config.max_retries {
                        warn!(
                            attempts,
                            %story_type,
                            "retries exhausted, emitting last attempt"
                        );
                        break false;
                    }
                }
            }

            ctx.binding = bind_triad(story_type, &self.catalog, Some(ctx.triad()), rng)
                .ok_or(StoryError::NoTriadForType(story_type))?;
            ctx.title = build_title(&self.config.series_title, &ctx, rng);
            scenes = render_scenes(&beats, &ctx, rng);
            attempts += 1;
        };

        debug!(
            %story_type,
            ending = ?ending_mode,
            scene_count,
            attempts,
            validated,
            "story generated"
        );

        let contract = StoryContract::derive(&ctx, rng);
        Ok(StoryFrame::assemble(&ctx, scenes, contract, attempts, validated))
    }
}

/// One-shot generation over a caller-supplied catalog with default config
/// and built-in templates.
pub fn generate_story_frame(
    options: &StoryOptions,
    rng: &mut dyn RandomSource,
    catalog: &TriadCatalog,
) -> Result<String, StoryError> {
    StoryEngine::builder()
        .with_catalog(catalog.clone())
        .build()?
        .generate_story_frame(options, rng)
}

impl StoryEngineBuilder {
    /// Load a triad catalog file. Multiple files are concatenated.
    pub fn catalog_path(mut self, path: impl AsRef<Path>) -> Self {
        self.catalog_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Load beat templates from a file; they override built-ins by key.
    pub fn templates_path(mut self, path: impl AsRef<Path>) -> Self {
        self.templates_paths.push(path.as_ref().to_path_buf());
        self
    }

    pub fn config_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Provide a catalog directly (for testing without files).
    pub fn with_catalog(mut self, catalog: TriadCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Provide templates directly; merged over the built-ins.
    pub fn with_templates(mut self, templates: BeatRegistry) -> Self {
        self.templates = Some(templates);
        self
    }

    /// Provide config directly (for testing without files).
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Assemble the engine. The catalog falls back to the built-in one when
    /// neither a catalog nor a catalog path was given, and is validated
    /// before the engine is returned.
    pub fn build(self) -> Result<StoryEngine, StoryError> {
        let mut catalog = self.catalog;
        for path in &self.catalog_paths {
            let loaded = TriadCatalog::load_from_ron(path)?;
            match catalog.as_mut() {
                Some(existing) => existing.merge(loaded),
                None => catalog = Some(loaded),
            }
        }
        let catalog = match catalog {
            Some(catalog) => catalog,
            None => TriadCatalog::builtin()?,
        };
        catalog.validate()?;

        let mut templates = BeatRegistry::builtin();
        if let Some(custom) = self.templates {
            templates.merge(custom);
        }
        for path in &self.templates_paths {
            templates.merge(BeatRegistry::load_from_ron(path)?);
        }

        let config = match self.config_path {
            Some(path) => EngineConfig::load_from_ron(&path)?,
            None => self.config.unwrap_or_default(),
        };

        debug!(
            triads = catalog.len(),
            templates = templates.templates.len(),
            "story engine built"
        );

        Ok(StoryEngine {
            catalog,
            templates,
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random::{SeededSource, SequenceSource};
    use crate::schema::story_type::EndingMode;

    fn bridge_catalog() -> TriadCatalog {
        TriadCatalog::parse_ron(
            r#"[
                (
                    problem: "the bridge is too narrow",
                    helper_role: "builder",
                    allowed_helpers: ["Beaver"],
                    props: (
                        object: Some("red rubber ball"),
                        tools: ["small wooden plank"],
                    ),
                    story_types: [Brave, Adventure],
                ),
            ]"#,
        )
        .unwrap()
    }

    fn build_test_engine() -> StoryEngine {
        StoryEngine::builder()
            .with_catalog(bridge_catalog())
            .build()
            .unwrap()
    }

    #[test]
    fn builder_defaults() {
        let engine = StoryEngine::builder().build().unwrap();
        assert_eq!(engine.config(), &EngineConfig::default());
        assert!(!engine.catalog().is_empty());
        assert!(engine.templates().template("adventure").is_some());
    }

    #[test]
    fn builder_rejects_invalid_catalog() {
        let catalog = TriadCatalog::parse_ron(
            r#"[(problem: "x", helper_role: "builder", allowed_helpers: [], story_types: [Brave])]"#,
        )
        .unwrap();
        let result = StoryEngine::builder().with_catalog(catalog).build();
        assert!(matches!(
            result,
            Err(StoryError::Catalog(CatalogError::InvalidTriad { index: 0, .. }))
        ));
    }

    #[test]
    fn brave_scene_count_matches() {
        let engine = build_test_engine();
        let mut rng = || 0.1;
        let frame = engine.generate(&StoryOptions::new("Brave"), &mut rng).unwrap();
        assert_eq!(frame.ending_mode, EndingMode::Positive);
        assert_eq!(frame.scenes.len(), 16);
        assert!(frame.validated);
        assert_eq!(frame.attempts, 1);
    }

    #[test]
    fn unknown_type_is_configuration_error() {
        let engine = build_test_engine();
        let mut rng = || 0.1;
        let result = engine.generate(&StoryOptions::new("Unknown"), &mut rng);
        assert!(matches!(result, Err(StoryError::UnknownStoryType(_))));
    }

    #[test]
    fn unsupported_type_is_configuration_error() {
        let engine = build_test_engine();
        let mut rng = || 0.1;
        let result = engine.generate(&StoryOptions::new("Funny"), &mut rng);
        assert!(matches!(
            result,
            Err(StoryError::NoTriadForType(StoryType::Funny))
        ));
    }

    #[test]
    fn missing_template_is_configuration_error() {
        let config = EngineConfig {
            ending: EndingPolicy {
                allow_bittersweet: true,
                bittersweet_chance: 1.0,
                allowed_types: vec![StoryType::Adventure],
            },
            ..EngineConfig::default()
        };
        let engine = StoryEngine::builder()
            .with_catalog(bridge_catalog())
            .with_config(config)
            .build()
            .unwrap();
        let mut rng = || 0.1;
        let result = engine.generate(&StoryOptions::new("Adventure"), &mut rng);
        match result {
            Err(StoryError::MissingTemplate(key)) => assert_eq!(key, "adventure_bittersweet"),
            other => panic!("expected missing template, got {other:?}"),
        }
    }

    #[test]
    fn soft_fail_emits_last_attempt() {
        let catalog = TriadCatalog::parse_ron(
            r#"[
                (
                    problem: "the kite and the rope and the ball and the cart are stuck",
                    helper_role: "builder",
                    allowed_helpers: ["Beaver"],
                    story_types: [Brave],
                ),
            ]"#,
        )
        .unwrap();
        let engine = StoryEngine::builder().with_catalog(catalog).build().unwrap();
        let mut rng = SeededSource::new(7);
        let frame = engine.generate(&StoryOptions::new("Brave"), &mut rng).unwrap();
        assert!(!frame.validated);
        assert_eq!(frame.attempts, 4);
        assert!(frame.scenes.len() >= 16);
    }

    #[test]
    fn retry_budget_is_configurable() {
        let catalog = TriadCatalog::parse_ron(
            r#"[
                (
                    problem: "the kite and the rope and the ball and the cart are stuck",
                    helper_role: "builder",
                    allowed_helpers: ["Beaver"],
                    story_types: [Brave],
                ),
            ]"#,
        )
        .unwrap();
        let config = EngineConfig {
            max_retries: 0,
            ..EngineConfig::default()
        };
        let engine = StoryEngine::builder()
            .with_catalog(catalog)
            .with_config(config)
            .build()
            .unwrap();
        let mut rng = SeededSource::new(7);
        let frame = engine.generate(&StoryOptions::new("Brave"), &mut rng).unwrap();
        assert_eq!(frame.attempts, 1);
    }

    const CROWDED: &str = "the kite and the rope and the ball and the cart are stuck";
    const NARROW: &str = "the bridge is too narrow";

    fn crowded_then_narrow_catalog() -> TriadCatalog {
        TriadCatalog::parse_ron(&format!(
            r#"[
                (
                    problem: "{CROWDED}",
                    helper_role: "builder",
                    allowed_helpers: ["Beaver"],
                    props: (
                        object: Some("red rubber ball"),
                        tools: ["small wooden plank"],
                    ),
                    story_types: [Brave],
                ),
                (
                    problem: "{NARROW}",
                    helper_role: "builder",
                    allowed_helpers: ["Otter"],
                    props: (
                        object: Some("red rubber ball"),
                        tools: ["small wooden plank"],
                    ),
                    story_types: [Brave],
                ),
            ]"#
        ))
        .unwrap()
    }

    #[test]
    fn retry_recovers_with_next_triad() {
        let engine = StoryEngine::builder()
            .with_catalog(crowded_then_narrow_catalog())
            .build()
            .unwrap();
        let options = StoryOptions::new("Brave");
        let recovered = engine.generate(&options, &mut || 0.0).unwrap();

        assert_eq!(recovered.attempts, 2);
        assert!(recovered.validated);
        assert_eq!(recovered.problem, NARROW);
        assert_eq!(recovered.helper_animal, "Otter");

        // Same draws with no retry budget: the emitted story is the first attempt.
        let first_only = StoryEngine::builder()
            .with_catalog(crowded_then_narrow_catalog())
            .with_config(EngineConfig {
                max_retries: 0,
                ..EngineConfig::default()
            })
            .build()
            .unwrap();
        let first = first_only.generate(&options, &mut || 0.0).unwrap();
        assert_eq!(first.attempts, 1);
        assert!(!first.validated);
        assert_eq!(first.problem, CROWDED);

        // The retry rebinds the triad only; ending, length and beat order stay.
        assert_eq!(first.ending_mode, recovered.ending_mode);
        assert_eq!(first.scenes.len(), recovered.scenes.len());
        for (before, after) in first.scenes.iter().zip(&recovered.scenes) {
            let before = before.replace(CROWDED, "PROBLEM").replace("Beaver", "HELPER");
            let after = after.replace(NARROW, "PROBLEM").replace("Otter", "HELPER");
            assert_eq!(before, after);
        }
    }

    #[test]
    fn explicit_friends_skip_the_draw() {
        let engine = build_test_engine();
        let options = StoryOptions::new("Adventure").with_friends(&["Tilly the fox"]);
        let mut with_friends = SequenceSource::new(vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7]);
        let frame = engine.generate(&options, &mut with_friends).unwrap();
        assert_eq!(frame.friends, vec!["Tilly the fox".to_string()]);
    }

    #[test]
    fn defaults_fill_location_and_weather() {
        let engine = build_test_engine();
        let mut rng = || 0.1;
        let frame = engine.generate(&StoryOptions::new("Brave"), &mut rng).unwrap();
        assert_eq!(frame.location, engine.config().default_location);
        assert_eq!(frame.weather, engine.config().default_weather);
        assert_eq!(frame.hero, "Willy");
    }

    #[test]
    fn document_wrapper_matches_frame() {
        let engine = build_test_engine();
        let options = StoryOptions::new("Brave");
        let doc = engine.generate_story_frame(&options, &mut || 0.1).unwrap();
        let frame = engine.generate(&options, &mut || 0.1).unwrap();
        assert_eq!(doc, frame.render());
        let one_shot = generate_story_frame(&options, &mut || 0.1, &bridge_catalog()).unwrap();
        assert_eq!(doc, one_shot);
    }
}
