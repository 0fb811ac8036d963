//! WASM bindings for silent-story-engine — powers the interactive web demo.

use wasm_bindgen::prelude::*;

use silent_story_engine::core::pipeline::StoryEngine;
use silent_story_engine::core::random::SeededSource;
use silent_story_engine::schema::options::StoryOptions;
use silent_story_engine::schema::story_type::StoryType;

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct StoryTypeInfo {
    name: &'static str,
    min_scenes: usize,
    max_scenes: usize,
    allows_friends: bool,
}

fn parse_options(options_json: &str) -> Result<StoryOptions, JsError> {
    if options_json.trim().is_empty() {
        return Ok(StoryOptions::default());
    }
    serde_json::from_str(options_json)
        .map_err(|e| JsError::new(&format!("Invalid options JSON: {e}")))
}

fn builtin_engine() -> Result<StoryEngine, JsError> {
    StoryEngine::builder()
        .build()
        .map_err(|e| JsError::new(&format!("Engine error: {e}")))
}

// ---------------------------------------------------------------------------
// One-shot entry points
// ---------------------------------------------------------------------------

/// Generate a story document from options JSON using the built-in catalog.
#[wasm_bindgen]
pub fn generate_story(options_json: &str, seed: u64) -> Result<String, JsError> {
    let options = parse_options(options_json)?;
    let mut rng = SeededSource::new(seed);
    builtin_engine()?
        .generate_story_frame(&options, &mut rng)
        .map_err(|e| JsError::new(&format!("Generation error: {e}")))
}

/// Generate a story and return the full frame (scenes, contract,
/// diagnostics) as JSON.
#[wasm_bindgen]
pub fn generate_story_json(options_json: &str, seed: u64) -> Result<String, JsError> {
    let options = parse_options(options_json)?;
    let mut rng = SeededSource::new(seed);
    let frame = builtin_engine()?
        .generate(&options, &mut rng)
        .map_err(|e| JsError::new(&format!("Generation error: {e}")))?;
    serde_json::to_string(&frame).map_err(|e| JsError::new(&format!("Serialization error: {e}")))
}

// ---------------------------------------------------------------------------
// Stateful demo session
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct StoryDemo {
    engine: StoryEngine,
    seed: u64,
}

#[wasm_bindgen]
impl StoryDemo {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Result<StoryDemo, JsError> {
        Ok(StoryDemo {
            engine: builtin_engine()?,
            seed,
        })
    }

    /// Generate the next story document. Each call advances the seed so
    /// repeated clicks produce different stories.
    pub fn generate(&mut self, options_json: &str) -> Result<String, JsError> {
        let options = parse_options(options_json)?;
        let mut rng = SeededSource::new(self.seed);
        self.seed = self.seed.wrapping_add(1);
        self.engine
            .generate_story_frame(&options, &mut rng)
            .map_err(|e| JsError::new(&format!("Generation error: {e}")))
    }

    /// Return JSON describing the five story types.
    pub fn story_types() -> String {
        let types: Vec<StoryTypeInfo> = StoryType::ALL
            .iter()
            .map(|t| StoryTypeInfo {
                name: t.name(),
                min_scenes: t.min_scenes(),
                max_scenes: t.max_scenes(),
                allows_friends: t.allows_friends(),
            })
            .collect();
        serde_json::to_string(&types).unwrap_or_else(|_| "[]".to_string())
    }

    /// Number of triads in the loaded catalog.
    pub fn triad_count(&self) -> usize {
        self.engine.catalog().len()
    }

    /// Reset the session with a new seed.
    pub fn reset(&mut self, seed: u64) {
        self.seed = seed;
    }
}
