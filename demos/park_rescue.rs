/// Park Rescue example — one story per type over the shipped catalog.
///
/// Loads `story_data/config.ron`, then generates a story for each of the
/// five types with a fixed seed, printing the document for the Brave story
/// and a one-line summary for the rest.
///
/// Run with: cargo run --example park_rescue

use silent_story_engine::core::pipeline::StoryEngine;
use silent_story_engine::core::random::SeededSource;
use silent_story_engine::schema::options::StoryOptions;
use silent_story_engine::schema::story_type::StoryType;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "silent_story_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let engine = StoryEngine::builder()
        .config_path("story_data/config.ron")
        .build()
        .expect("Failed to build engine");

    // --- Brave: full document ---
    let brave = StoryOptions::new("Brave")
        .with_location("Park meadow — soft grass, big tree, distant hills")
        .with_weather("Spring morning, soft sunlight, mild breeze");
    let mut rng = SeededSource::new(1993);
    let document = engine
        .generate_story_frame(&brave, &mut rng)
        .expect("Brave story failed");
    println!("{document}\n");

    // --- Every type: summary line ---
    println!("=== One story per type ===\n");
    for (offset, story_type) in StoryType::ALL.iter().enumerate() {
        let options = StoryOptions::new(story_type.name()).with_location("Sunny beach with shells");
        let mut rng = SeededSource::new(2024 + offset as u64);
        match engine.generate(&options, &mut rng) {
            Ok(frame) => println!(
                "{:<10} {:>2} scenes  helper={:<9} ending={:?} attempts={} validated={}\n           {}",
                story_type.name(),
                frame.scenes.len(),
                frame.helper_animal,
                frame.ending_mode,
                frame.attempts,
                frame.validated,
                frame.title,
            ),
            Err(e) => println!("{:<10} ERROR: {e}", story_type.name()),
        }
    }

    // --- Indoor location: weather is replaced with lamp light ---
    let indoor = StoryOptions::new("Emotional")
        .with_location("Cozy kitchen by the stove")
        .with_weather("Heavy rain storm");
    let mut rng = SeededSource::new(7);
    let frame = engine.generate(&indoor, &mut rng).expect("Emotional story failed");
    println!("\nIndoor weather resolved to: {}", frame.weather);
}
