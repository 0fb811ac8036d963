/// Engine integration tests — options to finished story document.

use silent_story_engine::core::frame::StoryFrame;
use silent_story_engine::core::pipeline::{EngineConfig, StoryEngine, StoryError};
use silent_story_engine::core::random::SeededSource;
use silent_story_engine::schema::options::StoryOptions;
use silent_story_engine::schema::story_type::{EndingMode, StoryType};
use silent_story_engine::schema::triad::TriadCatalog;
use std::path::Path;

const POSITIVE_KEYWORDS: [&str; 7] = [
    "success",
    "resolved",
    "works",
    "completed",
    "fixed",
    "delivered",
    "safe",
];

fn fixture_catalog() -> TriadCatalog {
    TriadCatalog::load_from_ron(Path::new("tests/fixtures/test_catalog.ron")).unwrap()
}

fn fixture_engine() -> StoryEngine {
    StoryEngine::builder()
        .with_catalog(fixture_catalog())
        .build()
        .unwrap()
}

#[test]
fn same_seed_same_document() {
    let engine = fixture_engine();
    for story_type in StoryType::ALL {
        let options = StoryOptions::new(story_type.name());
        let first = engine
            .generate_story_frame(&options, &mut SeededSource::new(99))
            .unwrap();
        let second = engine
            .generate_story_frame(&options, &mut SeededSource::new(99))
            .unwrap();
        assert_eq!(first, second, "{story_type} was not reproducible");
    }
}

#[test]
fn scene_count_stays_in_range() {
    let engine = fixture_engine();
    for story_type in StoryType::ALL {
        for seed in 0..40 {
            let frame = engine
                .generate(&StoryOptions::new(story_type.name()), &mut SeededSource::new(seed))
                .unwrap();
            let count = frame.scenes.len();
            assert!(
                (story_type.min_scenes()..=story_type.max_scenes()).contains(&count),
                "{story_type} seed {seed}: {count} scenes"
            );
            for (i, scene) in frame.scenes.iter().enumerate() {
                assert!(scene.starts_with(&format!("Scene {}: ", i + 1)));
            }
            assert!(frame.render().contains(&format!("SCENES ({count})")));
        }
    }
}

#[test]
fn no_friends_for_solo_types() {
    let engine = fixture_engine();
    for story_type in [StoryType::Emotional, StoryType::Brave] {
        for seed in 0..40 {
            let frame = engine
                .generate(&StoryOptions::new(story_type.name()), &mut SeededSource::new(seed))
                .unwrap();
            assert!(frame.friends.is_empty());
            assert!(frame.render().contains("- Friends (optional): None"));
        }
    }
}

#[test]
fn friendship_always_has_company() {
    let engine = fixture_engine();
    for seed in 0..40 {
        let frame = engine
            .generate(&StoryOptions::new("Friendship"), &mut SeededSource::new(seed))
            .unwrap();
        assert!(!frame.friends.is_empty());
        assert!(frame.friends.len() <= 2);
    }
}

#[test]
fn triad_fields_come_from_one_triad() {
    let catalog = fixture_catalog();
    let engine = fixture_engine();
    for story_type in StoryType::ALL {
        for seed in 0..40 {
            let frame = engine
                .generate(&StoryOptions::new(story_type.name()), &mut SeededSource::new(seed))
                .unwrap();
            let triad = catalog
                .triads
                .iter()
                .find(|t| t.problem == frame.problem)
                .expect("problem not in catalog");
            assert_eq!(triad.helper_role, frame.helper_role);
            assert!(triad.allowed_helpers.contains(&frame.helper_animal));
            assert!(triad.supports(story_type));
            assert_eq!(
                triad.props.object_of_affection(),
                frame.object_of_affection.as_deref()
            );
            assert_eq!(frame.contract.goal, frame.problem);
        }
    }
}

#[test]
fn brave_bridge_story() {
    let engine = fixture_engine();
    let options = StoryOptions::new("Brave").with_location("Park meadow, soft grass");
    let mut rng = || 0.1;
    let frame = engine.generate(&options, &mut rng).unwrap();

    assert_eq!(frame.ending_mode, EndingMode::Positive);
    assert_eq!(frame.problem, "the bridge is too narrow");
    assert_eq!(frame.helper_animal, "Beaver");
    assert_eq!(frame.scenes.len(), 16);

    let doc = frame.render();
    assert_eq!(doc.matches("\nScene ").count(), 16);
    assert!(frame.scenes[0].contains("Park meadow, soft grass"));
    assert!(frame.scenes[0].contains("Willy"));
    assert!(frame.scenes[..6].iter().any(|s| s.contains("bridge")));
    let closing = frame.scenes[11..].join(" ").to_lowercase();
    assert!(POSITIVE_KEYWORDS.iter().any(|k| closing.contains(k)));
    assert!(frame.validated);
}

#[test]
fn unknown_story_type_fails_without_document() {
    let engine = fixture_engine();
    let mut rng = || 0.1;
    let result = engine.generate_story_frame(&StoryOptions::new("Unknown"), &mut rng);
    match result {
        Err(StoryError::UnknownStoryType(e)) => assert_eq!(e.0, "Unknown"),
        other => panic!("expected unknown story type, got {other:?}"),
    }
}

#[test]
fn default_story_type_is_adventure() {
    let engine = fixture_engine();
    let frame = engine
        .generate(&StoryOptions::default(), &mut SeededSource::new(3))
        .unwrap();
    assert_eq!(frame.story_type, StoryType::Adventure);
    assert!(frame.scenes.len() >= 18);
}

#[test]
fn explicit_friends_are_kept() {
    let engine = fixture_engine();
    let options = StoryOptions::new("Funny").with_friends(&["Tilly the fox", "Ned the newt"]);
    let frame = engine.generate(&options, &mut SeededSource::new(5)).unwrap();
    assert_eq!(frame.friends, vec!["Tilly the fox", "Ned the newt"]);
    assert!(frame
        .render()
        .contains("- Friends (optional): Tilly the fox, Ned the newt"));
}

#[test]
fn indoor_location_uses_lamp_light() {
    let engine = fixture_engine();
    let options = StoryOptions::new("Emotional")
        .with_location("Cozy kitchen by the stove")
        .with_weather("Heavy rain storm");
    let frame = engine.generate(&options, &mut SeededSource::new(11)).unwrap();
    assert_ne!(frame.weather, "Heavy rain storm");
    assert!(frame.weather.to_lowercase().contains("indoor")
        || frame.weather.to_lowercase().contains("lamp"));
}

#[test]
fn positive_only_policy_never_bittersweet() {
    let config = EngineConfig {
        ending: silent_story_engine::core::ending::EndingPolicy::positive_only(),
        ..EngineConfig::default()
    };
    let engine = StoryEngine::builder()
        .with_catalog(fixture_catalog())
        .with_config(config)
        .build()
        .unwrap();
    for seed in 0..60 {
        let frame = engine
            .generate(&StoryOptions::new("Emotional"), &mut SeededSource::new(seed))
            .unwrap();
        assert_eq!(frame.ending_mode, EndingMode::Positive);
    }
}

#[test]
fn always_bittersweet_policy_uses_bittersweet_template() {
    let mut config = EngineConfig::default();
    config.ending.bittersweet_chance = 1.0;
    let engine = StoryEngine::builder()
        .with_catalog(fixture_catalog())
        .with_config(config)
        .build()
        .unwrap();
    let frame = engine
        .generate(&StoryOptions::new("Brave"), &mut SeededSource::new(8))
        .unwrap();
    assert_eq!(frame.ending_mode, EndingMode::Bittersweet);
    let closing = frame.scenes[frame.scenes.len() - 5..].join(" ").to_lowercase();
    assert!(["comfort", "accept", "calm", "relax", "beside", "close"]
        .iter()
        .any(|k| closing.contains(k)));
}

#[test]
fn config_and_catalog_from_files() {
    let engine = StoryEngine::builder()
        .catalog_path("tests/fixtures/test_catalog.ron")
        .config_path("tests/fixtures/test_config.ron")
        .build()
        .unwrap();
    assert_eq!(engine.catalog().len(), 3);
    assert_eq!(engine.config().max_retries, 1);

    let frame = engine
        .generate(&StoryOptions::new("Friendship"), &mut SeededSource::new(4))
        .unwrap();
    assert_eq!(frame.hero, "Mo");
    assert!(frame.title.starts_with("Mo's Meadow: Happy Teamwork — "));
    assert_eq!(frame.friends, vec!["Dot the duckling"]);
    assert!(frame.attempts <= 2);
}

#[test]
fn template_file_overrides_builtin() {
    let engine = StoryEngine::builder()
        .with_catalog(fixture_catalog())
        .templates_path("tests/fixtures/test_templates.ron")
        .build()
        .unwrap();
    let funny = engine.templates().template("funny").unwrap();
    assert_eq!(funny[7].tag(), "hop_in_place");
    assert!(engine.templates().template("brave").is_some());

    let frame = engine
        .generate(&StoryOptions::new("Funny"), &mut SeededSource::new(2))
        .unwrap();
    assert!(frame
        .scenes
        .iter()
        .any(|s| s.contains("while staying focused on the goal")));
}

#[test]
fn frame_round_trips_through_json() {
    let engine = fixture_engine();
    let frame = engine
        .generate(&StoryOptions::new("Adventure"), &mut SeededSource::new(21))
        .unwrap();
    let json = serde_json::to_string(&frame).unwrap();
    assert!(json.contains("\"contract\""));
    assert!(json.contains("\"validated\""));
    let parsed: StoryFrame = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.render(), frame.render());
}
