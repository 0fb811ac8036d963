/// Catalog Linter — validates triad catalogs and beat templates.
///
/// Usage: catalog_linter <catalog.ron | catalog_dir> [--templates <path>]

use silent_story_engine::core::beats::BeatRegistry;
use silent_story_engine::core::ending::EndingPolicy;
use silent_story_engine::schema::story_type::{EndingMode, StoryType};
use silent_story_engine::schema::triad::TriadCatalog;
use std::path::Path;
use std::process;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "silent_story_engine=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: catalog_linter <catalog.ron | catalog_dir> [--templates <path>]");
        process::exit(0);
    }

    let catalog_arg = &args[1];
    let mut templates_path = None;

    let mut i = 2;
    while i < args.len() {
        if args[i] == "--templates" && i + 1 < args.len() {
            i += 1;
            templates_path = Some(args[i].clone());
        }
        i += 1;
    }

    let mut catalog = TriadCatalog::default();
    let catalog_path = Path::new(catalog_arg);

    if catalog_path.is_file() {
        match TriadCatalog::load_from_ron(catalog_path) {
            Ok(loaded) => catalog.merge(loaded),
            Err(e) => {
                eprintln!("ERROR: Failed to load catalog file: {}", e);
                process::exit(1);
            }
        }
    } else if catalog_path.is_dir() {
        load_catalogs_recursive(catalog_path, &mut catalog);
    } else {
        eprintln!("ERROR: Path '{}' does not exist", catalog_arg);
        process::exit(1);
    }

    println!("Loaded {} triads", catalog.len());

    let mut templates = BeatRegistry::builtin();
    if let Some(ref path) = templates_path {
        match BeatRegistry::load_from_ron(Path::new(path)) {
            Ok(loaded) => templates.merge(loaded),
            Err(e) => {
                eprintln!("ERROR: Failed to load templates: {}", e);
                process::exit(1);
            }
        }
    }

    let report = catalog.lint();
    let mut errors = report.errors;
    let warnings = report.warnings;
    errors.extend(missing_templates(&templates));

    println!("\n=== Catalog Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn load_catalogs_recursive(dir: &Path, catalog: &mut TriadCatalog) {
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                load_catalogs_recursive(&path, catalog);
            } else if path.extension().and_then(|s| s.to_str()) == Some("ron") {
                match TriadCatalog::load_from_ron(&path) {
                    Ok(loaded) => {
                        println!("  Loaded: {}", path.display());
                        catalog.merge(loaded);
                    }
                    Err(e) => {
                        eprintln!("  ERROR loading {}: {}", path.display(), e);
                    }
                }
            }
        }
    }
}

/// Every story type needs a positive template; types eligible for
/// bittersweet endings under the default policy also need that variant.
fn missing_templates(templates: &BeatRegistry) -> Vec<String> {
    let policy = EndingPolicy::default();
    let mut missing = Vec::new();
    for story_type in StoryType::ALL {
        let mut modes = vec![EndingMode::Positive];
        if policy.is_eligible(story_type) {
            modes.push(EndingMode::Bittersweet);
        }
        for mode in modes {
            let key = story_type.template_key(mode);
            if templates.template(&key).is_none() {
                missing.push(format!("no beat template '{}' for {}", key, story_type));
            }
        }
    }
    missing
}
