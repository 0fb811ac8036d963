/// Story Preview — interactive generation shell for checking catalogs and
/// templates.
///
/// Usage: story_preview [--catalog <path>] [--templates <path>] [--config <path>] [--seed <n>]
///
/// Commands:
///   type <name>          — set story type (Emotional, Funny, Brave, Friendship, Adventure)
///   location <text>      — set location ('none' to use the default)
///   weather <text>       — set weather ('none' to use the default)
///   friends <a,b|none>   — set an explicit friends list ('auto' for random)
///   seed <n>             — set RNG seed
///   gen                  — generate one story document
///   bulk <n>             — generate n stories with retry statistics
///   help                 — list commands
///   quit                 — exit

use silent_story_engine::core::pipeline::StoryEngine;
use silent_story_engine::core::random::SeededSource;
use silent_story_engine::schema::options::StoryOptions;
use silent_story_engine::schema::story_type::{EndingMode, StoryType};
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
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

    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        print_usage();
        return;
    }

    let mut builder = StoryEngine::builder();
    let mut seed: u64 = 42;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--catalog" if i + 1 < args.len() => {
                i += 1;
                builder = builder.catalog_path(&args[i]);
            }
            "--templates" if i + 1 < args.len() => {
                i += 1;
                builder = builder.templates_path(&args[i]);
            }
            "--config" if i + 1 < args.len() => {
                i += 1;
                builder = builder.config_path(&args[i]);
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().unwrap_or(42);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let engine = match builder.build() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    println!("Loaded {} triads", engine.catalog().len());
    println!("Seed: {}", seed);
    println!("Type 'help' for commands.\n");

    let mut options = StoryOptions::new(StoryType::default().name());
    let mut current_seed = seed;

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("story> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
            None => (line.to_lowercase(), ""),
        };

        match cmd.as_str() {
            "quit" | "exit" | "q" => {
                println!("Goodbye.");
                break;
            }
            "help" | "h" | "?" => {
                print_help();
            }
            "type" => {
                if rest.is_empty() {
                    println!(
                        "Current type: {}",
                        options.story_type.as_deref().unwrap_or("Adventure")
                    );
                    continue;
                }
                match rest.parse::<StoryType>() {
                    Ok(story_type) => {
                        options.story_type = Some(story_type.name().to_string());
                        println!(
                            "Type set to {} ({}-{} scenes)",
                            story_type,
                            story_type.min_scenes(),
                            story_type.max_scenes()
                        );
                    }
                    Err(e) => println!("{}", e),
                }
            }
            "location" => {
                options.location = optional_text(rest);
                println!(
                    "Location: {}",
                    options.location.as_deref().unwrap_or("(default)")
                );
            }
            "weather" => {
                options.weather = optional_text(rest);
                println!(
                    "Weather: {}",
                    options.weather.as_deref().unwrap_or("(default)")
                );
            }
            "friends" => match rest {
                "" => println!("Friends: {:?}", options.friends),
                "auto" => {
                    options.friends = None;
                    println!("Friends will be chosen randomly.");
                }
                "none" => {
                    options.friends = Some(Vec::new());
                    println!("Friends cleared.");
                }
                list => {
                    let friends: Vec<String> = list
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect();
                    println!("Friends set to {:?}", friends);
                    options.friends = Some(friends);
                }
            },
            "seed" => {
                if rest.is_empty() {
                    println!("Current seed: {}", current_seed);
                    continue;
                }
                match rest.parse::<u64>() {
                    Ok(s) => {
                        current_seed = s;
                        println!("Seed set to {}", current_seed);
                    }
                    Err(_) => println!("Invalid seed: {}", rest),
                }
            }
            "gen" | "g" => {
                let mut rng = SeededSource::new(current_seed);
                match engine.generate(&options, &mut rng) {
                    Ok(frame) => {
                        println!("\n--- Story Document ---");
                        println!("{}", frame.render());
                        println!("--- End ---");
                        println!(
                            "attempts: {}, validated: {}, lesson: {}\n",
                            frame.attempts, frame.validated, frame.contract.lesson
                        );
                    }
                    Err(e) => println!("ERROR: {}", e),
                }
                current_seed = current_seed.wrapping_add(1);
            }
            "bulk" => {
                let count: usize = match rest.parse() {
                    Ok(n) if n > 0 => n,
                    _ => {
                        println!("Usage: bulk <n>");
                        continue;
                    }
                };
                run_bulk(&engine, &options, current_seed, count);
            }
            _ => {
                println!("Unknown command: {}. Type 'help' for commands.", cmd);
            }
        }
    }
}

fn optional_text(rest: &str) -> Option<String> {
    match rest {
        "" | "none" => None,
        text => Some(text.to_string()),
    }
}

fn run_bulk(engine: &StoryEngine, options: &StoryOptions, seed: u64, count: usize) {
    let mut errors = 0;
    let mut soft_failures = 0;
    let mut attempts_total: u64 = 0;
    let mut helpers: HashMap<String, usize> = HashMap::new();
    let mut scene_counts: HashMap<usize, usize> = HashMap::new();
    let mut bittersweet = 0;

    for offset in 0..count as u64 {
        let mut rng = SeededSource::new(seed.wrapping_add(offset));
        match engine.generate(options, &mut rng) {
            Ok(frame) => {
                attempts_total += u64::from(frame.attempts);
                if !frame.validated {
                    soft_failures += 1;
                }
                if frame.ending_mode == EndingMode::Bittersweet {
                    bittersweet += 1;
                }
                *helpers.entry(frame.helper_animal).or_insert(0) += 1;
                *scene_counts.entry(frame.scenes.len()).or_insert(0) += 1;
            }
            Err(_) => errors += 1,
        }
    }

    let generated = count - errors;
    println!(
        "\n=== Bulk Generation: {} stories ({} errors) ===\n",
        generated, errors
    );
    if generated == 0 {
        return;
    }

    println!(
        "Average attempts: {:.2}",
        attempts_total as f64 / generated as f64
    );
    println!(
        "Emitted unvalidated: {} ({:.1}%)",
        soft_failures,
        100.0 * soft_failures as f64 / generated as f64
    );
    println!("Bittersweet endings: {}", bittersweet);

    let mut counts: Vec<(usize, usize)> = scene_counts.into_iter().collect();
    counts.sort();
    println!("\nScene counts:");
    for (scenes, n) in counts {
        println!("  {:>3} scenes: {}", scenes, n);
    }

    let mut helpers: Vec<(String, usize)> = helpers.into_iter().collect();
    helpers.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    println!("\nHelpers:");
    for (helper, n) in helpers {
        println!("  {:<12} {}", helper, n);
    }
    println!();
}

fn print_usage() {
    println!("Usage: story_preview [--catalog <path>] [--templates <path>] [--config <path>] [--seed <n>]");
    println!();
    println!("Without --catalog the built-in triad catalog is used.");
    println!("Set RUST_LOG=debug to trace attempts and validation failures.");
}

fn print_help() {
    println!("Commands:");
    println!("  type <name>          set story type (Emotional, Funny, Brave, Friendship, Adventure)");
    println!("  location <text>      set location ('none' for the default)");
    println!("  weather <text>       set weather ('none' for the default)");
    println!("  friends <a,b|none>   set explicit friends ('auto' for random)");
    println!("  seed <n>             set RNG seed");
    println!("  gen                  generate one story");
    println!("  bulk <n>             generate n stories with statistics");
    println!("  help                 show this help");
    println!("  quit                 exit");
}
