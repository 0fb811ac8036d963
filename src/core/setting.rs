/// Location/weather sanitizer.
///
/// Keeps physically incoherent pairs (snow on a beach, heatwave on a
/// glacier, rain in a kitchen) from reaching the renderer.
use crate::core::random::{pick, RandomSource};

const INDOOR_KEYWORDS: &[&str] = &[
    "kitchen",
    "living room",
    "bedroom",
    "indoor",
    "inside",
    "house",
    "garage",
    "workshop",
    "barn",
    "classroom",
    "library",
    "cafe",
];

const INDOOR_LIGHTING: &[&str] = &[
    "Warm indoor lamp light, cozy still air",
    "Soft window light, calm indoor air",
    "Golden evening lamp glow indoors",
];

const HOT_LOCATION_KEYWORDS: &[&str] = &[
    "beach", "desert", "tropical", "jungle", "island", "savanna", "oasis",
];

const COLD_WEATHER_KEYWORDS: &[&str] = &["snow", "winter", "frost", "blizzard", "icy", "freezing"];

const COLD_LOCATION_KEYWORDS: &[&str] = &[
    "snow", "arctic", "glacier", "icy", "frozen", "tundra", "igloo", "polar",
];

const HOT_WEATHER_KEYWORDS: &[&str] = &["hot", "heat", "scorching", "blazing", "tropical"];

const WARM_REPLACEMENT: &str = "Sunny warm afternoon, gentle sea breeze";
const COLD_REPLACEMENT: &str = "Crisp winter morning, soft falling snow";

fn mentions(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}

pub fn is_indoor(location: &str) -> bool {
    mentions(location, INDOOR_KEYWORDS)
}

/// Resolve the weather for a location.
///
/// Rules, first match wins:
/// 1. indoor location: an indoor lighting phrase replaces the weather
///    (kept as-is if it already is one);
/// 2. hot location with cold weather: fixed warm phrase;
/// 3. cold (and not also hot) location with hot weather: fixed cold phrase;
/// 4. otherwise the weather passes through.
///
/// Only rule 1 draws, and only when it has to replace the weather, so the
/// sanitizer is a fixed point on its own output.
pub fn sanitize_weather(location: &str, weather: &str, rng: &mut dyn RandomSource) -> String {
    if is_indoor(location) {
        if INDOOR_LIGHTING.contains(&weather) {
            return weather.to_string();
        }
        return pick(rng, INDOOR_LIGHTING)
            .copied()
            .unwrap_or(INDOOR_LIGHTING[0])
            .to_string();
    }
    if mentions(location, HOT_LOCATION_KEYWORDS) && mentions(weather, COLD_WEATHER_KEYWORDS) {
        return WARM_REPLACEMENT.to_string();
    }
    if mentions(location, COLD_LOCATION_KEYWORDS)
        && !mentions(location, HOT_LOCATION_KEYWORDS)
        && mentions(weather, HOT_WEATHER_KEYWORDS)
    {
        return COLD_REPLACEMENT.to_string();
    }
    weather.to_string()
}
