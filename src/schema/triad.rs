use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use super::story_type::StoryType;
use crate::core::render::HelperCategory;
use crate::core::validate::count_and;

const BUILTIN_CATALOG: &str = include_str!("../../story_data/triads.ron");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid triad #{index}: {reason}")]
    InvalidTriad { index: usize, reason: String },
}

/// Recurring physical objects that travel with a triad.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Props {
    /// The hero's object of affection, if the story has one.
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub vehicle: Option<String>,
}

impl Props {
    /// The object of affection, treating blank or `"none"` as absent.
    pub fn object_of_affection(&self) -> Option<&str> {
        self.object
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty() && !o.eq_ignore_ascii_case("none"))
    }

    /// First listed tool, if any.
    pub fn primary_tool(&self) -> Option<&str> {
        self.tools.first().map(String::as_str)
    }
}

/// A problem bundled with the helper role, helper animals, and props that
/// belong to it. Triads are read-only; a retry picks another triad rather
/// than editing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triad {
    pub problem: String,
    pub helper_role: String,
    /// Helper animals that fit the role. Order is significant for
    /// reproducible selection.
    pub allowed_helpers: Vec<String>,
    #[serde(default)]
    pub props: Props,
    pub story_types: FxHashSet<StoryType>,
}

impl Triad {
    pub fn supports(&self, story_type: StoryType) -> bool {
        self.story_types.contains(&story_type)
    }
}

/// An ordered collection of triads supplied to the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriadCatalog {
    pub triads: Vec<Triad>,
}

/// Errors and warnings produced by [`TriadCatalog::lint`].
#[derive(Debug, Clone, Default)]
pub struct CatalogReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl CatalogReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

impl TriadCatalog {
    pub fn new(triads: Vec<Triad>) -> Self {
        Self { triads }
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<TriadCatalog, CatalogError> {
        Self::parse_ron(BUILTIN_CATALOG)
    }

    /// Load a catalog from a RON file containing a list of triads.
    pub fn load_from_ron(path: &Path) -> Result<TriadCatalog, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a catalog from a RON string. Invariants are not checked here;
    /// call [`TriadCatalog::validate`].
    pub fn parse_ron(input: &str) -> Result<TriadCatalog, CatalogError> {
        let triads: Vec<Triad> = ron::from_str(input)?;
        Ok(TriadCatalog { triads })
    }

    /// Append the triads of `other` after this catalog's triads.
    pub fn merge(&mut self, other: TriadCatalog) {
        self.triads.extend(other.triads);
    }

    pub fn len(&self) -> usize {
        self.triads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triads.is_empty()
    }

    /// Triads applicable to `story_type`, in catalog order.
    pub fn matching(&self, story_type: StoryType) -> Vec<&Triad> {
        self.triads.iter().filter(|t| t.supports(story_type)).collect()
    }

    /// Check that every triad has at least one helper animal and at least
    /// one story type.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (index, triad) in self.triads.iter().enumerate() {
            if let Some(reason) = invariant_violation(triad) {
                return Err(CatalogError::InvalidTriad { index, reason });
            }
        }
        Ok(())
    }

    /// Report invariant violations as errors plus content that is likely
    /// to render poorly as warnings.
    pub fn lint(&self) -> CatalogReport {
        let mut report = CatalogReport::default();

        for (index, triad) in self.triads.iter().enumerate() {
            if let Some(reason) = invariant_violation(triad) {
                report
                    .errors
                    .push(format!("triad #{} ('{}'): {}", index, triad.problem, reason));
            }
            if HelperCategory::classify(&triad.helper_role) == HelperCategory::General {
                report.warnings.push(format!(
                    "triad #{} ('{}'): helper role '{}' matches no category, generic phrasing will be used",
                    index, triad.problem, triad.helper_role
                ));
            }
            if count_and(&triad.problem) >= 3 {
                report.warnings.push(format!(
                    "triad #{} ('{}'): problem text uses 'and' 3+ times, scenes quoting it will fail readability",
                    index, triad.problem
                ));
            }
        }

        for story_type in StoryType::ALL {
            if self.matching(story_type).is_empty() {
                report
                    .warnings
                    .push(format!("no triad supports story type {}", story_type));
            }
        }

        report
    }
}

fn invariant_violation(triad: &Triad) -> Option<String> {
    if triad.allowed_helpers.is_empty() {
        return Some("allowed_helpers is empty".to_string());
    }
    if triad.story_types.is_empty() {
        return Some("story_types is empty".to_string());
    }
    None
}
