//! Catalog models
//!
//! A [`CatalogItem`] is one title the engine may present. Items arrive as a
//! snapshot assembled by the catalog collaborator; the engine never mutates them.

use crate::language::normalize_language;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::Validate;

/// Movie or series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Movie,
    Series,
}

impl ContentType {
    pub fn is_series(self) -> bool {
        matches!(self, ContentType::Series)
    }
}

/// The eight emotional dimensions every profile vector is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionalDimension {
    Comfort,
    Darkness,
    Intensity,
    Energy,
    Complexity,
    Rewatchability,
    Humour,
    MentalStimulation,
}

impl EmotionalDimension {
    /// All dimensions in canonical order
    pub const ALL: [EmotionalDimension; 8] = [
        EmotionalDimension::Comfort,
        EmotionalDimension::Darkness,
        EmotionalDimension::Intensity,
        EmotionalDimension::Energy,
        EmotionalDimension::Complexity,
        EmotionalDimension::Rewatchability,
        EmotionalDimension::Humour,
        EmotionalDimension::MentalStimulation,
    ];

    /// Number of dimensions
    pub const COUNT: usize = 8;

    /// Position in [`EmotionalDimension::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Upper bound of every emotional dimension
pub const DIMENSION_MAX: f64 = 10.0;

/// Emotional profile of a title, each dimension on a 0–10 scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct EmotionalProfile {
    #[validate(range(min = 0.0, max = 10.0))]
    pub comfort: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub darkness: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub intensity: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub energy: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub complexity: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub rewatchability: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub humour: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub mental_stimulation: f64,
}

impl EmotionalProfile {
    /// Build a profile from values in [`EmotionalDimension::ALL`] order
    pub fn from_array(values: [f64; EmotionalDimension::COUNT]) -> Self {
        Self {
            comfort: values[0],
            darkness: values[1],
            intensity: values[2],
            energy: values[3],
            complexity: values[4],
            rewatchability: values[5],
            humour: values[6],
            mental_stimulation: values[7],
        }
    }

    /// Values in [`EmotionalDimension::ALL`] order
    pub fn to_array(&self) -> [f64; EmotionalDimension::COUNT] {
        [
            self.comfort,
            self.darkness,
            self.intensity,
            self.energy,
            self.complexity,
            self.rewatchability,
            self.humour,
            self.mental_stimulation,
        ]
    }

    pub fn value(&self, dimension: EmotionalDimension) -> f64 {
        self.to_array()[dimension.index()]
    }

    /// Value of a dimension rescaled to [0, 1]
    pub fn normalized(&self, dimension: EmotionalDimension) -> f64 {
        (self.value(dimension) / DIMENSION_MAX).clamp(0.0, 1.0)
    }
}

/// Partially known values over the eight emotional dimensions
///
/// Used wherever some dimensions may be unknown: taste preferences (0–1),
/// explicit post-watch sliders and remote mood targets (0–10).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionVector(pub [Option<f64>; EmotionalDimension::COUNT]);

impl DimensionVector {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, dimension: EmotionalDimension) -> Option<f64> {
        self.0[dimension.index()]
    }

    pub fn set(&mut self, dimension: EmotionalDimension, value: f64) {
        self.0[dimension.index()] = Some(value);
    }

    pub fn with(mut self, dimension: EmotionalDimension, value: f64) -> Self {
        self.set(dimension, value);
        self
    }

    /// Number of known dimensions
    pub fn known(&self) -> usize {
        self.0.iter().filter(|v| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.known() == 0
    }
}

impl From<EmotionalProfile> for DimensionVector {
    fn from(profile: EmotionalProfile) -> Self {
        let mut values = [None; EmotionalDimension::COUNT];
        for (slot, value) in values.iter_mut().zip(profile.to_array()) {
            *slot = Some(value);
        }
        Self(values)
    }
}

/// One title in the catalog snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CatalogItem {
    #[validate(length(min = 1))]
    pub id: String,

    pub title: String,

    /// Language as delivered by the catalog; compared after normalization
    pub language: String,

    pub runtime_minutes: u32,

    /// Streaming platform identifiers (e.g. "netflix", "prime_video")
    #[serde(default)]
    pub platforms: BTreeSet<String>,

    /// Taxonomy tags
    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// Quality score on a 0–100 scale
    #[validate(range(min = 0.0, max = 100.0))]
    pub quality_score: f64,

    pub available: bool,

    pub content_type: ContentType,

    #[serde(default)]
    #[validate(nested)]
    pub emotional_profile: Option<EmotionalProfile>,
}

impl CatalogItem {
    /// Canonical language code of this item
    pub fn normalized_language(&self) -> String {
        normalize_language(&self.language)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Number of tags shared with another item
    pub fn shared_tag_count(&self, other: &CatalogItem) -> usize {
        self.tags.intersection(&other.tags).count()
    }

    /// Whether any platform of this item appears in `platforms`, ignoring case
    pub fn available_on_any(&self, platforms: &BTreeSet<String>) -> bool {
        self.platforms
            .iter()
            .any(|mine| platforms.iter().any(|theirs| same_platform(mine, theirs)))
    }
}

/// Canonical platform id: trimmed, ASCII lowercase
pub fn normalize_platform(platform: &str) -> String {
    platform.trim().to_ascii_lowercase()
}

pub fn same_platform(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
