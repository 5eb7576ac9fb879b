//! User models
//!
//! A [`UserProfile`] is the per-call snapshot the engine decides for. It is
//! assembled by the caller from request parameters and persisted per-user
//! state (tag weights, taste profile, interaction history).

use crate::error::GoodWatchError;
use crate::language::same_language;
use crate::models::catalog::DimensionVector;
use crate::models::taste::TasteProfile;
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Weight every tag starts from
pub const DEFAULT_TAG_WEIGHT: f64 = 1.0;

/// First hour (inclusive) counted as late night
pub const LATE_NIGHT_START_HOUR: u32 = 22;

/// First hour (inclusive) no longer counted as late night
pub const LATE_NIGHT_END_HOUR: u32 = 5;

/// Self-reported mood for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Neutral,
    Tired,
    Happy,
    Sad,
    Stressed,
    Bored,
    Curious,
    Romantic,
}

impl Default for Mood {
    fn default() -> Self {
        Self::Neutral
    }
}

/// How much risk the user accepts in a pick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationStyle {
    Safe,
    Balanced,
    Adventurous,
}

impl Default for RecommendationStyle {
    fn default() -> Self {
        Self::Balanced
    }
}

/// Coarse time-of-day bucket used by the quality floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    LateNight,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            h if h >= LATE_NIGHT_START_HOUR || h < LATE_NIGHT_END_HOUR => Self::LateNight,
            5..=11 => Self::Morning,
            12..=16 => Self::Afternoon,
            _ => Self::Evening,
        }
    }

    pub fn is_late_night(self) -> bool {
        matches!(self, Self::LateNight)
    }
}

/// Viewing context used to pick a contextual taste sub-profile
///
/// Late night takes precedence over the weekday/weekend split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewingContext {
    Weeknight,
    Weekend,
    LateNight,
}

impl ViewingContext {
    pub fn classify(local_time: NaiveDateTime) -> Self {
        if TimeOfDay::from_hour(local_time.hour()).is_late_night() {
            return Self::LateNight;
        }
        match local_time.weekday() {
            Weekday::Sat | Weekday::Sun => Self::Weekend,
            _ => Self::Weeknight,
        }
    }
}

/// Inclusive runtime window in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeWindow {
    pub min: u32,
    pub max: u32,
}

impl RuntimeWindow {
    pub fn new(min: u32, max: u32) -> Result<Self, GoodWatchError> {
        if min > max {
            return Err(GoodWatchError::validation_field(
                format!("runtime window min ({}) exceeds max ({})", min, max),
                "runtime_window",
            ));
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, runtime_minutes: u32) -> bool {
        self.min <= runtime_minutes && runtime_minutes <= self.max
    }
}

impl Default for RuntimeWindow {
    fn default() -> Self {
        Self { min: 0, max: 240 }
    }
}

/// Learned per-tag weights; absent tags weigh [`DEFAULT_TAG_WEIGHT`]
///
/// Ordered map so every iteration (and every float sum over it) runs in the
/// same order for the same contents.
///
/// Deserializing goes through [`TagWeights::set`], so stored or submitted
/// maps never carry a negative weight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct TagWeights(BTreeMap<String, f64>);

impl TagWeights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tag: &str) -> f64 {
        self.0.get(tag).copied().unwrap_or(DEFAULT_TAG_WEIGHT)
    }

    /// Set a weight, clamping negatives to zero
    pub fn set(&mut self, tag: impl Into<String>, weight: f64) {
        self.0.insert(tag.into(), weight.max(0.0));
    }

    pub fn with(mut self, tag: impl Into<String>, weight: f64) -> Self {
        self.set(tag, weight);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.0.iter()
    }

    /// Number of entries further than `epsilon` from the default weight
    pub fn deviating_count(&self, epsilon: f64) -> usize {
        self.0
            .values()
            .filter(|w| (**w - DEFAULT_TAG_WEIGHT).abs() > epsilon)
            .count()
    }
}

impl FromIterator<(String, f64)> for TagWeights {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut weights = TagWeights::new();
        for (tag, weight) in iter {
            weights.set(tag, weight);
        }
        weights
    }
}

impl From<BTreeMap<String, f64>> for TagWeights {
    fn from(map: BTreeMap<String, f64>) -> Self {
        map.into_iter().collect()
    }
}

impl From<TagWeights> for BTreeMap<String, f64> {
    fn from(weights: TagWeights) -> Self {
        weights.0
    }
}

/// Shown/accepted counters for one platform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformStats {
    pub shown: u32,
    pub accepted: u32,
}

impl PlatformStats {
    /// Acceptance rate, or `None` when nothing was shown yet
    pub fn acceptance_rate(&self) -> Option<f64> {
        if self.shown == 0 {
            return None;
        }
        Some((self.accepted as f64 / self.shown as f64).clamp(0.0, 1.0))
    }
}

/// Watch-history facts that decide whether family content is withheld
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaturityInfo {
    /// Lifetime interactions that were accepted and then watched
    pub accepted_and_watched: u32,
    /// Whether the user ever explicitly picked a documentary or kids title
    pub has_documentary_or_kids_pick: bool,
}

/// Remotely configured ideal point for the current mood (0–10 per dimension)
///
/// Dimensions left unset fall back to the built-in mood target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MoodMappingOverride {
    pub targets: DimensionVector,
}

/// Per-call user snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: Uuid,

    #[serde(default)]
    pub preferred_languages: BTreeSet<String>,

    #[serde(default)]
    pub platforms: BTreeSet<String>,

    #[serde(default)]
    pub runtime_window: RuntimeWindow,

    #[serde(default)]
    pub mood: Mood,

    #[serde(default)]
    pub intent_tags: BTreeSet<String>,

    /// Watched or accepted item ids
    #[serde(default)]
    pub seen: BTreeSet<String>,

    /// Item ids dismissed with "not tonight"
    #[serde(default)]
    pub rejected: BTreeSet<String>,

    /// Item ids started and abandoned
    #[serde(default)]
    pub abandoned: BTreeSet<String>,

    #[serde(default)]
    pub style: RecommendationStyle,

    #[serde(default)]
    pub tag_weights: TagWeights,

    #[serde(default)]
    pub taste_profile: Option<TasteProfile>,

    #[serde(default)]
    pub mood_mapping: Option<MoodMappingOverride>,

    #[serde(default)]
    pub requires_series: bool,

    #[serde(default)]
    pub platform_stats: BTreeMap<String, PlatformStats>,

    /// Present when family-content gating applies to this user
    #[serde(default)]
    pub maturity: Option<MaturityInfo>,

    /// User-local wall clock time of the request
    pub local_time: NaiveDateTime,
}

impl UserProfile {
    /// Profile with neutral defaults; callers fill in what they know
    pub fn new(user_id: Uuid, local_time: NaiveDateTime) -> Self {
        Self {
            user_id,
            preferred_languages: BTreeSet::new(),
            platforms: BTreeSet::new(),
            runtime_window: RuntimeWindow::default(),
            mood: Mood::default(),
            intent_tags: BTreeSet::new(),
            seen: BTreeSet::new(),
            rejected: BTreeSet::new(),
            abandoned: BTreeSet::new(),
            style: RecommendationStyle::default(),
            tag_weights: TagWeights::new(),
            taste_profile: None,
            mood_mapping: None,
            requires_series: false,
            platform_stats: BTreeMap::new(),
            maturity: None,
            local_time,
        }
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_hour(self.local_time.hour())
    }

    pub fn viewing_context(&self) -> ViewingContext {
        ViewingContext::classify(self.local_time)
    }

    /// Whether the id is in seen, rejected or abandoned
    pub fn has_interacted(&self, item_id: &str) -> bool {
        self.seen.contains(item_id)
            || self.rejected.contains(item_id)
            || self.abandoned.contains(item_id)
    }

    /// Whether the language (after normalization) is one the user accepts
    pub fn accepts_language(&self, language: &str) -> bool {
        self.preferred_languages
            .iter()
            .any(|preferred| same_language(preferred, language))
    }

    /// Check structural constraints the engine relies on
    pub fn validate(&self) -> Result<(), GoodWatchError> {
        RuntimeWindow::new(self.runtime_window.min, self.runtime_window.max)?;

        let overlapping = self
            .seen
            .iter()
            .chain(self.rejected.iter())
            .filter(|id| {
                let hits = [&self.seen, &self.rejected, &self.abandoned]
                    .iter()
                    .filter(|set| set.contains(*id))
                    .count();
                hits > 1
            })
            .count();
        if overlapping > 0 {
            return Err(GoodWatchError::validation_field(
                "seen, rejected and abandoned must be disjoint",
                "interactions",
            ));
        }

        if self.tag_weights.iter().any(|(_, w)| *w < 0.0) {
            return Err(GoodWatchError::validation_field(
                "tag weights must not be negative",
                "tag_weights",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .unwrap()
    }

    #[test]
    fn test_time_of_day_buckets() {
        assert_eq!(TimeOfDay::from_hour(7), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(14), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(20), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(22), TimeOfDay::LateNight);
        assert_eq!(TimeOfDay::from_hour(3), TimeOfDay::LateNight);
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Morning);
    }

    #[test]
    fn test_viewing_context_late_night_takes_precedence() {
        // 2024-01-13 is a Saturday, 2024-01-10 a Wednesday
        assert_eq!(ViewingContext::classify(at(2024, 1, 13, 23)), ViewingContext::LateNight);
        assert_eq!(ViewingContext::classify(at(2024, 1, 13, 20)), ViewingContext::Weekend);
        assert_eq!(ViewingContext::classify(at(2024, 1, 10, 20)), ViewingContext::Weeknight);
    }

    #[test]
    fn test_tag_weights_default_and_clamp() {
        let mut weights = TagWeights::new();
        assert_eq!(weights.get("comfort"), 1.0);
        weights.set("dark", -0.3);
        assert_eq!(weights.get("dark"), 0.0);
        assert_eq!(weights.deviating_count(0.01), 1);
    }

    #[test]
    fn test_tag_weights_deserialize_clamps_negatives() {
        let weights: TagWeights =
            serde_json::from_str(r#"{"dark": -0.5, "comfort": 1.2}"#).unwrap();
        assert_eq!(weights.get("dark"), 0.0);
        assert_eq!(weights.get("comfort"), 1.2);

        let json = serde_json::to_value(&weights).unwrap();
        assert_eq!(json, serde_json::json!({ "comfort": 1.2, "dark": 0.0 }));
    }

    #[test]
    fn test_runtime_window() {
        assert!(RuntimeWindow::new(120, 90).is_err());
        let window = RuntimeWindow::new(60, 120).unwrap();
        assert!(window.contains(60));
        assert!(window.contains(120));
        assert!(!window.contains(121));
    }

    #[test]
    fn test_platform_acceptance_rate() {
        assert_eq!(PlatformStats::default().acceptance_rate(), None);
        let stats = PlatformStats { shown: 4, accepted: 1 };
        assert_eq!(stats.acceptance_rate(), Some(0.25));
    }

    #[test]
    fn test_profile_language_and_interactions() {
        let mut profile = UserProfile::new(Uuid::new_v4(), at(2024, 1, 10, 20));
        profile.preferred_languages.insert("english".to_string());
        profile.rejected.insert("m1".to_string());
        assert!(profile.accepts_language("EN"));
        assert!(!profile.accepts_language("hi"));
        assert!(profile.has_interacted("m1"));
        assert!(!profile.has_interacted("m2"));
        assert!(profile.validate().is_ok());

        profile.seen.insert("m1".to_string());
        assert!(profile.validate().is_err());
    }
}
