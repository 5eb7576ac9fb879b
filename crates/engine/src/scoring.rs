//! Candidate scoring
//!
//! Combines four bounded signals into a base score and blends in the learned
//! taste profile:
//!
//! ```text
//! base  = 0.50 * tag_alignment + 0.25 * regret_safety
//!       + 0.15 * platform_bias + 0.10 * dimensional_alignment
//! final = base * (1 - w) + taste_score * w,   w = confidence * 0.15
//! ```
//!
//! `w` is exactly zero without a usable taste profile (fewer than three
//! feedback entries) or with taste blending disabled. A small confidence
//! boost applies once ten or more tag weights have moved off the default.

use crate::taste::TasteProfileBlender;
use goodwatch_core::models::catalog::DIMENSION_MAX;
use goodwatch_core::{
    same_platform, CatalogItem, EmotionalDimension, EmotionalProfile, FeatureFlags, Mood,
    RecommendationStyle, UserProfile,
};
use serde::{Deserialize, Serialize};
use tracing::trace;

const TAG_ALIGNMENT_WEIGHT: f64 = 0.50;
const REGRET_SAFETY_WEIGHT: f64 = 0.25;
const PLATFORM_BIAS_WEIGHT: f64 = 0.15;
const DIMENSIONAL_ALIGNMENT_WEIGHT: f64 = 0.10;

/// Upper bound of the taste blend share
pub const MAX_TASTE_WEIGHT: f64 = 0.15;

/// Neutral value for every signal that lacks data
pub const NEUTRAL_SIGNAL: f64 = 0.5;

/// Tags that lower expected regret
pub const SAFE_TAGS: [&str; 2] = ["safe_bet", "crowd_pleaser"];

/// Tags that raise expected regret
pub const RISK_TAGS: [&str; 3] = ["acquired_taste", "polarizing", "challenging"];

const SAFE_TAG_BONUS: f64 = 0.4;
const RISK_TAG_PENALTY: f64 = 0.25;

const BOOST_MIN_DEVIATING_TAGS: usize = 10;
const BOOST_DEVIATION_EPSILON: f64 = 0.01;
/// Share of the remaining headroom granted by the confidence boost
const BOOST_FACTOR: f64 = 0.05;

/// Every component behind one score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub tag_alignment: f64,
    pub regret_safety: f64,
    pub platform_bias: f64,
    pub dimensional_alignment: f64,
    pub base: f64,
    pub taste_weight: f64,
    pub taste_score: f64,
    pub confidence_boost: bool,
    pub final_score: f64,
}

/// Pure scoring function parameterized by feature flags
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringModel {
    flags: FeatureFlags,
}

impl ScoringModel {
    pub fn new(flags: FeatureFlags) -> Self {
        Self { flags }
    }

    /// Score in [0, 1]
    pub fn score(&self, item: &CatalogItem, profile: &UserProfile) -> f64 {
        self.breakdown(item, profile).final_score
    }

    pub fn breakdown(&self, item: &CatalogItem, profile: &UserProfile) -> ScoreBreakdown {
        let tag_alignment = Self::tag_alignment(item, profile);
        let regret_safety = Self::regret_safety(item, profile);
        let platform_bias = Self::platform_bias(item, profile);
        let dimensional_alignment = self.dimensional_alignment(item, profile);

        let base = TAG_ALIGNMENT_WEIGHT * tag_alignment
            + REGRET_SAFETY_WEIGHT * regret_safety
            + PLATFORM_BIAS_WEIGHT * platform_bias
            + DIMENSIONAL_ALIGNMENT_WEIGHT * dimensional_alignment;

        let (taste_weight, taste_score) = self.taste_blend(item, profile);
        let mut final_score = base * (1.0 - taste_weight) + taste_score * taste_weight;

        let confidence_boost = profile.tag_weights.deviating_count(BOOST_DEVIATION_EPSILON)
            >= BOOST_MIN_DEVIATING_TAGS;
        if confidence_boost {
            final_score += (1.0 - final_score).max(0.0) * BOOST_FACTOR;
        }

        let breakdown = ScoreBreakdown {
            tag_alignment,
            regret_safety,
            platform_bias,
            dimensional_alignment,
            base,
            taste_weight,
            taste_score,
            confidence_boost,
            final_score: final_score.clamp(0.0, 1.0),
        };

        trace!(item_id = %item.id, score = breakdown.final_score, "Scored candidate");
        breakdown
    }

    /// Share of intent weight covered by the item's tags
    pub fn tag_alignment(item: &CatalogItem, profile: &UserProfile) -> f64 {
        let weights = &profile.tag_weights;
        let total: f64 = profile.intent_tags.iter().map(|t| weights.get(t)).sum();
        if total <= 0.0 {
            return 0.0;
        }
        let matched: f64 = profile
            .intent_tags
            .iter()
            .filter(|t| item.has_tag(t))
            .map(|t| weights.get(t))
            .sum();
        (matched / total).clamp(0.0, 1.0)
    }

    pub fn regret_safety(item: &CatalogItem, profile: &UserProfile) -> f64 {
        let weights = &profile.tag_weights;
        let mut safety = NEUTRAL_SIGNAL;

        let safe_weight = SAFE_TAGS
            .iter()
            .filter(|t| item.has_tag(t))
            .map(|t| weights.get(t))
            .reduce(f64::max);
        if let Some(weight) = safe_weight {
            safety += SAFE_TAG_BONUS * weight.min(1.0);
        }

        let risk_penalty = match profile.style {
            RecommendationStyle::Adventurous => RISK_TAG_PENALTY / 2.0,
            RecommendationStyle::Safe | RecommendationStyle::Balanced => RISK_TAG_PENALTY,
        };
        let risks = RISK_TAGS.iter().filter(|t| item.has_tag(t)).count();
        safety -= risk_penalty * risks as f64;

        safety.clamp(0.0, 1.0)
    }

    /// Best learned acceptance rate among the user's platforms carrying the item
    ///
    /// Platform ids compare trimmed and case-insensitively, as in validation.
    pub fn platform_bias(item: &CatalogItem, profile: &UserProfile) -> f64 {
        item.platforms
            .iter()
            .filter(|p| profile.platforms.iter().any(|mine| same_platform(mine, p)))
            .flat_map(|p| {
                profile
                    .platform_stats
                    .iter()
                    .filter(move |(key, _)| same_platform(key, p))
                    .map(|(_, stats)| stats)
            })
            .filter_map(|stats| stats.acceptance_rate())
            .reduce(f64::max)
            .unwrap_or(NEUTRAL_SIGNAL)
    }

    pub fn dimensional_alignment(&self, item: &CatalogItem, profile: &UserProfile) -> f64 {
        let Some(emotional) = item.emotional_profile.as_ref() else {
            return NEUTRAL_SIGNAL;
        };
        let target = self.mood_target(profile);
        Self::closeness(emotional, &target)
    }

    /// Ideal point for the session: the remote override where it is enabled
    /// and sets a dimension, the built-in mood target otherwise
    pub fn mood_target(&self, profile: &UserProfile) -> [f64; EmotionalDimension::COUNT] {
        let mut target = mood_ideal(profile.mood);
        if !self.flags.remote_mood_mapping {
            return target;
        }
        if let Some(mapping) = profile.mood_mapping.as_ref() {
            for dimension in EmotionalDimension::ALL {
                if let Some(value) = mapping.targets.get(dimension) {
                    target[dimension.index()] = value.clamp(0.0, DIMENSION_MAX);
                }
            }
        }
        target
    }

    fn closeness(emotional: &EmotionalProfile, target: &[f64; EmotionalDimension::COUNT]) -> f64 {
        let distance: f64 = emotional
            .to_array()
            .iter()
            .zip(target.iter())
            .map(|(value, ideal)| (value - ideal).abs() / DIMENSION_MAX)
            .sum::<f64>()
            / EmotionalDimension::COUNT as f64;
        (1.0 - distance).clamp(0.0, 1.0)
    }

    /// (taste weight, taste score)
    fn taste_blend(&self, item: &CatalogItem, profile: &UserProfile) -> (f64, f64) {
        if !self.flags.taste_blending {
            return (0.0, NEUTRAL_SIGNAL);
        }
        match profile.taste_profile.as_ref() {
            Some(taste) if taste.is_usable() => {
                let weight = taste.confidence() * MAX_TASTE_WEIGHT;
                let score =
                    TasteProfileBlender::score_against(item, taste, profile.viewing_context());
                (weight, score)
            }
            _ => (0.0, NEUTRAL_SIGNAL),
        }
    }
}

/// Intent tags the item satisfies, in tag order
pub fn matched_intent_tags(item: &CatalogItem, profile: &UserProfile) -> Vec<String> {
    item.tags
        .intersection(&profile.intent_tags)
        .cloned()
        .collect()
}

/// Built-in ideal emotional point per mood, in [`EmotionalDimension::ALL`] order
pub fn mood_ideal(mood: Mood) -> [f64; EmotionalDimension::COUNT] {
    match mood {
        Mood::Neutral => [5.0, 4.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0],
        Mood::Tired => [8.0, 2.0, 2.0, 3.0, 2.0, 7.0, 6.0, 3.0],
        Mood::Happy => [7.0, 2.0, 5.0, 7.0, 4.0, 6.0, 8.0, 5.0],
        Mood::Sad => [8.0, 2.0, 3.0, 4.0, 4.0, 6.0, 6.0, 4.0],
        Mood::Stressed => [9.0, 1.0, 2.0, 3.0, 3.0, 7.0, 7.0, 3.0],
        Mood::Bored => [4.0, 4.0, 7.0, 8.0, 5.0, 4.0, 6.0, 7.0],
        Mood::Curious => [4.0, 4.0, 5.0, 5.0, 8.0, 4.0, 4.0, 9.0],
        Mood::Romantic => [7.0, 2.0, 4.0, 5.0, 4.0, 6.0, 6.0, 5.0],
    }
}
