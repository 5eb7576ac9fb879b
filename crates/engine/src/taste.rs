//! Taste profile learning
//!
//! Recomputes a per-user preference vector over the eight emotional
//! dimensions from post-watch feedback, and scores catalog items against it.
//!
//! Each feedback entry contributes with weight
//! `satisfaction_norm * pick_again_multiplier * recency_factor`. Explicit
//! "felt" sliders replace the item's catalog value for that dimension and
//! count double.

use chrono::{DateTime, Duration, Utc};
use goodwatch_core::models::catalog::DIMENSION_MAX;
use goodwatch_core::{
    CatalogItem, DimensionVector, EmotionalDimension, EmotionalProfile, FeedbackEntry,
    TasteProfile, ViewingContext,
};
use std::collections::HashMap;
use tracing::{debug, instrument};

const WOULD_PICK_AGAIN_MULTIPLIER: f64 = 1.5;
const WOULD_NOT_PICK_AGAIN_MULTIPLIER: f64 = 0.5;
const FELT_SIGNAL_MULTIPLIER: f64 = 2.0;

const RECENT_DAYS: i64 = 7;
const MONTH_DAYS: i64 = 30;
const RECENT_FACTOR: f64 = 1.0;
const MONTH_FACTOR: f64 = 0.8;
const OLD_FACTOR: f64 = 0.5;

/// Entries a contextual bucket needs before it is published
pub const MIN_CONTEXT_DATA_POINTS: usize = 3;

/// Neutral taste score when nothing can be compared
pub const NEUTRAL_TASTE_SCORE: f64 = 0.5;

/// Weighted sums for one vector under construction
#[derive(Default)]
struct DimensionAccumulator {
    sums: [f64; EmotionalDimension::COUNT],
    weights: [f64; EmotionalDimension::COUNT],
    data_points: usize,
}

impl DimensionAccumulator {
    fn add(&mut self, contributions: &[(usize, f64, f64)]) {
        if contributions.is_empty() {
            return;
        }
        for &(index, value, weight) in contributions {
            self.sums[index] += value * weight;
            self.weights[index] += weight;
        }
        self.data_points += 1;
    }

    fn finish(&self) -> DimensionVector {
        let mut vector = DimensionVector::empty();
        for dimension in EmotionalDimension::ALL {
            let i = dimension.index();
            if self.weights[i] > 0.0 {
                vector.set(dimension, (self.sums[i] / self.weights[i]).clamp(0.0, 1.0));
            }
        }
        vector
    }
}

pub struct TasteProfileBlender;

impl TasteProfileBlender {
    /// Rebuild a taste profile from the full feedback history
    ///
    /// `item_profiles` maps item ids to their catalog emotional profile.
    /// Entries with neither a catalog profile nor felt sliders still count
    /// toward the feedback count and satisfaction average.
    #[instrument(skip(entries, item_profiles), fields(entries = entries.len()))]
    pub fn recompute(
        entries: &[FeedbackEntry],
        item_profiles: &HashMap<String, EmotionalProfile>,
        now: DateTime<Utc>,
    ) -> TasteProfile {
        let mut global = DimensionAccumulator::default();
        let mut weeknight = DimensionAccumulator::default();
        let mut weekend = DimensionAccumulator::default();
        let mut late_night = DimensionAccumulator::default();

        for entry in entries {
            let contributions =
                Self::contributions(entry, item_profiles.get(&entry.item_id), now);

            global.add(&contributions);
            match ViewingContext::classify(entry.watched_at_local) {
                ViewingContext::Weeknight => weeknight.add(&contributions),
                ViewingContext::Weekend => weekend.add(&contributions),
                ViewingContext::LateNight => late_night.add(&contributions),
            }
        }

        let satisfaction_average = if entries.is_empty() {
            0.0
        } else {
            entries.iter().map(|e| e.satisfaction as f64).sum::<f64>() / entries.len() as f64
        };

        let profile = TasteProfile {
            preferences: global.finish(),
            weeknight: Self::publish(&weeknight),
            weekend: Self::publish(&weekend),
            late_night: Self::publish(&late_night),
            feedback_count: entries.len() as u32,
            satisfaction_average,
            last_computed_at: now,
        };

        debug!(
            known_dimensions = profile.preferences.known(),
            weeknight = profile.weeknight.is_some(),
            weekend = profile.weekend.is_some(),
            late_night = profile.late_night.is_some(),
            "Recomputed taste profile"
        );

        profile
    }

    /// Alignment of an item with the taste profile for a viewing context
    ///
    /// `1 - mean |item - preference|` over the known dimensions, pulled
    /// toward 0.5 by the profile's confidence. Returns 0.5 when the item has
    /// no emotional profile or the preference vector is empty.
    pub fn score_against(
        item: &CatalogItem,
        taste: &TasteProfile,
        context: ViewingContext,
    ) -> f64 {
        let Some(emotional) = item.emotional_profile.as_ref() else {
            return NEUTRAL_TASTE_SCORE;
        };

        let preferences = taste.for_context(context);
        let distances: Vec<f64> = EmotionalDimension::ALL
            .iter()
            .filter_map(|dim| {
                preferences
                    .get(*dim)
                    .map(|pref| (emotional.normalized(*dim) - pref).abs())
            })
            .collect();

        if distances.is_empty() {
            return NEUTRAL_TASTE_SCORE;
        }

        let alignment = 1.0 - distances.iter().sum::<f64>() / distances.len() as f64;
        let scaled = NEUTRAL_TASTE_SCORE + (alignment - NEUTRAL_TASTE_SCORE) * taste.confidence();
        scaled.clamp(0.0, 1.0)
    }

    /// Weight of one entry before the felt multiplier
    pub fn entry_weight(entry: &FeedbackEntry, now: DateTime<Utc>) -> f64 {
        let pick_again = match entry.would_pick_again {
            Some(true) => WOULD_PICK_AGAIN_MULTIPLIER,
            Some(false) => WOULD_NOT_PICK_AGAIN_MULTIPLIER,
            None => 1.0,
        };
        entry.satisfaction_norm() * pick_again * Self::recency_factor(entry.recorded_at, now)
    }

    pub fn recency_factor(recorded_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
        let age = now.signed_duration_since(recorded_at);
        if age <= Duration::days(RECENT_DAYS) {
            RECENT_FACTOR
        } else if age <= Duration::days(MONTH_DAYS) {
            MONTH_FACTOR
        } else {
            OLD_FACTOR
        }
    }

    /// (dimension index, value in [0, 1], weight) per dimension the entry informs
    fn contributions(
        entry: &FeedbackEntry,
        item_profile: Option<&EmotionalProfile>,
        now: DateTime<Utc>,
    ) -> Vec<(usize, f64, f64)> {
        let weight = Self::entry_weight(entry, now);
        if weight <= 0.0 {
            return Vec::new();
        }

        EmotionalDimension::ALL
            .iter()
            .filter_map(|dim| {
                let felt = entry.felt.as_ref().and_then(|f| f.get(*dim));
                match (felt, item_profile) {
                    (Some(value), _) => Some((
                        dim.index(),
                        (value / DIMENSION_MAX).clamp(0.0, 1.0),
                        weight * FELT_SIGNAL_MULTIPLIER,
                    )),
                    (None, Some(profile)) => {
                        Some((dim.index(), profile.normalized(*dim), weight))
                    }
                    (None, None) => None,
                }
            })
            .collect()
    }

    fn publish(bucket: &DimensionAccumulator) -> Option<DimensionVector> {
        (bucket.data_points >= MIN_CONTEXT_DATA_POINTS).then(|| bucket.finish())
    }
}
