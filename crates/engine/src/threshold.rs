//! Mood-aware quality floor
//!
//! The minimum quality score an item needs depends on the session: a tired
//! user or a late-night session gets a stricter floor, an adventurous user a
//! looser one. Safety escalations always win over the style preference.

use goodwatch_core::{Mood, RecommendationStyle, TimeOfDay};

/// Baseline floor for safe and balanced styles
pub const BASELINE_THRESHOLD: f64 = 75.0;

/// Floor for the adventurous style when nothing escalates it
pub const ADVENTUROUS_THRESHOLD: f64 = 70.0;

/// Floor enforced whenever the user reports being tired
pub const TIRED_THRESHOLD: f64 = 88.0;

/// Floor enforced during late-night sessions
pub const LATE_NIGHT_THRESHOLD: f64 = 85.0;

pub const MIN_THRESHOLD: f64 = 70.0;
pub const MAX_THRESHOLD: f64 = 90.0;

/// Quality floor policy
pub struct MoodThresholdPolicy;

impl MoodThresholdPolicy {
    /// Quality floor in [70, 90] for the given session
    ///
    /// Style only sets the floor when no escalation applies; otherwise the
    /// result is the maximum of the baseline and every escalation.
    pub fn threshold(mood: Mood, time_of_day: TimeOfDay, style: RecommendationStyle) -> f64 {
        let escalation = Self::escalations(mood, time_of_day)
            .into_iter()
            .reduce(f64::max);

        let floor = match escalation {
            Some(escalated) => escalated.max(BASELINE_THRESHOLD),
            None => Self::style_floor(style),
        };

        floor.clamp(MIN_THRESHOLD, MAX_THRESHOLD)
    }

    fn escalations(mood: Mood, time_of_day: TimeOfDay) -> Vec<f64> {
        let mut escalations = Vec::with_capacity(2);
        if mood == Mood::Tired {
            escalations.push(TIRED_THRESHOLD);
        }
        if time_of_day.is_late_night() {
            escalations.push(LATE_NIGHT_THRESHOLD);
        }
        escalations
    }

    fn style_floor(style: RecommendationStyle) -> f64 {
        match style {
            RecommendationStyle::Safe | RecommendationStyle::Balanced => BASELINE_THRESHOLD,
            RecommendationStyle::Adventurous => ADVENTUROUS_THRESHOLD,
        }
    }
}
