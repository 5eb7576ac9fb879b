//! Taste profile models

use crate::models::catalog::DimensionVector;
use crate::models::user::ViewingContext;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Feedback entries required before a taste profile influences scoring
pub const MIN_TASTE_FEEDBACK: u32 = 3;

/// Feedback count at which taste confidence saturates
pub const FULL_CONFIDENCE_FEEDBACK: u32 = 20;

/// Per-user taste preferences over the emotional dimensions, each in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TasteProfile {
    /// Global preferences; unknown dimensions are `None`
    pub preferences: DimensionVector,

    #[serde(default)]
    pub weeknight: Option<DimensionVector>,

    #[serde(default)]
    pub weekend: Option<DimensionVector>,

    #[serde(default)]
    pub late_night: Option<DimensionVector>,

    pub feedback_count: u32,

    /// Mean satisfaction (1–5) over all feedback entries
    pub satisfaction_average: f64,

    pub last_computed_at: DateTime<Utc>,
}

impl TasteProfile {
    /// Empty profile with no knowledge
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            preferences: DimensionVector::empty(),
            weeknight: None,
            weekend: None,
            late_night: None,
            feedback_count: 0,
            satisfaction_average: 0.0,
            last_computed_at: now,
        }
    }

    /// Whether enough feedback exists for the profile to be used
    pub fn is_usable(&self) -> bool {
        self.feedback_count >= MIN_TASTE_FEEDBACK
    }

    /// `min(feedback_count / 20, 1.0)`
    pub fn confidence(&self) -> f64 {
        (self.feedback_count as f64 / FULL_CONFIDENCE_FEEDBACK as f64).min(1.0)
    }

    /// Contextual sub-profile when present, global preferences otherwise
    pub fn for_context(&self, context: ViewingContext) -> &DimensionVector {
        let contextual = match context {
            ViewingContext::Weeknight => self.weeknight.as_ref(),
            ViewingContext::Weekend => self.weekend.as_ref(),
            ViewingContext::LateNight => self.late_night.as_ref(),
        };
        contextual.unwrap_or(&self.preferences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::EmotionalDimension;

    #[test]
    fn test_usable_and_confidence() {
        let mut taste = TasteProfile::empty(Utc::now());
        taste.feedback_count = 2;
        assert!(!taste.is_usable());
        taste.feedback_count = 3;
        assert!(taste.is_usable());
        assert!((taste.confidence() - 0.15).abs() < 1e-12);
        taste.feedback_count = 45;
        assert_eq!(taste.confidence(), 1.0);
    }

    #[test]
    fn test_context_falls_back_to_global() {
        let mut taste = TasteProfile::empty(Utc::now());
        taste.preferences.set(EmotionalDimension::Comfort, 0.9);
        taste.weekend = Some(DimensionVector::empty().with(EmotionalDimension::Comfort, 0.2));

        assert_eq!(
            taste.for_context(ViewingContext::Weekend).get(EmotionalDimension::Comfort),
            Some(0.2)
        );
        assert_eq!(
            taste.for_context(ViewingContext::LateNight).get(EmotionalDimension::Comfort),
            Some(0.9)
        );
    }
}
