//! Learned state feeding back into scoring

use super::fixtures::{feedback, movie, movie_with_tags, profile};
use crate::scoring::ScoringModel;
use crate::tag_weights::TagWeightLedger;
use crate::taste::TasteProfileBlender;
use chrono::{TimeZone, Utc};
use goodwatch_core::{EmotionalProfile, FeedbackAction};
use std::collections::HashMap;

#[test]
fn test_rejections_lower_tag_alignment() {
    let model = ScoringModel::default();
    let mut user = profile();
    user.intent_tags.insert("dark".to_string());

    let comfort = movie_with_tags("c1", &["comfort"]);
    let before = model.breakdown(&comfort, &user).tag_alignment;

    user.tag_weights = TagWeightLedger::update(&user.tag_weights, &comfort, FeedbackAction::Abandoned);
    let after = model.breakdown(&comfort, &user).tag_alignment;

    assert_eq!(before, 0.5);
    assert!(after < before);
}

#[test]
fn test_taste_profile_pulls_score_toward_preferences() {
    let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
    let mut profiles = HashMap::new();
    profiles.insert("cozy".to_string(), EmotionalProfile::from_array([9.0, 1.0, 2.0, 3.0, 3.0, 8.0, 7.0, 3.0]));

    let entries: Vec<_> = (0..20).map(|_| feedback("cozy", 5, now)).collect();
    let taste = TasteProfileBlender::recompute(&entries, &profiles, now);
    assert_eq!(taste.confidence(), 1.0);

    let mut similar = movie("similar");
    similar.emotional_profile = Some(EmotionalProfile::from_array([9.0, 1.0, 2.0, 3.0, 3.0, 8.0, 7.0, 3.0]));
    let mut opposite = movie("opposite");
    opposite.emotional_profile = Some(EmotionalProfile::from_array([1.0, 9.0, 9.0, 9.0, 9.0, 1.0, 1.0, 9.0]));

    let model = ScoringModel::default();
    let mut user = profile();
    let base_gap = model.score(&similar, &user) - model.score(&opposite, &user);

    user.taste_profile = Some(taste);
    let taste_gap = model.score(&similar, &user) - model.score(&opposite, &user);

    assert!(taste_gap > base_gap);
    let breakdown = model.breakdown(&similar, &user);
    assert!((breakdown.taste_weight - 0.15).abs() < 1e-12);
    assert!((breakdown.taste_score - 1.0).abs() < 1e-9);
}
