mod common;

use common::{catalog, item, profile};
use goodwatch_core::{Mood, RecommendationStyle, UserProfile};
use goodwatch_engine::{
    pick_count, RecommendationEngine, StopCondition, TierRatchet, ValidationPipeline,
};
use std::collections::BTreeSet;

fn varied_profiles() -> Vec<UserProfile> {
    let moods = [Mood::Neutral, Mood::Tired, Mood::Happy, Mood::Stressed];
    let styles = [
        RecommendationStyle::Safe,
        RecommendationStyle::Balanced,
        RecommendationStyle::Adventurous,
    ];

    let mut profiles = Vec::new();
    let mut user = 0u128;
    for mood in moods {
        for style in styles {
            user += 1;
            let mut p = profile(user);
            p.mood = mood;
            p.style = style;
            if user % 3 == 0 {
                p.seen.insert("a05".to_string());
            }
            if user % 4 == 0 {
                p.rejected.insert("a03".to_string());
            }
            profiles.push(p);
        }
    }
    profiles
}

#[test]
fn test_every_recommendation_is_valid() {
    let engine = RecommendationEngine::default();
    let items = catalog();

    for p in varied_profiles() {
        let output = engine.recommend(&items, &p).unwrap();
        match output.item() {
            Some(chosen) => {
                assert!(
                    ValidationPipeline::is_valid(chosen, &p).is_valid(),
                    "user {} got invalid item {}",
                    p.user_id,
                    chosen.id
                );
                assert!(!chosen.id.starts_with('x'));
            }
            None => assert!(output.stop_condition().is_some()),
        }
    }
}

#[test]
fn test_catalog_order_does_not_matter() {
    let engine = RecommendationEngine::default();
    let forward = catalog();
    let mut backward = forward.clone();
    backward.reverse();
    let mut rotated = forward.clone();
    rotated.rotate_left(5);

    for p in varied_profiles() {
        let a = engine.recommend(&forward, &p).unwrap();
        let b = engine.recommend(&backward, &p).unwrap();
        let c = engine.recommend(&rotated, &p).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }
}

#[test]
fn test_repeated_calls_are_identical() {
    let engine = RecommendationEngine::default();
    let items = catalog();
    let p = profile(99);

    let first = engine.recommend(&items, &p).unwrap();
    for _ in 0..10 {
        assert_eq!(engine.recommend(&items, &p).unwrap(), first);
    }
}

#[test]
fn test_scores_stay_in_unit_interval() {
    let engine = RecommendationEngine::default();
    for p in varied_profiles() {
        for candidate in catalog() {
            let score = engine.score(&candidate, &p);
            assert!((0.0..=1.0).contains(&score), "score {} for {}", score, candidate.id);
        }
    }
}

#[test]
fn test_multiple_picks_are_distinct_and_valid() {
    let engine = RecommendationEngine::default();
    let p = profile(5);
    let picks = engine.recommend_multiple(&catalog(), &p, 4).unwrap();

    assert_eq!(picks.len(), 4);
    let ids: BTreeSet<&str> = picks.iter().map(|r| r.item.id.as_str()).collect();
    assert_eq!(ids.len(), 4);
    for pick in &picks {
        assert!(ValidationPipeline::is_valid(&pick.item, &p).is_valid());
    }
}

#[test]
fn test_multiple_picks_stop_short_when_pool_runs_out() {
    let engine = RecommendationEngine::default();
    let items = vec![item("a01", &["comfort"], 80.0), item("a02", &["comfort"], 80.0)];
    let picks = engine.recommend_multiple(&items, &profile(1), 5).unwrap();
    assert_eq!(picks.len(), 2);
}

#[test]
fn test_stop_conditions() {
    let engine = RecommendationEngine::default();
    let p = profile(1);

    let empty = engine.recommend(&[], &p).unwrap();
    assert_eq!(empty.stop_condition(), Some(StopCondition::EmptyCatalog));

    let mut hindi = item("h1", &["comfort"], 90.0);
    hindi.language = "hi".to_string();
    let output = engine.recommend(&[hindi], &p).unwrap();
    assert_eq!(output.stop_condition(), Some(StopCondition::NoLanguageMatch));

    let mut exhausted = p.clone();
    exhausted.seen.insert("a01".to_string());
    exhausted.rejected.insert("a02".to_string());
    let items = vec![item("a01", &["comfort"], 80.0), item("a02", &["comfort"], 80.0)];
    let output = engine.recommend(&items, &exhausted).unwrap();
    assert_eq!(output.stop_condition(), Some(StopCondition::AllOptionsExhausted));
}

#[test]
fn test_not_tonight_never_returns_rejected_item() {
    let engine = RecommendationEngine::default();
    let items = catalog();

    for p in varied_profiles() {
        let first = engine.recommend(&items, &p).unwrap();
        let Some(chosen) = first.item() else { continue };
        let replacement = engine
            .recommend_after_not_tonight(&items, &p, &chosen.id)
            .unwrap();
        assert_ne!(replacement.item().map(|i| i.id.as_str()), Some(chosen.id.as_str()));
    }
}

#[test]
fn test_tier_ratchet_is_monotone() {
    let mut ratchet = TierRatchet::default();
    let mut previous = u8::MAX;
    for points in [0, 30, 10, 70, 0, 120, 50, 200, 0] {
        let (picks, next) = ratchet.advance(points);
        assert!(picks <= previous);
        assert!((1..=5).contains(&picks));
        assert!(picks <= pick_count(points));
        previous = picks;
        ratchet = next;
    }
    assert_eq!(previous, 1);
}
