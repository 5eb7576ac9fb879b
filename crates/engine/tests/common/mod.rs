#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use goodwatch_core::{CatalogItem, ContentType, EmotionalProfile, RuntimeWindow, UserProfile};
use uuid::Uuid;

/// Wednesday 2024-01-10 20:00 local
pub fn evening() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 10)
        .and_then(|d| d.and_hms_opt(20, 0, 0))
        .unwrap()
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 10, 20, 0, 0).unwrap()
}

pub fn profile(user: u128) -> UserProfile {
    let mut profile = UserProfile::new(Uuid::from_u128(user), evening());
    profile.preferred_languages.insert("en".to_string());
    profile.platforms.insert("netflix".to_string());
    profile.runtime_window = RuntimeWindow { min: 60, max: 150 };
    profile.intent_tags.insert("comfort".to_string());
    profile
}

pub fn item(id: &str, tags: &[&str], quality: f64) -> CatalogItem {
    CatalogItem {
        id: id.to_string(),
        title: format!("Title {}", id),
        language: "English".to_string(),
        runtime_minutes: 100,
        platforms: ["netflix".to_string()].into_iter().collect(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        quality_score: quality,
        available: true,
        content_type: ContentType::Movie,
        emotional_profile: Some(EmotionalProfile::from_array([
            6.0, 3.0, 4.0, 5.0, 5.0, 6.0, 6.0, 5.0,
        ])),
    }
}

/// Mixed catalog: valid titles with varied tags plus a few that fail validation
pub fn catalog() -> Vec<CatalogItem> {
    let mut items = vec![
        item("a01", &["comfort", "safe_bet"], 80.0),
        item("a02", &["comfort", "funny"], 82.0),
        item("a03", &["comfort", "crowd_pleaser", "romance"], 90.0),
        item("a04", &["comfort", "polarizing"], 77.0),
        item("a05", &["comfort"], 95.0),
        item("a06", &["comfort", "feel_good", "safe_bet"], 86.0),
        item("a07", &["comfort", "challenging"], 88.0),
        item("a08", &["comfort", "funny", "safe_bet"], 79.0),
    ];

    let mut hindi = item("x01", &["comfort"], 90.0);
    hindi.language = "Hindi".to_string();
    let mut elsewhere = item("x02", &["comfort"], 90.0);
    elsewhere.platforms = ["hulu".to_string()].into_iter().collect();
    let mut long = item("x03", &["comfort"], 90.0);
    long.runtime_minutes = 200;
    let weak = item("x04", &["comfort"], 40.0);
    let off_intent = item("x05", &["dark", "thriller"], 90.0);
    let mut series = item("x06", &["comfort"], 90.0);
    series.content_type = ContentType::Series;
    let mut gone = item("x07", &["comfort"], 90.0);
    gone.available = false;

    items.extend([hindi, elsewhere, long, weak, off_intent, series, gone]);
    items
}
