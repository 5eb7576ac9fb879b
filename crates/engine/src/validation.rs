//! Item validation pipeline
//!
//! Hard constraints an item must satisfy before it can be scored. Checks run
//! in a fixed order and stop at the first failure, so the reason a caller
//! sees for an item that violates several constraints is always the same.

use crate::threshold::MoodThresholdPolicy;
use goodwatch_core::{CatalogItem, ContentType, UserProfile};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an item was rejected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum InvalidReason {
    /// Marked unavailable, or carries no platforms at all
    Unavailable,
    /// Has platforms, none of which the user subscribes to
    PlatformMismatch { item_platforms: Vec<String> },
    /// Normalized language not among the user's languages
    LanguageMismatch { language: String },
    /// Id already in seen, rejected or abandoned
    AlreadyInteracted,
    RuntimeOutOfWindow { runtime_minutes: u32, min: u32, max: u32 },
    ContentTypeMismatch { expected: ContentType, actual: ContentType },
    BelowQualityThreshold { quality_score: f64, threshold: f64 },
    /// No tag in common with the session's intent tags
    NoMatchingTags,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::Unavailable => write!(f, "item is unavailable"),
            InvalidReason::PlatformMismatch { item_platforms } => {
                write!(f, "not on any user platform (item: {})", item_platforms.join(","))
            }
            InvalidReason::LanguageMismatch { language } => {
                write!(f, "language {} not preferred", language)
            }
            InvalidReason::AlreadyInteracted => write!(f, "already interacted"),
            InvalidReason::RuntimeOutOfWindow {
                runtime_minutes,
                min,
                max,
            } => write!(f, "runtime {}m outside {}..={}", runtime_minutes, min, max),
            InvalidReason::ContentTypeMismatch { expected, actual } => {
                write!(f, "expected {:?}, got {:?}", expected, actual)
            }
            InvalidReason::BelowQualityThreshold {
                quality_score,
                threshold,
            } => write!(f, "quality {} below floor {}", quality_score, threshold),
            InvalidReason::NoMatchingTags => write!(f, "no intent tag matches"),
        }
    }
}

/// Outcome of validating one item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationResult {
    Valid,
    Invalid(InvalidReason),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn reason(&self) -> Option<&InvalidReason> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(reason) => Some(reason),
        }
    }
}

/// Ordered hard-constraint gate
pub struct ValidationPipeline;

impl ValidationPipeline {
    /// Validate an item against a profile
    ///
    /// Order: availability/platform, language, prior interaction, runtime,
    /// content type, quality floor, tag intersection.
    pub fn is_valid(item: &CatalogItem, profile: &UserProfile) -> ValidationResult {
        let checks: [fn(&CatalogItem, &UserProfile) -> Option<InvalidReason>; 7] = [
            Self::check_platform,
            Self::check_language,
            Self::check_interaction,
            Self::check_runtime,
            Self::check_content_type,
            Self::check_quality,
            Self::check_tags,
        ];

        checks
            .iter()
            .find_map(|check| check(item, profile))
            .map_or(ValidationResult::Valid, ValidationResult::Invalid)
    }

    /// Every check except prior interaction
    ///
    /// Used to tell "nothing fits" apart from "everything that fits was
    /// already shown".
    pub fn is_valid_ignoring_history(item: &CatalogItem, profile: &UserProfile) -> bool {
        Self::check_platform(item, profile).is_none()
            && Self::check_language(item, profile).is_none()
            && Self::check_runtime(item, profile).is_none()
            && Self::check_content_type(item, profile).is_none()
            && Self::check_quality(item, profile).is_none()
            && Self::check_tags(item, profile).is_none()
    }

    pub(crate) fn check_platform(item: &CatalogItem, profile: &UserProfile) -> Option<InvalidReason> {
        if !item.available || item.platforms.is_empty() {
            return Some(InvalidReason::Unavailable);
        }
        if !item.available_on_any(&profile.platforms) {
            return Some(InvalidReason::PlatformMismatch {
                item_platforms: item.platforms.iter().cloned().collect(),
            });
        }
        None
    }

    pub(crate) fn check_language(item: &CatalogItem, profile: &UserProfile) -> Option<InvalidReason> {
        if profile.accepts_language(&item.language) {
            None
        } else {
            Some(InvalidReason::LanguageMismatch {
                language: item.normalized_language(),
            })
        }
    }

    fn check_interaction(item: &CatalogItem, profile: &UserProfile) -> Option<InvalidReason> {
        profile
            .has_interacted(&item.id)
            .then_some(InvalidReason::AlreadyInteracted)
    }

    pub(crate) fn check_runtime(item: &CatalogItem, profile: &UserProfile) -> Option<InvalidReason> {
        let window = profile.runtime_window;
        if window.contains(item.runtime_minutes) {
            None
        } else {
            Some(InvalidReason::RuntimeOutOfWindow {
                runtime_minutes: item.runtime_minutes,
                min: window.min,
                max: window.max,
            })
        }
    }

    fn check_content_type(item: &CatalogItem, profile: &UserProfile) -> Option<InvalidReason> {
        let expected = if profile.requires_series {
            ContentType::Series
        } else {
            ContentType::Movie
        };
        (item.content_type != expected).then_some(InvalidReason::ContentTypeMismatch {
            expected,
            actual: item.content_type,
        })
    }

    fn check_quality(item: &CatalogItem, profile: &UserProfile) -> Option<InvalidReason> {
        let threshold =
            MoodThresholdPolicy::threshold(profile.mood, profile.time_of_day(), profile.style);
        (item.quality_score < threshold).then_some(InvalidReason::BelowQualityThreshold {
            quality_score: item.quality_score,
            threshold,
        })
    }

    fn check_tags(item: &CatalogItem, profile: &UserProfile) -> Option<InvalidReason> {
        let overlaps = item.tags.iter().any(|t| profile.intent_tags.contains(t));
        (!overlaps).then_some(InvalidReason::NoMatchingTags)
    }
}
