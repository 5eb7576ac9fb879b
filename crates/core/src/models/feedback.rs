//! Feedback and interaction models

use crate::models::catalog::DimensionVector;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// User reaction to a presented item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackAction {
    WatchNow,
    Completed,
    NotTonight,
    Abandoned,
    ShowMeAnother,
    ImplicitSkip,
}

impl FeedbackAction {
    pub const ALL: [FeedbackAction; 6] = [
        FeedbackAction::WatchNow,
        FeedbackAction::Completed,
        FeedbackAction::NotTonight,
        FeedbackAction::Abandoned,
        FeedbackAction::ShowMeAnother,
        FeedbackAction::ImplicitSkip,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackAction::WatchNow => "watch_now",
            FeedbackAction::Completed => "completed",
            FeedbackAction::NotTonight => "not_tonight",
            FeedbackAction::Abandoned => "abandoned",
            FeedbackAction::ShowMeAnother => "show_me_another",
            FeedbackAction::ImplicitSkip => "implicit_skip",
        }
    }

    /// Whether the user accepted the item
    pub fn is_acceptance(self) -> bool {
        matches!(self, FeedbackAction::WatchNow | FeedbackAction::Completed)
    }
}

impl fmt::Display for FeedbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of event recorded in the interaction log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "action", rename_all = "snake_case")]
pub enum InteractionKind {
    /// The item was presented to the user
    Shown,
    /// The user reacted to a presented item
    Feedback(FeedbackAction),
}

/// One entry of the append-only interaction log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub user_id: Uuid,
    pub item_id: String,
    pub kind: InteractionKind,
    /// Platforms the item was presented on
    #[serde(default)]
    pub platforms: Vec<String>,
    /// Tags of the item, used for documentary/kids pick detection
    #[serde(default)]
    pub tags: Vec<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Post-watch feedback used to learn the taste profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub item_id: String,

    /// Satisfaction rating on a 1–5 scale
    pub satisfaction: u8,

    /// "Would you pick this again?"; `None` when not answered
    #[serde(default)]
    pub would_pick_again: Option<bool>,

    pub recorded_at: DateTime<Utc>,

    /// User-local time the title was watched, used for context buckets
    pub watched_at_local: NaiveDateTime,

    /// Explicit post-watch sliders (0–10) for the dimensions the user rated
    #[serde(default)]
    pub felt: Option<DimensionVector>,
}

impl FeedbackEntry {
    /// Satisfaction rescaled to (0, 1]
    pub fn satisfaction_norm(&self) -> f64 {
        (self.satisfaction.clamp(1, 5) as f64) / 5.0
    }
}
