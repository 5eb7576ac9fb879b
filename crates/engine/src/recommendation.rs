//! Engine output types

use crate::scoring::ScoreBreakdown;
use crate::stop::StopCondition;
use goodwatch_core::CatalogItem;
use serde::{Deserialize, Serialize};

/// A chosen item together with what it was chosen for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub item: CatalogItem,

    /// Score the item was ranked by, after any similarity penalty
    pub score: f64,

    pub breakdown: ScoreBreakdown,

    /// Intent tags the item satisfies
    pub matched_tags: Vec<String>,
}

/// Result of one decision: an item or the reason there is none
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecommendationOutput {
    Chosen(Recommendation),
    Stopped { stop_condition: StopCondition },
}

impl RecommendationOutput {
    pub fn stopped(stop_condition: StopCondition) -> Self {
        Self::Stopped { stop_condition }
    }

    pub fn item(&self) -> Option<&CatalogItem> {
        match self {
            Self::Chosen(recommendation) => Some(&recommendation.item),
            Self::Stopped { .. } => None,
        }
    }

    pub fn recommendation(&self) -> Option<&Recommendation> {
        match self {
            Self::Chosen(recommendation) => Some(recommendation),
            Self::Stopped { .. } => None,
        }
    }

    pub fn into_recommendation(self) -> Option<Recommendation> {
        match self {
            Self::Chosen(recommendation) => Some(recommendation),
            Self::Stopped { .. } => None,
        }
    }

    pub fn stop_condition(&self) -> Option<StopCondition> {
        match self {
            Self::Chosen(_) => None,
            Self::Stopped { stop_condition } => Some(*stop_condition),
        }
    }
}
