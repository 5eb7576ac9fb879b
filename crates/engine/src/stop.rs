//! Stop condition diagnosis
//!
//! When no catalog item survives validation the engine says why instead of
//! returning nothing. The catalog is narrowed one constraint at a time
//! (language, then platform, then runtime) and the first constraint that
//! empties the pool names the stop condition.

use crate::maturity::ContentMaturityFilter;
use crate::validation::ValidationPipeline;
use goodwatch_core::{CatalogItem, UserProfile};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Why nothing was recommended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopCondition {
    EmptyCatalog,
    NoLanguageMatch,
    NoPlatformMatch,
    NoRuntimeWindowMatch,
    /// Everything otherwise eligible was already seen, rejected or abandoned
    AllOptionsExhausted,
    NoValidCandidates,
}

impl StopCondition {
    pub fn as_str(self) -> &'static str {
        match self {
            StopCondition::EmptyCatalog => "empty_catalog",
            StopCondition::NoLanguageMatch => "no_language_match",
            StopCondition::NoPlatformMatch => "no_platform_match",
            StopCondition::NoRuntimeWindowMatch => "no_runtime_window_match",
            StopCondition::AllOptionsExhausted => "all_options_exhausted",
            StopCondition::NoValidCandidates => "no_valid_candidates",
        }
    }
}

impl fmt::Display for StopCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct StopConditionClassifier;

impl StopConditionClassifier {
    /// Diagnose an empty candidate set against the unfiltered catalog
    ///
    /// Only meaningful when no item of `catalog` is a valid candidate for
    /// `profile`.
    pub fn diagnose(catalog: &[CatalogItem], profile: &UserProfile) -> StopCondition {
        let condition = Self::classify(catalog, profile);
        info!(
            user_id = %profile.user_id,
            catalog_size = catalog.len(),
            stop_condition = %condition,
            "No candidates left"
        );
        condition
    }

    fn classify(catalog: &[CatalogItem], profile: &UserProfile) -> StopCondition {
        if catalog.is_empty() {
            return StopCondition::EmptyCatalog;
        }

        let language: Vec<&CatalogItem> = catalog
            .iter()
            .filter(|item| ValidationPipeline::check_language(item, profile).is_none())
            .collect();
        if language.is_empty() {
            return StopCondition::NoLanguageMatch;
        }

        let platform: Vec<&CatalogItem> = language
            .into_iter()
            .filter(|item| ValidationPipeline::check_platform(item, profile).is_none())
            .collect();
        if platform.is_empty() {
            return StopCondition::NoPlatformMatch;
        }

        let runtime: Vec<&CatalogItem> = platform
            .into_iter()
            .filter(|item| ValidationPipeline::check_runtime(item, profile).is_none())
            .collect();
        if runtime.is_empty() {
            return StopCondition::NoRuntimeWindowMatch;
        }

        let eligible = runtime.into_iter().any(|item| {
            ValidationPipeline::is_valid_ignoring_history(item, profile)
                && !Self::withheld(item, profile)
        });
        if eligible {
            StopCondition::AllOptionsExhausted
        } else {
            StopCondition::NoValidCandidates
        }
    }

    fn withheld(item: &CatalogItem, profile: &UserProfile) -> bool {
        profile
            .maturity
            .as_ref()
            .is_some_and(|maturity| ContentMaturityFilter::should_exclude(item, maturity))
    }
}
