//! Recommendation engine
//!
//! Pure decision pipeline over one catalog snapshot and one profile snapshot:
//!
//! 1. Validate every item (plus family-content gating when it applies)
//! 2. Diagnose a stop condition if nothing survives
//! 3. Score survivors and sample one from the top of the ranking
//!
//! The engine holds no per-user state and performs no I/O; the same inputs
//! always produce the same output, whatever the order of the catalog.

use crate::maturity::ContentMaturityFilter;
use crate::multi_pick::MultiPickOrchestrator;
use crate::pick_tier::TierRatchet;
use crate::recommendation::{Recommendation, RecommendationOutput};
use crate::scoring::{matched_intent_tags, ScoringModel};
use crate::selection::{ScoredCandidate, SelectionSampler};
use crate::stop::StopConditionClassifier;
use crate::validation::{ValidationPipeline, ValidationResult};
use goodwatch_core::{CatalogItem, EngineConfig, GoodWatchError, Result, UserProfile};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

/// Picks for one session under the tier ratchet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPicks {
    /// Effective pick count for this session
    pub pick_count: u8,
    /// Ratchet to persist for the next session
    pub ratchet: TierRatchet,
    pub items: Vec<Recommendation>,
}

/// Soft penalty for near-duplicates of a rejected item
#[derive(Debug, Clone)]
struct SimilarityPenalty<'a> {
    rejected: &'a CatalogItem,
    multiplier: f64,
    min_shared_tags: usize,
}

impl SimilarityPenalty<'_> {
    fn apply(&self, item: &CatalogItem, score: f64) -> f64 {
        if item.shared_tag_count(self.rejected) >= self.min_shared_tags {
            score * self.multiplier
        } else {
            score
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    config: EngineConfig,
    scoring: ScoringModel,
    sampler: SelectionSampler,
}

impl RecommendationEngine {
    pub fn new(config: EngineConfig) -> Self {
        let scoring = ScoringModel::new(config.features);
        let sampler = SelectionSampler::new(config.top_k, config.softmax_temperature);
        Self {
            config,
            scoring,
            sampler,
        }
    }

    pub fn with_default_config() -> Self {
        Self::new(EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scoring(&self) -> &ScoringModel {
        &self.scoring
    }

    pub fn is_valid(&self, item: &CatalogItem, profile: &UserProfile) -> ValidationResult {
        ValidationPipeline::is_valid(item, profile)
    }

    pub fn score(&self, item: &CatalogItem, profile: &UserProfile) -> f64 {
        self.scoring.score(item, profile)
    }

    /// Choose the next item for a profile, or explain why there is none
    #[instrument(skip_all, fields(user_id = %profile.user_id, catalog_size = catalog.len()))]
    pub fn recommend(
        &self,
        catalog: &[CatalogItem],
        profile: &UserProfile,
    ) -> Result<RecommendationOutput> {
        profile.validate()?;
        self.decide(catalog, profile, None)
    }

    /// Choose again after the user dismissed an item with "not tonight"
    ///
    /// The rejected item is excluded outright; remaining candidates sharing
    /// enough tags with it are discounted but stay eligible.
    #[instrument(skip(self, catalog, profile), fields(user_id = %profile.user_id, catalog_size = catalog.len()))]
    pub fn recommend_after_not_tonight(
        &self,
        catalog: &[CatalogItem],
        profile: &UserProfile,
        rejected_item_id: &str,
    ) -> Result<RecommendationOutput> {
        profile.validate()?;

        let mut profile = profile.clone();
        if !profile.has_interacted(rejected_item_id) {
            profile.rejected.insert(rejected_item_id.to_string());
        }

        let penalty = catalog
            .iter()
            .find(|item| item.id == rejected_item_id)
            .map(|rejected| SimilarityPenalty {
                rejected,
                multiplier: self.config.not_tonight_penalty,
                min_shared_tags: self.config.not_tonight_min_shared_tags,
            });
        if penalty.is_none() {
            debug!(rejected_item_id, "Rejected item not in catalog; no similarity penalty");
        }

        self.decide(catalog, &profile, penalty.as_ref())
    }

    /// Up to `count` distinct items, each valid for the profile
    pub fn recommend_multiple(
        &self,
        catalog: &[CatalogItem],
        profile: &UserProfile,
        count: usize,
    ) -> Result<Vec<Recommendation>> {
        MultiPickOrchestrator::new(self).recommend_multiple(catalog, profile, count)
    }

    /// Picks for a session: pick count from the ratchet, then that many items
    #[instrument(skip(self, catalog, profile), fields(user_id = %profile.user_id, catalog_size = catalog.len()))]
    pub fn recommend_session(
        &self,
        catalog: &[CatalogItem],
        profile: &UserProfile,
        engagement_points: u32,
        ratchet: TierRatchet,
    ) -> Result<SessionPicks> {
        let (pick_count, ratchet) = ratchet.advance(engagement_points);
        let items = self.recommend_multiple(catalog, profile, pick_count as usize)?;

        info!(pick_count, returned = items.len(), "Session picks ready");

        Ok(SessionPicks {
            pick_count,
            ratchet,
            items,
        })
    }

    fn decide(
        &self,
        catalog: &[CatalogItem],
        profile: &UserProfile,
        penalty: Option<&SimilarityPenalty<'_>>,
    ) -> Result<RecommendationOutput> {
        let candidates = self.candidates(catalog, profile);
        if candidates.is_empty() {
            let condition = StopConditionClassifier::diagnose(catalog, profile);
            return Ok(RecommendationOutput::stopped(condition));
        }

        let scored: Vec<ScoredCandidate<'_>> = candidates
            .iter()
            .copied()
            .map(|item| {
                let score = self.scoring.score(item, profile);
                let score = penalty.map_or(score, |p| p.apply(item, score));
                ScoredCandidate { item, score }
            })
            .collect();

        debug!(candidates = scored.len(), "Scored candidates");

        let Some(chosen) = self.sampler.select(&profile.user_id, &scored) else {
            let condition = StopConditionClassifier::diagnose(catalog, profile);
            return Ok(RecommendationOutput::stopped(condition));
        };

        self.ensure_valid(chosen.item, profile)?;

        info!(item_id = %chosen.item.id, score = chosen.score, "Recommended item");

        Ok(RecommendationOutput::Chosen(Recommendation {
            item: chosen.item.clone(),
            score: chosen.score,
            breakdown: self.scoring.breakdown(chosen.item, profile),
            matched_tags: matched_intent_tags(chosen.item, profile),
        }))
    }

    fn candidates<'a>(
        &self,
        catalog: &'a [CatalogItem],
        profile: &UserProfile,
    ) -> Vec<&'a CatalogItem> {
        catalog
            .iter()
            .filter(|item| ValidationPipeline::is_valid(item, profile).is_valid())
            .filter(|item| {
                profile
                    .maturity
                    .as_ref()
                    .map_or(true, |m| !ContentMaturityFilter::should_exclude(item, m))
            })
            .collect()
    }

    /// A selected item must pass its own validity predicate
    ///
    /// Panics in debug builds; release builds log and return
    /// [`GoodWatchError::InvariantViolation`] so the item never reaches a user.
    fn ensure_valid(&self, item: &CatalogItem, profile: &UserProfile) -> Result<()> {
        let ValidationResult::Invalid(reason) = ValidationPipeline::is_valid(item, profile) else {
            return Ok(());
        };

        error!(
            item_id = %item.id,
            user_id = %profile.user_id,
            reason = %reason,
            "Engine selected an invalid item"
        );
        if cfg!(debug_assertions) {
            panic!("engine selected invalid item {}: {}", item.id, reason);
        }

        Err(GoodWatchError::InvariantViolation {
            item_id: item.id.clone(),
            reason: reason.to_string(),
        })
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::with_default_config()
    }
}
