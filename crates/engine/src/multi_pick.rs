//! Several distinct picks per session

use crate::engine::RecommendationEngine;
use crate::recommendation::{Recommendation, RecommendationOutput};
use goodwatch_core::{CatalogItem, Result, UserProfile};
use tracing::{debug, instrument};

/// Repeats single selection, excluding ids already picked in the batch
pub struct MultiPickOrchestrator<'a> {
    engine: &'a RecommendationEngine,
}

impl<'a> MultiPickOrchestrator<'a> {
    pub fn new(engine: &'a RecommendationEngine) -> Self {
        Self { engine }
    }

    /// Up to `count` distinct items; fewer when candidates run out
    ///
    /// Picked ids join the seen set of a working copy of the profile, so every
    /// later pick is also valid for the original profile.
    #[instrument(skip(self, catalog, profile), fields(user_id = %profile.user_id))]
    pub fn recommend_multiple(
        &self,
        catalog: &[CatalogItem],
        profile: &UserProfile,
        count: usize,
    ) -> Result<Vec<Recommendation>> {
        let mut working = profile.clone();
        let mut picks = Vec::with_capacity(count);

        while picks.len() < count {
            match self.engine.recommend(catalog, &working)? {
                RecommendationOutput::Chosen(recommendation) => {
                    working.seen.insert(recommendation.item.id.clone());
                    picks.push(recommendation);
                }
                RecommendationOutput::Stopped { stop_condition } => {
                    debug!(
                        requested = count,
                        picked = picks.len(),
                        stop_condition = %stop_condition,
                        "Candidates exhausted before batch was full"
                    );
                    break;
                }
            }
        }

        Ok(picks)
    }
}
