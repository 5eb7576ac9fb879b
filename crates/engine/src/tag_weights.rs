//! Tag weight learning
//!
//! Bounded additive adjustments to the per-user tag weight map after each
//! reaction to a presented item. Only the tags carried by that item move.

use goodwatch_core::{CatalogItem, FeedbackAction, TagWeights};
use tracing::debug;

/// Precision weights are stored at (six decimal places)
const WEIGHT_SCALE: f64 = 1_000_000.0;

/// Pure update function over a tag weight map
pub struct TagWeightLedger;

impl TagWeightLedger {
    /// Additive change applied to every tag of the item
    pub fn delta(action: FeedbackAction) -> f64 {
        match action {
            FeedbackAction::WatchNow => 0.15,
            FeedbackAction::Completed => 0.20,
            FeedbackAction::NotTonight => -0.20,
            FeedbackAction::Abandoned => -0.40,
            FeedbackAction::ShowMeAnother => -0.05,
            FeedbackAction::ImplicitSkip => -0.05,
        }
    }

    /// Return a new map with the item's tags adjusted for `action`
    ///
    /// Weights never drop below zero. Tags the item does not carry keep their
    /// current value (or stay absent).
    pub fn update(weights: &TagWeights, item: &CatalogItem, action: FeedbackAction) -> TagWeights {
        let delta = Self::delta(action);
        let mut updated = weights.clone();

        for tag in &item.tags {
            let next = round_weight((weights.get(tag) + delta).max(0.0));
            updated.set(tag.clone(), next);
        }

        debug!(
            item_id = %item.id,
            action = %action,
            delta = delta,
            tags = item.tags.len(),
            "Updated tag weights"
        );

        updated
    }

    /// Fold a sequence of reactions, oldest first
    pub fn replay<'a>(
        weights: &TagWeights,
        events: impl IntoIterator<Item = (&'a CatalogItem, FeedbackAction)>,
    ) -> TagWeights {
        events
            .into_iter()
            .fold(weights.clone(), |acc, (item, action)| {
                Self::update(&acc, item, action)
            })
    }
}

fn round_weight(value: f64) -> f64 {
    (value * WEIGHT_SCALE).round() / WEIGHT_SCALE
}
