//! In-process collaborator implementations
//!
//! Backed by `DashMap`s; suitable for tests, demos and a single-node service
//! where state may be lost on restart.

use super::{
    CatalogProvider, FeatureFlagProvider, InteractionHistory, InteractionHistoryStore,
    PickTierStore, TagWeightStore, TasteFeedbackStore,
};
use crate::pick_tier::TierRatchet;
use async_trait::async_trait;
use dashmap::DashMap;
use goodwatch_core::{
    CatalogItem, FeatureFlags, FeedbackEntry, InteractionEvent, Result, TagWeights, TasteProfile,
};
use uuid::Uuid;

/// Every per-user store in memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    events: DashMap<Uuid, Vec<InteractionEvent>>,
    tag_weights: DashMap<Uuid, TagWeights>,
    feedback: DashMap<Uuid, Vec<FeedbackEntry>>,
    taste_profiles: DashMap<Uuid, TasteProfile>,
    ratchets: DashMap<Uuid, TierRatchet>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of logged events for a user
    pub fn event_count(&self, user_id: &Uuid) -> usize {
        self.events.get(user_id).map_or(0, |events| events.len())
    }
}

#[async_trait]
impl InteractionHistoryStore for InMemoryStore {
    async fn append(&self, event: InteractionEvent) -> Result<()> {
        self.events.entry(event.user_id).or_default().push(event);
        Ok(())
    }

    async fn history(&self, user_id: Uuid) -> Result<InteractionHistory> {
        Ok(self
            .events
            .get(&user_id)
            .map(|events| InteractionHistory::from_events(events.iter()))
            .unwrap_or_default())
    }
}

#[async_trait]
impl TagWeightStore for InMemoryStore {
    async fn load_weights(&self, user_id: Uuid) -> Result<TagWeights> {
        Ok(self
            .tag_weights
            .get(&user_id)
            .map(|weights| weights.clone())
            .unwrap_or_default())
    }

    async fn save_weights(&self, user_id: Uuid, weights: TagWeights) -> Result<()> {
        self.tag_weights.insert(user_id, weights);
        Ok(())
    }
}

#[async_trait]
impl TasteFeedbackStore for InMemoryStore {
    async fn feedback(&self, user_id: Uuid) -> Result<Vec<FeedbackEntry>> {
        Ok(self
            .feedback
            .get(&user_id)
            .map(|entries| entries.clone())
            .unwrap_or_default())
    }

    async fn append_feedback(&self, user_id: Uuid, entry: FeedbackEntry) -> Result<()> {
        self.feedback.entry(user_id).or_default().push(entry);
        Ok(())
    }

    async fn load_profile(&self, user_id: Uuid) -> Result<Option<TasteProfile>> {
        Ok(self.taste_profiles.get(&user_id).map(|p| p.clone()))
    }

    async fn save_profile(&self, user_id: Uuid, profile: TasteProfile) -> Result<()> {
        self.taste_profiles.insert(user_id, profile);
        Ok(())
    }
}

#[async_trait]
impl PickTierStore for InMemoryStore {
    async fn load_ratchet(&self, user_id: Uuid) -> Result<TierRatchet> {
        Ok(self
            .ratchets
            .get(&user_id)
            .map(|r| *r)
            .unwrap_or_default())
    }

    async fn save_ratchet(&self, user_id: Uuid, ratchet: TierRatchet) -> Result<()> {
        self.ratchets.insert(user_id, ratchet);
        Ok(())
    }
}

/// Fixed catalog snapshot
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    items: Vec<CatalogItem>,
}

impl StaticCatalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl CatalogProvider for StaticCatalog {
    async fn snapshot(&self) -> Result<Vec<CatalogItem>> {
        Ok(self.items.clone())
    }
}

/// Fixed feature flags
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticFlags(pub FeatureFlags);

#[async_trait]
impl FeatureFlagProvider for StaticFlags {
    async fn flags(&self) -> Result<FeatureFlags> {
        Ok(self.0)
    }
}
