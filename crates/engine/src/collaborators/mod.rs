//! External collaborator interfaces
//!
//! The engine is pure; everything that touches storage or the network sits
//! behind these traits. Implementations resolve I/O failures (or surface
//! them as [`GoodWatchError::CollaboratorError`]) before the engine runs.
//!
//! [`GoodWatchError::CollaboratorError`]: goodwatch_core::GoodWatchError::CollaboratorError

pub mod cache;
pub mod history;
pub mod memory;

pub use cache::CachedCatalogProvider;
pub use history::InteractionHistory;
pub use memory::{InMemoryStore, StaticCatalog, StaticFlags};

use crate::pick_tier::TierRatchet;
use async_trait::async_trait;
use goodwatch_core::{
    CatalogItem, FeatureFlags, FeedbackEntry, InteractionEvent, Result, TagWeights, TasteProfile,
};
use uuid::Uuid;

/// Source of catalog snapshots
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn snapshot(&self) -> Result<Vec<CatalogItem>>;
}

/// Append-only log of shown items and user reactions
#[async_trait]
pub trait InteractionHistoryStore: Send + Sync {
    async fn append(&self, event: InteractionEvent) -> Result<()>;

    /// All events for a user folded into exclusion sets and counters
    async fn history(&self, user_id: Uuid) -> Result<InteractionHistory>;
}

#[async_trait]
pub trait TagWeightStore: Send + Sync {
    /// Stored weights, empty for unknown users
    async fn load_weights(&self, user_id: Uuid) -> Result<TagWeights>;
    async fn save_weights(&self, user_id: Uuid, weights: TagWeights) -> Result<()>;
}

#[async_trait]
pub trait TasteFeedbackStore: Send + Sync {
    async fn feedback(&self, user_id: Uuid) -> Result<Vec<FeedbackEntry>>;
    async fn append_feedback(&self, user_id: Uuid, entry: FeedbackEntry) -> Result<()>;
    async fn load_profile(&self, user_id: Uuid) -> Result<Option<TasteProfile>>;
    async fn save_profile(&self, user_id: Uuid, profile: TasteProfile) -> Result<()>;
}

#[async_trait]
pub trait PickTierStore: Send + Sync {
    /// Stored ratchet, the initial tier for unknown users
    async fn load_ratchet(&self, user_id: Uuid) -> Result<TierRatchet>;
    async fn save_ratchet(&self, user_id: Uuid, ratchet: TierRatchet) -> Result<()>;
}

#[async_trait]
pub trait FeatureFlagProvider: Send + Sync {
    async fn flags(&self) -> Result<FeatureFlags>;
}
