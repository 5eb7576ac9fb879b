//! GoodWatch Recommendation Decision Engine
//!
//! Decides, for one user at one moment, which single catalog item to present
//! next, or precisely why nothing can be presented. The decision pipeline is
//! pure and deterministic; collaborator traits and a session layer around it
//! handle catalog snapshots and per-user learned state.

pub mod collaborators;
pub mod engine;
pub mod error;
pub mod maturity;
pub mod multi_pick;
pub mod pick_tier;
pub mod recommendation;
pub mod scoring;
pub mod selection;
pub mod server;
pub mod session;
pub mod stop;
pub mod tag_weights;
pub mod taste;
pub mod threshold;
pub mod validation;

// Re-export key types
pub use collaborators::{
    CachedCatalogProvider, CatalogProvider, FeatureFlagProvider, InMemoryStore,
    InteractionHistory, InteractionHistoryStore, PickTierStore, StaticCatalog, StaticFlags,
    TagWeightStore, TasteFeedbackStore,
};
pub use engine::{RecommendationEngine, SessionPicks};
pub use error::EngineError;
pub use maturity::ContentMaturityFilter;
pub use multi_pick::MultiPickOrchestrator;
pub use pick_tier::{pick_count, TierRatchet};
pub use recommendation::{Recommendation, RecommendationOutput};
pub use scoring::{ScoreBreakdown, ScoringModel};
pub use selection::SelectionSampler;
pub use session::{Collaborators, RecommendationSession, SessionRequest};
pub use stop::{StopCondition, StopConditionClassifier};
pub use tag_weights::TagWeightLedger;
pub use taste::TasteProfileBlender;
pub use threshold::MoodThresholdPolicy;
pub use validation::{InvalidReason, ValidationPipeline, ValidationResult};

#[cfg(test)]
mod tests;
