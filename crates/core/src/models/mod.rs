//! Domain models for the recommendation engine

pub mod catalog;
pub mod feedback;
pub mod taste;
pub mod user;

pub use catalog::{
    normalize_platform, same_platform, CatalogItem, ContentType, DimensionVector,
    EmotionalDimension, EmotionalProfile,
};
pub use feedback::{FeedbackAction, FeedbackEntry, InteractionEvent, InteractionKind};
pub use taste::TasteProfile;
pub use user::{
    MaturityInfo, Mood, MoodMappingOverride, PlatformStats, RecommendationStyle, RuntimeWindow,
    TagWeights, TimeOfDay, UserProfile, ViewingContext,
};
