//! Session orchestration
//!
//! Assembles profile snapshots from collaborators, runs the pure engine, and
//! writes learned state back. This is the only layer that performs I/O; the
//! single-writer-per-user assumption is the caller's to uphold.

use crate::collaborators::{
    CatalogProvider, FeatureFlagProvider, InMemoryStore, InteractionHistoryStore, PickTierStore,
    TagWeightStore, TasteFeedbackStore,
};
use crate::engine::{RecommendationEngine, SessionPicks};
use crate::recommendation::RecommendationOutput;
use crate::tag_weights::TagWeightLedger;
use crate::taste::TasteProfileBlender;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use goodwatch_core::{
    CatalogItem, EmotionalProfile, EngineConfig, FeatureFlags, FeedbackAction, FeedbackEntry,
    GoodWatchError, InteractionEvent, InteractionKind, Mood, MoodMappingOverride,
    RecommendationStyle, Result, RuntimeWindow, TagWeights, TasteProfile, UserProfile,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Per-request inputs the caller knows directly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub preferred_languages: BTreeSet<String>,
    #[serde(default)]
    pub platforms: BTreeSet<String>,
    #[serde(default)]
    pub runtime_window: RuntimeWindow,
    #[serde(default)]
    pub mood: Mood,
    #[serde(default)]
    pub intent_tags: BTreeSet<String>,
    #[serde(default)]
    pub style: RecommendationStyle,
    #[serde(default)]
    pub requires_series: bool,
    #[serde(default)]
    pub mood_mapping: Option<MoodMappingOverride>,
    /// User-local wall clock time
    pub local_time: NaiveDateTime,
    pub now: DateTime<Utc>,
}

/// Collaborators a session reads from and writes to
#[derive(Clone)]
pub struct Collaborators {
    pub catalog: Arc<dyn CatalogProvider>,
    pub history: Arc<dyn InteractionHistoryStore>,
    pub tag_weights: Arc<dyn TagWeightStore>,
    pub taste: Arc<dyn TasteFeedbackStore>,
    pub tiers: Arc<dyn PickTierStore>,
    pub flags: Arc<dyn FeatureFlagProvider>,
}

impl Collaborators {
    /// One in-memory store behind every per-user interface
    pub fn in_memory(
        catalog: Arc<dyn CatalogProvider>,
        store: Arc<InMemoryStore>,
        flags: Arc<dyn FeatureFlagProvider>,
    ) -> Self {
        Self {
            catalog,
            history: store.clone(),
            tag_weights: store.clone(),
            taste: store.clone(),
            tiers: store,
            flags,
        }
    }
}

pub struct RecommendationSession {
    config: EngineConfig,
    collaborators: Collaborators,
}

impl RecommendationSession {
    pub fn new(config: EngineConfig, collaborators: Collaborators) -> Self {
        Self {
            config,
            collaborators,
        }
    }

    /// Recommend one item and log its exposure
    #[instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub async fn recommend(&self, request: &SessionRequest) -> Result<RecommendationOutput> {
        let (catalog, profile, engine) = self.prepare(request).await?;
        let output = engine.recommend(&catalog, &profile)?;
        self.log_exposure(request, &output).await?;
        Ok(output)
    }

    /// Record a "not tonight" and recommend a replacement
    #[instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub async fn recommend_after_not_tonight(
        &self,
        request: &SessionRequest,
        rejected_item_id: &str,
    ) -> Result<RecommendationOutput> {
        let (catalog, profile, engine) = self.prepare(request).await?;

        match catalog.iter().find(|item| item.id == rejected_item_id) {
            Some(rejected) => {
                self.record_feedback(
                    request.user_id,
                    rejected,
                    FeedbackAction::NotTonight,
                    request.now,
                )
                .await?;
            }
            None => {
                warn!(
                    item_id = %rejected_item_id,
                    "Rejected item missing from catalog snapshot; tag weights unchanged"
                );
                self.collaborators
                    .history
                    .append(InteractionEvent {
                        user_id: request.user_id,
                        item_id: rejected_item_id.to_string(),
                        kind: InteractionKind::Feedback(FeedbackAction::NotTonight),
                        platforms: Vec::new(),
                        tags: Vec::new(),
                        occurred_at: request.now,
                    })
                    .await?;
            }
        }

        let output = engine.recommend_after_not_tonight(&catalog, &profile, rejected_item_id)?;
        self.log_exposure(request, &output).await?;
        Ok(output)
    }

    /// Several picks sized by the user's tier ratchet
    #[instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub async fn recommend_batch(
        &self,
        request: &SessionRequest,
        engagement_points: u32,
    ) -> Result<SessionPicks> {
        let (catalog, profile, engine) = self.prepare(request).await?;
        let ratchet = self
            .collaborators
            .tiers
            .load_ratchet(request.user_id)
            .await?;

        let picks = engine.recommend_session(&catalog, &profile, engagement_points, ratchet)?;
        self.collaborators
            .tiers
            .save_ratchet(request.user_id, picks.ratchet)
            .await?;

        for pick in &picks.items {
            self.append_event(request.user_id, &pick.item, InteractionKind::Shown, request.now)
                .await?;
        }

        Ok(picks)
    }

    /// Log a reaction and persist the updated tag weights
    #[instrument(skip(self, item, action), fields(item_id = %item.id, action = %action))]
    pub async fn record_feedback(
        &self,
        user_id: Uuid,
        item: &CatalogItem,
        action: FeedbackAction,
        at: DateTime<Utc>,
    ) -> Result<TagWeights> {
        self.append_event(user_id, item, InteractionKind::Feedback(action), at)
            .await?;

        let weights = self.collaborators.tag_weights.load_weights(user_id).await?;
        let updated = TagWeightLedger::update(&weights, item, action);
        self.collaborators
            .tag_weights
            .save_weights(user_id, updated.clone())
            .await?;

        Ok(updated)
    }

    /// Store post-watch feedback and recompute the taste profile
    #[instrument(skip(self, entry, item_profiles), fields(item_id = %entry.item_id))]
    pub async fn record_taste_feedback(
        &self,
        user_id: Uuid,
        entry: FeedbackEntry,
        item_profiles: &HashMap<String, EmotionalProfile>,
        now: DateTime<Utc>,
    ) -> Result<TasteProfile> {
        let taste = &self.collaborators.taste;
        taste.append_feedback(user_id, entry).await?;

        let entries = taste.feedback(user_id).await?;
        let profile = TasteProfileBlender::recompute(&entries, item_profiles, now);
        taste.save_profile(user_id, profile.clone()).await?;

        info!(feedback_count = profile.feedback_count, "Taste profile updated");
        Ok(profile)
    }

    /// Catalog snapshot, profile snapshot and an engine for the current flags
    async fn prepare(
        &self,
        request: &SessionRequest,
    ) -> Result<(Vec<CatalogItem>, UserProfile, RecommendationEngine)> {
        let flags = self.collaborators.flags.flags().await?;
        let catalog = self.collaborators.catalog.snapshot().await?;
        let profile = self.assemble_profile(request, &flags).await?;

        let engine = RecommendationEngine::new(EngineConfig {
            features: flags,
            ..self.config.clone()
        });

        Ok((catalog, profile, engine))
    }

    async fn assemble_profile(
        &self,
        request: &SessionRequest,
        flags: &FeatureFlags,
    ) -> Result<UserProfile> {
        let user_id = request.user_id;
        let history = self.collaborators.history.history(user_id).await?;
        let tag_weights = self.collaborators.tag_weights.load_weights(user_id).await?;
        let taste_profile = if flags.taste_blending {
            self.collaborators.taste.load_profile(user_id).await?
        } else {
            None
        };

        let mut profile = UserProfile::new(user_id, request.local_time);
        profile.preferred_languages = request.preferred_languages.clone();
        profile.platforms = request.platforms.clone();
        profile.runtime_window = request.runtime_window;
        profile.mood = request.mood;
        profile.intent_tags = request.intent_tags.clone();
        profile.style = request.style;
        profile.requires_series = request.requires_series;
        profile.mood_mapping = request.mood_mapping;
        profile.tag_weights = tag_weights;
        profile.taste_profile = taste_profile;
        profile.platform_stats = history.platform_stats.clone();
        profile.maturity = Some(history.maturity);

        if flags.recency_gating {
            let window = Duration::try_hours(self.config.recency_window_hours).ok_or_else(|| {
                GoodWatchError::configuration(
                    format!(
                        "recency_window_hours out of range: {}",
                        self.config.recency_window_hours
                    ),
                    "GOODWATCH_ENGINE_RECENCY_WINDOW_HOURS",
                )
            })?;
            let recent = history.shown_within(request.now, window);
            let gated: Vec<String> = recent
                .into_iter()
                .filter(|id| {
                    !history.seen.contains(id)
                        && !history.rejected.contains(id)
                        && !history.abandoned.contains(id)
                })
                .collect();
            debug!(gated = gated.len(), "Recent exposure gating");
            profile.seen.extend(gated);
        }

        profile.seen.extend(history.seen);
        profile.rejected = history.rejected;
        profile.abandoned = history.abandoned;

        Ok(profile)
    }

    async fn log_exposure(
        &self,
        request: &SessionRequest,
        output: &RecommendationOutput,
    ) -> Result<()> {
        if let Some(item) = output.item() {
            self.append_event(request.user_id, item, InteractionKind::Shown, request.now)
                .await?;
        }
        Ok(())
    }

    async fn append_event(
        &self,
        user_id: Uuid,
        item: &CatalogItem,
        kind: InteractionKind,
        at: DateTime<Utc>,
    ) -> Result<()> {
        self.collaborators
            .history
            .append(InteractionEvent {
                user_id,
                item_id: item.id.clone(),
                kind,
                platforms: item.platforms.iter().cloned().collect(),
                tags: item.tags.iter().cloned().collect(),
                occurred_at: at,
            })
            .await
    }
}
