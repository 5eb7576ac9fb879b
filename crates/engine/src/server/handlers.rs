//! Stateless engine endpoints
//!
//! Each request carries the full catalog and profile snapshot; nothing is
//! persisted between calls.

use super::AppState;
use crate::error::{EngineError, Result};
use crate::pick_tier::TierRatchet;
use crate::tag_weights::TagWeightLedger;
use actix_web::{web, HttpResponse};
use goodwatch_core::language::{is_known_language, validate_language};
use goodwatch_core::{CatalogItem, FeedbackAction, TagWeights, UserProfile};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub catalog: Vec<CatalogItem>,
    pub profile: UserProfile,
}

#[derive(Debug, Deserialize)]
pub struct NotTonightRequest {
    #[serde(default)]
    pub catalog: Vec<CatalogItem>,
    pub profile: UserProfile,
    pub rejected_item_id: String,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub catalog: Vec<CatalogItem>,
    pub profile: UserProfile,
    #[serde(default)]
    pub engagement_points: u32,
    /// Ratchet persisted by the caller; the initial tier when absent
    #[serde(default)]
    pub ratchet: Option<TierRatchet>,
}

#[derive(Debug, Deserialize)]
pub struct TagWeightRequest {
    #[serde(default)]
    pub weights: TagWeights,
    pub item: CatalogItem,
    pub action: FeedbackAction,
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub item: CatalogItem,
    pub profile: UserProfile,
}

/// POST /v1/recommend
pub async fn recommend(
    state: web::Data<AppState>,
    body: web::Json<RecommendRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner();
    validate_catalog(&request.catalog)?;

    let output = state.engine.recommend(&request.catalog, &request.profile)?;
    Ok(HttpResponse::Ok().json(output))
}

/// POST /v1/recommend/not-tonight
pub async fn recommend_after_not_tonight(
    state: web::Data<AppState>,
    body: web::Json<NotTonightRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner();
    if request.rejected_item_id.trim().is_empty() {
        return Err(EngineError::InvalidRequest(
            "rejected_item_id must not be empty".to_string(),
        ));
    }
    validate_catalog(&request.catalog)?;

    let output = state.engine.recommend_after_not_tonight(
        &request.catalog,
        &request.profile,
        &request.rejected_item_id,
    )?;
    Ok(HttpResponse::Ok().json(output))
}

/// POST /v1/recommend/batch
pub async fn recommend_batch(
    state: web::Data<AppState>,
    body: web::Json<BatchRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner();
    validate_catalog(&request.catalog)?;

    let picks = state.engine.recommend_session(
        &request.catalog,
        &request.profile,
        request.engagement_points,
        request.ratchet.unwrap_or_default(),
    )?;

    info!(
        user_id = %request.profile.user_id,
        pick_count = picks.pick_count,
        returned = picks.items.len(),
        "Batch recommendation served"
    );

    Ok(HttpResponse::Ok().json(picks))
}

/// POST /v1/tag-weights
pub async fn update_tag_weights(body: web::Json<TagWeightRequest>) -> Result<HttpResponse> {
    let request = body.into_inner();
    let updated = TagWeightLedger::update(&request.weights, &request.item, request.action);
    Ok(HttpResponse::Ok().json(updated))
}

/// POST /v1/validate
pub async fn validate_item(
    state: web::Data<AppState>,
    body: web::Json<ValidateRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner();
    let result = state.engine.is_valid(&request.item, &request.profile);
    Ok(HttpResponse::Ok().json(result))
}

/// Field ranges, non-empty languages and unique ids
fn validate_catalog(catalog: &[CatalogItem]) -> Result<()> {
    let mut ids = HashSet::with_capacity(catalog.len());
    for item in catalog {
        if !ids.insert(item.id.as_str()) {
            return Err(EngineError::InvalidRequest(format!(
                "duplicate catalog item id {}",
                item.id
            )));
        }
        if let Err(e) = item.validate() {
            warn!(item_id = %item.id, error = %e, "Rejected malformed catalog item");
            return Err(EngineError::InvalidRequest(format!(
                "catalog item {}: {}",
                item.id, e
            )));
        }
        validate_language(&item.language)?;
        if !is_known_language(&item.language) {
            debug!(item_id = %item.id, language = %item.language, "Unrecognized catalog language");
        }
    }
    Ok(())
}
