pub mod handlers;

use crate::engine::RecommendationEngine;
use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
}

impl AppState {
    pub fn new(engine: RecommendationEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    service: String,
    version: String,
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: "goodwatch-engine".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Configure application routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health)).service(
        web::scope("/v1")
            .route("/recommend", web::post().to(handlers::recommend))
            .route(
                "/recommend/not-tonight",
                web::post().to(handlers::recommend_after_not_tonight),
            )
            .route("/recommend/batch", web::post().to(handlers::recommend_batch))
            .route("/tag-weights", web::post().to(handlers::update_tag_weights))
            .route("/validate", web::post().to(handlers::validate_item)),
    );
}
