//! GoodWatch Engine - recommendation decision service
//!
//! Port: 8082 (GOODWATCH_SERVICE_PORT)

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use goodwatch_core::{init_logging, load_dotenv, ConfigLoader, EngineConfig, ServiceConfig};
use goodwatch_engine::server::{configure_routes, AppState};
use goodwatch_engine::RecommendationEngine;
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let service = ServiceConfig::from_env().context("loading service configuration")?;
    let engine_config = EngineConfig::from_env().context("loading engine configuration")?;
    service.validate().context("validating service configuration")?;
    engine_config
        .validate()
        .context("validating engine configuration")?;

    init_logging(&service.log_config()?)?;

    info!(
        host = %service.host,
        port = service.port,
        workers = service.workers,
        top_k = engine_config.top_k,
        features = ?engine_config.features,
        "Starting GoodWatch engine"
    );

    let state = web::Data::new(AppState::new(RecommendationEngine::new(engine_config)));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(configure_routes)
    })
    .workers(service.workers)
    .bind((service.host.as_str(), service.port))?
    .run()
    .await?;

    Ok(())
}
