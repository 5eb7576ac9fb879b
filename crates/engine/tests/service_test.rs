mod common;

use actix_web::{test, web, App};
use common::{catalog, item, profile};
use goodwatch_engine::server::{configure_routes, AppState};
use goodwatch_engine::RecommendationEngine;
use serde_json::{json, Value};

macro_rules! app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new(RecommendationEngine::default())))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_recommend_returns_chosen_item() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/v1/recommend")
        .set_json(json!({ "catalog": catalog(), "profile": profile(1) }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["outcome"], "chosen");
    let id = body["item"]["id"].as_str().unwrap();
    assert!(id.starts_with('a'));
    assert_eq!(body["matched_tags"], json!(["comfort"]));
    assert!(body["breakdown"]["final_score"].is_number());
}

#[actix_web::test]
async fn test_recommend_reports_stop_condition() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/v1/recommend")
        .set_json(json!({ "catalog": [], "profile": profile(1) }))
        .to_request();

    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["outcome"], "stopped");
    assert_eq!(body["stop_condition"], "empty_catalog");
}

#[actix_web::test]
async fn test_duplicate_ids_rejected() {
    let app = app!();
    let twice = vec![item("a01", &["comfort"], 80.0), item("a01", &["comfort"], 90.0)];
    let req = test::TestRequest::post()
        .uri("/v1/recommend")
        .set_json(json!({ "catalog": twice, "profile": profile(1) }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_request");
}

#[actix_web::test]
async fn test_malformed_item_rejected() {
    let app = app!();
    let broken = vec![item("a01", &["comfort"], 140.0)];
    let req = test::TestRequest::post()
        .uri("/v1/recommend")
        .set_json(json!({ "catalog": broken, "profile": profile(1) }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let mut unnamed = item("a02", &["comfort"], 80.0);
    unnamed.language = "  ".to_string();
    let req = test::TestRequest::post()
        .uri("/v1/recommend")
        .set_json(json!({ "catalog": [unnamed], "profile": profile(1) }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation_error");
}

#[actix_web::test]
async fn test_invalid_profile_is_bad_request() {
    let app = app!();
    let mut broken = profile(1);
    broken.runtime_window.min = 200;
    let req = test::TestRequest::post()
        .uri("/v1/recommend")
        .set_json(json!({ "catalog": catalog(), "profile": broken }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation_error");
}

#[actix_web::test]
async fn test_not_tonight_excludes_rejected() {
    let app = app!();
    let items = vec![item("a01", &["comfort"], 80.0), item("a02", &["comfort"], 80.0)];
    let req = test::TestRequest::post()
        .uri("/v1/recommend/not-tonight")
        .set_json(json!({
            "catalog": items,
            "profile": profile(1),
            "rejected_item_id": "a01"
        }))
        .to_request();

    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["outcome"], "chosen");
    assert_eq!(body["item"]["id"], "a02");
}

#[actix_web::test]
async fn test_not_tonight_requires_item_id() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/v1/recommend/not-tonight")
        .set_json(json!({
            "catalog": catalog(),
            "profile": profile(1),
            "rejected_item_id": "  "
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_batch_applies_ratchet() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/v1/recommend/batch")
        .set_json(json!({
            "catalog": catalog(),
            "profile": profile(1),
            "engagement_points": 0,
            "ratchet": { "max_tier_reached": 2 }
        }))
        .to_request();

    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["pick_count"], 2);
    assert_eq!(body["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["ratchet"]["max_tier_reached"], 2);
}

#[actix_web::test]
async fn test_tag_weight_update() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/v1/tag-weights")
        .set_json(json!({
            "weights": { "dark": 0.5 },
            "item": item("a01", &["comfort", "safe_bet"], 80.0),
            "action": "abandoned"
        }))
        .to_request();

    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["comfort"], 0.6);
    assert_eq!(body["safe_bet"], 0.6);
    assert_eq!(body["dark"], 0.5);
}

#[actix_web::test]
async fn test_validate_reports_reason() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/v1/validate")
        .set_json(json!({
            "item": item("weak", &["comfort"], 50.0),
            "profile": profile(1)
        }))
        .to_request();

    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "invalid");
    assert_eq!(body["reason"], "below_quality_threshold");
    assert_eq!(body["threshold"], 75.0);

    let req = test::TestRequest::post()
        .uri("/v1/validate")
        .set_json(json!({
            "item": item("good", &["comfort"], 80.0),
            "profile": profile(1)
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "valid");
}

#[actix_web::test]
async fn test_tag_weight_update_clamps_submitted_negatives() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/v1/tag-weights")
        .set_json(json!({
            "weights": { "dark": -0.5 },
            "item": item("a01", &["comfort"], 80.0),
            "action": "watch_now"
        }))
        .to_request();

    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["comfort"], 1.15);
    assert_eq!(body["dark"], 0.0);
}
