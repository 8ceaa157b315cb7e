//! End-to-end smoke tests for the full leafcfgd stack.
//!
//! Each test wires the complete application (in-memory config store, real
//! event bus, real processor, real axum router) and exercises the HTTP layer
//! via `tower::ServiceExt::oneshot` — no TCP port is bound.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use leafcfg_adapter_http_axum::router;
use leafcfg_adapter_http_axum::state::AppState;
use leafcfg_app::config_store::InMemoryConfigStore;
use leafcfg_app::event_bus::InProcessEventBus;
use leafcfg_app::services::parameter_form::ParameterFormProcessor;
use leafcfg_domain::leaf::{self, BatteryPreset, LeafDefaults, NAMESPACE};
use serde_json::Value;
use tower::ServiceExt;

/// Build a fully-wired router plus handles on the store and bus.
fn stack(
    defaults: &LeafDefaults,
) -> (axum::Router, Arc<InMemoryConfigStore>, Arc<InProcessEventBus>) {
    let store = Arc::new(InMemoryConfigStore::new());
    let bus = Arc::new(InProcessEventBus::new(16));
    let processor = ParameterFormProcessor::new(
        leaf::registry(defaults).expect("registry should build"),
        Arc::clone(&store),
        Arc::clone(&bus),
    );
    (router::build(AppState::new(processor)), store, bus)
}

fn app() -> axum::Router {
    stack(&LeafDefaults::default()).0
}

fn post_form(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json(resp: axum::response::Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let resp = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Feature form
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_serve_feature_defaults_for_empty_store() {
    let body = json(app().oneshot(get("/xnl/features")).await.unwrap()).await;

    assert_eq!(body["modelyear"], "2012");
    assert_eq!(body["cabintempoffset"], "0");
    assert_eq!(body["cfg_ev_request_port"], "1");
    assert_eq!(body["maxGids"], "281");
    assert_eq!(body["newCarAh"], "66");
    assert_eq!(body["soc.newcar"], "no");
    assert_eq!(body["soh.newcar"], "no");
}

#[tokio::test]
async fn should_serve_configured_preset_defaults() {
    let defaults = LeafDefaults::for_preset(BatteryPreset::Gen2_40);
    let (app, _, _) = stack(&defaults);

    let body = json(app.oneshot(get("/xnl/features")).await.unwrap()).await;

    assert_eq!(body["maxGids"], "502");
    assert_eq!(body["newCarAh"], "115");
}

#[tokio::test]
async fn should_persist_full_feature_submission() {
    let (app, store, _) = stack(&LeafDefaults::default());

    let resp = app
        .clone()
        .oneshot(post_form(
            "/xnl/features",
            "modelyear=2016&cabintempoffset=-1.5&cfg_ev_request_port=4\
             &maxgids=356&newcarah=79&socnewcar=yes&sohnewcar=no",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json(resp).await;
    assert_eq!(body["message"], "Nissan Leaf feature configuration saved.");

    let stored = store.snapshot(NAMESPACE).unwrap();
    assert_eq!(stored["modelyear"], "2016");
    assert_eq!(stored["cabintempoffset"], "-1.5");
    assert_eq!(stored["cfg_ev_request_port"], "4");
    assert_eq!(stored["maxGids"], "356");
    assert_eq!(stored["newCarAh"], "79");
    assert_eq!(stored["soc.newcar"], "yes");
    assert_eq!(stored["soh.newcar"], "no");

    let body = json(app.oneshot(get("/xnl/features")).await.unwrap()).await;
    assert_eq!(body["modelyear"], "2016");
    assert_eq!(body["soc.newcar"], "yes");
}

#[tokio::test]
async fn should_reject_whole_feature_batch_when_one_field_is_invalid() {
    let (app, store, _) = stack(&LeafDefaults::default());

    let resp = app
        .oneshot(post_form(
            "/xnl/features",
            "modelyear=2018&cabintempoffset=2&cfg_ev_request_port=99",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json(resp).await;
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["field"], "cfg_ev_request_port");
    assert_eq!(
        errors[0]["message"],
        "EV SYSTEM ACTIVATION REQUEST Pin field invalid selection"
    );
    assert!(store.snapshot(NAMESPACE).unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Battery form
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_store_negated_autocharge_and_publish_event() {
    let (app, store, bus) = stack(&LeafDefaults::default());
    let mut events = bus.subscribe();

    let resp = app
        .oneshot(post_form(
            "/xnl/battery",
            "suffrange=120&suffrangecalc=est&suffsoc=85&rangedrop=5&socdrop=3\
             &minrange=20&minsoc=15&chgnoteonly=no",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let stored = store.snapshot(NAMESPACE).unwrap();
    assert_eq!(stored["suffrangecalc"], "est");
    assert_eq!(stored["suffsoc"], "85");
    assert_eq!(stored["autocharge"], "yes");

    let event = events.recv().await.unwrap();
    assert_eq!(event.schema, "battery");
    assert_eq!(event.namespace, NAMESPACE);
    assert!(event.keys.iter().any(|key| key == "autocharge"));
}

#[tokio::test]
async fn should_reject_out_of_range_soc_values() {
    let resp = app()
        .oneshot(post_form("/xnl/battery", "suffsoc=101&minsoc=-1"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json(resp).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|error| error["field"].as_str())
        .collect();
    assert_eq!(fields, ["suffsoc", "minsoc"]);
}

#[tokio::test]
async fn should_keep_schemas_independent_in_shared_namespace() {
    let (app, store, _) = stack(&LeafDefaults::default());

    app.clone()
        .oneshot(post_form("/xnl/battery", "minsoc=12"))
        .await
        .unwrap();
    app.oneshot(post_form(
        "/xnl/features",
        "modelyear=2013&cabintempoffset=0&cfg_ev_request_port=1",
    ))
    .await
    .unwrap();

    let stored = store.snapshot(NAMESPACE).unwrap();
    assert_eq!(stored["minsoc"], "12");
    assert_eq!(stored["modelyear"], "2013");
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_not_found_for_unknown_schema() {
    let resp = app()
        .oneshot(post_form("/xnl/climate", "x=1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
