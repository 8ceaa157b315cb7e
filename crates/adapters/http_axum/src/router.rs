//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use leafcfg_app::ports::{ConfigStore, EventPublisher};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Merges the form routes with a health check and wraps everything in a
/// [`TraceLayer`] that logs each HTTP request/response at the `DEBUG` level
/// using the `tracing` ecosystem.
pub fn build<S, P>(state: AppState<S, P>) -> Router
where
    S: ConfigStore + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .merge(crate::forms::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use leafcfg_app::config_store::InMemoryConfigStore;
    use leafcfg_app::event_bus::InProcessEventBus;
    use leafcfg_app::services::parameter_form::ParameterFormProcessor;
    use leafcfg_domain::error::FormError;
    use leafcfg_domain::leaf::{self, LeafDefaults};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app_with<S: ConfigStore + Send + Sync + 'static>(store: S) -> Router {
        let processor = ParameterFormProcessor::new(
            leaf::registry(&LeafDefaults::default()).unwrap(),
            store,
            InProcessEventBus::new(16),
        );
        build(AppState::new(processor))
    }

    fn app() -> Router {
        app_with(InMemoryConfigStore::new())
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

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let response = app().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_serve_defaults() {
        let response = app().oneshot(get("/xnl/features")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["modelyear"], "2012");
        assert_eq!(body["maxGids"], "281");
    }

    #[tokio::test]
    async fn should_save_valid_battery_form() {
        let app = app();
        let response = app
            .clone()
            .oneshot(post_form("/xnl/battery", "suffsoc=80&chgnoteonly=yes"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "saved");
        assert_eq!(body["message"], "Nissan Leaf battery setup saved.");

        let body = json_body(app.oneshot(get("/xnl/battery")).await.unwrap()).await;
        assert_eq!(body["suffsoc"], "80");
        assert_eq!(body["autocharge"], "no");
    }

    #[tokio::test]
    async fn should_list_every_error_on_bad_request() {
        let response = app()
            .oneshot(post_form(
                "/xnl/features",
                "modelyear=2005&cfg_ev_request_port=&cabintempoffset=1",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        let errors = body["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["field"], "modelyear");
        assert_eq!(errors[0]["message"], "Model year must be ≥ 2011");
        assert_eq!(errors[1]["field"], "cfg_ev_request_port");
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_schema() {
        let response = app().oneshot(get("/xnl/climate")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_report_title_of_the_schema_it_wrote() {
        let store = Arc::new(InMemoryConfigStore::new());
        let app = app_with(Arc::clone(&store));

        let response = app
            .clone()
            .oneshot(post_form("/xnl/climate", "suffsoc=80"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(store.snapshot("xnl").unwrap().is_empty());

        let response = app
            .oneshot(post_form(
                "/xnl/features",
                "modelyear=2014&cabintempoffset=0&cfg_ev_request_port=1",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["schema"], "features");
        assert_eq!(body["message"], "Nissan Leaf feature configuration saved.");
        assert_eq!(store.snapshot("xnl").unwrap()["modelyear"], "2014");
    }

    struct BrokenStore;

    impl ConfigStore for BrokenStore {
        async fn get_params(
            &self,
            _namespace: &str,
            _keys: &[&str],
        ) -> Result<HashMap<String, String>, FormError> {
            Err(FormError::Storage("read failed".into()))
        }

        async fn set_params(
            &self,
            _namespace: &str,
            _entries: Vec<(String, String)>,
        ) -> Result<(), FormError> {
            Err(FormError::Storage("write failed".into()))
        }
    }

    #[tokio::test]
    async fn should_hide_storage_errors() {
        let response = app_with(BrokenStore)
            .oneshot(post_form("/xnl/battery", "suffsoc=10"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "internal server error");
    }
}
