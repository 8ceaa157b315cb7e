//! Form handlers — one GET/POST pair serves every registered schema.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Json, Router};
use serde::Serialize;

use leafcfg_app::ports::{ConfigStore, EventPublisher};
use leafcfg_domain::batch::SubmittedValues;
use leafcfg_domain::leaf::NAMESPACE;

use crate::error::ApiError;
use crate::state::AppState;

/// Body returned after a successful commit.
#[derive(Debug, Serialize)]
pub struct SavedBody {
    pub status: &'static str,
    pub schema: String,
    pub message: String,
    /// Storage keys written.
    pub keys: Vec<String>,
}

/// Possible responses from the read endpoint.
pub enum ReadResponse {
    Ok(Json<BTreeMap<String, String>>),
}

impl IntoResponse for ReadResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the submit endpoint.
pub enum SubmitResponse {
    Saved(Json<SavedBody>),
}

impl IntoResponse for SubmitResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Saved(json) => json.into_response(),
        }
    }
}

/// Build the form sub-router.
pub fn routes<S, P>() -> Router<AppState<S, P>>
where
    S: ConfigStore + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    Router::new().route(
        &format!("/{NAMESPACE}/{{schema}}"),
        get(read::<S, P>).post(submit::<S, P>),
    )
}

/// `GET /xnl/:schema`
pub async fn read<S, P>(
    State(state): State<AppState<S, P>>,
    Path(schema): Path<String>,
) -> Result<ReadResponse, ApiError>
where
    S: ConfigStore + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    let values = state.processor.read(&schema).await?;
    Ok(ReadResponse::Ok(Json(values)))
}

/// `POST /xnl/:schema`
pub async fn submit<S, P>(
    State(state): State<AppState<S, P>>,
    Path(schema): Path<String>,
    Form(submitted): Form<SubmittedValues>,
) -> Result<SubmitResponse, ApiError>
where
    S: ConfigStore + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    // resolved before the write so a stored batch is never answered with an error
    let title = state.processor.schema(&schema)?.title().to_string();
    let committed = state.processor.submit(&schema, &submitted).await?;
    Ok(SubmitResponse::Saved(Json(SavedBody {
        status: "saved",
        message: format!("{title} saved."),
        schema: committed.schema,
        keys: committed.keys,
    })))
}
