//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use leafcfg_domain::error::{FormError, ValidationError};

/// JSON error body returned by form endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<ValidationError>,
}

/// Maps [`FormError`] to an HTTP response with appropriate status code.
pub struct ApiError(FormError);

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, errors) = match self.0 {
            FormError::Rejected(errors) => (
                StatusCode::BAD_REQUEST,
                "submission rejected".to_string(),
                errors.into_vec(),
            ),
            err @ (FormError::UnknownSchema { .. } | FormError::UnknownField { .. }) => {
                (StatusCode::NOT_FOUND, err.to_string(), Vec::new())
            }
            err @ (FormError::Schema(_) | FormError::Storage(_)) => {
                tracing::error!(error = %err, "form processing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                    Vec::new(),
                )
            }
        };

        (status, Json(ErrorBody { error, errors })).into_response()
    }
}
