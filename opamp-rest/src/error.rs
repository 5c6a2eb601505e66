use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use opamp_core::error::OpampError;
use serde::Serialize;

/// Newtype so we can implement `IntoResponse` for `OpampError` without
/// violating the orphan rule; REST handlers return `Result<T, ApiError>`
/// and `?`-propagate straight out of `opamp-core`/usecase calls.
pub struct ApiError(pub OpampError);

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl From<OpampError> for ApiError {
    fn from(err: OpampError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            OpampError::NotFound(_) => StatusCode::NOT_FOUND,
            OpampError::AlreadyExists(_) => StatusCode::CONFLICT,
            OpampError::UnsupportedOperation(_) => StatusCode::BAD_REQUEST,
            OpampError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            OpampError::NotConnected => StatusCode::OK,
            OpampError::Conflict(_) => StatusCode::CONFLICT,
            OpampError::Internal(_) => {
                tracing::error!(error = %self.0, "internal error serving REST request");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(ErrorBody { error: self.0.to_string() })).into_response()
    }
}
