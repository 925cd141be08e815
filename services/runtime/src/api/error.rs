use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kactor_protocol::{Envelope, InvocationError};

/// A failed invocation, rendered as the `{"error": ...}` envelope.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: InvocationError,
}

impl ApiError {
    pub fn bad_request(error: InvocationError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl From<InvocationError> for ApiError {
    fn from(error: InvocationError) -> Self {
        Self::bad_request(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(Envelope::from(self.error))).into_response()
    }
}
