use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{core::error::DispatchError, server::payload::PayloadError};

pub enum ApiError {
    /// The request cannot be served as is, the message says why.
    BadRequest(String),

    /// Anything unexpected, the details stay in the logs.
    Internal,
}

impl From<PayloadError> for ApiError {
    fn from(error: PayloadError) -> Self {
        Self::BadRequest(error.to_string())
    }
}

impl From<DispatchError> for ApiError {
    fn from(error: DispatchError) -> Self {
        Self::BadRequest(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
