use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use studystats_core::StatsError;

/// JSON API error type. Status code plus a client-safe message.
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.into(),
        }
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

impl From<StatsError> for ApiError {
    fn from(err: StatsError) -> Self {
        match &err {
            StatsError::InvalidInput(_) => Self::bad_request(err.to_string()),
            StatsError::Unauthenticated(_) => Self::unauthorized(err.to_string()),
            StatsError::OwnershipMismatch(_) => Self::forbidden(err.to_string()),
            StatsError::NotFound(_) => Self::not_found(err.to_string()),
            // Store and config failures keep their detail in the logs only.
            _ => {
                tracing::error!("api error: {}", err);
                Self::internal("internal storage failure")
            }
        }
    }
}
