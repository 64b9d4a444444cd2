use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
};
use serde_json::json;
use crate::errors::AppError;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::LimitExceeded { .. } => StatusCode::FORBIDDEN,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Storage(_)
            | AppError::File(_)
            | AppError::Session(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to show to the caller. Storage and internal failures stay opaque.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(_) | AppError::LimitExceeded { .. } | AppError::Auth(_) => {
                self.to_string()
            }
            _ => "Server error".to_string(),
        }
    }
}

// HTML pages: authentication errors go back to the login form, the rest become plain responses.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Auth(msg) => {
                Redirect::to(&format!("/login?error={}", urlencoding::encode(&msg)))
                    .into_response()
            }
            err => {
                if err.status_code().is_server_error() {
                    tracing::error!("Request failed: {}", err);
                }
                (err.status_code(), err.public_message()).into_response()
            }
        }
    }
}

/// JSON flavour of `AppError` for the `/api` routes.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = err.status_code();
        if status.is_server_error() {
            tracing::error!("API request failed: {}", err);
        }

        let body = match &err {
            AppError::LimitExceeded {
                attempted,
                current,
                limit,
            } => json!({
                "error": err.public_message(),
                "attempted_hours": attempted,
                "current_hours": current,
                "hour_limit": limit,
                "shortfall_hours": err.shortfall(),
            }),
            _ => json!({ "error": err.public_message() }),
        };

        (status, Json(body)).into_response()
    }
}
