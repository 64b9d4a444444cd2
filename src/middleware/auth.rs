use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Redirect, Response},
};
use serde_json::json;
use tower_sessions::Session;
use crate::models::{AuthSession, AUTH_SESSION_KEY};

pub async fn require_auth(
    session: Session,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path();
    let is_public = path == "/login" || path.starts_with("/static/");
    let is_api = path.starts_with("/api/");

    if is_public {
        return next.run(req).await;
    }

    match session.get::<AuthSession>(AUTH_SESSION_KEY).await {
        Ok(Some(_)) => next.run(req).await,
        Ok(None) if is_api => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Not authenticated" })),
        )
            .into_response(),
        Ok(None) => Redirect::to("/login").into_response(),
        Err(e) => {
            tracing::error!("Session lookup failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}
