use axum::{
    extract::{Form, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use crate::app::AppState;
use crate::errors::AppResult;
use crate::models::{AuthSession, FlashQuery, LoginForm, AUTH_SESSION_KEY};
use super::{error_banner, render_template, run_blocking};

pub async fn serve_login_page(
    session: Session,
    Query(flash): Query<FlashQuery>,
) -> AppResult<Response> {
    if session.get::<AuthSession>(AUTH_SESSION_KEY).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let html = render_template(
        "login.html",
        &[("error", error_banner(flash.error.as_deref()))],
    )?;
    Ok(html.into_response())
}

#[axum::debug_handler]
pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    Form(login_form): Form<LoginForm>,
) -> AppResult<Response> {
    let LoginForm { username, password } = login_form;
    let auth = state.auth.clone();

    // Auth errors render as a redirect back to the login form.
    let auth_session = run_blocking(move || auth.login(&username, &password)).await?;

    session.cycle_id().await?;
    session.insert(AUTH_SESSION_KEY, &auth_session).await?;

    Ok(Redirect::to("/").into_response())
}

#[axum::debug_handler]
pub async fn handle_logout(session: Session) -> Response {
    match session.get::<AuthSession>(AUTH_SESSION_KEY).await {
        Ok(Some(auth_session)) => tracing::info!("User {} logged out", auth_session.username),
        Ok(None) => {}
        Err(e) => tracing::warn!("Session lookup during logout failed: {}", e),
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Session flush error: {}", e);
    }
    Redirect::to("/login").into_response()
}
