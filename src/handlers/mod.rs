mod auth;
mod entries;
mod api;

pub use auth::{serve_login_page, handle_login, handle_logout};
pub use entries::{serve_index, serve_record_page, handle_record};
pub use api::{api_list_entries, api_create_entry};

use axum::response::Html;
use tower_sessions::Session;
use crate::errors::{AppError, AppResult};
use crate::models::{AuthSession, AUTH_SESSION_KEY};

/// Session of the logged-in caller, or an authentication error.
pub(crate) async fn current_session(session: &Session) -> AppResult<AuthSession> {
    session
        .get::<AuthSession>(AUTH_SESSION_KEY)
        .await?
        .ok_or_else(|| AppError::Auth("Not authenticated".into()))
}

// Store and bcrypt calls block; keep them off the async workers.
pub(crate) async fn run_blocking<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("Blocking task failed: {}", e)))?
}

/// Reads `templates/<name>` and substitutes each `{{key}}`.
pub(crate) fn render_template(name: &str, vars: &[(&str, String)]) -> AppResult<Html<String>> {
    let template = std::fs::read_to_string(format!("templates/{}", name)).map_err(|e| {
        tracing::error!("Failed to read template {}: {}", name, e);
        AppError::File(e)
    })?;

    Ok(Html(fill_placeholders(&template, vars)))
}

// One pass over the template; substituted values are never rescanned.
// Unknown placeholders are left as written.
fn fill_placeholders(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            rest = &rest[open..];
            break;
        };
        let key = &after[..close];
        match vars.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    out
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub(crate) fn error_banner(error: Option<&str>) -> String {
    match error {
        Some(msg) if !msg.is_empty() => {
            format!(r#"<p class="error">{}</p>"#, escape_html(msg))
        }
        _ => String::new(),
    }
}
