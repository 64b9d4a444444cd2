use axum::{
    extract::{Form, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use crate::app::AppState;
use crate::errors::{AppError, AppResult};
use crate::models::{AuthSession, EntryId, EntryView, FlashQuery, RecordForm};
use crate::services::accounting::entry_request;
use crate::services::visibility;
use super::{current_session, error_banner, escape_html, render_template, run_blocking};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub async fn serve_index(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Response> {
    let caller = current_session(&session).await?;
    tracing::debug!("Rendering entry list for {}", caller.username);

    let store = state.store.clone();
    let accounting = state.accounting.clone();
    let viewer = caller.clone();
    let (entries, usage) = run_blocking(move || {
        let entries = visibility::visible_entries(&store, &viewer)?;
        let usage = accounting.usage(viewer.user_id)?;
        Ok((entries, usage))
    })
    .await?;

    let scope = if caller.is_admin() { "All entries" } else { "My entries" };
    let html = render_template(
        "index.html",
        &[
            ("name", escape_html(&caller.name)),
            ("role", caller.role.to_string()),
            ("scope", scope.to_string()),
            ("logged", format!("{:.2}", usage.logged)),
            ("limit", format!("{:.2}", usage.limit)),
            ("remaining", format!("{:.2}", usage.remaining())),
            ("entry_count", entries.len().to_string()),
            ("entries", entry_rows(&entries)),
        ],
    )?;
    Ok(html.into_response())
}

fn entry_rows(entries: &[EntryView]) -> String {
    entries
        .iter()
        .map(|entry| {
            format!(
                r#"<tr>
                <td>{}</td>
                <td>{}</td>
                <td>{}</td>
                <td>{}</td>
                <td class="hours">{:.2}</td>
                <td>{}</td>
            </tr>"#,
                escape_html(&entry.user_name),
                escape_html(&entry.work_type),
                entry.start_time.format(TIME_FORMAT),
                entry.end_time.format(TIME_FORMAT),
                entry.hours,
                escape_html(&entry.description),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn serve_record_page(Query(flash): Query<FlashQuery>) -> AppResult<Response> {
    let html = render_template(
        "record.html",
        &[("error", error_banner(flash.error.as_deref()))],
    )?;
    Ok(html.into_response())
}

pub async fn handle_record(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RecordForm>,
) -> AppResult<Response> {
    let caller = current_session(&session).await?;

    match record_from_form(&state, &caller, form).await {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        // Rejections go back to the form with the reason shown.
        Err(e @ (AppError::Validation(_) | AppError::LimitExceeded { .. })) => {
            tracing::info!("Entry from {} rejected: {}", caller.username, e);
            Ok(Redirect::to(&format!("/record?error={}", urlencoding::encode(&e.to_string())))
                .into_response())
        }
        Err(e) => Err(e),
    }
}

async fn record_from_form(
    state: &AppState,
    caller: &AuthSession,
    form: RecordForm,
) -> AppResult<EntryId> {
    let request = entry_request(form)?;

    let accounting = state.accounting.clone();
    let user_id = caller.user_id;
    run_blocking(move || accounting.record_entry(user_id, request)).await
}
