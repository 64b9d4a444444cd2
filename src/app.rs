use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::TraceLayer,
};
use tower_sessions::cookie::SameSite;
use tower_sessions::{MemoryStore, SessionManagerLayer};
use crate::config::Config;
use crate::services::{AccountingService, AuthService, LedgerStore};
use crate::{handlers, middleware};

/// Application state shared between handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: LedgerStore,
    pub accounting: AccountingService,
    pub auth: AuthService,
    pub config: Config,
}

impl AppState {
    pub fn new(store: LedgerStore, config: Config) -> Self {
        Self {
            accounting: AccountingService::new(store.clone()),
            auth: AuthService::new(store.clone()),
            store,
            config,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(state.config.session.secure)
        .with_same_site(SameSite::Lax)
        .with_name(state.config.session.cookie_name.clone());

    let max_body_size = state.config.server.max_body_size;

    Router::new()
        // Pages
        .route("/", get(handlers::serve_index))
        .route("/login", get(handlers::serve_login_page).post(handlers::handle_login))
        .route("/logout", get(handlers::handle_logout))
        .route("/record", get(handlers::serve_record_page).post(handlers::handle_record))

        // JSON API
        .route(
            "/api/entries",
            get(handlers::api_list_entries).post(handlers::api_create_entry),
        )

        .nest_service("/static", ServeDir::new("static"))

        .layer(from_fn(middleware::require_auth))
        .layer(session_layer)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(max_body_size)),
        )
        .with_state(state)
}
