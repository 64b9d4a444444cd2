pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use app::{build_router, AppState};
pub use config::Config;
pub use errors::{AppError, AppResult};
