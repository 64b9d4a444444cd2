// Application error type and result alias, built on thiserror.
use thiserror::Error;

pub mod response;
pub mod storage;

pub use response::ApiError;
pub use storage::{StorageError, StorageResult};

/// Message returned for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error(
        "Hour limit exceeded: {attempted:.2} h requested, {current:.2} h already logged, limit is {limit:.2} h"
    )]
    LimitExceeded {
        attempted: f64,
        current: f64,
        limit: f64,
    },

    #[error("{0}")]
    Auth(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("File error: {0}")]
    File(#[from] std::io::Error),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid_credentials() -> Self {
        AppError::Auth(INVALID_CREDENTIALS.to_string())
    }

    /// Hours missing from the remaining allowance. Only meaningful for `LimitExceeded`.
    pub fn shortfall(&self) -> Option<f64> {
        match self {
            AppError::LimitExceeded {
                attempted,
                current,
                limit,
            } => Some(current + attempted - limit),
            _ => None,
        }
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(e: tower_sessions::session::Error) -> Self {
        AppError::Session(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
