use bcrypt::verify;
use crate::errors::{AppError, AppResult};
use crate::models::{AuthSession, User};
use crate::services::LedgerStore;

#[derive(Clone)]
pub struct AuthService {
    store: LedgerStore,
}

impl AuthService {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Checks a username/password pair. Every kind of failure yields the same error,
    /// so callers cannot tell a missing account from a wrong password.
    pub fn authenticate(&self, username: &str, password: &str) -> AppResult<User> {
        let user = match self.store.find_user_by_username(username)? {
            Some(user) => user,
            None => {
                tracing::warn!("Login failed: unknown user {}", username);
                return Err(AppError::invalid_credentials());
            }
        };

        match verify(password, &user.password_hash) {
            Ok(true) => Ok(user),
            Ok(false) => {
                tracing::warn!("Login failed: wrong password for {}", username);
                Err(AppError::invalid_credentials())
            }
            Err(e) => {
                tracing::error!("Stored password hash for {} is unreadable: {}", username, e);
                Err(AppError::invalid_credentials())
            }
        }
    }

    pub fn login(&self, username: &str, password: &str) -> AppResult<AuthSession> {
        let user = self.authenticate(username, password)?;
        tracing::info!("User {} logged in", user.username);
        Ok(AuthSession::for_user(&user))
    }
}
