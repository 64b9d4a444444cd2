use serde::{Deserialize, Serialize};
use super::user::{Role, User, UserId};

/// Key under which the session is kept in the cookie-backed session store.
pub const AUTH_SESSION_KEY: &str = "auth_session";

/// Identity of a logged-in caller, created at login and dropped at logout.
/// Every core call that depends on who is asking receives one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user_id: UserId,
    pub username: String,
    pub name: String,
    pub role: Role,
}

impl AuthSession {
    pub fn for_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
