use crate::errors::AppResult;
use crate::models::{AuthSession, EntryScope, EntryView};
use crate::services::LedgerStore;

/// Admins see the whole ledger, everyone else only their own entries.
pub fn scope_for(caller: &AuthSession) -> EntryScope {
    if caller.is_admin() {
        EntryScope::All
    } else {
        EntryScope::ForUser(caller.user_id)
    }
}

pub fn visible_entries(store: &LedgerStore, caller: &AuthSession) -> AppResult<Vec<EntryView>> {
    let entries = store.list_entries(scope_for(caller))?;
    tracing::debug!("{} entries visible to {}", entries.len(), caller.username);
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn caller(role: Role) -> AuthSession {
        AuthSession {
            user_id: 3,
            username: "u".into(),
            name: "U".into(),
            role,
        }
    }

    #[test]
    fn admin_scope_is_everything() {
        assert_eq!(scope_for(&caller(Role::Admin)), EntryScope::All);
    }

    #[test]
    fn user_scope_is_own_entries() {
        assert_eq!(scope_for(&caller(Role::User)), EntryScope::ForUser(3));
    }
}
