use bcrypt::hash;
use crate::config::SeedUser;
use crate::errors::{AppError, AppResult};
use crate::models::NewUser;
use crate::services::LedgerStore;

/// Creates the schema if needed and provisions any seed user not stored yet.
/// Safe to run on every start; returns how many users were inserted.
pub fn initialize(store: &LedgerStore, seed_users: &[SeedUser], password_cost: u32) -> AppResult<usize> {
    store.init_schema()?;

    let mut inserted = 0;
    for seed in seed_users {
        if !(seed.hour_limit > 0.0) {
            return Err(AppError::Validation(format!(
                "seed user {} has non-positive hour limit {}",
                seed.username, seed.hour_limit
            )));
        }

        if store.find_user_by_username(&seed.username)?.is_some() {
            tracing::debug!("Seed user {} already present", seed.username);
            continue;
        }

        let password_hash = hash(seed.password.as_bytes(), password_cost)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

        let id = store.insert_user(&NewUser {
            username: seed.username.clone(),
            password_hash,
            name: seed.name.clone(),
            role: seed.role,
            hour_limit: seed.hour_limit,
        })?;
        tracing::info!("Seeded user {} (id {}, {})", seed.username, id, seed.role);
        inserted += 1;
    }

    tracing::info!(
        "Bootstrap finished: {} new users, {} total",
        inserted,
        store.user_count()?
    );
    Ok(inserted)
}
