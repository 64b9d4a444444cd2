#![allow(dead_code)]

use axum_timesheet::config::{
    Config, DatabaseConfig, LoggingConfig, SecurityConfig, SeedConfig, SeedUser, ServerConfig,
    SessionConfig,
};
use axum_timesheet::models::{Role, User};
use axum_timesheet::services::{bootstrap, LedgerStore};
use chrono::NaiveDateTime;

// Lowest cost bcrypt accepts; keeps hashing fast in tests.
pub const TEST_COST: u32 = 4;

pub fn seed_users() -> Vec<SeedUser> {
    vec![
        seed("alice", "alice-pw", "Alice", Role::User, 10.0),
        seed("bob", "bob-pw", "Bob", Role::User, 10.0),
        seed("root", "root-pw", "Root", Role::Admin, 40.0),
    ]
}

fn seed(username: &str, password: &str, name: &str, role: Role, hour_limit: f64) -> SeedUser {
    SeedUser {
        username: username.to_string(),
        password: password.to_string(),
        name: name.to_string(),
        role,
        hour_limit,
    }
}

pub fn test_config(db_path: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_body_size: 64 * 1024,
        },
        database: DatabaseConfig {
            path: db_path.to_string(),
        },
        session: SessionConfig {
            cookie_name: "session".to_string(),
            secure: false,
        },
        security: SecurityConfig {
            password_cost: TEST_COST,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        seed: SeedConfig { users: seed_users() },
    }
}

/// In-memory ledger with the test seed users.
pub fn seeded_store() -> LedgerStore {
    let store = LedgerStore::open(":memory:").unwrap();
    bootstrap::initialize(&store, &seed_users(), TEST_COST).unwrap();
    store
}

pub fn user(store: &LedgerStore, username: &str) -> User {
    store.find_user_by_username(username).unwrap().unwrap()
}

pub fn at(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M").unwrap()
}
