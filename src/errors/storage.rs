use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No user with id {0}")]
    UnknownUser(i64),

    #[error("Connection lock poisoned")]
    Poisoned,
}

impl StorageError {
    /// Maps a failed insert into `entries` to `UnknownUser` when SQLite rejected
    /// the row on its foreign key.
    pub fn from_entry_insert(e: rusqlite::Error, user_id: i64) -> Self {
        match &e {
            rusqlite::Error::SqliteFailure(code, _)
                if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                StorageError::UnknownUser(user_id)
            }
            _ => StorageError::Sqlite(e),
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
